pub mod service;
pub mod store;
pub mod types;

pub use service::NetConfig;
pub use store::{JsonNetConfig, Latency};
pub use types::*;
