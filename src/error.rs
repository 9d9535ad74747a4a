use thiserror::Error;

/// Unified error type for net-switcher
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwitcherError {
    #[error("{subsystem} initialization failed: {reason}")]
    SubsystemInit {
        subsystem: &'static str,
        reason: String,
    },

    #[error("Failed to read profile {0}")]
    RecordRead(u8),

    #[error("Failed to switch to profile {0}")]
    SwitchFailure(u8),

    #[error("Canceled by user")]
    Canceled,

    #[error("Profile id {0} is out of range (1-6)")]
    InvalidProfileId(i64),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl From<std::io::Error> for SwitcherError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for SwitcherError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

pub type SwitcherResult<T> = Result<T, SwitcherError>;
