use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;
use tracing::info;

use crate::platform::Latency;

// ─── Embedded Default ────────────────────────────────────────────────────
/// Baked into the binary at compile time and written out on first run.
const DEFAULT_CONFIG_TOML: &str = include_str!("../default_config.toml");

// ─── CLI Arguments (override layer) ─────────────────────────────────────
/// net-switcher: switch between stored network profiles
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "net-switcher", version, about, long_about = None)]
pub struct CliArgs {
    /// Path to a custom config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Profile store file (overrides config file)
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    /// Log level filter (overrides config file)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Tick rate in milliseconds (overrides config file)
    #[arg(short, long)]
    pub tick_rate: Option<u64>,

    /// Print the default config to stdout and exit
    #[arg(long)]
    pub print_default_config: bool,
}

// ─── TOML Structs ───────────────────────────────────────────────────────

/// Root configuration, parsed from TOML, then overridden by CLI flags.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level
    pub log_level: String,

    /// Notification prefix (empty = none)
    pub notification_prefix: String,

    /// Profile store path (empty = default location)
    pub store_path: String,

    /// UI tick interval (milliseconds)
    pub tick_rate_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Fade-out delay for info and error notifications
    pub duration_secs: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub connect_delay_ms: u64,
    pub disconnect_delay_ms: u64,
}

// ─── Defaults ───────────────────────────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            notification_prefix: "net-switcher".into(),
            store_path: String::new(),
            tick_rate_ms: 250,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { duration_secs: 5.0 }
    }
}

// ─── Path Resolution ────────────────────────────────────────────────────

impl Config {
    /// Standard config file path: ~/.config/net-switcher/config.toml
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("net-switcher")
            .join("config.toml")
    }

    /// Data directory: ~/.local/share/net-switcher/
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("net-switcher")
    }

    /// Log directory: ~/.local/share/net-switcher/logs
    pub fn log_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    /// Profile store file, falling back to the data directory
    pub fn store_path(&self) -> PathBuf {
        let path = self.general.store_path.trim();
        if path.is_empty() {
            Self::data_dir().join("profiles.json")
        } else {
            PathBuf::from(path)
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.general.tick_rate_ms.max(10))
    }

    pub fn latency(&self) -> Latency {
        Latency {
            connect: Duration::from_millis(self.simulation.connect_delay_ms),
            disconnect: Duration::from_millis(self.simulation.disconnect_delay_ms),
        }
    }
}

// ─── Bootloader ─────────────────────────────────────────────────────────

/// The single entry point for configuration. Called exactly once at startup.
///
/// 1. Resolve config file path (CLI override or default)
/// 2. If the config file doesn't exist, create it from the embedded default
/// 3. Parse TOML from disk into Config
/// 4. Apply CLI overrides on top
pub fn load(cli: &CliArgs) -> Result<Config> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&config_path, DEFAULT_CONFIG_TOML).wrap_err_with(|| {
            format!(
                "Failed to write default config to {}",
                config_path.display()
            )
        })?;
        info!("Created default config at {}", config_path.display());
    }

    let toml_str = std::fs::read_to_string(&config_path)
        .wrap_err_with(|| format!("Failed to read config from {}", config_path.display()))?;

    let mut config = parse(&toml_str).wrap_err_with(|| {
        format!(
            "Failed to parse config at {}.\n\
             Delete the file to regenerate defaults, or run:\n  \
             net-switcher --print-default-config > {:?}",
            config_path.display(),
            config_path
        )
    })?;

    apply_overrides(&mut config, cli);
    Ok(config)
}

fn parse(toml_str: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(toml_str)
}

fn apply_overrides(config: &mut Config, cli: &CliArgs) {
    if let Some(ref store) = cli.store {
        config.general.store_path = store.display().to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(tick) = cli.tick_rate {
        config.general.tick_rate_ms = tick;
    }
}

/// Returns the embedded default config TOML string.
pub fn default_config_toml() -> &'static str {
    DEFAULT_CONFIG_TOML
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_default_parses() {
        let config = parse(default_config_toml()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.notification_prefix, "net-switcher");
        assert_eq!(config.notifications.duration_secs, 5.0);
        assert_eq!(config.simulation.connect_delay_ms, 1500);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse("[general]\nlog_level = \"debug\"\n").unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.tick_rate_ms, 250);
        assert_eq!(config.notifications.duration_secs, 5.0);
        assert_eq!(config.latency().connect, Duration::ZERO);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();
        let cli = CliArgs {
            store: Some(PathBuf::from("/tmp/p.json")),
            log_level: Some("trace".into()),
            tick_rate: Some(100),
            ..Default::default()
        };
        apply_overrides(&mut config, &cli);
        assert_eq!(config.store_path(), PathBuf::from("/tmp/p.json"));
        assert_eq!(config.general.log_level, "trace");
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
    }

    #[test]
    fn test_load_bootstraps_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub/config.toml");
        let cli = CliArgs {
            config: Some(path.clone()),
            ..Default::default()
        };
        let config = load(&cli).unwrap();
        assert!(path.exists());
        assert_eq!(config.general.tick_rate_ms, 250);
    }

    #[test]
    fn test_store_path_defaults_to_data_dir() {
        let config = Config::default();
        assert!(config.store_path().ends_with("net-switcher/profiles.json"));
    }
}
