//! Configuration loading for the AcousticBrainz tagger
//!
//! The TOML file is optional. Every field carries a built-in default, so a
//! missing file logs a warning and falls back to defaults instead of failing.
//!
//! # Config file resolution priority
//!
//! 1. Explicit path from the caller (highest priority)
//! 2. `ABTAG_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/abtag/config.toml` on Linux)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming an alternate config file
pub const CONFIG_ENV_VAR: &str = "ABTAG_CONFIG";

/// Default AcousticBrainz host
pub const ACOUSTICBRAINZ_HOST: &str = "acousticbrainz.org";
/// Default AcousticBrainz port (plain HTTP)
pub const ACOUSTICBRAINZ_PORT: u16 = 80;
/// Minimum delay between two requests to the same destination
pub const REQUEST_DELAY_MS: u64 = 50;

const USER_AGENT: &str = concat!("abtag/", env!("CARGO_PKG_VERSION"));

/// Top-level configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Remote analysis service settings
    #[serde(default)]
    pub acousticbrainz: AcousticBrainzConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// AcousticBrainz service settings
#[derive(Debug, Clone, Deserialize)]
pub struct AcousticBrainzConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Delay registered with the transport for this destination
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Transport-level request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Honour HTTP_PROXY / HTTPS_PROXY style environment settings
    #[serde(default = "default_use_system_proxy")]
    pub use_system_proxy: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_host() -> String {
    ACOUSTICBRAINZ_HOST.to_string()
}

fn default_port() -> u16 {
    ACOUSTICBRAINZ_PORT
}

fn default_request_delay_ms() -> u64 {
    REQUEST_DELAY_MS
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

fn default_use_system_proxy() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AcousticBrainzConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            use_system_proxy: default_use_system_proxy(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AcousticBrainzConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject settings that cannot address a remote service
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("acousticbrainz.host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(Error::Config("acousticbrainz.port must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl TomlConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;
        config.acousticbrainz.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`
    ///
    /// A missing file is not an error: defaults are returned and a warning
    /// is logged. Unreadable or malformed files are errors.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file {:?} not found, using built-in defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;

        info!("Loaded TOML configuration from {:?}", path);
        Ok(config)
    }

    /// Resolve the config path and load it
    ///
    /// ```no_run
    /// use abtag_common::TomlConfig;
    ///
    /// let config = TomlConfig::load_resolved(None)?;
    /// println!("AcousticBrainz at {}:{}", config.acousticbrainz.host, config.acousticbrainz.port);
    /// # Ok::<(), abtag_common::Error>(())
    /// ```
    pub fn load_resolved(explicit: Option<&Path>) -> Result<Self> {
        match resolve_config_path(explicit) {
            Some(path) => Self::load(&path),
            None => {
                warn!("Could not determine config directory, using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Resolve which config file to read: explicit > env > platform default
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path()
}

/// Platform config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("abtag").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.acousticbrainz.host, "acousticbrainz.org");
        assert_eq!(config.acousticbrainz.port, 80);
        assert_eq!(config.acousticbrainz.request_delay(), Duration::from_millis(50));
        assert_eq!(config.acousticbrainz.timeout(), Duration::from_secs(30));
        assert!(config.acousticbrainz.user_agent.starts_with("abtag/"));
        assert!(config.acousticbrainz.use_system_proxy);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
            [acousticbrainz]
            request_delay_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.acousticbrainz.request_delay_ms, 250);
        assert_eq!(config.acousticbrainz.host, "acousticbrainz.org");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = TomlConfig::from_toml_str("[acousticbrainz]\nport = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = TomlConfig::from_toml_str("[acousticbrainz]\nhost = \"  \"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = TomlConfig::from_toml_str("not = [valid").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TomlConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.acousticbrainz.port, 80);
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TomlConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_load_resolved_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[acousticbrainz]\nport = 8081").unwrap();

        let config = TomlConfig::load_resolved(Some(file.path())).unwrap();
        assert_eq!(config.acousticbrainz.port, 8081);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[acousticbrainz]\nhost = \"localhost\"\nport = 8080\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = TomlConfig::load(file.path()).unwrap();
        assert_eq!(config.acousticbrainz.host, "localhost");
        assert_eq!(config.acousticbrainz.port, 8080);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    #[serial]
    fn test_resolution_priority() {
        std::env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");

        let explicit = PathBuf::from("/tmp/explicit.toml");
        assert_eq!(resolve_config_path(Some(&explicit)), Some(explicit.clone()));
        assert_eq!(
            resolve_config_path(None),
            Some(PathBuf::from("/tmp/from-env.toml"))
        );

        std::env::remove_var(CONFIG_ENV_VAR);
        assert_eq!(resolve_config_path(None), default_config_path());
    }
}
