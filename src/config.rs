use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cities::{self, DEFAULT_CITY};
use crate::error::ConfigError;
use crate::metno;
use crate::qr;

const APP_DIR: &str = "yrboard";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "yrboard.log";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// City shown at startup when none is given on the command line.
    pub city: String,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub api_base_url: String,
    /// met.no requires an identifying user agent.
    pub user_agent: String,
    pub qr: QrConfig,
    pub log: LogConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QrConfig {
    pub base_url: String,
    pub render_locally: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub path: PathBuf,
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY.to_string(),
            refresh_interval_secs: 600,
            request_timeout_secs: 30,
            api_base_url: metno::BASE_URL.to_string(),
            user_agent: format!(
                "{}/{} github.com/yrboard",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
            qr: QrConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            base_url: qr::DEFAULT_BASE_URL.to_string(),
            render_locally: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        let dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR);
        Self {
            path: dir.join(LOG_FILE),
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads `path` if given, else the default config file if it exists,
    /// else the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config: Config =
            toml::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        cities::lookup(&self.city)?;
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
            city = "bergen"
            refresh_interval_secs = 120

            [qr]
            render_locally = false

            [log]
            level = "debug"
            "#,
        );
        let config = Config::load(Some(file.path())).unwrap();
        let defaults = Config::default();

        assert_eq!(config.city, "bergen");
        assert_eq!(config.refresh_interval(), Duration::from_secs(120));
        assert_eq!(config.api_base_url, defaults.api_base_url);
        assert!(!config.qr.render_locally);
        assert_eq!(config.qr.base_url, qr::DEFAULT_BASE_URL);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.path, defaults.log.path);
    }

    #[test]
    fn test_unknown_city_rejected() {
        let file = write_config(r#"city = "narvik""#);
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::City(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let file = write_config("refresh_interval_secs = \"soon\"");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));

        let file = write_config("colour = \"blue\"");
        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read(..)));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = Config {
            refresh_interval_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
    }
}
