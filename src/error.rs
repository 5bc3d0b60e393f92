use log::SetLoggerError;
use log4rs::config::runtime::ConfigErrors;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Forecast contains no samples")]
    EmptyInput,

    #[error("Unknown city '{0}'")]
    UnknownCity(String),

    #[error("Network request failed for {0}")]
    Network(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed forecast document: {0}")]
    Decode(String),

    #[error("Invalid URL '{0}': {1}")]
    Url(String, String),

    #[error("Refresh worker is no longer running")]
    WorkerStopped,

    #[error("QR code could not be built")]
    Qr(#[from] qrcode::types::QrError),
}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        WeatherError::Decode(e.to_string())
    }
}

/// Errors while loading configuration or setting up logging
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}'")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Invalid log level '{0}'")]
    LogLevel(String),

    #[error("Failed to create log directory '{0}'")]
    LogDir(PathBuf, #[source] std::io::Error),

    #[error("Failed to open log file '{0}'")]
    LogFile(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    LogConfig(#[from] ConfigErrors),

    #[error(transparent)]
    SetLogger(#[from] SetLoggerError),

    #[error(transparent)]
    City(#[from] WeatherError),
}
