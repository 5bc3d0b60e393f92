use std::fs;
use std::str::FromStr;

use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::config::LogConfig;
use crate::error::ConfigError;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

/// Builds the log4rs configuration. The terminal belongs to the UI, so all
/// records go to a file.
pub fn build(config: &LogConfig) -> Result<Config, ConfigError> {
    let level = LevelFilter::from_str(&config.level)
        .map_err(|_| ConfigError::LogLevel(config.level.clone()))?;

    if let Some(dir) = config.path.parent() {
        fs::create_dir_all(dir).map_err(|e| ConfigError::LogDir(dir.to_path_buf(), e))?;
    }

    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(&config.path)
        .map_err(|e| ConfigError::LogFile(config.path.clone(), e))?;

    Ok(Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("file").build(level))?)
}

pub fn init(config: &LogConfig) -> Result<(), ConfigError> {
    log4rs::init_config(build(config)?)?;
    Ok(())
}
