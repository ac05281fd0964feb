//! TOML configuration shared by the sample binaries.
//!
//! Every field has a default, so a missing file or a partial file both work:
//!
//! ```toml
//! [server]
//! addr = "127.0.0.1:3000"
//! home_page = "./home.html"
//!
//! [log_filter]
//! file = "./log.txt"
//! level = "CRITICAL"
//!
//! [queue]
//! brokers = "localhost:9092"
//! topic = "my-topic"
//! group_id = "my-consumer-group"
//! auto_offset_reset = "earliest"
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::queue::OffsetReset;

pub const DEFAULT_ABOUT_HTML: &str = r#"
  <h1>About Page</h1>
  <p>This page contains content about this web service</p>
  "#;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub log_filter: LogFilterConfig,
    pub queue: QueueConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub home_page: PathBuf,
    pub about_html: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 3000).into(),
            home_page: PathBuf::from("./home.html"),
            about_html: DEFAULT_ABOUT_HTML.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogFilterConfig {
    pub file: PathBuf,
    pub level: String,
}

impl Default for LogFilterConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("./log.txt"),
            level: "CRITICAL".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub brokers: String,
    pub topic: String,
    pub group_id: String,
    pub auto_offset_reset: OffsetReset,
    pub message_count: usize,
    pub flush_timeout_ms: u64,
    pub poll_timeout_ms: u64,
    /// Partition count used by the in-memory queue when it creates a topic.
    pub partitions: u32,
    pub auto_create_topics: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            topic: "my-topic".to_string(),
            group_id: "my-consumer-group".to_string(),
            auto_offset_reset: OffsetReset::Earliest,
            message_count: 10,
            flush_timeout_ms: 100,
            poll_timeout_ms: 100,
            partitions: 1,
            auto_create_topics: true,
        }
    }
}

impl QueueConfig {
    pub fn flush_timeout(&self) -> Duration {
        Duration::from_millis(self.flush_timeout_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

impl AppConfig {
    /// Loads the file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_filter.level.is_empty() {
            return Err(invalid("log_filter.level must not be empty"));
        }
        if self.queue.topic.trim().is_empty() {
            return Err(invalid("queue.topic must not be empty"));
        }
        if self.queue.brokers.trim().is_empty() {
            return Err(invalid("queue.brokers must not be empty"));
        }
        if self.queue.group_id.trim().is_empty() {
            return Err(invalid("queue.group_id must not be empty"));
        }
        if self.queue.partitions == 0 {
            return Err(invalid("queue.partitions must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_sample_constants() {
        let config = AppConfig::default();
        assert_eq!(config.server.addr.port(), 3000);
        assert_eq!(config.log_filter.level, "CRITICAL");
        assert_eq!(config.queue.brokers, "localhost:9092");
        assert_eq!(config.queue.topic, "my-topic");
        assert_eq!(config.queue.group_id, "my-consumer-group");
        assert_eq!(config.queue.auto_offset_reset, OffsetReset::Earliest);
        assert_eq!(config.queue.message_count, 10);
        assert_eq!(config.queue.poll_timeout(), Duration::from_millis(100));
    }

    #[test]
    fn load_without_path_uses_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[queue]\ntopic = \"orders\"\nauto_offset_reset = \"latest\"\n\n[server]\naddr = \"0.0.0.0:8080\""
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.queue.topic, "orders");
        assert_eq!(config.queue.auto_offset_reset, OffsetReset::Latest);
        assert_eq!(config.queue.group_id, "my-consumer-group");
        assert_eq!(config.server.addr.port(), 8080);
        assert_eq!(config.log_filter.level, "CRITICAL");
    }

    #[test]
    fn unknown_offset_reset_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[queue]\nauto_offset_reset = \"middle\"").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn offset_reset_accepts_librdkafka_aliases() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[queue]\nauto_offset_reset = \"smallest\"").unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.queue.auto_offset_reset, OffsetReset::Earliest);

        let config: AppConfig = toml::from_str("[queue]\nauto_offset_reset = \"largest\"").unwrap();
        assert_eq!(config.queue.auto_offset_reset, OffsetReset::Latest);
    }

    #[test]
    fn empty_topic_is_rejected() {
        let mut config = AppConfig::default();
        config.queue.topic = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn zero_partitions_is_rejected() {
        let mut config = AppConfig::default();
        config.queue.partitions = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
