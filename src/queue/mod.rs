//! Message-queue producer and consumer samples.
//!
//! The samples talk to the client through two traits, so the same loops run
//! against a real broker (`kafka` feature, via `rdkafka`) or the in-process
//! [`memory::MemoryQueue`].
//!
//! ```text
//!   producer::run ──produce/flush──▶ MessageProducer ──▶ backend
//!        ▲                                                  │
//!        └──────── DeliveryReports (mpsc) ◀── delivery ─────┘
//!
//!   consumer::run ──subscribe/poll──▶ MessageConsumer ──▶ backend
//! ```
//!
//! Delivery, retry and ordering guarantees belong to the backend. Nothing here
//! retries on its own.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;

pub mod consumer;
#[cfg(feature = "kafka")]
pub mod kafka;
pub mod memory;
pub mod producer;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueError {
    #[error("failed to create client: {0}")]
    Client(String),

    #[error("failed to subscribe to {topic}: {message}")]
    Subscribe { topic: String, message: String },

    #[error("not subscribed to any topic")]
    NotSubscribed,

    #[error("failed to produce message: {0}")]
    Produce(String),

    #[error("unknown partition {partition} for topic {topic}")]
    UnknownPartition { topic: String, partition: i32 },

    #[error("flush failed: {0}")]
    Flush(String),

    #[error("kafka error: {0}")]
    Kafka(String),

    #[error("delivery report task failed: {0}")]
    Task(String),

    #[error("invalid value {value:?} for {name}")]
    InvalidSetting { name: &'static str, value: String },
}

/// Where a consumer group starts when it has no committed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum OffsetReset {
    Earliest,
    Latest,
}

impl OffsetReset {
    pub fn as_str(&self) -> &'static str {
        match self {
            OffsetReset::Earliest => "earliest",
            OffsetReset::Latest => "latest",
        }
    }
}

impl FromStr for OffsetReset {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earliest" | "smallest" | "beginning" => Ok(OffsetReset::Earliest),
            "latest" | "largest" | "end" => Ok(OffsetReset::Latest),
            other => Err(QueueError::InvalidSetting {
                name: "auto.offset.reset",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for OffsetReset {
    type Error = QueueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionSpec {
    /// Let the client pick.
    Any,
    Exact(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub topic: String,
    pub partition: PartitionSpec,
    pub key: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

impl OutboundMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            partition: PartitionSpec::Any,
            key: None,
            payload: payload.into(),
        }
    }

    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_partition(mut self, partition: i32) -> Self {
        self.partition = PartitionSpec::Exact(partition);
        self
    }
}

/// Outcome of one produced message, as emitted by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReport {
    pub topic: String,
    pub partition: i32,
    pub offset: Option<i64>,
    pub error: Option<String>,
}

impl DeliveryReport {
    pub fn delivered(topic: impl Into<String>, partition: i32, offset: i64) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset: Some(offset),
            error: None,
        }
    }

    pub fn failed(topic: impl Into<String>, partition: i32, error: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset: None,
            error: Some(error.into()),
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]@", self.topic, self.partition)?;
        match self.offset {
            Some(offset) => write!(f, "{}", offset)?,
            None => write!(f, "unset")?,
        }
        if let Some(err) = &self.error {
            write!(f, " ({})", err)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub payload: Vec<u8>,
}

impl ReceivedMessage {
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

pub type DeliveryReports = mpsc::UnboundedReceiver<DeliveryReport>;

pub trait MessageProducer: Send + Sync {
    /// Enqueues a message. Success means accepted, not delivered; the
    /// outcome arrives later on the delivery report channel.
    fn produce(&self, message: OutboundMessage) -> Result<(), QueueError>;

    /// Waits up to `timeout` for outstanding messages.
    fn flush(&self, timeout: Duration) -> Result<(), QueueError>;
}

#[async_trait]
pub trait MessageConsumer: Send + Sync {
    fn subscribe(&self, topics: &[&str]) -> Result<(), QueueError>;

    /// `Ok(None)` means nothing arrived before `timeout`.
    async fn poll(&self, timeout: Duration) -> Result<Option<ReceivedMessage>, QueueError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_reset_parses_aliases() {
        assert_eq!("earliest".parse::<OffsetReset>(), Ok(OffsetReset::Earliest));
        assert_eq!("smallest".parse::<OffsetReset>(), Ok(OffsetReset::Earliest));
        assert_eq!("latest".parse::<OffsetReset>(), Ok(OffsetReset::Latest));
        assert!("middle".parse::<OffsetReset>().is_err());
        assert_eq!(OffsetReset::Latest.as_str(), "latest");
    }

    #[test]
    fn delivery_report_display() {
        assert_eq!(DeliveryReport::delivered("my-topic", 0, 5).to_string(), "my-topic[0]@5");
        assert_eq!(
            DeliveryReport::failed("my-topic", -1, "Unknown topic").to_string(),
            "my-topic[-1]@unset (Unknown topic)"
        );
        assert!(!DeliveryReport::failed("t", 0, "x").is_delivered());
    }

    #[test]
    fn outbound_builder() {
        let msg = OutboundMessage::new("t", "hi").with_key("k").with_partition(2);
        assert_eq!(msg.partition, PartitionSpec::Exact(2));
        assert_eq!(msg.key.as_deref(), Some(&b"k"[..]));
        assert_eq!(msg.payload, b"hi");
    }
}
