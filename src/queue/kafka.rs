//! `rdkafka` backend. Connection handling, retries and delivery semantics are
//! all librdkafka's; this module only adapts its API to the queue traits.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::producer::{BaseRecord, DeliveryResult, Producer, ProducerContext, ThreadedProducer};
use rdkafka::util::Timeout;
use rdkafka::{ClientContext, Message};
use tokio::sync::mpsc;

use super::{
    DeliveryReport, DeliveryReports, MessageConsumer, MessageProducer, OutboundMessage,
    PartitionSpec, QueueError, ReceivedMessage,
};
use crate::config::QueueConfig;

impl From<KafkaError> for QueueError {
    fn from(err: KafkaError) -> Self {
        QueueError::Kafka(err.to_string())
    }
}

/// Forwards librdkafka delivery callbacks to the report channel.
pub struct ReportingContext {
    reports: mpsc::UnboundedSender<DeliveryReport>,
}

impl ClientContext for ReportingContext {}

impl ProducerContext for ReportingContext {
    type DeliveryOpaque = ();

    fn delivery(&self, result: &DeliveryResult<'_>, _opaque: Self::DeliveryOpaque) {
        let report = match result {
            Ok(message) => {
                DeliveryReport::delivered(message.topic(), message.partition(), message.offset())
            }
            Err((err, message)) => {
                DeliveryReport::failed(message.topic(), message.partition(), err.to_string())
            }
        };
        // The receiver is gone only once the sample is shutting down.
        let _ = self.reports.send(report);
    }
}

pub struct KafkaProducer {
    inner: ThreadedProducer<ReportingContext>,
}

pub fn producer(config: &QueueConfig) -> Result<(KafkaProducer, DeliveryReports), QueueError> {
    let (reports, rx) = mpsc::unbounded_channel();
    let inner: ThreadedProducer<ReportingContext> = ClientConfig::new()
        .set("bootstrap.servers", &config.brokers)
        .create_with_context(ReportingContext { reports })
        .map_err(|err| QueueError::Client(err.to_string()))?;
    Ok((KafkaProducer { inner }, rx))
}

impl MessageProducer for KafkaProducer {
    fn produce(&self, message: OutboundMessage) -> Result<(), QueueError> {
        let mut record: BaseRecord<'_, [u8], [u8]> =
            BaseRecord::to(&message.topic).payload(message.payload.as_slice());
        if let Some(key) = message.key.as_deref() {
            record = record.key(key);
        }
        if let PartitionSpec::Exact(partition) = message.partition {
            record = record.partition(partition);
        }
        self.inner
            .send(record)
            .map_err(|(err, _record)| QueueError::Produce(err.to_string()))
    }

    fn flush(&self, timeout: Duration) -> Result<(), QueueError> {
        self.inner
            .flush(Timeout::After(timeout))
            .map_err(|err| QueueError::Flush(err.to_string()))
    }
}

pub struct KafkaConsumer {
    inner: StreamConsumer,
}

pub fn consumer(config: &QueueConfig) -> Result<KafkaConsumer, QueueError> {
    let inner: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", &config.brokers)
        .set("group.id", &config.group_id)
        .set("auto.offset.reset", config.auto_offset_reset.as_str())
        .create()
        .map_err(|err| QueueError::Client(err.to_string()))?;
    Ok(KafkaConsumer { inner })
}

#[async_trait]
impl MessageConsumer for KafkaConsumer {
    fn subscribe(&self, topics: &[&str]) -> Result<(), QueueError> {
        self.inner.subscribe(topics).map_err(|err| QueueError::Subscribe {
            topic: topics.join(","),
            message: err.to_string(),
        })
    }

    async fn poll(&self, timeout: Duration) -> Result<Option<ReceivedMessage>, QueueError> {
        match tokio::time::timeout(timeout, self.inner.recv()).await {
            Err(_elapsed) => Ok(None),
            Ok(Ok(message)) => Ok(Some(ReceivedMessage {
                topic: message.topic().to_string(),
                partition: message.partition(),
                offset: message.offset(),
                payload: message.payload().map(<[u8]>::to_vec).unwrap_or_default(),
            })),
            Ok(Err(err)) => Err(err.into()),
        }
    }
}
