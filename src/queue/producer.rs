// Producer sample: send a fixed batch while one background task drains the
// delivery reports.

use tokio::task::JoinHandle;

use super::{DeliveryReports, MessageProducer, OutboundMessage, QueueError};
use crate::config::QueueConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerSummary {
    pub produced: usize,
    pub failed_to_enqueue: usize,
    pub delivered: usize,
    pub delivery_failed: usize,
}

pub fn message_text(i: usize) -> String {
    format!("Hello Kafka message #{} from Rust!", i)
}

/// Prints each report in the order the backend emits it until the channel closes.
pub fn spawn_report_task(mut reports: DeliveryReports) -> JoinHandle<(usize, usize)> {
    tokio::spawn(async move {
        let (mut delivered, mut failed) = (0, 0);
        while let Some(report) = reports.recv().await {
            if report.is_delivered() {
                delivered += 1;
                println!("Delivered message to {}", report);
            } else {
                failed += 1;
                tracing::warn!(%report, "delivery failed");
                println!("Delivery failed: {}", report);
            }
        }
        (delivered, failed)
    })
}

/// Produces `config.message_count` messages to `config.topic`, flushing after each.
///
/// Takes the producer by value: dropping it closes the report channel, which
/// is what lets the report task finish.
pub async fn run<P: MessageProducer>(
    producer: P,
    reports: DeliveryReports,
    config: &QueueConfig,
) -> Result<ProducerSummary, QueueError> {
    let reporter = spawn_report_task(reports);
    let mut summary = ProducerSummary::default();

    for i in 0..config.message_count {
        let message = OutboundMessage::new(config.topic.as_str(), message_text(i));
        match producer.produce(message) {
            Ok(()) => summary.produced += 1,
            Err(err) => {
                summary.failed_to_enqueue += 1;
                tracing::error!(error = %err, "failed to produce message");
            }
        }

        if let Err(err) = producer.flush(config.flush_timeout()) {
            tracing::warn!(error = %err, "flush did not complete");
        }
    }

    drop(producer);
    let (delivered, delivery_failed) = reporter
        .await
        .map_err(|err| QueueError::Task(err.to_string()))?;
    summary.delivered = delivered;
    summary.delivery_failed = delivery_failed;

    println!("Producer finished sending messages.");
    tracing::info!(?summary, "producer done");
    Ok(summary)
}
