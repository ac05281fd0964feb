// Consumer sample: poll until a shutdown signal arrives.

use std::fmt::Display;
use std::future::Future;

use super::{MessageConsumer, QueueError, ReceivedMessage};
use crate::config::QueueConfig;

pub fn describe(message: &ReceivedMessage) -> String {
    format!(
        "Received message on {} [{}] at offset {}: {}",
        message.topic,
        message.partition,
        message.offset,
        message.payload_text()
    )
}

/// Subscribes to `config.topic` and prints every message until `shutdown`
/// resolves. Returns how many messages were received.
///
/// A failed subscribe is returned to the caller. Poll errors are logged and
/// the loop keeps going; the client recovers from those on its own.
pub async fn run<C, F, S>(consumer: &C, config: &QueueConfig, shutdown: F) -> Result<usize, QueueError>
where
    C: MessageConsumer + ?Sized,
    F: Future<Output = S>,
    S: Display,
{
    consumer.subscribe(&[config.topic.as_str()])?;
    tracing::info!(topic = %config.topic, group = %config.group_id, "subscribed");
    println!("Consumer started. Press Ctrl+C to exit.");

    tokio::pin!(shutdown);
    let mut received = 0;

    loop {
        tokio::select! {
            biased;
            signal = &mut shutdown => {
                println!("Caught signal {}: terminating", signal);
                return Ok(received);
            }
            polled = consumer.poll(config.poll_timeout()) => match polled {
                Ok(Some(message)) => {
                    received += 1;
                    println!("{}", describe(&message));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "consumer error");
                    println!("Consumer error: {}", err);
                }
            }
        }
    }
}
