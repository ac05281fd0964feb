//! In-process queue backend.
//!
//! Topics hold a fixed number of partitions, each an append-only log. Messages
//! sent with [`PartitionSpec::Any`] are spread round-robin (or by key hash when
//! a key is set). Consumer groups keep committed offsets in the queue, so a
//! new consumer in the same group resumes where the last one stopped. There is
//! no rebalancing: every member of a group reads every partition.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};
use tokio::time::Instant;

use super::{
    DeliveryReport, DeliveryReports, MessageConsumer, MessageProducer, OffsetReset,
    OutboundMessage, PartitionSpec, QueueError, ReceivedMessage,
};
use crate::config::QueueConfig;

const UNKNOWN_TOPIC: &str = "Broker: Unknown topic or partition";

#[derive(Default)]
struct Topic {
    partitions: Vec<Vec<Vec<u8>>>,
    next_partition: usize,
}

impl Topic {
    fn with_partitions(count: u32) -> Self {
        Self {
            partitions: vec![Vec::new(); count as usize],
            next_partition: 0,
        }
    }

    fn pick_partition(&mut self, key: Option<&[u8]>) -> usize {
        let count = self.partitions.len();
        match key {
            Some(key) => {
                let mut hasher = DefaultHasher::new();
                key.hash(&mut hasher);
                (hasher.finish() % count as u64) as usize
            }
            None => {
                let p = self.next_partition % count;
                self.next_partition = (p + 1) % count;
                p
            }
        }
    }
}

#[derive(Default)]
struct State {
    topics: HashMap<String, Topic>,
    // (group, topic, partition) -> next offset to read
    committed: HashMap<(String, String, i32), i64>,
}

struct Inner {
    state: Mutex<State>,
    arrivals: Notify,
    partitions: u32,
    auto_create_topics: bool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock cannot leave a log half-appended.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone)]
pub struct MemoryQueue {
    inner: Arc<Inner>,
}

impl MemoryQueue {
    /// `partitions` applies to topics created on first produce.
    pub fn new(partitions: u32, auto_create_topics: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::default()),
                arrivals: Notify::new(),
                partitions: partitions.max(1),
                auto_create_topics,
            }),
        }
    }

    pub fn from_config(config: &QueueConfig) -> Self {
        Self::new(config.partitions, config.auto_create_topics)
    }

    /// Creates `name` if missing. Returns false when it already existed.
    pub fn create_topic(&self, name: &str, partitions: u32) -> bool {
        let mut state = lock(&self.inner.state);
        if state.topics.contains_key(name) {
            return false;
        }
        state
            .topics
            .insert(name.to_string(), Topic::with_partitions(partitions.max(1)));
        true
    }

    pub fn partition_len(&self, topic: &str, partition: i32) -> Option<usize> {
        let state = lock(&self.inner.state);
        let topic = state.topics.get(topic)?;
        topic.partitions.get(partition as usize).map(Vec::len)
    }

    pub fn committed_offset(&self, group_id: &str, topic: &str, partition: i32) -> Option<i64> {
        lock(&self.inner.state)
            .committed
            .get(&(group_id.to_string(), topic.to_string(), partition))
            .copied()
    }

    pub fn producer(&self) -> (MemoryProducer, DeliveryReports) {
        let (reports, rx) = mpsc::unbounded_channel();
        let producer = MemoryProducer {
            queue: self.clone(),
            reports,
        };
        (producer, rx)
    }

    pub fn consumer(&self, group_id: impl Into<String>, reset: OffsetReset) -> MemoryConsumer {
        MemoryConsumer {
            queue: self.clone(),
            group_id: group_id.into(),
            reset,
            state: Mutex::new(ConsumerState::default()),
        }
    }
}

pub struct MemoryProducer {
    queue: MemoryQueue,
    reports: mpsc::UnboundedSender<DeliveryReport>,
}

impl MemoryProducer {
    fn append(&self, message: OutboundMessage) -> Result<DeliveryReport, QueueError> {
        let inner = &self.queue.inner;
        let mut state = lock(&inner.state);

        if !state.topics.contains_key(&message.topic) {
            if !inner.auto_create_topics {
                return Ok(DeliveryReport::failed(&message.topic, -1, UNKNOWN_TOPIC));
            }
            tracing::debug!(topic = %message.topic, partitions = inner.partitions, "auto-creating topic");
            state
                .topics
                .insert(message.topic.clone(), Topic::with_partitions(inner.partitions));
        }

        let Some(topic) = state.topics.get_mut(&message.topic) else {
            return Ok(DeliveryReport::failed(&message.topic, -1, UNKNOWN_TOPIC));
        };

        let partition = match message.partition {
            PartitionSpec::Any => topic.pick_partition(message.key.as_deref()),
            PartitionSpec::Exact(p) if p >= 0 && (p as usize) < topic.partitions.len() => p as usize,
            PartitionSpec::Exact(p) => {
                return Err(QueueError::UnknownPartition {
                    topic: message.topic,
                    partition: p,
                })
            }
        };

        let log = &mut topic.partitions[partition];
        let offset = log.len() as i64;
        log.push(message.payload);
        Ok(DeliveryReport::delivered(message.topic, partition as i32, offset))
    }
}

impl MessageProducer for MemoryProducer {
    fn produce(&self, message: OutboundMessage) -> Result<(), QueueError> {
        let report = self.append(message)?;
        if report.is_delivered() {
            self.queue.inner.arrivals.notify_waiters();
        }
        // Nobody listening for reports is not a produce failure.
        let _ = self.reports.send(report);
        Ok(())
    }

    fn flush(&self, _timeout: Duration) -> Result<(), QueueError> {
        // Appends are synchronous, so nothing is ever outstanding.
        Ok(())
    }
}

#[derive(Default)]
struct ConsumerState {
    topics: Vec<String>,
    positions: HashMap<(String, i32), i64>,
}

pub struct MemoryConsumer {
    queue: MemoryQueue,
    group_id: String,
    reset: OffsetReset,
    state: Mutex<ConsumerState>,
}

impl MemoryConsumer {
    fn try_next(&self) -> Result<Option<ReceivedMessage>, QueueError> {
        let mut consumer = lock(&self.state);
        if consumer.topics.is_empty() {
            return Err(QueueError::NotSubscribed);
        }
        let mut queue = lock(&self.queue.inner.state);
        let ConsumerState { topics, positions } = &mut *consumer;
        let State {
            topics: logs,
            committed,
        } = &mut *queue;

        for name in topics.iter() {
            let Some(topic) = logs.get(name) else {
                continue;
            };
            for (index, log) in topic.partitions.iter().enumerate() {
                let partition = index as i32;
                let key = (self.group_id.clone(), name.clone(), partition);
                let position = positions.entry((name.clone(), partition)).or_insert_with(|| {
                    committed.get(&key).copied().unwrap_or(match self.reset {
                        OffsetReset::Earliest => 0,
                        OffsetReset::Latest => log.len() as i64,
                    })
                });

                if let Some(payload) = log.get(*position as usize) {
                    let message = ReceivedMessage {
                        topic: name.clone(),
                        partition,
                        offset: *position,
                        payload: payload.clone(),
                    };
                    *position += 1;
                    committed.insert(key, *position);
                    return Ok(Some(message));
                }
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl MessageConsumer for MemoryConsumer {
    fn subscribe(&self, topics: &[&str]) -> Result<(), QueueError> {
        if let Some(empty) = topics.iter().find(|t| t.trim().is_empty()) {
            return Err(QueueError::Subscribe {
                topic: empty.to_string(),
                message: "topic name must not be empty".to_string(),
            });
        }
        let mut state = lock(&self.state);
        state.topics = topics.iter().map(|t| t.to_string()).collect();
        state.positions.clear();
        Ok(())
    }

    async fn poll(&self, timeout: Duration) -> Result<Option<ReceivedMessage>, QueueError> {
        let deadline = Instant::now() + timeout;
        loop {
            // Register before checking so an append in between is not missed.
            let arrived = self.queue.inner.arrivals.notified();
            if let Some(message) = self.try_next()? {
                return Ok(Some(message));
            }
            if tokio::time::timeout_at(deadline, arrived).await.is_err() {
                return Ok(None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLL: Duration = Duration::from_millis(20);

    #[tokio::test]
    async fn produce_then_consume_from_earliest() {
        let queue = MemoryQueue::new(1, true);
        let (producer, mut reports) = queue.producer();
        producer.produce(OutboundMessage::new("t", "one")).unwrap();
        producer.produce(OutboundMessage::new("t", "two")).unwrap();

        assert_eq!(reports.recv().await, Some(DeliveryReport::delivered("t", 0, 0)));
        assert_eq!(reports.recv().await, Some(DeliveryReport::delivered("t", 0, 1)));

        let consumer = queue.consumer("g", OffsetReset::Earliest);
        consumer.subscribe(&["t"]).unwrap();
        let first = consumer.poll(POLL).await.unwrap().unwrap();
        let second = consumer.poll(POLL).await.unwrap().unwrap();
        assert_eq!((first.offset, first.payload_text()), (0, "one".to_string()));
        assert_eq!((second.offset, second.payload_text()), (1, "two".to_string()));
        assert_eq!(consumer.poll(POLL).await.unwrap(), None);
        assert_eq!(queue.committed_offset("g", "t", 0), Some(2));
    }

    #[tokio::test]
    async fn latest_skips_existing_messages() {
        let queue = MemoryQueue::new(1, true);
        let (producer, _reports) = queue.producer();
        producer.produce(OutboundMessage::new("t", "old")).unwrap();

        let consumer = queue.consumer("g", OffsetReset::Latest);
        consumer.subscribe(&["t"]).unwrap();
        assert_eq!(consumer.poll(POLL).await.unwrap(), None);

        producer.produce(OutboundMessage::new("t", "new")).unwrap();
        let msg = consumer.poll(POLL).await.unwrap().unwrap();
        assert_eq!(msg.payload_text(), "new");
        assert_eq!(msg.offset, 1);
    }

    #[tokio::test]
    async fn group_resumes_from_committed_offset() {
        let queue = MemoryQueue::new(1, true);
        let (producer, _reports) = queue.producer();
        for i in 0..3 {
            producer.produce(OutboundMessage::new("t", format!("m{}", i))).unwrap();
        }

        let first = queue.consumer("g", OffsetReset::Earliest);
        first.subscribe(&["t"]).unwrap();
        first.poll(POLL).await.unwrap().unwrap();
        drop(first);

        let second = queue.consumer("g", OffsetReset::Earliest);
        second.subscribe(&["t"]).unwrap();
        assert_eq!(second.poll(POLL).await.unwrap().unwrap().payload_text(), "m1");

        let other_group = queue.consumer("h", OffsetReset::Earliest);
        other_group.subscribe(&["t"]).unwrap();
        assert_eq!(other_group.poll(POLL).await.unwrap().unwrap().payload_text(), "m0");
    }

    #[tokio::test]
    async fn unknown_topic_is_a_failed_delivery() {
        let queue = MemoryQueue::new(1, false);
        let (producer, mut reports) = queue.producer();
        producer.produce(OutboundMessage::new("missing", "x")).unwrap();

        let report = reports.recv().await.unwrap();
        assert!(!report.is_delivered());
        assert_eq!(report.error.as_deref(), Some(UNKNOWN_TOPIC));
    }

    #[test]
    fn exact_partition_out_of_range_is_rejected() {
        let queue = MemoryQueue::new(2, true);
        assert!(queue.create_topic("t", 2));
        assert!(!queue.create_topic("t", 5));
        let (producer, _reports) = queue.producer();

        producer.produce(OutboundMessage::new("t", "ok").with_partition(1)).unwrap();
        assert_eq!(queue.partition_len("t", 1), Some(1));

        let err = producer
            .produce(OutboundMessage::new("t", "bad").with_partition(2))
            .unwrap_err();
        assert_eq!(err, QueueError::UnknownPartition { topic: "t".to_string(), partition: 2 });
    }

    #[test]
    fn any_partition_round_robins() {
        let queue = MemoryQueue::new(3, true);
        let (producer, _reports) = queue.producer();
        for _ in 0..6 {
            producer.produce(OutboundMessage::new("t", "x")).unwrap();
        }
        for p in 0..3 {
            assert_eq!(queue.partition_len("t", p), Some(2));
        }
    }

    #[test]
    fn same_key_same_partition() {
        let queue = MemoryQueue::new(4, true);
        let (producer, mut reports) = queue.producer();
        for _ in 0..3 {
            producer.produce(OutboundMessage::new("t", "x").with_key("user-1")).unwrap();
        }
        let partitions: Vec<i32> = (0..3).map(|_| reports.try_recv().unwrap().partition).collect();
        assert!(partitions.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn poll_before_subscribe_fails() {
        let queue = MemoryQueue::new(1, true);
        let consumer = queue.consumer("g", OffsetReset::Earliest);
        assert_eq!(consumer.poll(POLL).await, Err(QueueError::NotSubscribed));
        assert!(consumer.subscribe(&[""]).is_err());
    }

    #[tokio::test]
    async fn poll_wakes_on_arrival() {
        let queue = MemoryQueue::new(1, true);
        let consumer = queue.consumer("g", OffsetReset::Earliest);
        consumer.subscribe(&["t"]).unwrap();

        let (producer, _reports) = queue.producer();
        let sender = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            producer.produce(OutboundMessage::new("t", "late")).unwrap();
        });

        let msg = consumer.poll(Duration::from_secs(5)).await.unwrap();
        assert_eq!(msg.map(|m| m.payload_text()), Some("late".to_string()));
        sender.await.unwrap();
    }
}
