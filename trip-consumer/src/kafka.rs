use rdkafka::{
    consumer::{Consumer, StreamConsumer},
    error::KafkaError,
    ClientConfig, Message,
};
use thiserror::Error;

use crate::config::KafkaConfig;

/// Errors surfaced by one receive from the subscription. `Empty` payloads
/// are dropped by the caller; `Kafka` errors end the consumer loop.
#[derive(Debug, Error)]
pub enum RecvError {
    #[error("kafka error: {0}")]
    Kafka(#[from] KafkaError),
    #[error("received empty payload")]
    Empty,
}

/// A subscription on one topic through one consumer group.
///
/// Offsets are committed automatically on delivery, so a message counts as
/// consumed before its decode/persist outcome is known. Failed messages are
/// logged and lost, never redelivered.
pub struct Subscription {
    consumer: StreamConsumer,
}

impl Subscription {
    pub fn new(config: &KafkaConfig) -> Result<Self, KafkaError> {
        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", &config.kafka_hosts)
            .set("statistics.interval.ms", "10000")
            .set("group.id", &config.kafka_consumer_group)
            .set("auto.offset.reset", &config.kafka_consumer_offset_reset)
            .set("enable.auto.commit", "true");

        if config.kafka_tls {
            client_config
                .set("security.protocol", "ssl")
                .set("enable.ssl.certificate.verification", "false");
        };

        let consumer: StreamConsumer = client_config.create()?;
        consumer.subscribe(&[config.kafka_consumer_topic.as_str()])?;

        Ok(Self { consumer })
    }

    /// Wait for the next message and return its raw payload bytes.
    pub async fn recv(&self) -> Result<Vec<u8>, RecvError> {
        let message = self.consumer.recv().await?;

        let Some(payload) = message.payload() else {
            return Err(RecvError::Empty);
        };

        Ok(payload.to_vec())
    }
}
