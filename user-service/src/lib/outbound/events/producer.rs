use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use thiserror::Error;

use crate::config::KafkaConfig;
use crate::domain::user::events::ConfirmationRequestedEvent;
use crate::outbound::events::messages::UserEventMessage;
use crate::user::errors::EventPublisherError;
use crate::user::ports::EventPublisher;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send message to Kafka: {0}")]
    SendError(String),

    #[error("Failed to serialize message: {0}")]
    SerializationError(String),
}

impl From<KafkaProducerError> for EventPublisherError {
    fn from(err: KafkaProducerError) -> Self {
        match err {
            KafkaProducerError::SerializationError(msg) => {
                EventPublisherError::SerializationFailed(msg)
            }
            KafkaProducerError::SendError(msg) => EventPublisherError::PublishFailed(msg),
        }
    }
}

/// Publishes confirmation requests to the confirmation topic.
pub struct KafkaEventProducer {
    producer: FutureProducer,
    topic: String,
    timeout: Duration,
}

impl KafkaEventProducer {
    /// Create a new Kafka event producer with "at least once" delivery semantics
    ///
    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: Retries do not duplicate messages
    pub fn new(config: &KafkaConfig) -> Result<Self, anyhow::Error> {
        tracing::info!(
            brokers = %config.brokers,
            topic = %config.topic,
            "Initializing Kafka producer for confirmation events"
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", "30000")
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", "10")
            .set("retry.backoff.ms", "100")
            .create()?;

        Ok(Self {
            producer,
            topic: config.topic.clone(),
            timeout: Duration::from_secs(30),
        })
    }

    /// Send one message keyed by user id so a user's events stay ordered.
    async fn publish(
        &self,
        user_id: &str,
        message: &UserEventMessage,
    ) -> Result<(), KafkaProducerError> {
        let payload = serde_json::to_string(message)
            .map_err(|e| KafkaProducerError::SerializationError(e.to_string()))?;

        let record = FutureRecord::to(&self.topic)
            .key(user_id)
            .payload(&payload);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map(|_| {
                tracing::debug!(
                    topic = %self.topic,
                    event_id = %message.event_id(),
                    "Event published"
                );
            })
            .map_err(|(err, _)| KafkaProducerError::SendError(err.to_string()))
    }
}

#[async_trait]
impl EventPublisher for KafkaEventProducer {
    async fn publish_confirmation_requested(
        &self,
        event: &ConfirmationRequestedEvent,
    ) -> Result<(), EventPublisherError> {
        let message = UserEventMessage::from(event);

        self.publish(&event.user_id, &message)
            .await
            .map_err(EventPublisherError::from)
    }
}
