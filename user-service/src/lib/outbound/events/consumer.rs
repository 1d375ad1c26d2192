use std::sync::Arc;

use futures::StreamExt;
use rdkafka::consumer::Consumer;
use rdkafka::consumer::StreamConsumer;
use rdkafka::error::KafkaError;
use rdkafka::ClientConfig;
use rdkafka::Message;
use thiserror::Error;

use super::messages::UserEventMessage;
use crate::config::KafkaConfig;
use crate::domain::user::events::ConfirmationRequestedEvent;
use crate::user::errors::MailerError;
use crate::user::ports::ConfirmationMailer;

#[derive(Debug, Error)]
enum MessageProcessingError {
    #[error("Kafka consumer error: {0}")]
    KafkaError(#[from] KafkaError),

    #[error("Message has no payload")]
    NoPayload,

    #[error("Failed to decode message payload as UTF-8: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    #[error("Failed to deserialize event: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to deliver confirmation: {0}")]
    DeliveryError(#[from] MailerError),
}

/// Kafka consumer that hands confirmation requests to a mailer.
///
/// Runs as its own task so delivery latency never reaches the request path.
pub struct ConfirmationConsumer<M: ConfirmationMailer> {
    consumer: StreamConsumer,
    mailer: Arc<M>,
}

impl<M: ConfirmationMailer> ConfirmationConsumer<M> {
    /// Create a consumer subscribed to the confirmation topic.
    ///
    /// # Arguments
    /// * `config` - Kafka configuration
    /// * `mailer` - Delivery implementation
    pub fn new(config: &KafkaConfig, mailer: Arc<M>) -> Result<Self, anyhow::Error> {
        tracing::info!(
            brokers = %config.brokers,
            group_id = %config.group_id,
            topic = %config.topic,
            "Initializing confirmation consumer"
        );

        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "true")
            .set("auto.commit.interval.ms", "5000")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "30000")
            .set("enable.partition.eof", "false")
            .create()?;

        consumer.subscribe(&[&config.topic])?;

        Ok(Self { consumer, mailer })
    }

    /// Start consuming confirmation requests.
    ///
    /// Long-running; spawn it on its own tokio task.
    pub async fn start_consuming(self) {
        tracing::info!("Starting confirmation consumer loop");

        let mut message_stream = self.consumer.stream();

        while let Some(result) = message_stream.next().await {
            if let Err(error) = self.process_message(result).await {
                tracing::error!(error = %error, "Error processing confirmation request");

                if matches!(error, MessageProcessingError::KafkaError(_)) {
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
            }
        }

        tracing::warn!("Confirmation consumer loop ended");
    }

    async fn process_message(
        &self,
        result: Result<rdkafka::message::BorrowedMessage<'_>, KafkaError>,
    ) -> Result<(), MessageProcessingError> {
        let message = result?;
        let payload = message.payload().ok_or(MessageProcessingError::NoPayload)?;

        deliver(self.mailer.as_ref(), payload).await
    }
}

fn decode_event(payload: &[u8]) -> Result<ConfirmationRequestedEvent, MessageProcessingError> {
    let json_string = std::str::from_utf8(payload)?;

    match serde_json::from_str::<UserEventMessage>(json_string)? {
        UserEventMessage::ConfirmationRequested(message) => Ok(message.into()),
    }
}

async fn deliver<M: ConfirmationMailer + ?Sized>(
    mailer: &M,
    payload: &[u8],
) -> Result<(), MessageProcessingError> {
    let event = decode_event(payload)?;
    tracing::debug!(event_id = %event.event_id, "Received {}", event.event_type());

    mailer.send_confirmation(&event).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use mockall::mock;

    use super::*;

    mock! {
        pub TestMailer {}

        #[async_trait]
        impl ConfirmationMailer for TestMailer {
            async fn send_confirmation(&self, event: &ConfirmationRequestedEvent) -> Result<(), MailerError>;
        }
    }

    fn payload() -> Vec<u8> {
        let event = ConfirmationRequestedEvent {
            event_id: "e1".to_string(),
            user_id: "u1".to_string(),
            email: "a@b.com".to_string(),
            confirmation_url: "http://localhost:8000/confirm/tok".to_string(),
            requested_at: Utc::now(),
        };
        serde_json::to_vec(&UserEventMessage::from(&event)).unwrap()
    }

    #[tokio::test]
    async fn test_delivers_decoded_event() {
        let mut mailer = MockTestMailer::new();
        mailer
            .expect_send_confirmation()
            .withf(|event| {
                event.email == "a@b.com"
                    && event.confirmation_url == "http://localhost:8000/confirm/tok"
            })
            .times(1)
            .returning(|_| Ok(()));

        assert!(deliver(&mailer, &payload()).await.is_ok());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_not_delivered() {
        let mut mailer = MockTestMailer::new();
        mailer.expect_send_confirmation().times(0);

        let result = deliver(&mailer, b"{not json").await;
        assert!(matches!(
            result,
            Err(MessageProcessingError::DeserializationError(_))
        ));

        let result = deliver(&mailer, &[0xff, 0xfe]).await;
        assert!(matches!(result, Err(MessageProcessingError::Utf8Error(_))));
    }

    #[tokio::test]
    async fn test_mailer_failure_is_reported() {
        let mut mailer = MockTestMailer::new();
        mailer
            .expect_send_confirmation()
            .returning(|_| Err(MailerError::DeliveryFailed("smtp down".to_string())));

        let result = deliver(&mailer, &payload()).await;
        assert!(matches!(result, Err(MessageProcessingError::DeliveryError(_))));
    }
}
