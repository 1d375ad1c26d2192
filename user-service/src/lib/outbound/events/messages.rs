use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::events::ConfirmationRequestedEvent;

/// Serializable envelope for events on the confirmation topic.
///
/// Infrastructure representation for event publishing (Kafka, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum UserEventMessage {
    ConfirmationRequested(ConfirmationRequestedMessage),
}

impl UserEventMessage {
    pub fn event_id(&self) -> &str {
        match self {
            UserEventMessage::ConfirmationRequested(message) => &message.event_id,
        }
    }
}

/// Serializable message for the ConfirmationRequested domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRequestedMessage {
    pub event_id: String,
    pub user_id: String,
    pub email: String,
    pub confirmation_url: String,
    pub requested_at: DateTime<Utc>,
}

impl From<&ConfirmationRequestedEvent> for UserEventMessage {
    fn from(event: &ConfirmationRequestedEvent) -> Self {
        UserEventMessage::ConfirmationRequested(ConfirmationRequestedMessage {
            event_id: event.event_id.clone(),
            user_id: event.user_id.clone(),
            email: event.email.clone(),
            confirmation_url: event.confirmation_url.clone(),
            requested_at: event.requested_at,
        })
    }
}

impl From<ConfirmationRequestedMessage> for ConfirmationRequestedEvent {
    fn from(message: ConfirmationRequestedMessage) -> Self {
        Self {
            event_id: message.event_id,
            user_id: message.user_id,
            email: message.email,
            confirmation_url: message.confirmation_url,
            requested_at: message.requested_at,
        }
    }
}
