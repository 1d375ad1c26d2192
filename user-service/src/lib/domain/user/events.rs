use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::models::User;

/// Domain event published when a newly registered user must confirm their email.
///
/// Carries everything the delivery worker needs, so delivery never has to
/// read back from the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequestedEvent {
    pub event_id: String,
    pub user_id: String,
    pub email: String,
    pub confirmation_url: String,
    pub requested_at: DateTime<Utc>,
}

impl ConfirmationRequestedEvent {
    /// Create a new ConfirmationRequested event for a user.
    ///
    /// # Arguments
    /// * `user` - Freshly registered user
    /// * `confirmation_url` - Link embedding the confirmation token
    pub fn new(user: &User, confirmation_url: String) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            user_id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            confirmation_url,
            requested_at: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &str {
        "confirmation_requested"
    }
}
