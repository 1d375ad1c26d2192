use async_trait::async_trait;

use crate::domain::user::events::ConfirmationRequestedEvent;
use crate::telemetry::ObfuscatedEmail;
use crate::user::errors::MailerError;
use crate::user::ports::ConfirmationMailer;

/// Mailer that writes confirmation links to the log instead of sending mail.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMailer;

impl LoggingMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConfirmationMailer for LoggingMailer {
    async fn send_confirmation(
        &self,
        event: &ConfirmationRequestedEvent,
    ) -> Result<(), MailerError> {
        tracing::info!(
            recipient = %ObfuscatedEmail::new(&event.email),
            user_id = %event.user_id,
            confirmation_url = %event.confirmation_url,
            "Confirmation email ready for delivery"
        );
        Ok(())
    }
}
