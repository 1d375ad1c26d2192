use async_trait::async_trait;

use crate::domain::user::events::ConfirmationRequestedEvent;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::EventPublisherError;
use crate::user::errors::MailerError;
use crate::user::errors::UserError;

/// Port for user registration and confirmation.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new, unconfirmed user and request email confirmation.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email is already registered
    /// * `PasswordHashing` - Password could not be hashed
    /// * `DatabaseError` - Database operation failed
    async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Mark the owner of a confirmation token as confirmed.
    ///
    /// # Arguments
    /// * `token` - Raw confirmation token from the emailed link
    ///
    /// # Errors
    /// * `Auth` - Token is expired, invalid, or not a confirmation token
    /// * `DatabaseError` - Database operation failed
    async fn confirm_email(&self, token: &str) -> Result<(), UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Persist new user to storage.
    ///
    /// # Returns
    /// Identifier of the stored user
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn insert_user(&self, user: User) -> Result<UserId, UserError>;

    /// Flip the confirmed flag of the user owning `email`.
    ///
    /// Confirming an already confirmed or unknown email is not an error.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn set_confirmed(&self, email: &str) -> Result<(), UserError>;
}

/// Event publishing for domain events.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    /// Publish a confirmation request for asynchronous delivery.
    ///
    /// # Errors
    /// * `SerializationFailed` - Event serialization failed
    /// * `PublishFailed` - Failed to publish to broker
    async fn publish_confirmation_requested(
        &self,
        event: &ConfirmationRequestedEvent,
    ) -> Result<(), EventPublisherError>;
}

/// Delivers confirmation links to their recipients.
#[async_trait]
pub trait ConfirmationMailer: Send + Sync + 'static {
    /// # Errors
    /// * `DeliveryFailed` - The message could not be handed to the recipient
    async fn send_confirmation(&self, event: &ConfirmationRequestedEvent)
        -> Result<(), MailerError>;
}
