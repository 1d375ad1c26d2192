use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenType;
use chrono::Utc;

use crate::domain::user::events::ConfirmationRequestedEvent;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::telemetry::ObfuscatedEmail;
use crate::user::errors::UserError;
use crate::user::ports::EventPublisher;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for registration and email confirmation.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR, EP>
where
    UR: UserRepository,
    EP: EventPublisher,
{
    repository: Arc<UR>,
    event_publisher: Arc<EP>,
    authenticator: Arc<Authenticator>,
    public_url: String,
}

impl<UR, EP> UserService<UR, EP>
where
    UR: UserRepository,
    EP: EventPublisher,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `event_publisher` - Domain event publishing implementation
    /// * `authenticator` - Password hashing and token issuance
    /// * `public_url` - Externally reachable base URL used in confirmation links
    pub fn new(
        repository: Arc<UR>,
        event_publisher: Arc<EP>,
        authenticator: Arc<Authenticator>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
            authenticator,
            public_url: public_url.into(),
        }
    }

    fn confirmation_url(&self, token: &str) -> String {
        format!("{}/confirm/{}", self.public_url.trim_end_matches('/'), token)
    }
}

#[async_trait]
impl<UR, EP> UserServicePort for UserService<UR, EP>
where
    UR: UserRepository,
    EP: EventPublisher,
{
    async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let email = command.email.as_str().to_string();
        tracing::debug!(email = %ObfuscatedEmail::new(&email), "Registering user");

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(UserError::EmailAlreadyRegistered(email));
        }

        let password_hash = self.authenticator.hash_password(&command.password)?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            confirmed: false,
            created_at: Utc::now(),
        };

        let id = self.repository.insert_user(user.clone()).await?;
        let registered_user = User { id, ..user };

        let token = self.authenticator.issue_confirmation_token(&email)?;
        let event = ConfirmationRequestedEvent::new(&registered_user, self.confirmation_url(&token));
        if let Err(e) = self
            .event_publisher
            .publish_confirmation_requested(&event)
            .await
        {
            tracing::error!(
                "Failed to publish ConfirmationRequested event for user {}: {}",
                registered_user.id,
                e
            );
        }

        Ok(registered_user)
    }

    async fn confirm_email(&self, token: &str) -> Result<(), UserError> {
        let email = self
            .authenticator
            .resolve_subject(token, TokenType::Confirmation)?;

        self.repository.set_confirmed(&email).await?;
        tracing::info!(email = %ObfuscatedEmail::new(&email), "User confirmed email");

        Ok(())
    }
}
