use async_trait::async_trait;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::Credential;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

/// Port for resolving who is making a request.
#[async_trait]
pub trait AuthenticationPort: Send + Sync + 'static {
    /// Check an email and password against the stored user.
    ///
    /// An unknown email and a wrong password produce the same error.
    ///
    /// # Returns
    /// The stored user
    ///
    /// # Errors
    /// * `Auth(InvalidCredentials)` - Unknown email or wrong password
    /// * `Auth(Unconfirmed)` - Password matches but email is not confirmed
    /// * `DatabaseError` - User lookup failed
    async fn authenticate_by_password(&self, credential: &Credential) -> Result<User, UserError>;

    /// Resolve the user behind a bearer access token.
    ///
    /// # Errors
    /// * `Auth(_)` - Token rejected by validation
    /// * `Auth(Unauthorized)` - Token is valid but its user no longer exists
    /// * `DatabaseError` - User lookup failed
    async fn resolve_principal_from_token(&self, token: &str) -> Result<User, UserError>;

    /// Authenticate with a password and issue an access token.
    ///
    /// # Errors
    /// Same as [`authenticate_by_password`](Self::authenticate_by_password), plus
    /// * `TokenGeneration` - Token could not be encoded
    async fn login(&self, credential: &Credential) -> Result<AccessToken, UserError>;
}
