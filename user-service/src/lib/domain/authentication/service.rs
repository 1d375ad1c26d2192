use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthError;
use auth::Authenticator;
use auth::TokenType;

use crate::domain::authentication::ports::AuthenticationPort;
use crate::domain::user::models::AccessToken;
use crate::domain::user::models::Credential;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;
use crate::telemetry::ObfuscatedEmail;
use crate::user::errors::UserError;

/// Resolves principals from passwords and bearer tokens.
pub struct AuthenticationService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthenticationService<UR>
where
    UR: UserRepository,
{
    /// Create a new authentication service.
    ///
    /// # Arguments
    /// * `repository` - Source of stored users
    /// * `authenticator` - Password verification and token handling
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> AuthenticationPort for AuthenticationService<UR>
where
    UR: UserRepository,
{
    async fn authenticate_by_password(&self, credential: &Credential) -> Result<User, UserError> {
        let email = ObfuscatedEmail::new(&credential.email);
        tracing::debug!(email = %email, "Authenticating user");

        let Some(user) = self.repository.find_by_email(&credential.email).await? else {
            tracing::debug!(email = %email, "No user for email");
            return Err(self.authenticator.reject_unknown(&credential.password).into());
        };

        if !self
            .authenticator
            .verify_password(&credential.password, &user.password_hash)
        {
            tracing::debug!(email = %email, "Password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.confirmed {
            return Err(AuthError::Unconfirmed.into());
        }

        Ok(user)
    }

    async fn resolve_principal_from_token(&self, token: &str) -> Result<User, UserError> {
        let email = self
            .authenticator
            .resolve_subject(token, TokenType::Access)?;

        self.repository.find_by_email(&email).await?.ok_or_else(|| {
            tracing::warn!(email = %ObfuscatedEmail::new(&email), "Token subject has no user");
            AuthError::Unauthorized("Could not find user for this token".to_string()).into()
        })
    }

    async fn login(&self, credential: &Credential) -> Result<AccessToken, UserError> {
        let user = self.authenticate_by_password(credential).await?;
        let access_token = self.authenticator.issue_access_token(user.email.as_str())?;

        tracing::info!(email = %ObfuscatedEmail::new(user.email.as_str()), "User logged in");
        Ok(AccessToken::bearer(access_token))
    }
}

#[cfg(test)]
mod tests {
    use auth::JwtHandler;
    use auth::TokenPolicy;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::UserId;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn insert_user(&self, user: User) -> Result<UserId, UserError>;
            async fn set_confirmed(&self, email: &str) -> Result<(), UserError>;
        }
    }

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn authenticator(policy: TokenPolicy) -> Arc<Authenticator> {
        Arc::new(Authenticator::new(JwtHandler::hs256(SECRET), policy))
    }

    fn stored_user(email: &str, password: &str, confirmed: bool) -> User {
        User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: authenticator(TokenPolicy::default())
                .hash_password(password)
                .unwrap(),
            confirmed,
            created_at: Utc::now(),
        }
    }

    fn repository_with(user: Option<User>) -> MockTestUserRepository {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .returning(move |_| Ok(user.clone()));
        repository
    }

    fn service(repository: MockTestUserRepository) -> AuthenticationService<MockTestUserRepository> {
        AuthenticationService::new(Arc::new(repository), authenticator(TokenPolicy::default()))
    }

    fn credential(email: &str, password: &str) -> Credential {
        Credential::new(email.to_string(), password.to_string())
    }

    #[tokio::test]
    async fn test_authenticate_confirmed_user() {
        let user = stored_user("a@b.com", "pw", true);
        let service = service(repository_with(Some(user.clone())));

        let result = service
            .authenticate_by_password(&credential("a@b.com", "pw"))
            .await;

        assert_eq!(result, Ok(user));
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
        let unknown = service(repository_with(None))
            .authenticate_by_password(&credential("test@gmail.com", "1234"))
            .await
            .unwrap_err();

        let wrong_password = service(repository_with(Some(stored_user("a@b.com", "pw", true))))
            .authenticate_by_password(&credential("a@b.com", "wrong password"))
            .await
            .unwrap_err();

        assert_eq!(unknown, UserError::Auth(AuthError::InvalidCredentials));
        assert_eq!(unknown, wrong_password);
        assert_eq!(unknown.to_string(), wrong_password.to_string());
    }

    #[tokio::test]
    async fn test_wrong_password_on_unconfirmed_user_is_invalid_credentials() {
        let service = service(repository_with(Some(stored_user("a@b.com", "pw", false))));

        let result = service
            .authenticate_by_password(&credential("a@b.com", "nope"))
            .await;

        assert_eq!(result, Err(UserError::Auth(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unconfirmed_user_is_rejected_after_password_check() {
        let service = service(repository_with(Some(stored_user("a@b.com", "pw", false))));

        let result = service
            .authenticate_by_password(&credential("a@b.com", "pw"))
            .await;

        let error = result.unwrap_err();
        assert_eq!(error, UserError::Auth(AuthError::Unconfirmed));
        assert_eq!(error.to_string(), "User has not confirmed email");
    }

    #[tokio::test]
    async fn test_malformed_stored_hash_is_invalid_credentials() {
        let mut user = stored_user("a@b.com", "pw", true);
        user.password_hash = "not-a-phc-string".to_string();
        let service = service(repository_with(Some(user)));

        let result = service
            .authenticate_by_password(&credential("a@b.com", "pw"))
            .await;

        assert_eq!(result, Err(UserError::Auth(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .returning(|_| Err(UserError::DatabaseError("timeout".to_string())));

        let result = service(repository)
            .authenticate_by_password(&credential("a@b.com", "pw"))
            .await;

        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_resolve_principal_from_access_token() {
        let user = stored_user("a@b.com", "pw", true);
        let mut repository = MockTestUserRepository::new();
        let returned_user = user.clone();
        repository
            .expect_find_by_email()
            .withf(|email| email == "a@b.com")
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));

        let token = authenticator(TokenPolicy::default())
            .issue_access_token("a@b.com")
            .unwrap();

        let result = service(repository)
            .resolve_principal_from_token(&token)
            .await;
        assert_eq!(result, Ok(user));
    }

    #[tokio::test]
    async fn test_resolve_principal_for_removed_user() {
        let token = authenticator(TokenPolicy::default())
            .issue_access_token("test@gmail.com")
            .unwrap();

        let result = service(repository_with(None))
            .resolve_principal_from_token(&token)
            .await;

        let error = result.unwrap_err();
        assert!(matches!(error, UserError::Auth(AuthError::Unauthorized(_))));
        assert_eq!(error.to_string(), "Could not find user for this token");
    }

    #[tokio::test]
    async fn test_resolve_principal_rejects_confirmation_token() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_email().times(0);

        let token = authenticator(TokenPolicy::default())
            .issue_confirmation_token("a@b.com")
            .unwrap();

        let result = service(repository)
            .resolve_principal_from_token(&token)
            .await;

        assert_eq!(
            result,
            Err(UserError::Auth(AuthError::WrongType {
                expected: TokenType::Access
            }))
        );
    }

    #[tokio::test]
    async fn test_resolve_principal_rejects_expired_token() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_email().times(0);

        let token = authenticator(TokenPolicy::new(-1, 1440))
            .issue_access_token("a@b.com")
            .unwrap();

        let result = service(repository)
            .resolve_principal_from_token(&token)
            .await;

        assert_eq!(result, Err(UserError::Auth(AuthError::Expired)));
    }

    #[tokio::test]
    async fn test_login_issues_bearer_access_token() {
        let service = service(repository_with(Some(stored_user("a@b.com", "pw", true))));

        let token = service.login(&credential("a@b.com", "pw")).await.unwrap();

        assert_eq!(token.token_type, "bearer");
        assert_eq!(
            authenticator(TokenPolicy::default())
                .resolve_subject(&token.access_token, TokenType::Access),
            Ok("a@b.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_login_unconfirmed_user_gets_no_token() {
        let service = service(repository_with(Some(stored_user("a@b.com", "pw", false))));

        let result = service.login(&credential("a@b.com", "pw")).await;

        assert_eq!(result, Err(UserError::Auth(AuthError::Unconfirmed)));
    }
}
