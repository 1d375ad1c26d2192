use crate::errors::AuthError;
use crate::issuer::TokenIssuer;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenType;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::policy::TokenPolicy;
use crate::validator::CredentialValidator;

/// Authentication coordinator combining password hashing, token issuance and
/// token validation.
///
/// Built once at startup from immutable configuration and shared read-only
/// between requests.
#[derive(Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    issuer: TokenIssuer,
    validator: CredentialValidator,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_handler` - Codec used for both issuing and validating tokens
    /// * `policy` - Token lifetimes
    pub fn new(jwt_handler: JwtHandler, policy: TokenPolicy) -> Self {
        let password_hasher = PasswordHasher::new();
        password_hasher.prepare_dummy();

        Self {
            password_hasher,
            issuer: TokenIssuer::new(jwt_handler.clone(), policy),
            validator: CredentialValidator::new(jwt_handler),
        }
    }

    pub fn policy(&self) -> &TokenPolicy {
        self.issuer.policy()
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Reject a password for an identity that has no stored hash.
    ///
    /// Performs a throwaway verification first so the rejection costs the same
    /// as a wrong password.
    pub fn reject_unknown(&self, password: &str) -> AuthError {
        self.password_hasher.verify_dummy(password);
        AuthError::InvalidCredentials
    }

    pub fn issue_access_token(&self, email: &str) -> Result<String, JwtError> {
        self.issuer.issue_access_token(email)
    }

    pub fn issue_confirmation_token(&self, email: &str) -> Result<String, JwtError> {
        self.issuer.issue_confirmation_token(email)
    }

    /// Validate a token for the expected use and return its subject email.
    ///
    /// # Errors
    /// See [`CredentialValidator::resolve_subject`].
    pub fn resolve_subject(&self, token: &str, expected: TokenType) -> Result<String, AuthError> {
        self.validator.resolve_subject(token, expected)
    }
}
