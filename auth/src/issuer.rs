use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenClaims;
use crate::jwt::TokenType;
use crate::policy::TokenPolicy;

/// Builds signed access and confirmation tokens.
///
/// The only identity in a token is the subject email; there are no role or
/// permission claims.
#[derive(Clone)]
pub struct TokenIssuer {
    jwt_handler: JwtHandler,
    policy: TokenPolicy,
}

impl TokenIssuer {
    pub fn new(jwt_handler: JwtHandler, policy: TokenPolicy) -> Self {
        Self {
            jwt_handler,
            policy,
        }
    }

    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Issue a short-lived token authorizing API access.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_access_token(&self, email: &str) -> Result<String, JwtError> {
        self.issue(email, TokenType::Access)
    }

    /// Issue a token proving ownership of `email`, sent in the confirmation link.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_confirmation_token(&self, email: &str) -> Result<String, JwtError> {
        self.issue(email, TokenType::Confirmation)
    }

    fn issue(&self, email: &str, token_type: TokenType) -> Result<String, JwtError> {
        let claims = TokenClaims::new(email, token_type, self.policy.ttl(token_type));
        tracing::debug!(
            token_type = %token_type,
            expires_at = %claims.expires_at,
            "Issuing token"
        );

        self.jwt_handler.encode(&Claims::from(&claims))
    }
}
