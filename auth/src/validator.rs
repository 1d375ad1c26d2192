use crate::errors::AuthError;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenClaims;
use crate::jwt::TokenType;

/// Turns a presented token into a trusted subject, or refuses it.
///
/// Checks run in a fixed order (expiry, signature, subject, type) and the
/// first violation wins.
#[derive(Clone)]
pub struct CredentialValidator {
    jwt_handler: JwtHandler,
}

impl CredentialValidator {
    pub fn new(jwt_handler: JwtHandler) -> Self {
        Self { jwt_handler }
    }

    /// Validate `token` for `expected` use and return its subject email.
    ///
    /// # Errors
    /// * `Expired` - Token expiry has passed
    /// * `InvalidSignature` - Signature or structure is invalid
    /// * `MalformedClaims` - Token has no `sub` claim
    /// * `WrongType` - Token type is missing or differs from `expected`
    pub fn resolve_subject(&self, token: &str, expected: TokenType) -> Result<String, AuthError> {
        self.validate(token, expected).map(|claims| claims.subject)
    }

    /// Same checks as [`resolve_subject`](Self::resolve_subject), returning all claims.
    pub fn validate(&self, token: &str, expected: TokenType) -> Result<TokenClaims, AuthError> {
        let claims = self.jwt_handler.decode(token).map_err(|e| {
            tracing::warn!(error = %e, "Token rejected by codec");
            match e {
                JwtError::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidSignature,
            }
        })?;

        let expires_at = claims.expires_at().ok_or(AuthError::InvalidSignature)?;

        let subject = claims.sub.ok_or_else(|| {
            tracing::warn!("Token has no subject");
            AuthError::MalformedClaims
        })?;

        match claims.token_type.as_deref() {
            Some(token_type) if token_type == expected.as_str() => Ok(TokenClaims {
                subject,
                expires_at,
                token_type: expected,
            }),
            other => {
                tracing::warn!(
                    expected = %expected,
                    actual = ?other,
                    "Token has the wrong type"
                );
                Err(AuthError::WrongType { expected })
            }
        }
    }
}
