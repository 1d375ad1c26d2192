use thiserror::Error;

use crate::jwt::TokenType;

/// Every way authentication or authorization can fail.
///
/// All variants are terminal for the request and are meant to surface as an
/// "unauthorized" response. The `Display` text is the reason shown to clients.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Token Has Expired")]
    Expired,

    #[error("Invalid Token")]
    InvalidSignature,

    #[error("Token missing sub field")]
    MalformedClaims,

    #[error("Token has incorrect type, expected '{expected}'")]
    WrongType { expected: TokenType },

    #[error("Invalid Email or Password")]
    InvalidCredentials,

    #[error("User has not confirmed email")]
    Unconfirmed,

    #[error("{0}")]
    Unauthorized(String),
}
