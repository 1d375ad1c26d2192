use chrono::Duration;

use crate::jwt::TokenType;

/// Lifetimes applied when issuing tokens.
///
/// Shared by issuer and tests; negative values produce tokens that are
/// already expired when issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    access_token_expire_minutes: i64,
    confirm_token_expire_minutes: i64,
}

impl TokenPolicy {
    pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;
    pub const DEFAULT_CONFIRM_TOKEN_EXPIRE_MINUTES: i64 = 1440;

    pub fn new(access_token_expire_minutes: i64, confirm_token_expire_minutes: i64) -> Self {
        Self {
            access_token_expire_minutes,
            confirm_token_expire_minutes,
        }
    }

    pub fn access_token_expire_minutes(&self) -> i64 {
        self.access_token_expire_minutes
    }

    pub fn confirm_token_expire_minutes(&self) -> i64 {
        self.confirm_token_expire_minutes
    }

    /// Time-to-live for a token of the given type.
    pub fn ttl(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => Duration::minutes(self.access_token_expire_minutes),
            TokenType::Confirmation => Duration::minutes(self.confirm_token_expire_minutes),
        }
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
            Self::DEFAULT_CONFIRM_TOKEN_EXPIRE_MINUTES,
        )
    }
}
