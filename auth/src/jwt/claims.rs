use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Purpose a token was issued for.
///
/// Access and confirmation tokens are signed with the same key, so the type
/// claim is the only thing preventing one from being used as the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Confirmation,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Confirmation => "confirmation",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims as they travel inside a token.
///
/// Decoding is strict: unknown fields and a missing `exp` are rejected by the
/// codec. `sub` and `type` stay optional here so that the validator can tell a
/// token missing its subject apart from one carrying the wrong type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// Subject (user email)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// Token purpose, see [`TokenType`]
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub token_type: Option<String>,
}

/// Fully populated claims of an issued or validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
    pub token_type: TokenType,
}

impl TokenClaims {
    /// Create claims for `subject` expiring `ttl` from now.
    ///
    /// A negative `ttl` yields claims that are already expired.
    pub fn new(subject: impl ToString, token_type: TokenType, ttl: Duration) -> Self {
        Self {
            subject: subject.to_string(),
            expires_at: Utc::now() + ttl,
            token_type,
        }
    }
}

impl From<&TokenClaims> for Claims {
    fn from(claims: &TokenClaims) -> Self {
        Self {
            sub: Some(claims.subject.clone()),
            exp: claims.expires_at.timestamp(),
            token_type: Some(claims.token_type.as_str().to_string()),
        }
    }
}

impl Claims {
    /// Expiration as a UTC datetime, if the timestamp is representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}
