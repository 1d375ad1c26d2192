use thiserror::Error;

/// Error type for token encoding and decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token signature has expired")]
    ExpiredSignature,

    #[error("Token signature is invalid: {0}")]
    InvalidSignature(String),

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
}
