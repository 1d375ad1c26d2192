//! Authentication utilities library
//!
//! Provides the authentication core shared by services:
//! - Password hashing (Argon2id)
//! - Signed, expiring, purpose-scoped tokens (HMAC JWT)
//! - Token validation with a uniform error taxonomy
//!
//! User lookup is not done here. Services own their persistence and call into
//! this crate with the stored hash or the presented token.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Authenticator, JwtHandler, TokenPolicy, TokenType};
//!
//! let auth = Authenticator::new(
//!     JwtHandler::hs256(b"secret_key_at_least_32_bytes_long!"),
//!     TokenPolicy::default(),
//! );
//!
//! let token = auth.issue_access_token("alice@example.com").unwrap();
//! let email = auth.resolve_subject(&token, TokenType::Access).unwrap();
//! assert_eq!(email, "alice@example.com");
//!
//! assert!(auth.resolve_subject(&token, TokenType::Confirmation).is_err());
//! ```

pub mod authenticator;
pub mod errors;
pub mod issuer;
pub mod jwt;
pub mod password;
pub mod policy;
pub mod validator;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use errors::AuthError;
pub use issuer::TokenIssuer;
pub use jsonwebtoken::Algorithm;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenClaims;
pub use jwt::TokenType;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use policy::TokenPolicy;
pub use validator::CredentialValidator;
