use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id).
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance configured with secure defaults
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with random salt generation, so hashing the same password
    /// twice yields two different strings.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        tracing::debug!("Hashing password");
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The digest comparison inside argon2 is constant time. A stored hash that
    /// cannot be parsed is treated as a mismatch.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        tracing::debug!("Verifying password");
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed_hash) => parsed_hash,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Build the throwaway hash used by [`verify_dummy`](Self::verify_dummy).
    ///
    /// Called once at startup so the first unknown-email login does not also
    /// pay for hashing.
    pub fn prepare_dummy(&self) {
        self.dummy_hash();
    }

    /// Spend the cost of one verification against a throwaway hash.
    ///
    /// Used when no stored hash exists for the presented identity, so that an
    /// unknown account takes as long to reject as a wrong password.
    pub fn verify_dummy(&self, password: &str) {
        if let Some(hash) = self.dummy_hash() {
            std::hint::black_box(self.verify(password, hash));
        }
    }

    fn dummy_hash(&self) -> Option<&'static str> {
        DUMMY_HASH
            .get_or_init(|| self.hash("dummy-password").ok())
            .as_deref()
    }
}

#[cfg(test)]
pub(crate) fn dummy_prepared() -> bool {
    matches!(DUMMY_HASH.get(), Some(Some(_)))
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
