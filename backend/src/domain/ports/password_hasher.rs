//! Port for credential hashing.
//!
//! The domain never sees how passwords are digested; adapters own the
//! encoding and can be swapped without touching account logic.

use crate::domain::auth::Password;

/// Errors raised by password hasher adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHasherError {
    /// The stored hash could not be parsed by this adapter.
    #[error("stored password hash is malformed: {message}")]
    Malformed {
        /// What failed to parse.
        message: String,
    },
}

impl PasswordHasherError {
    /// Create a malformed-hash error with the given message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Port for hashing and verifying passwords.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Digest a raw password into a self-describing encoded hash.
    fn hash(&self, password: &Password) -> String;

    /// Check a raw password against a stored encoded hash.
    fn verify(&self, password: &Password, encoded: &str) -> Result<bool, PasswordHasherError>;
}
