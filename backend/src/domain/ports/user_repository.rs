//! Port for account persistence.

use async_trait::async_trait;

use crate::domain::user::{EmailAddress, PersonName, User, UserId};

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Driver-facing description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Driver-facing description.
        message: String,
    },
    /// Another account already uses the email address.
    #[error("an account with this email already exists")]
    DuplicateEmail,
}

impl UserRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Insertable account record; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    /// Identifier for the new account.
    pub id: UserId,
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: PersonName,
    /// Unique contact address.
    pub email: EmailAddress,
    /// Encoded password hash from the hasher port.
    pub password_hash: String,
}

/// A stored account joined with its credential hash, for verification.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// The sanitized account.
    pub user: User,
    /// Encoded password hash.
    pub password_hash: String,
}

/// Port for account reads and writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account; the duplicate-email check and the insert run in
    /// one atomic unit.
    async fn create(&self, record: NewUserRecord) -> Result<User, UserRepositoryError>;

    /// Look up an account and its credential hash by email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<CredentialRecord>, UserRepositoryError>;

    /// Look up an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;
}
