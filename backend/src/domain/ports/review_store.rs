//! Port for the atomic review-mutation protocol.
//!
//! Each operation pairs a review write with the owning book's aggregate
//! update inside one transaction: either both persist or neither does.
//! Implementations must serialise operations touching the same book (the
//! PostgreSQL adapter locks the book row `FOR UPDATE`); operations on
//! different books may proceed concurrently.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::rating::{AggregateError, Rating};
use crate::domain::review::Review;
use crate::domain::user::UserId;

/// Errors raised by review store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewStoreError {
    /// Store connection could not be established.
    #[error("review store connection failed: {message}")]
    Connection {
        /// Driver-facing description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("review store query failed: {message}")]
    Query {
        /// Driver-facing description.
        message: String,
    },
    /// The target book does not exist or is soft-deleted.
    #[error("book not found")]
    BookNotFound,
    /// The target review does not exist or is soft-deleted.
    #[error("review not found")]
    ReviewNotFound,
    /// The caller already has an active review for this book.
    #[error("book already reviewed by this user")]
    DuplicateReview,
    /// The caller does not own the target review.
    #[error("review belongs to another user")]
    NotOwner,
    /// The stored aggregate disagrees with the review rows. The enclosing
    /// transaction is already rolled back when this surfaces.
    #[error("aggregate invariant violated: {0}")]
    Aggregate(#[from] AggregateError),
}

impl ReviewStoreError {
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

/// Port for atomic review mutations with paired aggregate maintenance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Submit a review for `(book_id, user_id)`.
    ///
    /// Resolves the lifecycle branch under the book lock: an active review
    /// fails with [`ReviewStoreError::DuplicateReview`]; a soft-deleted one
    /// is resurrected in place; otherwise a fresh row is inserted. Both
    /// non-failure branches count as a fresh aggregate add.
    async fn submit(
        &self,
        book_id: Uuid,
        user_id: UserId,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Review, ReviewStoreError>;

    /// Change the rating/comment of the caller's active review, adjusting
    /// the aggregate by the rating delta.
    async fn update(
        &self,
        review_id: Uuid,
        caller: UserId,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Review, ReviewStoreError>;

    /// Soft-delete the caller's active review, retracting its rating from
    /// the aggregate. The row is retained for resurrection and history.
    async fn soft_delete(
        &self,
        review_id: Uuid,
        caller: UserId,
    ) -> Result<Review, ReviewStoreError>;
}
