//! Review entity and lifecycle branch resolution.
//!
//! A review row is never hard-deleted: soft-deleting it flips `is_deleted`
//! and removes it from the book aggregate, and a later submission by the
//! same user resurrects the row instead of inserting a second one. The
//! branch between create, resurrect, and reject lives here as a pure
//! function so it can be tested independently of storage.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::rating::Rating;
use crate::domain::user::UserId;

/// A user's review of a book.
///
/// ## Invariants
/// - At most one review per `(book_id, user_id)` pair has
///   `is_deleted == false`.
/// - `rating` is within `[1.0, 5.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    /// Stable review identifier; survives soft-delete and resurrection.
    pub id: Uuid,
    /// The reviewed book.
    pub book_id: Uuid,
    /// The review's owner; only this user may update or delete it.
    pub user_id: UserId,
    /// The submitted rating.
    pub rating: Rating,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Soft-delete flag; deleted reviews are excluded from the aggregate.
    pub is_deleted: bool,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Whether this review is counted in its book's aggregate.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Whether the given caller owns this review.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

/// The resolved branch for a review submission.
///
/// Resolution happens before any mutation so the aggregate-delta choice
/// (full add vs. none) stays explicit rather than hiding behind a storage
/// upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionAction {
    /// No row exists for the pair; insert a fresh one.
    Create,
    /// A soft-deleted row exists; reactivate it in place.
    Resurrect {
        /// Identifier of the row to reactivate.
        review_id: Uuid,
    },
    /// An active row already exists; the submission must be rejected.
    AlreadyActive,
}

impl SubmissionAction {
    /// Resolve the submission branch from the existing row for the
    /// `(book_id, user_id)` pair, looked up regardless of `is_deleted`.
    pub fn resolve(existing: Option<&Review>) -> Self {
        match existing {
            None => Self::Create,
            Some(review) if review.is_deleted => Self::Resurrect {
                review_id: review.id,
            },
            Some(_) => Self::AlreadyActive,
        }
    }
}
