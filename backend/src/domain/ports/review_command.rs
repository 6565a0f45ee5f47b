//! Driving port for the review lifecycle: submit, update, delete.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::rating::Rating;
use crate::domain::review::Review;
use crate::domain::user::UserId;

/// Request to submit a review for a book.
///
/// The caller identity is always explicit; handlers resolve it from the
/// session before building the request.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReviewRequest {
    /// The reviewed book.
    pub book_id: Uuid,
    /// The authenticated caller.
    pub user_id: UserId,
    /// Submitted rating.
    pub rating: Rating,
    /// Optional free-text comment.
    pub comment: Option<String>,
}

/// Request to change an existing review.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReviewRequest {
    /// The review to change.
    pub review_id: Uuid,
    /// The authenticated caller; must own the review.
    pub user_id: UserId,
    /// Replacement rating.
    pub rating: Rating,
    /// Replacement comment; `None` clears it.
    pub comment: Option<String>,
}

/// Request to soft-delete a review.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteReviewRequest {
    /// The review to soft-delete.
    pub review_id: Uuid,
    /// The authenticated caller; must own the review.
    pub user_id: UserId,
}

/// Domain use-case port for review mutations.
///
/// Every operation returns the affected review or a typed failure; the
/// paired book-aggregate update either persists with the review write or
/// not at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Create or resurrect the caller's review for a book.
    async fn submit_review(&self, request: SubmitReviewRequest) -> Result<Review, Error>;

    /// Change the rating/comment of the caller's review.
    async fn update_review(&self, request: UpdateReviewRequest) -> Result<Review, Error>;

    /// Soft-delete the caller's review.
    async fn delete_review(&self, request: DeleteReviewRequest) -> Result<Review, Error>;
}

/// Fixture implementation for tests that do not exercise review flows.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReviewCommand;

fn canned_review(id: Uuid, book_id: Uuid, user_id: UserId, rating: Rating) -> Review {
    let now = Utc::now();
    Review {
        id,
        book_id,
        user_id,
        rating,
        comment: None,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl ReviewCommand for FixtureReviewCommand {
    async fn submit_review(&self, request: SubmitReviewRequest) -> Result<Review, Error> {
        Ok(canned_review(
            Uuid::new_v4(),
            request.book_id,
            request.user_id,
            request.rating,
        ))
    }

    async fn update_review(&self, request: UpdateReviewRequest) -> Result<Review, Error> {
        Ok(canned_review(
            request.review_id,
            Uuid::new_v4(),
            request.user_id,
            request.rating,
        ))
    }

    async fn delete_review(&self, request: DeleteReviewRequest) -> Result<Review, Error> {
        let rating = Rating::new(3.0).map_err(|err| Error::internal(err.to_string()))?;
        let mut review = canned_review(
            request.review_id,
            Uuid::new_v4(),
            request.user_id,
            rating,
        );
        review.is_deleted = true;
        Ok(review)
    }
}
