//! Review lifecycle domain service.
//!
//! Implements the [`ReviewCommand`] driving port over the [`ReviewStore`]
//! port, translating store failures into the client-facing error taxonomy.
//! Aggregate invariant breaches are logged and surfaced as internal errors;
//! they indicate stored state out of sync with the review rows, not a bad
//! request.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::domain::Error;
use crate::domain::ports::{
    DeleteReviewRequest, ReviewCommand, ReviewStore, ReviewStoreError, SubmitReviewRequest,
    UpdateReviewRequest,
};
use crate::domain::review::Review;

fn map_store_error(store_error: ReviewStoreError) -> Error {
    match store_error {
        ReviewStoreError::Connection { message } => {
            Error::service_unavailable(format!("review store unavailable: {message}"))
        }
        ReviewStoreError::Query { message } => {
            Error::internal(format!("review store error: {message}"))
        }
        ReviewStoreError::BookNotFound => Error::not_found("book not found"),
        ReviewStoreError::ReviewNotFound => Error::not_found("review not found"),
        ReviewStoreError::DuplicateReview => {
            Error::conflict("you have already reviewed this book")
        }
        ReviewStoreError::NotOwner => Error::forbidden("you do not own this review"),
        ReviewStoreError::Aggregate(aggregate_error) => {
            error!(
                error = %aggregate_error,
                "book aggregate out of sync with review rows"
            );
            Error::internal("book rating aggregate is inconsistent")
        }
    }
}

/// Review lifecycle service implementing the command driving port.
#[derive(Clone)]
pub struct ReviewCommandService<S> {
    review_store: Arc<S>,
}

impl<S> ReviewCommandService<S> {
    /// Create a new service over the review store.
    pub fn new(review_store: Arc<S>) -> Self {
        Self { review_store }
    }
}

#[async_trait]
impl<S> ReviewCommand for ReviewCommandService<S>
where
    S: ReviewStore,
{
    async fn submit_review(&self, request: SubmitReviewRequest) -> Result<Review, Error> {
        self.review_store
            .submit(
                request.book_id,
                request.user_id,
                request.rating,
                request.comment,
            )
            .await
            .map_err(map_store_error)
    }

    async fn update_review(&self, request: UpdateReviewRequest) -> Result<Review, Error> {
        self.review_store
            .update(
                request.review_id,
                request.user_id,
                request.rating,
                request.comment,
            )
            .await
            .map_err(map_store_error)
    }

    async fn delete_review(&self, request: DeleteReviewRequest) -> Result<Review, Error> {
        self.review_store
            .soft_delete(request.review_id, request.user_id)
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
