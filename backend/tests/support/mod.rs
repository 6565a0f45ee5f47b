//! Test doubles for the review lifecycle integration suite.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use backend::domain::ports::{ReviewStore, ReviewStoreError};
use backend::domain::rating::{Rating, RatingAggregate};
use backend::domain::review::{Review, SubmissionAction};
use backend::domain::user::UserId;

#[derive(Debug, Clone, Copy)]
struct BookRecord {
    aggregate: RatingAggregate,
    is_deleted: bool,
}

#[derive(Default)]
struct StoreState {
    books: HashMap<Uuid, BookRecord>,
    reviews: HashMap<Uuid, Review>,
}

/// In-memory `ReviewStore` implementing the full protocol with the same
/// domain functions as the PostgreSQL adapter. One mutex guards the whole
/// mutation, standing in for the adapter's per-operation transaction; every
/// failure path returns before any state is touched.
#[derive(Default)]
pub struct InMemoryReviewStore {
    state: Mutex<StoreState>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a book with a zeroed aggregate.
    pub fn insert_book(&self, book_id: Uuid) {
        let mut state = self.state.lock().expect("store lock");
        state.books.insert(
            book_id,
            BookRecord {
                aggregate: RatingAggregate::empty(),
                is_deleted: false,
            },
        );
    }

    /// Soft-delete a seeded book.
    pub fn soft_delete_book(&self, book_id: Uuid) {
        let mut state = self.state.lock().expect("store lock");
        if let Some(book) = state.books.get_mut(&book_id) {
            book.is_deleted = true;
        }
    }

    /// The stored aggregate for a book.
    pub fn aggregate(&self, book_id: Uuid) -> RatingAggregate {
        let state = self.state.lock().expect("store lock");
        state
            .books
            .get(&book_id)
            .map(|book| book.aggregate)
            .expect("book seeded")
    }

    /// All active reviews for a book.
    pub fn active_reviews(&self, book_id: Uuid) -> Vec<Review> {
        let state = self.state.lock().expect("store lock");
        state
            .reviews
            .values()
            .filter(|review| review.book_id == book_id && review.is_active())
            .cloned()
            .collect()
    }

    /// Total rows (active and soft-deleted) for a `(book, user)` pair.
    pub fn row_count(&self, book_id: Uuid, user_id: UserId) -> usize {
        let state = self.state.lock().expect("store lock");
        state
            .reviews
            .values()
            .filter(|review| review.book_id == book_id && review.user_id == user_id)
            .count()
    }

    /// Assert the stored aggregate matches the active review set: the count
    /// exactly, the mean within 2-decimal rounding tolerance.
    pub fn assert_consistent(&self, book_id: Uuid) {
        let active = self.active_reviews(book_id);
        let aggregate = self.aggregate(book_id);

        assert_eq!(
            aggregate.total_reviews(),
            i32::try_from(active.len()).expect("count fits"),
            "total_reviews must equal the active review count"
        );

        if active.is_empty() {
            assert_eq!(aggregate.avg_rating(), 0.0, "empty books read as 0");
        } else {
            let exact: f64 = active.iter().map(|review| review.rating.value()).sum::<f64>()
                / active.len() as f64;
            assert!(
                (aggregate.avg_rating() - exact).abs() < 0.01,
                "avg_rating {} drifted from exact mean {exact}",
                aggregate.avg_rating()
            );
        }
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn submit(
        &self,
        book_id: Uuid,
        user_id: UserId,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Review, ReviewStoreError> {
        let mut state = self.state.lock().expect("store lock");

        let aggregate = state
            .books
            .get(&book_id)
            .filter(|book| !book.is_deleted)
            .map(|book| book.aggregate)
            .ok_or(ReviewStoreError::BookNotFound)?;

        let existing = state
            .reviews
            .values()
            .find(|review| review.book_id == book_id && review.user_id == user_id)
            .cloned();

        let now = Utc::now();
        let written = match SubmissionAction::resolve(existing.as_ref()) {
            SubmissionAction::AlreadyActive => return Err(ReviewStoreError::DuplicateReview),
            SubmissionAction::Resurrect { review_id } => {
                let review = state
                    .reviews
                    .get_mut(&review_id)
                    .ok_or(ReviewStoreError::ReviewNotFound)?;
                review.rating = rating;
                review.comment = comment;
                review.is_deleted = false;
                review.updated_at = now;
                review.clone()
            }
            SubmissionAction::Create => {
                let review = Review {
                    id: Uuid::new_v4(),
                    book_id,
                    user_id,
                    rating,
                    comment,
                    is_deleted: false,
                    created_at: now,
                    updated_at: now,
                };
                state.reviews.insert(review.id, review.clone());
                review
            }
        };

        let book = state.books.get_mut(&book_id).expect("book checked above");
        book.aggregate = aggregate.with_added(rating);
        Ok(written)
    }

    async fn update(
        &self,
        review_id: Uuid,
        caller: UserId,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Review, ReviewStoreError> {
        let mut state = self.state.lock().expect("store lock");

        let current = state
            .reviews
            .get(&review_id)
            .cloned()
            .ok_or(ReviewStoreError::ReviewNotFound)?;
        if current.is_deleted {
            return Err(ReviewStoreError::ReviewNotFound);
        }
        if !current.is_owned_by(&caller) {
            return Err(ReviewStoreError::NotOwner);
        }

        let aggregate = state
            .books
            .get(&current.book_id)
            .filter(|book| !book.is_deleted)
            .map(|book| book.aggregate)
            .ok_or(ReviewStoreError::BookNotFound)?;
        let next = aggregate.with_changed(current.rating, rating)?;

        let review = state
            .reviews
            .get_mut(&review_id)
            .expect("review checked above");
        review.rating = rating;
        review.comment = comment;
        review.updated_at = Utc::now();
        let written = review.clone();

        let book = state
            .books
            .get_mut(&written.book_id)
            .expect("book checked above");
        book.aggregate = next;
        Ok(written)
    }

    async fn soft_delete(
        &self,
        review_id: Uuid,
        caller: UserId,
    ) -> Result<Review, ReviewStoreError> {
        let mut state = self.state.lock().expect("store lock");

        let current = state
            .reviews
            .get(&review_id)
            .cloned()
            .ok_or(ReviewStoreError::ReviewNotFound)?;
        if current.is_deleted {
            return Err(ReviewStoreError::ReviewNotFound);
        }
        if !current.is_owned_by(&caller) {
            return Err(ReviewStoreError::NotOwner);
        }

        let aggregate = state
            .books
            .get(&current.book_id)
            .filter(|book| !book.is_deleted)
            .map(|book| book.aggregate)
            .ok_or(ReviewStoreError::BookNotFound)?;
        let next = aggregate.with_retracted(current.rating)?;

        let review = state
            .reviews
            .get_mut(&review_id)
            .expect("review checked above");
        review.is_deleted = true;
        review.updated_at = Utc::now();
        let written = review.clone();

        let book = state
            .books
            .get_mut(&written.book_id)
            .expect("book checked above");
        book.aggregate = next;
        Ok(written)
    }
}
