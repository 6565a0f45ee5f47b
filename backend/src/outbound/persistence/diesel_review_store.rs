//! PostgreSQL-backed `ReviewStore` implementation using Diesel ORM.
//!
//! Every operation runs as one scoped transaction pairing the review write
//! with the owning book's aggregate update. The book row is locked
//! `FOR UPDATE` before any lifecycle decision is made, so concurrent
//! mutations of the same book serialise on that lock: two first-ever
//! submissions cannot both pass the duplicate check, and two adjustments
//! cannot compute from the same stale aggregate. Mutations of different
//! books never contend.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ReviewStore, ReviewStoreError};
use crate::domain::rating::{Rating, RatingAggregate};
use crate::domain::review::{Review, SubmissionAction};
use crate::domain::user::UserId;

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    BookAggregateRow, BookAggregateUpdate, NewReviewRow, ReviewRatingUpdate, ReviewReactivate,
    ReviewRow, ReviewSoftDelete,
};
use super::pool::DbPool;
use super::schema::{books, reviews};

/// Diesel-backed implementation of the review store port.
#[derive(Clone)]
pub struct DieselReviewStore {
    pool: DbPool,
}

impl DieselReviewStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<diesel::result::Error> for ReviewStoreError {
    fn from(error: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        // The only unique constraint this store can trip is the partial
        // index backing the one-active-review invariant.
        if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
            return Self::DuplicateReview;
        }
        map_diesel_error(error, Self::query, Self::connection)
    }
}

fn to_domain(row: ReviewRow) -> Result<Review, ReviewStoreError> {
    Review::try_from(row).map_err(ReviewStoreError::query)
}

/// Lock the book's aggregate columns, serialising against every other
/// mutation of the same book. Soft-deleted and missing books both read as
/// absent.
async fn lock_book_aggregate(
    conn: &mut AsyncPgConnection,
    book_id: Uuid,
) -> Result<RatingAggregate, ReviewStoreError> {
    let row: Option<BookAggregateRow> = books::table
        .filter(books::id.eq(book_id).and(books::is_deleted.eq(false)))
        .select((books::avg_rating, books::total_reviews))
        .for_update()
        .first::<BookAggregateRow>(conn)
        .await
        .optional()?;

    row.map(|aggregate| RatingAggregate::new(aggregate.avg_rating, aggregate.total_reviews))
        .ok_or(ReviewStoreError::BookNotFound)
}

async fn write_book_aggregate(
    conn: &mut AsyncPgConnection,
    book_id: Uuid,
    aggregate: RatingAggregate,
) -> Result<(), ReviewStoreError> {
    diesel::update(books::table.find(book_id))
        .set(&BookAggregateUpdate {
            avg_rating: aggregate.avg_rating(),
            total_reviews: aggregate.total_reviews(),
            updated_at: Utc::now(),
        })
        .execute(conn)
        .await?;
    Ok(())
}

/// Fetch the caller's active review by id, enforcing existence and
/// ownership. Soft-deleted rows read as absent.
async fn find_active_owned(
    conn: &mut AsyncPgConnection,
    review_id: Uuid,
    caller: &UserId,
) -> Result<ReviewRow, ReviewStoreError> {
    let row: Option<ReviewRow> = reviews::table
        .find(review_id)
        .select(ReviewRow::as_select())
        .first(conn)
        .await
        .optional()?;

    let row = row.ok_or(ReviewStoreError::ReviewNotFound)?;
    if row.is_deleted {
        return Err(ReviewStoreError::ReviewNotFound);
    }
    if row.user_id != *caller.as_uuid() {
        return Err(ReviewStoreError::NotOwner);
    }
    Ok(row)
}

#[async_trait]
impl ReviewStore for DieselReviewStore {
    async fn submit(
        &self,
        book_id: Uuid,
        user_id: UserId,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Review, ReviewStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewStoreError::connection))?;

        conn.transaction(|conn| {
            async move {
                let aggregate = lock_book_aggregate(conn, book_id).await?;

                // The lookup ignores is_deleted so a soft-deleted row is
                // found and resurrected instead of duplicated.
                let existing: Option<ReviewRow> = reviews::table
                    .filter(
                        reviews::book_id
                            .eq(book_id)
                            .and(reviews::user_id.eq(user_id.as_uuid())),
                    )
                    .order((reviews::is_deleted.asc(), reviews::updated_at.desc()))
                    .select(ReviewRow::as_select())
                    .first(conn)
                    .await
                    .optional()?;
                let existing = existing.map(to_domain).transpose()?;

                let now = Utc::now();
                let written: ReviewRow = match SubmissionAction::resolve(existing.as_ref()) {
                    SubmissionAction::AlreadyActive => {
                        return Err(ReviewStoreError::DuplicateReview);
                    }
                    SubmissionAction::Resurrect { review_id } => {
                        diesel::update(reviews::table.find(review_id))
                            .set(&ReviewReactivate {
                                rating: rating.value(),
                                comment: comment.as_deref(),
                                is_deleted: false,
                                updated_at: now,
                            })
                            .returning(ReviewRow::as_returning())
                            .get_result(conn)
                            .await?
                    }
                    SubmissionAction::Create => {
                        diesel::insert_into(reviews::table)
                            .values(&NewReviewRow {
                                id: Uuid::new_v4(),
                                book_id,
                                user_id: *user_id.as_uuid(),
                                rating: rating.value(),
                                comment: comment.as_deref(),
                            })
                            .returning(ReviewRow::as_returning())
                            .get_result(conn)
                            .await?
                    }
                };

                // Both branches add a previously-uncounted review.
                write_book_aggregate(conn, book_id, aggregate.with_added(rating)).await?;

                to_domain(written)
            }
            .scope_boxed()
        })
        .await
    }

    async fn update(
        &self,
        review_id: Uuid,
        caller: UserId,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Review, ReviewStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewStoreError::connection))?;

        conn.transaction(|conn| {
            async move {
                // First read resolves existence/ownership and the owning
                // book; the authoritative re-read happens under the lock.
                let preview = find_active_owned(conn, review_id, &caller).await?;
                let book_id = preview.book_id;

                let aggregate = lock_book_aggregate(conn, book_id).await?;
                let current = find_active_owned(conn, review_id, &caller).await?;
                let old_rating = Rating::new(current.rating)
                    .map_err(|err| ReviewStoreError::query(err.to_string()))?;

                let written: ReviewRow = diesel::update(reviews::table.find(review_id))
                    .set(&ReviewRatingUpdate {
                        rating: rating.value(),
                        comment: comment.as_deref(),
                        updated_at: Utc::now(),
                    })
                    .returning(ReviewRow::as_returning())
                    .get_result(conn)
                    .await?;

                write_book_aggregate(conn, book_id, aggregate.with_changed(old_rating, rating)?)
                    .await?;

                to_domain(written)
            }
            .scope_boxed()
        })
        .await
    }

    async fn soft_delete(
        &self,
        review_id: Uuid,
        caller: UserId,
    ) -> Result<Review, ReviewStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewStoreError::connection))?;

        conn.transaction(|conn| {
            async move {
                let preview = find_active_owned(conn, review_id, &caller).await?;
                let book_id = preview.book_id;

                let aggregate = lock_book_aggregate(conn, book_id).await?;
                let current = find_active_owned(conn, review_id, &caller).await?;
                let old_rating = Rating::new(current.rating)
                    .map_err(|err| ReviewStoreError::query(err.to_string()))?;

                let written: ReviewRow = diesel::update(reviews::table.find(review_id))
                    .set(&ReviewSoftDelete {
                        is_deleted: true,
                        updated_at: Utc::now(),
                    })
                    .returning(ReviewRow::as_returning())
                    .get_result(conn)
                    .await?;

                write_book_aggregate(conn, book_id, aggregate.with_retracted(old_rating)?).await?;

                to_domain(written)
            }
            .scope_boxed()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping; transactional behaviour is
    //! covered end-to-end in the integration suite.

    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn unique_violation_maps_to_duplicate_review() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_owned()),
        );
        assert_eq!(
            ReviewStoreError::from(error),
            ReviewStoreError::DuplicateReview
        );
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("gone".to_owned()),
        );
        assert!(matches!(
            ReviewStoreError::from(error),
            ReviewStoreError::Connection { .. }
        ));
    }

    #[rstest]
    fn other_errors_map_to_query_errors() {
        assert!(matches!(
            ReviewStoreError::from(DieselError::NotFound),
            ReviewStoreError::Query { .. }
        ));
    }
}
