//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain. Row-to-domain conversions live here so the
//! adapters share one validated path out of the database.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::book::Book;
use crate::domain::rating::{Rating, RatingAggregate};
use crate::domain::review::Review;
use crate::domain::user::{EmailAddress, PersonName, User, UserId};

use super::schema::{books, reviews, users};

// ---------------------------------------------------------------------------
// User models
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User::new(
            UserId::from_uuid(row.id),
            PersonName::new("firstName", row.first_name).map_err(|err| err.to_string())?,
            PersonName::new("lastName", row.last_name).map_err(|err| err.to_string())?,
            EmailAddress::new(row.email).map_err(|err| err.to_string())?,
        ))
    }
}

// ---------------------------------------------------------------------------
// Book models
// ---------------------------------------------------------------------------

/// Row struct for reading from the books table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub genre: String,
    pub avg_rating: f64,
    pub total_reviews: i32,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for cataloguing new books; aggregates start zeroed.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub author: &'a str,
    pub description: Option<&'a str>,
    pub genre: &'a str,
    pub created_by: Uuid,
}

/// Aggregate columns read under the book row lock.
#[derive(Debug, Clone, Copy, Queryable)]
pub(crate) struct BookAggregateRow {
    pub avg_rating: f64,
    pub total_reviews: i32,
}

/// Changeset writing the recomputed aggregate back to the book.
#[derive(Debug, Clone, Copy, AsChangeset)]
#[diesel(table_name = books)]
pub(crate) struct BookAggregateUpdate {
    pub avg_rating: f64,
    pub total_reviews: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            title: row.title,
            author: row.author,
            description: row.description,
            genre: row.genre,
            aggregate: RatingAggregate::new(row.avg_rating, row.total_reviews),
            created_by: UserId::from_uuid(row.created_by),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Review models
// ---------------------------------------------------------------------------

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub rating: f64,
    pub comment: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for fresh review rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub rating: f64,
    pub comment: Option<&'a str>,
}

/// Changeset resurrecting a soft-deleted review in place.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reviews)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ReviewReactivate<'a> {
    pub rating: f64,
    pub comment: Option<&'a str>,
    pub is_deleted: bool,
    pub updated_at: DateTime<Utc>,
}

/// Changeset applying a rating/comment change to an active review.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reviews)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ReviewRatingUpdate<'a> {
    pub rating: f64,
    pub comment: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset soft-deleting a review.
#[derive(Debug, Clone, Copy, AsChangeset)]
#[diesel(table_name = reviews)]
pub(crate) struct ReviewSoftDelete {
    pub is_deleted: bool,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = String;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Review {
            id: row.id,
            book_id: row.book_id,
            user_id: UserId::from_uuid(row.user_id),
            rating: Rating::new(row.rating)
                .map_err(|err| format!("stored rating out of range: {err}"))?,
            comment: row.comment,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
