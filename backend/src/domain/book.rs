//! Book entity, creation draft, and listing query types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::rating::RatingAggregate;
use crate::domain::user::UserId;

/// Validation errors for book creation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookValidationError {
    /// A required text field was empty once trimmed.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Which field failed.
        field: &'static str,
    },
}

/// A catalogued book with its denormalised review aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    /// Stable book identifier.
    pub id: Uuid,
    /// Title as catalogued.
    pub title: String,
    /// Author as catalogued.
    pub author: String,
    /// Optional blurb.
    pub description: Option<String>,
    /// Genre label used for filtering.
    pub genre: String,
    /// The `(avg_rating, total_reviews)` pair maintained by the review
    /// protocol; mutated only as a side effect of review transitions.
    pub aggregate: RatingAggregate,
    /// The user who catalogued the book.
    pub created_by: UserId,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for cataloguing a new book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    /// Title; non-empty.
    pub title: String,
    /// Author; non-empty.
    pub author: String,
    /// Optional blurb.
    pub description: Option<String>,
    /// Genre label; non-empty.
    pub genre: String,
    /// The cataloguing user.
    pub created_by: UserId,
}

fn required(field: &'static str, value: String) -> Result<String, BookValidationError> {
    if value.trim().is_empty() {
        return Err(BookValidationError::EmptyField { field });
    }
    Ok(value)
}

impl BookDraft {
    /// Validate and construct a draft from raw request parts.
    pub fn try_from_parts(
        title: impl Into<String>,
        author: impl Into<String>,
        description: Option<String>,
        genre: impl Into<String>,
        created_by: UserId,
    ) -> Result<Self, BookValidationError> {
        Ok(Self {
            title: required("title", title.into())?,
            author: required("author", author.into())?,
            description,
            genre: required("genre", genre.into())?,
            created_by,
        })
    }
}

/// Sortable columns for book listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSortField {
    /// Sort by title.
    Title,
    /// Sort by author.
    Author,
    /// Sort by genre.
    Genre,
    /// Sort by creation time; the default.
    #[default]
    CreatedAt,
}

impl FromStr for BookSortField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "genre" => Ok(Self::Genre),
            "createdAt" => Ok(Self::CreatedAt),
            _ => Err(()),
        }
    }
}

/// Sort direction for book listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending; the default, pairing with [`BookSortField::CreatedAt`]
    /// to show newest books first.
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(()),
        }
    }
}

/// Exact, case-insensitive listing filters; all optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookFilter {
    /// Match on author.
    pub author: Option<String>,
    /// Match on genre.
    pub genre: Option<String>,
    /// Match on title.
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", "Author", "Genre", "title")]
    #[case("Title", "  ", "Genre", "author")]
    #[case("Title", "Author", "", "genre")]
    fn draft_rejects_blank_required_fields(
        #[case] title: &str,
        #[case] author: &str,
        #[case] genre: &str,
        #[case] expected_field: &'static str,
    ) {
        let result = BookDraft::try_from_parts(title, author, None, genre, UserId::random());
        assert_eq!(
            result,
            Err(BookValidationError::EmptyField {
                field: expected_field
            })
        );
    }

    #[rstest]
    fn draft_keeps_optional_description() {
        let draft = BookDraft::try_from_parts(
            "Frankenstein",
            "Mary Shelley",
            Some("A modern Prometheus".to_owned()),
            "Gothic",
            UserId::random(),
        )
        .expect("valid draft");
        assert_eq!(draft.description.as_deref(), Some("A modern Prometheus"));
    }

    #[rstest]
    #[case("title", BookSortField::Title)]
    #[case("createdAt", BookSortField::CreatedAt)]
    fn sort_field_parses_known_values(#[case] raw: &str, #[case] expected: BookSortField) {
        assert_eq!(raw.parse::<BookSortField>(), Ok(expected));
    }

    #[rstest]
    fn sort_field_rejects_unknown_values() {
        assert!("ratings".parse::<BookSortField>().is_err());
    }

    #[rstest]
    fn defaults_are_newest_first() {
        assert_eq!(BookSortField::default(), BookSortField::CreatedAt);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }
}
