//! Port for book persistence and review read models.

use async_trait::async_trait;
use pagination::{PageEnvelope, PageRequest};
use uuid::Uuid;

use crate::domain::book::{Book, BookDraft, BookFilter, BookSortField, SortOrder};
use crate::domain::review::Review;

/// Errors raised by book repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookRepositoryError {
    /// Repository connection could not be established.
    #[error("book repository connection failed: {message}")]
    Connection {
        /// Driver-facing description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("book repository query failed: {message}")]
    Query {
        /// Driver-facing description.
        message: String,
    },
    /// An active book with the same title and author already exists.
    #[error("a book with this title and author already exists")]
    DuplicateBook,
}

impl BookRepositoryError {
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

/// A review joined with its author's display names for book detail pages.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewWithAuthor {
    /// The active review.
    pub review: Review,
    /// Author's given name.
    pub author_first_name: String,
    /// Author's family name.
    pub author_last_name: String,
}

/// Port for book reads and writes.
///
/// Listing operations exclude soft-deleted books; `list_reviews` returns
/// active reviews only, newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Catalogue a new book; the duplicate check on the active
    /// `(title, author)` pair and the insert run in one atomic unit.
    async fn create(&self, draft: BookDraft) -> Result<Book, BookRepositoryError>;

    /// Look up a non-deleted book by id.
    async fn find_by_id(&self, book_id: Uuid) -> Result<Option<Book>, BookRepositoryError>;

    /// Page through non-deleted books with optional filters and ordering.
    async fn list(
        &self,
        filter: &BookFilter,
        sort_field: BookSortField,
        sort_order: SortOrder,
        page: PageRequest,
    ) -> Result<PageEnvelope<Book>, BookRepositoryError>;

    /// Page through non-deleted books whose title or author contains the
    /// query, case-insensitively.
    async fn search(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<PageEnvelope<Book>, BookRepositoryError>;

    /// Page through a book's active reviews, newest first.
    async fn list_reviews(
        &self,
        book_id: Uuid,
        page: PageRequest,
    ) -> Result<PageEnvelope<ReviewWithAuthor>, BookRepositoryError>;
}
