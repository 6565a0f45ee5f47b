//! Driving port for book reads: detail, listing, and search.

use async_trait::async_trait;
use pagination::{PageEnvelope, PageRequest};
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::book::{Book, BookFilter, BookSortField, SortOrder};
use crate::domain::ports::book_repository::ReviewWithAuthor;

/// A book together with a page of its active reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetail {
    /// The requested book.
    pub book: Book,
    /// A page of the book's active reviews, newest first.
    pub reviews: PageEnvelope<ReviewWithAuthor>,
}

/// Listing parameters bundled for the query port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBooksRequest {
    /// Optional exact case-insensitive filters.
    pub filter: BookFilter,
    /// Sort column.
    pub sort_field: BookSortField,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// Page to serve.
    pub page: PageRequest,
}

/// Domain use-case port for book reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookQuery: Send + Sync {
    /// Fetch a book and a page of its active reviews.
    ///
    /// Fails with not-found when the book is absent or soft-deleted.
    async fn get_book(
        &self,
        book_id: Uuid,
        reviews_page: PageRequest,
    ) -> Result<BookDetail, Error>;

    /// Page through the catalogue with filters and ordering.
    async fn list_books(&self, request: ListBooksRequest) -> Result<PageEnvelope<Book>, Error>;

    /// Page through books whose title or author contains the query.
    async fn search_books(
        &self,
        query: String,
        page: PageRequest,
    ) -> Result<PageEnvelope<Book>, Error>;
}

/// Fixture implementation for tests that do not exercise book reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookQuery;

#[async_trait]
impl BookQuery for FixtureBookQuery {
    async fn get_book(
        &self,
        book_id: Uuid,
        _reviews_page: PageRequest,
    ) -> Result<BookDetail, Error> {
        Err(Error::not_found(format!("book {book_id} not found")))
    }

    async fn list_books(&self, request: ListBooksRequest) -> Result<PageEnvelope<Book>, Error> {
        Ok(PageEnvelope::new(Vec::new(), 0, request.page))
    }

    async fn search_books(
        &self,
        _query: String,
        page: PageRequest,
    ) -> Result<PageEnvelope<Book>, Error> {
        Ok(PageEnvelope::new(Vec::new(), 0, page))
    }
}
