//! Book catalogue domain services.
//!
//! Command and query services over the [`BookRepository`] port. Book rows
//! are only ever created here; their review aggregates are maintained
//! exclusively by the review protocol.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageEnvelope, PageRequest};
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::book::{Book, BookDraft};
use crate::domain::ports::{
    BookCommand, BookDetail, BookQuery, BookRepository, BookRepositoryError, ListBooksRequest,
};

fn map_repository_error(repository_error: BookRepositoryError) -> Error {
    match repository_error {
        BookRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("book repository unavailable: {message}"))
        }
        BookRepositoryError::Query { message } => {
            Error::internal(format!("book repository error: {message}"))
        }
        BookRepositoryError::DuplicateBook => {
            Error::conflict("a book with this title and author already exists")
        }
    }
}

/// Book service implementing the command driving port.
#[derive(Clone)]
pub struct BookCommandService<R> {
    book_repo: Arc<R>,
}

impl<R> BookCommandService<R> {
    /// Create a new command service over the book repository.
    pub fn new(book_repo: Arc<R>) -> Self {
        Self { book_repo }
    }
}

#[async_trait]
impl<R> BookCommand for BookCommandService<R>
where
    R: BookRepository,
{
    async fn create_book(&self, draft: BookDraft) -> Result<Book, Error> {
        self.book_repo
            .create(draft)
            .await
            .map_err(map_repository_error)
    }
}

/// Book service implementing the query driving port.
#[derive(Clone)]
pub struct BookQueryService<R> {
    book_repo: Arc<R>,
}

impl<R> BookQueryService<R> {
    /// Create a new query service over the book repository.
    pub fn new(book_repo: Arc<R>) -> Self {
        Self { book_repo }
    }
}

#[async_trait]
impl<R> BookQuery for BookQueryService<R>
where
    R: BookRepository,
{
    async fn get_book(
        &self,
        book_id: Uuid,
        reviews_page: PageRequest,
    ) -> Result<BookDetail, Error> {
        let book = self
            .book_repo
            .find_by_id(book_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("book {book_id} not found")))?;

        let reviews = self
            .book_repo
            .list_reviews(book_id, reviews_page)
            .await
            .map_err(map_repository_error)?;

        Ok(BookDetail { book, reviews })
    }

    async fn list_books(&self, request: ListBooksRequest) -> Result<PageEnvelope<Book>, Error> {
        self.book_repo
            .list(
                &request.filter,
                request.sort_field,
                request.sort_order,
                request.page,
            )
            .await
            .map_err(map_repository_error)
    }

    async fn search_books(
        &self,
        query: String,
        page: PageRequest,
    ) -> Result<PageEnvelope<Book>, Error> {
        self.book_repo
            .search(&query, page)
            .await
            .map_err(map_repository_error)
    }
}
