//! Driving port for cataloguing books.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::book::{Book, BookDraft};
use crate::domain::rating::RatingAggregate;

/// Domain use-case port for book mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookCommand: Send + Sync {
    /// Catalogue a new book with a zeroed review aggregate.
    ///
    /// Fails with a conflict when an active book with the same title and
    /// author already exists.
    async fn create_book(&self, draft: BookDraft) -> Result<Book, Error>;
}

/// Fixture implementation for tests that do not exercise book creation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookCommand;

#[async_trait]
impl BookCommand for FixtureBookCommand {
    async fn create_book(&self, draft: BookDraft) -> Result<Book, Error> {
        let now = Utc::now();
        Ok(Book {
            id: Uuid::new_v4(),
            title: draft.title,
            author: draft.author,
            description: draft.description,
            genre: draft.genre,
            aggregate: RatingAggregate::empty(),
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
        })
    }
}
