//! PostgreSQL-backed `BookRepository` implementation using Diesel ORM.
//!
//! Listing queries are built once as boxed statements and reused for both
//! the page fetch and the matching count, so the two can never disagree on
//! their filters.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use pagination::{PageEnvelope, PageRequest};
use uuid::Uuid;

use crate::domain::book::{Book, BookDraft, BookFilter, BookSortField, SortOrder};
use crate::domain::ports::{BookRepository, BookRepositoryError, ReviewWithAuthor};
use crate::domain::review::Review;

use super::diesel_error_mapping::{escape_like, map_diesel_error, map_pool_error};
use super::models::{BookRow, NewBookRow, ReviewRow};
use super::pool::DbPool;
use super::schema::{books, reviews, users};

/// Diesel-backed implementation of the book repository port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<diesel::result::Error> for BookRepositoryError {
    fn from(error: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        // The partial unique index on active (title, author) pairs
        // backstops the in-transaction check.
        if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
            return Self::DuplicateBook;
        }
        map_diesel_error(error, Self::query, Self::connection)
    }
}

fn to_count(total: i64) -> u64 {
    u64::try_from(total).unwrap_or_default()
}

/// Boxed base query over non-deleted books with the exact case-insensitive
/// filters applied.
fn filtered_books(filter: &BookFilter) -> books::BoxedQuery<'static, Pg> {
    let mut query = books::table
        .into_boxed()
        .filter(books::is_deleted.eq(false));
    if let Some(author) = &filter.author {
        query = query.filter(books::author.ilike(escape_like(author)));
    }
    if let Some(genre) = &filter.genre {
        query = query.filter(books::genre.ilike(escape_like(genre)));
    }
    if let Some(title) = &filter.title {
        query = query.filter(books::title.ilike(escape_like(title)));
    }
    query
}

/// Boxed base query over non-deleted books matching the search term on
/// title or author.
fn searched_books(term: &str) -> books::BoxedQuery<'static, Pg> {
    let pattern = format!("%{}%", escape_like(term));
    books::table
        .into_boxed()
        .filter(books::is_deleted.eq(false))
        .filter(
            books::title
                .ilike(pattern.clone())
                .or(books::author.ilike(pattern)),
        )
}

fn ordered(
    query: books::BoxedQuery<'static, Pg>,
    sort_field: BookSortField,
    sort_order: SortOrder,
) -> books::BoxedQuery<'static, Pg> {
    match (sort_field, sort_order) {
        (BookSortField::Title, SortOrder::Asc) => query.order(books::title.asc()),
        (BookSortField::Title, SortOrder::Desc) => query.order(books::title.desc()),
        (BookSortField::Author, SortOrder::Asc) => query.order(books::author.asc()),
        (BookSortField::Author, SortOrder::Desc) => query.order(books::author.desc()),
        (BookSortField::Genre, SortOrder::Asc) => query.order(books::genre.asc()),
        (BookSortField::Genre, SortOrder::Desc) => query.order(books::genre.desc()),
        (BookSortField::CreatedAt, SortOrder::Asc) => {
            query.order((books::created_at.asc(), books::id.asc()))
        }
        (BookSortField::CreatedAt, SortOrder::Desc) => {
            query.order((books::created_at.desc(), books::id.desc()))
        }
    }
}

impl DieselBookRepository {
    async fn load_book_page(
        &self,
        rows_query: books::BoxedQuery<'static, Pg>,
        count_query: books::BoxedQuery<'static, Pg>,
        page: PageRequest,
    ) -> Result<PageEnvelope<Book>, BookRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BookRepositoryError::connection))?;

        let rows: Vec<BookRow> = rows_query
            .offset(page.offset())
            .limit(page.limit())
            .select(BookRow::as_select())
            .load(&mut conn)
            .await?;

        let total: i64 = count_query.count().get_result(&mut conn).await?;

        let items = rows.into_iter().map(Book::from).collect();
        Ok(PageEnvelope::new(items, to_count(total), page))
    }
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn create(&self, draft: BookDraft) -> Result<Book, BookRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BookRepositoryError::connection))?;

        conn.transaction(|conn| {
            async move {
                let existing: Option<Uuid> = books::table
                    .filter(
                        books::title
                            .ilike(escape_like(&draft.title))
                            .and(books::author.ilike(escape_like(&draft.author)))
                            .and(books::is_deleted.eq(false)),
                    )
                    .select(books::id)
                    .first(conn)
                    .await
                    .optional()?;
                if existing.is_some() {
                    return Err(BookRepositoryError::DuplicateBook);
                }

                let row: BookRow = diesel::insert_into(books::table)
                    .values(&NewBookRow {
                        id: Uuid::new_v4(),
                        title: &draft.title,
                        author: &draft.author,
                        description: draft.description.as_deref(),
                        genre: &draft.genre,
                        created_by: *draft.created_by.as_uuid(),
                    })
                    .returning(BookRow::as_returning())
                    .get_result(conn)
                    .await?;

                Ok(Book::from(row))
            }
            .scope_boxed()
        })
        .await
    }

    async fn find_by_id(&self, book_id: Uuid) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BookRepositoryError::connection))?;

        let row: Option<BookRow> = books::table
            .filter(books::id.eq(book_id).and(books::is_deleted.eq(false)))
            .select(BookRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(row.map(Book::from))
    }

    async fn list(
        &self,
        filter: &BookFilter,
        sort_field: BookSortField,
        sort_order: SortOrder,
        page: PageRequest,
    ) -> Result<PageEnvelope<Book>, BookRepositoryError> {
        let rows_query = ordered(filtered_books(filter), sort_field, sort_order);
        let count_query = filtered_books(filter);
        self.load_book_page(rows_query, count_query, page).await
    }

    async fn search(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<PageEnvelope<Book>, BookRepositoryError> {
        let rows_query = ordered(
            searched_books(query),
            BookSortField::CreatedAt,
            SortOrder::Desc,
        );
        let count_query = searched_books(query);
        self.load_book_page(rows_query, count_query, page).await
    }

    async fn list_reviews(
        &self,
        book_id: Uuid,
        page: PageRequest,
    ) -> Result<PageEnvelope<ReviewWithAuthor>, BookRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BookRepositoryError::connection))?;

        let rows: Vec<(ReviewRow, String, String)> = reviews::table
            .inner_join(users::table)
            .filter(
                reviews::book_id
                    .eq(book_id)
                    .and(reviews::is_deleted.eq(false)),
            )
            .order((reviews::created_at.desc(), reviews::id.desc()))
            .offset(page.offset())
            .limit(page.limit())
            .select((
                ReviewRow::as_select(),
                users::first_name,
                users::last_name,
            ))
            .load(&mut conn)
            .await?;

        let total: i64 = reviews::table
            .filter(
                reviews::book_id
                    .eq(book_id)
                    .and(reviews::is_deleted.eq(false)),
            )
            .count()
            .get_result(&mut conn)
            .await?;

        let items = rows
            .into_iter()
            .map(|(row, author_first_name, author_last_name)| {
                Review::try_from(row)
                    .map(|review| ReviewWithAuthor {
                        review,
                        author_first_name,
                        author_last_name,
                    })
                    .map_err(BookRepositoryError::query)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PageEnvelope::new(items, to_count(total), page))
    }
}
