//! Book HTTP handlers.
//!
//! ```text
//! GET  /api/v1/books
//! GET  /api/v1/books/{id}
//! POST /api/v1/books
//! GET  /api/v1/search?query=...
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::{PageEnvelope, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::domain::book::{Book, BookDraft, BookFilter};
use crate::domain::ports::{BookDetail, ListBooksRequest, ReviewWithAuthor};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_book_validation_error, parse_uuid};

/// Request payload for cataloguing a book.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequestBody {
    /// Title; non-empty.
    pub title: String,
    /// Author; non-empty.
    pub author: String,
    /// Optional blurb.
    pub description: Option<String>,
    /// Genre label; non-empty.
    pub genre: String,
}

/// Book payload returned by listing, search, and creation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookResponseBody {
    /// Book identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Title as catalogued.
    pub title: String,
    /// Author as catalogued.
    pub author: String,
    /// Optional blurb.
    pub description: Option<String>,
    /// Genre label.
    pub genre: String,
    /// Mean of active review ratings, rounded to two decimals.
    pub avg_rating: f64,
    /// Count of active reviews.
    pub total_reviews: i32,
    /// The cataloguing user.
    #[schema(format = "uuid")]
    pub created_by: String,
    /// Creation timestamp, RFC 3339.
    #[schema(format = "date-time")]
    pub created_at: String,
    /// Last-mutation timestamp, RFC 3339.
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Book> for BookResponseBody {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title,
            author: book.author,
            description: book.description,
            genre: book.genre,
            avg_rating: book.aggregate.avg_rating(),
            total_reviews: book.aggregate.total_reviews(),
            created_by: book.created_by.to_string(),
            created_at: book.created_at.to_rfc3339(),
            updated_at: book.updated_at.to_rfc3339(),
        }
    }
}

/// A page of books with totals.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPageResponseBody {
    /// Books on this page.
    pub items: Vec<BookResponseBody>,
    /// Total matching books.
    pub total: u64,
    /// Served page number, 1-based.
    pub page: u32,
    /// Served page size.
    pub per_page: u32,
    /// Total page count.
    pub total_pages: u32,
}

impl From<PageEnvelope<Book>> for BookPageResponseBody {
    fn from(envelope: PageEnvelope<Book>) -> Self {
        let envelope = envelope.map(BookResponseBody::from);
        Self {
            items: envelope.items,
            total: envelope.total,
            page: envelope.page,
            per_page: envelope.per_page,
            total_pages: envelope.total_pages,
        }
    }
}

/// Reviewer identity embedded in book detail reviews.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthorBody {
    /// Reviewer's user id.
    #[schema(format = "uuid")]
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// An active review as shown on a book's detail page.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookReviewResponseBody {
    /// Review identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Submitted rating.
    pub rating: f64,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Creation timestamp, RFC 3339.
    #[schema(format = "date-time")]
    pub created_at: String,
    /// The reviewer.
    pub user: ReviewAuthorBody,
}

impl From<ReviewWithAuthor> for BookReviewResponseBody {
    fn from(entry: ReviewWithAuthor) -> Self {
        Self {
            id: entry.review.id.to_string(),
            rating: entry.review.rating.value(),
            comment: entry.review.comment,
            created_at: entry.review.created_at.to_rfc3339(),
            user: ReviewAuthorBody {
                id: entry.review.user_id.to_string(),
                first_name: entry.author_first_name,
                last_name: entry.author_last_name,
            },
        }
    }
}

/// A page of reviews with totals.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPageResponseBody {
    /// Reviews on this page.
    pub items: Vec<BookReviewResponseBody>,
    /// Total active reviews.
    pub total: u64,
    /// Served page number, 1-based.
    pub page: u32,
    /// Served page size.
    pub per_page: u32,
    /// Total page count.
    pub total_pages: u32,
}

/// Book detail plus a page of its active reviews.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDetailResponseBody {
    /// The requested book.
    #[serde(flatten)]
    pub book: BookResponseBody,
    /// A page of active reviews, newest first.
    pub reviews: ReviewPageResponseBody,
}

impl From<BookDetail> for BookDetailResponseBody {
    fn from(detail: BookDetail) -> Self {
        let reviews = detail.reviews.map(BookReviewResponseBody::from);
        Self {
            book: BookResponseBody::from(detail.book),
            reviews: ReviewPageResponseBody {
                items: reviews.items,
                total: reviews.total,
                page: reviews.page,
                per_page: reviews.per_page,
                total_pages: reviews.total_pages,
            },
        }
    }
}

/// Query parameters for the book listing.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListBooksQueryParams {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, clamped server-side.
    pub per_page: Option<u32>,
    /// Exact case-insensitive author filter.
    pub author: Option<String>,
    /// Exact case-insensitive genre filter.
    pub genre: Option<String>,
    /// Exact case-insensitive title filter.
    pub title: Option<String>,
    /// Sort column: title, author, genre, or createdAt.
    pub sort_by: Option<String>,
    /// Sort direction: asc or desc.
    pub sort_order: Option<String>,
}

/// Query parameters for book detail review paging.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct BookDetailQueryParams {
    /// 1-based page number for the reviews.
    pub page: Option<u32>,
    /// Review page size, clamped server-side.
    pub per_page: Option<u32>,
}

/// Query parameters for search.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryParams {
    /// Substring matched against title and author, case-insensitively.
    pub query: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, clamped server-side.
    pub per_page: Option<u32>,
}

/// List the catalogue with optional filters and ordering.
///
/// Unknown `sortBy`/`sortOrder` values fall back to newest-first rather
/// than failing the request.
#[utoipa::path(
    get,
    path = "/api/v1/books",
    params(ListBooksQueryParams),
    responses(
        (status = 200, description = "Books page", body = BookPageResponseBody),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["books"],
    operation_id = "listBooks",
    security([])
)]
#[get("/books")]
pub async fn list_books(
    state: web::Data<HttpState>,
    params: web::Query<ListBooksQueryParams>,
) -> ApiResult<web::Json<BookPageResponseBody>> {
    let params = params.into_inner();
    let page = PageRequest::from_query(params.page, params.per_page, state.default_page_size);

    let envelope = state
        .books_query
        .list_books(ListBooksRequest {
            filter: BookFilter {
                author: params.author,
                genre: params.genre,
                title: params.title,
            },
            sort_field: params
                .sort_by
                .as_deref()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default(),
            sort_order: params
                .sort_order
                .as_deref()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default(),
            page,
        })
        .await?;

    Ok(web::Json(BookPageResponseBody::from(envelope)))
}

/// Fetch a book with a page of its active reviews.
#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    params(
        ("id" = String, Path, description = "Book id"),
        BookDetailQueryParams
    ),
    responses(
        (status = 200, description = "Book detail", body = BookDetailResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Book not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["books"],
    operation_id = "getBook",
    security([])
)]
#[get("/books/{id}")]
pub async fn get_book(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    params: web::Query<BookDetailQueryParams>,
) -> ApiResult<web::Json<BookDetailResponseBody>> {
    let book_id = parse_uuid(&path.into_inner(), FieldName::new("bookId"))?;
    let params = params.into_inner();
    let reviews_page =
        PageRequest::from_query(params.page, params.per_page, state.default_page_size);

    let detail = state.books_query.get_book(book_id, reviews_page).await?;
    Ok(web::Json(BookDetailResponseBody::from(detail)))
}

/// Catalogue a new book as the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/books",
    request_body = CreateBookRequestBody,
    responses(
        (status = 201, description = "Book created", body = BookResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 409, description = "Duplicate title and author", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["books"],
    operation_id = "createBook",
    security(("SessionCookie" = []))
)]
#[post("/books")]
pub async fn create_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateBookRequestBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let body = payload.into_inner();
    let draft = BookDraft::try_from_parts(
        body.title,
        body.author,
        body.description,
        body.genre,
        user_id,
    )
    .map_err(|err| map_book_validation_error(&err))?;

    let book = state.books.create_book(draft).await?;
    Ok(HttpResponse::Created().json(BookResponseBody::from(book)))
}

/// Search the catalogue by title or author substring.
#[utoipa::path(
    get,
    path = "/api/v1/search",
    params(SearchQueryParams),
    responses(
        (status = 200, description = "Matching books page", body = BookPageResponseBody),
        (status = 400, description = "Missing query", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["books"],
    operation_id = "searchBooks",
    security([])
)]
#[get("/search")]
pub async fn search_books(
    state: web::Data<HttpState>,
    params: web::Query<SearchQueryParams>,
) -> ApiResult<web::Json<BookPageResponseBody>> {
    let params = params.into_inner();
    let term = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .ok_or_else(|| {
            Error::invalid_request("query must not be empty").with_details(json!({
                "field": "query",
                "code": "missing_field",
            }))
        })?
        .to_owned();

    let page = PageRequest::from_query(params.page, params.per_page, state.default_page_size);
    let envelope = state.books_query.search_books(term, page).await?;
    Ok(web::Json(BookPageResponseBody::from(envelope)))
}

#[cfg(test)]
#[path = "books_tests.rs"]
mod tests;
