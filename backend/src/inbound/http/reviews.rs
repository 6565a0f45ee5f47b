//! Review HTTP handlers.
//!
//! ```text
//! POST   /api/v1/books/{id}/reviews
//! PUT    /api/v1/reviews/{id}
//! DELETE /api/v1/reviews/{id}
//! ```

use actix_web::{HttpResponse, delete, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{DeleteReviewRequest, SubmitReviewRequest, UpdateReviewRequest};
use crate::domain::review::Review;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_rating, parse_uuid};

/// Request payload for submitting or updating a review.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequestBody {
    /// Rating in [1, 5].
    pub rating: f64,
    /// Optional free-text comment; omitted clears any existing comment on
    /// update.
    pub comment: Option<String>,
}

/// Review payload returned by every lifecycle operation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponseBody {
    /// Review identifier, stable across soft-delete and resurrection.
    #[schema(format = "uuid")]
    pub id: String,
    /// The reviewed book.
    #[schema(format = "uuid")]
    pub book_id: String,
    /// The review's owner.
    #[schema(format = "uuid")]
    pub user_id: String,
    /// Submitted rating.
    pub rating: f64,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Whether the review is soft-deleted.
    pub is_deleted: bool,
    /// Creation timestamp, RFC 3339.
    #[schema(format = "date-time")]
    pub created_at: String,
    /// Last-mutation timestamp, RFC 3339.
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Review> for ReviewResponseBody {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.to_string(),
            book_id: review.book_id.to_string(),
            user_id: review.user_id.to_string(),
            rating: review.rating.value(),
            comment: review.comment,
            is_deleted: review.is_deleted,
            created_at: review.created_at.to_rfc3339(),
            updated_at: review.updated_at.to_rfc3339(),
        }
    }
}

/// Submit a review for a book as the authenticated user.
///
/// Re-reviewing after deleting resurrects the original row; an active
/// review fails with a conflict.
#[utoipa::path(
    post,
    path = "/api/v1/books/{id}/reviews",
    params(("id" = String, Path, description = "Book id")),
    request_body = ReviewRequestBody,
    responses(
        (status = 201, description = "Review recorded", body = ReviewResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Book not found", body = Error),
        (status = 409, description = "Already reviewed", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "submitReview",
    security(("SessionCookie" = []))
)]
#[post("/books/{id}/reviews")]
pub async fn submit_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReviewRequestBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let book_id = parse_uuid(&path.into_inner(), FieldName::new("bookId"))?;
    let body = payload.into_inner();

    let review = state
        .reviews
        .submit_review(SubmitReviewRequest {
            book_id,
            user_id,
            rating: parse_rating(body.rating)?,
            comment: body.comment,
        })
        .await?;

    Ok(HttpResponse::Created().json(ReviewResponseBody::from(review)))
}

/// Change the authenticated user's review.
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review id")),
    request_body = ReviewRequestBody,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not the review owner", body = Error),
        (status = 404, description = "Review not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "updateReview",
    security(("SessionCookie" = []))
)]
#[put("/reviews/{id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReviewRequestBody>,
) -> ApiResult<web::Json<ReviewResponseBody>> {
    let user_id = session.require_user_id()?;
    let review_id = parse_uuid(&path.into_inner(), FieldName::new("reviewId"))?;
    let body = payload.into_inner();

    let review = state
        .reviews
        .update_review(UpdateReviewRequest {
            review_id,
            user_id,
            rating: parse_rating(body.rating)?,
            comment: body.comment,
        })
        .await?;

    Ok(web::Json(ReviewResponseBody::from(review)))
}

/// Soft-delete the authenticated user's review.
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review soft-deleted", body = ReviewResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not the review owner", body = Error),
        (status = 404, description = "Review not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview",
    security(("SessionCookie" = []))
)]
#[delete("/reviews/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReviewResponseBody>> {
    let user_id = session.require_user_id()?;
    let review_id = parse_uuid(&path.into_inner(), FieldName::new("reviewId"))?;

    let review = state
        .reviews
        .delete_review(DeleteReviewRequest {
            review_id,
            user_id,
        })
        .await?;

    Ok(web::Json(ReviewResponseBody::from(review)))
}

#[cfg(test)]
#[path = "reviews_tests.rs"]
mod tests;
