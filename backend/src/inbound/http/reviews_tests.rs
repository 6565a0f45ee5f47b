//! Handler coverage for the review endpoints.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Utc;
use rstest::rstest;
use serde_json::Value;
use uuid::Uuid;

use super::*;
use crate::domain::ports::MockReviewCommand;
use crate::domain::rating::Rating;
use crate::domain::user::UserId;
use crate::inbound::http::state::HttpState;

const SESSION_USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn stored_review(book_id: Uuid, user_id: UserId, rating: f64) -> Review {
    let now = Utc::now();
    Review {
        id: Uuid::new_v4(),
        book_id,
        user_id,
        rating: Rating::new(rating).expect("test rating in range"),
        comment: Some("gripping".to_owned()),
        is_deleted: false,
        created_at: now,
        updated_at: now,
    }
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(crate::inbound::http::test_utils::test_session_middleware())
        .service(
            web::scope("/api/v1")
                .route(
                    "/test-login",
                    web::get().to(|session: SessionContext| async move {
                        let id = UserId::new(SESSION_USER).expect("fixture id");
                        session.persist_user(&id)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .service(submit_review)
                .service(update_review)
                .service(delete_review),
        )
}

fn state_with_reviews(reviews: MockReviewCommand) -> HttpState {
    let mut state = HttpState::fixtures();
    state.reviews = Arc::new(reviews);
    state
}

async fn login_cookie<S, B>(app: &S) -> actix_web::cookie::Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::get().uri("/api/v1/test-login").to_request(),
    )
    .await;
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

#[rstest]
#[actix_web::test]
async fn submit_requires_authentication() {
    let app = test::init_service(test_app(HttpState::fixtures())).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/books/{}/reviews", Uuid::new_v4()))
            .set_json(&ReviewRequestBody {
                rating: 4.0,
                comment: None,
            })
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn submit_passes_the_session_identity_to_the_port() {
    let book_id = Uuid::new_v4();
    let caller = UserId::new(SESSION_USER).expect("fixture id");

    let mut reviews = MockReviewCommand::new();
    reviews
        .expect_submit_review()
        .withf(move |request| {
            request.book_id == book_id
                && request.user_id == caller
                && request.rating.value() == 4.0
        })
        .return_once(move |request| {
            Ok(stored_review(request.book_id, request.user_id, 4.0))
        });

    let app = test::init_service(test_app(state_with_reviews(reviews))).await;
    let cookie = login_cookie(&app).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/books/{book_id}/reviews"))
            .cookie(cookie)
            .set_json(&ReviewRequestBody {
                rating: 4.0,
                comment: Some("gripping".to_owned()),
            })
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["bookId"], book_id.to_string());
    assert_eq!(body["rating"], 4.0);
    assert_eq!(body["isDeleted"], false);
}

#[rstest]
#[case(0.5)]
#[case(5.5)]
#[actix_web::test]
async fn submit_rejects_out_of_range_ratings(#[case] rating: f64) {
    let app = test::init_service(test_app(HttpState::fixtures())).await;
    let cookie = login_cookie(&app).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/books/{}/reviews", Uuid::new_v4()))
            .cookie(cookie)
            .set_json(&ReviewRequestBody {
                rating,
                comment: None,
            })
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_rating");
}

#[rstest]
#[actix_web::test]
async fn submit_surfaces_conflicts() {
    let mut reviews = MockReviewCommand::new();
    reviews
        .expect_submit_review()
        .return_once(|_| Err(Error::conflict("you have already reviewed this book")));

    let app = test::init_service(test_app(state_with_reviews(reviews))).await;
    let cookie = login_cookie(&app).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/books/{}/reviews", Uuid::new_v4()))
            .cookie(cookie)
            .set_json(&ReviewRequestBody {
                rating: 4.0,
                comment: None,
            })
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn update_rejects_malformed_review_ids() {
    let app = test::init_service(test_app(HttpState::fixtures())).await;
    let cookie = login_cookie(&app).await;

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/reviews/not-a-uuid")
            .cookie(cookie)
            .set_json(&ReviewRequestBody {
                rating: 3.0,
                comment: None,
            })
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "reviewId");
}

#[rstest]
#[actix_web::test]
async fn update_surfaces_forbidden_for_non_owners() {
    let mut reviews = MockReviewCommand::new();
    reviews
        .expect_update_review()
        .return_once(|_| Err(Error::forbidden("you do not own this review")));

    let app = test::init_service(test_app(state_with_reviews(reviews))).await;
    let cookie = login_cookie(&app).await;

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/reviews/{}", Uuid::new_v4()))
            .cookie(cookie)
            .set_json(&ReviewRequestBody {
                rating: 3.0,
                comment: None,
            })
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn delete_returns_the_soft_deleted_review() {
    let review_id = Uuid::new_v4();
    let caller = UserId::new(SESSION_USER).expect("fixture id");

    let mut reviews = MockReviewCommand::new();
    reviews
        .expect_delete_review()
        .withf(move |request| request.review_id == review_id && request.user_id == caller)
        .return_once(move |request| {
            let mut review = stored_review(Uuid::new_v4(), request.user_id, 4.0);
            review.id = request.review_id;
            review.is_deleted = true;
            Ok(review)
        });

    let app = test::init_service(test_app(state_with_reviews(reviews))).await;
    let cookie = login_cookie(&app).await;

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/reviews/{review_id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["id"], review_id.to_string());
    assert_eq!(body["isDeleted"], true);
}
