//! OpenAPI documentation surface.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::error::{Error, ErrorCode};
use crate::domain::user::User;
use crate::inbound::http::accounts::{LoginRequestBody, SignupRequestBody, UserResponseBody};
use crate::inbound::http::books::{
    BookDetailResponseBody, BookPageResponseBody, BookResponseBody, BookReviewResponseBody,
    CreateBookRequestBody, ReviewAuthorBody, ReviewPageResponseBody,
};
use crate::inbound::http::reviews::{ReviewRequestBody, ReviewResponseBody};

/// Registers the session cookie security scheme referenced by handlers.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "SessionCookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session"))),
            );
        }
    }
}

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::books::list_books,
        crate::inbound::http::books::get_book,
        crate::inbound::http::books::create_book,
        crate::inbound::http::books::search_books,
        crate::inbound::http::reviews::submit_review,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        SignupRequestBody,
        LoginRequestBody,
        UserResponseBody,
        CreateBookRequestBody,
        BookResponseBody,
        BookPageResponseBody,
        ReviewAuthorBody,
        BookReviewResponseBody,
        ReviewPageResponseBody,
        BookDetailResponseBody,
        ReviewRequestBody,
        ReviewResponseBody,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "accounts", description = "Signup, login, and logout"),
        (name = "books", description = "Catalogue listing, search, and creation"),
        (name = "reviews", description = "Review lifecycle with aggregate maintenance"),
        (name = "health", description = "Liveness and readiness probes"),
    )
)]
pub struct ApiDoc;
