//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/signup
//! POST /api/v1/auth/login
//! POST /api/v1/auth/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::auth::{LoginCredentials, NewAccount};
use crate::domain::user::User;
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_auth_validation_error;

/// Request payload for signup.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequestBody {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address; must be unused.
    pub email: String,
    /// Plaintext password, at least 8 characters.
    pub password: String,
}

/// Request payload for login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    /// Registered email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Sanitized account payload returned by signup and login.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseBody {
    /// Account identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address.
    pub email: String,
}

impl From<User> for UserResponseBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name.into(),
            last_name: user.last_name.into(),
            email: user.email.into(),
        }
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequestBody,
    responses(
        (status = 201, description = "Account created", body = UserResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let account = NewAccount::try_from_parts(body.first_name, body.last_name, body.email, body.password)
        .map_err(|err| map_auth_validation_error(&err))?;

    let user = state.accounts.signup(account).await?;
    Ok(HttpResponse::Created().json(UserResponseBody::from(user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequestBody,
    responses(
        (
            status = 200,
            description = "Login success",
            body = UserResponseBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))
        ),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.email, body.password)
        .map_err(|err| map_auth_validation_error(&err))?;

    let user = state.accounts.login(credentials).await?;
    session.persist_user(&user.id)?;
    Ok(HttpResponse::Ok().json(UserResponseBody::from(user)))
}

/// Drop the current session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tags = ["accounts"],
    operation_id = "logout",
    security(("SessionCookie" = []))
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::MockAccountService;
    use crate::domain::user::{EmailAddress, PersonName, UserId};
    use crate::inbound::http::state::HttpState;

    fn stored_user() -> User {
        User::new(
            UserId::random(),
            PersonName::new("firstName", "Ada").expect("valid name"),
            PersonName::new("lastName", "Lovelace").expect("valid name"),
            EmailAddress::new("ada@example.com").expect("valid email"),
        )
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
                    .service(signup)
                    .service(login)
                    .service(logout),
            )
    }

    fn state_with_accounts(accounts: MockAccountService) -> HttpState {
        let mut state = HttpState::fixtures();
        state.accounts = Arc::new(accounts);
        state
    }

    #[rstest]
    #[actix_web::test]
    async fn signup_returns_created_user() {
        let mut accounts = MockAccountService::new();
        accounts
            .expect_signup()
            .return_once(|account| {
                Ok(User::new(
                    UserId::random(),
                    account.first_name,
                    account.last_name,
                    account.email,
                ))
            });
        let app = test::init_service(test_app(state_with_accounts(accounts))).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/signup")
                .set_json(&SignupRequestBody {
                    first_name: "Ada".to_owned(),
                    last_name: "Lovelace".to_owned(),
                    email: "Ada@Example.com".to_owned(),
                    password: "long-enough".to_owned(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["email"], "ada@example.com");
        assert!(body.get("password").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn signup_rejects_short_passwords() {
        let app = test::init_service(test_app(HttpState::fixtures())).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/signup")
                .set_json(&SignupRequestBody {
                    first_name: "Ada".to_owned(),
                    last_name: "Lovelace".to_owned(),
                    email: "ada@example.com".to_owned(),
                    password: "short".to_owned(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn login_persists_the_session() {
        let mut accounts = MockAccountService::new();
        accounts
            .expect_login()
            .return_once(|_| Ok(stored_user()));
        let app = test::init_service(test_app(state_with_accounts(accounts))).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(&LoginRequestBody {
                    email: "ada@example.com".to_owned(),
                    password: "long-enough".to_owned(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn login_surfaces_unauthorized() {
        let app = test::init_service(test_app(HttpState::fixtures())).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(&LoginRequestBody {
                    email: "ada@example.com".to_owned(),
                    password: "wrong-password".to_owned(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn logout_clears_the_session() {
        let app = test::init_service(test_app(HttpState::fixtures())).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/logout")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
