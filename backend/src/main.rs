//! Backend entry-point: wires REST endpoints, persistence, and OpenAPI docs.

use std::env;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, web};
use diesel::Connection as _;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi as _;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use backend::ApiDoc;
use backend::Trace;
use backend::domain::ports::{AccountService, BookCommand, BookQuery, ReviewCommand};
use backend::domain::{
    BookCommandService, BookQueryService, PasswordAccountService, ReviewCommandService,
};
use backend::inbound::http::accounts::{login, logout, signup};
use backend::inbound::http::books::{create_book, get_book, list_books, search_books};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::reviews::{delete_review, submit_review, update_review};
use backend::inbound::http::state::{DEFAULT_PAGE_SIZE, HttpState};
use backend::outbound::persistence::{
    DbPool, DieselBookRepository, DieselReviewStore, DieselUserRepository, PoolConfig,
};
use backend::outbound::security::Sha256PasswordHasher;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;

    run_migrations(&database_url)?;

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;

    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let page_size = env::var("PAGE_SIZE")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());

    let state = build_state(&pool, page_size);
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    info!(%bind_addr, "starting server");
    let server = HttpServer::new(move || {
        build_app(
            state.clone(),
            server_health_state.clone(),
            key.clone(),
            cookie_secure,
        )
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

/// Apply pending migrations over a short-lived synchronous connection.
fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| std::io::Error::other(format!("database connection: {err}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| std::io::Error::other(format!("migrations: {err}")))?;
    Ok(())
}

fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn build_state(pool: &DbPool, page_size: u32) -> HttpState {
    let user_repo = Arc::new(DieselUserRepository::new(pool.clone()));
    let hasher = Arc::new(Sha256PasswordHasher);
    let accounts: Arc<dyn AccountService> =
        Arc::new(PasswordAccountService::new(user_repo, hasher));

    let book_repo = Arc::new(DieselBookRepository::new(pool.clone()));
    let books: Arc<dyn BookCommand> = Arc::new(BookCommandService::new(book_repo.clone()));
    let books_query: Arc<dyn BookQuery> = Arc::new(BookQueryService::new(book_repo));

    let review_store = Arc::new(DieselReviewStore::new(pool.clone()));
    let reviews: Arc<dyn ReviewCommand> = Arc::new(ReviewCommandService::new(review_store));

    HttpState::new(accounts, books, books_query, reviews).with_default_page_size(page_size)
}

fn build_app(
    state: HttpState,
    health_state: web::Data<HealthState>,
    key: Key,
    cookie_secure: bool,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(signup)
        .service(login)
        .service(logout)
        .service(list_books)
        .service(get_book)
        .service(create_book)
        .service(search_books)
        .service(submit_review)
        .service(update_review)
        .service(delete_review);

    let app = App::new()
        .app_data(web::Data::new(state))
        .app_data(health_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}
