//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountService, BookCommand, BookQuery, ReviewCommand};
use crate::domain::ports::{
    FixtureAccountService, FixtureBookCommand, FixtureBookQuery, FixtureReviewCommand,
};

/// Fallback page size when the deployment does not configure one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account signup/login use-cases.
    pub accounts: Arc<dyn AccountService>,
    /// Book cataloguing use-cases.
    pub books: Arc<dyn BookCommand>,
    /// Book read use-cases.
    pub books_query: Arc<dyn BookQuery>,
    /// Review lifecycle use-cases.
    pub reviews: Arc<dyn ReviewCommand>,
    /// Default per-page size for list endpoints.
    pub default_page_size: u32,
}

impl HttpState {
    /// Construct state from port implementations with the default page size.
    pub fn new(
        accounts: Arc<dyn AccountService>,
        books: Arc<dyn BookCommand>,
        books_query: Arc<dyn BookQuery>,
        reviews: Arc<dyn ReviewCommand>,
    ) -> Self {
        Self {
            accounts,
            books,
            books_query,
            reviews,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the default page size for list endpoints.
    #[must_use]
    pub fn with_default_page_size(mut self, default_page_size: u32) -> Self {
        self.default_page_size = default_page_size;
        self
    }

    /// State backed entirely by fixture ports, for tests and examples that
    /// exercise a single real port.
    pub fn fixtures() -> Self {
        Self::new(
            Arc::new(FixtureAccountService),
            Arc::new(FixtureBookCommand),
            Arc::new(FixtureBookQuery),
            Arc::new(FixtureReviewCommand),
        )
    }
}
