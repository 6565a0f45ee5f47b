//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain's driven ports backed by
//! PostgreSQL via `diesel-async` with `bb8` pooling. Adapters translate
//! between Diesel row structs and domain types; the one place business
//! logic is invoked here is the review store, which applies the pure
//! aggregate arithmetic inside its transactions.

mod diesel_book_repository;
mod diesel_error_mapping;
mod diesel_review_store;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_book_repository::DieselBookRepository;
pub use diesel_review_store::DieselReviewStore;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
