//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (repositories, the review store, the hasher) are implemented
//! by outbound adapters; driving ports (services) are implemented by domain
//! services and called by inbound adapters.

mod account_service;
mod book_command;
mod book_query;
mod book_repository;
mod password_hasher;
mod review_command;
mod review_store;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{AccountService, FixtureAccountService};
#[cfg(test)]
pub use book_command::MockBookCommand;
pub use book_command::{BookCommand, FixtureBookCommand};
#[cfg(test)]
pub use book_query::MockBookQuery;
pub use book_query::{BookDetail, BookQuery, FixtureBookQuery, ListBooksRequest};
#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use book_repository::{BookRepository, BookRepositoryError, ReviewWithAuthor};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use review_command::MockReviewCommand;
pub use review_command::{
    DeleteReviewRequest, FixtureReviewCommand, ReviewCommand, SubmitReviewRequest,
    UpdateReviewRequest,
};
#[cfg(test)]
pub use review_store::MockReviewStore;
pub use review_store::{ReviewStore, ReviewStoreError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{CredentialRecord, NewUserRecord, UserRepository, UserRepositoryError};
