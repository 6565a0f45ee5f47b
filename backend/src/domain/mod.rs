//! Domain entities, ports, and services.
//!
//! The types here are transport and storage agnostic. The review rating
//! protocol lives in [`rating`] and [`review`]; services implement the
//! driving ports in [`ports`] over the driven ports implemented by outbound
//! adapters.

pub mod accounts;
pub mod auth;
pub mod book;
pub mod book_service;
pub mod error;
pub mod ports;
pub mod rating;
pub mod review;
pub mod review_service;
pub mod user;

pub use self::accounts::PasswordAccountService;
pub use self::auth::{AuthValidationError, LoginCredentials, NewAccount, Password};
pub use self::book::{Book, BookDraft, BookFilter, BookSortField, BookValidationError, SortOrder};
pub use self::book_service::{BookCommandService, BookQueryService};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::rating::{AggregateError, Rating, RatingAggregate, RatingOutOfRange};
pub use self::review::{Review, SubmissionAction};
pub use self::review_service::ReviewCommandService;
pub use self::user::{EmailAddress, PersonName, User, UserId, UserValidationError};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
