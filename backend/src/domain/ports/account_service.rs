//! Driving port for account signup and login use-cases.
//!
//! Inbound adapters call this port to run credential flows without knowing
//! the backing repository or hasher, keeping handler tests deterministic.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::auth::{LoginCredentials, NewAccount};
use crate::domain::user::{User, UserId};

/// Domain use-case port for accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new account and return the sanitized user.
    ///
    /// Fails with a conflict when the email is already registered.
    async fn signup(&self, account: NewAccount) -> Result<User, Error>;

    /// Verify credentials and return the authenticated user.
    ///
    /// Unknown emails and wrong passwords both fail with the same
    /// unauthorized error.
    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error>;
}

/// Fixture implementation for tests that do not exercise account flows.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountService;

#[async_trait]
impl AccountService for FixtureAccountService {
    async fn signup(&self, account: NewAccount) -> Result<User, Error> {
        Ok(User::new(
            UserId::random(),
            account.first_name,
            account.last_name,
            account.email,
        ))
    }

    async fn login(&self, _credentials: LoginCredentials) -> Result<User, Error> {
        Err(Error::unauthorized("invalid credentials"))
    }
}
