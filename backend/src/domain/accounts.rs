//! Account domain service: signup and credential verification.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::auth::{LoginCredentials, NewAccount};
use crate::domain::ports::{
    AccountService, NewUserRecord, PasswordHasher, UserRepository, UserRepositoryError,
};
use crate::domain::user::{User, UserId};

fn map_repository_error(repository_error: UserRepositoryError) -> Error {
    match repository_error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail => {
            Error::conflict("an account with this email already exists")
        }
    }
}

/// Password-credential account service implementing the driving port.
#[derive(Clone)]
pub struct PasswordAccountService<R, H> {
    user_repo: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> PasswordAccountService<R, H> {
    /// Create a new service over the user repository and hasher.
    pub fn new(user_repo: Arc<R>, hasher: Arc<H>) -> Self {
        Self { user_repo, hasher }
    }
}

#[async_trait]
impl<R, H> AccountService for PasswordAccountService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn signup(&self, account: NewAccount) -> Result<User, Error> {
        let password_hash = self.hasher.hash(&account.password);
        let record = NewUserRecord {
            id: UserId::random(),
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            password_hash,
        };

        self.user_repo
            .create(record)
            .await
            .map_err(map_repository_error)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error> {
        let record = self
            .user_repo
            .find_by_email(credentials.email())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;

        let verified = self
            .hasher
            .verify(credentials.password(), &record.password_hash)
            .map_err(|err| Error::internal(format!("credential verification failed: {err}")))?;

        if !verified {
            return Err(Error::unauthorized("invalid credentials"));
        }

        Ok(record.user)
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour coverage for the account service.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{CredentialRecord, MockPasswordHasher, MockUserRepository};
    use crate::domain::user::{EmailAddress, PersonName};

    fn stored_user(email: &str) -> User {
        User::new(
            UserId::random(),
            PersonName::new("firstName", "Ada").expect("valid name"),
            PersonName::new("lastName", "Lovelace").expect("valid name"),
            EmailAddress::new(email).expect("valid email"),
        )
    }

    fn new_account() -> NewAccount {
        NewAccount::try_from_parts("Ada", "Lovelace", "ada@example.com", "long-enough")
            .expect("valid account")
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("ada@example.com", "long-enough")
            .expect("valid credentials")
    }

    #[rstest]
    #[tokio::test]
    async fn signup_hashes_before_persisting() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .return_once(|_| "encoded-hash".to_owned());

        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .withf(|record| {
                record.password_hash == "encoded-hash" && record.email.as_ref() == "ada@example.com"
            })
            .return_once(|record| {
                Ok(User::new(
                    record.id,
                    record.first_name,
                    record.last_name,
                    record.email,
                ))
            });

        let service = PasswordAccountService::new(Arc::new(repo), Arc::new(hasher));
        let user = service
            .signup(new_account())
            .await
            .expect("signup succeeds");
        assert_eq!(user.email.as_ref(), "ada@example.com");
    }

    #[rstest]
    #[tokio::test]
    async fn signup_maps_duplicate_email_to_conflict() {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().return_once(|_| "encoded".to_owned());

        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .return_once(|_| Err(UserRepositoryError::DuplicateEmail));

        let service = PasswordAccountService::new(Arc::new(repo), Arc::new(hasher));
        let err = service
            .signup(new_account())
            .await
            .expect_err("duplicate signup fails");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn login_succeeds_on_matching_credentials() {
        let user = stored_user("ada@example.com");
        let expected = user.clone();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().return_once(move |_| {
            Ok(Some(CredentialRecord {
                user,
                password_hash: "encoded".to_owned(),
            }))
        });

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().return_once(|_, _| Ok(true));

        let service = PasswordAccountService::new(Arc::new(repo), Arc::new(hasher));
        let logged_in = service.login(credentials()).await.expect("login succeeds");
        assert_eq!(logged_in, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn login_rejects_unknown_emails() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().return_once(|_| Ok(None));
        let hasher = MockPasswordHasher::new();

        let service = PasswordAccountService::new(Arc::new(repo), Arc::new(hasher));
        let err = service
            .login(credentials())
            .await
            .expect_err("unknown email fails");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn login_rejects_wrong_passwords_with_the_same_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().return_once(|_| {
            Ok(Some(CredentialRecord {
                user: stored_user("ada@example.com"),
                password_hash: "encoded".to_owned(),
            }))
        });

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().return_once(|_, _| Ok(false));

        let service = PasswordAccountService::new(Arc::new(repo), Arc::new(hasher));
        let err = service
            .login(credentials())
            .await
            .expect_err("wrong password fails");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "invalid credentials");
    }
}
