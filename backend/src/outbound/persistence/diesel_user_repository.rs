//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::ports::{CredentialRecord, NewUserRecord, UserRepository, UserRepositoryError};
use crate::domain::user::{EmailAddress, User, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<diesel::result::Error> for UserRepositoryError {
    fn from(error: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        // The unique index on email backstops the in-transaction check.
        if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
            return Self::DuplicateEmail;
        }
        map_diesel_error(error, Self::query, Self::connection)
    }
}

fn to_domain(row: UserRow) -> Result<User, UserRepositoryError> {
    User::try_from(row).map_err(UserRepositoryError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, record: NewUserRecord) -> Result<User, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        conn.transaction(|conn| {
            async move {
                let existing: Option<Uuid> = users::table
                    .filter(users::email.eq(record.email.as_ref()))
                    .select(users::id)
                    .first(conn)
                    .await
                    .optional()?;
                if existing.is_some() {
                    return Err(UserRepositoryError::DuplicateEmail);
                }

                let row: UserRow = diesel::insert_into(users::table)
                    .values(&NewUserRow {
                        id: *record.id.as_uuid(),
                        first_name: record.first_name.as_ref(),
                        last_name: record.last_name.as_ref(),
                        email: record.email.as_ref(),
                        password_hash: record.password_hash.as_str(),
                    })
                    .returning(UserRow::as_returning())
                    .get_result(conn)
                    .await?;

                to_domain(row)
            }
            .scope_boxed()
        })
        .await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<CredentialRecord>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        row.map(|row| {
            let password_hash = row.password_hash.clone();
            to_domain(row).map(|user| CredentialRecord {
                user,
                password_hash,
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        row.map(to_domain).transpose()
    }
}
