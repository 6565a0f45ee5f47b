//! Credential types for signup and login.
//!
//! Raw passwords are wrapped in [`Password`], which zeroises its buffer on
//! drop so plaintext credentials do not linger in freed memory.

use zeroize::Zeroizing;

use crate::domain::user::{EmailAddress, PersonName, UserValidationError};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 8;

/// Validation errors for credential construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    /// The password was shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {PASSWORD_MIN} characters")]
    PasswordTooShort,
    /// A user field failed validation.
    #[error(transparent)]
    User(#[from] UserValidationError),
}

/// A raw password captured from a request, zeroised on drop.
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and wrap a raw password.
    pub fn new(raw: impl Into<String>) -> Result<Self, AuthValidationError> {
        let raw = raw.into();
        if raw.chars().count() < PASSWORD_MIN {
            return Err(AuthValidationError::PasswordTooShort);
        }
        Ok(Self(Zeroizing::new(raw)))
    }

    /// Expose the plaintext for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Verified-shape login credentials.
#[derive(Debug)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Password,
}

impl LoginCredentials {
    /// Validate and construct credentials from raw request parts.
    pub fn try_from_parts(
        email: impl AsRef<str>,
        password: impl Into<String>,
    ) -> Result<Self, AuthValidationError> {
        Ok(Self {
            email: EmailAddress::new(email).map_err(AuthValidationError::User)?,
            password: Password::new(password)?,
        })
    }

    /// The normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The raw password.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated signup payload.
#[derive(Debug)]
pub struct NewAccount {
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: PersonName,
    /// Contact address; must be unused.
    pub email: EmailAddress,
    /// Raw password to be hashed by the account service.
    pub password: Password,
}

impl NewAccount {
    /// Validate and construct a signup payload from raw request parts.
    pub fn try_from_parts(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl AsRef<str>,
        password: impl Into<String>,
    ) -> Result<Self, AuthValidationError> {
        Ok(Self {
            first_name: PersonName::new("firstName", first_name)
                .map_err(AuthValidationError::User)?,
            last_name: PersonName::new("lastName", last_name)
                .map_err(AuthValidationError::User)?,
            email: EmailAddress::new(email).map_err(AuthValidationError::User)?,
            password: Password::new(password)?,
        })
    }
}
