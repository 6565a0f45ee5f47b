//! User identity and account data model.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The id was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The id did not parse as a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// A name component was empty once trimmed.
    #[error("{field} must not be empty")]
    EmptyName {
        /// Which name component failed.
        field: &'static str,
    },
    /// A name component exceeded the length ceiling.
    #[error("{field} must be at most {max} characters")]
    NameTooLong {
        /// Which name component failed.
        field: &'static str,
        /// The ceiling that was exceeded.
        max: usize,
    },
    /// The email address did not match the accepted shape.
    #[error("email address is not valid")]
    InvalidEmail,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum length accepted for each name component.
pub const NAME_MAX: usize = 64;

/// A validated first or last name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a name component.
    pub fn new(
        field: &'static str,
        value: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::EmptyName { field });
        }
        if value.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { field, max: NAME_MAX });
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Deliberately loose: one @, no whitespace, a dot in the domain part.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// A validated email address, normalised to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an email address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let value = value.as_ref().trim();
        if !email_regex().is_match(value) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(value.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Application user as exposed to other users and API clients.
///
/// The credential hash never travels on this type; it stays inside the
/// persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable user identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    /// Given name.
    #[schema(value_type = String, example = "Ada")]
    pub first_name: PersonName,
    /// Family name.
    #[schema(value_type = String, example = "Lovelace")]
    pub last_name: PersonName,
    /// Contact address, unique per account.
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: EmailAddress,
}

impl User {
    /// Build a user from validated components.
    pub fn new(
        id: UserId,
        first_name: PersonName,
        last_name: PersonName,
        email: EmailAddress,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
        }
    }
}
