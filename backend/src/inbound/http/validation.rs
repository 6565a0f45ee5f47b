//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;
use uuid::Uuid;

use crate::domain::rating::Rating;
use crate::domain::{Error, auth::AuthValidationError, book::BookValidationError};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_uuid",
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_rating(value: f64) -> Result<Rating, Error> {
    Rating::new(value).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "rating",
            "value": value,
            "code": "invalid_rating",
        }))
    })
}

pub(crate) fn map_auth_validation_error(err: &AuthValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "code": "invalid_credentials_shape",
    }))
}

pub(crate) fn map_book_validation_error(err: &BookValidationError) -> Error {
    let BookValidationError::EmptyField { field } = err;
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    fn parse_uuid_accepts_valid_input() {
        let parsed = parse_uuid(
            "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            FieldName::new("bookId"),
        )
        .expect("valid uuid parses");
        assert_eq!(parsed.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    fn parse_uuid_reports_the_field() {
        let err = parse_uuid("nope", FieldName::new("bookId")).expect_err("invalid uuid fails");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().expect("details present");
        assert_eq!(details["field"], "bookId");
        assert_eq!(details["code"], "invalid_uuid");
    }

    #[rstest]
    #[case(0.9)]
    #[case(5.5)]
    fn parse_rating_rejects_out_of_range(#[case] value: f64) {
        let err = parse_rating(value).expect_err("invalid rating fails");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().expect("details present");
        assert_eq!(details["code"], "invalid_rating");
    }

    #[rstest]
    fn parse_rating_accepts_bounds() {
        assert!(parse_rating(1.0).is_ok());
        assert!(parse_rating(5.0).is_ok());
    }
}
