//! Review ratings and the denormalised book aggregate.
//!
//! [`RatingAggregate`] owns the incremental arithmetic that keeps a book's
//! `(avg_rating, total_reviews)` pair consistent with its active reviews.
//! The operations are pure so they can be exercised without storage; the
//! persistence adapter applies them inside the transaction that also writes
//! the review row.

use serde::{Deserialize, Serialize};

/// Inclusive rating bounds.
pub const RATING_MIN: f64 = 1.0;
/// Inclusive rating bounds.
pub const RATING_MAX: f64 = 5.0;

/// Validation error for out-of-range ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating must be a number between {RATING_MIN} and {RATING_MAX}")]
pub struct RatingOutOfRange;

/// A review rating, validated to the inclusive range `[1.0, 5.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    /// Validate and construct a rating.
    pub fn new(value: f64) -> Result<Self, RatingOutOfRange> {
        if !value.is_finite() || !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(RatingOutOfRange);
        }
        Ok(Self(value))
    }

    /// The numeric rating value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Errors raised by aggregate operations whose preconditions do not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    /// An adjustment was attempted against a zero active-review count.
    ///
    /// Rating changes and retractions both require at least one counted
    /// review (the one being mutated); hitting this means the stored
    /// aggregate disagrees with the review rows.
    #[error("aggregate adjustment requires at least one active review")]
    ZeroActiveReviews,
}

/// Round to two decimals, half away from zero, matching the precision the
/// aggregate is stored at.
fn round_half_away(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The `(avg_rating, total_reviews)` pair denormalised onto a book.
///
/// ## Invariants
/// - `avg_rating` is the 2-decimal-rounded mean of the active reviews'
///   ratings, `0.0` when there are none.
/// - `total_reviews` is the count of active reviews and never negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingAggregate {
    avg_rating: f64,
    total_reviews: i32,
}

impl RatingAggregate {
    /// Wrap the stored aggregate columns of a book row.
    pub fn new(avg_rating: f64, total_reviews: i32) -> Self {
        Self {
            avg_rating,
            total_reviews,
        }
    }

    /// The aggregate of a book with no active reviews.
    pub fn empty() -> Self {
        Self::new(0.0, 0)
    }

    /// Stored mean rating, rounded to two decimals.
    pub fn avg_rating(&self) -> f64 {
        self.avg_rating
    }

    /// Count of active reviews.
    pub fn total_reviews(&self) -> i32 {
        self.total_reviews
    }

    /// Count a newly active review (a fresh create or a resurrection).
    pub fn with_added(self, rating: Rating) -> Self {
        let count = self.total_reviews;
        let next_count = count + 1;
        let next_avg = if count == 0 {
            rating.value()
        } else {
            (self.avg_rating * f64::from(count) + rating.value()) / f64::from(next_count)
        };
        Self::new(round_half_away(next_avg), next_count)
    }

    /// Apply a rating change on an already-counted review.
    ///
    /// The count is unchanged; a zero count means the stored aggregate has
    /// drifted from the review rows and the caller must abort.
    pub fn with_changed(self, old: Rating, new: Rating) -> Result<Self, AggregateError> {
        let count = self.total_reviews;
        if count == 0 {
            return Err(AggregateError::ZeroActiveReviews);
        }
        let next_avg =
            (self.avg_rating * f64::from(count) - old.value() + new.value()) / f64::from(count);
        Ok(Self::new(round_half_away(next_avg), count))
    }

    /// Stop counting a review that is being soft-deleted.
    ///
    /// Retracting at a zero count would drive `total_reviews` negative, so
    /// it fails instead of saturating.
    pub fn with_retracted(self, old: Rating) -> Result<Self, AggregateError> {
        let count = self.total_reviews;
        if count == 0 {
            return Err(AggregateError::ZeroActiveReviews);
        }
        let next_count = count - 1;
        let next_avg = if next_count == 0 {
            0.0
        } else {
            (self.avg_rating * f64::from(count) - old.value()) / f64::from(next_count)
        };
        Ok(Self::new(round_half_away(next_avg), next_count))
    }
}
