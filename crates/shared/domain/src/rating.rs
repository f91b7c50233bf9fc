//! Rating value rules.

use crate::constants::{MAX_RATING, MAX_REVIEW_LENGTH, MIN_RATING};
use crate::error::{DomainError, DomainResult};

/// Ensure a rating lies in the accepted 1..=5 range.
pub fn validate_rating(rating: i32) -> DomainResult<i32> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(DomainError::validation(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )))
    }
}

/// Trim a review and enforce its length limit.
pub fn normalize_review(review: Option<String>) -> DomainResult<Option<String>> {
    let review = review
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    if let Some(ref text) = review {
        if text.chars().count() > MAX_REVIEW_LENGTH {
            return Err(DomainError::validation(format!(
                "Review cannot exceed {} characters",
                MAX_REVIEW_LENGTH
            )));
        }
    }

    Ok(review)
}

/// Arithmetic mean of the given ratings; 0 for an empty set.
pub fn average_rating<I>(ratings: I) -> f64
where
    I: IntoIterator<Item = i32>,
{
    let (sum, count) = ratings
        .into_iter()
        .fold((0i64, 0u64), |(sum, count), r| (sum + i64::from(r), count + 1));

    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
