use std::ops::RangeInclusive;

use crate::chrono::{DateTime, Utc};
use crate::error::{ModelError, Result};
use crate::ids::{BookId, MemberId, ReviewId};

pub const RATING_RANGE: RangeInclusive<i16> = 1..=5;

/// A member's rating of a book. At most one per (book, member) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Review {
    pub id: ReviewId,
    #[cfg_attr(feature = "serde", serde(rename = "book"))]
    pub book_id: BookId,
    #[cfg_attr(feature = "serde", serde(rename = "member"))]
    pub member_id: MemberId,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub rating: i16,
    pub comment: String,
}

pub fn check_rating(rating: i16) -> Result<()> {
    if RATING_RANGE.contains(&rating) {
        Ok(())
    } else {
        Err(ModelError::invalid(
            "rating",
            format!(
                "must be between {} and {}",
                RATING_RANGE.start(),
                RATING_RANGE.end()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(check_rating(1).is_ok());
        assert!(check_rating(5).is_ok());
        assert!(check_rating(0).is_err());
        assert!(check_rating(6).is_err());
    }
}
