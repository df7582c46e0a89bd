//! Read-only projections computed from the entities.

use crate::ids::BookId;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvailabilityReport {
    pub book_id: BookId,
    pub title: String,
    pub is_available: bool,
    pub available_copies: i32,
    pub total_copies: i32,
}

/// Lifetime loan count for one book.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorrowCount {
    pub book_id: BookId,
    pub title: String,
    pub borrow_count: i64,
}

/// Snapshot returned by the statistics endpoint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LibraryStatistics {
    pub total_books: u64,
    pub total_members: u64,
    pub active_borrowings: u64,
    pub total_libraries: u64,
    /// `None` when no reviews exist.
    pub average_rating: Option<f64>,
    pub most_borrowed_books: Vec<BorrowCount>,
}
