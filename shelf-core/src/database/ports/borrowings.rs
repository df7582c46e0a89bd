use async_trait::async_trait;
use chrono::NaiveDate;
use shelf_model::{BookId, Borrowing, BorrowingId, MemberId, NewBorrowing};

use crate::error::Result;

/// Predicate over borrowings. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorrowingFilter {
    pub member_id: Option<MemberId>,
    pub book_id: Option<BookId>,
    pub is_returned: Option<bool>,
}

impl BorrowingFilter {
    pub fn active() -> Self {
        Self {
            is_returned: Some(false),
            ..Self::default()
        }
    }

    pub fn for_member(member_id: MemberId) -> Self {
        Self {
            member_id: Some(member_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, borrowing: &Borrowing) -> bool {
        self.member_id.is_none_or(|id| borrowing.member_id == id)
            && self.book_id.is_none_or(|id| borrowing.book_id == id)
            && self.is_returned.is_none_or(|flag| borrowing.is_returned == flag)
    }
}

/// Result of the atomic claim-a-copy-and-record-the-loan step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Recorded(Borrowing),
    /// The book had no copy left when the conditional decrement ran (or the
    /// book vanished). Nothing was written.
    Unavailable,
}

/// Result of the atomic close-the-loan-and-restore-the-copy step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutcome {
    Returned(Borrowing),
    AlreadyReturned,
    Missing,
    /// Restoring the copy would push `available_copies` past
    /// `total_copies`. The transaction was rolled back.
    CopiesOverflow { book_id: BookId },
}

/// Repository port for loans, including the two copy-accounting
/// transactions of the circulation lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowingRepository: Send + Sync {
    async fn get_borrowing(&self, id: BorrowingId) -> Result<Option<Borrowing>>;

    /// Matching borrowings, newest `borrow_date` first (ties: higher id first).
    async fn list_borrowings(
        &self,
        filter: BorrowingFilter,
    ) -> Result<Vec<Borrowing>>;

    async fn count_borrowings(&self, filter: BorrowingFilter) -> Result<u64>;

    /// In one transaction: decrement the book's `available_copies` only if
    /// it is positive, then insert the active loan.
    async fn checkout(&self, loan: NewBorrowing) -> Result<CheckoutOutcome>;

    /// Insert an already-returned loan. Copy counts are untouched.
    async fn record_returned(&self, loan: NewBorrowing) -> Result<Borrowing>;

    /// In one transaction: mark the loan returned on `returned_on`, then
    /// increment the book's `available_copies` only if it stays within
    /// `total_copies`.
    async fn check_in(
        &self,
        id: BorrowingId,
        returned_on: NaiveDate,
    ) -> Result<CheckInOutcome>;

    async fn update_due_date(
        &self,
        id: BorrowingId,
        due_date: NaiveDate,
    ) -> Result<Option<Borrowing>>;

    /// Delete a loan. An active loan gives its copy back in the same
    /// transaction; if that would overflow the book the delete fails with
    /// `Invariant`.
    async fn delete_borrowing(&self, id: BorrowingId) -> Result<bool>;
}
