use crate::chrono::{DateTime, NaiveDate, Utc};
use crate::ids::{BookId, BorrowingId, MemberId};

/// One loan of one copy of a book to one member.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Borrowing {
    pub id: BorrowingId,
    #[cfg_attr(feature = "serde", serde(rename = "book"))]
    pub book_id: BookId,
    #[cfg_attr(feature = "serde", serde(rename = "member"))]
    pub member_id: MemberId,
    pub borrow_date: DateTime<Utc>,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub is_returned: bool,
}

/// Lifecycle of a loan. `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowingState {
    Active,
    Returned,
}

impl Borrowing {
    pub fn state(&self) -> BorrowingState {
        if self.is_returned {
            BorrowingState::Returned
        } else {
            BorrowingState::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == BorrowingState::Active
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && self.due_date < today
    }
}

/// A loan about to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBorrowing {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub borrow_date: DateTime<Utc>,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub is_returned: bool,
}

impl NewBorrowing {
    /// An active loan starting at `borrow_date`.
    pub fn active(
        book_id: BookId,
        member_id: MemberId,
        borrow_date: DateTime<Utc>,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            book_id,
            member_id,
            borrow_date,
            due_date,
            return_date: None,
            is_returned: false,
        }
    }
}
