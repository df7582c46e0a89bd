use chrono::{Days, NaiveDate};

use crate::error::{Result, ShelfError};

pub const DEFAULT_LOAN_DAYS: u32 = 14;
pub const MAX_LOAN_DAYS: u32 = 365;

/// Loan length rules for `borrow_book`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPolicy {
    pub default_loan_days: u32,
    pub max_loan_days: u32,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            default_loan_days: DEFAULT_LOAN_DAYS,
            max_loan_days: MAX_LOAN_DAYS,
        }
    }
}

impl LoanPolicy {
    pub fn new(default_loan_days: u32, max_loan_days: u32) -> Self {
        Self {
            default_loan_days,
            max_loan_days,
        }
    }

    /// Resolve the requested loan length, or the default when absent.
    pub fn loan_days(&self, requested: Option<i64>) -> Result<u32> {
        let Some(days) = requested else {
            return Ok(self.default_loan_days);
        };

        u32::try_from(days)
            .ok()
            .filter(|days| (1..=self.max_loan_days).contains(days))
            .ok_or_else(|| {
                ShelfError::validation(
                    "days",
                    format!("must be between 1 and {}", self.max_loan_days),
                )
            })
    }

    pub fn due_date(&self, today: NaiveDate, days: u32) -> Result<NaiveDate> {
        today
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or_else(|| ShelfError::validation("days", "due date out of range"))
    }
}
