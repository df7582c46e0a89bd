use crate::chrono::NaiveDate;
use crate::error::{ModelError, Result};
use crate::ids::{AuthorId, BookId, CategoryId, LibraryId};

/// Longest ISBN the catalog accepts (ISBN-13 without separators).
pub const ISBN_MAX_LEN: usize = 13;

/// A catalogued title held by exactly one library.
///
/// `available_copies` is denormalized from the active borrowings so that
/// availability checks stay O(1); the circulation service keeps it in sync
/// inside the same transaction that records or closes a loan.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub isbn: String,
    #[cfg_attr(feature = "serde", serde(rename = "library"))]
    pub library_id: LibraryId,
    pub author_ids: Vec<AuthorId>,
    pub category_ids: Vec<CategoryId>,
    pub publication_date: NaiveDate,
    pub publisher: String,
    pub total_copies: i32,
    pub available_copies: i32,
    pub description: String,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Checks `0 <= available_copies <= total_copies`.
    pub fn check_copies(&self) -> Result<()> {
        check_copies(self.total_copies, self.available_copies)
    }
}

/// Book fields supplied on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub isbn: String,
    pub library_id: LibraryId,
    pub author_ids: Vec<AuthorId>,
    pub category_ids: Vec<CategoryId>,
    pub publication_date: NaiveDate,
    pub publisher: String,
    pub total_copies: i32,
    pub available_copies: i32,
    pub description: String,
}

impl NewBook {
    pub fn check_copies(&self) -> Result<()> {
        check_copies(self.total_copies, self.available_copies)
    }
}

pub fn check_copies(total: i32, available: i32) -> Result<()> {
    if total < 0 {
        return Err(ModelError::invalid(
            "total_copies",
            "must be zero or greater",
        ));
    }
    if available < 0 {
        return Err(ModelError::invalid(
            "available_copies",
            "must be zero or greater",
        ));
    }
    if available > total {
        return Err(ModelError::invalid(
            "available_copies",
            "Available copies cannot exceed total copies",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(total: i32, available: i32) -> Book {
        Book {
            id: BookId(1),
            title: "The Hobbit".into(),
            isbn: "9780261103344".into(),
            library_id: LibraryId(1),
            author_ids: vec![AuthorId(1)],
            category_ids: Vec::new(),
            publication_date: NaiveDate::from_ymd_opt(1937, 9, 21).unwrap(),
            publisher: "Allen & Unwin".into(),
            total_copies: total,
            available_copies: available,
            description: String::new(),
        }
    }

    #[test]
    fn availability_tracks_available_copies() {
        assert!(book(3, 1).is_available());
        assert!(!book(3, 0).is_available());
        assert!(!book(0, 0).is_available());
    }

    #[test]
    fn copy_invariant_rejects_overflow_and_negatives() {
        assert!(book(3, 3).check_copies().is_ok());
        assert!(book(0, 0).check_copies().is_ok());

        let err = book(2, 3).check_copies().unwrap_err();
        assert_eq!(err.field(), "available_copies");

        assert_eq!(book(-1, 0).check_copies().unwrap_err().field(), "total_copies");
        assert_eq!(
            book(1, -1).check_copies().unwrap_err().field(),
            "available_copies"
        );
    }
}
