use async_trait::async_trait;
use shelf_model::{Book, BookId, BorrowCount, NewBook};

use crate::error::Result;

/// Copy counts as the caller read them before an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyCounts {
    pub total: i32,
    pub available: i32,
}

impl CopyCounts {
    pub fn of(book: &Book) -> Self {
        Self {
            total: book.total_copies,
            available: book.available_copies,
        }
    }
}

/// Result of a book update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookUpdateOutcome {
    Updated(Book),
    Missing,
    /// A borrow or return moved the copy counts after they were read.
    /// Nothing was written.
    CopiesChanged,
}

/// Repository port for books and their author/category links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a book with its links. Duplicate ISBNs fail with `Validation`.
    async fn create_book(&self, book: NewBook) -> Result<Book>;

    async fn get_book(&self, id: BookId) -> Result<Option<Book>>;

    /// All books in ascending id order.
    async fn list_books(&self) -> Result<Vec<Book>>;

    /// Replace the descriptive fields and both link sets of a book.
    ///
    /// With `copies_read` unset the stored copy counts are left alone and the
    /// returned book carries them. With it set, `total_copies` and
    /// `available_copies` from `book` are written only while the stored
    /// counts still equal `copies_read`.
    async fn update_book(
        &self,
        book: &Book,
        copies_read: Option<CopyCounts>,
    ) -> Result<BookUpdateOutcome>;

    /// Delete a book, its links, borrowings and reviews.
    async fn delete_book(&self, id: BookId) -> Result<bool>;

    async fn count_books(&self) -> Result<u64>;

    /// Books whose title, any author name or any category name contains
    /// `query` case-insensitively. Each book appears once, ascending id.
    async fn search_books(&self, query: &str) -> Result<Vec<Book>>;

    /// Books ranked by lifetime borrowing count, highest first. Ties keep
    /// ascending id order.
    async fn most_borrowed_books(&self, limit: usize) -> Result<Vec<BorrowCount>>;
}
