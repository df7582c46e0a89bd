use chrono::NaiveDate;
use serde::Serialize;
use shelf_model::{
    Author, Book, BookId, Borrowing, Category, LibraryId, Review,
};

/// A book with its authors and categories expanded.
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    pub id: BookId,
    pub title: String,
    pub isbn: String,
    pub library: LibraryId,
    pub authors: Vec<Author>,
    pub categories: Vec<Category>,
    pub publication_date: NaiveDate,
    pub publisher: String,
    pub total_copies: i32,
    pub available_copies: i32,
    pub description: String,
}

impl BookView {
    pub fn new(book: Book, authors: Vec<Author>, categories: Vec<Category>) -> Self {
        Self {
            id: book.id,
            title: book.title,
            isbn: book.isbn,
            library: book.library_id,
            authors,
            categories,
            publication_date: book.publication_date,
            publisher: book.publisher,
            total_copies: book.total_copies,
            available_copies: book.available_copies,
            description: book.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
    pub isbn: String,
    pub available_copies: i32,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            isbn: book.isbn.clone(),
            available_copies: book.available_copies,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BorrowingView {
    #[serde(flatten)]
    pub borrowing: Borrowing,
    pub book_details: BookSummary,
    pub member_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub member_name: String,
}
