use chrono::NaiveDate;
use serde::Deserialize;
use shelf_model::{AuthorId, BookId, BorrowingId, CategoryId, LibraryId, MemberId};

use super::deserialize_some;

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryInput {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LibraryPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl From<LibraryInput> for LibraryPatch {
    fn from(input: LibraryInput) -> Self {
        Self {
            name: Some(input.name),
            address: Some(input.address),
            phone: Some(input.phone),
            email: Some(input.email),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorInput {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// `Some(None)` clears the birth date.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub birth_date: Option<Option<NaiveDate>>,
}

impl From<AuthorInput> for AuthorPatch {
    fn from(input: AuthorInput) -> Self {
        Self {
            name: Some(input.name),
            bio: Some(input.bio),
            birth_date: Some(input.birth_date),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<CategoryInput> for CategoryPatch {
    fn from(input: CategoryInput) -> Self {
        Self {
            name: Some(input.name),
            description: Some(input.description),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookInput {
    pub title: String,
    pub isbn: String,
    #[serde(alias = "library_id")]
    pub library: LibraryId,
    #[serde(default)]
    pub author_ids: Vec<AuthorId>,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
    pub publication_date: NaiveDate,
    pub publisher: String,
    pub total_copies: i32,
    pub available_copies: i32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub isbn: Option<String>,
    #[serde(alias = "library_id")]
    pub library: Option<LibraryId>,
    pub author_ids: Option<Vec<AuthorId>>,
    pub category_ids: Option<Vec<CategoryId>>,
    pub publication_date: Option<NaiveDate>,
    pub publisher: Option<String>,
    pub total_copies: Option<i32>,
    pub available_copies: Option<i32>,
    pub description: Option<String>,
}

impl From<BookInput> for BookPatch {
    fn from(input: BookInput) -> Self {
        Self {
            title: Some(input.title),
            isbn: Some(input.isbn),
            library: Some(input.library),
            author_ids: Some(input.author_ids),
            category_ids: Some(input.category_ids),
            publication_date: Some(input.publication_date),
            publisher: Some(input.publisher),
            total_copies: Some(input.total_copies),
            available_copies: Some(input.available_copies),
            description: Some(input.description),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(alias = "library_id")]
    pub library: LibraryId,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(alias = "library_id")]
    pub library: Option<LibraryId>,
    pub is_active: Option<bool>,
}

impl From<MemberInput> for MemberPatch {
    fn from(input: MemberInput) -> Self {
        Self {
            name: Some(input.name),
            email: Some(input.email),
            phone: Some(input.phone),
            address: Some(input.address),
            library: Some(input.library),
            is_active: Some(input.is_active),
        }
    }
}

/// Direct creation of a borrowing record.
#[derive(Debug, Clone, Deserialize)]
pub struct BorrowingInput {
    #[serde(alias = "book_id")]
    pub book: BookId,
    #[serde(alias = "member_id")]
    pub member: MemberId,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_returned: bool,
}

/// Full update of a borrowing. Only the due date is mutable; other fields
/// in the body are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct BorrowingUpdate {
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BorrowingPatch {
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    #[serde(alias = "book_id")]
    pub book: BookId,
    #[serde(alias = "member_id")]
    pub member: MemberId,
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

/// Full update of a review. The (book, member) pair is fixed at creation.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewUpdate {
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReviewPatch {
    pub rating: Option<i16>,
    pub comment: Option<String>,
}

impl From<ReviewUpdate> for ReviewPatch {
    fn from(update: ReviewUpdate) -> Self {
        Self {
            rating: Some(update.rating),
            comment: Some(update.comment),
        }
    }
}

/// Body of `POST /api/books/borrow/`.
#[derive(Debug, Clone, Deserialize)]
pub struct BorrowRequest {
    pub book_id: BookId,
    pub member_id: MemberId,
    /// Loan length; the configured default applies when absent.
    #[serde(default)]
    pub days: Option<i64>,
}

/// Body of `POST /api/books/return/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnRequest {
    pub borrowing_id: BorrowingId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}
