//! Process-local adapter implementing every repository port over one
//! mutex-guarded state. Each port call holds the lock for its whole body,
//! so multi-row writes (checkout, check-in, cascading deletes) are atomic
//! with respect to each other.
//!
//! Uniqueness, reference and copy-count rules mirror the constraints of the
//! Postgres schema and fail with the same error kinds.

mod catalog;
mod circulation;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use shelf_model::{
    Author, AuthorId, Book, BookId, Borrowing, BorrowingId, Category,
    CategoryId, Library, LibraryId, Member, MemberId, Review, ReviewId,
};
use tokio::sync::Mutex;
use tracing::error;

use crate::error::{Result, ShelfError};

#[derive(Clone, Debug, Default)]
pub struct InMemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Last id handed out per table. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
struct Sequences {
    library: i64,
    author: i64,
    category: i64,
    book: i64,
    member: i64,
    borrowing: i64,
    review: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Debug, Default)]
struct MemoryState {
    sequences: Sequences,
    libraries: BTreeMap<LibraryId, Library>,
    authors: BTreeMap<AuthorId, Author>,
    categories: BTreeMap<CategoryId, Category>,
    books: BTreeMap<BookId, Book>,
    members: BTreeMap<MemberId, Member>,
    borrowings: BTreeMap<BorrowingId, Borrowing>,
    reviews: BTreeMap<ReviewId, Review>,
}

impl MemoryState {
    fn ensure_library(&self, id: LibraryId, context: &str) -> Result<()> {
        if self.libraries.contains_key(&id) {
            Ok(())
        } else {
            Err(ShelfError::missing_reference(context))
        }
    }

    fn ensure_book_and_member(
        &self,
        book_id: BookId,
        member_id: MemberId,
        context: &str,
    ) -> Result<()> {
        if self.books.contains_key(&book_id) && self.members.contains_key(&member_id)
        {
            Ok(())
        } else {
            Err(ShelfError::missing_reference(context))
        }
    }

    /// Validate a book row the way the `books` constraints would.
    fn check_book_row(&self, book: &Book, context: &str) -> Result<()> {
        self.ensure_library(book.library_id, context)?;

        let authors_exist = book
            .author_ids
            .iter()
            .all(|id| self.authors.contains_key(id));
        let categories_exist = book
            .category_ids
            .iter()
            .all(|id| self.categories.contains_key(id));
        if !authors_exist || !categories_exist {
            return Err(ShelfError::missing_reference(context));
        }

        let isbn_taken = self
            .books
            .values()
            .any(|other| other.id != book.id && other.isbn == book.isbn);
        if isbn_taken {
            return Err(ShelfError::validation(
                "isbn",
                "book with this isbn already exists.",
            ));
        }

        book.check_copies()?;
        Ok(())
    }

    fn check_member_row(&self, member: &Member, context: &str) -> Result<()> {
        self.ensure_library(member.library_id, context)?;

        let email_taken = self
            .members
            .values()
            .any(|other| other.id != member.id && other.email == member.email);
        if email_taken {
            return Err(ShelfError::validation(
                "email",
                "member with this email already exists.",
            ));
        }
        Ok(())
    }

    /// Give back one copy per active loan matching `held`. Nothing is
    /// written if any book would end up above its total.
    fn release_held_copies(
        &mut self,
        held: impl Fn(&Borrowing) -> bool,
    ) -> Result<()> {
        let mut per_book: HashMap<BookId, i32> = HashMap::new();
        for loan in self.borrowings.values() {
            if loan.is_active() && held(loan) {
                *per_book.entry(loan.book_id).or_default() += 1;
            }
        }

        for (book_id, copies) in &per_book {
            if let Some(book) = self.books.get(book_id)
                && book.available_copies + copies > book.total_copies
            {
                error!(book_id = %book_id, "returning held copies overflowed a book");
                return Err(ShelfError::Invariant(
                    "returning held copies would exceed total copies".to_string(),
                ));
            }
        }

        for (book_id, copies) in per_book {
            if let Some(book) = self.books.get_mut(&book_id) {
                book.available_copies += copies;
            }
        }
        Ok(())
    }

    fn drop_book_rows(&mut self, book_id: BookId) {
        self.borrowings.retain(|_, loan| loan.book_id != book_id);
        self.reviews.retain(|_, review| review.book_id != book_id);
    }

    fn drop_member_rows(&mut self, member_id: MemberId) {
        self.borrowings.retain(|_, loan| loan.member_id != member_id);
        self.reviews.retain(|_, review| review.member_id != member_id);
    }
}

/// Link sets are kept sorted and free of duplicates.
fn normalized<T: Ord + Copy>(ids: &[T]) -> Vec<T> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}
