//! Core data model definitions shared across Shelf crates.
//!
//! Entities are plain data holders. The only behaviour that lives here is
//! derived predicates (`Book::is_available`) and the invariant checks each
//! mutation path must run before persisting.
#![allow(missing_docs)]

pub use ::chrono;

pub mod author;
pub mod book;
pub mod borrowing;
pub mod category;
pub mod error;
pub mod ids;
pub mod library;
pub mod member;
pub mod reports;
pub mod review;

pub use author::{Author, NewAuthor};
pub use book::{Book, NewBook};
pub use borrowing::{Borrowing, BorrowingState, NewBorrowing};
pub use category::{Category, NewCategory};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{
    AuthorId, BookId, BorrowingId, CategoryId, LibraryId, MemberId, ReviewId,
};
pub use library::{Library, NewLibrary};
pub use member::{Member, NewMember};
pub use reports::{AvailabilityReport, BorrowCount, LibraryStatistics};
pub use review::{NewReview, RATING_RANGE, Review};
