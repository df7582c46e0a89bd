//! Payloads accepted and produced by the HTTP surface.
//!
//! Foreign keys travel as `library`, `book` and `member`; full-replacement
//! inputs pair with patch types whose fields are all optional.

pub mod requests;
pub mod routes;
pub mod views;

pub use requests::{
    AuthorInput, AuthorPatch, BookInput, BookPatch, BorrowRequest,
    BorrowingInput, BorrowingPatch, BorrowingUpdate, CategoryInput,
    CategoryPatch, LibraryInput, LibraryPatch, MemberInput, MemberPatch,
    ReturnRequest, ReviewInput, ReviewPatch, ReviewUpdate, SearchQuery,
};
pub use views::{BookSummary, BookView, BorrowingView, ReviewView};

use serde::{Deserialize, Deserializer};

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field
/// (`None`, via `#[serde(default)]`).
pub(crate) fn deserialize_some<'de, T, D>(
    deserializer: D,
) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
