//! PostgreSQL infrastructure adapters implementing the database ports.

pub mod repositories;

pub use repositories::authors::PostgresAuthorRepository;
pub use repositories::books::PostgresBookRepository;
pub use repositories::borrowings::PostgresBorrowingRepository;
pub use repositories::categories::PostgresCategoryRepository;
pub use repositories::libraries::PostgresLibraryRepository;
pub use repositories::members::PostgresMemberRepository;
pub use repositories::reviews::PostgresReviewRepository;

use tracing::error;

use crate::error::ShelfError;

/// Translate a failed write into the error taxonomy. Constraint names come
/// from the initial migration.
pub(crate) fn map_write_error(err: sqlx::Error, context: &str) -> ShelfError {
    if let sqlx::Error::Database(db) = &err {
        match db.constraint() {
            Some("books_isbn_key") => {
                return ShelfError::validation(
                    "isbn",
                    "book with this isbn already exists.",
                );
            }
            Some("members_email_key") => {
                return ShelfError::validation(
                    "email",
                    "member with this email already exists.",
                );
            }
            Some("categories_name_key") => {
                return ShelfError::validation(
                    "name",
                    "category with this name already exists.",
                );
            }
            Some("reviews_book_member_key") => {
                return ShelfError::validation(
                    "non_field_errors",
                    "The fields book, member must make a unique set.",
                );
            }
            Some("reviews_rating_check") => {
                return ShelfError::validation(
                    "rating",
                    "must be between 1 and 5",
                );
            }
            Some("borrowings_return_state_check") => {
                return ShelfError::validation(
                    "return_date",
                    "required once a borrowing is returned",
                );
            }
            Some("books_copies_check") => {
                return ShelfError::validation(
                    "available_copies",
                    "Available copies cannot exceed total copies",
                );
            }
            _ => {}
        }

        if db.is_foreign_key_violation() {
            return ShelfError::missing_reference(context);
        }
    }

    error!(error = %err, context, "database write failed");
    ShelfError::Internal(format!("{context}: {err}"))
}

/// `%query%` for ILIKE with the pattern metacharacters escaped.
pub(crate) fn contains_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

pub(crate) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}
