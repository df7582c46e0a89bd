use std::fmt;

use shelf_model::ModelError;
use thiserror::Error;

/// The entity a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Library,
    Author,
    Category,
    Book,
    Member,
    Borrowing,
    Review,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Library => "Library",
            EntityKind::Author => "Author",
            EntityKind::Category => "Category",
            EntityKind::Book => "Book",
            EntityKind::Member => "Member",
            EntityKind::Borrowing => "Borrowing",
            EntityKind::Review => "Review",
        };
        f.write_str(name)
    }
}

/// Business-rule rejections from the circulation lifecycle.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    #[error("Book not available")]
    BookUnavailable,
    #[error("Member is not active")]
    MemberInactive,
    #[error("Book already returned")]
    AlreadyReturned,
}

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("{0} not found")]
    NotFound(EntityKind),

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error(transparent)]
    Conflict(#[from] ConflictKind),

    /// Stored state broke an accounting invariant. Never a caller mistake.
    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShelfError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ShelfError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// A write pointed at a row that does not exist.
    pub(crate) fn missing_reference(context: &str) -> Self {
        ShelfError::validation(
            "reference",
            format!("{context}: referenced record does not exist"),
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ShelfError::NotFound(_))
    }

    pub fn conflict(&self) -> Option<ConflictKind> {
        match self {
            ShelfError::Conflict(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl From<ModelError> for ShelfError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidField { field, reason } => {
                ShelfError::Validation { field, reason }
            }
        }
    }
}

impl From<sqlx::Error> for ShelfError {
    fn from(err: sqlx::Error) -> Self {
        ShelfError::Internal(format!("Database operation failed: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, ShelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_messages_match_wire_text() {
        let err = ShelfError::from(ConflictKind::BookUnavailable);
        assert_eq!(err.to_string(), "Book not available");
        assert_eq!(err.conflict(), Some(ConflictKind::BookUnavailable));
    }

    #[test]
    fn model_errors_become_validation() {
        let err: ShelfError =
            ModelError::invalid("rating", "must be between 1 and 5").into();
        assert!(matches!(
            err,
            ShelfError::Validation { field: "rating", .. }
        ));
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(
            ShelfError::NotFound(EntityKind::Member).to_string(),
            "Member not found"
        );
    }
}
