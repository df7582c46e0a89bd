//! Strongly typed row identifiers.
//!
//! Every entity is keyed by a storage-assigned `i64`. Wrapping them keeps a
//! `BookId` from being passed where a `MemberId` is expected.

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`crate::Library`], the root aggregate.
    LibraryId
);
entity_id!(AuthorId);
entity_id!(CategoryId);
entity_id!(BookId);
entity_id!(MemberId);
entity_id!(
    /// Identifier of a single loan event.
    BorrowingId
);
entity_id!(ReviewId);
