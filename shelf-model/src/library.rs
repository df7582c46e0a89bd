use crate::chrono::{DateTime, Utc};
use crate::ids::LibraryId;

/// A lending library. Root aggregate for its books and members: deleting a
/// library deletes both.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Library {
    pub id: LibraryId,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Library fields supplied on creation; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLibrary {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}
