use crate::chrono::NaiveDate;
use crate::ids::{LibraryId, MemberId};

/// A registered borrower. `membership_date` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[cfg_attr(feature = "serde", serde(rename = "library"))]
    pub library_id: LibraryId,
    pub membership_date: NaiveDate,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub library_id: LibraryId,
    pub is_active: bool,
}
