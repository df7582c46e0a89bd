use crate::chrono::NaiveDate;
use crate::ids::AuthorId;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub bio: String,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
    pub bio: String,
    pub birth_date: Option<NaiveDate>,
}
