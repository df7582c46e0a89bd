use async_trait::async_trait;
use shelf_model::{Member, MemberId, NewMember};

use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert a member; `membership_date` is set to today by the store.
    /// Duplicate emails fail with `Validation`.
    async fn create_member(&self, member: NewMember) -> Result<Member>;

    async fn get_member(&self, id: MemberId) -> Result<Option<Member>>;

    async fn list_members(&self) -> Result<Vec<Member>>;

    /// Persist mutable fields. `membership_date` is never rewritten.
    async fn update_member(&self, member: &Member) -> Result<Member>;

    /// Delete a member with its borrowings and reviews, returning copies
    /// held by active borrowings to their books.
    async fn delete_member(&self, id: MemberId) -> Result<bool>;

    async fn count_members(&self) -> Result<u64>;
}
