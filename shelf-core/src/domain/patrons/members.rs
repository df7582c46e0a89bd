use shelf_model::{LibraryId, Member, MemberId, NewMember};
use tracing::info;

use super::PatronService;
use crate::api_types::{MemberInput, MemberPatch};
use crate::domain::validation::{
    NAME_MAX_LEN, check_email, check_phone, invalid_pk, require_text,
};
use crate::error::{EntityKind, Result, ShelfError};

impl PatronService {
    pub async fn list_members(&self) -> Result<Vec<Member>> {
        self.uow.members.list_members().await
    }

    pub async fn get_member(&self, id: MemberId) -> Result<Member> {
        self.uow
            .members
            .get_member(id)
            .await?
            .ok_or(ShelfError::NotFound(EntityKind::Member))
    }

    pub async fn create_member(&self, input: MemberInput) -> Result<Member> {
        let member = NewMember {
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            library_id: input.library,
            is_active: input.is_active,
        };
        self.validate(
            &member.name,
            &member.email,
            &member.phone,
            &member.address,
            member.library_id,
        )
        .await?;

        let member = self.uow.members.create_member(member).await?;
        info!(member_id = %member.id, library_id = %member.library_id, "member registered");
        Ok(member)
    }

    pub async fn update_member(
        &self,
        id: MemberId,
        input: MemberInput,
    ) -> Result<Member> {
        self.patch_member(id, input.into()).await
    }

    /// `membership_date` is fixed at registration and never patched.
    pub async fn patch_member(&self, id: MemberId, patch: MemberPatch) -> Result<Member> {
        let mut member = self.get_member(id).await?;

        if let Some(name) = patch.name {
            member.name = name;
        }
        if let Some(email) = patch.email {
            member.email = email;
        }
        if let Some(phone) = patch.phone {
            member.phone = phone;
        }
        if let Some(address) = patch.address {
            member.address = address;
        }
        if let Some(library) = patch.library {
            member.library_id = library;
        }
        if let Some(is_active) = patch.is_active {
            if member.is_active != is_active {
                info!(member_id = %id, is_active, "member activation changed");
            }
            member.is_active = is_active;
        }
        self.validate(
            &member.name,
            &member.email,
            &member.phone,
            &member.address,
            member.library_id,
        )
        .await?;

        self.uow.members.update_member(&member).await
    }

    /// Copies held by the member's active borrowings go back to their books.
    pub async fn delete_member(&self, id: MemberId) -> Result<()> {
        if self.uow.members.delete_member(id).await? {
            Ok(())
        } else {
            Err(ShelfError::NotFound(EntityKind::Member))
        }
    }

    async fn validate(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        address: &str,
        library_id: LibraryId,
    ) -> Result<()> {
        require_text("name", name, NAME_MAX_LEN)?;
        check_email(email)?;
        check_phone(phone)?;
        require_text("address", address, usize::MAX)?;

        if self.uow.libraries.get_library(library_id).await?.is_none() {
            return Err(invalid_pk("library", library_id));
        }
        Ok(())
    }
}
