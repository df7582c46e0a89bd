use shelf_model::{Library, LibraryId, NewLibrary};
use tracing::info;

use super::CatalogService;
use crate::api_types::{LibraryInput, LibraryPatch};
use crate::domain::validation::{NAME_MAX_LEN, check_email, check_phone, require_text};
use crate::error::{EntityKind, Result, ShelfError};

fn validate(name: &str, address: &str, phone: &str, email: &str) -> Result<()> {
    require_text("name", name, NAME_MAX_LEN)?;
    require_text("address", address, usize::MAX)?;
    check_phone(phone)?;
    check_email(email)
}

impl CatalogService {
    pub async fn list_libraries(&self) -> Result<Vec<Library>> {
        self.uow.libraries.list_libraries().await
    }

    pub async fn get_library(&self, id: LibraryId) -> Result<Library> {
        self.uow
            .libraries
            .get_library(id)
            .await?
            .ok_or(ShelfError::NotFound(EntityKind::Library))
    }

    pub async fn create_library(&self, input: LibraryInput) -> Result<Library> {
        validate(&input.name, &input.address, &input.phone, &input.email)?;

        let library = self
            .uow
            .libraries
            .create_library(NewLibrary {
                name: input.name,
                address: input.address,
                phone: input.phone,
                email: input.email,
            })
            .await?;

        info!(library_id = %library.id, "library created");
        Ok(library)
    }

    pub async fn update_library(
        &self,
        id: LibraryId,
        input: LibraryInput,
    ) -> Result<Library> {
        self.patch_library(id, input.into()).await
    }

    pub async fn patch_library(
        &self,
        id: LibraryId,
        patch: LibraryPatch,
    ) -> Result<Library> {
        let mut library = self.get_library(id).await?;

        if let Some(name) = patch.name {
            library.name = name;
        }
        if let Some(address) = patch.address {
            library.address = address;
        }
        if let Some(phone) = patch.phone {
            library.phone = phone;
        }
        if let Some(email) = patch.email {
            library.email = email;
        }
        validate(&library.name, &library.address, &library.phone, &library.email)?;

        self.uow.libraries.update_library(&library).await
    }

    /// Cascades to the library's books and members.
    pub async fn delete_library(&self, id: LibraryId) -> Result<()> {
        if self.uow.libraries.delete_library(id).await? {
            Ok(())
        } else {
            Err(ShelfError::NotFound(EntityKind::Library))
        }
    }
}
