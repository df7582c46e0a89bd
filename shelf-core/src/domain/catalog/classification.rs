use shelf_model::{Author, AuthorId, Category, CategoryId, NewAuthor, NewCategory};

use super::CatalogService;
use crate::api_types::{AuthorInput, AuthorPatch, CategoryInput, CategoryPatch};
use crate::domain::validation::{CATEGORY_NAME_MAX_LEN, NAME_MAX_LEN, require_text};
use crate::error::{EntityKind, Result, ShelfError};

impl CatalogService {
    pub async fn list_authors(&self) -> Result<Vec<Author>> {
        self.uow.authors.list_authors().await
    }

    pub async fn get_author(&self, id: AuthorId) -> Result<Author> {
        self.uow
            .authors
            .get_author(id)
            .await?
            .ok_or(ShelfError::NotFound(EntityKind::Author))
    }

    pub async fn create_author(&self, input: AuthorInput) -> Result<Author> {
        require_text("name", &input.name, NAME_MAX_LEN)?;

        self.uow
            .authors
            .create_author(NewAuthor {
                name: input.name,
                bio: input.bio,
                birth_date: input.birth_date,
            })
            .await
    }

    pub async fn update_author(
        &self,
        id: AuthorId,
        input: AuthorInput,
    ) -> Result<Author> {
        self.patch_author(id, input.into()).await
    }

    pub async fn patch_author(&self, id: AuthorId, patch: AuthorPatch) -> Result<Author> {
        let mut author = self.get_author(id).await?;

        if let Some(name) = patch.name {
            author.name = name;
        }
        if let Some(bio) = patch.bio {
            author.bio = bio;
        }
        if let Some(birth_date) = patch.birth_date {
            author.birth_date = birth_date;
        }
        require_text("name", &author.name, NAME_MAX_LEN)?;

        self.uow.authors.update_author(&author).await
    }

    /// Unlinks the author from its books; the books stay.
    pub async fn delete_author(&self, id: AuthorId) -> Result<()> {
        if self.uow.authors.delete_author(id).await? {
            Ok(())
        } else {
            Err(ShelfError::NotFound(EntityKind::Author))
        }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.uow.categories.list_categories().await
    }

    pub async fn get_category(&self, id: CategoryId) -> Result<Category> {
        self.uow
            .categories
            .get_category(id)
            .await?
            .ok_or(ShelfError::NotFound(EntityKind::Category))
    }

    pub async fn create_category(&self, input: CategoryInput) -> Result<Category> {
        require_text("name", &input.name, CATEGORY_NAME_MAX_LEN)?;

        self.uow
            .categories
            .create_category(NewCategory {
                name: input.name,
                description: input.description,
            })
            .await
    }

    pub async fn update_category(
        &self,
        id: CategoryId,
        input: CategoryInput,
    ) -> Result<Category> {
        self.patch_category(id, input.into()).await
    }

    pub async fn patch_category(
        &self,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category> {
        let mut category = self.get_category(id).await?;

        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(description) = patch.description {
            category.description = description;
        }
        require_text("name", &category.name, CATEGORY_NAME_MAX_LEN)?;

        self.uow.categories.update_category(&category).await
    }

    pub async fn delete_category(&self, id: CategoryId) -> Result<()> {
        if self.uow.categories.delete_category(id).await? {
            Ok(())
        } else {
            Err(ShelfError::NotFound(EntityKind::Category))
        }
    }
}
