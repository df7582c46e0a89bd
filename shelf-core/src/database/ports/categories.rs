use async_trait::async_trait;
use shelf_model::{Category, CategoryId, NewCategory};

use crate::error::Result;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Fails with `Validation` when the name is already taken.
    async fn create_category(&self, category: NewCategory) -> Result<Category>;

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>>;

    /// Fetch the subset of `ids` that exist, ordered by id.
    async fn get_categories(&self, ids: &[CategoryId])
    -> Result<Vec<Category>>;

    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn update_category(&self, category: &Category) -> Result<Category>;

    async fn delete_category(&self, id: CategoryId) -> Result<bool>;
}
