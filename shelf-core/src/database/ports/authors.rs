use async_trait::async_trait;
use shelf_model::{Author, AuthorId, NewAuthor};

use crate::error::Result;

#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn create_author(&self, author: NewAuthor) -> Result<Author>;

    async fn get_author(&self, id: AuthorId) -> Result<Option<Author>>;

    /// Fetch the subset of `ids` that exist, ordered by id.
    async fn get_authors(&self, ids: &[AuthorId]) -> Result<Vec<Author>>;

    async fn list_authors(&self) -> Result<Vec<Author>>;

    async fn update_author(&self, author: &Author) -> Result<Author>;

    /// Delete an author and unlink it from every book.
    async fn delete_author(&self, id: AuthorId) -> Result<bool>;
}
