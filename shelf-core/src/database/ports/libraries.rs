use async_trait::async_trait;
use shelf_model::{Library, LibraryId, NewLibrary};

use crate::error::Result;

/// Repository port for the library aggregate root.
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Insert a library; the store assigns id and `created_at`.
    async fn create_library(&self, library: NewLibrary) -> Result<Library>;

    async fn get_library(&self, id: LibraryId) -> Result<Option<Library>>;

    async fn list_libraries(&self) -> Result<Vec<Library>>;

    /// Persist the mutable fields of an existing library.
    async fn update_library(&self, library: &Library) -> Result<Library>;

    /// Delete a library together with its books and members (and their
    /// borrowings and reviews). Copies held by the library's members on
    /// books elsewhere are returned first. Returns `false` when absent.
    async fn delete_library(&self, id: LibraryId) -> Result<bool>;

    async fn count_libraries(&self) -> Result<u64>;
}
