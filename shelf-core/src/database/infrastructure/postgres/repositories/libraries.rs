use async_trait::async_trait;
use shelf_model::{Library, LibraryId, NewLibrary};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use super::borrowings::release_held_copies;
use crate::database::infrastructure::postgres::{count_to_u64, map_write_error};
use crate::database::ports::libraries::LibraryRepository;
use crate::error::{EntityKind, Result, ShelfError};

#[derive(Clone, Debug)]
pub struct PostgresLibraryRepository {
    pool: PgPool,
}

impl PostgresLibraryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Library> {
        Ok(Library {
            id: LibraryId(row.try_get("id")?),
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl LibraryRepository for PostgresLibraryRepository {
    async fn create_library(&self, library: NewLibrary) -> Result<Library> {
        let row = sqlx::query(
            r#"
            INSERT INTO libraries (name, address, phone, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, address, phone, email, created_at
            "#,
        )
        .bind(&library.name)
        .bind(&library.address)
        .bind(&library.phone)
        .bind(&library.email)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Failed to create library"))?;

        Self::map_row(&row)
    }

    async fn get_library(&self, id: LibraryId) -> Result<Option<Library>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, address, phone, email, created_at
            FROM libraries
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list_libraries(&self) -> Result<Vec<Library>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, address, phone, email, created_at
            FROM libraries
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update_library(&self, library: &Library) -> Result<Library> {
        let row = sqlx::query(
            r#"
            UPDATE libraries
            SET name = $2, address = $3, phone = $4, email = $5
            WHERE id = $1
            RETURNING id, name, address, phone, email, created_at
            "#,
        )
        .bind(library.id.get())
        .bind(&library.name)
        .bind(&library.address)
        .bind(&library.phone)
        .bind(&library.email)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Failed to update library"))?
        .ok_or(ShelfError::NotFound(EntityKind::Library))?;

        Self::map_row(&row)
    }

    async fn delete_library(&self, id: LibraryId) -> Result<bool> {
        let mut tx = self.pool().begin().await?;

        release_held_copies(
            &mut tx,
            "member_id IN (SELECT id FROM members WHERE library_id = $1)",
            id.get(),
        )
        .await?;

        // books, members, their links, loans and reviews cascade
        let deleted = sqlx::query("DELETE FROM libraries WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, "Failed to delete library"))?
            .rows_affected();

        tx.commit().await?;

        if deleted > 0 {
            info!(library_id = %id, "library deleted with its books and members");
        }
        Ok(deleted > 0)
    }

    async fn count_libraries(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM libraries")
            .fetch_one(self.pool())
            .await?;
        Ok(count_to_u64(count))
    }
}
