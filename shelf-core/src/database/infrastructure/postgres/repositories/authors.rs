use async_trait::async_trait;
use shelf_model::{Author, AuthorId, NewAuthor};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::database::infrastructure::postgres::map_write_error;
use crate::database::ports::authors::AuthorRepository;
use crate::error::{EntityKind, Result, ShelfError};

#[derive(Clone, Debug)]
pub struct PostgresAuthorRepository {
    pool: PgPool,
}

impl PostgresAuthorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Author> {
        Ok(Author {
            id: AuthorId(row.try_get("id")?),
            name: row.try_get("name")?,
            bio: row.try_get("bio")?,
            birth_date: row.try_get("birth_date")?,
        })
    }
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn create_author(&self, author: NewAuthor) -> Result<Author> {
        let row = sqlx::query(
            r#"
            INSERT INTO authors (name, bio, birth_date)
            VALUES ($1, $2, $3)
            RETURNING id, name, bio, birth_date
            "#,
        )
        .bind(&author.name)
        .bind(&author.bio)
        .bind(author.birth_date)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Failed to create author"))?;

        Self::map_row(&row)
    }

    async fn get_author(&self, id: AuthorId) -> Result<Option<Author>> {
        let row = sqlx::query(
            "SELECT id, name, bio, birth_date FROM authors WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn get_authors(&self, ids: &[AuthorId]) -> Result<Vec<Author>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(AuthorId::get).collect();

        let rows = sqlx::query(
            r#"
            SELECT id, name, bio, birth_date
            FROM authors
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(raw)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn list_authors(&self) -> Result<Vec<Author>> {
        let rows = sqlx::query(
            "SELECT id, name, bio, birth_date FROM authors ORDER BY id",
        )
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update_author(&self, author: &Author) -> Result<Author> {
        let row = sqlx::query(
            r#"
            UPDATE authors
            SET name = $2, bio = $3, birth_date = $4
            WHERE id = $1
            RETURNING id, name, bio, birth_date
            "#,
        )
        .bind(author.id.get())
        .bind(&author.name)
        .bind(&author.bio)
        .bind(author.birth_date)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Failed to update author"))?
        .ok_or(ShelfError::NotFound(EntityKind::Author))?;

        Self::map_row(&row)
    }

    async fn delete_author(&self, id: AuthorId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await
            .map_err(|e| map_write_error(e, "Failed to delete author"))?;

        Ok(result.rows_affected() > 0)
    }
}
