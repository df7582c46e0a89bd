use async_trait::async_trait;
use shelf_model::{Category, CategoryId, NewCategory};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::database::infrastructure::postgres::map_write_error;
use crate::database::ports::categories::CategoryRepository;
use crate::error::{EntityKind, Result, ShelfError};

#[derive(Clone, Debug)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Category> {
        Ok(Category {
            id: CategoryId(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        })
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create_category(&self, category: NewCategory) -> Result<Category> {
        let row = sqlx::query(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            "#,
        )
        .bind(&category.name)
        .bind(&category.description)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Failed to create category"))?;

        Self::map_row(&row)
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let row = sqlx::query(
            "SELECT id, name, description FROM categories WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn get_categories(
        &self,
        ids: &[CategoryId],
    ) -> Result<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(CategoryId::get).collect();

        let rows = sqlx::query(
            r#"
            SELECT id, name, description
            FROM categories
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(raw)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, name, description FROM categories ORDER BY id",
        )
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update_category(&self, category: &Category) -> Result<Category> {
        let row = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, description = $3
            WHERE id = $1
            RETURNING id, name, description
            "#,
        )
        .bind(category.id.get())
        .bind(&category.name)
        .bind(&category.description)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Failed to update category"))?
        .ok_or(ShelfError::NotFound(EntityKind::Category))?;

        Self::map_row(&row)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await
            .map_err(|e| map_write_error(e, "Failed to delete category"))?;

        Ok(result.rows_affected() > 0)
    }
}
