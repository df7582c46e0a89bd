use async_trait::async_trait;
use shelf_model::{BookId, MemberId, NewReview, Review, ReviewId};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::database::infrastructure::postgres::map_write_error;
use crate::database::ports::reviews::ReviewRepository;
use crate::error::{EntityKind, Result, ShelfError};

const REVIEW_COLUMNS: &str = "id, book_id, member_id, rating, comment, created_at";

#[derive(Clone, Debug)]
pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Review> {
        Ok(Review {
            id: ReviewId(row.try_get("id")?),
            book_id: BookId(row.try_get("book_id")?),
            member_id: MemberId(row.try_get("member_id")?),
            rating: row.try_get("rating")?,
            comment: row.try_get("comment")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn create_review(&self, review: NewReview) -> Result<Review> {
        let sql = format!(
            r#"
            INSERT INTO reviews (book_id, member_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING {REVIEW_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(review.book_id.get())
            .bind(review.member_id.get())
            .bind(review.rating)
            .bind(&review.comment)
            .fetch_one(self.pool())
            .await
            .map_err(|e| map_write_error(e, "Failed to create review"))?;

        Self::map_row(&row)
    }

    async fn get_review(&self, id: ReviewId) -> Result<Option<Review>> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list_reviews(&self) -> Result<Vec<Review>> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY id");
        let rows = sqlx::query(&sql).fetch_all(self.pool()).await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update_review(&self, review: &Review) -> Result<Review> {
        let sql = format!(
            r#"
            UPDATE reviews
            SET rating = $2, comment = $3
            WHERE id = $1
            RETURNING {REVIEW_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(review.id.get())
            .bind(review.rating)
            .bind(&review.comment)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_write_error(e, "Failed to update review"))?
            .ok_or(ShelfError::NotFound(EntityKind::Review))?;

        Self::map_row(&row)
    }

    async fn delete_review(&self, id: ReviewId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn average_rating(&self) -> Result<Option<f64>> {
        let average: Option<f64> =
            sqlx::query_scalar("SELECT AVG(rating)::float8 FROM reviews")
                .fetch_one(self.pool())
                .await?;
        Ok(average)
    }
}
