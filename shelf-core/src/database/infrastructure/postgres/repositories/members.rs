use async_trait::async_trait;
use shelf_model::{LibraryId, Member, MemberId, NewMember};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use super::borrowings::release_held_copies;
use crate::database::infrastructure::postgres::{count_to_u64, map_write_error};
use crate::database::ports::members::MemberRepository;
use crate::error::{EntityKind, Result, ShelfError};

const MEMBER_COLUMNS: &str =
    "id, name, email, phone, address, library_id, membership_date, is_active";

#[derive(Clone, Debug)]
pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Member> {
        Ok(Member {
            id: MemberId(row.try_get("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            library_id: LibraryId(row.try_get("library_id")?),
            membership_date: row.try_get("membership_date")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn create_member(&self, member: NewMember) -> Result<Member> {
        let sql = format!(
            r#"
            INSERT INTO members (name, email, phone, address, library_id, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {MEMBER_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(&member.name)
            .bind(&member.email)
            .bind(&member.phone)
            .bind(&member.address)
            .bind(member.library_id.get())
            .bind(member.is_active)
            .fetch_one(self.pool())
            .await
            .map_err(|e| map_write_error(e, "Failed to create member"))?;

        Self::map_row(&row)
    }

    async fn get_member(&self, id: MemberId) -> Result<Option<Member>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list_members(&self) -> Result<Vec<Member>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members ORDER BY id");
        let rows = sqlx::query(&sql).fetch_all(self.pool()).await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update_member(&self, member: &Member) -> Result<Member> {
        let sql = format!(
            r#"
            UPDATE members
            SET name = $2, email = $3, phone = $4, address = $5,
                library_id = $6, is_active = $7
            WHERE id = $1
            RETURNING {MEMBER_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(member.id.get())
            .bind(&member.name)
            .bind(&member.email)
            .bind(&member.phone)
            .bind(&member.address)
            .bind(member.library_id.get())
            .bind(member.is_active)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_write_error(e, "Failed to update member"))?
            .ok_or(ShelfError::NotFound(EntityKind::Member))?;

        Self::map_row(&row)
    }

    async fn delete_member(&self, id: MemberId) -> Result<bool> {
        let mut tx = self.pool().begin().await?;

        release_held_copies(&mut tx, "member_id = $1", id.get()).await?;

        let deleted = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, "Failed to delete member"))?
            .rows_affected();

        tx.commit().await?;

        if deleted > 0 {
            info!(member_id = %id, "member deleted");
        }
        Ok(deleted > 0)
    }

    async fn count_members(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(self.pool())
            .await?;
        Ok(count_to_u64(count))
    }
}
