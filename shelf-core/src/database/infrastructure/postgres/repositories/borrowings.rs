use async_trait::async_trait;
use chrono::NaiveDate;
use shelf_model::{BookId, Borrowing, BorrowingId, MemberId, NewBorrowing};
use sqlx::{PgConnection, PgPool, Row, postgres::PgRow};
use tracing::{debug, error, warn};

use crate::database::infrastructure::postgres::{count_to_u64, map_write_error};
use crate::database::ports::borrowings::{
    BorrowingFilter, BorrowingRepository, CheckInOutcome, CheckoutOutcome,
};
use crate::error::{Result, ShelfError};

const BORROWING_COLUMNS: &str =
    "id, book_id, member_id, borrow_date, due_date, return_date, is_returned";

const FILTER_CLAUSE: &str = r#"
    ($1::bigint IS NULL OR member_id = $1)
    AND ($2::bigint IS NULL OR book_id = $2)
    AND ($3::boolean IS NULL OR is_returned = $3)
"#;

/// Give back one copy per active loan matched by `loans_clause` (which
/// binds `$1` to `id`). Must run before the rows it matches are deleted.
pub(crate) async fn release_held_copies(
    conn: &mut PgConnection,
    loans_clause: &str,
    id: i64,
) -> Result<()> {
    let sql = format!(
        r#"
        UPDATE books b
        SET available_copies = b.available_copies + held.copies
        FROM (
            SELECT book_id, COUNT(*)::int AS copies
            FROM borrowings
            WHERE {loans_clause} AND NOT is_returned
            GROUP BY book_id
        ) held
        WHERE b.id = held.book_id
        "#
    );

    let released = sqlx::query(&sql)
        .bind(id)
        .execute(conn)
        .await
        .map_err(|e| {
            let overflow = matches!(
                &e,
                sqlx::Error::Database(db) if db.is_check_violation()
            );
            if overflow {
                error!(error = %e, "returning held copies overflowed a book");
                ShelfError::Invariant(
                    "returning held copies would exceed total copies".to_string(),
                )
            } else {
                map_write_error(e, "Failed to release held copies")
            }
        })?
        .rows_affected();

    if released > 0 {
        debug!(books = released, "released copies held by active loans");
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct PostgresBorrowingRepository {
    pool: PgPool,
}

impl PostgresBorrowingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Borrowing> {
        Ok(Borrowing {
            id: BorrowingId(row.try_get("id")?),
            book_id: BookId(row.try_get("book_id")?),
            member_id: MemberId(row.try_get("member_id")?),
            borrow_date: row.try_get("borrow_date")?,
            due_date: row.try_get("due_date")?,
            return_date: row.try_get("return_date")?,
            is_returned: row.try_get("is_returned")?,
        })
    }

    /// `UPDATE ... WHERE available_copies < total_copies`; false when the
    /// book is already full.
    async fn restore_copy(conn: &mut PgConnection, book_id: BookId) -> Result<bool> {
        let restored = sqlx::query(
            r#"
            UPDATE books
            SET available_copies = available_copies + 1
            WHERE id = $1 AND available_copies < total_copies
            "#,
        )
        .bind(book_id.get())
        .execute(conn)
        .await?
        .rows_affected();

        Ok(restored > 0)
    }
}

#[async_trait]
impl BorrowingRepository for PostgresBorrowingRepository {
    async fn get_borrowing(&self, id: BorrowingId) -> Result<Option<Borrowing>> {
        let sql = format!("SELECT {BORROWING_COLUMNS} FROM borrowings WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list_borrowings(
        &self,
        filter: BorrowingFilter,
    ) -> Result<Vec<Borrowing>> {
        let sql = format!(
            "SELECT {BORROWING_COLUMNS} FROM borrowings WHERE {FILTER_CLAUSE} \
             ORDER BY borrow_date DESC, id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(filter.member_id.map(i64::from))
            .bind(filter.book_id.map(i64::from))
            .bind(filter.is_returned)
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn count_borrowings(&self, filter: BorrowingFilter) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM borrowings WHERE {FILTER_CLAUSE}");
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(filter.member_id.map(i64::from))
            .bind(filter.book_id.map(i64::from))
            .bind(filter.is_returned)
            .fetch_one(self.pool())
            .await?;

        Ok(count_to_u64(count))
    }

    async fn checkout(&self, loan: NewBorrowing) -> Result<CheckoutOutcome> {
        // One statement: the insert only sees a row when the conditional
        // decrement claimed a copy.
        let sql = format!(
            r#"
            WITH claimed AS (
                UPDATE books
                SET available_copies = available_copies - 1
                WHERE id = $1 AND available_copies > 0
                RETURNING id
            )
            INSERT INTO borrowings (book_id, member_id, borrow_date, due_date)
            SELECT claimed.id, $2, $3, $4 FROM claimed
            RETURNING {BORROWING_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(loan.book_id.get())
            .bind(loan.member_id.get())
            .bind(loan.borrow_date)
            .bind(loan.due_date)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_write_error(e, "Failed to record borrowing"))?;

        match row {
            Some(row) => Ok(CheckoutOutcome::Recorded(Self::map_row(&row)?)),
            None => Ok(CheckoutOutcome::Unavailable),
        }
    }

    async fn record_returned(&self, loan: NewBorrowing) -> Result<Borrowing> {
        let sql = format!(
            r#"
            INSERT INTO borrowings (
                book_id, member_id, borrow_date, due_date, return_date, is_returned
            )
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING {BORROWING_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(loan.book_id.get())
            .bind(loan.member_id.get())
            .bind(loan.borrow_date)
            .bind(loan.due_date)
            .bind(loan.return_date)
            .fetch_one(self.pool())
            .await
            .map_err(|e| map_write_error(e, "Failed to record borrowing"))?;

        Self::map_row(&row)
    }

    async fn check_in(
        &self,
        id: BorrowingId,
        returned_on: NaiveDate,
    ) -> Result<CheckInOutcome> {
        let mut tx = self.pool().begin().await?;

        let sql = format!(
            r#"
            UPDATE borrowings
            SET is_returned = TRUE, return_date = $2
            WHERE id = $1 AND NOT is_returned
            RETURNING {BORROWING_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(id.get())
            .bind(returned_on)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            let exists: Option<bool> =
                sqlx::query_scalar("SELECT is_returned FROM borrowings WHERE id = $1")
                    .bind(id.get())
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;

            return Ok(match exists {
                Some(_) => CheckInOutcome::AlreadyReturned,
                None => CheckInOutcome::Missing,
            });
        };

        let borrowing = Self::map_row(&row)?;
        if !Self::restore_copy(&mut tx, borrowing.book_id).await? {
            tx.rollback().await?;
            warn!(
                borrowing_id = %id,
                book_id = %borrowing.book_id,
                "check-in would exceed total copies, rolled back"
            );
            return Ok(CheckInOutcome::CopiesOverflow {
                book_id: borrowing.book_id,
            });
        }

        tx.commit().await?;
        Ok(CheckInOutcome::Returned(borrowing))
    }

    async fn update_due_date(
        &self,
        id: BorrowingId,
        due_date: NaiveDate,
    ) -> Result<Option<Borrowing>> {
        let sql = format!(
            "UPDATE borrowings SET due_date = $2 WHERE id = $1 \
             RETURNING {BORROWING_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id.get())
            .bind(due_date)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn delete_borrowing(&self, id: BorrowingId) -> Result<bool> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query(
            "DELETE FROM borrowings WHERE id = $1 RETURNING book_id, is_returned",
        )
        .bind(id.get())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(false);
        };

        let book_id = BookId(row.try_get("book_id")?);
        let is_returned: bool = row.try_get("is_returned")?;
        if !is_returned && !Self::restore_copy(&mut tx, book_id).await? {
            tx.rollback().await?;
            error!(borrowing_id = %id, book_id = %book_id, "deleting active loan would exceed total copies");
            return Err(ShelfError::Invariant(format!(
                "book {book_id} already has all copies available"
            )));
        }

        tx.commit().await?;
        Ok(true)
    }
}
