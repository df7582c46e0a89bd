use async_trait::async_trait;
use shelf_model::{
    AuthorId, Book, BookId, BorrowCount, CategoryId, LibraryId, NewBook,
};
use sqlx::{PgConnection, PgPool, Row, postgres::PgRow};
use tracing::debug;

use crate::database::infrastructure::postgres::{
    contains_pattern, count_to_u64, map_write_error,
};
use crate::database::ports::books::{
    BookRepository, BookUpdateOutcome, CopyCounts,
};
use crate::error::{EntityKind, Result, ShelfError};

const BOOK_COLUMNS: &str = r#"
    b.id, b.title, b.isbn, b.library_id, b.publication_date, b.publisher,
    b.total_copies, b.available_copies, b.description,
    ARRAY(
        SELECT ba.author_id FROM book_authors ba
        WHERE ba.book_id = b.id ORDER BY ba.author_id
    ) AS author_ids,
    ARRAY(
        SELECT bc.category_id FROM book_categories bc
        WHERE bc.book_id = b.id ORDER BY bc.category_id
    ) AS category_ids
"#;

#[derive(Clone, Debug)]
pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Book> {
        let author_ids: Vec<i64> = row.try_get("author_ids")?;
        let category_ids: Vec<i64> = row.try_get("category_ids")?;

        Ok(Book {
            id: BookId(row.try_get("id")?),
            title: row.try_get("title")?,
            isbn: row.try_get("isbn")?,
            library_id: LibraryId(row.try_get("library_id")?),
            author_ids: author_ids.into_iter().map(AuthorId).collect(),
            category_ids: category_ids.into_iter().map(CategoryId).collect(),
            publication_date: row.try_get("publication_date")?,
            publisher: row.try_get("publisher")?,
            total_copies: row.try_get("total_copies")?,
            available_copies: row.try_get("available_copies")?,
            description: row.try_get("description")?,
        })
    }

    async fn replace_links(
        conn: &mut PgConnection,
        book_id: BookId,
        author_ids: &[AuthorId],
        category_ids: &[CategoryId],
    ) -> Result<()> {
        sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
            .bind(book_id.get())
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM book_categories WHERE book_id = $1")
            .bind(book_id.get())
            .execute(&mut *conn)
            .await?;

        let authors: Vec<i64> = author_ids.iter().map(AuthorId::get).collect();
        sqlx::query(
            r#"
            INSERT INTO book_authors (book_id, author_id)
            SELECT $1, UNNEST($2::bigint[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(book_id.get())
        .bind(authors)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_write_error(e, "Failed to link authors"))?;

        let categories: Vec<i64> =
            category_ids.iter().map(CategoryId::get).collect();
        sqlx::query(
            r#"
            INSERT INTO book_categories (book_id, category_id)
            SELECT $1, UNNEST($2::bigint[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(book_id.get())
        .bind(categories)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_write_error(e, "Failed to link categories"))?;

        Ok(())
    }

    async fn fetch_book(conn: &mut PgConnection, id: BookId) -> Result<Option<Book>> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books b WHERE b.id = $1");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(conn)
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn create_book(&self, book: NewBook) -> Result<Book> {
        let mut tx = self.pool().begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO books (
                title, isbn, library_id, publication_date, publisher,
                total_copies, available_copies, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(book.library_id.get())
        .bind(book.publication_date)
        .bind(&book.publisher)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .bind(&book.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create book"))?;

        let id = BookId(id);
        Self::replace_links(&mut tx, id, &book.author_ids, &book.category_ids)
            .await?;
        let created = Self::fetch_book(&mut tx, id).await?.ok_or_else(|| {
            ShelfError::Internal("Inserted book vanished".to_string())
        })?;

        tx.commit().await?;
        Ok(created)
    }

    async fn get_book(&self, id: BookId) -> Result<Option<Book>> {
        let mut conn = self.pool().acquire().await?;
        Self::fetch_book(&mut conn, id).await
    }

    async fn list_books(&self) -> Result<Vec<Book>> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books b ORDER BY b.id");
        let rows = sqlx::query(&sql).fetch_all(self.pool()).await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update_book(
        &self,
        book: &Book,
        copies_read: Option<CopyCounts>,
    ) -> Result<BookUpdateOutcome> {
        let mut tx = self.pool().begin().await?;

        // Copy columns are written only while they still hold the counts
        // the caller read.
        let sql = match copies_read {
            None => {
                r#"
                UPDATE books
                SET title = $2,
                    isbn = $3,
                    library_id = $4,
                    publication_date = $5,
                    publisher = $6,
                    description = $7
                WHERE id = $1
                "#
            }
            Some(_) => {
                r#"
                UPDATE books
                SET title = $2,
                    isbn = $3,
                    library_id = $4,
                    publication_date = $5,
                    publisher = $6,
                    description = $7,
                    total_copies = $8,
                    available_copies = $9
                WHERE id = $1
                  AND total_copies = $10
                  AND available_copies = $11
                "#
            }
        };

        let mut query = sqlx::query(sql)
            .bind(book.id.get())
            .bind(&book.title)
            .bind(&book.isbn)
            .bind(book.library_id.get())
            .bind(book.publication_date)
            .bind(&book.publisher)
            .bind(&book.description);
        if let Some(read) = copies_read {
            query = query
                .bind(book.total_copies)
                .bind(book.available_copies)
                .bind(read.total)
                .bind(read.available);
        }

        let updated = query
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, "Failed to update book"))?
            .rows_affected();

        if updated == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                    .bind(book.id.get())
                    .fetch_one(&mut *tx)
                    .await?;
            tx.rollback().await?;
            return Ok(if exists {
                debug!(book_id = %book.id, "copy counts moved before update");
                BookUpdateOutcome::CopiesChanged
            } else {
                BookUpdateOutcome::Missing
            });
        }

        Self::replace_links(&mut tx, book.id, &book.author_ids, &book.category_ids)
            .await?;
        let stored = Self::fetch_book(&mut tx, book.id)
            .await?
            .ok_or(ShelfError::NotFound(EntityKind::Book))?;

        tx.commit().await?;
        Ok(BookUpdateOutcome::Updated(stored))
    }

    async fn delete_book(&self, id: BookId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await
            .map_err(|e| map_write_error(e, "Failed to delete book"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_books(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(self.pool())
            .await?;
        Ok(count_to_u64(count))
    }

    async fn search_books(&self, query: &str) -> Result<Vec<Book>> {
        let pattern = contains_pattern(query);
        debug!(query, "searching books");

        // EXISTS keeps one row per book however many links match.
        let sql = format!(
            r#"
            SELECT {BOOK_COLUMNS}
            FROM books b
            WHERE b.title ILIKE $1
               OR EXISTS (
                    SELECT 1 FROM book_authors ba
                    JOIN authors a ON a.id = ba.author_id
                    WHERE ba.book_id = b.id AND a.name ILIKE $1
               )
               OR EXISTS (
                    SELECT 1 FROM book_categories bc
                    JOIN categories c ON c.id = bc.category_id
                    WHERE bc.book_id = b.id AND c.name ILIKE $1
               )
            ORDER BY b.id
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(pattern)
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn most_borrowed_books(&self, limit: usize) -> Result<Vec<BorrowCount>> {
        let rows = sqlx::query(
            r#"
            SELECT b.id, b.title, COUNT(br.id) AS borrow_count
            FROM books b
            LEFT JOIN borrowings br ON br.book_id = b.id
            GROUP BY b.id, b.title
            ORDER BY borrow_count DESC, b.id ASC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                Ok(BorrowCount {
                    book_id: BookId(row.try_get("id")?),
                    title: row.try_get("title")?,
                    borrow_count: row.try_get("borrow_count")?,
                })
            })
            .collect()
    }
}
