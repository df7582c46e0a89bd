use std::collections::HashMap;

use shelf_model::{AuthorId, Book, BookId, CategoryId, LibraryId, NewBook};
use tracing::{debug, info, warn};

use super::CatalogService;
use crate::api_types::{BookInput, BookPatch, BookView};
use crate::database::ports::books::{BookUpdateOutcome, CopyCounts};
use crate::domain::validation::{
    NAME_MAX_LEN, TITLE_MAX_LEN, check_isbn, invalid_pk, normalize_ids,
    require_text,
};
use crate::error::{EntityKind, Result, ShelfError};

const COPY_UPDATE_ATTEMPTS: u32 = 3;

impl CatalogService {
    pub async fn list_books(&self) -> Result<Vec<Book>> {
        self.uow.books.list_books().await
    }

    pub async fn get_book(&self, id: BookId) -> Result<Book> {
        self.uow
            .books
            .get_book(id)
            .await?
            .ok_or(ShelfError::NotFound(EntityKind::Book))
    }

    pub async fn create_book(&self, input: BookInput) -> Result<Book> {
        let book = NewBook {
            title: input.title,
            isbn: input.isbn,
            library_id: input.library,
            author_ids: normalize_ids(&input.author_ids),
            category_ids: normalize_ids(&input.category_ids),
            publication_date: input.publication_date,
            publisher: input.publisher,
            total_copies: input.total_copies,
            available_copies: input.available_copies,
            description: input.description,
        };

        require_text("title", &book.title, TITLE_MAX_LEN)?;
        check_isbn(&book.isbn)?;
        require_text("publisher", &book.publisher, NAME_MAX_LEN)?;
        book.check_copies()?;
        self.check_references(book.library_id, &book.author_ids, &book.category_ids)
            .await?;

        let book = self.uow.books.create_book(book).await?;
        info!(book_id = %book.id, isbn = %book.isbn, copies = book.total_copies, "book added to catalog");
        Ok(book)
    }

    pub async fn update_book(&self, id: BookId, input: BookInput) -> Result<Book> {
        self.patch_book(id, input.into()).await
    }

    /// Absent link lists keep the current links; present ones replace them.
    ///
    /// Copy counts are written only when the patch names one of them, and
    /// only against the counts just read. A borrow or return landing in
    /// between makes the update re-read and re-apply the patch.
    pub async fn patch_book(&self, id: BookId, patch: BookPatch) -> Result<Book> {
        let writes_copies =
            patch.total_copies.is_some() || patch.available_copies.is_some();

        for attempt in 1..=COPY_UPDATE_ATTEMPTS {
            let mut book = self.get_book(id).await?;
            let copies_read = writes_copies.then(|| CopyCounts::of(&book));
            apply_patch(&mut book, &patch);

            require_text("title", &book.title, TITLE_MAX_LEN)?;
            check_isbn(&book.isbn)?;
            require_text("publisher", &book.publisher, NAME_MAX_LEN)?;
            book.check_copies()?;
            self.check_references(book.library_id, &book.author_ids, &book.category_ids)
                .await?;

            match self.uow.books.update_book(&book, copies_read).await? {
                BookUpdateOutcome::Updated(book) => return Ok(book),
                BookUpdateOutcome::Missing => {
                    return Err(ShelfError::NotFound(EntityKind::Book));
                }
                BookUpdateOutcome::CopiesChanged => {
                    debug!(book_id = %id, attempt, "copy counts moved, re-reading book");
                }
            }
        }

        warn!(book_id = %id, "copy counts kept moving during update");
        Err(ShelfError::validation(
            "available_copies",
            "Copy counts changed while updating the book, retry the request",
        ))
    }

    /// Cascades to the book's borrowings and reviews.
    pub async fn delete_book(&self, id: BookId) -> Result<()> {
        if self.uow.books.delete_book(id).await? {
            info!(book_id = %id, "book removed from catalog");
            Ok(())
        } else {
            Err(ShelfError::NotFound(EntityKind::Book))
        }
    }

    /// Expand one book's author and category links.
    pub async fn book_view(&self, book: Book) -> Result<BookView> {
        let authors = self.uow.authors.get_authors(&book.author_ids).await?;
        let categories = self
            .uow
            .categories
            .get_categories(&book.category_ids)
            .await?;

        Ok(BookView::new(book, authors, categories))
    }

    /// Expand many books with one read of each link table.
    pub async fn book_views(&self, books: Vec<Book>) -> Result<Vec<BookView>> {
        if books.is_empty() {
            return Ok(Vec::new());
        }

        let authors: HashMap<_, _> = self
            .uow
            .authors
            .list_authors()
            .await?
            .into_iter()
            .map(|author| (author.id, author))
            .collect();
        let categories: HashMap<_, _> = self
            .uow
            .categories
            .list_categories()
            .await?
            .into_iter()
            .map(|category| (category.id, category))
            .collect();
        debug!(books = books.len(), "expanding book links");

        Ok(books
            .into_iter()
            .map(|book| {
                let book_authors = book
                    .author_ids
                    .iter()
                    .filter_map(|id| authors.get(id).cloned())
                    .collect();
                let book_categories = book
                    .category_ids
                    .iter()
                    .filter_map(|id| categories.get(id).cloned())
                    .collect();
                BookView::new(book, book_authors, book_categories)
            })
            .collect())
    }

    async fn check_references(
        &self,
        library_id: LibraryId,
        author_ids: &[AuthorId],
        category_ids: &[CategoryId],
    ) -> Result<()> {
        if self.uow.libraries.get_library(library_id).await?.is_none() {
            return Err(invalid_pk("library", library_id));
        }

        let found = self.uow.authors.get_authors(author_ids).await?;
        if let Some(missing) = author_ids
            .iter()
            .find(|id| !found.iter().any(|author| author.id == **id))
        {
            return Err(invalid_pk("author_ids", missing));
        }

        let found = self.uow.categories.get_categories(category_ids).await?;
        if let Some(missing) = category_ids
            .iter()
            .find(|id| !found.iter().any(|category| category.id == **id))
        {
            return Err(invalid_pk("category_ids", missing));
        }

        Ok(())
    }
}

fn apply_patch(book: &mut Book, patch: &BookPatch) {
    if let Some(title) = &patch.title {
        book.title = title.clone();
    }
    if let Some(isbn) = &patch.isbn {
        book.isbn = isbn.clone();
    }
    if let Some(library) = patch.library {
        book.library_id = library;
    }
    if let Some(author_ids) = &patch.author_ids {
        book.author_ids = normalize_ids(author_ids);
    }
    if let Some(category_ids) = &patch.category_ids {
        book.category_ids = normalize_ids(category_ids);
    }
    if let Some(publication_date) = patch.publication_date {
        book.publication_date = publication_date;
    }
    if let Some(publisher) = &patch.publisher {
        book.publisher = publisher.clone();
    }
    if let Some(total_copies) = patch.total_copies {
        book.total_copies = total_copies;
    }
    if let Some(available_copies) = patch.available_copies {
        book.available_copies = available_copies;
    }
    if let Some(description) = &patch.description {
        book.description = description.clone();
    }
}
