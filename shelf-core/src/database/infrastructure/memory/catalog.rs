use async_trait::async_trait;
use chrono::Utc;
use shelf_model::{
    Author, AuthorId, Book, BookId, BorrowCount, Category, CategoryId, Library,
    LibraryId, NewAuthor, NewBook, NewCategory, NewLibrary,
};
use std::collections::HashMap;
use tracing::{debug, info};

use super::{InMemoryDatabase, next_id, normalized};
use crate::database::ports::{
    authors::AuthorRepository,
    books::{BookRepository, BookUpdateOutcome, CopyCounts},
    categories::CategoryRepository, libraries::LibraryRepository,
};
use crate::error::{EntityKind, Result, ShelfError};

#[async_trait]
impl LibraryRepository for InMemoryDatabase {
    async fn create_library(&self, library: NewLibrary) -> Result<Library> {
        let mut state = self.state.lock().await;
        let id = LibraryId(next_id(&mut state.sequences.library));
        let library = Library {
            id,
            name: library.name,
            address: library.address,
            phone: library.phone,
            email: library.email,
            created_at: Utc::now(),
        };
        state.libraries.insert(id, library.clone());
        Ok(library)
    }

    async fn get_library(&self, id: LibraryId) -> Result<Option<Library>> {
        let state = self.state.lock().await;
        Ok(state.libraries.get(&id).cloned())
    }

    async fn list_libraries(&self) -> Result<Vec<Library>> {
        let state = self.state.lock().await;
        Ok(state.libraries.values().cloned().collect())
    }

    async fn update_library(&self, library: &Library) -> Result<Library> {
        let mut state = self.state.lock().await;
        let stored = state
            .libraries
            .get_mut(&library.id)
            .ok_or(ShelfError::NotFound(EntityKind::Library))?;

        stored.name = library.name.clone();
        stored.address = library.address.clone();
        stored.phone = library.phone.clone();
        stored.email = library.email.clone();
        Ok(stored.clone())
    }

    async fn delete_library(&self, id: LibraryId) -> Result<bool> {
        let mut state = self.state.lock().await;
        if !state.libraries.contains_key(&id) {
            return Ok(false);
        }

        let member_ids: Vec<_> = state
            .members
            .values()
            .filter(|member| member.library_id == id)
            .map(|member| member.id)
            .collect();
        state.release_held_copies(|loan| member_ids.contains(&loan.member_id))?;

        let book_ids: Vec<_> = state
            .books
            .values()
            .filter(|book| book.library_id == id)
            .map(|book| book.id)
            .collect();
        for book_id in &book_ids {
            state.books.remove(book_id);
            state.drop_book_rows(*book_id);
        }
        for member_id in &member_ids {
            state.members.remove(member_id);
            state.drop_member_rows(*member_id);
        }
        state.libraries.remove(&id);

        info!(library_id = %id, "library deleted with its books and members");
        Ok(true)
    }

    async fn count_libraries(&self) -> Result<u64> {
        let state = self.state.lock().await;
        Ok(state.libraries.len() as u64)
    }
}

#[async_trait]
impl AuthorRepository for InMemoryDatabase {
    async fn create_author(&self, author: NewAuthor) -> Result<Author> {
        let mut state = self.state.lock().await;
        let id = AuthorId(next_id(&mut state.sequences.author));
        let author = Author {
            id,
            name: author.name,
            bio: author.bio,
            birth_date: author.birth_date,
        };
        state.authors.insert(id, author.clone());
        Ok(author)
    }

    async fn get_author(&self, id: AuthorId) -> Result<Option<Author>> {
        let state = self.state.lock().await;
        Ok(state.authors.get(&id).cloned())
    }

    async fn get_authors(&self, ids: &[AuthorId]) -> Result<Vec<Author>> {
        let state = self.state.lock().await;
        Ok(normalized(ids)
            .iter()
            .filter_map(|id| state.authors.get(id).cloned())
            .collect())
    }

    async fn list_authors(&self) -> Result<Vec<Author>> {
        let state = self.state.lock().await;
        Ok(state.authors.values().cloned().collect())
    }

    async fn update_author(&self, author: &Author) -> Result<Author> {
        let mut state = self.state.lock().await;
        let stored = state
            .authors
            .get_mut(&author.id)
            .ok_or(ShelfError::NotFound(EntityKind::Author))?;
        *stored = author.clone();
        Ok(stored.clone())
    }

    async fn delete_author(&self, id: AuthorId) -> Result<bool> {
        let mut state = self.state.lock().await;
        if state.authors.remove(&id).is_none() {
            return Ok(false);
        }
        for book in state.books.values_mut() {
            book.author_ids.retain(|author| *author != id);
        }
        Ok(true)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryDatabase {
    async fn create_category(&self, category: NewCategory) -> Result<Category> {
        let mut state = self.state.lock().await;
        if state.categories.values().any(|c| c.name == category.name) {
            return Err(ShelfError::validation(
                "name",
                "category with this name already exists.",
            ));
        }

        let id = CategoryId(next_id(&mut state.sequences.category));
        let category = Category {
            id,
            name: category.name,
            description: category.description,
        };
        state.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let state = self.state.lock().await;
        Ok(state.categories.get(&id).cloned())
    }

    async fn get_categories(
        &self,
        ids: &[CategoryId],
    ) -> Result<Vec<Category>> {
        let state = self.state.lock().await;
        Ok(normalized(ids)
            .iter()
            .filter_map(|id| state.categories.get(id).cloned())
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let state = self.state.lock().await;
        Ok(state.categories.values().cloned().collect())
    }

    async fn update_category(&self, category: &Category) -> Result<Category> {
        let mut state = self.state.lock().await;
        let name_taken = state
            .categories
            .values()
            .any(|c| c.id != category.id && c.name == category.name);
        if name_taken {
            return Err(ShelfError::validation(
                "name",
                "category with this name already exists.",
            ));
        }

        let stored = state
            .categories
            .get_mut(&category.id)
            .ok_or(ShelfError::NotFound(EntityKind::Category))?;
        *stored = category.clone();
        Ok(stored.clone())
    }

    async fn delete_category(&self, id: CategoryId) -> Result<bool> {
        let mut state = self.state.lock().await;
        if state.categories.remove(&id).is_none() {
            return Ok(false);
        }
        for book in state.books.values_mut() {
            book.category_ids.retain(|category| *category != id);
        }
        Ok(true)
    }
}

#[async_trait]
impl BookRepository for InMemoryDatabase {
    async fn create_book(&self, book: NewBook) -> Result<Book> {
        let mut state = self.state.lock().await;

        let mut stored = Book {
            id: BookId(0),
            title: book.title,
            isbn: book.isbn,
            library_id: book.library_id,
            author_ids: normalized(&book.author_ids),
            category_ids: normalized(&book.category_ids),
            publication_date: book.publication_date,
            publisher: book.publisher,
            total_copies: book.total_copies,
            available_copies: book.available_copies,
            description: book.description,
        };
        state.check_book_row(&stored, "Failed to create book")?;

        stored.id = BookId(next_id(&mut state.sequences.book));
        state.books.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_book(&self, id: BookId) -> Result<Option<Book>> {
        let state = self.state.lock().await;
        Ok(state.books.get(&id).cloned())
    }

    async fn list_books(&self) -> Result<Vec<Book>> {
        let state = self.state.lock().await;
        Ok(state.books.values().cloned().collect())
    }

    async fn update_book(
        &self,
        book: &Book,
        copies_read: Option<CopyCounts>,
    ) -> Result<BookUpdateOutcome> {
        let mut state = self.state.lock().await;
        let Some(stored) = state.books.get(&book.id) else {
            return Ok(BookUpdateOutcome::Missing);
        };

        let mut updated = book.clone();
        match copies_read {
            Some(read) if read != CopyCounts::of(stored) => {
                return Ok(BookUpdateOutcome::CopiesChanged);
            }
            Some(_) => {}
            None => {
                updated.total_copies = stored.total_copies;
                updated.available_copies = stored.available_copies;
            }
        }
        updated.author_ids = normalized(&book.author_ids);
        updated.category_ids = normalized(&book.category_ids);
        state.check_book_row(&updated, "Failed to update book")?;

        state.books.insert(updated.id, updated.clone());
        Ok(BookUpdateOutcome::Updated(updated))
    }

    async fn delete_book(&self, id: BookId) -> Result<bool> {
        let mut state = self.state.lock().await;
        if state.books.remove(&id).is_none() {
            return Ok(false);
        }
        state.drop_book_rows(id);
        Ok(true)
    }

    async fn count_books(&self) -> Result<u64> {
        let state = self.state.lock().await;
        Ok(state.books.len() as u64)
    }

    async fn search_books(&self, query: &str) -> Result<Vec<Book>> {
        let state = self.state.lock().await;
        let needle = query.to_lowercase();
        debug!(query, "searching books");

        let matches = |text: &str| text.to_lowercase().contains(&needle);
        Ok(state
            .books
            .values()
            .filter(|book| {
                matches(&book.title)
                    || book.author_ids.iter().any(|id| {
                        state.authors.get(id).is_some_and(|a| matches(&a.name))
                    })
                    || book.category_ids.iter().any(|id| {
                        state.categories.get(id).is_some_and(|c| matches(&c.name))
                    })
            })
            .cloned()
            .collect())
    }

    async fn most_borrowed_books(&self, limit: usize) -> Result<Vec<BorrowCount>> {
        let state = self.state.lock().await;

        let mut counts: HashMap<BookId, i64> = HashMap::new();
        for loan in state.borrowings.values() {
            *counts.entry(loan.book_id).or_default() += 1;
        }

        // books iterate in ascending id, and the sort is stable
        let mut ranked: Vec<BorrowCount> = state
            .books
            .values()
            .map(|book| BorrowCount {
                book_id: book.id,
                title: book.title.clone(),
                borrow_count: counts.get(&book.id).copied().unwrap_or_default(),
            })
            .collect();
        ranked.sort_by(|a, b| b.borrow_count.cmp(&a.borrow_count));
        ranked.truncate(limit);
        Ok(ranked)
    }
}
