use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::database::ports::{
    authors::AuthorRepository, books::BookRepository,
    borrowings::BorrowingRepository, categories::CategoryRepository,
    libraries::LibraryRepository, members::MemberRepository,
    reviews::ReviewRepository,
};
use crate::database::{
    infrastructure::{
        memory::InMemoryDatabase,
        postgres::{
            PostgresAuthorRepository, PostgresBookRepository,
            PostgresBorrowingRepository, PostgresCategoryRepository,
            PostgresLibraryRepository, PostgresMemberRepository,
            PostgresReviewRepository,
        },
    },
    postgres::PostgresDatabase,
};

/// Aggregates the repository ports used by the domain services.
///
/// Every field may come from a different adapter, which is how tests swap a
/// single repository for a mock.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub libraries: Arc<dyn LibraryRepository>,
    pub authors: Arc<dyn AuthorRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub books: Arc<dyn BookRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub borrowings: Arc<dyn BorrowingRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("libraries", &type_name_of_val(self.libraries.as_ref()))
            .field("authors", &type_name_of_val(self.authors.as_ref()))
            .field("categories", &type_name_of_val(self.categories.as_ref()))
            .field("books", &type_name_of_val(self.books.as_ref()))
            .field("members", &type_name_of_val(self.members.as_ref()))
            .field("borrowings", &type_name_of_val(self.borrowings.as_ref()))
            .field("reviews", &type_name_of_val(self.reviews.as_ref()))
            .finish()
    }
}

#[derive(Default)]
pub struct AppUnitOfWorkBuilder {
    libraries: Option<Arc<dyn LibraryRepository>>,
    authors: Option<Arc<dyn AuthorRepository>>,
    categories: Option<Arc<dyn CategoryRepository>>,
    books: Option<Arc<dyn BookRepository>>,
    members: Option<Arc<dyn MemberRepository>>,
    borrowings: Option<Arc<dyn BorrowingRepository>>,
    reviews: Option<Arc<dyn ReviewRepository>>,
}

impl fmt::Debug for AppUnitOfWorkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWorkBuilder")
            .field("libraries", &self.libraries.is_some())
            .field("authors", &self.authors.is_some())
            .field("categories", &self.categories.is_some())
            .field("books", &self.books.is_some())
            .field("members", &self.members.is_some())
            .field("borrowings", &self.borrowings.is_some())
            .field("reviews", &self.reviews.is_some())
            .finish()
    }
}

impl AppUnitOfWorkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_libraries(mut self, repo: Arc<dyn LibraryRepository>) -> Self {
        self.libraries = Some(repo);
        self
    }
    pub fn with_authors(mut self, repo: Arc<dyn AuthorRepository>) -> Self {
        self.authors = Some(repo);
        self
    }
    pub fn with_categories(
        mut self,
        repo: Arc<dyn CategoryRepository>,
    ) -> Self {
        self.categories = Some(repo);
        self
    }
    pub fn with_books(mut self, repo: Arc<dyn BookRepository>) -> Self {
        self.books = Some(repo);
        self
    }
    pub fn with_members(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.members = Some(repo);
        self
    }
    pub fn with_borrowings(
        mut self,
        repo: Arc<dyn BorrowingRepository>,
    ) -> Self {
        self.borrowings = Some(repo);
        self
    }
    pub fn with_reviews(mut self, repo: Arc<dyn ReviewRepository>) -> Self {
        self.reviews = Some(repo);
        self
    }

    /// Populate every slot with Postgres-backed adapters sharing one pool.
    pub fn with_postgres(self, db: &PostgresDatabase) -> Self {
        self.with_all(AppUnitOfWork::from_postgres(db))
    }

    /// Populate every slot with one shared in-memory store.
    pub fn with_memory(self, db: InMemoryDatabase) -> Self {
        self.with_all(AppUnitOfWork::from_memory(db))
    }

    fn with_all(self, uow: AppUnitOfWork) -> Self {
        self.with_libraries(uow.libraries)
            .with_authors(uow.authors)
            .with_categories(uow.categories)
            .with_books(uow.books)
            .with_members(uow.members)
            .with_borrowings(uow.borrowings)
            .with_reviews(uow.reviews)
    }

    /// Build a validated unit of work. Fails with the name of the first
    /// missing repository.
    pub fn build(self) -> Result<AppUnitOfWork, String> {
        Ok(AppUnitOfWork {
            libraries: self
                .libraries
                .ok_or_else(|| "missing LibraryRepository".to_string())?,
            authors: self
                .authors
                .ok_or_else(|| "missing AuthorRepository".to_string())?,
            categories: self
                .categories
                .ok_or_else(|| "missing CategoryRepository".to_string())?,
            books: self
                .books
                .ok_or_else(|| "missing BookRepository".to_string())?,
            members: self
                .members
                .ok_or_else(|| "missing MemberRepository".to_string())?,
            borrowings: self
                .borrowings
                .ok_or_else(|| "missing BorrowingRepository".to_string())?,
            reviews: self
                .reviews
                .ok_or_else(|| "missing ReviewRepository".to_string())?,
        })
    }
}

impl AppUnitOfWork {
    pub fn builder() -> AppUnitOfWorkBuilder {
        AppUnitOfWorkBuilder::new()
    }

    /// Compose all Postgres-backed repositories into a unit of work.
    pub fn from_postgres(db: &PostgresDatabase) -> Self {
        let pool = db.pool().clone();

        Self {
            libraries: Arc::new(PostgresLibraryRepository::new(pool.clone())),
            authors: Arc::new(PostgresAuthorRepository::new(pool.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(pool.clone())),
            books: Arc::new(PostgresBookRepository::new(pool.clone())),
            members: Arc::new(PostgresMemberRepository::new(pool.clone())),
            borrowings: Arc::new(PostgresBorrowingRepository::new(pool.clone())),
            reviews: Arc::new(PostgresReviewRepository::new(pool)),
        }
    }

    /// A unit of work over a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::from_memory(InMemoryDatabase::new())
    }

    /// Every port served by the same in-memory store.
    pub fn from_memory(db: InMemoryDatabase) -> Self {
        let db = Arc::new(db);

        Self {
            libraries: db.clone(),
            authors: db.clone(),
            categories: db.clone(),
            books: db.clone(),
            members: db.clone(),
            borrowings: db.clone(),
            reviews: db,
        }
    }
}
