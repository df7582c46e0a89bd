#![allow(dead_code)]

use chrono::NaiveDate;
use shelf_core::api_types::{
    AuthorInput, BookInput, CategoryInput, LibraryInput, MemberInput,
};
use shelf_core::model::{Author, AuthorId, Book, Category, CategoryId, Library, Member};
use shelf_core::{
    AppUnitOfWork, CatalogService, CirculationService, DiscoveryService,
    LoanPolicy, PatronService,
};

/// Every service wired over one fresh in-memory store.
#[derive(Clone, Debug)]
pub struct Fixture {
    pub uow: AppUnitOfWork,
    pub catalog: CatalogService,
    pub patrons: PatronService,
    pub circulation: CirculationService,
    pub discovery: DiscoveryService,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_uow(AppUnitOfWork::in_memory())
    }

    pub fn with_uow(uow: AppUnitOfWork) -> Self {
        Self {
            catalog: CatalogService::new(uow.clone()),
            patrons: PatronService::new(uow.clone()),
            circulation: CirculationService::new(uow.clone(), LoanPolicy::default()),
            discovery: DiscoveryService::new(uow.clone()),
            uow,
        }
    }

    pub async fn library(&self, name: &str) -> Library {
        self.catalog
            .create_library(LibraryInput {
                name: name.to_string(),
                address: "1 Main St".to_string(),
                phone: "555-0100".to_string(),
                email: format!("{}@libraries.test", name.to_lowercase().replace(' ', "-")),
            })
            .await
            .expect("library created")
    }

    pub async fn author(&self, name: &str) -> Author {
        self.catalog
            .create_author(AuthorInput {
                name: name.to_string(),
                bio: String::new(),
                birth_date: None,
            })
            .await
            .expect("author created")
    }

    pub async fn category(&self, name: &str) -> Category {
        self.catalog
            .create_category(CategoryInput {
                name: name.to_string(),
                description: String::new(),
            })
            .await
            .expect("category created")
    }

    pub async fn book(&self, library: &Library, title: &str, isbn: &str, copies: i32) -> Book {
        self.linked_book(library, title, isbn, copies, &[], &[]).await
    }

    pub async fn linked_book(
        &self,
        library: &Library,
        title: &str,
        isbn: &str,
        copies: i32,
        authors: &[AuthorId],
        categories: &[CategoryId],
    ) -> Book {
        self.catalog
            .create_book(book_input(library, title, isbn, copies, authors, categories))
            .await
            .expect("book created")
    }

    pub async fn member(&self, library: &Library, name: &str, active: bool) -> Member {
        self.patrons
            .create_member(MemberInput {
                name: name.to_string(),
                email: format!("{}@members.test", name.to_lowercase()),
                phone: "555-0199".to_string(),
                address: "2 Side St".to_string(),
                library: library.id,
                is_active: active,
            })
            .await
            .expect("member created")
    }
}

pub fn book_input(
    library: &Library,
    title: &str,
    isbn: &str,
    copies: i32,
    authors: &[AuthorId],
    categories: &[CategoryId],
) -> BookInput {
    BookInput {
        title: title.to_string(),
        isbn: isbn.to_string(),
        library: library.id,
        author_ids: authors.to_vec(),
        category_ids: categories.to_vec(),
        publication_date: NaiveDate::from_ymd_opt(1954, 7, 29).expect("valid date"),
        publisher: "Allen & Unwin".to_string(),
        total_copies: copies,
        available_copies: copies,
        description: String::new(),
    }
}
