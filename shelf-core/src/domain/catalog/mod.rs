//! Libraries, authors, categories and books.

mod books;
mod classification;
mod libraries;

use crate::application::AppUnitOfWork;

/// CRUD with boundary validation over the catalog entities.
#[derive(Clone, Debug)]
pub struct CatalogService {
    uow: AppUnitOfWork,
}

impl CatalogService {
    pub fn new(uow: AppUnitOfWork) -> Self {
        Self { uow }
    }
}
