//! Text search over the catalog and aggregate reporting.

use shelf_model::{Book, LibraryStatistics};
use tracing::debug;

use crate::application::AppUnitOfWork;
use crate::database::ports::borrowings::BorrowingFilter;
use crate::error::Result;

/// How many entries `most_borrowed_books` reports.
pub const MOST_BORROWED_LIMIT: usize = 5;

#[derive(Clone, Debug)]
pub struct DiscoveryService {
    uow: AppUnitOfWork,
}

impl DiscoveryService {
    pub fn new(uow: AppUnitOfWork) -> Self {
        Self { uow }
    }

    /// Books whose title, or any linked author or category name, contains
    /// `query` ignoring case. Each book once, ascending id. The query is
    /// matched as given, whitespace included; an empty query matches every
    /// book.
    pub async fn search_books(&self, query: &str) -> Result<Vec<Book>> {
        let books = self.uow.books.search_books(query).await?;
        debug!(query, hits = books.len(), "book search");
        Ok(books)
    }

    pub async fn statistics(&self) -> Result<LibraryStatistics> {
        let (
            total_books,
            total_members,
            active_borrowings,
            total_libraries,
            average_rating,
            most_borrowed_books,
        ) = tokio::try_join!(
            self.uow.books.count_books(),
            self.uow.members.count_members(),
            self.uow.borrowings.count_borrowings(BorrowingFilter::active()),
            self.uow.libraries.count_libraries(),
            self.uow.reviews.average_rating(),
            self.uow.books.most_borrowed_books(MOST_BORROWED_LIMIT),
        )?;

        Ok(LibraryStatistics {
            total_books,
            total_members,
            active_borrowings,
            total_libraries,
            average_rating,
            most_borrowed_books,
        })
    }
}
