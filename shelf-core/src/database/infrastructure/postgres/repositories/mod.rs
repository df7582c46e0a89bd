pub mod authors;
pub mod books;
pub mod borrowings;
pub mod categories;
pub mod libraries;
pub mod members;
pub mod reviews;
