//! Thin request/response translation over the core services.

pub mod books;
pub mod borrowings;
pub mod classification;
pub mod libraries;
pub mod members;
pub mod reviews;
pub mod statistics;
pub mod system;
