//! Repository ports (interfaces) grouped by entity.
//! These keep the domain services independent of the storage engine.
//!
//! Implementations live under `database::infrastructure` (Postgres and
//! in-memory adapters).

pub mod authors;
pub mod books;
pub mod borrowings;
pub mod categories;
pub mod libraries;
pub mod members;
pub mod reviews;
