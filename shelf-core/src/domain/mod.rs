//! Domain services. Each one is a thin, cloneable handle over the
//! [`crate::AppUnitOfWork`] and owns the rules for its slice of the model.

pub mod catalog;
pub mod circulation;
pub mod discovery;
pub mod patrons;

mod validation;
