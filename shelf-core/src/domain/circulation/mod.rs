//! The borrow/return lifecycle.
//!
//! A borrowing is `Active` until it is returned, and `Returned` is terminal.
//! Copy accounting happens inside the repository's atomic checkout and
//! check-in steps; this module decides whether a transition is allowed and
//! maps their outcomes onto the error taxonomy.

mod policy;
mod service;

pub use policy::LoanPolicy;
pub use service::CirculationService;
