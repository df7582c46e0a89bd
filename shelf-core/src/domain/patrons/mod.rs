//! Members and their reviews.

mod members;
mod reviews;

use crate::application::AppUnitOfWork;

#[derive(Clone, Debug)]
pub struct PatronService {
    uow: AppUnitOfWork,
}

impl PatronService {
    pub fn new(uow: AppUnitOfWork) -> Self {
        Self { uow }
    }
}
