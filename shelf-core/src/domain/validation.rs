//! Boundary checks shared by the services. Messages follow the wording the
//! HTTP clients already expect.

use std::fmt::Display;

use shelf_model::book::ISBN_MAX_LEN;

use crate::error::{Result, ShelfError};

pub(crate) const NAME_MAX_LEN: usize = 200;
pub(crate) const TITLE_MAX_LEN: usize = 300;
pub(crate) const CATEGORY_NAME_MAX_LEN: usize = 100;
pub(crate) const PHONE_MAX_LEN: usize = 20;
pub(crate) const EMAIL_MAX_LEN: usize = 254;

pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ShelfError::validation(field, "This field may not be blank."));
    }
    check_max_len(field, value, max_len)
}

pub(crate) fn check_max_len(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<()> {
    if value.chars().count() > max_len {
        return Err(ShelfError::validation(
            field,
            format!("Ensure this field has no more than {max_len} characters."),
        ));
    }
    Ok(())
}

pub(crate) fn check_email(value: &str) -> Result<()> {
    require_text("email", value, EMAIL_MAX_LEN)?;

    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid {
        return Err(ShelfError::validation("email", "Enter a valid email address."));
    }
    Ok(())
}

pub(crate) fn check_phone(value: &str) -> Result<()> {
    require_text("phone", value, PHONE_MAX_LEN)
}

pub(crate) fn check_isbn(value: &str) -> Result<()> {
    require_text("isbn", value, ISBN_MAX_LEN)
}

/// Rejection for a foreign key naming a row that does not exist.
pub(crate) fn invalid_pk(field: &'static str, id: impl Display) -> ShelfError {
    ShelfError::validation(
        field,
        format!("Invalid pk \"{id}\" - object does not exist."),
    )
}

/// Sort and dedup a list of ids.
pub(crate) fn normalize_ids<T: Ord + Copy>(ids: &[T]) -> Vec<T> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}
