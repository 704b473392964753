//! Domain model module declarations.

pub mod activity;
pub mod item;
pub mod list;

use crate::{AppError, Result};

/// Reject empty or whitespace-only required text.
///
/// # Errors
///
/// Returns `AppError::Validation` naming `field` when `value` is blank.
pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}
