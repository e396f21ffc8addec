//! Validate mapper documents

use super::{CliError, load_context};
use crate::ContextOptions;

/// Loads every mapper and returns the qualified statement names they
/// register, sorted.
pub fn execute_check(mappers: &[String]) -> Result<Vec<String>, CliError> {
    let ctx = load_context(mappers, ContextOptions::default())?;
    Ok(ctx.fragment_names().into_iter().map(str::to_string).collect())
}
