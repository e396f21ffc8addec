//! CLI support for mapper-sql
//!
//! Provides programmatic access to the `mapper` commands so other tools can
//! resolve statements without shelling out.

mod check;
mod convert;
mod resolve;

pub use check::execute_check;
pub use convert::json_to_variables;
pub use resolve::{ResolveOptions, execute_resolve};

use std::io;

use crate::{Context, ContextOptions, Mapper};

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Mapper document could not be loaded
    Mapper(crate::MapperError),
    /// Statement resolution failed
    Resolve(crate::Error),
    /// JSON parsing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// No mapper file given
    NoMapper,
    /// Variables were not a flat JSON object of scalars
    InvalidVariables(String),
    /// Two mappers declare the same qualified statement name
    DuplicateFragment(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Mapper(e) => write!(f, "Mapper error: {}", e),
            CliError::Resolve(e) => write!(f, "Resolution error: {}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoMapper => write!(f, "No mapper provided. Use --mapper <FILE>."),
            CliError::InvalidVariables(msg) => write!(f, "Invalid variables: {}", msg),
            CliError::DuplicateFragment(name) => {
                write!(f, "Statement {} is declared by more than one mapper", name)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Mapper(e) => Some(e),
            CliError::Resolve(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::MapperError> for CliError {
    fn from(e: crate::MapperError) -> Self {
        CliError::Mapper(e)
    }
}

impl From<crate::Error> for CliError {
    fn from(e: crate::Error) -> Self {
        CliError::Resolve(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

/// Parses every mapper source and registers its statements in a fresh
/// context whose namespace is the first mapper's.
fn load_context(sources: &[String], options: ContextOptions) -> Result<Context, CliError> {
    let mappers = sources
        .iter()
        .map(|source| Mapper::parse(source))
        .collect::<Result<Vec<_>, _>>()?;
    let first = mappers.first().ok_or(CliError::NoMapper)?;

    let mut ctx = Context::with_namespace(first.namespace.clone()).with_options(options);
    for mapper in &mappers {
        if let Some(name) = mapper.register(&mut ctx).into_iter().next() {
            return Err(CliError::DuplicateFragment(name));
        }
    }
    Ok(ctx)
}
