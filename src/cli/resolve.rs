//! Resolve one statement from a set of mappers

use super::{CliError, json_to_variables, load_context};
use crate::{ContextOptions, format::normalize_whitespace};

/// Options for the resolve command
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Statement id, bare or namespace-qualified
    pub statement: String,
    /// Mapper documents; the first one supplies the default namespace
    pub mappers: Vec<String>,
    /// JSON object of initial variable bindings
    pub variables: Option<String>,
    /// Undo include bindings when each include returns
    pub scoped: bool,
    /// Fail on cyclic includes instead of recursing
    pub detect_cycles: bool,
    /// Keep the statement's original whitespace
    pub raw: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            statement: String::new(),
            mappers: Vec::new(),
            variables: None,
            scoped: false,
            detect_cycles: true,
            raw: false,
        }
    }
}

/// Execute a resolve operation, returning the rendered SQL
pub fn execute_resolve(options: &ResolveOptions) -> Result<String, CliError> {
    let context_options = ContextOptions::default()
        .scoped_bindings(options.scoped)
        .detect_cycles(options.detect_cycles);
    let mut ctx = load_context(&options.mappers, context_options)?;

    if let Some(json_str) = &options.variables {
        let json_value: serde_json::Value = serde_json::from_str(json_str)?;
        for (name, value) in json_to_variables(json_value)? {
            ctx.set_variable(name, value);
        }
    }

    let sql = ctx.resolve_statement(&options.statement)?;
    if options.raw {
        Ok(sql)
    } else {
        Ok(normalize_whitespace(&sql))
    }
}
