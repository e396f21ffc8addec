//! JSON -> context variable conversion

use super::CliError;

/// Flattens a JSON object of scalars into `(name, value)` bindings.
///
/// Strings are taken verbatim; numbers and booleans use their JSON text.
pub fn json_to_variables(v: serde_json::Value) -> Result<Vec<(String, String)>, CliError> {
    let serde_json::Value::Object(obj) = v else {
        return Err(CliError::InvalidVariables(
            "expected a JSON object".to_string(),
        ));
    };

    obj.into_iter()
        .map(|(name, value)| match value {
            serde_json::Value::String(s) => Ok((name, s)),
            serde_json::Value::Number(n) => Ok((name, n.to_string())),
            serde_json::Value::Bool(b) => Ok((name, b.to_string())),
            other => Err(CliError::InvalidVariables(format!(
                "{} must be a string, number or boolean, got {}",
                name, other
            ))),
        })
        .collect()
}
