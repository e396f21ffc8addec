use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapses every whitespace run into a single space and trims the ends.
///
/// Rendered statements keep the indentation and line breaks of the mapper
/// file; this turns them into one-line SQL.
///
/// ```
/// use mapper_sql::format::normalize_whitespace;
///
/// assert_eq!(
///     normalize_whitespace("\n  SELECT *\n    FROM orders\n"),
///     "SELECT * FROM orders"
/// );
/// ```
pub fn normalize_whitespace(sql: &str) -> String {
    WHITESPACE.replace_all(sql.trim(), " ").into_owned()
}
