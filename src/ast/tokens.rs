/// A token produced from attribute values and element text.
///
/// Mapper text is a flat mix of literal SQL and placeholders, so the token
/// set is small:
///
/// ```text
/// orders.base          -> Literal("orders.base")
/// ${table}  $table     -> Variable("table")
/// #{id}                -> Param("id")
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text, copied through as-is
    Literal(String),

    /// Variable reference (`${name}` or `$name`)
    ///
    /// Substituted from the evaluation context at resolution time, never
    /// at parse time.
    Variable(String),

    /// Bind parameter placeholder (`#{expr}`)
    ///
    /// Left untouched by resolution; the executor binds it.
    Param(String),

    /// End of input
    Eof,
}
