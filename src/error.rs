use thiserror::Error;

/// Errors raised while building or resolving statement nodes.
///
/// Errors originating inside an included fragment reach the caller
/// unchanged; an include never wraps them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A `refid` did not tokenize to exactly one literal or variable
    #[error("include refid must be a variable or a string, got {0:?}")]
    InvalidReference(String),

    /// Two `<property>` children of one include share a name
    #[error("property name {0} is repeated")]
    DuplicateProperty(String),

    /// A variable was read from the context but never bound
    #[error("variable {0} is undefined")]
    UndefinedVariable(String),

    /// Resolution was attempted on an include that never received a `refid`
    #[error("include has no refid")]
    MissingReference,

    /// No fragment is registered under the qualified name
    #[error("sql {0} does not exist")]
    FragmentNotFound(String),

    /// A fragment was re-entered while it was still being resolved.
    /// Carries the active chain, ending with the repeated name.
    #[error("cyclic include: {}", .0.join(" -> "))]
    CyclicReference(Vec<String>),

    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Errors from splitting mapper text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated placeholder starting at position {position}")]
    Unterminated { position: usize },

    #[error("empty placeholder at position {position}")]
    EmptyPlaceholder { position: usize },

    #[error("invalid variable name {name:?} at position {position}")]
    InvalidName { name: String, position: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
