//! Error types for pattern compilation and URL generation

use thiserror::Error;

/// Result type alias for pattern operations
pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors raised while compiling a route template or generating a URL
/// from one.
///
/// Compilation errors carry the character offset into the template at
/// which the problem was found. They are only ever raised at
/// registration time; a successfully compiled [`Matcher`](crate::Matcher)
/// cannot fail at request time.
#[derive(Error, Debug)]
pub enum PatternError {
    /// `:` was not followed by a parameter name
    #[error("missing parameter name at {0}")]
    MissingParamName(usize),

    /// A regex fragment opened with `(?:`
    #[error("non-capturing groups are not allowed at {0}")]
    NonCapturingGroup(usize),

    /// A regex fragment opened with `?`
    #[error("pattern cannot start with \"?\" at {0}")]
    GroupStart(usize),

    /// A nested `(` inside a fragment was itself a capturing group
    #[error("capturing groups are not allowed at {0}")]
    CapturingGroup(usize),

    /// A `(` was never closed
    #[error("unterminated group at {0}")]
    UnbalancedGroup(usize),

    /// A `()` fragment with nothing inside it
    #[error("missing pattern at {0}")]
    EmptyGroup(usize),

    /// The assembled expression was rejected by the regex engine
    /// (for example, a user fragment using unsupported syntax)
    #[error("\"{template}\" is not a valid route pattern: {source}")]
    InvalidExpression {
        template: String,
        source: regex_lite::Error,
    },

    /// A required parameter was absent from the values given to
    /// [`Matcher::generate`](crate::Matcher::generate)
    #[error("invalid route parameters: missing \"{0}\"")]
    MissingParam(String),

    /// Validation was requested and the generated string does not
    /// match the pattern it was generated from
    #[error("generated path \"{0}\" does not match its own pattern")]
    Unrepresentable(String),
}
