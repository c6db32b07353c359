//! Error types for the ruleweave system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for ruleweave operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid range error from the offending bounds.
    #[must_use]
    pub fn invalid_range(lower: impl fmt::Debug, upper: impl fmt::Debug) -> Self {
        Self::new(ErrorKind::InvalidRange {
            lower: format!("{lower:?}"),
            upper: format!("{upper:?}"),
        })
    }

    /// Creates an invalid query error.
    #[must_use]
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidQuery(reason.into()))
    }

    /// Creates a duplicate value error for a dimension.
    #[must_use]
    pub fn duplicate_value(dimension: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateValue {
            dimension: dimension.into(),
            value: value.into(),
        })
    }

    /// Creates an unrecognized token error.
    #[must_use]
    pub fn unrecognized_token(token: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnrecognizedToken(token.into()))
    }

    /// Creates an undefined variable error.
    #[must_use]
    pub fn undefined_variable(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UndefinedVariable(name.into()))
    }

    /// Creates a parse error at a byte position of some rule text.
    #[must_use]
    pub fn parse(message: impl Into<String>, position: usize) -> Self {
        Self::new(ErrorKind::ParseError {
            message: message.into(),
            position,
        })
    }

    /// Returns true if this error was raised while evaluating a payload.
    #[must_use]
    pub fn is_evaluation(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::DivisionByZero | ErrorKind::UndefinedVariable(_)
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// An interval whose lower bound is above its upper bound.
    #[error("invalid range: lower bound {lower} is greater than upper bound {upper}")]
    InvalidRange {
        /// The lower bound as given.
        lower: String,
        /// The upper bound as given.
        upper: String,
    },

    /// A query that does not fit the index it was used with.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A value and its negation were given for the same dimension.
    #[error("duplicate value for {dimension}: {value} is both required and excluded")]
    DuplicateValue {
        /// The dimension being parsed.
        dimension: String,
        /// The contradictory value.
        value: String,
    },

    /// Rule text that no dimension recognized.
    #[error("unrecognized token: {0}")]
    UnrecognizedToken(String),

    /// Division or modulo by zero while evaluating a formula.
    #[error("division by zero")]
    DivisionByZero,

    /// A formula referenced a variable with no binding.
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),

    /// Malformed formula or range text.
    #[error("parse error at {position}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Byte offset into the parsed text.
        position: usize,
    },

    /// A pending lookup did not complete in time.
    #[error("timed out waiting for lookup")]
    Timeout,

    /// A pending lookup was abandoned before completing.
    #[error("wait was interrupted")]
    Interrupted,
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Configuration section the rule was read from.
    pub section: Option<String>,
    /// Rule key text.
    pub key: Option<String>,
    /// Chain of loaders that were active.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration section.
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Sets the rule key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.section, &self.key) {
            (Some(section), Some(key)) => write!(f, "at {section}.{key}")?,
            (Some(section), None) => write!(f, "in {section}")?,
            (None, Some(key)) => write!(f, "at {key}")?,
            (None, None) => {}
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}

/// Result type alias for ruleweave operations.
pub type Result<T> = std::result::Result<T, Error>;
