//! Error types for graph index operations

use thiserror::Error;

/// Result type alias for graph index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the graph index
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid construction arguments or configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A query line could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Failure reported by a storage backend
    #[error("Storage error: {0}")]
    Storage(String),

    /// Requested key or entry does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A persisted record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by [`parse_graph_query`](crate::parse_graph_query).
///
/// Each variant names the rule that rejected the line, so callers can report
/// the problem and re-prompt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input was not text
    #[error("line must be a string: {0}")]
    InvalidInput(String),

    /// Input was empty after trimming
    #[error("line cannot be empty")]
    EmptyInput,

    /// Input holds an odd number of double quotes
    #[error("Unterminated quoted string")]
    UnterminatedQuote,

    /// Tokenization did not produce exactly three terms
    #[error("Expected {expected} parts (subject predicate object), got {actual}")]
    Arity { expected: usize, actual: usize },
}
