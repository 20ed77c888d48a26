//! # Graph Index
//!
//! Graph Index is a small embedded index over RDF triples. Every resource that
//! is ingested contributes a list of subject–predicate–object triples, filed
//! under an opaque [`ResourceIdentifier`]. Triple-pattern queries then answer
//! questions such as "which resources are of type Message" or "which resource
//! describes subject X" by returning the identifiers of the owning resources,
//! without scanning raw content.
//!
//! ## Features
//!
//! - Triple-pattern matching with wildcards, prefixed names, quoted literals and full IRIs
//! - A compact one-line query syntax (`subject predicate object`)
//! - Append-only JSON Lines persistence through a pluggable storage backend
//! - Prefix, count and token-budget filters over the matched identifiers
//!
//! ## Example
//!
//! ```rust,no_run
//! use graph_index::{parse_graph_query, GraphIndex, MemoryStorage, QueryFilter, Result};
//! use std::sync::Arc;
//!
//! async fn example() -> Result<()> {
//!     let index = GraphIndex::new(Arc::new(MemoryStorage::new()), Default::default())?;
//!     let pattern = parse_graph_query("? type Message")?;
//!     let identifiers = index.query_items(&pattern.into(), &QueryFilter::default()).await?;
//!     println!("{} matches", identifiers.len());
//!     Ok(())
//! }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::implicit_hasher)]

/// Core data structures and types
pub mod core;

/// Configuration structures and utilities
pub mod config;

/// Error types and result definitions
pub mod error;

/// Triple store, term dictionary and the identifier index built on them
pub mod indexing;

/// Module for parsing one-line graph queries
pub mod parsing;

/// Pattern normalization, result filters and rendering
pub mod querying;

/// Persistence backends for the serialized index
pub mod storage;

/// HTTP API over a shared graph index
pub mod http;

// Re-export commonly used types
pub use crate::config::{GraphIndexConfig, NamespaceTable};
pub use crate::core::identifier::ResourceIdentifier;
pub use crate::core::{RawTriple, Term, Triple};
pub use crate::error::{Error, ParseError, Result};
pub use crate::indexing::graph_index::{GraphIndex, GraphItem};
pub use crate::indexing::triple_store::TripleStore;
pub use crate::parsing::graph_query_parser::{parse_graph_query, GraphQuery};
pub use crate::querying::pattern::{QueryFilter, TriplePattern};
pub use crate::storage::{IndexStorage, LocalStorage, MemoryStorage};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("test error".to_string());
        assert_eq!(format!("{}", err), "Configuration error: test error");
    }
}
