//! Core data structures and types for the graph index

use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete value occupying one triple position.
///
/// "Any" is never a term: wildcard positions are represented as `None`
/// wherever an `Option<Term>` is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Term {
    /// An absolute identifier, given in full or produced by prefix expansion
    Iri(String),
    /// A plain value
    Literal(String),
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri(value.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(value.into())
    }

    /// The lexical value without any IRI brackets or quotes
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(value) | Term::Literal(value) => value,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Literal(value) => write!(f, "\"{}\"", value.escape_default()),
        }
    }
}

/// A resolved (subject, predicate, object) fact as held by the triple store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self { subject, predicate, object }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// User-facing triple with plain string positions, as supplied at ingestion
/// time and as written to the persisted index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTriple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl RawTriple {
    pub fn new(subject: &str, predicate: &str, object: &str) -> Self {
        Self {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object: object.to_string(),
        }
    }
}

pub mod encoding;
pub mod identifier;

pub use encoding::*;
