//! Term normalization: wildcard detection and resolution of raw pattern
//! tokens into concrete [`Term`]s.

use crate::config::NamespaceTable;
use crate::core::{RawTriple, Term, Triple};
use crate::querying::pattern::TriplePattern;

/// Canonical RDF type predicate
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

const WILDCARDS: [&str; 5] = ["?", "*", "_", "null", "NULL"];
const TYPE_SHORTHANDS: [&str; 2] = ["type", "@type"];

/// True for an absent or empty value and for the wildcard markers
/// `?`, `*`, `_`, `null` and `NULL`.
pub fn is_wildcard(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(value) => value.is_empty() || WILDCARDS.contains(&value),
    }
}

/// Replaces wildcard positions with `None`; concrete positions are kept as is.
pub fn normalize_pattern(pattern: &TriplePattern) -> TriplePattern {
    let keep = |field: &Option<String>| field.clone().filter(|value| !is_wildcard(Some(value.as_str())));
    TriplePattern {
        subject: keep(&pattern.subject),
        predicate: keep(&pattern.predicate),
        object: keep(&pattern.object),
    }
}

/// A pattern with every concrete position resolved to a term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPattern {
    pub subject: Option<Term>,
    pub predicate: Option<Term>,
    pub object: Option<Term>,
}

/// Resolves raw tokens against a fixed namespace table.
#[derive(Debug, Clone, Default)]
pub struct TermNormalizer {
    namespaces: NamespaceTable,
}

impl TermNormalizer {
    pub fn new(namespaces: NamespaceTable) -> Self {
        Self { namespaces }
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Resolution rules, first match wins:
    /// 1. `"text"` becomes the literal `text`
    /// 2. `prefix:local` with a known prefix becomes the expanded IRI
    /// 3. `http://…` or `https://…` becomes an IRI unchanged
    /// 4. anything else is an opaque literal
    pub fn resolve_term(&self, raw: &str) -> Term {
        if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
            return Term::literal(&raw[1..raw.len() - 1]);
        }
        if let Some((prefix, local)) = raw.split_once(':') {
            if let Some(namespace) = self.namespaces.expand(prefix) {
                return Term::iri(format!("{}{}", namespace, local));
            }
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Term::iri(raw);
        }
        Term::literal(raw)
    }

    /// Like [`resolve_term`](Self::resolve_term), but `type` and `@type`
    /// always mean the RDF type predicate.
    pub fn resolve_predicate(&self, raw: &str) -> Term {
        if TYPE_SHORTHANDS.contains(&raw) {
            return Term::iri(RDF_TYPE);
        }
        self.resolve_term(raw)
    }

    /// `None` for wildcard positions
    pub fn resolve(&self, raw: Option<&str>) -> Option<Term> {
        raw.filter(|value| !is_wildcard(Some(*value))).map(|value| self.resolve_term(value))
    }

    pub fn resolve_pattern(&self, pattern: &TriplePattern) -> ResolvedPattern {
        let normalized = normalize_pattern(pattern);
        ResolvedPattern {
            subject: normalized.subject.as_deref().map(|raw| self.resolve_term(raw)),
            predicate: normalized.predicate.as_deref().map(|raw| self.resolve_predicate(raw)),
            object: normalized.object.as_deref().map(|raw| self.resolve_term(raw)),
        }
    }

    /// Resolves an ingested triple with the same rules queries use, so data
    /// and patterns always agree on term shape.
    pub fn resolve_triple(&self, raw: &RawTriple) -> Triple {
        Triple::new(
            self.resolve_term(&raw.subject),
            self.resolve_predicate(&raw.predicate),
            self.resolve_term(&raw.object),
        )
    }
}
