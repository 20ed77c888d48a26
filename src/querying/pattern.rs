use serde::{Deserialize, Serialize};

/// Raw triple pattern as supplied by a caller. Each position is either a term
/// in textual form or a wildcard (`None`, `""`, `?`, `*`, `_`, `null`, `NULL`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriplePattern {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub predicate: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
}

impl TriplePattern {
    pub fn new(subject: Option<&str>, predicate: Option<&str>, object: Option<&str>) -> Self {
        Self {
            subject: subject.map(str::to_string),
            predicate: predicate.map(str::to_string),
            object: object.map(str::to_string),
        }
    }

    /// Pattern matching every triple
    pub fn any() -> Self {
        Self::default()
    }
}

/// Post-processing applied to matched identifiers, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    /// Keep identifiers whose rendering starts with this text
    #[serde(default)]
    pub prefix: Option<String>,
    /// Keep at most this many identifiers; 0 means unlimited
    #[serde(default)]
    pub limit: Option<usize>,
    /// Cumulative token budget over the kept identifiers
    #[serde(default)]
    pub max_tokens: Option<u64>,
}

impl QueryFilter {
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}
