//! Resource identifiers: the opaque keys triples are filed under.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

/// Immutable identifier of an ingested resource.
///
/// Two identifiers are equal iff their renderings are equal, so `tokens` and
/// `score` never take part in comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    resource_type: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

impl ResourceIdentifier {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            parent: None,
            tokens: None,
            score: None,
        }
    }

    /// Like [`ResourceIdentifier::new`], but rejects an empty type or name.
    pub fn try_new(resource_type: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let identifier = Self::new(resource_type, name);
        if identifier.resource_type.is_empty() {
            return Err(Error::Config("Resource type must not be empty".to_string()));
        }
        if identifier.name.is_empty() {
            return Err(Error::Config("Resource name must not be empty".to_string()));
        }
        Ok(identifier)
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_tokens(mut self, tokens: u64) -> Self {
        self.tokens = Some(tokens);
        self
    }

    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent reference, if one is set. Records written by older
    /// ingesters may carry the literal text "undefined", which counts as unset.
    pub fn parent(&self) -> Option<&str> {
        self.parent
            .as_deref()
            .filter(|parent| !parent.is_empty() && *parent != "undefined")
    }

    /// Token count, 0 when unknown
    pub fn tokens(&self) -> u64 {
        self.tokens.unwrap_or(0)
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent() {
            let path = parent.rsplit(':').next().unwrap_or_default();
            for segment in path.split('/').filter(|segment| !segment.is_empty()) {
                write!(f, "{}/", segment)?;
            }
        }
        write!(f, "{}.{}", self.resource_type, self.name)
    }
}

impl PartialEq for ResourceIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for ResourceIdentifier {}

impl Hash for ResourceIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}
