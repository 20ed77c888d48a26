//! Configuration structures and utilities

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Prefixes every index understands unless configured otherwise. Persisted
/// data and existing prefixed queries rely on these exact IRIs.
pub const DEFAULT_NAMESPACES: [(&str, &str); 5] = [
    ("schema", "https://schema.org/"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("ex", "https://example.invalid/"),
];

pub const DEFAULT_INDEX_KEY: &str = "index.jsonl";

/// Immutable mapping from short prefix to namespace IRI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceTable {
    prefixes: BTreeMap<String, String>,
}

impl NamespaceTable {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefixes: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Load a table from a JSON object of `"prefix": "namespace"` pairs.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let table: NamespaceTable = serde_json::from_str(&content)?;
        if let Some((prefix, _)) = table.prefixes.iter().find(|(prefix, _)| prefix.is_empty()) {
            return Err(Error::Config(format!(
                "Namespace file {} declares an empty prefix ('{}')",
                path.display(),
                prefix
            )));
        }
        Ok(table)
    }

    /// Returns a copy of this table with one more (or a replaced) prefix.
    #[must_use]
    pub fn with_prefix(&self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        let mut prefixes = self.prefixes.clone();
        prefixes.insert(prefix.into(), namespace.into());
        Self { prefixes }
    }

    /// Namespace IRI registered for `prefix`
    pub fn expand(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_NAMESPACES)
    }
}

/// Settings for constructing a [`GraphIndex`](crate::GraphIndex).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphIndexConfig {
    /// Storage key of the JSON Lines index file
    pub index_key: String,
    /// Root directory used by file-backed storage
    pub storage_path: PathBuf,
    pub namespaces: NamespaceTable,
}

impl GraphIndexConfig {
    pub fn validate(&self) -> Result<()> {
        if self.index_key.trim().is_empty() {
            return Err(Error::Config("index key must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for GraphIndexConfig {
    fn default() -> Self {
        Self {
            index_key: DEFAULT_INDEX_KEY.to_string(),
            storage_path: PathBuf::from("data/graphs"),
            namespaces: NamespaceTable::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_table_is_fixed() {
        let table = NamespaceTable::default();
        assert_eq!(table.len(), 5);
        assert_eq!(table.expand("schema"), Some("https://schema.org/"));
        assert_eq!(table.expand("rdf"), Some("http://www.w3.org/1999/02/22-rdf-syntax-ns#"));
        assert_eq!(table.expand("rdfs"), Some("http://www.w3.org/2000/01/rdf-schema#"));
        assert_eq!(table.expand("foaf"), Some("http://xmlns.com/foaf/0.1/"));
        assert_eq!(table.expand("ex"), Some("https://example.invalid/"));
        assert_eq!(table.expand("dcterms"), None);
    }

    #[test]
    fn test_with_prefix_leaves_original_untouched() {
        let base = NamespaceTable::default();
        let extended = base.with_prefix("dcterms", "http://purl.org/dc/terms/");
        assert_eq!(extended.expand("dcterms"), Some("http://purl.org/dc/terms/"));
        assert_eq!(base.expand("dcterms"), None);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"person": "https://example.invalid/person/"}}"#).unwrap();

        let table = NamespaceTable::from_json_file(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.expand("person"), Some("https://example.invalid/person/"));
    }

    #[test]
    fn test_config_defaults_and_validation() {
        let config = GraphIndexConfig::default();
        assert_eq!(config.index_key, "index.jsonl");
        assert!(config.validate().is_ok());

        let config: GraphIndexConfig = serde_json::from_str(r#"{"index_key": "  "}"#).unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        assert_eq!(config.namespaces, NamespaceTable::default());
    }
}
