//! Identifier index over RDF triples.
//!
//! Each ingested resource contributes a list of triples filed under its
//! [`ResourceIdentifier`]. A triple-pattern query matches triples in the
//! store, collects their subjects, and returns every resource owning a triple
//! about one of those subjects.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::{GraphIndexConfig, NamespaceTable};
use crate::core::identifier::ResourceIdentifier;
use crate::core::{RawTriple, Term};
use crate::error::Result;
use crate::indexing::index_base::{IndexBase, IndexItem};
use crate::indexing::triple_store::TripleStore;
use crate::querying::filters::apply_filters;
use crate::querying::normalizer::{TermNormalizer, RDF_TYPE};
use crate::querying::pattern::{QueryFilter, TriplePattern};
use crate::storage::IndexStorage;

/// One persisted index entry: `{id, identifier, triples}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphItem {
    pub id: String,
    pub identifier: ResourceIdentifier,
    #[serde(alias = "quads", default)]
    pub triples: Vec<RawTriple>,
}

impl GraphItem {
    pub fn new(identifier: ResourceIdentifier, triples: Vec<RawTriple>) -> Self {
        Self { id: identifier.to_string(), identifier, triples }
    }
}

impl IndexItem for GraphItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn identifier(&self) -> &ResourceIdentifier {
        &self.identifier
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Sizes reported by [`GraphIndex::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphIndexStats {
    pub entries: usize,
    pub triples: usize,
    pub terms: usize,
}

#[derive(Debug)]
struct GraphState {
    base: IndexBase<GraphItem>,
    store: TripleStore,
    /// Resolved subjects of each entry, keyed by entry id
    subjects: HashMap<String, HashSet<Term>>,
}

/// Shareable identifier index. All state sits behind one lock; each public
/// operation holds it for its whole duration, including the lazy first load.
#[derive(Debug)]
pub struct GraphIndex {
    normalizer: TermNormalizer,
    storage: Arc<dyn IndexStorage>,
    state: Mutex<GraphState>,
}

impl GraphIndex {
    pub fn new(storage: Arc<dyn IndexStorage>, config: GraphIndexConfig) -> Result<Self> {
        config.validate()?;
        let base = IndexBase::new(Arc::clone(&storage), config.index_key)?;
        Ok(Self {
            normalizer: TermNormalizer::new(config.namespaces),
            storage,
            state: Mutex::new(GraphState {
                base,
                store: TripleStore::new(),
                subjects: HashMap::new(),
            }),
        })
    }

    /// Re-reads persisted entries and rebuilds the triple store from them.
    pub async fn load_data(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.load_locked(&mut state).await
    }

    /// Files `triples` under `identifier` and persists the entry. Adding an
    /// identifier that is already present replaces its triples.
    pub async fn add_item(&self, identifier: ResourceIdentifier, triples: Vec<RawTriple>) -> Result<()> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;

        let item = GraphItem::new(identifier, triples);
        let id = item.id.clone();
        let triple_count = item.triples.len();
        let replaced = state.base.add_item(item).await?;
        log::info!("Added entry '{}' ({} triples)", id, triple_count);

        if replaced {
            log::warn!("Replacing triples of existing entry '{}'", id);
            self.rebuild(&mut state);
        } else {
            let GraphState { base, store, subjects } = &mut *state;
            if let Some(item) = base.get_item(&id) {
                self.index_item(store, subjects, item);
            }
        }
        Ok(())
    }

    /// Identifiers of every entry owning a triple about a subject that
    /// matches `pattern`, in entry order, trimmed by `filter`.
    pub async fn query_items(
        &self,
        pattern: &TriplePattern,
        filter: &QueryFilter,
    ) -> Result<Vec<ResourceIdentifier>> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;

        let resolved = self.normalizer.resolve_pattern(pattern);
        let triples = state.store.query(
            resolved.subject.as_ref(),
            resolved.predicate.as_ref(),
            resolved.object.as_ref(),
        );
        if triples.is_empty() {
            return Ok(Vec::new());
        }

        let matched: HashSet<&Term> = triples.iter().map(|triple| &triple.subject).collect();
        let identifiers: Vec<ResourceIdentifier> = state
            .base
            .items()
            .iter()
            .filter(|item| {
                state
                    .subjects
                    .get(&item.id)
                    .is_some_and(|subjects| subjects.iter().any(|subject| matched.contains(subject)))
            })
            .map(|item| item.identifier.clone())
            .collect();

        log::debug!(
            "Pattern {:?} matched {} triples in {} entries",
            pattern,
            triples.len(),
            identifiers.len()
        );
        Ok(apply_filters(identifiers, filter))
    }

    pub async fn has_item(&self, id: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        Ok(state.base.has_item(id))
    }

    pub async fn get_item(&self, id: &str) -> Result<Option<GraphItem>> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        Ok(state.base.get_item(id).cloned())
    }

    /// Every identifier, in entry order
    pub async fn identifiers(&self) -> Result<Vec<ResourceIdentifier>> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        Ok(state.base.items().iter().map(|item| item.identifier.clone()).collect())
    }

    /// Typed subjects, as subject value → type value. A wildcard
    /// `type_filter` lists every typed subject; otherwise it is resolved like
    /// any object term and only that type is kept.
    pub async fn subjects(&self, type_filter: Option<&str>) -> Result<BTreeMap<String, String>> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;

        let rdf_type = Term::iri(RDF_TYPE);
        let object = self.normalizer.resolve(type_filter);
        Ok(state
            .store
            .query(None, Some(&rdf_type), object.as_ref())
            .into_iter()
            .map(|triple| (triple.subject.value().to_string(), triple.object.value().to_string()))
            .collect())
    }

    pub async fn stats(&self) -> Result<GraphIndexStats> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        Ok(GraphIndexStats {
            entries: state.base.len(),
            triples: state.store.len(),
            terms: state.store.term_count(),
        })
    }

    pub fn storage(&self) -> &Arc<dyn IndexStorage> {
        &self.storage
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        self.normalizer.namespaces()
    }

    pub fn normalizer(&self) -> &TermNormalizer {
        &self.normalizer
    }

    async fn ensure_loaded(&self, state: &mut GraphState) -> Result<()> {
        if !state.base.loaded() {
            self.load_locked(state).await?;
        }
        Ok(())
    }

    async fn load_locked(&self, state: &mut GraphState) -> Result<()> {
        state.base.load_data().await?;
        self.rebuild(state);
        log::info!(
            "Loaded {} entries ({} triples) from '{}'",
            state.base.len(),
            state.store.len(),
            state.base.index_key()
        );
        Ok(())
    }

    fn rebuild(&self, state: &mut GraphState) {
        let GraphState { base, store, subjects } = state;
        store.clear();
        subjects.clear();
        for item in base.items() {
            self.index_item(store, subjects, item);
        }
    }

    fn index_item(
        &self,
        store: &mut TripleStore,
        subjects: &mut HashMap<String, HashSet<Term>>,
        item: &GraphItem,
    ) {
        let entry_subjects = subjects.entry(item.id.clone()).or_default();
        for raw in &item.triples {
            let triple = self.normalizer.resolve_triple(raw);
            entry_subjects.insert(triple.subject.clone());
            store.insert(&triple);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn index_over(storage: &MemoryStorage) -> GraphIndex {
        GraphIndex::new(Arc::new(storage.clone()), GraphIndexConfig::default()).unwrap()
    }

    fn message(name: &str, tokens: u64) -> (ResourceIdentifier, Vec<RawTriple>) {
        let subject = format!("http://example.org/{}", name);
        (
            ResourceIdentifier::new("common.Message", name).with_tokens(tokens),
            vec![
                RawTriple::new(&subject, "type", "Message"),
                RawTriple::new(&subject, "schema:text", &format!("\"body of {}\"", name)),
            ],
        )
    }

    #[tokio::test]
    async fn test_empty_config_key_rejected() {
        let config = GraphIndexConfig { index_key: String::new(), ..Default::default() };
        assert!(GraphIndex::new(Arc::new(MemoryStorage::new()), config).is_err());
    }

    #[tokio::test]
    async fn test_query_by_type() {
        let index = index_over(&MemoryStorage::new());
        let (id, triples) = message("msg1", 10);
        index.add_item(id.clone(), triples).await.unwrap();

        let pattern = TriplePattern::new(Some("?"), Some("type"), Some("Message"));
        let found = index.query_items(&pattern, &QueryFilter::default()).await.unwrap();
        assert_eq!(found, vec![id]);
    }

    #[tokio::test]
    async fn test_entry_matches_through_any_subject() {
        let index = index_over(&MemoryStorage::new());
        let identifier = ResourceIdentifier::new("common.Conversation", "c1");
        index
            .add_item(
                identifier.clone(),
                vec![
                    RawTriple::new("http://example.org/c1", "type", "Conversation"),
                    RawTriple::new("person:john", "foaf:name", "\"John\""),
                ],
            )
            .await
            .unwrap();

        let pattern = TriplePattern::new(Some("person:john"), None, None);
        let found = index.query_items(&pattern, &QueryFilter::default()).await.unwrap();
        assert_eq!(found, vec![identifier]);
    }

    #[tokio::test]
    async fn test_readd_replaces_triples() {
        let storage = MemoryStorage::new();
        let index = index_over(&storage);
        let (id, triples) = message("msg1", 10);
        index.add_item(id.clone(), triples).await.unwrap();
        index
            .add_item(id.clone(), vec![RawTriple::new("http://example.org/msg1", "type", "Draft")])
            .await
            .unwrap();

        let messages = TriplePattern::new(None, Some("type"), Some("Message"));
        assert!(index.query_items(&messages, &QueryFilter::default()).await.unwrap().is_empty());
        let drafts = TriplePattern::new(None, Some("type"), Some("Draft"));
        assert_eq!(index.query_items(&drafts, &QueryFilter::default()).await.unwrap(), vec![id]);

        let stats = index.stats().await.unwrap();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.triples, 1);

        let reloaded = index_over(&storage);
        assert_eq!(reloaded.stats().await.unwrap(), stats);
    }

    #[tokio::test]
    async fn test_subjects_by_type() {
        let index = index_over(&MemoryStorage::new());
        let (id, triples) = message("msg1", 10);
        index.add_item(id, triples).await.unwrap();
        index
            .add_item(
                ResourceIdentifier::new("tool.Function", "func1"),
                vec![RawTriple::new("http://example.org/func1", "@type", "ToolFunction")],
            )
            .await
            .unwrap();

        let all = index.subjects(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.get("http://example.org/func1").map(String::as_str), Some("ToolFunction"));

        let messages = index.subjects(Some("Message")).await.unwrap();
        assert_eq!(messages.keys().collect::<Vec<_>>(), vec!["http://example.org/msg1"]);
        assert!(index.subjects(Some("Unknown")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quads_alias_on_load() {
        let storage = MemoryStorage::new();
        let record = r#"{"id":"common.Message.m","identifier":{"type":"common.Message","name":"m"},"quads":[{"subject":"http://example.org/m","predicate":"type","object":"Message"}]}"#;
        storage.put("index.jsonl", format!("{}\n", record).as_bytes()).await.unwrap();

        let index = index_over(&storage);
        let item = index.get_item("common.Message.m").await.unwrap().unwrap();
        assert_eq!(item.triples.len(), 1);
        assert!(index.has_item("common.Message.m").await.unwrap());
    }
}
