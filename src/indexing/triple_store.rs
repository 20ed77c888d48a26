//! In-memory triple store with per-position postings.
//!
//! Terms are dictionary-encoded; every inserted triple becomes one row and
//! rows are never merged, so inserting the same triple twice stores it twice.
//! Query results are returned in insertion order.

use std::collections::HashMap;

use crate::core::{EncodedTriple, Term, Triple};
use crate::indexing::dictionary::TermDictionary;

#[derive(Debug, Default)]
pub struct TripleStore {
    dictionary: TermDictionary,
    rows: Vec<EncodedTriple>,
    by_subject: HashMap<u32, Vec<usize>>,
    by_predicate: HashMap<u32, Vec<usize>>,
    by_object: HashMap<u32, Vec<usize>>,
}

impl TripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_triple(&mut self, subject: Term, predicate: Term, object: Term) {
        self.insert(&Triple::new(subject, predicate, object));
    }

    pub fn insert(&mut self, triple: &Triple) {
        let row = triple.encode(&mut self.dictionary);
        let position = self.rows.len();
        self.by_subject.entry(row.subject).or_default().push(position);
        self.by_predicate.entry(row.predicate).or_default().push(position);
        self.by_object.entry(row.object).or_default().push(position);
        self.rows.push(row);
        log::trace!("inserted row {}: {}", position, self.dictionary.decode_row(&row));
    }

    /// Removes every triple and forgets all interned terms.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.by_subject.clear();
        self.by_predicate.clear();
        self.by_object.clear();
        self.dictionary.clear();
    }

    /// Every stored triple whose positions equal the bound arguments; `None`
    /// matches anything at that position.
    pub fn query(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Vec<Triple> {
        let mut bound: [Option<u32>; 3] = [None; 3];
        for (slot, term) in bound.iter_mut().zip([subject, predicate, object]) {
            if let Some(term) = term {
                // A term that was never interned cannot match any row
                match self.dictionary.lookup(term) {
                    Some(id) => *slot = Some(id),
                    None => return Vec::new(),
                }
            }
        }

        let postings = [
            bound[0].map(|id| Self::postings(&self.by_subject, id)),
            bound[1].map(|id| Self::postings(&self.by_predicate, id)),
            bound[2].map(|id| Self::postings(&self.by_object, id)),
        ];
        let matches = |row: &EncodedTriple| {
            bound[0].map_or(true, |id| row.subject == id)
                && bound[1].map_or(true, |id| row.predicate == id)
                && bound[2].map_or(true, |id| row.object == id)
        };

        let candidates: Box<dyn Iterator<Item = &EncodedTriple> + '_> =
            match postings.iter().flatten().min_by_key(|list| list.len()) {
                Some(list) => Box::new(list.iter().map(|&position| &self.rows[position])),
                None => Box::new(self.rows.iter()),
            };

        candidates
            .filter(|row| matches(*row))
            .filter_map(|row| row.decode(&self.dictionary))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct terms currently interned
    pub fn term_count(&self) -> usize {
        self.dictionary.len()
    }

    fn postings(index: &HashMap<u32, Vec<usize>>, id: u32) -> &[usize] {
        index.get(&id).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    fn sample_store() -> TripleStore {
        let mut store = TripleStore::new();
        store.add_triple(Term::iri("http://example.org/m1"), Term::iri(RDF_TYPE), Term::literal("Message"));
        store.add_triple(Term::iri("http://example.org/m2"), Term::iri(RDF_TYPE), Term::literal("Message"));
        store.add_triple(
            Term::iri("http://example.org/t1"),
            Term::iri(RDF_TYPE),
            Term::literal("ToolFunction"),
        );
        store.add_triple(
            Term::iri("http://example.org/m1"),
            Term::iri("http://xmlns.com/foaf/0.1/name"),
            Term::literal("John Doe"),
        );
        store
    }

    #[test]
    fn test_query_all() {
        let store = sample_store();
        assert_eq!(store.query(None, None, None).len(), 4);
    }

    #[test]
    fn test_query_by_object_in_insertion_order() {
        let store = sample_store();
        let results = store.query(None, Some(&Term::iri(RDF_TYPE)), Some(&Term::literal("Message")));
        let subjects: Vec<&str> = results.iter().map(|t| t.subject.value()).collect();
        assert_eq!(subjects, vec!["http://example.org/m1", "http://example.org/m2"]);
    }

    #[test]
    fn test_query_by_subject() {
        let store = sample_store();
        let results = store.query(Some(&Term::iri("http://example.org/m1")), None, None);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_term_kind_matters() {
        let store = sample_store();
        assert!(store.query(None, None, Some(&Term::iri("Message"))).is_empty());
    }

    #[test]
    fn test_unknown_term_matches_nothing() {
        let store = sample_store();
        assert!(store.query(Some(&Term::iri("http://example.org/none")), None, None).is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut store = TripleStore::new();
        let triple = Triple::new(Term::iri("s"), Term::iri("p"), Term::literal("o"));
        store.insert(&triple);
        store.insert(&triple);
        assert_eq!(store.len(), 2);
        assert_eq!(store.query(Some(&triple.subject), None, None), vec![triple.clone(), triple]);
    }

    #[test]
    fn test_clear() {
        let mut store = sample_store();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.term_count(), 0);
        assert!(store.query(None, None, None).is_empty());
    }
}
