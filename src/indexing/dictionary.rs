use std::collections::HashMap;

use crate::core::{EncodedTriple, Term};

/// Interns terms to dense u32 ids.
#[derive(Debug, Default)]
pub struct TermDictionary {
    term_to_id: HashMap<Term, u32>,
    id_to_term: Vec<Term>,
}

impl TermDictionary {
    pub fn new() -> Self {
        TermDictionary { term_to_id: HashMap::new(), id_to_term: Vec::new() }
    }

    pub fn encode(&mut self, term: &Term) -> u32 {
        if let Some(&id) = self.term_to_id.get(term) {
            id
        } else {
            let id = self.id_to_term.len() as u32;
            self.term_to_id.insert(term.clone(), id);
            self.id_to_term.push(term.clone());
            id
        }
    }

    /// Id of an already interned term, without interning it
    pub fn lookup(&self, term: &Term) -> Option<u32> {
        self.term_to_id.get(term).copied()
    }

    pub fn decode(&self, id: u32) -> Option<&Term> {
        self.id_to_term.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.id_to_term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_term.is_empty()
    }

    pub fn clear(&mut self) {
        self.term_to_id.clear();
        self.id_to_term.clear();
    }

    pub fn decode_row(&self, row: &EncodedTriple) -> String {
        let render = |id: u32| self.decode(id).map_or_else(|| "unknown".to_string(), Term::to_string);
        format!("({}, {}, {})", render(row.subject), render(row.predicate), render(row.object))
    }
}
