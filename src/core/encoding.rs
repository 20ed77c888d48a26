//! Dictionary encoding/decoding of triples

use crate::core::Triple;
use crate::indexing::dictionary::TermDictionary;

/// Internal triple row with dictionary-encoded positions.
/// Uses u32 ids (4B max distinct terms), 12 bytes per row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EncodedTriple {
    pub subject: u32,
    pub predicate: u32,
    pub object: u32,
}

impl Triple {
    /// Encode this triple to an internal row, interning unseen terms
    pub fn encode(&self, dict: &mut TermDictionary) -> EncodedTriple {
        EncodedTriple {
            subject: dict.encode(&self.subject),
            predicate: dict.encode(&self.predicate),
            object: dict.encode(&self.object),
        }
    }
}

impl EncodedTriple {
    /// Decode this row back to terms. Returns `None` if an id was not issued
    /// by `dict`.
    pub fn decode(&self, dict: &TermDictionary) -> Option<Triple> {
        Some(Triple {
            subject: dict.decode(self.subject)?.clone(),
            predicate: dict.decode(self.predicate)?.clone(),
            object: dict.decode(self.object)?.clone(),
        })
    }
}
