//! Parser for the one-line graph query syntax: `<subject> <predicate> <object>`.
//!
//! Terms are separated by whitespace; a double-quoted run may contain spaces
//! and is kept as one term, quotes included, so the term normalizer can later
//! recognise it as a literal.
//!
//! ```
//! use graph_index::parse_graph_query;
//!
//! let query = parse_graph_query(r#"? foaf:name "John Doe""#).unwrap();
//! assert_eq!(query.subject, "?");
//! assert_eq!(query.object, "\"John Doe\"");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::ParseError;
use crate::querying::pattern::TriplePattern;

const EXPECTED_TERMS: usize = 3;

/// The three raw terms of a parsed query line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQuery {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl From<GraphQuery> for TriplePattern {
    fn from(query: GraphQuery) -> Self {
        TriplePattern {
            subject: Some(query.subject),
            predicate: Some(query.predicate),
            object: Some(query.object),
        }
    }
}

fn term_regex() -> &'static Regex {
    static TERM_RE: OnceLock<Regex> = OnceLock::new();
    TERM_RE.get_or_init(|| Regex::new(r#"(?:[^\s"]+|"[^"]*")+"#).expect("valid regex"))
}

pub fn parse_graph_query(line: &str) -> Result<GraphQuery, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    if trimmed.matches('"').count() % 2 != 0 {
        return Err(ParseError::UnterminatedQuote);
    }

    let terms: Vec<&str> = term_regex().find_iter(trimmed).map(|m| m.as_str()).collect();
    match terms.as_slice() {
        [subject, predicate, object] => Ok(GraphQuery {
            subject: (*subject).to_string(),
            predicate: (*predicate).to_string(),
            object: (*object).to_string(),
        }),
        _ => Err(ParseError::Arity { expected: EXPECTED_TERMS, actual: terms.len() }),
    }
}

/// Parses raw bytes, e.g. a line read from a socket. Input that is not valid
/// UTF-8 text is rejected with [`ParseError::InvalidInput`].
pub fn parse_graph_query_bytes(line: &[u8]) -> Result<GraphQuery, ParseError> {
    let text = std::str::from_utf8(line).map_err(|e| ParseError::InvalidInput(e.to_string()))?;
    parse_graph_query(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcards() {
        let query = parse_graph_query("person:john ? ?").unwrap();
        assert_eq!(query.subject, "person:john");
        assert_eq!(query.predicate, "?");
        assert_eq!(query.object, "?");
    }

    #[test]
    fn test_collapses_repeated_whitespace() {
        let query = parse_graph_query("  ?\t type   Message  ").unwrap();
        assert_eq!(query.predicate, "type");
        assert_eq!(query.object, "Message");
    }

    #[test]
    fn test_quote_glued_to_text_stays_one_term() {
        let query = parse_graph_query(r#"? ex:label en"quoted text""#).unwrap();
        assert_eq!(query.object, r#"en"quoted text""#);
    }

    #[test]
    fn test_into_pattern() {
        let pattern: TriplePattern = parse_graph_query("? type Message").unwrap().into();
        assert_eq!(pattern, TriplePattern::new(Some("?"), Some("type"), Some("Message")));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = parse_graph_query_bytes(&[0x3f, 0x20, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ParseError::InvalidInput(_)));
        assert!(parse_graph_query_bytes(b"a b c").is_ok());
    }
}
