//! Turning raw patterns into store lookups and trimming the results

pub mod filters;
pub mod normalizer;
pub mod ntriples;
pub mod pattern;

pub use filters::apply_filters;
pub use ntriples::{render_item, render_triples};
pub use normalizer::{is_wildcard, normalize_pattern, ResolvedPattern, TermNormalizer, RDF_TYPE};
pub use pattern::{QueryFilter, TriplePattern};
