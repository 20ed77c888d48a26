//! Renders triples as N-Triples text via the oxigraph data model.

use oxigraph::model::{
    Literal as OxLiteral, NamedNode as OxNamedNode, Term as OxTerm, Triple as OxTriple,
};

use crate::core::{Term, Triple};
use crate::indexing::graph_index::GraphItem;
use crate::querying::normalizer::TermNormalizer;

/// Converts a triple to the oxigraph model. Returns `None` when the subject
/// or predicate is not an IRI oxigraph accepts (for example a literal subject).
pub fn to_oxigraph(triple: &Triple) -> Option<OxTriple> {
    let subject = named_node(&triple.subject)?;
    let predicate = named_node(&triple.predicate)?;
    let object: OxTerm = match &triple.object {
        Term::Iri(_) => named_node(&triple.object)?.into(),
        Term::Literal(value) => OxLiteral::new_simple_literal(value.as_str()).into(),
    };
    Some(OxTriple::new(subject, predicate, object))
}

/// One line per triple, each terminated by ` .`
pub fn render_triples(triples: &[Triple]) -> String {
    let mut output = String::new();
    for triple in triples {
        match to_oxigraph(triple) {
            Some(triple) => output.push_str(&format!("{} .\n", triple)),
            None => output.push_str(&format!("{}\n", triple)),
        }
    }
    output
}

/// Renders the triples of a stored entry, resolved the way they are indexed.
pub fn render_item(item: &GraphItem, normalizer: &TermNormalizer) -> String {
    let triples: Vec<Triple> = item.triples.iter().map(|raw| normalizer.resolve_triple(raw)).collect();
    render_triples(&triples)
}

fn named_node(term: &Term) -> Option<OxNamedNode> {
    match term {
        Term::Iri(iri) => OxNamedNode::new(iri.as_str()).ok(),
        Term::Literal(_) => None,
    }
}
