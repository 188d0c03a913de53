//! Turtle 1.1 serializer for resource graphs.
//!
//! Produces a deterministic document: prefix declarations for the
//! well-known namespaces actually used, then one block per subject in
//! first-appearance order, with predicate-object pairs in graph order.

use std::collections::BTreeSet;

use crate::model::{Literal, ResourceGraph, Term};
use crate::vocab::{PREFIXES, RDF_TYPE, XSD_STRING};

/// Serializes a resource graph to a Turtle string.
#[must_use]
pub fn to_turtle(graph: &ResourceGraph) -> String {
    let mut used: BTreeSet<usize> = BTreeSet::new();
    let mut subjects: Vec<&Term> = Vec::new();

    for triple in graph.iter() {
        if !subjects.contains(&&triple.subject) {
            subjects.push(&triple.subject);
        }
        note_prefix(&triple.subject, &mut used);
        if !triple.predicate.is_iri(RDF_TYPE) {
            note_prefix(&triple.predicate, &mut used);
        }
        note_prefix(&triple.object, &mut used);
    }

    let mut out = String::with_capacity(graph.len() * 96);

    for &i in &used {
        let (prefix, ns) = PREFIXES[i];
        out.push_str(&format!("@prefix {prefix}: <{ns}> .\n"));
    }
    if !used.is_empty() {
        out.push('\n');
    }

    for subject in subjects {
        out.push_str(&term_to_turtle(subject));
        out.push('\n');
        let pairs: Vec<String> = graph
            .iter()
            .filter(|t| &t.subject == subject)
            .map(|t| {
                let predicate = if t.predicate.is_iri(RDF_TYPE) {
                    "a".to_owned()
                } else {
                    term_to_turtle(&t.predicate)
                };
                format!("    {} {}", predicate, term_to_turtle(&t.object))
            })
            .collect();
        out.push_str(&pairs.join(" ;\n"));
        out.push_str(" .\n\n");
    }

    out
}

fn note_prefix(term: &Term, used: &mut BTreeSet<usize>) {
    let iri = match term {
        Term::Iri(iri) => iri.as_str(),
        Term::Literal(lit) if lit.language.is_none() && lit.datatype != XSD_STRING => {
            lit.datatype.as_str()
        }
        _ => return,
    };
    if let Some((i, _)) = compact(iri) {
        used.insert(i);
    }
}

/// Finds a prefix whose namespace covers `iri` with a plain local name.
fn compact(iri: &str) -> Option<(usize, &str)> {
    PREFIXES.iter().enumerate().find_map(|(i, (_, ns))| {
        iri.strip_prefix(ns)
            .filter(|local| is_plain_local_name(local))
            .map(|local| (i, local))
    })
}

fn is_plain_local_name(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn iri_to_turtle(iri: &str) -> String {
    match compact(iri) {
        Some((i, local)) => format!("{}:{}", PREFIXES[i].0, local),
        None => format!("<{}>", iri),
    }
}

fn term_to_turtle(term: &Term) -> String {
    match term {
        Term::Iri(iri) => iri_to_turtle(iri),
        Term::BlankNode(id) => format!("_:{}", id),
        Term::Literal(lit) => literal_to_turtle(lit),
    }
}

fn literal_to_turtle(lit: &Literal) -> String {
    let quoted = turtle_string(&lit.lexical);
    match &lit.language {
        Some(lang) => format!("{}@{}", quoted, lang),
        None if lit.datatype == XSD_STRING => quoted,
        None => format!("{}^^{}", quoted, iri_to_turtle(&lit.datatype)),
    }
}

fn turtle_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    escaped.push('"');
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Triple;
    use crate::parser::parse_turtle;
    use crate::vocab::{EBUCORE_HAS_MIME_TYPE, LDP_BASIC_CONTAINER, LDP_CONTAINER};

    fn sample() -> ResourceGraph {
        let subject = Term::iri("http://localhost:8080/rest/a");
        vec![
            Triple::new(subject.clone(), Term::iri(RDF_TYPE), Term::iri(LDP_CONTAINER)),
            Triple::new(subject.clone(), Term::iri(RDF_TYPE), Term::iri(LDP_BASIC_CONTAINER)),
            Triple::new(
                subject.clone(),
                Term::iri(EBUCORE_HAS_MIME_TYPE),
                Term::literal("text/plain; charset=\"utf-8\"\nnext"),
            ),
            Triple::new(
                subject,
                Term::iri("http://example.org/vocab#size"),
                Term::Literal(Literal::typed("12", "http://www.w3.org/2001/XMLSchema#long")),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn declares_only_used_prefixes() {
        let turtle = to_turtle(&sample());
        assert!(turtle.contains("@prefix ldp:"));
        assert!(turtle.contains("@prefix ebucore:"));
        assert!(turtle.contains("@prefix xsd:"));
        assert!(!turtle.contains("@prefix premis:"));
        assert!(!turtle.contains("@prefix rdf:"));
    }

    #[test]
    fn writes_type_as_a_and_compacts_known_namespaces() {
        let turtle = to_turtle(&sample());
        assert!(turtle.contains("    a ldp:Container ;"));
        assert!(turtle.contains("<http://example.org/vocab#size> \"12\"^^xsd:long"));
    }

    #[test]
    fn output_reparses_to_the_same_graph() {
        let graph = sample();
        let reparsed = parse_turtle(&to_turtle(&graph)).expect("serializer output parses");
        assert_eq!(reparsed, graph);
    }

    #[test]
    fn empty_graph_serializes_to_empty_document() {
        assert_eq!(to_turtle(&ResourceGraph::new()), "");
    }

    #[test]
    fn escapes_quotes_and_control_characters() {
        assert_eq!(turtle_string("a\"b\\c\td"), "\"a\\\"b\\\\c\\td\"");
    }
}
