//! Turtle parsing into an owned [`ResourceGraph`].
//!
//! Parsing is delegated to `sophia_turtle`; every parsed triple is converted
//! into owned [`model::Term`](crate::model::Term) values in document order.

use sophia_api::source::{StreamError, TripleSource};
use sophia_api::term::{Term as SophiaTerm, TermKind};
use sophia_api::triple::Triple as _;
use sophia_turtle::parser::turtle;
use thiserror::Error;

use crate::model::{Literal, ResourceGraph, Term, Triple};

/// Errors raised while parsing a description file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not valid Turtle.
    #[error("invalid turtle: {0}")]
    Syntax(String),
    /// The document uses a generalized term (variable or quoted triple).
    #[error("unsupported {kind} term in turtle document")]
    UnsupportedTerm {
        /// Kind of the offending term.
        kind: &'static str,
    },
}

/// Parses a Turtle document.
///
/// The parser normalizes language tags to lowercase and relabels anonymous
/// blank nodes, so a parsed and re-serialized document is equal to its
/// source only up to blank-node labels and language-tag case.
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] if the text is not valid Turtle, or
/// [`ParseError::UnsupportedTerm`] if it contains terms outside plain RDF.
pub fn parse_turtle(text: &str) -> Result<ResourceGraph, ParseError> {
    let mut graph = ResourceGraph::new();
    turtle::parse_str(text)
        .try_for_each_triple(|t| -> Result<(), ParseError> {
            graph.insert(Triple::new(
                to_owned_term(t.s())?,
                to_owned_term(t.p())?,
                to_owned_term(t.o())?,
            ));
            Ok(())
        })
        .map_err(|e| match e {
            StreamError::SourceError(e) => ParseError::Syntax(e.to_string()),
            StreamError::SinkError(e) => e,
        })?;
    Ok(graph)
}

fn to_owned_term<T: SophiaTerm>(term: T) -> Result<Term, ParseError> {
    match term.kind() {
        TermKind::Iri => term
            .iri()
            .map(|iri| Term::Iri(iri.as_str().to_owned()))
            .ok_or(ParseError::UnsupportedTerm { kind: "iri" }),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| Term::BlankNode(id.as_str().to_owned()))
            .ok_or(ParseError::UnsupportedTerm { kind: "blank node" }),
        TermKind::Literal => {
            let lexical = term
                .lexical_form()
                .ok_or(ParseError::UnsupportedTerm { kind: "literal" })?
                .to_string();
            if let Some(tag) = term.language_tag() {
                return Ok(Term::Literal(Literal::tagged(lexical, tag.as_str())));
            }
            match term.datatype() {
                Some(dt) => Ok(Term::Literal(Literal::typed(lexical, dt.as_str()))),
                None => Ok(Term::Literal(Literal::plain(lexical))),
            }
        }
        TermKind::Triple => Err(ParseError::UnsupportedTerm { kind: "quoted triple" }),
        TermKind::Variable => Err(ParseError::UnsupportedTerm { kind: "variable" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{EBUCORE_HAS_MIME_TYPE, LDP_CONTAINER, RDF_TYPE, XSD_STRING};

    const RESOURCE: &str = r#"
@prefix ldp: <http://www.w3.org/ns/ldp#> .
@prefix ebucore: <http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#> .
@prefix dc: <http://purl.org/dc/elements/1.1/> .

<http://localhost:8080/rest/a>
    a ldp:Container ;
    ebucore:hasMimeType "text/plain" ;
    dc:title "Titre"@fr ;
    dc:extent "42"^^<http://www.w3.org/2001/XMLSchema#integer> .
"#;

    #[test]
    fn parses_all_triples_in_document_order() {
        let graph = parse_turtle(RESOURCE).expect("parse");
        assert_eq!(graph.len(), 4);
        let first = graph.iter().next().expect("first triple");
        assert!(first.predicate.is_iri(RDF_TYPE));
        assert!(first.object.is_iri(LDP_CONTAINER));
    }

    #[test]
    fn literals_keep_datatype_and_language() {
        let graph = parse_turtle(RESOURCE).expect("parse");
        let mime = graph
            .iter()
            .find(|t| t.predicate.is_iri(EBUCORE_HAS_MIME_TYPE))
            .and_then(|t| t.object.as_literal())
            .expect("mime literal");
        assert_eq!(mime.value(), "text/plain");
        assert_eq!(mime.datatype, XSD_STRING);

        let title = graph
            .iter()
            .filter_map(|t| t.object.as_literal())
            .find(|l| l.language.is_some())
            .expect("tagged literal");
        assert_eq!(title.language.as_deref(), Some("fr"));
    }

    #[test]
    fn region_tags_and_anonymous_nodes_survive_reserialization() {
        let text = r#"<http://x/a> <http://x/label> "colour"@en-GB ;
            <http://x/part> [ <http://x/name> "v" ] ."#;
        let graph = parse_turtle(text).expect("parse");
        let reparsed = parse_turtle(&crate::serializer::turtle::to_turtle(&graph))
            .expect("reparse");
        assert_eq!(reparsed.len(), 3);

        let tag = reparsed
            .iter()
            .filter_map(|t| t.object.as_literal())
            .find_map(|l| l.language.clone())
            .expect("tagged literal");
        assert!(tag.eq_ignore_ascii_case("en-GB"));
        assert!(reparsed
            .iter()
            .any(|t| matches!(t.object, crate::model::Term::BlankNode(_))));
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = parse_turtle("<http://x/a> a").expect_err("truncated turtle");
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn empty_document_yields_empty_graph() {
        assert!(parse_turtle("").expect("parse").is_empty());
    }
}
