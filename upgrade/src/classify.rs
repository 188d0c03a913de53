//! Resource classification and in-place content rewriting.
//!
//! Classification and rewriting happen in one ordered pass over a snapshot
//! of the graph. Each statement is inspected, may contribute header values,
//! and may cause the live graph to be mutated; the snapshot being walked is
//! never touched. After the pass a container lacking a concrete container
//! type receives the default one.

use regex::Regex;
use thiserror::Error;
use tracing::debug;
use upgrade_rdf::vocab::{
    is_concrete_container_type, EBUCORE_HAS_MIME_TYPE, LDP_BASIC_CONTAINER, LDP_CONTAINER,
    LDP_NON_RDF_SOURCE, RDF_TYPE,
};
use upgrade_rdf::{ResourceGraph, Term, Triple};

use crate::headers::{type_link, Header, HeaderMap};

/// MIME type prefix that encodes an external body reference.
pub const EXTERNAL_BODY_PREFIX: &str = "message/external-body";

/// MIME type that replaces an external body declaration.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Facts derived from one pass over a resource graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// The resource is an `ldp:NonRDFSource`.
    pub is_binary: bool,
    /// The resource carries the base `ldp:Container` type.
    pub is_container: bool,
    /// An external body URL was extracted from a MIME type statement.
    pub is_external: bool,
    /// A concrete container type (basic, direct, indirect) is declared.
    pub has_concrete_container_type: bool,
    /// Subject of the base container type statement, if any.
    pub container_subject: Option<Term>,
    /// The graph was mutated and must be written back.
    pub rewritten: bool,
}

/// Errors raised for statements of an unexpected shape.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// An `rdf:type` statement whose object is not an IRI.
    #[error("rdf:type object of {subject} is not an IRI: {object}")]
    TypeNotIri {
        /// Subject of the offending statement.
        subject: String,
        /// The non-IRI object.
        object: String,
    },
    /// A MIME type statement whose object is not a literal.
    #[error("mime type object of {subject} is not a literal: {object}")]
    MimeTypeNotLiteral {
        /// Subject of the offending statement.
        subject: String,
        /// The non-literal object.
        object: String,
    },
    /// More than one subject carries the base container type.
    #[error("base container type declared on {} subjects: {}", subjects.len(), subjects.join(", "))]
    AmbiguousContainer {
        /// Every subject typed `ldp:Container`, in encounter order.
        subjects: Vec<String>,
    },
}

/// Extracts the URL embedded in an external body MIME type value.
#[derive(Debug, Clone)]
pub struct ExternalBodyRewriter {
    url: Regex,
}

impl ExternalBodyRewriter {
    /// Compiles the URL pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            url: Regex::new(r#"(?i)^.*url="(.*)".*$"#)?,
        })
    }

    /// Returns true if `value` declares an external body.
    ///
    /// The prefix comparison is case-sensitive.
    #[must_use]
    pub fn is_external_body(&self, value: &str) -> bool {
        value.starts_with(EXTERNAL_BODY_PREFIX)
    }

    /// Returns the quoted `url="..."` parameter of `value`, if any.
    #[must_use]
    pub fn external_url(&self, value: &str) -> Option<String> {
        self.url
            .captures(value)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_owned())
    }
}

/// Accumulator threaded through the traversal.
#[derive(Default)]
struct Pass {
    facts: Classification,
    headers: HeaderMap,
    container_subjects: Vec<Term>,
}

impl Pass {
    fn visit(
        &mut self,
        graph: &mut ResourceGraph,
        statement: &Triple,
        rewriter: &ExternalBodyRewriter,
    ) -> Result<(), ClassifyError> {
        if statement.predicate.is_iri(RDF_TYPE) {
            self.visit_type(statement)?;
        }
        if statement.predicate.is_iri(EBUCORE_HAS_MIME_TYPE) {
            self.visit_mime_type(graph, statement, rewriter)?;
        }
        Ok(())
    }

    fn visit_type(&mut self, statement: &Triple) -> Result<(), ClassifyError> {
        let object = statement
            .object
            .as_iri()
            .ok_or_else(|| ClassifyError::TypeNotIri {
                subject: statement.subject.to_string(),
                object: statement.object.to_string(),
            })?;

        if object == LDP_NON_RDF_SOURCE {
            self.facts.is_binary = true;
        } else if object == LDP_CONTAINER {
            self.facts.is_container = true;
            self.facts.container_subject = Some(statement.subject.clone());
            if !self.container_subjects.contains(&statement.subject) {
                self.container_subjects.push(statement.subject.clone());
            }
        } else if is_concrete_container_type(object) {
            self.facts.has_concrete_container_type = true;
        }

        self.headers.append(Header::Link, type_link(object));
        Ok(())
    }

    fn visit_mime_type(
        &mut self,
        graph: &mut ResourceGraph,
        statement: &Triple,
        rewriter: &ExternalBodyRewriter,
    ) -> Result<(), ClassifyError> {
        let value = statement
            .object
            .as_literal()
            .ok_or_else(|| ClassifyError::MimeTypeNotLiteral {
                subject: statement.subject.to_string(),
                object: statement.object.to_string(),
            })?
            .value();
        debug!(value, "mime type statement");

        if !rewriter.is_external_body(value) {
            self.headers.append(Header::ContentType, value);
            return Ok(());
        }

        let external_url = rewriter.external_url(value);
        debug!(?external_url, "external body");

        graph.remove(statement);
        graph.insert(Triple::new(
            statement.subject.clone(),
            statement.predicate.clone(),
            Term::literal(OCTET_STREAM),
        ));
        self.facts.rewritten = true;

        if let Some(url) = external_url {
            self.headers.set(Header::Location, vec![url.clone()]);
            self.headers.set(Header::ContentLocation, vec![url]);
            self.facts.is_external = true;
        }
        Ok(())
    }
}

/// Classifies a resource graph and rewrites it in place.
///
/// Returns the derived facts and the header map built during the pass.
/// `Link` and `Content-Type` values keep statement order; `Location` and
/// `Content-Location` reflect the last external body statement seen.
///
/// # Errors
///
/// Returns a [`ClassifyError`] for malformed type or MIME type statements,
/// or when several subjects carry the base container type. The graph may be
/// partially rewritten when an error is returned and should be discarded.
pub fn classify_and_rewrite(
    graph: &mut ResourceGraph,
    rewriter: &ExternalBodyRewriter,
) -> Result<(Classification, HeaderMap), ClassifyError> {
    let mut pass = Pass::default();

    for statement in graph.snapshot() {
        pass.visit(graph, &statement, rewriter)?;
    }

    if pass.container_subjects.len() > 1 {
        return Err(ClassifyError::AmbiguousContainer {
            subjects: pass
                .container_subjects
                .iter()
                .map(ToString::to_string)
                .collect(),
        });
    }

    // The successor format's next upgrade stage requires an explicit
    // concrete container type.
    if pass.facts.is_container && !pass.facts.has_concrete_container_type {
        if let Some(subject) = pass.facts.container_subject.clone() {
            graph.insert(Triple::new(
                subject,
                Term::iri(RDF_TYPE),
                Term::iri(LDP_BASIC_CONTAINER),
            ));
            pass.facts.rewritten = true;
        }
    }

    Ok((pass.facts, pass.headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use upgrade_rdf::vocab::LDP_DIRECT_CONTAINER;

    const SUBJECT: &str = "http://localhost:8080/rest/obj";

    fn rewriter() -> ExternalBodyRewriter {
        ExternalBodyRewriter::new().expect("pattern compiles")
    }

    fn typed(class: &str) -> Triple {
        Triple::new(Term::iri(SUBJECT), Term::iri(RDF_TYPE), Term::iri(class))
    }

    fn mime(value: &str) -> Triple {
        Triple::new(
            Term::iri(SUBJECT),
            Term::iri(EBUCORE_HAS_MIME_TYPE),
            Term::literal(value),
        )
    }

    fn run(triples: Vec<Triple>) -> (ResourceGraph, Classification, HeaderMap) {
        let mut graph: ResourceGraph = triples.into_iter().collect();
        let (facts, headers) = classify_and_rewrite(&mut graph, &rewriter()).expect("classify");
        (graph, facts, headers)
    }

    #[test]
    fn bare_container_gets_basic_container_type() {
        let (graph, facts, headers) = run(vec![typed(LDP_CONTAINER)]);
        assert!(facts.is_container);
        assert!(!facts.has_concrete_container_type);
        assert!(facts.rewritten);
        assert_eq!(facts.container_subject, Some(Term::iri(SUBJECT)));
        assert_eq!(graph.len(), 2);
        assert!(graph.contains(&typed(LDP_BASIC_CONTAINER)));
        // Only the original statement contributes a Link entry.
        assert_eq!(
            headers.get(Header::Link),
            Some(&[type_link(LDP_CONTAINER)][..])
        );
    }

    #[test]
    fn concrete_container_type_prevents_injection() {
        let (graph, facts, headers) = run(vec![typed(LDP_CONTAINER), typed(LDP_DIRECT_CONTAINER)]);
        assert!(facts.has_concrete_container_type);
        assert!(!facts.rewritten);
        assert_eq!(graph.len(), 2);
        assert!(!graph.contains(&typed(LDP_BASIC_CONTAINER)));
        assert_eq!(headers.get(Header::Link).map(<[String]>::len), Some(2));
    }

    #[test]
    fn concrete_type_without_base_type_is_left_alone() {
        let (graph, facts, _) = run(vec![typed(LDP_BASIC_CONTAINER)]);
        assert!(!facts.is_container);
        assert!(facts.container_subject.is_none());
        assert!(!facts.rewritten);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn external_body_with_url_is_rewritten() {
        let value = r#"message/external-body; access-type=URL; url="http://ext/file.bin""#;
        let (graph, facts, headers) = run(vec![typed(LDP_NON_RDF_SOURCE), mime(value)]);
        assert!(facts.is_binary);
        assert!(facts.is_external);
        assert!(facts.rewritten);
        assert!(!graph.contains(&mime(value)));
        assert!(graph.contains(&mime(OCTET_STREAM)));
        let url = ["http://ext/file.bin".to_owned()];
        assert_eq!(headers.get(Header::Location), Some(&url[..]));
        assert_eq!(headers.get(Header::ContentLocation), Some(&url[..]));
        assert_eq!(headers.get(Header::ContentType), None);
    }

    #[test]
    fn external_body_without_url_is_rewritten_but_not_external() {
        let (graph, facts, headers) = run(vec![mime("message/external-body; access-type=URL")]);
        assert!(facts.rewritten);
        assert!(!facts.is_external);
        assert!(graph.contains(&mime(OCTET_STREAM)));
        assert_eq!(headers.get(Header::Location), None);
        assert_eq!(headers.get(Header::ContentLocation), None);
    }

    #[test]
    fn external_body_prefix_is_case_sensitive() {
        let value = r#"Message/External-Body; url="http://ext/x""#;
        let (graph, facts, headers) = run(vec![mime(value)]);
        assert!(!facts.rewritten);
        assert!(graph.contains(&mime(value)));
        assert_eq!(headers.get(Header::ContentType), Some(&[value.to_owned()][..]));
    }

    #[test]
    fn url_parameter_name_is_case_insensitive() {
        let rewriter = rewriter();
        assert_eq!(
            rewriter.external_url(r#"message/external-body; URL="http://a/b""#),
            Some("http://a/b".to_owned())
        );
        assert_eq!(rewriter.external_url("message/external-body"), None);
    }

    #[test]
    fn ordinary_mime_types_accumulate_in_order() {
        let (graph, facts, headers) = run(vec![mime("text/plain"), mime("image/png")]);
        assert!(!facts.rewritten);
        assert_eq!(graph.len(), 2);
        assert_eq!(
            headers.get(Header::ContentType),
            Some(&["text/plain".to_owned(), "image/png".to_owned()][..])
        );
    }

    #[test]
    fn last_external_body_sets_location() {
        let (graph, facts, headers) = run(vec![
            mime(r#"message/external-body; url="http://one""#),
            mime("text/plain"),
            mime(r#"message/external-body; url="http://two""#),
        ]);
        assert!(facts.is_external);
        assert!(facts.rewritten);
        // Both external bodies collapse into one octet-stream statement.
        assert_eq!(graph.len(), 2);
        assert!(graph.contains(&mime(OCTET_STREAM)));
        let two = ["http://two".to_owned()];
        assert_eq!(headers.get(Header::Location), Some(&two[..]));
        assert_eq!(headers.get(Header::ContentLocation), Some(&two[..]));
        assert_eq!(
            headers.get(Header::ContentType),
            Some(&["text/plain".to_owned()][..])
        );
    }

    #[test]
    fn every_type_statement_contributes_a_link() {
        let (_, _, headers) = run(vec![
            typed(LDP_NON_RDF_SOURCE),
            typed("http://fedora.info/definitions/v4/repository#Binary"),
        ]);
        assert_eq!(
            headers.get(Header::Link),
            Some(
                &[
                    type_link(LDP_NON_RDF_SOURCE),
                    type_link("http://fedora.info/definitions/v4/repository#Binary"),
                ][..]
            )
        );
    }

    #[test]
    fn literal_type_object_is_an_error() {
        let mut graph: ResourceGraph = std::iter::once(Triple::new(
            Term::iri(SUBJECT),
            Term::iri(RDF_TYPE),
            Term::literal("Container"),
        ))
        .collect();
        let err = classify_and_rewrite(&mut graph, &rewriter()).expect_err("malformed");
        assert!(matches!(err, ClassifyError::TypeNotIri { .. }));
    }

    #[test]
    fn iri_mime_type_object_is_an_error() {
        let mut graph: ResourceGraph = std::iter::once(Triple::new(
            Term::iri(SUBJECT),
            Term::iri(EBUCORE_HAS_MIME_TYPE),
            Term::iri("http://x/text-plain"),
        ))
        .collect();
        let err = classify_and_rewrite(&mut graph, &rewriter()).expect_err("malformed");
        assert!(matches!(err, ClassifyError::MimeTypeNotLiteral { .. }));
    }

    #[test]
    fn several_container_subjects_are_reported() {
        let mut graph: ResourceGraph = vec![
            typed(LDP_CONTAINER),
            Triple::new(
                Term::iri("http://localhost:8080/rest/other"),
                Term::iri(RDF_TYPE),
                Term::iri(LDP_CONTAINER),
            ),
        ]
        .into_iter()
        .collect();
        let err = classify_and_rewrite(&mut graph, &rewriter()).expect_err("ambiguous");
        assert!(
            matches!(&err, ClassifyError::AmbiguousContainer { subjects } if subjects.len() == 2),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn second_pass_is_idempotent() {
        let value = r#"message/external-body; url="http://ext/a""#;
        let (mut graph, first, _) = run(vec![typed(LDP_CONTAINER), mime(value)]);
        assert!(first.rewritten);
        let (second, _) = classify_and_rewrite(&mut graph, &rewriter()).expect("classify");
        assert!(!second.rewritten);
    }
}
