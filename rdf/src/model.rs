//! Core triple graph model types.
//!
//! A [`ResourceGraph`] owns every [`Triple`] loaded from one description
//! file. Triples keep the order in which they were first inserted so that
//! classification and serialization are deterministic.

use std::collections::HashSet;
use std::fmt;

use crate::vocab::{RDF_LANG_STRING, XSD_STRING};

/// An RDF literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    /// Lexical form of the value.
    pub lexical: String,
    /// Full IRI of the datatype (`xsd:string` for plain literals).
    pub datatype: String,
    /// Language tag, present only for `rdf:langString` literals.
    pub language: Option<String>,
}

impl Literal {
    /// Creates a plain `xsd:string` literal.
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: XSD_STRING.to_owned(),
            language: None,
        }
    }

    /// Creates a literal with an explicit datatype IRI.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// Creates a language-tagged literal.
    pub fn tagged(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: RDF_LANG_STRING.to_owned(),
            language: Some(language.into()),
        }
    }

    /// Returns the lexical form.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.lexical
    }
}

/// A node in a triple: an IRI, a blank node, or a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// An absolute IRI.
    Iri(String),
    /// A blank node, identified by its document-local label.
    BlankNode(String),
    /// A literal value.
    Literal(Literal),
}

impl Term {
    /// Creates an IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Creates a plain string literal term.
    pub fn literal(lexical: impl Into<String>) -> Self {
        Term::Literal(Literal::plain(lexical))
    }

    /// Returns the IRI if this term is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns the literal if this term is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns true if this term is exactly the given IRI.
    #[must_use]
    pub fn is_iri(&self, iri: &str) -> bool {
        self.as_iri() == Some(iri)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(id) => write!(f, "_:{id}"),
            Term::Literal(lit) => match &lit.language {
                Some(lang) => write!(f, "{:?}@{}", lit.lexical, lang),
                None if lit.datatype == XSD_STRING => write!(f, "{:?}", lit.lexical),
                None => write!(f, "{:?}^^<{}>", lit.lexical, lit.datatype),
            },
        }
    }
}

/// A single (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject: an IRI or blank node.
    pub subject: Term,
    /// Predicate: always an IRI.
    pub predicate: Term,
    /// Object: any term.
    pub object: Term,
}

impl Triple {
    /// Creates a triple from its three terms.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// The set of triples describing one repository resource.
///
/// Set semantics: inserting a triple that is already present is a no-op.
/// Iteration follows first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    triples: Vec<Triple>,
    index: HashSet<Triple>,
}

impl ResourceGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple. Returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.index.contains(&triple) {
            return false;
        }
        self.index.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    /// Removes a triple. Returns false if it was not present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        if !self.index.remove(triple) {
            return false;
        }
        self.triples.retain(|t| t != triple);
        true
    }

    /// Returns true if the graph contains the triple.
    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.index.contains(triple)
    }

    /// Returns an owned, ordered copy of the current triples.
    ///
    /// Traversals that mutate the graph iterate over a snapshot, never over
    /// the live collection.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Triple> {
        self.triples.clone()
    }

    /// Iterates over the triples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

impl FromIterator<Triple> for ResourceGraph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = ResourceGraph::new();
        for triple in iter {
            graph.insert(triple);
        }
        graph
    }
}

impl PartialEq for ResourceGraph {
    /// Graphs compare as sets; insertion order is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for ResourceGraph {}
