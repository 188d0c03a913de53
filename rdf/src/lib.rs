//! Triple graphs for repository export upgrades.
//!
//! The `upgrade-rdf` crate holds the small RDF surface the upgrade engine
//! needs: an owned, insertion-ordered [`ResourceGraph`] describing one
//! repository resource, the vocabulary constants the engine inspects, a
//! Turtle parser backed by `sophia_turtle`, and a deterministic Turtle
//! serializer used to write rewritten description files back to disk.
//!
//! # Entry Point
//!
//! ```
//! use upgrade_rdf::{parser, serializer::turtle, vocab};
//!
//! let ttl = "<http://localhost/rest/a> a <http://www.w3.org/ns/ldp#Container> .";
//! let graph = parser::parse_turtle(ttl).expect("valid turtle");
//! assert_eq!(graph.len(), 1);
//! assert!(graph.iter().any(|t| t.predicate.is_iri(vocab::RDF_TYPE)));
//!
//! let out = turtle::to_turtle(&graph);
//! assert!(out.contains("ldp:Container"));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod model;
pub mod parser;
pub mod serializer;
pub mod vocab;

pub use model::{Literal, ResourceGraph, Term, Triple};
pub use parser::ParseError;
