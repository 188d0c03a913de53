//! Vocabulary consumed by the upgrade engine.
//!
//! Full IRIs only; prefixed forms are produced by the serializer from
//! [`PREFIXES`].

/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdf:langString`, the datatype of language-tagged literals.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
/// `xsd:string`, the datatype of plain literals.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// `ldp:NonRDFSource`: marks a binary resource description.
pub const LDP_NON_RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#NonRDFSource";
/// `ldp:Container`: the base container type.
pub const LDP_CONTAINER: &str = "http://www.w3.org/ns/ldp#Container";
/// `ldp:BasicContainer`: the default concrete container type.
pub const LDP_BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
/// `ldp:DirectContainer`.
pub const LDP_DIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#DirectContainer";
/// `ldp:IndirectContainer`.
pub const LDP_INDIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#IndirectContainer";

/// Concrete container subtypes. Any one of these satisfies the successor
/// format's requirement for an explicit container type.
pub const LDP_CONTAINER_TYPES: &[&str] = &[
    LDP_BASIC_CONTAINER,
    LDP_DIRECT_CONTAINER,
    LDP_INDIRECT_CONTAINER,
];

/// `ebucore:hasMimeType`.
pub const EBUCORE_HAS_MIME_TYPE: &str =
    "http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#hasMimeType";

/// Well-known prefixes, as `(prefix, namespace IRI)` pairs.
pub const PREFIXES: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("ldp", "http://www.w3.org/ns/ldp#"),
    ("ebucore", "http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#"),
    ("fedora", "http://fedora.info/definitions/v4/repository#"),
    ("premis", "http://www.loc.gov/premis/rdf/v1#"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
];

/// Returns true if `iri` is one of the concrete container subtypes.
#[must_use]
pub fn is_concrete_container_type(iri: &str) -> bool {
    LDP_CONTAINER_TYPES.contains(&iri)
}
