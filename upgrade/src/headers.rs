//! HTTP header map recorded for each migrated resource.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Header names a sidecar may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Header {
    /// `Link`: one `rel="type"` entry per type statement.
    Link,
    /// `Content-Type`: declared MIME types.
    ContentType,
    /// `Location`: external body URL.
    Location,
    /// `Content-Location`: external body URL.
    ContentLocation,
}

impl Header {
    /// Returns the HTTP header name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Header::Link => "Link",
            Header::ContentType => "Content-Type",
            Header::Location => "Location",
            Header::ContentLocation => "Content-Location",
        }
    }
}

/// Insertion-ordered map from header name to its values.
///
/// Serializes as a JSON object whose keys appear in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(Header, Vec<String>)>,
}

impl HeaderMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to a header, creating the header if absent.
    pub fn append(&mut self, header: Header, value: impl Into<String>) {
        match self.entries.iter_mut().find(|(h, _)| *h == header) {
            Some((_, values)) => values.push(value.into()),
            None => self.entries.push((header, vec![value.into()])),
        }
    }

    /// Replaces all values of a header. An existing header keeps its position.
    pub fn set(&mut self, header: Header, values: Vec<String>) {
        match self.entries.iter_mut().find(|(h, _)| *h == header) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((header, values)),
        }
    }

    /// Returns the values of a header, if present.
    #[must_use]
    pub fn get(&self, header: Header) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(h, _)| *h == header)
            .map(|(_, values)| values.as_slice())
    }

    /// Header names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = Header> + '_ {
        self.entries.iter().map(|(h, _)| *h)
    }

    /// Returns true if no header has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for HeaderMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (header, values) in &self.entries {
            map.serialize_entry(header.as_str(), values)?;
        }
        map.end()
    }
}

/// Builds the `Link` value declaring `iri` as a type of the resource.
#[must_use]
pub fn type_link(iri: &str) -> String {
    format!("<{}>; rel=\"type\"", iri)
}
