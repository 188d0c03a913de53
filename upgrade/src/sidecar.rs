//! Sidecar header file location and body.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::classify::Classification;
use crate::headers::HeaderMap;

/// File name suffix of every sidecar.
pub const HEADERS_SUFFIX: &str = ".headers";

/// Computes where the sidecar for `output_file` is written.
///
/// A binary description belongs to the binary stored one directory up, so
/// its sidecar sits next to that directory: `<parent>.external.headers` for
/// an externally stored body, `<parent>.binary.headers` otherwise. Every
/// other description gets `<file>.headers`.
#[must_use]
pub fn sidecar_path(output_file: &Path, facts: &Classification) -> PathBuf {
    let mut path: OsString = if facts.is_binary {
        let parent = output_file.parent().unwrap_or_else(|| Path::new(""));
        let mut base = parent.as_os_str().to_owned();
        base.push(if facts.is_external {
            ".external"
        } else {
            ".binary"
        });
        base
    } else {
        output_file.as_os_str().to_owned()
    };
    path.push(HEADERS_SUFFIX);
    PathBuf::from(path)
}

/// Renders the sidecar body: a compact JSON object of header arrays.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn to_json(headers: &HeaderMap) -> Result<String, serde_json::Error> {
    serde_json::to_string(headers)
}
