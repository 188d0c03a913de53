//! Run configuration: input and output roots, versions, and worker count.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::UpgradeError;

/// Extension identifying resource description files.
pub const DESCRIPTION_EXTENSION: &str = ".ttl";

/// Export format versions the tool knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportVersion {
    /// 4.7.x exports: Turtle descriptions, external bodies as MIME types.
    V4_7,
    /// 5.x exports: explicit container types, header sidecars.
    V5,
}

impl FromStr for ExportVersion {
    type Err = UpgradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "4.7" || s.starts_with("4.7.") {
            Ok(ExportVersion::V4_7)
        } else if s == "5" || s.starts_with("5.") || s == "5+" {
            Ok(ExportVersion::V5)
        } else {
            Err(UpgradeError::UnknownVersion(s.to_owned()))
        }
    }
}

impl fmt::Display for ExportVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportVersion::V4_7 => "4.7",
            ExportVersion::V5 => "5",
        })
    }
}

/// Settings for one upgrade run. Shared read-only by all workers.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Root of the export tree to read.
    pub input_dir: PathBuf,
    /// Root of the tree to write.
    pub output_dir: PathBuf,
    /// Version the input tree was exported from.
    pub source_version: ExportVersion,
    /// Version the output tree targets.
    pub target_version: ExportVersion,
    /// Number of files processed concurrently.
    pub jobs: usize,
}

impl MigrationConfig {
    /// Creates a sequential 4.7 to 5 configuration.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            source_version: ExportVersion::V4_7,
            target_version: ExportVersion::V5,
            jobs: 1,
        }
    }

    /// Checks the configuration before any file is touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the input directory is missing or not a
    /// directory, if the output directory lies inside the input directory,
    /// if no upgrade path exists between the versions, or if `jobs` is zero.
    pub fn validate(&self) -> Result<(), UpgradeError> {
        if !self.input_dir.exists() {
            return Err(UpgradeError::InputNotFound(self.input_dir.clone()));
        }
        if !self.input_dir.is_dir() {
            return Err(UpgradeError::InputNotDirectory(self.input_dir.clone()));
        }
        if is_within(&self.output_dir, &self.input_dir) {
            return Err(UpgradeError::OutputInsideInput {
                input: self.input_dir.clone(),
                output: self.output_dir.clone(),
            });
        }
        if (self.source_version, self.target_version) != (ExportVersion::V4_7, ExportVersion::V5) {
            return Err(UpgradeError::UnsupportedUpgrade {
                from: self.source_version.to_string(),
                to: self.target_version.to_string(),
            });
        }
        if self.jobs == 0 {
            return Err(UpgradeError::NoJobs);
        }
        Ok(())
    }
}

/// Returns true if `path` is `root` or below it. Compares canonical forms
/// when they can be resolved.
fn is_within(path: &Path, root: &Path) -> bool {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let path = match path.canonicalize() {
        Ok(p) => p,
        // The output directory usually does not exist yet; resolve its
        // closest existing ancestor instead.
        Err(_) => resolve_missing(path),
    };
    path.starts_with(root)
}

fn resolve_missing(path: &Path) -> PathBuf {
    let mut tail = Vec::new();
    let mut current = path;
    loop {
        let existing = if current.as_os_str().is_empty() {
            Path::new(".")
        } else {
            current
        };
        if let Ok(base) = existing.canonicalize() {
            return tail.iter().rev().fold(base, |acc: PathBuf, part| acc.join(part));
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_owned());
                current = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}
