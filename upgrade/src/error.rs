//! Error types for the upgrade run.
//!
//! [`UpgradeError`] aborts the whole run. [`FileError`] aborts a single
//! file's pipeline; the walk records it and moves on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use upgrade_rdf::ParseError;

use crate::classify::ClassifyError;

/// Fatal errors: invalid configuration or an unwalkable input root.
#[derive(Debug, Error)]
pub enum UpgradeError {
    /// The input directory does not exist.
    #[error("input directory not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input path exists but is not a directory.
    #[error("input path is not a directory: {}", .0.display())]
    InputNotDirectory(PathBuf),

    /// The output directory is the input directory or lies inside it.
    #[error("output directory {} must not be inside input directory {}", output.display(), input.display())]
    OutputInsideInput {
        /// Configured input directory.
        input: PathBuf,
        /// Configured output directory.
        output: PathBuf,
    },

    /// A version string that names no known export format.
    #[error("unknown export version: {0}")]
    UnknownVersion(String),

    /// No upgrade is implemented between the two versions.
    #[error("no upgrade path from {from} to {to}")]
    UnsupportedUpgrade {
        /// Source export version.
        from: String,
        /// Target export version.
        to: String,
    },

    /// The worker count is zero.
    #[error("job count must be at least 1")]
    NoJobs,

    /// The input root could not be read.
    #[error("cannot walk input directory: {0}")]
    Walk(#[source] walkdir::Error),

    /// The external body URL pattern failed to compile.
    #[error("invalid external body pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The worker pool could not be started.
    #[error("cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A failure confined to one input file, tagged with the pipeline stage.
#[derive(Debug, Error)]
pub enum FileError {
    /// A directory entry below the input root could not be read.
    #[error("cannot read entry {}: {message}", path.display())]
    Walk {
        /// Path of the entry, when known.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },

    /// The file path does not lie under the input root.
    #[error("{} is not under the input directory", path.display())]
    OutsideInput {
        /// The offending path.
        path: PathBuf,
    },

    /// Copying the file to the output tree failed.
    #[error("cannot copy {} to the output tree: {source}", path.display())]
    Copy {
        /// Output path being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Reading the copied description failed.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The description is not valid Turtle.
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        /// Path being parsed.
        path: PathBuf,
        /// Parser error.
        source: ParseError,
    },

    /// The description contains statements of an unexpected shape.
    #[error("malformed description {}: {source}", path.display())]
    Classify {
        /// Path being classified.
        path: PathBuf,
        /// Classification error.
        source: ClassifyError,
    },

    /// The sidecar body could not be serialized.
    #[error("cannot serialize headers for {}: {source}", path.display())]
    Serialize {
        /// Path of the description.
        path: PathBuf,
        /// JSON error.
        source: serde_json::Error,
    },

    /// Staging or persisting the outputs failed.
    #[error("cannot commit outputs for {}: {source}", path.display())]
    Commit {
        /// Path of the description.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl FileError {
    /// Short name of the pipeline stage that failed.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            FileError::Walk { .. } | FileError::OutsideInput { .. } => "walk",
            FileError::Copy { .. } => "copy",
            FileError::Read { .. } => "read",
            FileError::Parse { .. } => "parse",
            FileError::Classify { .. } => "classify",
            FileError::Serialize { .. } => "serialize",
            FileError::Commit { .. } => "commit",
        }
    }
}
