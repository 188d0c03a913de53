//! Run report types: per-file outcomes and aggregation.

use std::path::{Path, PathBuf};

use crate::error::FileError;

/// Outcome of processing a single input file.
#[derive(Debug)]
pub enum FileOutcome {
    /// A plain file, copied verbatim.
    Copied {
        /// Path in the input tree.
        input: PathBuf,
        /// Path in the output tree.
        output: PathBuf,
    },
    /// A description file, copied, classified, and given a sidecar.
    Migrated {
        /// Path in the input tree.
        input: PathBuf,
        /// Path in the output tree.
        output: PathBuf,
        /// Path of the header sidecar.
        sidecar: PathBuf,
        /// Whether the description was rewritten.
        rewritten: bool,
    },
    /// The file's pipeline was aborted.
    Failed {
        /// Path in the input tree.
        input: PathBuf,
        /// Reason the pipeline stopped.
        error: FileError,
    },
}

impl FileOutcome {
    /// Path of the input file this outcome describes.
    #[must_use]
    pub fn input(&self) -> &Path {
        match self {
            FileOutcome::Copied { input, .. }
            | FileOutcome::Migrated { input, .. }
            | FileOutcome::Failed { input, .. } => input,
        }
    }

    /// Returns true if this outcome is a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

/// Aggregated outcomes of an upgrade run.
#[derive(Debug)]
pub struct MigrationReport {
    /// Every per-file outcome, ordered by input path once the run completes.
    pub outcomes: Vec<FileOutcome>,
}

impl MigrationReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }

    /// Appends an outcome.
    pub fn push(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    /// Appends many outcomes.
    pub fn extend(&mut self, outcomes: impl IntoIterator<Item = FileOutcome>) {
        self.outcomes.extend(outcomes);
    }

    /// Orders outcomes by input path.
    pub fn sort(&mut self) {
        self.outcomes.sort_by(|a, b| a.input().cmp(b.input()));
    }

    /// Number of files copied without migration.
    pub fn copied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Copied { .. }))
            .count()
    }

    /// Number of description files migrated.
    pub fn migrated_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Migrated { .. }))
            .count()
    }

    /// Number of description files whose triples were rewritten.
    pub fn rewritten_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Migrated { rewritten: true, .. }))
            .count()
    }

    /// Number of failed files.
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Failed files with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &FileError)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Failed { input, error } => Some((input.as_path(), error)),
            _ => None,
        })
    }

    /// Returns true if no file failed.
    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }
}

impl Default for MigrationReport {
    fn default() -> Self {
        Self::new()
    }
}
