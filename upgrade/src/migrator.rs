//! Directory tree migration.
//!
//! Every regular file under the input root is copied to the mirrored path
//! under the output root. Once all copies are done, description files are
//! parsed, classified and rewritten, and committed together with their
//! header sidecar. Files are independent; a failure stops only that file's
//! pipeline.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, info, warn};
use upgrade_rdf::parser::parse_turtle;
use upgrade_rdf::serializer::turtle::to_turtle;
use walkdir::WalkDir;

use crate::classify::{classify_and_rewrite, ExternalBodyRewriter};
use crate::commit::Commit;
use crate::config::{MigrationConfig, DESCRIPTION_EXTENSION};
use crate::error::{FileError, UpgradeError};
use crate::report::{FileOutcome, MigrationReport};
use crate::sidecar;

/// Upgrades an export tree according to a [`MigrationConfig`].
#[derive(Debug)]
pub struct Migrator {
    config: MigrationConfig,
    rewriter: ExternalBodyRewriter,
}

impl Migrator {
    /// Validates the configuration and prepares a migrator.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: MigrationConfig) -> Result<Self, UpgradeError> {
        config.validate()?;
        Ok(Self {
            config,
            rewriter: ExternalBodyRewriter::new()?,
        })
    }

    /// The configuration this migrator runs with.
    #[must_use]
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Walks the input tree and migrates every regular file.
    ///
    /// Runs in two phases. Every file is copied first; descriptions are
    /// then classified and their sidecars committed. A sidecar therefore
    /// always lands after any same-named file copied from the input tree,
    /// and no copy and sidecar write share an output path concurrently.
    ///
    /// Unreadable entries below the root are reported as per-file failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the input root itself cannot be read or the
    /// worker pool cannot be started.
    pub fn run(&self) -> Result<MigrationReport, UpgradeError> {
        info!(input = %self.config.input_dir.display(), "processing directory");

        let mut report = MigrationReport::new();
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.config.input_dir).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.path().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) if e.depth() == 0 => return Err(UpgradeError::Walk(e)),
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    warn!(path = %path.display(), error = %e, "cannot read entry");
                    report.push(FileOutcome::Failed {
                        input: path.clone(),
                        error: FileError::Walk {
                            path,
                            message: e.to_string(),
                        },
                    });
                }
            }
        }

        let pool = if self.config.jobs > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(self.config.jobs)
                    .build()?,
            )
        } else {
            None
        };

        let copies = map_files(pool.as_ref(), files, |input| {
            let output = self.copy_file(&input);
            CopiedFile { input, output }
        });
        let copied: HashSet<PathBuf> = copies
            .iter()
            .filter_map(|c| c.output.as_ref().ok().cloned())
            .collect();
        report.extend(map_files(pool.as_ref(), copies, |c| {
            self.finish_file(c, &copied)
        }));

        report.sort();
        info!(
            copied = report.copied_count(),
            migrated = report.migrated_count(),
            rewritten = report.rewritten_count(),
            failed = report.failure_count(),
            "upgrade finished"
        );
        Ok(report)
    }

    /// Mirrors `input` into the output tree.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::OutsideInput`] if `input` is not under the
    /// input root.
    pub fn output_path(&self, input: &Path) -> Result<PathBuf, FileError> {
        let relative = input
            .strip_prefix(&self.config.input_dir)
            .map_err(|_| FileError::OutsideInput {
                path: input.to_path_buf(),
            })?;
        Ok(self.config.output_dir.join(relative))
    }

    fn copy_file(&self, input: &Path) -> Result<PathBuf, FileError> {
        let output = self.output_path(input)?;
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|source| FileError::Copy {
                path: output.clone(),
                source,
            })?;
        }
        debug!(from = %input.display(), to = %output.display(), "copy file");
        fs::copy(input, &output).map_err(|source| FileError::Copy {
            path: output.clone(),
            source,
        })?;
        Ok(output)
    }

    /// Turns a copy result into the file's outcome, running the description
    /// pipeline where it applies. Errors are captured in
    /// [`FileOutcome::Failed`].
    fn finish_file(&self, file: CopiedFile, copied: &HashSet<PathBuf>) -> FileOutcome {
        let result = match file.output {
            Ok(output) if is_description(&output) => {
                self.migrate_description(&file.input, &output, copied)
            }
            Ok(output) => Ok(FileOutcome::Copied {
                input: file.input.clone(),
                output,
            }),
            Err(error) => Err(error),
        };
        result.unwrap_or_else(|error| {
            warn!(
                path = %file.input.display(),
                stage = error.stage(),
                %error,
                "file migration failed"
            );
            FileOutcome::Failed {
                input: file.input,
                error,
            }
        })
    }

    fn migrate_description(
        &self,
        input: &Path,
        output: &Path,
        copied: &HashSet<PathBuf>,
    ) -> Result<FileOutcome, FileError> {
        let text = fs::read_to_string(output).map_err(|source| FileError::Read {
            path: output.to_path_buf(),
            source,
        })?;
        let mut graph = parse_turtle(&text).map_err(|source| FileError::Parse {
            path: output.to_path_buf(),
            source,
        })?;
        let (facts, headers) =
            classify_and_rewrite(&mut graph, &self.rewriter).map_err(|source| {
                FileError::Classify {
                    path: output.to_path_buf(),
                    source,
                }
            })?;

        let sidecar = sidecar::sidecar_path(output, &facts);
        debug!(
            is_binary = facts.is_binary,
            is_external = facts.is_external,
            is_container = facts.is_container,
            has_concrete_container_type = facts.has_concrete_container_type,
            container_subject = ?facts.container_subject,
            sidecar = %sidecar.display(),
            "classified description"
        );
        if copied.contains(&sidecar) {
            warn!(
                sidecar = %sidecar.display(),
                "replacing file copied from the input tree with generated sidecar"
            );
        }

        let body = sidecar::to_json(&headers).map_err(|source| FileError::Serialize {
            path: output.to_path_buf(),
            source,
        })?;

        let commit_error = |source| FileError::Commit {
            path: output.to_path_buf(),
            source,
        };
        // Sidecar first: a failed description rename then leaves the
        // verbatim copy beside a valid sidecar.
        let mut commit = Commit::new();
        commit.stage(&sidecar, body.as_bytes()).map_err(commit_error)?;
        if facts.rewritten {
            commit
                .stage(output, to_turtle(&graph).as_bytes())
                .map_err(commit_error)?;
        }
        commit.persist().map_err(commit_error)?;

        info!(
            path = %output.display(),
            rewritten = facts.rewritten,
            "migrated description"
        );
        Ok(FileOutcome::Migrated {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            sidecar,
            rewritten: facts.rewritten,
        })
    }
}

/// Result of the copy phase for one input file.
struct CopiedFile {
    input: PathBuf,
    output: Result<PathBuf, FileError>,
}

/// Maps `items` in order, on `pool` when one is given.
fn map_files<T, R, F>(pool: Option<&ThreadPool>, items: Vec<T>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    match pool {
        Some(pool) => pool.install(|| items.into_par_iter().map(f).collect()),
        None => items.into_iter().map(f).collect(),
    }
}

/// Returns true if `path` names a resource description file.
#[must_use]
pub fn is_description(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(DESCRIPTION_EXTENSION))
        .unwrap_or(false)
}
