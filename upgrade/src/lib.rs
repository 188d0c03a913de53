//! Repository export tree upgrade.
//!
//! Reproduces an export tree under a new root, upgrading every resource
//! description on the way: type statements are normalized, external body
//! MIME types are rewritten, and a JSON sidecar records the HTTP headers a
//! later ingest step needs to rebuild each resource.
//!
//! # Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Walk and copy | [`migrator`] |
//! | Parse | [`upgrade_rdf::parser`] |
//! | Classify and rewrite | [`classify`] |
//! | Assemble headers | [`headers`] |
//! | Locate and render sidecar | [`sidecar`] |
//! | Write outputs atomically | [`commit`] |
//!
//! # Entry Point
//!
//! ```no_run
//! use repo_upgrade::{MigrationConfig, Migrator};
//!
//! let config = MigrationConfig::new("export-4.7", "export-5");
//! let report = Migrator::new(config)
//!     .and_then(|m| m.run())
//!     .expect("upgrade failed");
//! assert!(report.all_succeeded());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod classify;
pub mod commit;
pub mod config;
pub mod error;
pub mod headers;
pub mod migrator;
pub mod report;
pub mod sidecar;

pub use classify::{classify_and_rewrite, Classification, ClassifyError, ExternalBodyRewriter};
pub use config::{ExportVersion, MigrationConfig, DESCRIPTION_EXTENSION};
pub use error::{FileError, UpgradeError};
pub use headers::{Header, HeaderMap};
pub use migrator::Migrator;
pub use report::{FileOutcome, MigrationReport};
