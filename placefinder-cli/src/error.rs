//! Error types emitted by the placefinder CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use placefinder_core::{CatalogueError, SqlitePlaceStoreError, UnknownCategory};
use placefinder_data::{SeedError, SourceBuildError};
use thiserror::Error;

/// Errors emitted by the placefinder CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A category argument is not one of the provider's location tags.
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
    /// The database file does not exist.
    #[error("database {path:?} does not exist (run `placefinder recreate-db` first)")]
    MissingDatabase { path: Utf8PathBuf },
    /// The database path exists but is not a file.
    #[error("database path {path:?} exists but is not a file")]
    DatabaseNotFile { path: Utf8PathBuf },
    /// The database path could not be inspected or prepared.
    #[error("failed to prepare database path {path:?}: {source}")]
    PrepareDatabasePath {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening or resetting the place store failed.
    #[error("place store {path:?} failed: {source}")]
    Store {
        path: Utf8PathBuf,
        #[source]
        source: SqlitePlaceStoreError,
    },
    /// A catalogue rule rejected the request or the store failed.
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
    /// Constructing the location source failed.
    #[error("failed to build location source for {base_url:?}: {source}")]
    BuildLocationSource {
        base_url: String,
        #[source]
        source: SourceBuildError,
    },
    /// Fetching or storing seed data failed.
    #[error("seeding failed: {0}")]
    Seed(#[from] SeedError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
