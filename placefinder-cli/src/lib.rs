//! Command-line interface for the place finder.
//!
//! `recreate-db` and `seed-db` bootstrap a database; the remaining commands
//! drive the catalogue operations against it and print JSON.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use placefinder_core::SqlitePlaceStore;
use placefinder_fs::FileState;
use serde::Serialize;

mod bootstrap;
mod error;
mod places;

pub use error::CliError;

use bootstrap::{HttpLocationSourceBuilder, LocationSourceBuilder, RecreateDbArgs, SeedDbArgs};
use places::{AddArgs, ListArgs, NearestArgs, RemoveArgs, ShowArgs, UpdateArgs};

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_ID: &str = "id";
pub(crate) const ARG_LATITUDE: &str = "latitude";
pub(crate) const ARG_LONGITUDE: &str = "longitude";
pub(crate) const ARG_NAME: &str = "name";
pub(crate) const ARG_CATEGORY: &str = "category";
pub(crate) const ARG_NAME_CONTAINS: &str = "name-contains";
pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LON: &str = "lon";
pub(crate) const ARG_RADIUS: &str = "m";
pub(crate) const ARG_LIMIT: &str = "k";
pub(crate) const ARG_BASE_URL: &str = "base-url";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_MAX_ATTEMPTS: &str = "max-attempts";

pub(crate) const ENV_SHOW_ID: &str = "PLACEFINDER_CMDS_SHOW_ID";
pub(crate) const ENV_REMOVE_ID: &str = "PLACEFINDER_CMDS_REMOVE_ID";
pub(crate) const ENV_UPDATE_ID: &str = "PLACEFINDER_CMDS_UPDATE_ID";
pub(crate) const ENV_NEAREST_CATEGORY: &str = "PLACEFINDER_CMDS_NEAREST_CATEGORY";

/// Database used when no path is configured.
pub const DEFAULT_DATABASE: &str = "places.db";

/// Run the placefinder CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_command(cli.command, &HttpLocationSourceBuilder, &mut stdout)
}

fn run_command(
    command: Command,
    sources: &dyn LocationSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::RecreateDb(args) => bootstrap::run_recreate_db(&args.into_config()?, writer),
        Command::SeedDb(args) => bootstrap::run_seed_db(&args.into_config()?, sources, writer),
        Command::List(args) => places::run_list(&args.into_config()?, writer),
        Command::Show(args) => places::run_show(&args.into_config()?, writer),
        Command::Add(args) => places::run_add(args.into_config()?, writer),
        Command::Update(args) => places::run_update(args.into_config()?, writer),
        Command::Remove(args) => places::run_remove(&args.into_config()?, writer),
        Command::Nearest(args) => places::run_nearest(args.into_config()?, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "placefinder",
    about = "Manage a catalogue of places and query the nearest ones",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Drop and recreate the places table.
    RecreateDb(RecreateDbArgs),
    /// Load every provider layer into the database.
    SeedDb(SeedDbArgs),
    /// List places, optionally filtered.
    List(ListArgs),
    /// Show one place.
    Show(ShowArgs),
    /// Create a place.
    Add(AddArgs),
    /// Overwrite every field of a place.
    Update(UpdateArgs),
    /// Delete a place.
    Remove(RemoveArgs),
    /// Find places of a category near a point.
    Nearest(NearestArgs),
}

/// Resolve the database path, falling back to [`DEFAULT_DATABASE`].
pub(crate) fn database_or_default(database: Option<Utf8PathBuf>) -> Utf8PathBuf {
    database.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE))
}

/// Open an existing database, refusing to create one implicitly.
pub(crate) fn open_existing_store(path: &Utf8Path) -> Result<SqlitePlaceStore, CliError> {
    match placefinder_fs::inspect_file(path) {
        Ok(FileState::File) => open_store(path),
        Ok(FileState::Missing) => Err(CliError::MissingDatabase {
            path: path.to_path_buf(),
        }),
        Ok(FileState::NotFile) => Err(CliError::DatabaseNotFile {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::PrepareDatabasePath {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Open (or create) the database at `path`, creating parent directories.
pub(crate) fn open_or_create_store(path: &Utf8Path) -> Result<SqlitePlaceStore, CliError> {
    placefinder_fs::ensure_parent_dir(path).map_err(|source| CliError::PrepareDatabasePath {
        path: path.to_path_buf(),
        source,
    })?;
    open_store(path)
}

fn open_store(path: &Utf8Path) -> Result<SqlitePlaceStore, CliError> {
    SqlitePlaceStore::open(path.as_std_path()).map_err(|source| CliError::Store {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T>(writer: &mut dyn Write, value: &T) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
