//! Database bootstrap commands: `recreate-db` and `seed-db`.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use placefinder_core::Category;
use placefinder_data::fetch::{DEFAULT_BASE_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS};
use placefinder_data::{
    HttpLocationSource, HttpLocationSourceConfig, LocationFetcher, LocationSource, SeedReport,
    seed_from_source,
};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_BASE_URL, ARG_DATABASE, ARG_MAX_ATTEMPTS, ARG_TIMEOUT_SECS, CliError, database_or_default,
    open_or_create_store,
};

/// CLI arguments for the `recreate-db` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "recreate-db",
    about = "Drop and recreate the places table",
    long_about = "Drop every stored place and recreate an empty places table. \
                  The database file and its parent directories are created \
                  when missing."
)]
#[ortho_config(prefix = "PLACEFINDER")]
pub(crate) struct RecreateDbArgs {
    /// Path to the SQLite database (default `places.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl RecreateDbArgs {
    pub(crate) fn into_config(self) -> Result<RecreateDbConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(RecreateDbConfig::from(merged))
    }
}

/// Resolved `recreate-db` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecreateDbConfig {
    pub(crate) database: Utf8PathBuf,
}

impl From<RecreateDbArgs> for RecreateDbConfig {
    fn from(args: RecreateDbArgs) -> Self {
        Self {
            database: database_or_default(args.database),
        }
    }
}

pub(crate) fn run_recreate_db(
    config: &RecreateDbConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let mut store = open_or_create_store(&config.database)?;
    store.recreate().map_err(|source| CliError::Store {
        path: config.database.clone(),
        source,
    })?;
    writeln!(writer, "recreated places table in {}", config.database).map_err(CliError::WriteOutput)
}

/// CLI arguments for the `seed-db` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "seed-db",
    about = "Load every provider layer into the database",
    long_about = "Fetch each location layer from the map-data provider, \
                  retrying failed requests, and insert the results in one \
                  transaction. Records without coordinates are skipped. \
                  Nothing is written when any layer fails."
)]
#[ortho_config(prefix = "PLACEFINDER")]
pub(crate) struct SeedDbArgs {
    /// Path to the SQLite database (default `places.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Provider endpoint receiving the `layer` query parameter.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Per-attempt timeout in seconds (default 5).
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Attempts per layer before giving up (default 3).
    #[arg(long = ARG_MAX_ATTEMPTS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_attempts: Option<u32>,
}

impl SeedDbArgs {
    pub(crate) fn into_config(self) -> Result<SeedDbConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(SeedDbConfig::from(merged))
    }
}

/// Resolved `seed-db` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SeedDbConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) source: HttpLocationSourceConfig,
    pub(crate) max_attempts: u32,
}

impl From<SeedDbArgs> for SeedDbConfig {
    fn from(args: SeedDbArgs) -> Self {
        let base_url = args
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let timeout = Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        Self {
            database: database_or_default(args.database),
            source: HttpLocationSourceConfig::new(base_url).with_timeout(timeout),
            max_attempts: args.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

/// Builds the location source for a `seed-db` invocation.
pub(crate) trait LocationSourceBuilder {
    fn build(&self, config: &SeedDbConfig) -> Result<Box<dyn LocationSource>, CliError>;
}

pub(crate) struct HttpLocationSourceBuilder;

impl LocationSourceBuilder for HttpLocationSourceBuilder {
    fn build(&self, config: &SeedDbConfig) -> Result<Box<dyn LocationSource>, CliError> {
        let source = HttpLocationSource::with_config(config.source.clone()).map_err(|source| {
            CliError::BuildLocationSource {
                base_url: config.source.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(source))
    }
}

pub(crate) fn run_seed_db(
    config: &SeedDbConfig,
    sources: &dyn LocationSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let source = sources.build(config)?;
    let fetcher = LocationFetcher::new(&*source).with_max_attempts(config.max_attempts);
    let mut store = open_or_create_store(&config.database)?;
    let report = seed_from_source(&mut store, &fetcher)?;
    write_seed_report(writer, config, &report).map_err(CliError::WriteOutput)
}

fn write_seed_report(
    writer: &mut dyn Write,
    config: &SeedDbConfig,
    report: &SeedReport,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "seeded {} place(s) into {} ({} skipped)",
        report.inserted, config.database, report.skipped
    )?;
    for category in Category::ALL {
        writeln!(writer, "  {category}: {}", report.inserted_in(category))?;
    }
    Ok(())
}
