//! Test helpers for temporary databases and scripted location sources.

use super::*;
use crate::bootstrap::SeedDbConfig;
use placefinder_core::{Category, PlaceStore, SqlitePlaceStore, test_support::campus_places};
use placefinder_data::test_support::StubLocationSource;
use placefinder_data::{LocationSource, RawLocation, TransportError};
use tempfile::TempDir;

/// Temporary directory holding a database path.
pub(super) struct Workspace {
    _dir: TempDir,
    database: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            _dir: dir,
            database: root.join("places.db"),
        }
    }

    /// Workspace whose database already holds the campus places.
    pub(super) fn seeded() -> Self {
        let workspace = Self::new();
        let mut store =
            SqlitePlaceStore::open(workspace.database.as_std_path()).expect("open store");
        store.create_many(&campus_places()).expect("seed store");
        workspace
    }

    pub(super) fn database(&self) -> &Utf8Path {
        &self.database
    }

    pub(super) fn open(&self) -> SqlitePlaceStore {
        SqlitePlaceStore::open(self.database.as_std_path()).expect("open store")
    }
}

/// Builds a fresh scripted source for every `seed-db` invocation.
#[derive(Debug, Default)]
pub(super) struct StubSourceBuilder {
    layers: Vec<(Category, Vec<RawLocation>)>,
    failing: Option<(Category, TransportError)>,
}

impl StubSourceBuilder {
    pub(super) fn with_layer(mut self, category: Category, records: Vec<RawLocation>) -> Self {
        self.layers.push((category, records));
        self
    }

    pub(super) fn failing(mut self, category: Category, error: TransportError) -> Self {
        self.failing = Some((category, error));
        self
    }
}

impl LocationSourceBuilder for StubSourceBuilder {
    fn build(&self, _config: &SeedDbConfig) -> Result<Box<dyn LocationSource>, CliError> {
        let mut source = StubLocationSource::default();
        for (category, records) in &self.layers {
            source = source.always_return(*category, records.clone());
        }
        if let Some((category, error)) = &self.failing {
            source = source.always_fail(*category, error.clone());
        }
        Ok(Box::new(source))
    }
}

/// Parse `argv` and run it against `sources`, capturing stdout.
pub(super) fn run_argv(
    argv: &[&str],
    sources: &dyn LocationSourceBuilder,
) -> (Result<(), CliError>, String) {
    let mut stdout = Vec::new();
    let outcome = Cli::try_parse_from(argv.iter().copied())
        .map_err(CliError::from)
        .and_then(|cli| run_command(cli.command, sources, &mut stdout));
    let text = String::from_utf8(stdout).expect("stdout utf-8");
    (outcome, text)
}

/// Parse pretty JSON output into a value.
pub(super) fn json_output(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("output should be JSON")
}
