//! End-to-end command tests against temporary SQLite databases.

use super::helpers::{StubSourceBuilder, Workspace, json_output, run_argv};
use super::*;
use placefinder_core::test_support::probe_rows;
use placefinder_core::{CatalogueError, Category, PlaceFilter, PlaceStore};
use placefinder_data::test_support::raw_location;
use placefinder_data::{SeedError, TransportError};
use rstest::rstest;

fn names(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .expect("JSON array")
        .iter()
        .map(|place| place["name"].as_str().expect("name").to_owned())
        .collect()
}

#[rstest]
fn recreate_db_creates_missing_parent_directories() {
    let workspace = Workspace::new();
    let nested = workspace.database().with_file_name("nested/deeper/places.db");
    let (outcome, stdout) = run_argv(
        &["placefinder", "recreate-db", "--database", nested.as_str()],
        &StubSourceBuilder::default(),
    );
    outcome.expect("recreate succeeds");
    assert!(nested.is_file());
    assert_eq!(stdout, format!("recreated places table in {nested}\n"));
}

#[rstest]
fn recreate_db_discards_existing_places() {
    let workspace = Workspace::seeded();
    let (outcome, _) = run_argv(
        &["placefinder", "recreate-db", "--database", workspace.database().as_str()],
        &StubSourceBuilder::default(),
    );
    outcome.expect("recreate succeeds");
    let store = workspace.open();
    let places = store.list(&PlaceFilter::default()).expect("list places");
    assert!(places.is_empty());
}

#[rstest]
fn list_refuses_missing_database() {
    let workspace = Workspace::new();
    let (outcome, stdout) = run_argv(
        &["placefinder", "list", "--database", workspace.database().as_str()],
        &StubSourceBuilder::default(),
    );
    match outcome.expect_err("missing database") {
        CliError::MissingDatabase { path } => assert_eq!(path, workspace.database()),
        other => panic!("expected MissingDatabase, found {other:?}"),
    }
    assert!(stdout.is_empty());
    assert!(!workspace.database().exists());
}

#[rstest]
fn list_rejects_directory_database() {
    let workspace = Workspace::new();
    let dir = workspace.database().parent().expect("database parent");
    let (outcome, _) = run_argv(
        &["placefinder", "list", "--database", dir.as_str()],
        &StubSourceBuilder::default(),
    );
    match outcome.expect_err("directory database") {
        CliError::DatabaseNotFile { .. } => {}
        other => panic!("expected DatabaseNotFile, found {other:?}"),
    }
}

#[rstest]
#[case(&[], &["Clocktower rack", "Statler rack", "Olin fountain", "Uris fountain", "Ho Plaza phone"])]
#[case(&["--category", "Water"], &["Olin fountain", "Uris fountain"])]
#[case(&["--name-contains", "rack"], &["Clocktower rack", "Statler rack"])]
#[case(&["--category", "Bikes", "--name-contains", "Statler"], &["Statler rack"])]
#[case(&["--name-contains", "Rack"], &[])]
fn list_applies_filters(#[case] flags: &[&str], #[case] expected: &[&str]) {
    let workspace = Workspace::seeded();
    let mut argv = vec!["placefinder", "list", "--database", workspace.database().as_str()];
    argv.extend_from_slice(flags);
    let (outcome, stdout) = run_argv(&argv, &StubSourceBuilder::default());
    outcome.expect("list succeeds");
    assert_eq!(names(&json_output(&stdout)), expected);
}

#[rstest]
fn show_prints_place_json() {
    let workspace = Workspace::seeded();
    let (outcome, stdout) = run_argv(
        &["placefinder", "show", "1", "--database", workspace.database().as_str()],
        &StubSourceBuilder::default(),
    );
    outcome.expect("show succeeds");
    let place = json_output(&stdout);
    assert_eq!(place["id"], 1);
    assert_eq!(place["name"], "Clocktower rack");
    assert_eq!(place["category"], "Bikes");
    assert!(place["position"].as_str().expect("wkt").starts_with("POINT("));
}

#[rstest]
fn show_unknown_id_is_not_found() {
    let workspace = Workspace::seeded();
    let (outcome, _) = run_argv(
        &["placefinder", "show", "99", "--database", workspace.database().as_str()],
        &StubSourceBuilder::default(),
    );
    match outcome.expect_err("unknown id") {
        CliError::Catalogue(CatalogueError::NotFound { id }) => assert_eq!(id, 99),
        other => panic!("expected NotFound, found {other:?}"),
    }
}

#[rstest]
fn add_rejects_duplicate_names() {
    let workspace = Workspace::seeded();
    let (outcome, _) = run_argv(
        &[
            "placefinder",
            "add",
            "--database",
            workspace.database().as_str(),
            "--latitude",
            "42.45",
            "--longitude",
            "-76.48",
            "--name",
            "Olin fountain",
            "--category",
            "Water",
        ],
        &StubSourceBuilder::default(),
    );
    match outcome.expect_err("duplicate name") {
        CliError::Catalogue(CatalogueError::DuplicateName { name }) => {
            assert_eq!(name, "Olin fountain");
        }
        other => panic!("expected DuplicateName, found {other:?}"),
    }
}

#[rstest]
fn add_rejects_unknown_category_without_writing() {
    let workspace = Workspace::seeded();
    let (outcome, stdout) = run_argv(
        &[
            "placefinder",
            "add",
            "--database",
            workspace.database().as_str(),
            "--latitude",
            "1",
            "--longitude",
            "1",
            "--name",
            "typo",
            "--category",
            "bikes",
        ],
        &StubSourceBuilder::default(),
    );
    match outcome.expect_err("unknown category") {
        CliError::Catalogue(CatalogueError::UnknownCategory(_)) => {}
        other => panic!("expected UnknownCategory, found {other:?}"),
    }
    assert!(stdout.is_empty());
    let store = workspace.open();
    assert_eq!(store.get_by_name("typo").expect("lookup"), None);
}

#[rstest]
fn nearest_rejects_unknown_category() {
    let workspace = Workspace::seeded();
    let (outcome, stdout) = run_argv(
        &[
            "placefinder",
            "nearest",
            "Bikez",
            "--database",
            workspace.database().as_str(),
        ],
        &StubSourceBuilder::default(),
    );
    match outcome.expect_err("unknown category") {
        CliError::UnknownCategory(_) => {}
        other => panic!("expected UnknownCategory, found {other:?}"),
    }
    assert!(stdout.is_empty());
}

#[rstest]
fn add_then_update_then_remove() {
    let workspace = Workspace::seeded();
    let database = workspace.database().as_str();
    let sources = StubSourceBuilder::default();

    let (outcome, stdout) = run_argv(
        &[
            "placefinder", "add", "--database", database, "--latitude", "42.4478",
            "--longitude", "-76.4843", "--name", "Duffield rack", "--category", "Bikes",
        ],
        &sources,
    );
    outcome.expect("add succeeds");
    let created = json_output(&stdout);
    assert_eq!(created["id"], 6);
    assert_eq!(created["position"], "POINT(-76.4843 42.4478)");

    let (outcome, stdout) = run_argv(
        &[
            "placefinder", "update", "6", "--database", database, "--latitude", "42.4479",
            "--longitude", "-76.4844", "--name", "Duffield rack", "--category", "Bikes",
        ],
        &sources,
    );
    outcome.expect("update may keep its own name");
    let updated = json_output(&stdout);
    assert_eq!(updated["id"], 6);
    assert_eq!(updated["latitude"], 42.4479);

    let (outcome, stdout) = run_argv(
        &["placefinder", "remove", "6", "--database", database],
        &sources,
    );
    outcome.expect("remove succeeds");
    assert_eq!(json_output(&stdout)["name"], "Duffield rack");

    let (outcome, _) = run_argv(
        &["placefinder", "remove", "6", "--database", database],
        &sources,
    );
    match outcome.expect_err("second removal") {
        CliError::Catalogue(CatalogueError::NotFound { id }) => assert_eq!(id, 6),
        other => panic!("expected NotFound, found {other:?}"),
    }
}

#[rstest]
fn update_rejects_another_places_name() {
    let workspace = Workspace::seeded();
    let (outcome, _) = run_argv(
        &[
            "placefinder", "update", "1", "--database", workspace.database().as_str(),
            "--latitude", "42.4441", "--longitude", "-76.5018", "--name", "Statler rack",
            "--category", "Bikes",
        ],
        &StubSourceBuilder::default(),
    );
    match outcome.expect_err("name clash") {
        CliError::Catalogue(CatalogueError::DuplicateName { name }) => {
            assert_eq!(name, "Statler rack");
        }
        other => panic!("expected DuplicateName, found {other:?}"),
    }
}

#[rstest]
fn nearest_orders_by_distance_and_leaves_no_probe() {
    let workspace = Workspace::seeded();
    let (outcome, stdout) = run_argv(
        &[
            "placefinder", "nearest", "Water", "--database", workspace.database().as_str(),
            "--lat", "42.4441", "--lon", "-76.5018", "--m", "5000", "--k", "5",
        ],
        &StubSourceBuilder::default(),
    );
    outcome.expect("nearest succeeds");
    assert_eq!(
        names(&json_output(&stdout)),
        ["Olin fountain", "Uris fountain"]
    );
    assert_eq!(probe_rows(&workspace.open()).expect("count probes"), 0);
}

#[rstest]
fn nearest_negative_limit_returns_one() {
    let workspace = Workspace::seeded();
    let (outcome, stdout) = run_argv(
        &[
            "placefinder", "nearest", "Water", "--database", workspace.database().as_str(),
            "--lat", "42.4441", "--lon", "-76.5018", "--m", "5000", "--k", "-4",
        ],
        &StubSourceBuilder::default(),
    );
    outcome.expect("nearest succeeds");
    assert_eq!(names(&json_output(&stdout)), ["Olin fountain"]);
}

#[rstest]
fn nearest_without_radius_lists_whole_category() {
    let workspace = Workspace::seeded();
    let (outcome, stdout) = run_argv(
        &[
            "placefinder", "nearest", "Bikes", "--database", workspace.database().as_str(),
            "--k", "1",
        ],
        &StubSourceBuilder::default(),
    );
    outcome.expect("nearest succeeds");
    assert_eq!(
        names(&json_output(&stdout)),
        ["Clocktower rack", "Statler rack"]
    );
}

#[rstest]
fn seed_db_loads_scripted_layers() {
    let workspace = Workspace::new();
    let sources = StubSourceBuilder::default()
        .with_layer(
            Category::Bikes,
            vec![
                raw_location(42.4441, -76.5018, "Clocktower rack"),
                raw_location(42.4457, -76.4822, "Statler rack"),
            ],
        )
        .with_layer(Category::Water, vec![raw_location(42.4477, -76.4843, "Olin fountain")]);
    let (outcome, stdout) = run_argv(
        &["placefinder", "seed-db", "--database", workspace.database().as_str()],
        &sources,
    );
    outcome.expect("seed succeeds");
    assert!(stdout.starts_with(&format!(
        "seeded 3 place(s) into {} (0 skipped)\n",
        workspace.database()
    )));
    assert!(stdout.contains("  Bikes: 2\n"));
    assert!(stdout.contains("  Water: 1\n"));
    assert!(stdout.contains("  Blue: 0\n"));

    let store = workspace.open();
    let water = store
        .list(&PlaceFilter::default().with_category("Water"))
        .expect("list water");
    assert_eq!(water.len(), 1);
}

#[rstest]
fn seed_db_reports_failed_layer() {
    let workspace = Workspace::new();
    let sources = StubSourceBuilder::default()
        .with_layer(Category::Bikes, vec![raw_location(42.4441, -76.5018, "rack")])
        .failing(
            Category::Tcat,
            TransportError::Network {
                url: "http://provider/layers?layer=TCAT".to_owned(),
                message: "connection refused".to_owned(),
            },
        );
    let (outcome, stdout) = run_argv(
        &[
            "placefinder", "seed-db", "--database", workspace.database().as_str(),
            "--max-attempts", "2",
        ],
        &sources,
    );
    match outcome.expect_err("seed fails") {
        CliError::Seed(SeedError::Fetch(failure)) => {
            assert_eq!(failure.category, Category::Tcat);
            assert_eq!(failure.attempts, 2);
        }
        other => panic!("expected fetch failure, found {other:?}"),
    }
    assert!(stdout.is_empty());
    let store = workspace.open();
    assert!(store.list(&PlaceFilter::default()).expect("list").is_empty());
}
