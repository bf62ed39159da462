//! Catalogue commands: `list`, `show`, `add`, `update`, `remove`, `nearest`.
//!
//! Each command prints its result as pretty JSON.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use placefinder_core::catalogue::{
    add_place, edit_place, find_place, list_places, nearby_places, remove_place,
};
use placefinder_core::{Category, NearbyParams, NewPlace, PlaceFilter, PlaceId};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CATEGORY, ARG_DATABASE, ARG_ID, ARG_LAT, ARG_LATITUDE, ARG_LIMIT, ARG_LON, ARG_LONGITUDE,
    ARG_NAME, ARG_NAME_CONTAINS, ARG_RADIUS, CliError, ENV_NEAREST_CATEGORY, ENV_REMOVE_ID,
    ENV_SHOW_ID, ENV_UPDATE_ID, database_or_default, open_existing_store, write_json,
};

const ENV_ADD_LATITUDE: &str = "PLACEFINDER_CMDS_ADD_LATITUDE";
const ENV_ADD_LONGITUDE: &str = "PLACEFINDER_CMDS_ADD_LONGITUDE";
const ENV_ADD_NAME: &str = "PLACEFINDER_CMDS_ADD_NAME";
const ENV_ADD_CATEGORY: &str = "PLACEFINDER_CMDS_ADD_CATEGORY";
const ENV_UPDATE_LATITUDE: &str = "PLACEFINDER_CMDS_UPDATE_LATITUDE";
const ENV_UPDATE_LONGITUDE: &str = "PLACEFINDER_CMDS_UPDATE_LONGITUDE";
const ENV_UPDATE_NAME: &str = "PLACEFINDER_CMDS_UPDATE_NAME";
const ENV_UPDATE_CATEGORY: &str = "PLACEFINDER_CMDS_UPDATE_CATEGORY";

fn required<T>(value: Option<T>, field: &'static str, env: &'static str) -> Result<T, CliError> {
    value.ok_or(CliError::MissingArgument { field, env })
}

/// Environment variables naming each place field of one command.
#[derive(Debug, Clone, Copy)]
struct FieldEnv {
    latitude: &'static str,
    longitude: &'static str,
    name: &'static str,
    category: &'static str,
}

const ADD_ENV: FieldEnv = FieldEnv {
    latitude: ENV_ADD_LATITUDE,
    longitude: ENV_ADD_LONGITUDE,
    name: ENV_ADD_NAME,
    category: ENV_ADD_CATEGORY,
};

const UPDATE_ENV: FieldEnv = FieldEnv {
    latitude: ENV_UPDATE_LATITUDE,
    longitude: ENV_UPDATE_LONGITUDE,
    name: ENV_UPDATE_NAME,
    category: ENV_UPDATE_CATEGORY,
};

fn new_place(
    latitude: Option<f64>,
    longitude: Option<f64>,
    name: Option<String>,
    category: Option<String>,
    env: FieldEnv,
) -> Result<NewPlace, CliError> {
    Ok(NewPlace::new(
        required(latitude, ARG_LATITUDE, env.latitude)?,
        required(longitude, ARG_LONGITUDE, env.longitude)?,
        required(name, ARG_NAME, env.name)?,
        required(category, ARG_CATEGORY, env.category)?,
    ))
}

/// CLI arguments for the `list` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "list", about = "List places, optionally filtered")]
#[ortho_config(prefix = "PLACEFINDER")]
pub(crate) struct ListArgs {
    /// Path to the SQLite database (default `places.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Only list places with this exact category.
    #[arg(long = ARG_CATEGORY, value_name = "category")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Only list places whose name contains this text (case-sensitive).
    #[arg(long = ARG_NAME_CONTAINS, value_name = "text")]
    #[serde(default)]
    pub(crate) name_contains: Option<String>,
}

impl ListArgs {
    pub(crate) fn into_config(self) -> Result<ListConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(ListConfig::from(merged))
    }
}

/// Resolved `list` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) filter: PlaceFilter,
}

impl From<ListArgs> for ListConfig {
    fn from(args: ListArgs) -> Self {
        Self {
            database: database_or_default(args.database),
            filter: PlaceFilter {
                category: args.category,
                name_contains: args.name_contains,
            },
        }
    }
}

pub(crate) fn run_list(config: &ListConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let store = open_existing_store(&config.database)?;
    let places = list_places(&store, &config.filter)?;
    write_json(writer, &places)
}

/// CLI arguments for the `show` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "show", about = "Show one place")]
#[ortho_config(prefix = "PLACEFINDER")]
pub(crate) struct ShowArgs {
    /// Identifier of the place.
    #[arg(value_name = "id")]
    #[serde(default)]
    pub(crate) id: Option<PlaceId>,
    /// Path to the SQLite database (default `places.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl ShowArgs {
    pub(crate) fn into_config(self) -> Result<PlaceRef, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlaceRef::try_from(merged)
    }
}

/// A database path plus the identifier of one place in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlaceRef {
    pub(crate) database: Utf8PathBuf,
    pub(crate) id: PlaceId,
}

impl TryFrom<ShowArgs> for PlaceRef {
    type Error = CliError;

    fn try_from(args: ShowArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            id: required(args.id, ARG_ID, ENV_SHOW_ID)?,
            database: database_or_default(args.database),
        })
    }
}

pub(crate) fn run_show(config: &PlaceRef, writer: &mut dyn Write) -> Result<(), CliError> {
    let store = open_existing_store(&config.database)?;
    let place = find_place(&store, config.id)?;
    write_json(writer, &place)
}

/// CLI arguments for the `add` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "add",
    about = "Create a place",
    long_about = "Create a place. The name must not already be used by \
                  another place."
)]
#[ortho_config(prefix = "PLACEFINDER")]
pub(crate) struct AddArgs {
    /// Path to the SQLite database (default `places.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Latitude in degrees.
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude in degrees.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Display name; may be empty.
    #[arg(long = ARG_NAME, value_name = "name")]
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Category tag.
    #[arg(long = ARG_CATEGORY, value_name = "category")]
    #[serde(default)]
    pub(crate) category: Option<String>,
}

impl AddArgs {
    pub(crate) fn into_config(self) -> Result<AddConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AddConfig::try_from(merged)
    }
}

/// Resolved `add` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AddConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) fields: NewPlace,
}

impl TryFrom<AddArgs> for AddConfig {
    type Error = CliError;

    fn try_from(args: AddArgs) -> Result<Self, Self::Error> {
        let fields = new_place(
            args.latitude,
            args.longitude,
            args.name,
            args.category,
            ADD_ENV,
        )?;
        Ok(Self {
            database: database_or_default(args.database),
            fields,
        })
    }
}

pub(crate) fn run_add(config: AddConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let mut store = open_existing_store(&config.database)?;
    let place = add_place(&mut store, config.fields)?;
    write_json(writer, &place)
}

/// CLI arguments for the `update` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "update",
    about = "Overwrite every field of a place",
    long_about = "Overwrite every field of a place. All fields are required. \
                  The place may keep its own name but not take one used by \
                  another place."
)]
#[ortho_config(prefix = "PLACEFINDER")]
pub(crate) struct UpdateArgs {
    /// Identifier of the place.
    #[arg(value_name = "id")]
    #[serde(default)]
    pub(crate) id: Option<PlaceId>,
    /// Path to the SQLite database (default `places.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Latitude in degrees.
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude in degrees.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Display name; may be empty.
    #[arg(long = ARG_NAME, value_name = "name")]
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Category tag.
    #[arg(long = ARG_CATEGORY, value_name = "category")]
    #[serde(default)]
    pub(crate) category: Option<String>,
}

impl UpdateArgs {
    pub(crate) fn into_config(self) -> Result<UpdateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        UpdateConfig::try_from(merged)
    }
}

/// Resolved `update` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UpdateConfig {
    pub(crate) target: PlaceRef,
    pub(crate) fields: NewPlace,
}

impl TryFrom<UpdateArgs> for UpdateConfig {
    type Error = CliError;

    fn try_from(args: UpdateArgs) -> Result<Self, Self::Error> {
        let id = required(args.id, ARG_ID, ENV_UPDATE_ID)?;
        let fields = new_place(
            args.latitude,
            args.longitude,
            args.name,
            args.category,
            UPDATE_ENV,
        )?;
        Ok(Self {
            target: PlaceRef {
                database: database_or_default(args.database),
                id,
            },
            fields,
        })
    }
}

pub(crate) fn run_update(config: UpdateConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let mut store = open_existing_store(&config.target.database)?;
    let place = edit_place(&mut store, config.target.id, config.fields)?;
    write_json(writer, &place)
}

/// CLI arguments for the `remove` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "remove", about = "Delete a place")]
#[ortho_config(prefix = "PLACEFINDER")]
pub(crate) struct RemoveArgs {
    /// Identifier of the place.
    #[arg(value_name = "id")]
    #[serde(default)]
    pub(crate) id: Option<PlaceId>,
    /// Path to the SQLite database (default `places.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl RemoveArgs {
    pub(crate) fn into_config(self) -> Result<PlaceRef, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(PlaceRef {
            id: required(merged.id, ARG_ID, ENV_REMOVE_ID)?,
            database: database_or_default(merged.database),
        })
    }
}

pub(crate) fn run_remove(config: &PlaceRef, writer: &mut dyn Write) -> Result<(), CliError> {
    let mut store = open_existing_store(&config.database)?;
    let place = remove_place(&mut store, config.id)?;
    write_json(writer, &place)
}

/// CLI arguments for the `nearest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "nearest",
    about = "Find places of a category near a point",
    long_about = "Find places of a category strictly closer than --m metres \
                  to (--lat, --lon), nearest first, at most --k of them. A \
                  negative --k returns one place. Without a positive --m \
                  every place of the category is listed and --k is ignored."
)]
#[ortho_config(prefix = "PLACEFINDER")]
pub(crate) struct NearestArgs {
    /// Location category to search, for example `Bikes`.
    #[arg(value_name = "category")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Path to the SQLite database (default `places.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Query latitude in degrees (default 0).
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Query longitude in degrees (default 0).
    #[arg(long = ARG_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Search radius in metres (default -1, no radius).
    #[arg(long = ARG_RADIUS, value_name = "metres", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) m: Option<f64>,
    /// Maximum number of results (default -1, meaning one).
    #[arg(long = ARG_LIMIT, value_name = "count", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) k: Option<i64>,
}

impl NearestArgs {
    pub(crate) fn into_config(self) -> Result<NearestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NearestConfig::try_from(merged)
    }
}

/// Resolved `nearest` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NearestConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) category: Category,
    pub(crate) params: NearbyParams,
}

impl TryFrom<NearestArgs> for NearestConfig {
    type Error = CliError;

    fn try_from(args: NearestArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            category: required(args.category, ARG_CATEGORY, ENV_NEAREST_CATEGORY)?.parse()?,
            database: database_or_default(args.database),
            params: NearbyParams {
                lat: args.lat,
                lon: args.lon,
                m: args.m,
                k: args.k,
            },
        })
    }
}

pub(crate) fn run_nearest(config: NearestConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let mut store = open_existing_store(&config.database)?;
    let places = nearby_places(&mut store, config.category, config.params);
    write_json(writer, &places)
}
