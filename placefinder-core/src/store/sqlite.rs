//! SQLite-backed place store.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use geo::Coord;
use log::{debug, warn};
use rusqlite::{
    Connection, OptionalExtension, Row, Transaction, functions::FunctionFlags, params,
    params_from_iter,
};
use thiserror::Error;

use crate::place::point_wkt;
use crate::{NearestQuery, NewPlace, Place, PlaceId, great_circle_distance};

use super::probe::{ProbeRow, run_with_probe};
use super::{PlaceFilter, PlaceStore};

/// Name of the SQL function computing spherical distances in metres.
const DISTANCE_FUNCTION: &str = "distance_sphere";

const CREATE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS places (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    position TEXT NOT NULL,
    category TEXT NOT NULL
)";

const SELECT_COLUMNS: &str = "SELECT id, name, latitude, longitude, category FROM places";

const INSERT_PLACE: &str = "INSERT INTO places (name, latitude, longitude, position, category)
     VALUES (?1, ?2, ?3, ?4, ?5)";

// Every candidate is joined against the probe row so both sides of the
// distance comparison come from `places`.
const NEAREST_WITHIN_RADIUS: &str = "SELECT p.id, p.name, p.latitude, p.longitude, p.category
     FROM places AS p
     JOIN places AS probe ON probe.id = ?1
     WHERE p.category = ?2
       AND p.id <> probe.id
       AND distance_sphere(probe.latitude, probe.longitude, p.latitude, p.longitude) < ?3
     ORDER BY distance_sphere(probe.latitude, probe.longitude, p.latitude, p.longitude), p.id
     LIMIT ?4";

/// Error raised when opening or querying the SQLite place store.
#[derive(Debug, Error)]
pub enum SqlitePlaceStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Registering the spherical distance SQL function failed.
    #[error("failed to register the {DISTANCE_FUNCTION} SQL function: {source}")]
    RegisterFunction {
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the `places` table failed.
    #[error("failed to create places table: {source}")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A write targeted a place that is no longer stored.
    #[error("place {id} does not exist")]
    MissingPlace {
        /// Identifier of the missing place.
        id: PlaceId,
    },
    /// Generic SQLite error when reading or writing rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Place store backed by a single SQLite `places` table.
///
/// # Examples
/// ```
/// use placefinder_core::{NearestQuery, NewPlace, PlaceStore, SqlitePlaceStore};
///
/// # fn main() -> Result<(), placefinder_core::SqlitePlaceStoreError> {
/// let mut store = SqlitePlaceStore::open_in_memory()?;
/// store.create(NewPlace::new(42.4440, -76.5019, "Clocktower rack", "Bikes"))?;
///
/// let query = NearestQuery::new(42.4441, -76.5020, "Bikes")
///     .within_meters(100.0)
///     .with_limit(3);
/// assert_eq!(store.nearest(&query).len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct SqlitePlaceStore {
    connection: Connection,
}

impl fmt::Debug for SqlitePlaceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlitePlaceStore")
            .field("path", &self.connection.path())
            .finish_non_exhaustive()
    }
}

impl SqlitePlaceStore {
    /// Open (or create) a store at `path`, creating the schema if missing.
    pub fn open<P>(path: P) -> Result<Self, SqlitePlaceStoreError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqlitePlaceStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_connection(connection)
    }

    /// Open a private in-memory store.
    pub fn open_in_memory() -> Result<Self, SqlitePlaceStoreError> {
        let connection = Connection::open_in_memory().map_err(|source| {
            SqlitePlaceStoreError::OpenDatabase {
                path: PathBuf::from(":memory:"),
                source,
            }
        })?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, SqlitePlaceStoreError> {
        register_distance_function(&connection)?;
        connection
            .execute(CREATE_SCHEMA, [])
            .map_err(|source| SqlitePlaceStoreError::CreateSchema { source })?;
        Ok(Self { connection })
    }

    /// Drop every stored place and recreate an empty `places` table.
    ///
    /// Identifier assignment restarts as the table is recreated.
    pub fn recreate(&mut self) -> Result<(), SqlitePlaceStoreError> {
        let transaction = self.connection.transaction()?;
        transaction.execute("DROP TABLE IF EXISTS places", [])?;
        transaction
            .execute(CREATE_SCHEMA, [])
            .map_err(|source| SqlitePlaceStoreError::CreateSchema { source })?;
        transaction.commit()?;
        Ok(())
    }

    fn places_within_radius(
        connection: &Connection,
        probe: &ProbeRow<'_>,
        query: &NearestQuery,
        found: &mut Vec<Place>,
    ) -> rusqlite::Result<()> {
        let mut statement = connection.prepare_cached(NEAREST_WITHIN_RADIUS)?;
        let mut rows = statement.query(params![
            probe.id(),
            query.category,
            query.max_distance_m,
            query.effective_limit()
        ])?;
        while let Some(row) = rows.next()? {
            found.push(place_from_row(row)?);
        }
        Ok(())
    }
}

impl PlaceStore for SqlitePlaceStore {
    type Error = SqlitePlaceStoreError;

    fn list(&self, filter: &PlaceFilter) -> Result<Vec<Place>, Self::Error> {
        let mut clauses = Vec::new();
        let mut values: Vec<&str> = Vec::new();
        if let Some(category) = filter.category.as_deref() {
            clauses.push("category = ?");
            values.push(category);
        }
        if let Some(fragment) = filter.name_contains.as_deref() {
            // `instr` keeps the match case-sensitive, unlike `LIKE`.
            clauses.push("instr(name, ?) > 0");
            values.push(fragment);
        }

        let mut sql = String::from(SELECT_COLUMNS);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut statement = self.connection.prepare(&sql)?;
        let places = statement
            .query_map(params_from_iter(values), place_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(places)
    }

    fn get_by_id(&self, id: PlaceId) -> Result<Option<Place>, Self::Error> {
        let place = self
            .connection
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id],
                place_from_row,
            )
            .optional()?;
        Ok(place)
    }

    fn get_by_name(&self, name: &str) -> Result<Option<Place>, Self::Error> {
        let place = self
            .connection
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE name = ?1 ORDER BY id LIMIT 1"),
                [name],
                place_from_row,
            )
            .optional()?;
        Ok(place)
    }

    fn create(&mut self, fields: NewPlace) -> Result<Place, Self::Error> {
        let transaction = self.connection.transaction()?;
        let id = insert_place(&transaction, &fields)?;
        transaction.commit()?;
        debug!("created place {id}");
        Ok(Place::from_fields(id, fields))
    }

    fn create_many(&mut self, fields: &[NewPlace]) -> Result<Vec<Place>, Self::Error> {
        let transaction = self.connection.transaction()?;
        let mut created = Vec::with_capacity(fields.len());
        for place in fields {
            let id = insert_place(&transaction, place)?;
            created.push(Place::from_fields(id, place.clone()));
        }
        transaction.commit()?;
        debug!("created {} places", created.len());
        Ok(created)
    }

    fn update(&mut self, place: &Place, fields: NewPlace) -> Result<Place, Self::Error> {
        let id = place.id();
        let transaction = self.connection.transaction()?;
        let changed = transaction.execute(
            "UPDATE places
             SET name = ?1, latitude = ?2, longitude = ?3, position = ?4, category = ?5
             WHERE id = ?6",
            params![
                fields.name,
                fields.latitude,
                fields.longitude,
                point_wkt(fields.location()),
                fields.category,
                id
            ],
        )?;
        if changed == 0 {
            return Err(SqlitePlaceStoreError::MissingPlace { id });
        }
        transaction.commit()?;
        Ok(Place::from_fields(id, fields))
    }

    fn delete(&mut self, place: Place) -> Result<Place, Self::Error> {
        let transaction = self.connection.transaction()?;
        let removed = transaction.execute("DELETE FROM places WHERE id = ?1", [place.id()])?;
        if removed == 0 {
            return Err(SqlitePlaceStoreError::MissingPlace { id: place.id() });
        }
        transaction.commit()?;
        Ok(place)
    }

    fn nearest(&mut self, query: &NearestQuery) -> Vec<Place> {
        if query.is_unbounded() {
            let filter = PlaceFilter::default().with_category(query.category.as_str());
            return self.list(&filter).unwrap_or_else(|err| {
                warn!(
                    "nearest query degraded: failed to list {}: {err}",
                    query.category
                );
                Vec::new()
            });
        }

        debug!(
            "nearest {} within {} m of ({}, {}), limit {}",
            query.category,
            query.max_distance_m,
            query.origin.y,
            query.origin.x,
            query.effective_limit()
        );
        run_with_probe(&self.connection, query.origin, |connection, probe, found| {
            Self::places_within_radius(connection, probe, query, found)
        })
    }
}

fn register_distance_function(connection: &Connection) -> Result<(), SqlitePlaceStoreError> {
    connection
        .create_scalar_function(
            DISTANCE_FUNCTION,
            4,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let from = Coord {
                    x: ctx.get::<f64>(1)?,
                    y: ctx.get::<f64>(0)?,
                };
                let to = Coord {
                    x: ctx.get::<f64>(3)?,
                    y: ctx.get::<f64>(2)?,
                };
                Ok(great_circle_distance(from, to))
            },
        )
        .map_err(|source| SqlitePlaceStoreError::RegisterFunction { source })
}

fn insert_place(transaction: &Transaction<'_>, fields: &NewPlace) -> rusqlite::Result<PlaceId> {
    let mut statement = transaction.prepare_cached(INSERT_PLACE)?;
    statement.execute(params![
        fields.name,
        fields.latitude,
        fields.longitude,
        point_wkt(fields.location()),
        fields.category
    ])?;
    Ok(transaction.last_insert_rowid())
}

fn place_from_row(row: &Row<'_>) -> rusqlite::Result<Place> {
    let id: PlaceId = row.get(0)?;
    let name: String = row.get(1)?;
    let latitude: f64 = row.get(2)?;
    let longitude: f64 = row.get(3)?;
    let category: String = row.get(4)?;
    Ok(Place::from_fields(
        id,
        NewPlace::new(latitude, longitude, name, category),
    ))
}
