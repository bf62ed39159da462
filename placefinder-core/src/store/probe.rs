//! Transient probe rows for nearest-neighbour queries.
//!
//! The distance query compares every candidate row against a row of the same
//! table, so the query point is written as a temporary place first. A
//! [`ProbeRow`] deletes that row when dropped, which covers early returns,
//! storage errors and panics alike.

use geo::Coord;
use log::{debug, warn};
use rusqlite::{Connection, params};

use crate::place::point_wkt;
use crate::{PROBE_CATEGORY, PROBE_NAME, Place, PlaceId};

/// Guard owning a temporary place row.
#[derive(Debug)]
pub(super) struct ProbeRow<'conn> {
    connection: &'conn Connection,
    id: PlaceId,
}

impl<'conn> ProbeRow<'conn> {
    /// Insert a probe at `origin`.
    ///
    /// Identifiers come from `AUTOINCREMENT`, so a probe id is never reused
    /// and concurrent probes cannot be mistaken for one another.
    pub(super) fn insert(
        connection: &'conn Connection,
        origin: Coord<f64>,
    ) -> rusqlite::Result<Self> {
        connection.execute(
            "INSERT INTO places (name, latitude, longitude, position, category)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                PROBE_NAME,
                origin.y,
                origin.x,
                point_wkt(origin),
                PROBE_CATEGORY
            ],
        )?;
        let id = connection.last_insert_rowid();
        debug!("inserted probe row {id}");
        Ok(Self { connection, id })
    }

    pub(super) const fn id(&self) -> PlaceId {
        self.id
    }
}

impl Drop for ProbeRow<'_> {
    fn drop(&mut self) {
        match self
            .connection
            .execute("DELETE FROM places WHERE id = ?1", [self.id])
        {
            Ok(_) => debug!("removed probe row {}", self.id),
            Err(err) => warn!("failed to remove probe row {}: {err}", self.id),
        }
    }
}

/// Run `query` while a probe row for `origin` exists.
///
/// `query` pushes results into the supplied buffer as it reads them. Errors
/// are logged rather than returned; the caller receives whatever was
/// collected before the failure. The probe is gone by the time this returns.
pub(super) fn run_with_probe<F>(connection: &Connection, origin: Coord<f64>, query: F) -> Vec<Place>
where
    F: FnOnce(&Connection, &ProbeRow<'_>, &mut Vec<Place>) -> rusqlite::Result<()>,
{
    let probe = match ProbeRow::insert(connection, origin) {
        Ok(probe) => probe,
        Err(err) => {
            warn!("nearest query degraded: failed to insert probe row: {err}");
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    if let Err(err) = query(connection, &probe, &mut found) {
        warn!(
            "nearest query degraded after {} result(s): {err}",
            found.len()
        );
    }
    drop(probe);
    found
}
