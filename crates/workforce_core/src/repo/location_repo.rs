//! Location-owner indirection shared by clients and work logs.
//!
//! # Responsibility
//! - Create anchor `LocationOwner` rows and the locations linked to them.
//! - Read back the location set of one owner.
//!
//! # Invariants
//! - An owner row never records who references it; ownership lives in the
//!   referencing aggregate (`Client.locationOwnerId`, `WorkLog.locationOwnerId`).
//! - The free functions run on the caller's connection and join the caller's
//!   transaction; they never commit.
//! - An owner with no locations reads back as an empty list.

use super::error::{map_read_error, map_store_error, StoreResult};
use super::query_runner::QueryRunner;
use crate::db::ConnectionProvider;
use crate::model::location::{Location, LocationId, LocationOwnerId};
use rusqlite::{params, Connection};

/// Inserts an anchor row and returns its generated id.
pub fn create_location_owner(conn: &Connection) -> StoreResult<LocationOwnerId> {
    conn.prepare_cached("INSERT INTO LocationOwner DEFAULT VALUES;")
        .and_then(|mut stmt| stmt.insert([]))
        .map_err(|err| map_store_error(err, "LocationOwner"))
}

/// Inserts `locations` in order and returns every generated id in that order.
pub fn create_locations(conn: &Connection, locations: &[Location]) -> StoreResult<Vec<LocationId>> {
    let mut stmt = conn
        .prepare_cached("INSERT INTO Location (postCode, description) VALUES (?1, ?2);")
        .map_err(|err| map_store_error(err, "Location"))?;

    let mut ids = Vec::with_capacity(locations.len());
    for location in locations {
        let id = stmt
            .insert(params![location.post_code, location.description])
            .map_err(|err| map_store_error(err, location.post_code.as_str()))?;
        ids.push(id);
    }

    Ok(ids)
}

/// Links every location id to `owner_id`.
pub fn link_owner_to_locations(
    conn: &Connection,
    owner_id: LocationOwnerId,
    location_ids: &[LocationId],
) -> StoreResult<()> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO LocationOwnerToLocation (locationOwnerId, locationId) VALUES (?1, ?2);",
        )
        .map_err(|err| map_store_error(err, owner_id.to_string()))?;

    for location_id in location_ids {
        stmt.execute(params![owner_id, location_id])
            .map_err(|err| map_store_error(err, format!("{owner_id}/{location_id}")))?;
    }

    Ok(())
}

/// Creates `locations` and links them to `owner_id` in one step.
pub fn attach_locations(
    conn: &Connection,
    owner_id: LocationOwnerId,
    locations: &[Location],
) -> StoreResult<Vec<LocationId>> {
    if locations.is_empty() {
        return Ok(Vec::new());
    }

    let location_ids = create_locations(conn, locations)?;
    link_owner_to_locations(conn, owner_id, &location_ids)?;
    Ok(location_ids)
}

/// Returns the locations linked to `owner_id` in insertion order.
pub fn get_locations_for_owner(
    conn: &Connection,
    owner_id: LocationOwnerId,
) -> StoreResult<Vec<Location>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT Location.postCode, Location.description
             FROM Location
             LEFT JOIN LocationOwnerToLocation
                ON Location.locationId = LocationOwnerToLocation.locationId
             WHERE LocationOwnerToLocation.locationOwnerId = ?1
             ORDER BY Location.locationId ASC;",
        )
        .map_err(map_read_error)?;

    let rows = stmt
        .query_map([owner_id], |row| {
            Ok(Location {
                post_code: row.get("postCode")?,
                description: row.get("description")?,
            })
        })
        .map_err(map_read_error)?;

    rows.collect::<Result<Vec<_>, _>>().map_err(map_read_error)
}

/// Same as [`get_locations_for_owner`] for an optional owner reference.
pub fn get_locations_for_optional_owner(
    conn: &Connection,
    owner_id: Option<LocationOwnerId>,
) -> StoreResult<Vec<Location>> {
    match owner_id {
        Some(owner_id) => get_locations_for_owner(conn, owner_id),
        None => Ok(Vec::new()),
    }
}

/// Query module exposing the subsystem as standalone operations.
pub struct LocationQueries {
    runner: QueryRunner,
}

impl LocationQueries {
    pub fn new(provider: &dyn ConnectionProvider) -> StoreResult<Self> {
        Ok(Self {
            runner: QueryRunner::acquire(provider, "location")?,
        })
    }

    /// Creates a standalone owner carrying `locations`.
    pub fn create_owner_with_locations(
        mut self,
        locations: &[Location],
    ) -> StoreResult<LocationOwnerId> {
        let result = self.runner.in_transaction(|conn| {
            let owner_id = create_location_owner(conn)?;
            attach_locations(conn, owner_id, locations)?;
            Ok(owner_id)
        });
        self.runner.finish(result)
    }

    pub fn get_locations_for_owner(self, owner_id: LocationOwnerId) -> StoreResult<Vec<Location>> {
        let result = self
            .runner
            .read(|conn| get_locations_for_owner(conn, owner_id));
        self.runner.finish(result)
    }
}
