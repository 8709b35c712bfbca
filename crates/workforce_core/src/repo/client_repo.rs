//! Client persistence on top of the location-owner indirection.
//!
//! # Responsibility
//! - Create a client, its owner anchor and its locations as one unit.
//! - Assemble clients with their location sets on every read path.
//! - Rank a business's clients by time worked for them.
//!
//! # Invariants
//! - Every client row references an owner created in the same transaction.
//! - A client without locations reads back with an empty list.

use super::error::{map_read_error, map_store_error, StoreResult};
use super::location_repo::{attach_locations, create_location_owner, get_locations_for_owner};
use super::query_runner::QueryRunner;
use crate::db::ConnectionProvider;
use crate::model::client::{Client, ClientId};
use crate::model::location::LocationOwnerId;
use crate::model::report::{worked_millis_from_total, RankRange, Ranked, TimeWindow};
use rusqlite::{params, Connection, OptionalExtension};

struct ClientRow {
    client_id: ClientId,
    client_name: String,
    business_tag: String,
    location_owner_id: LocationOwnerId,
}

impl ClientRow {
    fn into_client(self, conn: &Connection) -> StoreResult<Client> {
        let locations = get_locations_for_owner(conn, self.location_owner_id)?;
        Ok(Client {
            client_id: Some(self.client_id),
            client_name: self.client_name,
            business_tag: self.business_tag,
            locations,
        })
    }
}

const CLIENT_SELECT_SQL: &str = "SELECT clientId, clientName, businessTag, locationOwnerId
FROM Client";

fn parse_client_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClientRow> {
    Ok(ClientRow {
        client_id: row.get("clientId")?,
        client_name: row.get("clientName")?,
        business_tag: row.get("businessTag")?,
        location_owner_id: row.get("locationOwnerId")?,
    })
}

fn insert_client(
    conn: &Connection,
    client: &Client,
    owner_id: LocationOwnerId,
) -> StoreResult<ClientId> {
    conn.prepare_cached(
        "INSERT INTO Client (clientName, businessTag, locationOwnerId) VALUES (?1, ?2, ?3);",
    )
    .and_then(|mut stmt| stmt.insert(params![client.client_name, client.business_tag, owner_id]))
    .map_err(|err| map_store_error(err, format!("{}/{}", client.business_tag, client.client_name)))
}

fn select_client_row(conn: &Connection, client_id: ClientId) -> StoreResult<Option<ClientRow>> {
    conn.prepare_cached(&format!("{CLIENT_SELECT_SQL} WHERE clientId = ?1;"))
        .and_then(|mut stmt| stmt.query_row([client_id], parse_client_row).optional())
        .map_err(map_read_error)
}

fn select_client_location_owner_id(
    conn: &Connection,
    client_id: ClientId,
) -> StoreResult<Option<LocationOwnerId>> {
    conn.prepare_cached("SELECT locationOwnerId FROM Client WHERE clientId = ?1;")
        .and_then(|mut stmt| stmt.query_row([client_id], |row| row.get(0)).optional())
        .map_err(map_read_error)
}

fn select_client_rows(conn: &Connection, business_tag: &str) -> StoreResult<Vec<ClientRow>> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "{CLIENT_SELECT_SQL} WHERE businessTag = ?1 ORDER BY clientName ASC, clientId ASC;"
        ))
        .map_err(map_read_error)?;
    let rows = stmt
        .query_map([business_tag], parse_client_row)
        .map_err(map_read_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_read_error)
}

fn select_ranked_client_rows(
    conn: &Connection,
    business_tag: &str,
    ranks: RankRange,
    window: TimeWindow,
) -> StoreResult<Vec<(ClientRow, i64)>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT Client.clientId, Client.clientName, Client.businessTag, Client.locationOwnerId,
                    TOTAL(WorkLog.endTime - WorkLog.startTime) AS workedMillis
             FROM Client
             LEFT JOIN WorkLog
                ON Client.clientId = WorkLog.clientId
               AND Client.businessTag = WorkLog.businessTag
               AND WorkLog.startTime >= ?1
               AND WorkLog.endTime <= ?2
             WHERE Client.businessTag = ?3
             GROUP BY Client.clientId
             ORDER BY workedMillis DESC, Client.clientId ASC
             LIMIT ?4 OFFSET ?5;",
        )
        .map_err(map_read_error)?;
    let rows = stmt
        .query_map(
            params![
                window.start(),
                window.end(),
                business_tag,
                ranks.limit(),
                ranks.offset()
            ],
            |row| {
                let worked_millis = worked_millis_from_total(row.get("workedMillis")?);
                Ok((parse_client_row(row)?, worked_millis))
            },
        )
        .map_err(map_read_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_read_error)
}

/// Query module for client operations.
pub struct ClientQueries {
    runner: QueryRunner,
}

impl ClientQueries {
    pub fn new(provider: &dyn ConnectionProvider) -> StoreResult<Self> {
        Ok(Self {
            runner: QueryRunner::acquire(provider, "client")?,
        })
    }

    /// Creates the owner anchor, the client row and its locations.
    ///
    /// Any failure rolls back the owner, the client and every location
    /// inserted so far. `client.client_id` is ignored.
    pub fn create_client(mut self, client: &Client) -> StoreResult<ClientId> {
        if let Err(err) = client.validate() {
            return self.runner.finish(Err(err.into()));
        }

        let result = self.runner.in_transaction(|conn| {
            let owner_id = create_location_owner(conn)?;
            let client_id = insert_client(conn, client, owner_id)?;
            attach_locations(conn, owner_id, &client.locations)?;
            Ok(client_id)
        });
        self.runner.finish(result)
    }

    /// Returns `None` without further lookups when the id is unknown.
    pub fn get_client(self, client_id: ClientId) -> StoreResult<Option<Client>> {
        let result = self.runner.read(|conn| match select_client_row(conn, client_id)? {
            Some(row) => row.into_client(conn).map(Some),
            None => Ok(None),
        });
        self.runner.finish(result)
    }

    pub fn get_client_location_owner_id(
        self,
        client_id: ClientId,
    ) -> StoreResult<Option<LocationOwnerId>> {
        let result = self
            .runner
            .read(|conn| select_client_location_owner_id(conn, client_id));
        self.runner.finish(result)
    }

    /// All clients of a business ordered by name, each with its locations.
    pub fn get_all_clients(self, business_tag: &str) -> StoreResult<Vec<Client>> {
        let result = self.runner.read(|conn| {
            select_client_rows(conn, business_tag)?
                .into_iter()
                .map(|row| row.into_client(conn))
                .collect::<StoreResult<Vec<_>>>()
        });
        self.runner.finish(result)
    }

    /// Clients ranked by time worked for them inside `window`, sliced to
    /// `ranks`.
    pub fn get_all_clients_by_most_worked_range(
        self,
        business_tag: &str,
        ranks: RankRange,
        window: TimeWindow,
    ) -> StoreResult<Vec<Ranked<Client>>> {
        let result = self.runner.read(|conn| {
            select_ranked_client_rows(conn, business_tag, ranks, window)?
                .into_iter()
                .map(|(row, worked_millis)| -> StoreResult<Ranked<Client>> {
                    Ok(Ranked {
                        item: row.into_client(conn)?,
                        worked_millis,
                    })
                })
                .collect::<StoreResult<Vec<_>>>()
        });
        self.runner.finish(result)
    }
}
