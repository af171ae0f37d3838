//! Maintenance [`Record`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        billboard,
        maintenance::{self, Record},
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `maintenance_records` table, in [`from_row()`] order.
const COLUMNS: &str = "\
    id, billboard_id, kind, description, \
    cost, cost_currency, \
    reported_at, resolved_at";

/// Reads a [`Record`] out of the provided [`Row`] having [`COLUMNS`].
fn from_row(row: &Row) -> Record {
    Record {
        id: row.get("id"),
        billboard_id: row.get("billboard_id"),
        kind: row.get("kind"),
        description: row.get("description"),
        cost: super::money_opt(row, "cost", "cost_currency"),
        reported_at: row.get("reported_at"),
        resolved_at: row.get("resolved_at"),
    }
}

impl<C> Database<Select<By<Option<Record>, maintenance::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Record>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Record>, maintenance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: maintenance::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM maintenance_records \
             WHERE id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Select<By<Vec<Record>, billboard::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Record>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Record>, billboard::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let billboard_id: billboard::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM maintenance_records \
             WHERE billboard_id = $1::UUID \
             ORDER BY reported_at DESC, id",
        );
        Ok(self
            .query(&sql, &[&billboard_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Record>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Record>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(record): Insert<Record>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(record)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Record>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(record): Update<Record>,
    ) -> Result<Self::Ok, Self::Err> {
        let Record {
            id,
            billboard_id,
            kind,
            description,
            cost,
            reported_at,
            resolved_at,
        } = record;

        let cost_amount = cost.map(|m| m.amount);
        let cost_currency = cost.map(|m| m.currency);

        const SQL: &str = "\
            INSERT INTO maintenance_records (\
                id, billboard_id, kind, description, \
                cost, cost_currency, \
                reported_at, resolved_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::INT2, $4::VARCHAR, \
                $5::NUMERIC, $6::INT2, \
                $7::TIMESTAMPTZ, $8::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET billboard_id = EXCLUDED.billboard_id, \
                kind = EXCLUDED.kind, \
                description = EXCLUDED.description, \
                cost = EXCLUDED.cost, \
                cost_currency = EXCLUDED.cost_currency, \
                reported_at = EXCLUDED.reported_at, \
                resolved_at = EXCLUDED.resolved_at";
        self.exec(
            SQL,
            &[
                &id,
                &billboard_id,
                &kind,
                &description,
                &cost_amount,
                &cost_currency,
                &reported_at,
                &resolved_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
