//! [`Billboard`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{billboard, contract, Billboard},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `billboards` table, in [`from_row()`] order.
const COLUMNS: &str = "\
    id, name, landmark, size, level, \
    municipality, city, district, coordinates, \
    status, contract_number, \
    price, price_currency, \
    design_url, installation_url, \
    created_at";

/// Reads a [`Billboard`] out of the provided [`Row`] having [`COLUMNS`].
fn from_row(row: &Row) -> Billboard {
    Billboard {
        id: row.get("id"),
        name: row.get("name"),
        landmark: row.get("landmark"),
        size: row.get("size"),
        level: row.get("level"),
        municipality: row.get("municipality"),
        city: row.get("city"),
        district: row.get("district"),
        coordinates: row.get("coordinates"),
        status: row.get("status"),
        contract_number: row.get("contract_number"),
        price: super::money(row, "price", "price_currency"),
        design_url: row.get("design_url"),
        installation_url: row.get("installation_url"),
        created_at: row.get("created_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<billboard::Id, Billboard>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[billboard::Id]>,
{
    type Ok = HashMap<billboard::Id, Billboard>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<billboard::Id, Billboard>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[billboard::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM billboards \
             WHERE id = ANY($1::UUID[])",
        );
        Ok(self
            .query(&sql, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let b = from_row(row);
                (b.id, b)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Billboard>, billboard::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<billboard::Id, Billboard>, [billboard::Id; 1]>>,
        Ok = HashMap<billboard::Id, Billboard>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Billboard>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Billboard>, billboard::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Billboard>, read::billboard::Inventory>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Billboard>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Billboard>, read::billboard::Inventory>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::billboard::Inventory { include_removed } = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM billboards \
             WHERE $1::BOOLEAN OR status <> $2::INT2 \
             ORDER BY name, id",
        );
        Ok(self
            .query(&sql, &[&include_removed, &billboard::Status::Removed])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Billboard>, contract::Number>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Billboard>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Billboard>, contract::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let number: contract::Number = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM billboards \
             WHERE contract_number = $1::VARCHAR \
             ORDER BY name, id",
        );
        Ok(self
            .query(&sql, &[&number])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Billboard>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Billboard>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(billboard): Insert<Billboard>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(billboard))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Billboard>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(billboard): Update<Billboard>,
    ) -> Result<Self::Ok, Self::Err> {
        let Billboard {
            id,
            name,
            landmark,
            size,
            level,
            municipality,
            city,
            district,
            coordinates,
            status,
            contract_number,
            price,
            design_url,
            installation_url,
            created_at,
        } = billboard;

        const SQL: &str = "\
            INSERT INTO billboards (\
                id, name, landmark, size, level, \
                municipality, city, district, coordinates, \
                status, contract_number, \
                price, price_currency, \
                design_url, installation_url, \
                created_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, $5::INT2, \
                $6::VARCHAR, $7::VARCHAR, $8::VARCHAR, $9::VARCHAR, \
                $10::INT2, $11::VARCHAR, \
                $12::NUMERIC, $13::INT2, \
                $14::VARCHAR, $15::VARCHAR, \
                $16::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                landmark = EXCLUDED.landmark, \
                size = EXCLUDED.size, \
                level = EXCLUDED.level, \
                municipality = EXCLUDED.municipality, \
                city = EXCLUDED.city, \
                district = EXCLUDED.district, \
                coordinates = EXCLUDED.coordinates, \
                status = EXCLUDED.status, \
                contract_number = EXCLUDED.contract_number, \
                price = EXCLUDED.price, \
                price_currency = EXCLUDED.price_currency, \
                design_url = EXCLUDED.design_url, \
                installation_url = EXCLUDED.installation_url, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &landmark,
                &size,
                &level,
                &municipality,
                &city,
                &district,
                &coordinates,
                &status,
                &contract_number,
                &price.amount,
                &price.currency,
                &design_url,
                &installation_url,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Billboard, billboard::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Billboard, billboard::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: billboard::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM billboards \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
