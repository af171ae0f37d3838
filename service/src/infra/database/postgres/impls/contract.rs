//! [`Contract`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select, Update};
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{billboard, contract, Contract},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::{
        self,
        contract::{Active, ActiveAt, DueBefore, ExpiredAt},
    },
};

/// Columns of the `contracts` table, in [`from_row()`] order.
const COLUMNS: &str = "\
    id, number, customer, phone, ad_type, \
    billboard_ids, starts_at, ends_at, \
    total, total_currency, \
    discount, \
    installation_cost, installation_cost_currency, \
    breakdown, payment_due_at, \
    created_at, terminated_at";

/// Reads a [`Contract`] out of the provided [`Row`] having [`COLUMNS`].
fn from_row(row: &Row) -> Contract {
    Contract {
        id: row.get("id"),
        number: row.get("number"),
        customer: row.get("customer"),
        phone: row.get("phone"),
        ad_type: row.get("ad_type"),
        billboard_ids: row.get("billboard_ids"),
        starts_at: row.get("starts_at"),
        ends_at: row.get("ends_at"),
        total: super::money(row, "total", "total_currency"),
        discount: row.get("discount"),
        installation_cost: super::money_opt(
            row,
            "installation_cost",
            "installation_cost_currency",
        ),
        breakdown: row.get("breakdown"),
        payment_due_at: row.get("payment_due_at"),
        created_at: row.get("created_at"),
        terminated_at: row.get("terminated_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<contract::Id, Contract>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[contract::Id]>,
{
    type Ok = HashMap<contract::Id, Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<contract::Id, Contract>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[contract::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM contracts \
             WHERE id = ANY($1::UUID[])",
        );
        Ok(self
            .query(&sql, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let c = from_row(row);
                (c.id, c)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Contract>, contract::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<contract::Id, Contract>, [contract::Id; 1]>>,
        Ok = HashMap<contract::Id, Contract>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Contract>, read::contract::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, read::contract::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::contract::list::Filter {
            customer,
            active_only,
        } = by.into_inner();
        let customer = customer
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let customer_idx = customer.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM contracts \
             WHERE true \
                   {customer_filtering} \
                   {active_filtering} \
             ORDER BY created_at DESC, id",
            customer_filtering = customer_idx
                .map(|idx| {
                    format!("AND STRPOS(LOWER(customer), ${idx}::VARCHAR) > 0")
                })
                .unwrap_or_default(),
            active_filtering = if active_only {
                "AND terminated_at IS NULL AND ends_at > NOW()"
            } else {
                ""
            },
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Active<Contract>>, ActiveAt>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Active<Contract>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Active<Contract>>, ActiveAt>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ActiveAt(at) = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM contracts \
             WHERE terminated_at IS NULL \
               AND ends_at > $1::TIMESTAMPTZ \
             ORDER BY starts_at, id",
        );
        Ok(self
            .query(&sql, &[&at])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| Active(from_row(row)))
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Contract>, ExpiredAt>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, ExpiredAt>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ExpiredAt(at) = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM contracts \
             WHERE terminated_at IS NULL \
               AND ends_at <= $1::TIMESTAMPTZ \
               AND EXISTS (SELECT 1 \
                           FROM billboards \
                           WHERE billboards.contract_number \
                                 = contracts.number) \
             ORDER BY ends_at, id",
        );
        Ok(self
            .query(&sql, &[&at])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Contract>, DueBefore>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, DueBefore>>,
    ) -> Result<Self::Ok, Self::Err> {
        let DueBefore(at) = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM contracts \
             WHERE terminated_at IS NULL \
               AND payment_due_at IS NOT NULL \
               AND payment_due_at < $1::TIMESTAMPTZ \
             ORDER BY payment_due_at, id",
        );
        Ok(self
            .query(&sql, &[&at])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Contract>, billboard::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, billboard::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let billboard_id: billboard::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM contracts \
             WHERE $1::UUID = ANY(billboard_ids) \
             ORDER BY starts_at DESC, id",
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

impl<C> Database<Select<By<Option<Active<Contract>>, billboard::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Active<Contract>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Active<Contract>>, billboard::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let billboard_id: billboard::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM contracts \
             WHERE $1::UUID = ANY(billboard_ids) \
               AND terminated_at IS NULL \
               AND ends_at > NOW() \
             ORDER BY ends_at DESC \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&billboard_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Active(from_row(&row))))
    }
}

impl<C> Database<Select<By<contract::Number, read::Next>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = contract::Number;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<contract::Number, read::Next>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "SELECT nextval('contract_numbers')";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                contract::Number::from_sequence(super::sequence(
                    &row.expect("always exists"),
                ))
            })
    }
}

impl<C> Database<Insert<Contract>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Contract>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(contract))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Contract>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let Contract {
            id,
            number,
            customer,
            phone,
            ad_type,
            billboard_ids,
            starts_at,
            ends_at,
            total,
            discount,
            installation_cost,
            breakdown,
            payment_due_at,
            created_at,
            terminated_at,
        } = contract;

        let installation_cost_amount = installation_cost.map(|m| m.amount);
        let installation_cost_currency = installation_cost.map(|m| m.currency);

        const SQL: &str = "\
            INSERT INTO contracts (\
                id, number, customer, phone, ad_type, \
                billboard_ids, starts_at, ends_at, \
                total, total_currency, \
                discount, \
                installation_cost, installation_cost_currency, \
                breakdown, payment_due_at, \
                created_at, terminated_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                $6::UUID[], $7::TIMESTAMPTZ, $8::TIMESTAMPTZ, \
                $9::NUMERIC, $10::INT2, \
                $11::NUMERIC, \
                $12::NUMERIC, $13::INT2, \
                $14::JSONB, $15::TIMESTAMPTZ, \
                $16::TIMESTAMPTZ, $17::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET number = EXCLUDED.number, \
                customer = EXCLUDED.customer, \
                phone = EXCLUDED.phone, \
                ad_type = EXCLUDED.ad_type, \
                billboard_ids = EXCLUDED.billboard_ids, \
                starts_at = EXCLUDED.starts_at, \
                ends_at = EXCLUDED.ends_at, \
                total = EXCLUDED.total, \
                total_currency = EXCLUDED.total_currency, \
                discount = EXCLUDED.discount, \
                installation_cost = EXCLUDED.installation_cost, \
                installation_cost_currency = \
                    EXCLUDED.installation_cost_currency, \
                breakdown = EXCLUDED.breakdown, \
                payment_due_at = EXCLUDED.payment_due_at, \
                created_at = EXCLUDED.created_at, \
                terminated_at = EXCLUDED.terminated_at";
        self.exec(
            SQL,
            &[
                &id,
                &number,
                &customer,
                &phone,
                &ad_type,
                &billboard_ids,
                &starts_at,
                &ends_at,
                &total.amount,
                &total.currency,
                &discount,
                &installation_cost_amount,
                &installation_cost_currency,
                &breakdown,
                &payment_due_at,
                &created_at,
                &terminated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Contract, contract::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Contract, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: contract::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM contracts \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
