//! [`Payment`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{contract, payment, Payment},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::{self, contract::Paid},
};

/// Columns of the `payments` table, in [`from_row()`] order.
const COLUMNS: &str = "\
    id, contract_id, \
    amount, currency, \
    method, note, receipt_number, \
    paid_at";

/// Reads a [`Payment`] out of the provided [`Row`] having [`COLUMNS`].
fn from_row(row: &Row) -> Payment {
    Payment {
        id: row.get("id"),
        contract_id: row.get("contract_id"),
        amount: super::money(row, "amount", "currency"),
        method: row.get("method"),
        note: row.get("note"),
        receipt_number: row.get("receipt_number"),
        paid_at: row.get("paid_at"),
    }
}

impl<C> Database<Select<By<Option<Payment>, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: payment::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM payments \
             WHERE id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Select<By<Vec<Payment>, contract::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let contract_id: contract::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM payments \
             WHERE contract_id = $1::UUID \
             ORDER BY paid_at, id",
        );
        Ok(self
            .query(&sql, &[&contract_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C, IDs> Database<Select<By<HashMap<contract::Id, Paid>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[contract::Id]>,
{
    type Ok = HashMap<contract::Id, Paid>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<contract::Id, Paid>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[contract::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT contract_id, SUM(amount) AS amount, currency \
            FROM payments \
            WHERE contract_id = ANY($1::UUID[]) \
            GROUP BY contract_id, currency";
        let mut sums = HashMap::<contract::Id, Vec<_>>::new();
        for row in self.query(SQL, &[&ids]).await.map_err(tracerr::wrap!())? {
            sums.entry(row.get("contract_id"))
                .or_default()
                .push(super::money(&row, "amount", "currency"));
        }
        Ok(sums
            .into_iter()
            .map(|(id, sums)| (id, Paid::new(sums)))
            .collect())
    }
}

impl<C> Database<Select<By<Paid, contract::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<contract::Id, Paid>, [contract::Id; 1]>>,
        Ok = HashMap<contract::Id, Paid>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Paid;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Paid, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id)
            .unwrap_or_default())
    }
}

impl<C> Database<Select<By<payment::ReceiptNumber, read::Next>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = payment::ReceiptNumber;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<payment::ReceiptNumber, read::Next>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "SELECT nextval('receipt_numbers')";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                payment::ReceiptNumber::from_sequence(super::sequence(
                    &row.expect("always exists"),
                ))
            })
    }
}

impl<C> Database<Insert<Payment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Payment {
            id,
            contract_id,
            amount,
            method,
            note,
            receipt_number,
            paid_at,
        } = payment;

        const SQL: &str = "\
            INSERT INTO payments (\
                id, contract_id, \
                amount, currency, \
                method, note, receipt_number, \
                paid_at\
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::NUMERIC, $4::INT2, \
                $5::INT2, $6::VARCHAR, $7::VARCHAR, \
                $8::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &contract_id,
                &amount.amount,
                &amount.currency,
                &method,
                &note,
                &receipt_number,
                &paid_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
