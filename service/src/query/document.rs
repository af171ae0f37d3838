//! [`Query`] collection rendering printable documents.
//!
//! Every document is rendered as a standalone HTML page sized for A4 paper.

use std::collections::HashMap;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{billboard, contract, payment, Billboard, Contract, Payment},
    infra::{database, Database},
    print,
    read::contract::{Balance, Paid},
    Query, Service,
};

/// [`Query`] rendering the rent agreement of a [`Contract`].
#[derive(Clone, Copy, Debug)]
pub struct Agreement {
    /// ID of the [`Contract`] to render.
    pub contract_id: contract::Id,
}

/// [`Query`] rendering the invoice of a [`Contract`].
#[derive(Clone, Copy, Debug)]
pub struct Invoice {
    /// ID of the [`Contract`] to render.
    pub contract_id: contract::Id,
}

/// [`Query`] rendering the receipt of a [`Payment`].
#[derive(Clone, Copy, Debug)]
pub struct Receipt {
    /// ID of the [`Payment`] to render.
    pub payment_id: payment::Id,
}

impl<Db> Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<billboard::Id, Billboard>, Vec<billboard::Id>>>,
            Ok = HashMap<billboard::Id, Billboard>,
            Err = Traced<database::Error>,
        >,
{
    /// Selects the [`Contract`] along with its [`Billboard`]s in the
    /// [`Contract`] order.
    ///
    /// Billboards deleted since are omitted.
    async fn contract_with_billboards(
        &self,
        id: contract::Id,
    ) -> Result<Option<(Contract, Vec<Billboard>)>, Traced<database::Error>>
    {
        let Some(contract) = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let mut billboards = self
            .database()
            .execute(Select(By::<HashMap<_, Billboard>, _>::new(
                contract.billboard_ids.clone(),
            )))
            .await
            .map_err(tracerr::wrap!())?;
        let billboards = contract
            .billboard_ids
            .iter()
            .filter_map(|id| billboards.remove(id))
            .collect();

        Ok(Some((contract, billboards)))
    }
}

impl<Db> Query<Agreement> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<billboard::Id, Billboard>, Vec<billboard::Id>>>,
            Ok = HashMap<billboard::Id, Billboard>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<String>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Agreement { contract_id }: Agreement,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .contract_with_billboards(contract_id)
            .await
            .map_err(tracerr::wrap!())?
            .map(|(c, billboards)| {
                print::contract(&self.config().issuer, &c, &billboards)
                    .into_string()
            }))
    }
}

impl<Db> Query<Invoice> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<billboard::Id, Billboard>, Vec<billboard::Id>>>,
            Ok = HashMap<billboard::Id, Billboard>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<String>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Invoice { contract_id }: Invoice,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .contract_with_billboards(contract_id)
            .await
            .map_err(tracerr::wrap!())?
            .map(|(c, billboards)| {
                print::invoice(&self.config().issuer, &c, &billboards)
                    .into_string()
            }))
    }
}

impl<Db> Query<Receipt> for Service<Db>
where
    Db: Database<
            Select<By<Option<Payment>, payment::Id>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Paid, contract::Id>>,
            Ok = Paid,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<String>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Receipt { payment_id }: Receipt,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(payment) = self
            .database()
            .execute(Select(By::<Option<Payment>, _>::new(payment_id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };
        let Some(contract) = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(
                payment.contract_id,
            )))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };
        let paid = self
            .database()
            .execute(Select(By::<Paid, _>::new(contract.id)))
            .await
            .map_err(tracerr::wrap!())?;

        let balance = Balance::of(&contract, &paid);
        Ok(Some(
            print::receipt(&self.config().issuer, &payment, &contract, &balance)
                .into_string(),
        ))
    }
}
