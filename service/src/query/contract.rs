//! [`Query`] collection related to a single [`Contract`].

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{contract, Contract, Payment},
    infra::{database, Database},
    read::contract::Paid,
    Query, Service,
};

use super::DatabaseQuery;

/// Queries a [`Contract`] by its [`contract::Id`].
pub type ById = DatabaseQuery<By<Option<Contract>, contract::Id>>;

/// Queries all the [`Payment`]s of a [`Contract`], from the earliest.
pub type Payments = DatabaseQuery<By<Vec<Payment>, contract::Id>>;

/// [`Query`] calculating the payment balance of a [`Contract`].
#[derive(Clone, Copy, Debug)]
pub struct Balance {
    /// ID of the [`Contract`].
    pub contract_id: contract::Id,
}

impl<Db> Query<Balance> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Paid, contract::Id>>,
            Ok = Paid,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<crate::read::contract::Balance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Balance { contract_id }: Balance,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(contract) = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let paid = self
            .database()
            .execute(Select(By::<Paid, _>::new(contract_id)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Some(crate::read::contract::Balance::of(&contract, &paid)))
    }
}
