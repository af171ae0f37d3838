//! [`Command`] for creating a new [`Contract`].

use std::collections::HashMap;

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime, Money, Percent,
};
use derive_more::{Display, Error, From};
use itertools::Itertools as _;
use tracerr::Traced;

use crate::{
    domain::{
        billboard,
        contract::{self, Breakdown, Pricing},
        Billboard, Contract,
    },
    infra::{database, Database},
    read,
    Service,
};

use super::Command;

/// [`Command`] for renting [`Billboard`]s out by a new [`Contract`].
#[derive(Clone, Debug)]
pub struct CreateContract {
    /// Customer of a new [`Contract`].
    pub customer: contract::Customer,

    /// Phone of the customer.
    pub phone: Option<contract::Phone>,

    /// Kind of the advertisement.
    pub ad_type: Option<contract::AdType>,

    /// IDs of the [`Billboard`]s to be rented.
    pub billboard_ids: Vec<billboard::Id>,

    /// Start of the rent period.
    pub starts_at: contract::StartDateTime,

    /// End of the rent period.
    pub ends_at: contract::EndDateTime,

    /// Discount off the rent prices.
    pub discount: Option<Percent>,

    /// One-time installation cost.
    pub installation_cost: Option<Money>,

    /// Deadline of the payment.
    pub payment_due_at: Option<contract::DueDateTime>,
}

impl<Db> Command<CreateContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Billboard, billboard::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<billboard::Id, Billboard>, Vec<billboard::Id>>>,
            Ok = HashMap<billboard::Id, Billboard>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<contract::Number, read::Next>>,
            Ok = contract::Number,
            Err = Traced<database::Error>,
        > + Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Update<Billboard>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            customer,
            phone,
            ad_type,
            billboard_ids,
            starts_at,
            ends_at,
            discount,
            installation_cost,
            payment_due_at,
        } = cmd;

        if billboard_ids.is_empty() {
            return Err(tracerr::new!(E::NoBillboards));
        }
        if ends_at.coerce::<()>() <= starts_at.coerce() {
            return Err(tracerr::new!(E::InvalidPeriod));
        }

        // Locks are always taken in the same order to avoid deadlocks.
        let ids = billboard_ids
            .into_iter()
            .sorted_unstable()
            .dedup()
            .collect::<Vec<_>>();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        for id in &ids {
            tx.execute(Lock(By::new(*id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let mut billboards = tx
            .execute(Select(By::<HashMap<_, Billboard>, _>::new(ids.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let monthly =
            monthly_prices(&ids, &billboards).map_err(tracerr::wrap!())?;

        let currency = self.config().currency;
        let pricing = Pricing::calculate(
            monthly,
            contract::months_between(starts_at, ends_at),
            discount,
            installation_cost,
            currency,
        )
        .ok_or(E::CurrencyMismatch)
        .map_err(tracerr::wrap!())?;

        let number = tx
            .execute(Select(By::<contract::Number, _>::new(read::Next)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let contract = Contract {
            id: contract::Id::new(),
            number,
            customer,
            phone,
            ad_type,
            billboard_ids: ids,
            starts_at,
            ends_at,
            total: pricing.total,
            discount,
            installation_cost: installation_cost.filter(Money::is_positive),
            breakdown: Breakdown::new(pricing.lines),
            payment_due_at,
            created_at: DateTime::now().coerce(),
            terminated_at: None,
        };

        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        for id in &contract.billboard_ids {
            if let Some(mut b) = billboards.remove(id) {
                b.rent(contract.number.clone());
                tx.execute(Update(b))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contract)
    }
}

/// Collects monthly prices of the [`Billboard`]s to be rented, checking that
/// each of them exists and is available.
fn monthly_prices(
    ids: &[billboard::Id],
    billboards: &HashMap<billboard::Id, Billboard>,
) -> Result<Vec<(billboard::Id, Money)>, ExecutionError> {
    ids.iter()
        .map(|id| {
            let b = billboards
                .get(id)
                .ok_or(ExecutionError::BillboardNotExists(*id))?;
            if !b.is_available() {
                return Err(ExecutionError::BillboardNotAvailable(*id));
            }
            Ok((*id, b.price))
        })
        .collect()
}

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Billboard`] is rented, under maintenance or removed.
    #[display("`Billboard(id: {_0})` is not available")]
    BillboardNotAvailable(#[error(not(source))] billboard::Id),

    /// [`Billboard`] with the provided ID does not exist.
    #[display("`Billboard(id: {_0})` does not exist")]
    BillboardNotExists(#[error(not(source))] billboard::Id),

    /// Prices are not in the configured currency.
    #[display("Prices are not in a single currency")]
    CurrencyMismatch,

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Rent period ends before it starts.
    #[display("Rent period must end after it starts")]
    InvalidPeriod,

    /// No [`Billboard`]s are provided.
    #[display("At least one `Billboard` must be rented")]
    NoBillboards,
}

#[cfg(test)]
mod spec {
    use std::{collections::HashMap, str::FromStr as _};

    use common::{DateTime, Money};

    use crate::domain::{billboard, Billboard};

    use super::{monthly_prices, ExecutionError as E};

    fn billboard(status: billboard::Status, price: &str) -> Billboard {
        Billboard {
            id: billboard::Id::new(),
            name: billboard::Name::new("Airport Road").unwrap(),
            landmark: None,
            size: billboard::Size::new("4x12").unwrap(),
            level: billboard::Level::A,
            municipality: None,
            city: billboard::City::new("Tripoli"),
            district: None,
            coordinates: billboard::Coordinates::new("32.88,13.19").unwrap(),
            status,
            contract_number: None,
            price: Money::from_str(price).unwrap(),
            design_url: None,
            installation_url: None,
            created_at: DateTime::now().coerce(),
        }
    }

    fn by_id(
        billboards: impl IntoIterator<Item = Billboard>,
    ) -> HashMap<billboard::Id, Billboard> {
        billboards.into_iter().map(|b| (b.id, b)).collect()
    }

    #[test]
    fn prices_available_billboards() {
        let a = billboard(billboard::Status::Available, "1500LYD");
        let b = billboard(billboard::Status::Available, "900LYD");
        let ids = [a.id, b.id];

        let prices = monthly_prices(&ids, &by_id([a, b])).unwrap();

        assert_eq!(
            prices,
            [
                (ids[0], Money::from_str("1500LYD").unwrap()),
                (ids[1], Money::from_str("900LYD").unwrap()),
            ],
        );
    }

    #[test]
    fn rejects_unavailable_billboards() {
        for status in [
            billboard::Status::Rented,
            billboard::Status::Maintenance,
            billboard::Status::Removed,
        ] {
            let free = billboard(billboard::Status::Available, "1500LYD");
            let busy = billboard(status, "900LYD");
            let (free_id, busy_id) = (free.id, busy.id);

            assert!(matches!(
                monthly_prices(&[free_id, busy_id], &by_id([free, busy])),
                Err(E::BillboardNotAvailable(id)) if id == busy_id,
            ));
        }
    }

    #[test]
    fn rejects_unknown_billboards() {
        let known = billboard(billboard::Status::Available, "1500LYD");
        let unknown = billboard::Id::new();

        assert!(matches!(
            monthly_prices(&[known.id, unknown], &by_id([known])),
            Err(E::BillboardNotExists(id)) if id == unknown,
        ));
    }
}
