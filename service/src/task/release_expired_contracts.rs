//! [`ReleaseExpiredContracts`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{
        By, Commit, Lock, Perform, Select, Start, Transact, Transacted, Update,
    },
    DateTime,
};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{billboard, contract, Billboard, Contract},
    infra::{database, Database},
    read::contract::ExpiredAt,
    Service,
};

use super::Task;

/// Configuration for [`ReleaseExpiredContracts`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between expired [`Contract`]s checks.
    pub interval: time::Duration,
}

/// [`Task`] for releasing [`Billboard`]s of [`Contract`]s whose period has
/// ended.
#[derive(Clone, Copy, Debug)]
pub struct ReleaseExpiredContracts<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<ReleaseExpiredContracts<Self>, Config>>> for Service<Db>
where
    ReleaseExpiredContracts<Service<Db>>:
        Task<Perform<()>, Ok = usize, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<ReleaseExpiredContracts<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = ReleaseExpiredContracts {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(0) => {}
                Ok(n) => log::info!(
                    "`task::ReleaseExpiredContracts` released {n} billboards",
                ),
                Err(e) => {
                    log::error!("`task::ReleaseExpiredContracts` failed: {e}");
                }
            }
        }
    }
}

impl<Db> Task<Perform<()>> for ReleaseExpiredContracts<Service<Db>>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Vec<Contract>, ExpiredAt>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Billboard, billboard::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Billboard>, contract::Number>>,
            Ok = Vec<Billboard>,
            Err = Traced<database::Error>,
        > + Database<Update<Billboard>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = usize;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let expired = self
            .service
            .database()
            .execute(Select(By::<Vec<Contract>, _>::new(ExpiredAt(
                DateTime::now(),
            ))))
            .await
            .map_err(tracerr::wrap!())?;

        let mut released = 0;
        for contract in expired {
            // A single broken `Contract` must not block the others.
            match self.release(&contract).await {
                Ok(n) => released += n,
                Err(e) => log::error!(
                    contract = %contract.id,
                    "failed to release `Contract` billboards: {e}",
                ),
            }
        }
        Ok(released)
    }
}

impl<Db> ReleaseExpiredContracts<Service<Db>>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Billboard, billboard::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Billboard>, contract::Number>>,
            Ok = Vec<Billboard>,
            Err = Traced<database::Error>,
        > + Database<Update<Billboard>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    /// Releases the [`Billboard`]s still held by the provided expired
    /// [`Contract`], returning how many of them were released.
    async fn release(
        &self,
        contract: &Contract,
    ) -> Result<usize, ExecutionError> {
        let mut ids = contract.billboard_ids.clone();
        ids.sort_unstable();

        let tx = self
            .service
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        for id in ids {
            tx.execute(Lock(By::<Billboard, _>::new(id)))
                .await
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }

        let billboards = tx
            .execute(Select(By::<Vec<Billboard>, _>::new(
                contract.number.clone(),
            )))
            .await
            .map_err(tracerr::wrap!())?;
        let changed = released(billboards, &contract.number);
        let count = changed.len();
        for b in changed {
            log::debug!(
                billboard = %b.id,
                contract = %contract.number,
                "releasing expired `Billboard`",
            );
            tx.execute(Update(b))
                .await
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(count)
    }
}

/// Releases the provided [`Billboard`]s from the [`Contract`] with the
/// provided [`contract::Number`], returning only the changed ones.
fn released(
    billboards: Vec<Billboard>,
    number: &contract::Number,
) -> Vec<Billboard> {
    billboards
        .into_iter()
        .filter_map(|mut b| b.release(number).then_some(b))
        .collect()
}

/// Error of [`ReleaseExpiredContracts`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{DateTime, Money};

    use crate::domain::{billboard, contract, Billboard};

    use super::released;

    fn billboard(
        status: billboard::Status,
        number: Option<&contract::Number>,
    ) -> Billboard {
        Billboard {
            id: billboard::Id::new(),
            name: billboard::Name::new("Airport Road").unwrap(),
            landmark: None,
            size: billboard::Size::new("4x12").unwrap(),
            level: billboard::Level::A,
            municipality: None,
            city: None,
            district: None,
            coordinates: billboard::Coordinates::default(),
            status,
            contract_number: number.cloned(),
            price: Money::from_str("1500LYD").unwrap(),
            design_url: None,
            installation_url: None,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn releases_only_billboards_of_contract() {
        let expired = contract::Number::from_sequence(7);
        let other = contract::Number::from_sequence(8);

        let changed = released(
            vec![
                billboard(billboard::Status::Rented, Some(&expired)),
                billboard(billboard::Status::Maintenance, Some(&expired)),
                billboard(billboard::Status::Rented, Some(&other)),
            ],
            &expired,
        );

        assert_eq!(changed.len(), 2);
        assert!(changed.iter().all(|b| b.contract_number.is_none()));
        assert_eq!(changed[0].status, billboard::Status::Available);
        assert_eq!(changed[1].status, billboard::Status::Maintenance);
    }

    #[test]
    fn releasing_again_changes_nothing() {
        let expired = contract::Number::from_sequence(7);
        let billboards = vec![
            billboard(billboard::Status::Rented, Some(&expired)),
            billboard(billboard::Status::Rented, Some(&expired)),
        ];

        let first = released(billboards, &expired);
        assert_eq!(first.len(), 2);

        assert!(released(first, &expired).is_empty());
    }
}
