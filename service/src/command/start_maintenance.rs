//! [`Command`] for starting a maintenance of a [`Billboard`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        billboard,
        maintenance::{self, Record},
        Billboard,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for opening a maintenance [`Record`] of a [`Billboard`].
///
/// The [`Billboard`] stays under maintenance until the [`Record`] is
/// completed. Its contract, if any, is kept.
#[derive(Clone, Debug)]
pub struct StartMaintenance {
    /// ID of the [`Billboard`] to be maintained.
    pub billboard_id: billboard::Id,

    /// Kind of the maintenance.
    pub kind: maintenance::Kind,

    /// Description of the problem or the job.
    pub description: maintenance::Description,

    /// Estimated cost of the maintenance, if known.
    pub cost: Option<Money>,
}

impl<Db> Command<StartMaintenance> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Billboard, billboard::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Billboard>, billboard::Id>>,
            Ok = Option<Billboard>,
            Err = Traced<database::Error>,
        > + Database<Update<Billboard>, Err = Traced<database::Error>>
        + Database<Insert<Record>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Record;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: StartMaintenance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let StartMaintenance {
            billboard_id,
            kind,
            description,
            cost,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(billboard_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut billboard = tx
            .execute(Select(By::<Option<Billboard>, _>::new(billboard_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BillboardNotExists(billboard_id))
            .map_err(tracerr::wrap!())?;
        match billboard.status {
            billboard::Status::Removed => {
                return Err(tracerr::new!(E::BillboardRemoved(billboard_id)));
            }
            billboard::Status::Maintenance => {
                return Err(tracerr::new!(E::AlreadyInMaintenance(
                    billboard_id
                )));
            }
            billboard::Status::Available | billboard::Status::Rented => {}
        }

        let record = Record {
            id: maintenance::Id::new(),
            billboard_id,
            kind,
            description,
            cost,
            reported_at: DateTime::now().coerce(),
            resolved_at: None,
        };
        billboard.status = billboard::Status::Maintenance;

        tx.execute(Insert(record.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Update(billboard))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(record)
    }
}

/// Error of [`StartMaintenance`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Billboard`] is under maintenance already.
    #[display("`Billboard(id: {_0})` is under maintenance already")]
    AlreadyInMaintenance(#[error(not(source))] billboard::Id),

    /// [`Billboard`] with the provided ID does not exist.
    #[display("`Billboard(id: {_0})` does not exist")]
    BillboardNotExists(#[error(not(source))] billboard::Id),

    /// [`Billboard`] is taken out of the inventory.
    #[display("`Billboard(id: {_0})` is removed")]
    BillboardRemoved(#[error(not(source))] billboard::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
