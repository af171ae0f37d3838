//! [`Command`] for removing a [`Billboard`] from the inventory.

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{billboard, Billboard},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for removing a [`Billboard`] from the inventory.
///
/// [`Billboard`]s are never deleted, only marked as
/// [`billboard::Status::Removed`], so their history stays intact.
#[derive(Clone, Copy, Debug)]
pub struct RemoveBillboard {
    /// ID of the [`Billboard`] to be removed.
    pub billboard_id: billboard::Id,
}

impl<Db> Command<RemoveBillboard> for Service<Db>
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
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Billboard;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RemoveBillboard,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RemoveBillboard { billboard_id: id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut billboard = tx
            .execute(Select(By::<Option<Billboard>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BillboardNotExists(id))
            .map_err(tracerr::wrap!())?;

        if !remove(&mut billboard).map_err(tracerr::wrap!())? {
            return Ok(billboard);
        }

        tx.execute(Update(billboard.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(billboard)
    }
}

/// Marks the provided [`Billboard`] as [`billboard::Status::Removed`].
///
/// Returns `false` if it is removed already, so nothing has changed.
fn remove(billboard: &mut Billboard) -> Result<bool, ExecutionError> {
    match billboard.status {
        billboard::Status::Removed => Ok(false),
        billboard::Status::Rented => {
            Err(ExecutionError::BillboardRented(billboard.id))
        }
        billboard::Status::Available | billboard::Status::Maintenance => {
            billboard.status = billboard::Status::Removed;
            Ok(true)
        }
    }
}

/// Error of [`RemoveBillboard`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Billboard`] with the provided ID does not exist.
    #[display("`Billboard(id: {_0})` does not exist")]
    BillboardNotExists(#[error(not(source))] billboard::Id),

    /// [`Billboard`] is rented by an active contract.
    #[display("`Billboard(id: {_0})` is rented")]
    BillboardRented(#[error(not(source))] billboard::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{DateTime, Money};

    use crate::domain::{billboard, contract, Billboard};

    use super::{remove, ExecutionError as E};

    fn billboard(status: billboard::Status) -> Billboard {
        Billboard {
            id: billboard::Id::new(),
            name: billboard::Name::new("Coastal Highway").unwrap(),
            landmark: None,
            size: billboard::Size::new("3x4").unwrap(),
            level: billboard::Level::B,
            municipality: None,
            city: None,
            district: None,
            coordinates: billboard::Coordinates::default(),
            status,
            contract_number: None,
            price: Money::from_str("700LYD").unwrap(),
            design_url: None,
            installation_url: None,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn removes_free_billboards() {
        for status in
            [billboard::Status::Available, billboard::Status::Maintenance]
        {
            let mut b = billboard(status);

            assert!(remove(&mut b).unwrap());
            assert_eq!(b.status, billboard::Status::Removed);
        }
    }

    #[test]
    fn rejects_rented_billboard() {
        let mut b = billboard(billboard::Status::Available);
        b.rent(contract::Number::from_sequence(3));

        assert!(matches!(
            remove(&mut b),
            Err(E::BillboardRented(id)) if id == b.id,
        ));
        assert_eq!(b.status, billboard::Status::Rented);
    }

    #[test]
    fn removing_twice_changes_nothing() {
        let mut b = billboard(billboard::Status::Available);

        assert!(remove(&mut b).unwrap());
        assert!(!remove(&mut b).unwrap());
        assert_eq!(b.status, billboard::Status::Removed);
    }
}
