//! [`Command`] for completing a maintenance of a [`Billboard`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        billboard, contract,
        maintenance::{self, Record},
        Billboard, Contract,
    },
    infra::{database, Database},
    read::contract::Active,
    Service,
};

use super::Command;

/// [`Command`] for completing a maintenance [`Record`].
///
/// The maintained [`Billboard`] returns to [`billboard::Status::Rented`] if
/// an active [`Contract`] still covers it, or to
/// [`billboard::Status::Available`] otherwise.
#[derive(Clone, Copy, Debug)]
pub struct CompleteMaintenance {
    /// ID of the maintenance [`Record`] to be completed.
    pub record_id: maintenance::Id,

    /// Final cost of the maintenance, replacing the estimated one.
    pub cost: Option<Money>,
}

impl<Db> Command<CompleteMaintenance> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Record>, maintenance::Id>>,
            Ok = Option<Record>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Billboard, billboard::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Billboard>, billboard::Id>>,
            Ok = Option<Billboard>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Record>, maintenance::Id>>,
            Ok = Option<Record>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<Contract>>, billboard::Id>>,
            Ok = Option<Active<Contract>>,
            Err = Traced<database::Error>,
        > + Database<Update<Billboard>, Err = Traced<database::Error>>
        + Database<Update<Record>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Record;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CompleteMaintenance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CompleteMaintenance { record_id, cost } = cmd;

        let billboard_id = self
            .database()
            .execute(Select(By::<Option<Record>, _>::new(record_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RecordNotExists(record_id))
            .map_err(tracerr::wrap!())?
            .billboard_id;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Records are completed under the lock of their `Billboard`.
        tx.execute(Lock(By::new(billboard_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut record = tx
            .execute(Select(By::<Option<Record>, _>::new(record_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RecordNotExists(record_id))
            .map_err(tracerr::wrap!())?;
        complete(&mut record, cost, DateTime::now().coerce())
            .map_err(tracerr::wrap!())?;

        let mut billboard = tx
            .execute(Select(By::<Option<Billboard>, _>::new(billboard_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BillboardNotExists(billboard_id))
            .map_err(tracerr::wrap!())?;
        let active = tx
            .execute(Select(By::<Option<Active<Contract>>, _>::new(
                billboard_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if restore(&mut billboard, active.map(|Active(c)| c.number)) {
            tx.execute(Update(billboard))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Update(record.clone()))
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

/// Marks the provided open [`Record`] as resolved `at` the provided moment,
/// replacing its estimated cost with the final one, if any.
fn complete(
    record: &mut Record,
    cost: Option<Money>,
    at: maintenance::ResolutionDateTime,
) -> Result<(), ExecutionError> {
    if !record.is_open() {
        return Err(ExecutionError::AlreadyCompleted(record.id));
    }
    record.resolved_at = Some(at);
    if cost.is_some() {
        record.cost = cost;
    }
    Ok(())
}

/// Returns the provided [`Billboard`] into service if it is still under
/// maintenance, rented by the `active` [`Contract`] if any covers it.
///
/// Returns `false` if the [`Billboard`] is left untouched.
fn restore(
    billboard: &mut Billboard,
    active: Option<contract::Number>,
) -> bool {
    if billboard.status != billboard::Status::Maintenance {
        return false;
    }
    billboard.restore(active);
    true
}

/// Error of [`CompleteMaintenance`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Maintenance [`Record`] is completed already.
    #[display("`maintenance::Record(id: {_0})` is completed already")]
    AlreadyCompleted(#[error(not(source))] maintenance::Id),

    /// [`Billboard`] of the [`Record`] does not exist.
    #[display("`Billboard(id: {_0})` does not exist")]
    BillboardNotExists(#[error(not(source))] billboard::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Maintenance [`Record`] with the provided ID does not exist.
    #[display("`maintenance::Record(id: {_0})` does not exist")]
    RecordNotExists(#[error(not(source))] maintenance::Id),
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{DateTime, Money};

    use crate::domain::{billboard, contract, maintenance, Billboard};

    use super::{complete, restore, ExecutionError as E};

    fn billboard(status: billboard::Status) -> Billboard {
        Billboard {
            id: billboard::Id::new(),
            name: billboard::Name::new("Airport Road").unwrap(),
            landmark: None,
            size: billboard::Size::new("4x12").unwrap(),
            level: billboard::Level::S,
            municipality: None,
            city: None,
            district: None,
            coordinates: billboard::Coordinates::default(),
            status,
            contract_number: None,
            price: Money::from_str("2500LYD").unwrap(),
            design_url: None,
            installation_url: None,
            created_at: DateTime::now().coerce(),
        }
    }

    fn record(cost: Option<&str>) -> maintenance::Record {
        maintenance::Record {
            id: maintenance::Id::new(),
            billboard_id: billboard::Id::new(),
            kind: maintenance::Kind::Repair,
            description: maintenance::Description::new("Torn face").unwrap(),
            cost: cost.map(|c| Money::from_str(c).unwrap()),
            reported_at: DateTime::now().coerce(),
            resolved_at: None,
        }
    }

    #[test]
    fn restores_rented_when_contract_is_active() {
        let number = contract::Number::from_sequence(4);
        let mut b = billboard(billboard::Status::Maintenance);

        assert!(restore(&mut b, Some(number.clone())));
        assert_eq!(b.status, billboard::Status::Rented);
        assert_eq!(b.contract_number, Some(number));
    }

    #[test]
    fn restores_available_without_contract() {
        let mut b = billboard(billboard::Status::Maintenance);

        assert!(restore(&mut b, None));
        assert_eq!(b.status, billboard::Status::Available);
        assert_eq!(b.contract_number, None);
    }

    #[test]
    fn leaves_billboard_out_of_maintenance_untouched() {
        let mut removed = billboard(billboard::Status::Removed);
        assert!(!restore(&mut removed, None));
        assert_eq!(removed.status, billboard::Status::Removed);

        let mut free = billboard(billboard::Status::Available);
        assert!(!restore(&mut free, Some(contract::Number::from_sequence(1))));
        assert_eq!(free.status, billboard::Status::Available);
        assert_eq!(free.contract_number, None);
    }

    #[test]
    fn completes_once() {
        let mut r = record(Some("300LYD"));

        complete(&mut r, None, DateTime::now().coerce()).unwrap();
        assert!(!r.is_open());
        assert_eq!(r.cost, Some(Money::from_str("300LYD").unwrap()));

        assert!(matches!(
            complete(&mut r, None, DateTime::now().coerce()),
            Err(E::AlreadyCompleted(id)) if id == r.id,
        ));
    }

    #[test]
    fn final_cost_replaces_estimate() {
        let mut r = record(Some("300LYD"));
        let cost = Money::from_str("450.75LYD").unwrap();

        complete(&mut r, Some(cost), DateTime::now().coerce()).unwrap();
        assert_eq!(r.cost, Some(cost));
    }
}
