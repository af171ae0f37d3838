//! [`Command`] for editing a [`Billboard`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{billboard, Billboard},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for editing any subset of [`Billboard`] fields.
///
/// [`None`] leaves a field untouched, while `Some(None)` clears an optional
/// one.
#[derive(Clone, Debug, Default)]
pub struct UpdateBillboard {
    /// ID of the [`Billboard`] to be edited.
    pub billboard_id: billboard::Id,

    /// New name of the [`Billboard`].
    pub name: Option<billboard::Name>,

    /// New landmark of the [`Billboard`].
    pub landmark: Option<Option<billboard::Landmark>>,

    /// New face size of the [`Billboard`].
    pub size: Option<billboard::Size>,

    /// New commercial level of the [`Billboard`].
    pub level: Option<billboard::Level>,

    /// New municipality of the [`Billboard`].
    pub municipality: Option<Option<billboard::Municipality>>,

    /// New city of the [`Billboard`].
    pub city: Option<Option<billboard::City>>,

    /// New district of the [`Billboard`].
    pub district: Option<Option<billboard::District>>,

    /// New coordinates of the [`Billboard`], as entered.
    pub coordinates: Option<billboard::Coordinates>,

    /// New monthly rent price of the [`Billboard`].
    pub price: Option<Money>,

    /// New design image of the [`Billboard`].
    pub design_url: Option<Option<billboard::ImageUrl>>,

    /// New installation photo of the [`Billboard`].
    pub installation_url: Option<Option<billboard::ImageUrl>>,
}

impl UpdateBillboard {
    /// Applies this [`UpdateBillboard`] to the provided [`Billboard`].
    fn apply(self, billboard: &mut Billboard) {
        let Self {
            billboard_id: _,
            name,
            landmark,
            size,
            level,
            municipality,
            city,
            district,
            coordinates,
            price,
            design_url,
            installation_url,
        } = self;

        if let Some(name) = name {
            billboard.name = name;
        }
        if let Some(landmark) = landmark {
            billboard.landmark = landmark;
        }
        if let Some(size) = size {
            billboard.size = size;
        }
        if let Some(level) = level {
            billboard.level = level;
        }
        if let Some(municipality) = municipality {
            billboard.municipality = municipality;
        }
        if let Some(city) = city {
            billboard.city = city;
        }
        if let Some(district) = district {
            billboard.district = district;
        }
        if let Some(coordinates) = coordinates {
            billboard.coordinates = coordinates;
        }
        if let Some(price) = price {
            billboard.price = price;
        }
        if let Some(url) = design_url {
            billboard.design_url = url;
        }
        if let Some(url) = installation_url {
            billboard.installation_url = url;
        }
    }
}

impl<Db> Command<UpdateBillboard> for Service<Db>
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
        cmd: UpdateBillboard,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let id = cmd.billboard_id;

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
        if billboard.status == billboard::Status::Removed {
            return Err(tracerr::new!(E::BillboardRemoved(id)));
        }

        cmd.apply(&mut billboard);

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

/// Error of [`UpdateBillboard`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
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

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{money::Currency, DateTime, Money};

    use crate::domain::{billboard, Billboard};

    use super::UpdateBillboard;

    fn billboard() -> Billboard {
        Billboard {
            id: billboard::Id::new(),
            name: billboard::Name::new("Airport Road").unwrap(),
            landmark: billboard::Landmark::new("Near the bridge"),
            size: billboard::Size::new("4x12").unwrap(),
            level: billboard::Level::A,
            municipality: billboard::Municipality::new("Tripoli Center"),
            city: billboard::City::new("Tripoli"),
            district: None,
            coordinates: billboard::Coordinates::new("32.88,13.19").unwrap(),
            status: billboard::Status::Available,
            contract_number: None,
            price: Money::from_str("1500LYD").unwrap(),
            design_url: None,
            installation_url: None,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn touches_only_provided_fields() {
        let mut b = billboard();
        let before = b.clone();

        UpdateBillboard {
            billboard_id: b.id,
            price: Some(Money {
                amount: 2000.into(),
                currency: Currency::Lyd,
            }),
            landmark: Some(None),
            ..UpdateBillboard::default()
        }
        .apply(&mut b);

        assert_eq!(b.price, Money::from_str("2000LYD").unwrap());
        assert_eq!(b.landmark, None);
        assert_eq!(b.name, before.name);
        assert_eq!(b.city, before.city);
        assert_eq!(b.coordinates, before.coordinates);
        assert_eq!(b.status, before.status);
    }

    #[test]
    fn empty_update_changes_nothing() {
        let mut b = billboard();
        let before = b.clone();

        UpdateBillboard {
            billboard_id: b.id,
            ..UpdateBillboard::default()
        }
        .apply(&mut b);

        assert_eq!(b.name, before.name);
        assert_eq!(b.landmark, before.landmark);
        assert_eq!(b.size, before.size);
        assert_eq!(b.price, before.price);
    }
}
