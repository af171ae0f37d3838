//! [`Command`] for creating a new [`Billboard`].

use common::{operations::Insert, DateTime, Money};
use tracerr::Traced;

use crate::{
    domain::{billboard, Billboard},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Billboard`].
#[derive(Clone, Debug)]
pub struct CreateBillboard {
    /// Name of a new [`Billboard`].
    pub name: billboard::Name,

    /// Landmark of a new [`Billboard`].
    pub landmark: Option<billboard::Landmark>,

    /// Face size of a new [`Billboard`].
    pub size: billboard::Size,

    /// Commercial level of a new [`Billboard`].
    pub level: billboard::Level,

    /// Municipality of a new [`Billboard`].
    pub municipality: Option<billboard::Municipality>,

    /// City of a new [`Billboard`].
    pub city: Option<billboard::City>,

    /// District of a new [`Billboard`].
    pub district: Option<billboard::District>,

    /// Coordinates of a new [`Billboard`], as entered.
    pub coordinates: billboard::Coordinates,

    /// Monthly rent price of a new [`Billboard`].
    pub price: Money,

    /// Design image of a new [`Billboard`].
    pub design_url: Option<billboard::ImageUrl>,

    /// Installation photo of a new [`Billboard`].
    pub installation_url: Option<billboard::ImageUrl>,
}

impl<Db> Command<CreateBillboard> for Service<Db>
where
    Db: Database<Insert<Billboard>, Err = Traced<database::Error>>,
{
    type Ok = Billboard;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateBillboard,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateBillboard {
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
        } = cmd;

        let billboard = Billboard {
            id: billboard::Id::new(),
            name,
            landmark,
            size,
            level,
            municipality,
            city,
            district,
            coordinates,
            status: billboard::Status::Available,
            contract_number: None,
            price,
            design_url,
            installation_url,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(billboard.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(billboard)
    }
}

/// Error of [`CreateBillboard`] [`Command`] execution.
pub type ExecutionError = database::Error;
