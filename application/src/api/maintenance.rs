//! Maintenance [`Record`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// Maintenance record of a `Billboard`.
#[derive(Clone, Debug, From)]
pub struct Record(domain::maintenance::Record);

/// Maintenance record of a `Billboard`.
#[graphql_object(name = "MaintenanceRecord", context = Context)]
impl Record {
    /// Unique identifier of this `MaintenanceRecord`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the maintained `Billboard`.
    pub fn billboard_id(&self) -> api::billboard::Id {
        self.0.billboard_id.into()
    }

    /// Kind of the maintenance.
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// Description of the issue.
    pub fn description(&self) -> Description {
        self.0.description.clone().into()
    }

    /// Cost of the maintenance, if known.
    pub fn cost(&self) -> Option<Money> {
        self.0.cost
    }

    /// `DateTime` when the issue was reported.
    pub fn reported_at(&self) -> DateTime {
        self.0.reported_at.coerce()
    }

    /// `DateTime` when the maintenance was completed.
    pub fn resolved_at(&self) -> Option<DateTime> {
        self.0.resolved_at.map(|at| at.coerce())
    }

    /// Indicator whether the maintenance is still in progress.
    pub fn is_open(&self) -> bool {
        self.0.is_open()
    }
}

/// Unique identifier of a `MaintenanceRecord`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::maintenance::Id)]
#[into(domain::maintenance::Id)]
#[graphql(name = "MaintenanceRecordId", transparent)]
pub struct Id(Uuid);

/// Description of a `MaintenanceRecord`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MaintenanceDescription",
    with = scalar::Via::<domain::maintenance::Description>,
)]
pub struct Description(domain::maintenance::Description);

/// Kind of a `MaintenanceRecord`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "MaintenanceKind")]
pub enum Kind {
    /// Fixing a damaged structure or face.
    Repair,

    /// Cleaning the face.
    Cleaning,

    /// Periodic inspection.
    Inspection,

    /// Replacing the face or the structure.
    Replacement,
}

impl From<domain::maintenance::Kind> for Kind {
    fn from(kind: domain::maintenance::Kind) -> Self {
        use domain::maintenance::Kind as K;
        match kind {
            K::Repair => Self::Repair,
            K::Cleaning => Self::Cleaning,
            K::Inspection => Self::Inspection,
            K::Replacement => Self::Replacement,
        }
    }
}

impl From<Kind> for domain::maintenance::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Repair => Self::Repair,
            Kind::Cleaning => Self::Cleaning,
            Kind::Inspection => Self::Inspection,
            Kind::Replacement => Self::Replacement,
        }
    }
}
