//! Maintenance [`Record`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{billboard, define_text};
#[cfg(doc)]
use crate::domain::Billboard;

/// Maintenance job performed on a [`Billboard`].
#[derive(Clone, Debug)]
pub struct Record {
    /// ID of this [`Record`].
    pub id: Id,

    /// ID of the maintained [`Billboard`].
    pub billboard_id: billboard::Id,

    /// [`Kind`] of the maintenance.
    pub kind: Kind,

    /// [`Description`] of the problem or the job.
    pub description: Description,

    /// Cost of the maintenance, once known.
    pub cost: Option<Money>,

    /// [`DateTime`] when the maintenance was reported.
    pub reported_at: ReportDateTime,

    /// [`DateTime`] when the maintenance was completed, if it was.
    pub resolved_at: Option<ResolutionDateTime>,
}

impl Record {
    /// Indicates whether this [`Record`] is still open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.resolved_at.is_none()
    }
}

/// ID of a maintenance [`Record`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Kind of a maintenance [`Record`]."]
    enum Kind {
        #[doc = "Fixing a damaged structure or face."]
        Repair = 1,

        #[doc = "Cleaning the face."]
        Cleaning = 2,

        #[doc = "Periodic inspection."]
        Inspection = 3,

        #[doc = "Replacing the printed face."]
        Replacement = 4,
    }
}

define_text! {
    #[doc = "Description of a maintenance [`Record`]."]
    Description(max = 2048)
}

/// [`DateTime`] when a maintenance [`Record`] was reported.
pub type ReportDateTime = DateTimeOf<(Record, unit::Creation)>;

/// [`DateTime`] when a maintenance [`Record`] was resolved.
pub type ResolutionDateTime = DateTimeOf<(Record, unit::Closing)>;
