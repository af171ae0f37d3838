//! Report definitions.

use std::num::TryFromIntError;

use common::Money;
use juniper::graphql_object;
use service::query::report;

use crate::{api, Context};

/// Inventory statistics of a single municipality.
#[derive(Clone, Debug)]
pub struct Municipality {
    /// Municipality, if known.
    municipality: Option<api::billboard::Municipality>,

    /// Number of all `Billboard`s.
    total: i32,

    /// Number of available `Billboard`s.
    available: i32,

    /// Number of rented `Billboard`s.
    rented: i32,

    /// Number of `Billboard`s under maintenance.
    maintenance: i32,

    /// Number of removed `Billboard`s.
    removed: i32,

    /// Revenue of the active `Contract`s.
    revenue: Money,
}

impl TryFrom<report::municipality::Row> for Municipality {
    type Error = TryFromIntError;

    fn try_from(row: report::municipality::Row) -> Result<Self, Self::Error> {
        let report::municipality::Row {
            municipality,
            total,
            available,
            rented,
            maintenance,
            removed,
            revenue,
        } = row;
        Ok(Self {
            municipality: municipality.map(Into::into),
            total: total.try_into()?,
            available: available.try_into()?,
            rented: rented.try_into()?,
            maintenance: maintenance.try_into()?,
            removed: removed.try_into()?,
            revenue,
        })
    }
}

/// Inventory statistics of a single municipality.
#[graphql_object(name = "MunicipalityReportRow", context = Context)]
impl Municipality {
    /// Municipality, or `null` for `Billboard`s without one.
    pub fn municipality(&self) -> Option<&api::billboard::Municipality> {
        self.municipality.as_ref()
    }

    /// Number of all `Billboard`s.
    pub fn total(&self) -> i32 {
        self.total
    }

    /// Number of available `Billboard`s.
    pub fn available(&self) -> i32 {
        self.available
    }

    /// Number of rented `Billboard`s.
    pub fn rented(&self) -> i32 {
        self.rented
    }

    /// Number of `Billboard`s under maintenance.
    pub fn maintenance(&self) -> i32 {
        self.maintenance
    }

    /// Number of removed `Billboard`s.
    pub fn removed(&self) -> i32 {
        self.removed
    }

    /// Expected revenue of the active `Contract`s renting the
    /// `Billboard`s of this municipality.
    pub fn revenue(&self) -> Money {
        self.revenue
    }
}

/// `Contract` with an overdue payment.
#[derive(Clone, Debug)]
pub struct Overdue(report::overdue::Row);

impl From<report::overdue::Row> for Overdue {
    fn from(row: report::overdue::Row) -> Self {
        Self(row)
    }
}

/// `Contract` with an overdue payment.
#[graphql_object(name = "OverdueReportRow", context = Context)]
impl Overdue {
    /// `Contract` with an overdue payment.
    pub fn contract(&self) -> api::Contract {
        self.0.contract.clone().into()
    }

    /// Amount to be paid in total.
    pub fn total(&self) -> Money {
        self.0.total
    }

    /// Amount paid so far.
    pub fn paid(&self) -> Money {
        self.0.paid
    }

    /// Amount left to be paid.
    pub fn remaining(&self) -> Money {
        self.0.remaining
    }

    /// Whole days passed since the payment due date.
    pub fn days_overdue(&self) -> i32 {
        i32::try_from(self.0.days_overdue).unwrap_or(i32::MAX)
    }
}
