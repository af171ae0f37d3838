//! [`Query`] collection related to a single [`Billboard`].

use std::collections::HashMap;

use common::operations::By;

use crate::domain::{billboard, maintenance, Billboard, Contract};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Billboard`] by its [`billboard::Id`].
pub type ById = DatabaseQuery<By<Option<Billboard>, billboard::Id>>;

/// Queries [`Billboard`]s by their [`billboard::Id`]s.
///
/// Missing [`Billboard`]s are omitted.
pub type ByIds = DatabaseQuery<
    By<HashMap<billboard::Id, Billboard>, Vec<billboard::Id>>,
>;

/// Queries all the [`Contract`]s of a [`Billboard`], from the latest.
pub type Contracts = DatabaseQuery<By<Vec<Contract>, billboard::Id>>;

/// Queries the maintenance history of a [`Billboard`], from the latest.
pub type Maintenance =
    DatabaseQuery<By<Vec<maintenance::Record>, billboard::Id>>;
