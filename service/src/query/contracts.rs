//! [`Query`] collection related to multiple [`Contract`]s.

use common::operations::By;

use crate::{domain::Contract, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries [`Contract`]s passing a [`read::contract::list::Filter`], from the
/// newest.
pub type List = DatabaseQuery<By<Vec<Contract>, read::contract::list::Filter>>;
