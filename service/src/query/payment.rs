//! [`Query`] collection related to a single [`Payment`].

use common::operations::By;

use crate::domain::{payment, Payment};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Payment`] by its [`payment::Id`].
pub type ById = DatabaseQuery<By<Option<Payment>, payment::Id>>;
