//! [`Query`] collection related to multiple [`Billboard`]s.

use std::collections::HashSet;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{billboard, Billboard},
    infra::{database, Database},
    read, Query, Service,
};

/// [`Query`] listing the [`Billboard`]s passing a [`map::Filter`], in name
/// order.
///
/// [`Billboard`]s with malformed coordinates are listed too.
#[derive(Clone, Debug, Default)]
pub struct List {
    /// [`map::Filter`] to apply.
    pub filter: map::Filter,

    /// IDs of the currently selected [`Billboard`]s.
    pub selection: HashSet<billboard::Id>,

    /// Whether removed [`Billboard`]s are listed too.
    pub include_removed: bool,
}

/// [`Query`] placing the [`Billboard`]s passing a [`map::Filter`] on the map.
///
/// [`Billboard`]s with malformed coordinates are skipped.
#[derive(Clone, Debug, Default)]
pub struct Markers(pub List);

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Billboard>, read::billboard::Inventory>>,
        Ok = Vec<Billboard>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Billboard>;
    type Err = Traced<database::Error>;

    async fn execute(&self, query: List) -> Result<Self::Ok, Self::Err> {
        let List {
            filter,
            selection,
            include_removed,
        } = query;

        let inventory = self
            .database()
            .execute(Select(By::new(read::billboard::Inventory {
                include_removed,
            })))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(filter
            .apply(&inventory, &selection)
            .into_iter()
            .cloned()
            .collect())
    }
}

impl<Db> Query<Markers> for Service<Db>
where
    Self: Query<List, Ok = Vec<Billboard>, Err = Traced<database::Error>>,
{
    type Ok = read::billboard::Markers;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Markers(list): Markers,
    ) -> Result<Self::Ok, Self::Err> {
        let visible = self.execute(list).await.map_err(tracerr::wrap!())?;
        Ok(read::billboard::Markers::place(&visible))
    }
}
