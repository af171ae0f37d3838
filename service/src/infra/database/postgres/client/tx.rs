//! [`Tx`] client definitions.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

use super::NonTx;

/// Transactional Postgres database client.
///
/// Clones share the same transaction.
#[derive(Clone, Debug)]
pub struct Tx {
    /// Open [`connection::Tx`], taken out on commit.
    inner: Arc<RwLock<Option<connection::Tx>>>,
}

impl Tx {
    /// Begins a new [`Tx`] client in a connection of the provided [`NonTx`]
    /// client.
    ///
    /// # Errors
    ///
    /// If failed to take a connection or to begin a transaction in it.
    pub async fn begin(
        client: &NonTx,
    ) -> Result<Self, Traced<database::Error>> {
        let conn = client.connection().await.map_err(tracerr::wrap!())?;
        let tx = connection::Tx::begin(conn)
            .await
            .map_err(tracerr::wrap!())?;
        Ok(Self {
            inner: Arc::new(RwLock::new(Some(tx))),
        })
    }

    /// Commits this [`Tx`] client.
    ///
    /// Committing an already committed [`Tx`] client is a no-op.
    ///
    /// # Errors
    ///
    /// If failed to commit transaction of this [`Tx`] client.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let tx = self.inner.write().await.take();
        if let Some(tx) = tx {
            tx.commit().await.map_err(tracerr::wrap!())
        } else {
            Ok(())
        }
    }
}

/// Runs the provided [`Connection`] method on the open transaction of a
/// [`Tx`] client.
macro_rules! on_tx {
    ($this:ident.$method:ident($($arg:expr),*)) => {{
        let guard = $this.inner.read().await;
        guard
            .as_ref()
            .ok_or_else(|| tracerr::new!(postgres::Error::TxFinished))
            .map_err(tracerr::map_from)?
            .$method($($arg),*)
            .await
            .map_err(tracerr::wrap!())
    }};
}

impl Connection for Tx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        on_tx!(self.query(stmt, params))
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        on_tx!(self.query_opt(stmt, params))
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        on_tx!(self.exec(stmt, params))
    }
}
