//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{
    api,
    error::{BillboardError, ContractError, PaymentError},
    AsError, Context, Error,
};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Billboard` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BILLBOARD_NOT_EXISTS` - the `Billboard` with the specified ID does
    ///                            not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "billboard",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn billboard(
        id: api::billboard::Id,
        ctx: &Context,
    ) -> Result<api::Billboard, Error> {
        ctx.service()
            .execute(query::billboard::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| BillboardError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the `Billboard`s passing the provided `BillboardFilter`, in name
    /// order.
    ///
    /// `Billboard`s with malformed coordinates are listed too.
    #[tracing::instrument(
        skip_all,
        fields(
            filter = ?filter,
            gql.name = "billboards",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn billboards(
        filter: Option<api::billboard::Filter>,
        ctx: &Context,
    ) -> Result<Vec<api::Billboard>, Error> {
        ctx.service()
            .execute(query::billboards::List::from(
                filter.unwrap_or_default(),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|bs| bs.into_iter().map(Into::into).collect())
    }

    /// Places the `Billboard`s passing the provided `BillboardFilter` on the
    /// map.
    ///
    /// `Billboard`s with malformed coordinates are skipped.
    #[tracing::instrument(
        skip_all,
        fields(
            filter = ?filter,
            gql.name = "markers",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn markers(
        filter: Option<api::billboard::Filter>,
        ctx: &Context,
    ) -> Result<api::billboard::Markers, Error> {
        ctx.service()
            .execute(query::billboards::Markers(
                filter.unwrap_or_default().into(),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Contract` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does not
    ///                           exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "contract",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        ctx.service()
            .execute(query::contract::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ContractError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the `Contract`s, from the newest.
    #[tracing::instrument(
        skip_all,
        fields(
            active_only = ?active_only,
            customer = ?customer,
            gql.name = "contracts",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contracts(
        customer: Option<String>,
        active_only: Option<bool>,
        ctx: &Context,
    ) -> Result<Vec<api::Contract>, Error> {
        ctx.service()
            .execute(query::contracts::List::by(read::contract::list::Filter {
                customer: customer.filter(|c| !c.trim().is_empty()),
                active_only: active_only.unwrap_or_default(),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cs| cs.into_iter().map(Into::into).collect())
    }

    /// Returns the `Payment` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAYMENT_NOT_EXISTS` - the `Payment` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "payment",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn payment(
        id: api::payment::Id,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        ctx.service()
            .execute(query::payment::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| PaymentError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Calculates the inventory statistics per municipality.
    ///
    /// `Billboard`s without a municipality go last.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "municipalityReport",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn municipality_report(
        ctx: &Context,
    ) -> Result<Vec<api::report::Municipality>, Error> {
        ctx.service()
            .execute(query::report::Municipality)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .into_iter()
            .map(api::report::Municipality::try_from)
            .collect::<Result<_, _>>()
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Lists the `Contract`s whose payment is overdue, the most overdue
    /// first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "overdueReport",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn overdue_report(
        ctx: &Context,
    ) -> Result<Vec<api::report::Overdue>, Error> {
        ctx.service()
            .execute(query::report::Overdue)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rows| rows.into_iter().map(Into::into).collect())
    }
}
