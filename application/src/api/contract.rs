//! [`Contract`]-related definitions.

use common::{DateTime, Money, Percent};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLObject, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{
    api, api::scalar, error::ContractError, AsError, Context, Error,
};

/// A rent agreement over one or more `Billboard`s.
#[derive(Clone, Debug, From)]
pub struct Contract(domain::Contract);

/// A rent agreement over one or more `Billboard`s.
#[graphql_object(context = Context)]
impl Contract {
    /// Unique identifier of this `Contract`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Human-readable number of this `Contract`.
    pub fn number(&self) -> Number {
        self.0.number.clone().into()
    }

    /// Customer renting the `Billboard`s.
    pub fn customer(&self) -> Customer {
        self.0.customer.clone().into()
    }

    /// Phone number of the customer.
    pub fn phone(&self) -> Option<Phone> {
        self.0.phone.clone().map(Into::into)
    }

    /// Kind of the advertisement.
    pub fn ad_type(&self) -> Option<AdType> {
        self.0.ad_type.clone().map(Into::into)
    }

    /// Rented `Billboard`s, in the `Contract` order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.billboards",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn billboards(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Billboard>, Error> {
        let ids = self.0.billboard_ids.clone();
        let mut billboards = ctx
            .service()
            .execute(query::billboard::ByIds::by(ids))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok(self
            .0
            .billboard_ids
            .iter()
            .filter_map(|id| billboards.remove(id))
            .map(Into::into)
            .collect())
    }

    /// `DateTime` when the rent period starts.
    pub fn starts_at(&self) -> DateTime {
        self.0.starts_at.coerce()
    }

    /// `DateTime` when the rent period ends.
    pub fn ends_at(&self) -> DateTime {
        self.0.ends_at.coerce()
    }

    /// Number of billed months.
    pub fn months(&self) -> i32 {
        i32::try_from(self.0.months()).unwrap_or(i32::MAX)
    }

    /// Total price of this `Contract`.
    pub fn total(&self) -> Money {
        self.0.total
    }

    /// Discount applied to the rent.
    pub fn discount(&self) -> Option<Percent> {
        self.0.discount
    }

    /// Cost of installing the advertisements.
    pub fn installation_cost(&self) -> Option<Money> {
        self.0.installation_cost
    }

    /// Stored price of each rented `Billboard` for the whole period.
    ///
    /// Malformed stored entries are omitted.
    pub fn breakdown(&self) -> Vec<BreakdownLine> {
        let mut prices = self.0.breakdown.prices(self.0.total.currency);
        self.0
            .billboard_ids
            .iter()
            .filter_map(|id| {
                Some(BreakdownLine {
                    billboard_id: (*id).into(),
                    price: prices.remove(id)?,
                })
            })
            .collect()
    }

    /// `DateTime` when the payment is due.
    pub fn payment_due_at(&self) -> Option<DateTime> {
        self.0.payment_due_at.map(|at| at.coerce())
    }

    /// `DateTime` when this `Contract` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Contract` was terminated early.
    pub fn terminated_at(&self) -> Option<DateTime> {
        self.0.terminated_at.map(|at| at.coerce())
    }

    /// Indicator whether this `Contract` is active now.
    pub fn is_active(&self) -> bool {
        self.0.is_active()
    }

    /// `Payment`s received for this `Contract`, from the earliest.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.payments",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn payments(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Payment>, Error> {
        ctx.service()
            .execute(query::contract::Payments::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ps| ps.into_iter().map(Into::into).collect())
    }

    /// Payment balance of this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.balance",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn balance(&self, ctx: &Context) -> Result<Balance, Error> {
        ctx.service()
            .execute(query::contract::Balance {
                contract_id: self.0.id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .map(Into::into)
            .ok_or_else(|| ContractError::NotExists.into())
            .map_err(ctx.error())
    }
}

/// Stored price of a single `Billboard` of a `Contract`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "ContractBreakdownLine")]
pub struct BreakdownLine {
    /// ID of the rented `Billboard`.
    pub billboard_id: api::billboard::Id,

    /// Price for the whole period.
    pub price: Money,
}

/// Payment balance of a `Contract`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "ContractBalance")]
pub struct Balance {
    /// Amount to be paid in total.
    pub total: Money,

    /// Amount paid so far.
    pub paid: Money,

    /// Amount left to be paid.
    pub remaining: Money,
}

impl From<service::read::contract::Balance> for Balance {
    fn from(b: service::read::contract::Balance) -> Self {
        Self {
            total: b.total,
            paid: b.paid,
            remaining: b.remaining(),
        }
    }
}

/// Unique identifier of a `Contract`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::contract::Id)]
#[into(domain::contract::Id)]
#[graphql(name = "ContractId", transparent)]
pub struct Id(Uuid);

/// Human-readable number of a `Contract`, like `C-1024`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ContractNumber",
    with = scalar::Via::<domain::contract::Number>,
)]
pub struct Number(domain::contract::Number);

/// Name of a `Contract` customer: a person or a company.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ContractCustomer",
    with = scalar::Via::<domain::contract::Customer>,
)]
pub struct Customer(domain::contract::Customer);

/// Phone number of a `Contract` customer.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ContractPhone",
    with = scalar::Via::<domain::contract::Phone>,
)]
pub struct Phone(domain::contract::Phone);

/// Kind of advertisement placed by a `Contract`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ContractAdType",
    with = scalar::Via::<domain::contract::AdType>,
)]
pub struct AdType(domain::contract::AdType);
