//! GraphQL API definitions.

pub mod billboard;
pub mod contract;
pub mod maintenance;
mod mutation;
pub mod payment;
mod query;
pub mod report;
pub mod scalar;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{
    billboard::Billboard, contract::Contract, maintenance::Record,
    mutation::Mutation, payment::Payment, query::Query,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
