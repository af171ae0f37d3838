//! [`Payment`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// A payment received for a `Contract`.
#[derive(Clone, Debug, From)]
pub struct Payment(domain::Payment);

/// A payment received for a `Contract`.
#[graphql_object(context = Context)]
impl Payment {
    /// Unique identifier of this `Payment`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the paid `Contract`.
    pub fn contract_id(&self) -> api::contract::Id {
        self.0.contract_id.into()
    }

    /// Received amount.
    pub fn amount(&self) -> Money {
        self.0.amount
    }

    /// Method this `Payment` was made with.
    pub fn method(&self) -> Method {
        self.0.method.into()
    }

    /// Note attached to this `Payment`.
    pub fn note(&self) -> Option<Note> {
        self.0.note.clone().map(Into::into)
    }

    /// Number of the receipt issued for this `Payment`.
    pub fn receipt_number(&self) -> ReceiptNumber {
        self.0.receipt_number.clone().into()
    }

    /// `DateTime` when this `Payment` was received.
    pub fn paid_at(&self) -> DateTime {
        self.0.paid_at.coerce()
    }
}

/// Unique identifier of a `Payment`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::payment::Id)]
#[into(domain::payment::Id)]
#[graphql(name = "PaymentId", transparent)]
pub struct Id(Uuid);

/// Note attached to a `Payment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "PaymentNote", with = scalar::Via::<domain::payment::Note>)]
pub struct Note(domain::payment::Note);

/// Number of a `Payment` receipt, like `R-311`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ReceiptNumber",
    with = scalar::Via::<domain::payment::ReceiptNumber>,
)]
pub struct ReceiptNumber(domain::payment::ReceiptNumber);

/// Method of a `Payment`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "PaymentMethod")]
pub enum Method {
    /// Cash at the office.
    Cash,

    /// Bank transfer.
    Transfer,

    /// Bank check.
    Check,
}

impl From<domain::payment::Method> for Method {
    fn from(method: domain::payment::Method) -> Self {
        use domain::payment::Method as M;
        match method {
            M::Cash => Self::Cash,
            M::Transfer => Self::Transfer,
            M::Check => Self::Check,
        }
    }
}

impl From<Method> for domain::payment::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Cash => Self::Cash,
            Method::Transfer => Self::Transfer,
            Method::Check => Self::Check,
        }
    }
}
