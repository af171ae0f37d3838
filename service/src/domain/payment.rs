//! [`Payment`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{contract, define_text};
#[cfg(doc)]
use crate::domain::Contract;

/// Payment received for a [`Contract`].
#[derive(Clone, Debug)]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: Id,

    /// ID of the paid [`Contract`].
    pub contract_id: contract::Id,

    /// Paid amount.
    pub amount: Money,

    /// [`Method`] of this [`Payment`].
    pub method: Method,

    /// Free-form [`Note`] of the cashier, if any.
    pub note: Option<Note>,

    /// Number of the receipt issued for this [`Payment`].
    pub receipt_number: ReceiptNumber,

    /// [`DateTime`] when this [`Payment`] was received.
    pub paid_at: PaymentDateTime,
}

/// ID of a [`Payment`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Method of a [`Payment`]."]
    enum Method {
        #[doc = "Cash at the office."]
        Cash = 1,

        #[doc = "Bank transfer."]
        Transfer = 2,

        #[doc = "Bank check."]
        Check = 3,
    }
}

define_text! {
    #[doc = "Note attached to a [`Payment`]."]
    Note(max = 1024)
}

/// Number of a [`Payment`] receipt, like `R-311`.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ReceiptNumber(String);

impl ReceiptNumber {
    /// Creates a new [`ReceiptNumber`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Creates a new [`ReceiptNumber`] out of the provided sequence value.
    #[must_use]
    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("R-{seq}"))
    }

    /// Checks whether the given `number` is a valid [`ReceiptNumber`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`ReceiptNumber`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^R-\d{1,19}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for ReceiptNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ReceiptNumber`")
    }
}

/// Marker type indicating a [`Payment`] receipt.
#[derive(Clone, Copy, Debug)]
pub struct Receipt;

/// [`DateTime`] when a [`Payment`] was received.
pub type PaymentDateTime = DateTimeOf<(Payment, Receipt)>;
