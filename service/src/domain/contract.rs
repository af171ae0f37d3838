//! [`Contract`] definitions.

use std::{collections::HashMap, sync::LazyLock};

use common::{money::Currency, unit, DateTime, DateTimeOf, Money, Percent};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing as log;
use uuid::Uuid;

use crate::domain::{billboard, define_text};
#[cfg(doc)]
use crate::domain::Billboard;

/// Rent contract of one or more [`Billboard`]s.
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// Human-readable [`Number`] of this [`Contract`].
    pub number: Number,

    /// [`Customer`] renting the [`Billboard`]s.
    pub customer: Customer,

    /// [`Phone`] of the [`Customer`], if any.
    pub phone: Option<Phone>,

    /// Kind of the advertisement, if specified.
    pub ad_type: Option<AdType>,

    /// IDs of the rented [`Billboard`]s.
    pub billboard_ids: Vec<billboard::Id>,

    /// [`DateTime`] when the rent starts.
    pub starts_at: StartDateTime,

    /// [`DateTime`] when the rent ends.
    pub ends_at: EndDateTime,

    /// Total price to be paid, after the discount and with the installation.
    pub total: Money,

    /// Discount applied to the rent, if any.
    pub discount: Option<Percent>,

    /// One-time installation cost, if any.
    pub installation_cost: Option<Money>,

    /// Rent price of each [`Billboard`] for the whole period.
    pub breakdown: Breakdown,

    /// [`DateTime`] until which the [`Contract`] should be paid, if agreed.
    pub payment_due_at: Option<DueDateTime>,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Contract`] was terminated, if it was.
    pub terminated_at: Option<TerminationDateTime>,
}

impl Contract {
    /// Indicates whether this [`Contract`] still binds its [`Billboard`]s at
    /// the provided moment.
    #[must_use]
    pub fn is_active_at(&self, at: DateTime) -> bool {
        self.terminated_at.is_none() && self.ends_at.coerce() > at
    }

    /// Indicates whether this [`Contract`] binds its [`Billboard`]s now.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active_at(DateTime::now())
    }

    /// Returns the number of billed months of this [`Contract`].
    #[must_use]
    pub fn months(&self) -> u32 {
        months_between(self.starts_at, self.ends_at)
    }
}

/// Returns the number of started 30-day months between the provided
/// [`DateTime`]s, but at least one.
#[must_use]
pub fn months_between(start: StartDateTime, end: EndDateTime) -> u32 {
    let days = start.whole_days_until(&end).max(1);
    u32::try_from((days + 29) / 30).unwrap_or(u32::MAX)
}

/// ID of a [`Contract`].
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

/// Human-readable number of a [`Contract`], like `C-1042`.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Number(String);

impl Number {
    /// Creates a new [`Number`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Creates a new [`Number`] out of the provided sequence value.
    #[must_use]
    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("C-{seq}"))
    }

    /// Checks whether the given `number` is a valid [`Number`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Number`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^C-\d{1,19}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Number {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Number`")
    }
}

define_text! {
    #[doc = "Name of a [`Contract`] customer: a person or a company."]
    Customer(max = 256)
}

define_text! {
    #[doc = "Kind of advertisement placed by a [`Contract`]."]
    AdType(max = 128)
}

/// Phone number of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?\d[\d\s-]{5,18}\d$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Stored rent price of each [`Billboard`] of a [`Contract`].
///
/// Persisted as a JSON object mapping [`billboard::Id`]s to prices. Rows
/// written by older clients may be malformed, so reading never fails.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Breakdown(Value);

impl Breakdown {
    /// Creates a new [`Breakdown`] out of the provided prices.
    #[must_use]
    pub fn new(
        prices: impl IntoIterator<Item = (billboard::Id, Money)>,
    ) -> Self {
        Self(Value::Object(
            prices
                .into_iter()
                .map(|(id, price)| {
                    (id.to_string(), Value::String(price.to_string()))
                })
                .collect(),
        ))
    }

    /// Wraps the raw stored JSON value.
    #[must_use]
    pub const fn from_raw(raw: Value) -> Self {
        Self(raw)
    }

    /// Returns the well-formed prices of this [`Breakdown`].
    ///
    /// Bare numbers are read in the `fallback` [`Currency`]. Malformed entries
    /// are skipped, so they contribute nothing to any sum.
    #[must_use]
    pub fn prices(&self, fallback: Currency) -> HashMap<billboard::Id, Money> {
        let Value::Object(entries) = &self.0 else {
            log::warn!(breakdown = %self.0, "malformed `contract::Breakdown`");
            return HashMap::new();
        };

        entries
            .iter()
            .filter_map(|(id, price)| {
                let parsed = billboard::Id::from_str(id).ok().zip(match price {
                    Value::String(s) => Money::from_str(s).ok(),
                    Value::Number(n) => n
                        .to_string()
                        .parse()
                        .ok()
                        .map(|amount| Money {
                            amount,
                            currency: fallback,
                        }),
                    Value::Null
                    | Value::Bool(_)
                    | Value::Array(_)
                    | Value::Object(_) => None,
                });
                if parsed.is_none() {
                    log::warn!(
                        billboard = %id,
                        %price,
                        "malformed `contract::Breakdown` entry",
                    );
                }
                parsed
            })
            .collect()
    }
}

/// Calculated prices of a [`Contract`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pricing {
    /// Number of billed months.
    pub months: u32,

    /// Rent price of each [`Billboard`] for all the months, in input order.
    pub lines: Vec<(billboard::Id, Money)>,

    /// Sum of the `lines`.
    pub subtotal: Money,

    /// Amount taken off the `subtotal`.
    pub discount: Money,

    /// One-time installation cost.
    pub installation: Money,

    /// Amount to be paid.
    pub total: Money,
}

impl Pricing {
    /// Calculates the [`Pricing`] of renting [`Billboard`]s with the provided
    /// monthly prices.
    ///
    /// [`None`] is returned if any price isn't in the provided [`Currency`].
    #[must_use]
    pub fn calculate(
        monthly: impl IntoIterator<Item = (billboard::Id, Money)>,
        months: u32,
        discount: Option<Percent>,
        installation: Option<Money>,
        currency: Currency,
    ) -> Option<Self> {
        let lines = monthly
            .into_iter()
            .map(|(id, price)| {
                let total = Money {
                    amount: price.amount * Decimal::from(months),
                    currency,
                };
                (price.currency == currency).then_some((id, total))
            })
            .collect::<Option<Vec<_>>>()?;

        let subtotal = lines
            .iter()
            .try_fold(Money::zero(currency), |sum, (_, m)| {
                sum.checked_add(*m)
            })?;
        let discount = discount
            .map_or(Money::zero(currency), |d| subtotal.percent(d));
        let installation = installation.unwrap_or(Money::zero(currency));
        let total = subtotal
            .checked_sub(discount)?
            .checked_add(installation)?;

        Some(Self {
            months,
            lines,
            subtotal,
            discount,
            installation,
            total,
        })
    }
}

/// Marker type indicating a payment deadline.
#[derive(Clone, Copy, Debug)]
pub struct PaymentDue;

/// [`DateTime`] when a [`Contract`] was created.
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;

/// [`DateTime`] when a [`Contract`] rent starts.
pub type StartDateTime = DateTimeOf<(Contract, unit::Start)>;

/// [`DateTime`] when a [`Contract`] rent ends.
pub type EndDateTime = DateTimeOf<(Contract, unit::End)>;

/// [`DateTime`] until which a [`Contract`] should be paid.
pub type DueDateTime = DateTimeOf<(Contract, PaymentDue)>;

/// [`DateTime`] when a [`Contract`] was terminated.
pub type TerminationDateTime = DateTimeOf<(Contract, unit::Closing)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{money::Currency, DateTime, Money, Percent};
    use serde_json::json;

    use crate::domain::billboard;

    use super::{months_between, Breakdown, Number, Phone, Pricing};

    fn lyd(s: &str) -> Money {
        Money::from_str(&format!("{s}LYD")).unwrap()
    }

    #[test]
    fn number_format() {
        assert!(Number::from_str("C-1").is_ok());
        assert!(Number::from_str("C-1042").is_ok());
        assert_eq!(Number::from_sequence(7).as_ref(), "C-7");

        assert!(Number::from_str("C-").is_err());
        assert!(Number::from_str("c-12").is_err());
        assert!(Number::from_str("C-12a").is_err());
        assert!(Number::from_str(" C-12").is_err());
    }

    #[test]
    fn phone_format() {
        assert!(Phone::from_str("+218 91 234 5678").is_ok());
        assert!(Phone::from_str("091-2345678").is_ok());

        assert!(Phone::from_str("12").is_err());
        assert!(Phone::from_str("call me").is_err());
    }

    #[test]
    fn counts_started_months() {
        let at = |s: &str| DateTime::from_rfc3339(s).unwrap();
        let months = |from, to| {
            months_between(at(from).coerce(), at(to).coerce())
        };

        assert_eq!(months("2024-01-01T00:00:00Z", "2024-01-31T00:00:00Z"), 1);
        assert_eq!(months("2024-01-01T00:00:00Z", "2024-03-31T00:00:00Z"), 3);
        assert_eq!(months("2024-01-01T00:00:00Z", "2024-04-01T00:00:00Z"), 4);
        assert_eq!(months("2024-01-01T00:00:00Z", "2024-01-01T10:00:00Z"), 1);
    }

    #[test]
    fn calculates_pricing() {
        let (a, b) = (billboard::Id::new(), billboard::Id::new());

        let pricing = Pricing::calculate(
            [(a, lyd("1500")), (b, lyd("2000"))],
            3,
            Some(Percent::from_str("10").unwrap()),
            Some(lyd("500")),
            Currency::Lyd,
        )
        .unwrap();

        assert_eq!(pricing.lines, [(a, lyd("4500")), (b, lyd("6000"))]);
        assert_eq!(pricing.subtotal, lyd("10500"));
        assert_eq!(pricing.discount, lyd("1050"));
        assert_eq!(pricing.installation, lyd("500"));
        assert_eq!(pricing.total, lyd("9950"));
    }

    #[test]
    fn pricing_requires_single_currency() {
        let usd = Money::from_str("100USD").unwrap();

        assert!(Pricing::calculate(
            [(billboard::Id::new(), usd)],
            1,
            None,
            None,
            Currency::Lyd,
        )
        .is_none());
        assert!(Pricing::calculate(
            [(billboard::Id::new(), lyd("100"))],
            1,
            None,
            Some(usd),
            Currency::Lyd,
        )
        .is_none());
    }

    #[test]
    fn breakdown_round_trips_prices() {
        let (a, b) = (billboard::Id::new(), billboard::Id::new());
        let breakdown = Breakdown::new([(a, lyd("4500")), (b, lyd("6000.50"))]);

        let prices = breakdown.prices(Currency::Lyd);

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[&a], lyd("4500"));
        assert_eq!(prices[&b], lyd("6000.50"));
    }

    #[test]
    fn malformed_breakdown_contributes_nothing() {
        let good = billboard::Id::new();

        assert!(Breakdown::from_raw(json!("oops"))
            .prices(Currency::Lyd)
            .is_empty());
        assert!(Breakdown::from_raw(json!([1, 2, 3]))
            .prices(Currency::Lyd)
            .is_empty());

        let mixed = Breakdown::from_raw(json!({
            (good.to_string()): 1200,
            "not-an-id": "100LYD",
            (billboard::Id::new().to_string()): "lots",
            (billboard::Id::new().to_string()): null,
        }));
        let prices = mixed.prices(Currency::Lyd);

        assert_eq!(prices.len(), 1);
        assert_eq!(prices[&good], lyd("1200"));
    }
}
