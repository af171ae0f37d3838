//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};

use crate::{define_kind, Percent};

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a zero [`Money`] amount in the provided [`Currency`].
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Adds the provided [`Money`] to this one.
    ///
    /// [`None`] is returned if the [`Currency`]s differ.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        (self.currency == other.currency).then(|| Self {
            amount: self.amount + other.amount,
            currency: self.currency,
        })
    }

    /// Subtracts the provided [`Money`] from this one.
    ///
    /// [`None`] is returned if the [`Currency`]s differ.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        (self.currency == other.currency).then(|| Self {
            amount: self.amount - other.amount,
            currency: self.currency,
        })
    }

    /// Returns the part of this [`Money`] the provided [`Percent`] makes.
    #[must_use]
    pub fn percent(self, percent: Percent) -> Self {
        Self {
            amount: (self.amount * percent.as_decimal() / Decimal::ONE_HUNDRED)
                .round_dp(2),
            currency: self.currency,
        }
    }

    /// Indicates whether this [`Money`] amount is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Formats this [`Money`] for humans: thousands separated by commas, two
    /// fractional digits and the [`Currency`] code after a space.
    #[must_use]
    pub fn to_human(&self) -> String {
        let rounded = self.amount.round_dp(2).abs();
        let integer = rounded.trunc().to_u128().unwrap_or_default().to_string();
        let fraction = ((rounded.fract() * Decimal::ONE_HUNDRED)
            .to_u8()
            .unwrap_or_default())
        .to_string();

        let mut grouped = String::with_capacity(integer.len() + 8);
        for (i, c) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        let sign = if self.amount.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}{grouped}.{fraction:0>2} {}", self.currency)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        match amount.is_integer().then(|| amount.to_i128()).flatten() {
            Some(int) => write!(f, "{int}{currency}"),
            None => write!(f, "{amount}{currency}"),
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || !s.is_char_boundary(s.len() - 3) {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "Libyan Dinar."]
        Lyd = 1,

        #[doc = "US Dollar."]
        Usd = 2,

        #[doc = "Euro."]
        Eur = 3,
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{major}.{minor}{currency}` format, where:
    /// - `major` is an integer;
    /// - `minor` is an optional integer;
    /// - `currency` is a three-letter currency code.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use crate::Percent;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn lyd(s: &str) -> Money {
        Money {
            amount: decimal(s),
            currency: Currency::Lyd,
        }
    }

    #[test]
    fn from_str() {
        assert_eq!(Money::from_str("1500.50LYD").unwrap(), lyd("1500.50"));
        assert_eq!(
            Money::from_str("99USD").unwrap(),
            Money {
                amount: decimal("99"),
                currency: Currency::Usd,
            },
        );
        assert_eq!(Money::from_str("1500lyd").unwrap(), lyd("1500"));

        assert!(Money::from_str("1500").is_err());
        assert!(Money::from_str("1500Ly").is_err());
        assert!(Money::from_str("1500Dinar").is_err());
        assert!(Money::from_str("abcLYD").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(lyd("1500.50").to_string(), "1500.50LYD");
        assert_eq!(lyd("1500.00").to_string(), "1500LYD");
        assert_eq!(lyd("1500").to_string(), "1500LYD");
    }

    #[test]
    fn arithmetic_requires_same_currency() {
        assert_eq!(lyd("100").checked_add(lyd("50.5")), Some(lyd("150.5")));
        assert_eq!(lyd("100").checked_sub(lyd("150")), Some(lyd("-50")));

        let usd = Money {
            amount: decimal("1"),
            currency: Currency::Usd,
        };
        assert_eq!(lyd("100").checked_add(usd), None);
        assert_eq!(lyd("100").checked_sub(usd), None);
    }

    #[test]
    fn percent() {
        let ten = Percent::new(decimal("10")).unwrap();
        assert_eq!(lyd("1234.56").percent(ten), lyd("123.46"));
    }

    #[test]
    fn to_human() {
        assert_eq!(lyd("0").to_human(), "0.00 LYD");
        assert_eq!(lyd("999.5").to_human(), "999.50 LYD");
        assert_eq!(lyd("12500").to_human(), "12,500.00 LYD");
        assert_eq!(lyd("1234567.891").to_human(), "1,234,567.89 LYD");
        assert_eq!(lyd("-1500.25").to_human(), "-1,500.25 LYD");
    }
}
