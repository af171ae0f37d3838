//! [`Contract`]-related read definitions.

use common::{money::Currency, DateTime, Money};

use crate::domain::Contract;

/// Wrapper around [`Contract`] indicating that it [`is_active()`].
///
/// [`is_active()`]: Contract::is_active
#[derive(Clone, Copy, Debug)]
pub struct Active<T>(pub T);

/// Selector of [`Contract`]s active at the provided moment.
#[derive(Clone, Copy, Debug)]
pub struct ActiveAt(pub DateTime);

/// Selector of non-terminated [`Contract`]s ended by the provided moment
/// which still hold any of their billboards.
#[derive(Clone, Copy, Debug)]
pub struct ExpiredAt(pub DateTime);

/// Selector of [`Contract`]s whose payment due date passed by the provided
/// moment.
#[derive(Clone, Copy, Debug)]
pub struct DueBefore(pub DateTime);

/// Sums of the payments received for a [`Contract`], one per [`Currency`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Paid(Vec<Money>);

impl Paid {
    /// Creates a new [`Paid`] out of the provided per-[`Currency`] sums.
    #[must_use]
    pub fn new(sums: impl IntoIterator<Item = Money>) -> Self {
        Self(sums.into_iter().collect())
    }

    /// Returns the paid amount in the provided [`Currency`].
    #[must_use]
    pub fn in_currency(&self, currency: Currency) -> Money {
        self.0
            .iter()
            .filter(|m| m.currency == currency)
            .fold(Money::zero(currency), |sum, m| Money {
                amount: sum.amount + m.amount,
                currency,
            })
    }
}

/// Payment balance of a [`Contract`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Balance {
    /// Amount to be paid in total.
    pub total: Money,

    /// Amount paid so far.
    pub paid: Money,
}

impl Balance {
    /// Calculates the [`Balance`] of the provided [`Contract`].
    ///
    /// Payments in other currencies than the [`Contract`] total are not
    /// counted.
    #[must_use]
    pub fn of(contract: &Contract, paid: &Paid) -> Self {
        Self {
            total: contract.total,
            paid: paid.in_currency(contract.total.currency),
        }
    }

    /// Returns the amount left to be paid.
    ///
    /// Negative if the [`Contract`] was overpaid.
    #[must_use]
    pub fn remaining(&self) -> Money {
        Money {
            amount: self.total.amount - self.paid.amount,
            currency: self.total.currency,
        }
    }

    /// Indicates whether nothing is left to be paid.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.remaining().is_positive()
    }
}

pub mod list {
    //! [`Contract`]s list definitions.

    #[cfg(doc)]
    use crate::domain::Contract;

    /// Filter of a [`Contract`]s list, ordered from the newest.
    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    pub struct Filter {
        /// Case-insensitive part of the customer name.
        pub customer: Option<String>,

        /// Whether only active [`Contract`]s are listed.
        pub active_only: bool,
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{money::Currency, Money};

    use super::Paid;

    #[test]
    fn paid_is_counted_per_currency() {
        let paid = Paid::new([
            Money::from_str("1000LYD").unwrap(),
            Money::from_str("50USD").unwrap(),
            Money::from_str("250.50LYD").unwrap(),
        ]);

        assert_eq!(
            paid.in_currency(Currency::Lyd),
            Money::from_str("1250.50LYD").unwrap(),
        );
        assert_eq!(
            paid.in_currency(Currency::Eur),
            Money::zero(Currency::Eur),
        );
    }
}
