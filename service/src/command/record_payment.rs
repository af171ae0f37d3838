//! [`Command`] for recording a [`Payment`] of a [`Contract`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, payment, Contract, Payment},
    infra::{database, Database},
    read::{
        self,
        contract::{Balance, Paid},
    },
    Service,
};

use super::Command;

/// [`Command`] for recording a [`Payment`] received for a [`Contract`].
#[derive(Clone, Debug)]
pub struct RecordPayment {
    /// ID of the paid [`Contract`].
    pub contract_id: contract::Id,

    /// Received amount.
    pub amount: Money,

    /// Method of the [`Payment`].
    pub method: payment::Method,

    /// Note attached to the [`Payment`].
    pub note: Option<payment::Note>,

    /// Moment the [`Payment`] was received, if not now.
    pub paid_at: Option<payment::PaymentDateTime>,
}

impl<Db> Command<RecordPayment> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Contract, contract::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Paid, contract::Id>>,
            Ok = Paid,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<payment::ReceiptNumber, read::Next>>,
            Ok = payment::ReceiptNumber,
            Err = Traced<database::Error>,
        > + Database<Insert<Payment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Payment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecordPayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordPayment {
            contract_id,
            amount,
            method,
            note,
            paid_at,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent payments exceeding the balance together.
        tx.execute(Lock(By::<Contract, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        let paid = tx
            .execute(Select(By::<Paid, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        check_amount(amount, &Balance::of(&contract, &paid))
            .map_err(tracerr::wrap!())?;

        let receipt_number = tx
            .execute(Select(By::<payment::ReceiptNumber, _>::new(read::Next)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let payment = Payment {
            id: payment::Id::new(),
            contract_id,
            amount,
            method,
            note,
            receipt_number,
            paid_at: paid_at.unwrap_or_else(|| DateTime::now().coerce()),
        };

        tx.execute(Insert(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(payment)
    }
}

/// Checks whether the provided `amount` may be paid against the `balance` of
/// a [`Contract`].
fn check_amount(
    amount: Money,
    balance: &Balance,
) -> Result<(), ExecutionError> {
    use ExecutionError as E;

    if !amount.is_positive() {
        return Err(E::NonPositiveAmount(amount));
    }
    if amount.currency != balance.total.currency {
        return Err(E::CurrencyMismatch(amount));
    }
    let remaining = balance.remaining();
    if amount.amount > remaining.amount {
        return Err(E::Overpayment { amount, remaining });
    }
    Ok(())
}

/// Error of [`RecordPayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Payment`] currency differs from the [`Contract`] one.
    #[display("`{_0}` is not in the `Contract` currency")]
    CurrencyMismatch(#[error(not(source))] Money),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Payment`] amount is zero or negative.
    #[display("`{_0}` is not a positive amount")]
    NonPositiveAmount(#[error(not(source))] Money),

    /// [`Payment`] exceeds the remaining balance of the [`Contract`].
    #[display("`{amount}` exceeds the remaining balance `{remaining}`")]
    Overpayment {
        /// Amount of the rejected [`Payment`].
        amount: Money,

        /// Remaining balance of the [`Contract`].
        remaining: Money,
    },
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::Money;

    use crate::read::contract::Balance;

    use super::{check_amount, ExecutionError as E};

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn balance(total: &str, paid: &str) -> Balance {
        Balance {
            total: money(total),
            paid: money(paid),
        }
    }

    #[test]
    fn accepts_up_to_remaining_balance() {
        let b = balance("1000LYD", "400LYD");

        assert!(check_amount(money("250.50LYD"), &b).is_ok());
        assert!(check_amount(money("600LYD"), &b).is_ok());
    }

    #[test]
    fn rejects_overpayment() {
        let b = balance("1000LYD", "400LYD");

        assert!(matches!(
            check_amount(money("600.01LYD"), &b),
            Err(E::Overpayment { remaining, .. })
                if remaining == money("600LYD"),
        ));

        let settled = balance("1000LYD", "1000LYD");
        assert!(matches!(
            check_amount(money("1LYD"), &settled),
            Err(E::Overpayment { .. }),
        ));
    }

    #[test]
    fn rejects_other_currency() {
        let b = balance("1000LYD", "0LYD");

        assert!(matches!(
            check_amount(money("100USD"), &b),
            Err(E::CurrencyMismatch(m)) if m == money("100USD"),
        ));
    }

    #[test]
    fn rejects_non_positive_amount() {
        let b = balance("1000LYD", "0LYD");

        assert!(matches!(
            check_amount(money("0LYD"), &b),
            Err(E::NonPositiveAmount(_)),
        ));
        assert!(matches!(
            check_amount(money("-5LYD"), &b),
            Err(E::NonPositiveAmount(_)),
        ));
    }
}
