//! [`Overdue`] payments report definition.

use std::collections::HashMap;

use common::{
    operations::{By, Select},
    DateTime, Money,
};
use tracerr::Traced;

use crate::{
    domain::{contract, Contract},
    infra::{database, Database},
    read::contract::{Balance, DueBefore, Paid},
    Query, Service,
};

/// [`Query`] listing [`Contract`]s whose payment is overdue.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Overdue;

/// Row of the [`Overdue`] report.
#[derive(Clone, Debug)]
pub struct Row {
    /// [`Contract`] with an overdue payment.
    pub contract: Contract,

    /// Amount to be paid in total.
    pub total: Money,

    /// Amount paid so far.
    pub paid: Money,

    /// Amount left to be paid.
    pub remaining: Money,

    /// Whole days passed since the payment due date.
    pub days_overdue: i64,
}

/// Builds [`Row`]s out of the provided [`Contract`]s due before `now`.
///
/// Settled [`Contract`]s are skipped. The most overdue [`Row`]s go first.
#[must_use]
pub fn rows(
    contracts: Vec<Contract>,
    paid: &HashMap<contract::Id, Paid>,
    now: DateTime,
) -> Vec<Row> {
    let mut rows = contracts
        .into_iter()
        .filter_map(|contract| {
            let due = contract.payment_due_at?;
            let balance = paid.get(&contract.id).map_or_else(
                || Balance::of(&contract, &Paid::default()),
                |p| Balance::of(&contract, p),
            );
            if balance.is_settled() {
                return None;
            }
            Some(Row {
                total: balance.total,
                paid: balance.paid,
                remaining: balance.remaining(),
                days_overdue: due.whole_days_until(&now).max(0),
                contract,
            })
        })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| {
        b.days_overdue
            .cmp(&a.days_overdue)
            .then_with(|| a.contract.created_at.cmp(&b.contract.created_at))
    });
    rows
}

impl<Db> Query<Overdue> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Contract>, DueBefore>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<contract::Id, Paid>, Vec<contract::Id>>>,
            Ok = HashMap<contract::Id, Paid>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<Row>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Overdue) -> Result<Self::Ok, Self::Err> {
        let now = DateTime::now();

        let contracts = self
            .database()
            .execute(Select(By::<Vec<Contract>, _>::new(DueBefore(now))))
            .await
            .map_err(tracerr::wrap!())?;
        if contracts.is_empty() {
            return Ok(vec![]);
        }

        let ids = contracts.iter().map(|c| c.id).collect::<Vec<_>>();
        let paid = self
            .database()
            .execute(Select(By::<HashMap<_, Paid>, _>::new(ids)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(rows(contracts, &paid, now))
    }
}

#[cfg(test)]
mod spec {
    use std::{collections::HashMap, str::FromStr as _, time::Duration};

    use common::{DateTime, Money};

    use crate::{
        domain::{
            contract::{self, Breakdown},
            Contract,
        },
        read::contract::Paid,
    };

    use super::rows;

    const DAY: Duration = Duration::from_secs(86_400);

    fn contract(total: &str, due_days_ago: u32) -> Contract {
        let now = DateTime::now();
        Contract {
            id: contract::Id::new(),
            number: contract::Number::from_sequence(u64::from(due_days_ago)),
            customer: contract::Customer::new("Acme").unwrap(),
            phone: None,
            ad_type: None,
            billboard_ids: vec![],
            starts_at: (now - DAY * 90).coerce(),
            ends_at: (now + DAY * 90).coerce(),
            total: Money::from_str(total).unwrap(),
            discount: None,
            installation_cost: None,
            breakdown: Breakdown::new([]),
            payment_due_at: Some((now - DAY * due_days_ago).coerce()),
            created_at: (now - DAY * 90).coerce(),
            terminated_at: None,
        }
    }

    #[test]
    fn most_overdue_go_first() {
        let contracts = vec![
            contract("1000LYD", 3),
            contract("1000LYD", 40),
            contract("1000LYD", 12),
        ];

        let rows = rows(contracts, &HashMap::new(), DateTime::now());

        assert_eq!(
            rows.iter().map(|r| r.days_overdue).collect::<Vec<_>>(),
            [40, 12, 3],
        );
    }

    #[test]
    fn skips_settled_contracts() {
        let settled = contract("1000LYD", 5);
        let partial = contract("1000LYD", 5);
        let paid = HashMap::from([
            (settled.id, Paid::new([Money::from_str("1000LYD").unwrap()])),
            (partial.id, Paid::new([Money::from_str("400LYD").unwrap()])),
        ]);
        let partial_id = partial.id;

        let rows = rows(vec![settled, partial], &paid, DateTime::now());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].contract.id, partial_id);
        assert_eq!(rows[0].paid, Money::from_str("400LYD").unwrap());
        assert_eq!(rows[0].remaining, Money::from_str("600LYD").unwrap());
    }

    #[test]
    fn foreign_currency_payments_are_not_counted() {
        let c = contract("1000LYD", 1);
        let paid = HashMap::from([(
            c.id,
            Paid::new([Money::from_str("1000USD").unwrap()]),
        )]);

        let rows = rows(vec![c], &paid, DateTime::now());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].remaining, Money::from_str("1000LYD").unwrap());
    }
}
