//! [`Municipality`] report definition.

use std::collections::BTreeMap;

use common::{
    money::Currency,
    operations::{By, Select},
    DateTime, Money,
};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{billboard, Billboard, Contract},
    infra::{database, Database},
    read::{
        self,
        contract::{Active, ActiveAt},
    },
    Query, Service,
};

/// [`Query`] summarizing the inventory per municipality.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Municipality;

/// Row of the [`Municipality`] report.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Row {
    /// Municipality, if known.
    pub municipality: Option<billboard::Municipality>,

    /// Number of all [`Billboard`]s.
    pub total: usize,

    /// Number of [`billboard::Status::Available`] [`Billboard`]s.
    pub available: usize,

    /// Number of [`billboard::Status::Rented`] [`Billboard`]s.
    pub rented: usize,

    /// Number of [`billboard::Status::Maintenance`] [`Billboard`]s.
    pub maintenance: usize,

    /// Number of [`billboard::Status::Removed`] [`Billboard`]s.
    pub removed: usize,

    /// Revenue expected from the active [`Contract`]s.
    pub revenue: Money,
}

impl Row {
    /// Creates an empty [`Row`] of the provided municipality.
    fn empty(
        municipality: Option<billboard::Municipality>,
        currency: Currency,
    ) -> Self {
        Self {
            municipality,
            total: 0,
            available: 0,
            rented: 0,
            maintenance: 0,
            removed: 0,
            revenue: Money::zero(currency),
        }
    }
}

/// Summarizes the provided [`Billboard`]s and the revenue of the provided
/// active [`Contract`]s per municipality.
///
/// Revenue is the sum of the stored breakdown prices. Malformed breakdowns
/// and prices in other [`Currency`]s contribute nothing. Rows are ordered by
/// municipality, unknown one last.
#[must_use]
pub fn summarize(
    billboards: &[Billboard],
    contracts: &[Active<Contract>],
    currency: Currency,
) -> Vec<Row> {
    // Unknown municipality goes last.
    let key =
        |b: &Billboard| (b.municipality.is_none(), b.municipality.clone());

    let mut rows = BTreeMap::<_, Row>::new();
    for b in billboards {
        let row = rows
            .entry(key(b))
            .or_insert_with(|| Row::empty(b.municipality.clone(), currency));
        row.total += 1;
        match b.status {
            billboard::Status::Available => row.available += 1,
            billboard::Status::Rented => row.rented += 1,
            billboard::Status::Maintenance => row.maintenance += 1,
            billboard::Status::Removed => row.removed += 1,
        }
    }

    let index = billboards
        .iter()
        .map(|b| (b.id, b))
        .collect::<BTreeMap<_, _>>();
    for Active(c) in contracts {
        for (id, price) in c.breakdown.prices(currency) {
            let Some(row) =
                index.get(&id).and_then(|b| rows.get_mut(&key(*b)))
            else {
                log::debug!(
                    contract = %c.number,
                    billboard = %id,
                    "unknown `Billboard` in `contract::Breakdown`",
                );
                continue;
            };
            match row.revenue.checked_add(price) {
                Some(sum) => row.revenue = sum,
                None => log::warn!(
                    contract = %c.number,
                    %price,
                    "price in a foreign currency is not counted",
                ),
            }
        }
    }

    rows.into_values().collect()
}

impl<Db> Query<Municipality> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Billboard>, read::billboard::Inventory>>,
            Ok = Vec<Billboard>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Active<Contract>>, ActiveAt>>,
            Ok = Vec<Active<Contract>>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<Row>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Municipality) -> Result<Self::Ok, Self::Err> {
        let billboards = self
            .database()
            .execute(Select(By::<Vec<Billboard>, _>::new(
                read::billboard::Inventory {
                    include_removed: true,
                },
            )))
            .await
            .map_err(tracerr::wrap!())?;
        let contracts = self
            .database()
            .execute(Select(By::<Vec<Active<Contract>>, _>::new(ActiveAt(
                DateTime::now(),
            ))))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(summarize(&billboards, &contracts, self.config().currency))
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{money::Currency, DateTime, Money};
    use serde_json::json;

    use crate::{
        domain::{
            billboard::{self, Status},
            contract::{self, Breakdown},
            Billboard, Contract,
        },
        read::contract::Active,
    };

    use super::summarize;

    fn billboard(municipality: Option<&str>, status: Status) -> Billboard {
        Billboard {
            id: billboard::Id::new(),
            name: billboard::Name::new("Board").unwrap(),
            landmark: None,
            size: billboard::Size::new("4x12").unwrap(),
            level: billboard::Level::A,
            municipality: municipality
                .map(|m| billboard::Municipality::new(m).unwrap()),
            city: None,
            district: None,
            coordinates: billboard::Coordinates::default(),
            status,
            contract_number: None,
            price: Money::from_str("1000LYD").unwrap(),
            design_url: None,
            installation_url: None,
            created_at: DateTime::now().coerce(),
        }
    }

    fn contract(breakdown: Breakdown) -> Active<Contract> {
        let now = DateTime::now();
        Active(Contract {
            id: contract::Id::new(),
            number: contract::Number::from_sequence(1),
            customer: contract::Customer::new("Acme").unwrap(),
            phone: None,
            ad_type: None,
            billboard_ids: vec![],
            starts_at: now.coerce(),
            ends_at: (now + std::time::Duration::from_secs(86_400 * 30))
                .coerce(),
            total: Money::zero(Currency::Lyd),
            discount: None,
            installation_cost: None,
            breakdown,
            payment_due_at: None,
            created_at: now.coerce(),
            terminated_at: None,
        })
    }

    #[test]
    fn counts_statuses_per_municipality() {
        let billboards = [
            billboard(Some("Tripoli"), Status::Available),
            billboard(Some("Tripoli"), Status::Rented),
            billboard(Some("Benghazi"), Status::Maintenance),
            billboard(None, Status::Removed),
            billboard(Some("Tripoli"), Status::Rented),
        ];

        let rows = summarize(&billboards, &[], Currency::Lyd);

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0].municipality.as_ref().unwrap().to_string(),
            "Benghazi",
        );
        assert_eq!(rows[0].maintenance, 1);
        assert_eq!(
            rows[1].municipality.as_ref().unwrap().to_string(),
            "Tripoli",
        );
        assert_eq!(
            (rows[1].total, rows[1].available, rows[1].rented),
            (3, 1, 2),
        );
        assert_eq!(rows[2].municipality, None);
        assert_eq!(rows[2].removed, 1);
    }

    #[test]
    fn sums_breakdown_revenue() {
        let a = billboard(Some("Tripoli"), Status::Rented);
        let b = billboard(Some("Misrata"), Status::Rented);
        let contracts = [
            contract(Breakdown::new([
                (a.id, Money::from_str("3000LYD").unwrap()),
                (b.id, Money::from_str("1500.50LYD").unwrap()),
            ])),
            contract(Breakdown::new([(
                a.id,
                Money::from_str("1000LYD").unwrap(),
            )])),
        ];

        let rows = summarize(&[a, b], &contracts, Currency::Lyd);

        assert_eq!(rows[0].revenue, Money::from_str("1500.50LYD").unwrap());
        assert_eq!(rows[1].revenue, Money::from_str("4000LYD").unwrap());
    }

    #[test]
    fn malformed_breakdown_contributes_zero() {
        let a = billboard(Some("Tripoli"), Status::Rented);
        let contracts = [
            contract(Breakdown::from_raw(json!("not an object"))),
            contract(Breakdown::from_raw(json!({
                (a.id.to_string()): "garbage",
                "not-an-id": "100LYD",
            }))),
            contract(Breakdown::from_raw(json!({
                (a.id.to_string()): 250,
            }))),
            contract(Breakdown::new([(
                a.id,
                Money::from_str("70USD").unwrap(),
            )])),
        ];

        let rows = summarize(&[a], &contracts, Currency::Lyd);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].revenue, Money::from_str("250LYD").unwrap());
    }
}
