//! Printable invoice of a [`Contract`].

use common::{money::Currency, Money};
use itertools::Itertools as _;
use maud::{html, Markup};
use rust_decimal::Decimal;

use crate::domain::{Billboard, Contract};

/// Returns the human-readable location of the provided [`Billboard`].
pub(super) fn location(b: &Billboard) -> String {
    [
        b.district.as_ref().map(ToString::to_string),
        b.city.as_ref().map(ToString::to_string),
        b.municipality.as_ref().map(ToString::to_string),
    ]
    .into_iter()
    .flatten()
    .join(", ")
}

/// Renders the invoice of the provided [`Contract`] over the provided
/// [`Billboard`]s.
///
/// Line prices are taken from the stored breakdown of the [`Contract`], so
/// later price changes don't alter an issued invoice.
#[must_use]
pub fn invoice(
    issuer: &str,
    contract: &Contract,
    billboards: &[Billboard],
) -> Markup {
    let currency: Currency = contract.total.currency;
    let prices = contract.breakdown.prices(currency);
    let months = contract.months();

    let lines = billboards
        .iter()
        .filter_map(|b| Some((b, *prices.get(&b.id)?)))
        .collect::<Vec<_>>();
    let subtotal = lines
        .iter()
        .filter_map(|(_, p)| (p.currency == currency).then_some(p.amount))
        .sum::<Decimal>();
    let subtotal = Money {
        amount: subtotal,
        currency,
    };
    let discount = contract.discount.map(|d| (d, subtotal.percent(d)));

    let body = html! {
        p {
            "Bill to: " strong { (contract.customer) }
            @if let Some(phone) = &contract.phone {
                br; (phone.as_ref())
            }
        }
        p {
            "Period: " (contract.starts_at.to_date_string())
            " - " (contract.ends_at.to_date_string())
            " (" (months) " month(s))"
        }
        table {
            thead {
                tr {
                    th { "#" }
                    th { "Billboard" }
                    th { "Size" }
                    th { "Location" }
                    th.amount { "Monthly" }
                    th.amount { "Amount" }
                }
            }
            tbody {
                @for (n, (b, price)) in lines.iter().enumerate() {
                    tr {
                        td { (n + 1) }
                        td { (b.name) }
                        td { (b.size.as_ref()) }
                        td { (location(b)) }
                        td.amount { (monthly(*price, months).to_human()) }
                        td.amount { (price.to_human()) }
                    }
                }
            }
        }
        table.totals {
            tr {
                td { "Subtotal" }
                td.amount { (subtotal.to_human()) }
            }
            @if let Some((percent, amount)) = discount {
                tr {
                    td { "Discount " (percent.to_string()) "%" }
                    td.amount { "-" (amount.to_human()) }
                }
            }
            @if let Some(cost) = contract.installation_cost {
                tr {
                    td { "Installation" }
                    td.amount { (cost.to_human()) }
                }
            }
            tr {
                td { "Total" }
                td.amount { strong { (contract.total.to_human()) } }
            }
            @if let Some(due) = contract.payment_due_at {
                tr {
                    td { "Due date" }
                    td.amount { (due.to_date_string()) }
                }
            }
        }
    };
    super::page(issuer, "Invoice", contract.number.as_ref(), &body)
}

/// Returns the monthly part of the provided whole period `price`.
fn monthly(price: Money, months: u32) -> Money {
    Money {
        amount: (price.amount / Decimal::from(months.max(1)))
            .round_dp(2),
        currency: price.currency,
    }
}
