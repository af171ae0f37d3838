//! Printable [`Payment`] receipt.

use maud::{html, Markup};

use crate::{
    domain::{Contract, Payment},
    read::contract::Balance,
};

/// Renders the receipt of the provided [`Payment`] of the provided
/// [`Contract`] with its current [`Balance`].
#[must_use]
pub fn receipt(
    issuer: &str,
    payment: &Payment,
    contract: &Contract,
    balance: &Balance,
) -> Markup {
    let body = html! {
        p {
            "Received from " strong { (contract.customer) }
            " the amount of " strong { (payment.amount.to_human()) }
            " for the rent agreement " strong { (contract.number.as_ref()) }
            "."
        }
        table.totals {
            tr {
                td { "Date" }
                td.amount { (payment.paid_at.to_date_string()) }
            }
            tr {
                td { "Method" }
                td.amount { (payment.method.to_string()) }
            }
            tr {
                td { "Contract total" }
                td.amount { (balance.total.to_human()) }
            }
            tr {
                td { "Paid so far" }
                td.amount { (balance.paid.to_human()) }
            }
            tr {
                td { "Remaining" }
                td.amount { strong { (balance.remaining().to_human()) } }
            }
        }
        @if let Some(note) = &payment.note {
            p { "Note: " (note) }
        }
        div.signatures {
            div { "Received by" }
            div { "Customer" }
        }
    };
    super::page(issuer, "Receipt", payment.receipt_number.as_ref(), &body)
}
