//! Printable [`Contract`] document.

use maud::{html, Markup};

use crate::domain::{Billboard, Contract};

/// Renders the rent agreement of the provided [`Contract`] over the provided
/// [`Billboard`]s.
#[must_use]
pub fn contract(
    issuer: &str,
    contract: &Contract,
    billboards: &[Billboard],
) -> Markup {
    let body = html! {
        p {
            "This agreement is made between " strong { (issuer) }
            " (the lessor) and " strong { (contract.customer) }
            " (the lessee)"
            @if let Some(phone) = &contract.phone {
                ", phone " (phone.as_ref())
            }
            "."
        }
        p {
            "The lessor rents out the advertising faces listed below for the \
             period from "
            strong { (contract.starts_at.to_date_string()) }
            " to "
            strong { (contract.ends_at.to_date_string()) }
            " (" (contract.months()) " month(s))"
            @if let Some(ad) = &contract.ad_type {
                " to display " (ad)
            }
            "."
        }
        table {
            thead {
                tr {
                    th { "#" }
                    th { "Billboard" }
                    th { "Size" }
                    th { "Level" }
                    th { "Location" }
                }
            }
            tbody {
                @for (n, b) in billboards.iter().enumerate() {
                    tr {
                        td { (n + 1) }
                        td {
                            (b.name)
                            @if let Some(l) = &b.landmark {
                                br; small { (l) }
                            }
                        }
                        td { (b.size.as_ref()) }
                        td { (b.level.to_string()) }
                        td { (super::invoice::location(b)) }
                    }
                }
            }
        }
        table.totals {
            tr {
                td { "Total" }
                td.amount { (contract.total.to_human()) }
            }
            @if let Some(due) = contract.payment_due_at {
                tr {
                    td { "Payment due" }
                    td.amount { (due.to_date_string()) }
                }
            }
        }
        p {
            "The lessee pays the total above. Billboards stay rented until \
             the end of the period unless the agreement is terminated \
             earlier."
        }
        div.signatures {
            div { "Lessor" }
            div { "Lessee" }
        }
    };
    super::page(issuer, "Rent agreement", contract.number.as_ref(), &body)
}
