//! Printable A4 documents.
//!
//! Documents are self-contained HTML pages with embedded CSS sizing the page
//! in millimetres, ready to be handed to a browser print dialog.

mod contract;
mod invoice;
mod receipt;

use maud::{html, Markup, PreEscaped, DOCTYPE};

pub use self::{contract::contract, invoice::invoice, receipt::receipt};

/// Stylesheet shared by all the documents.
const STYLE: &str = "\
    @page { size: 210mm 297mm; margin: 15mm; }\
    * { box-sizing: border-box; }\
    body { margin: 0; font-family: 'Noto Naskh Arabic', 'DejaVu Sans', \
           sans-serif; font-size: 11pt; color: #1a1a1a; }\
    .page { width: 180mm; min-height: 267mm; margin: 0 auto; }\
    header { display: flex; justify-content: space-between; \
             align-items: flex-end; border-bottom: 0.6mm solid #1a1a1a; \
             padding-bottom: 4mm; margin-bottom: 6mm; }\
    header h1 { margin: 0; font-size: 20pt; }\
    header .meta { text-align: right; font-size: 10pt; }\
    table { width: 100%; border-collapse: collapse; margin: 4mm 0; }\
    th, td { border: 0.2mm solid #8a8a8a; padding: 2mm; text-align: left; }\
    th { background: #efefef; }\
    td.amount, th.amount { text-align: right; white-space: nowrap; }\
    .totals { width: 80mm; margin-left: auto; }\
    .totals td:first-child { font-weight: bold; }\
    .signatures { display: flex; justify-content: space-between; \
                  margin-top: 25mm; }\
    .signatures div { width: 70mm; border-top: 0.2mm solid #1a1a1a; \
                      padding-top: 2mm; text-align: center; }\
    @media print { .page { margin: 0; } }";

/// Wraps the provided `body` into a standalone A4 page.
fn page(issuer: &str, title: &str, number: &str, body: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) " " (number) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                div.page {
                    header {
                        div {
                            h1 { (title) }
                            div { (issuer) }
                        }
                        div.meta {
                            div { "No. " strong { (number) } }
                        }
                    }
                    (body)
                }
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{str::FromStr as _, time::Duration};

    use common::{money::Currency, DateTime, Money, Percent};

    use crate::{
        domain::{
            billboard::{self, Status},
            contract::{self, Breakdown},
            payment, Billboard, Contract, Payment,
        },
        read::contract::{Balance, Paid},
    };

    const DAY: Duration = Duration::from_secs(86_400);

    fn billboard(name: &str) -> Billboard {
        Billboard {
            id: billboard::Id::new(),
            name: billboard::Name::new(name).unwrap(),
            landmark: None,
            size: billboard::Size::new("4x12").unwrap(),
            level: billboard::Level::S,
            municipality: billboard::Municipality::new("Tripoli"),
            city: billboard::City::new("Tripoli"),
            district: billboard::District::new("Hay Andalus"),
            coordinates: billboard::Coordinates::default(),
            status: Status::Rented,
            contract_number: Some(contract::Number::from_sequence(1001)),
            price: Money::from_str("1000LYD").unwrap(),
            design_url: None,
            installation_url: None,
            created_at: DateTime::now().coerce(),
        }
    }

    fn contract(customer: &str, billboards: &[Billboard]) -> Contract {
        let now = DateTime::now();
        Contract {
            id: contract::Id::new(),
            number: contract::Number::from_sequence(1001),
            customer: contract::Customer::new(customer).unwrap(),
            phone: None,
            ad_type: None,
            billboard_ids: billboards.iter().map(|b| b.id).collect(),
            starts_at: now.coerce(),
            ends_at: (now + DAY * 60).coerce(),
            total: Money::from_str("5400LYD").unwrap(),
            discount: Some(Percent::from_str("10").unwrap()),
            installation_cost: None,
            breakdown: Breakdown::new(
                billboards
                    .iter()
                    .map(|b| (b.id, Money::from_str("3000LYD").unwrap())),
            ),
            payment_due_at: Some((now + DAY * 14).coerce()),
            created_at: now.coerce(),
            terminated_at: None,
        }
    }

    #[test]
    fn pages_are_a4() {
        let boards = [billboard("Airport Road")];
        let c = contract("Zed", &boards);

        let html = super::contract("Acme Media", &c, &boards).into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("size: 210mm 297mm"));
        assert!(html.contains("Airport Road"));
        assert!(html.contains("C-1001"));
    }

    #[test]
    fn escapes_customer_input() {
        let boards = [billboard("Board <1>")];
        let html = super::invoice(
            "Acme Media",
            &contract("<script>alert(1)</script>", &boards),
            &boards,
        )
        .into_string();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Board &lt;1&gt;"));
    }

    #[test]
    fn invoice_lists_breakdown_lines() {
        let boards = [billboard("North"), billboard("South")];
        let c = contract("Zed", &boards);

        let html = super::invoice("Acme Media", &c, &boards).into_string();

        assert!(html.contains("North"));
        assert!(html.contains("South"));
        assert!(html.contains("3,000.00 LYD"));
        assert!(html.contains("6,000.00 LYD"));
        assert!(html.contains("-600.00 LYD"));
        assert!(html.contains("5,400.00 LYD"));
        assert!(html.contains("Hay Andalus, Tripoli, Tripoli"));
    }

    #[test]
    fn receipt_shows_remaining_balance() {
        let boards = [billboard("North")];
        let c = contract("Zed", &boards);
        let payment = Payment {
            id: payment::Id::new(),
            contract_id: c.id,
            amount: Money::from_str("1400LYD").unwrap(),
            method: payment::Method::Cash,
            note: Some(payment::Note::new("first part").unwrap()),
            receipt_number: payment::ReceiptNumber::from_sequence(7),
            paid_at: DateTime::now().coerce(),
        };
        let balance = Balance::of(&c, &Paid::new([payment.amount]));

        let html = super::receipt("Acme Media", &payment, &c, &balance)
            .into_string();

        assert!(html.contains("R-7"));
        assert!(html.contains("1,400.00 LYD"));
        assert!(html.contains("4,000.00 LYD"));
        assert!(html.contains("first part"));
        assert_eq!(Currency::Lyd, balance.total.currency);
    }
}
