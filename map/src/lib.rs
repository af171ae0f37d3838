//! Billboard map controller.
//!
//! Keeps the marker layer of a live map consistent with the set of visible
//! billboards while touching only what has changed:
//! - [`coordinates`] turns heterogeneous stored coordinates into a validated
//!   [`LatLng`];
//! - [`filter`] derives the visible subset of billboards;
//! - [`Controller`] reconciles the attached markers against that subset and
//!   re-skins them in place when the selection changes.
//!
//! The mapping library itself stays behind the [`Layer`] trait.

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod bounds;
pub mod controller;
pub mod coordinates;
pub mod filter;
pub mod layer;

pub use self::{
    bounds::Bounds,
    controller::{Changes, Controller, Entry, Intent, Style},
    coordinates::{LatLng, RawCoordinates},
    filter::{Filter, Filterable, SelectionFilter},
    layer::Layer,
};
