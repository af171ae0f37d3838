//! [`Billboard`]-related read definitions.

use map::{Bounds, LatLng};

use crate::domain::Billboard;
#[cfg(doc)]
use crate::domain::billboard::Status;

/// Selector of the whole [`Billboard`] inventory, ordered by name.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Inventory {
    /// Whether [`Status::Removed`] [`Billboard`]s are selected too.
    pub include_removed: bool,
}

/// [`Billboard`] placed on the map.
#[derive(Clone, Debug)]
pub struct Marker {
    /// Placed [`Billboard`].
    pub billboard: Billboard,

    /// Validated position of the [`Billboard`].
    pub position: LatLng,
}

/// [`Marker`]s of the visible [`Billboard`]s.
#[derive(Clone, Debug, Default)]
pub struct Markers {
    /// [`Marker`]s in the list order.
    pub markers: Vec<Marker>,

    /// [`Bounds`] covering all the [`Marker`]s, if there are any.
    pub bounds: Option<Bounds>,
}

impl Markers {
    /// Places the provided [`Billboard`]s, dropping the ones without a valid
    /// position.
    #[must_use]
    pub fn place<'b>(
        billboards: impl IntoIterator<Item = &'b Billboard>,
    ) -> Self {
        let markers = billboards
            .into_iter()
            .filter_map(|b| {
                Some(Marker {
                    position: b.position()?,
                    billboard: b.clone(),
                })
            })
            .collect::<Vec<_>>();
        let bounds = Bounds::covering(markers.iter().map(|m| m.position));
        Self { markers, bounds }
    }
}
