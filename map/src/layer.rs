//! [`Layer`] abstraction over a mapping library.

use std::{collections::BTreeMap, fmt};

use crate::{Bounds, LatLng};

/// Marker layer of a live map.
///
/// Handles are owned by the [`Layer`] and stay valid until detached.
pub trait Layer<Icon> {
    /// Handle of an attached marker.
    type Handle: Copy + Eq + fmt::Debug;

    /// Attaches a new marker to the map.
    fn attach(
        &mut self,
        position: LatLng,
        icon: Icon,
        popup: String,
    ) -> Self::Handle;

    /// Detaches the marker from the map.
    fn detach(&mut self, marker: Self::Handle);

    /// Replaces the icon of the attached marker in place.
    fn set_icon(&mut self, marker: Self::Handle, icon: Icon);

    /// Replaces the popup content of the attached marker in place.
    fn set_popup(&mut self, marker: Self::Handle, content: String);

    /// Indicates whether the popup of the marker is currently open.
    fn is_popup_open(&self, marker: Self::Handle) -> bool;

    /// Moves the viewport to show the provided [`Bounds`].
    fn fit_bounds(&mut self, bounds: Bounds);
}

/// In-memory [`Layer`], recording every operation applied to it.
#[derive(Debug)]
pub struct Memory<Icon> {
    /// Attached markers.
    markers: BTreeMap<u64, Marker<Icon>>,

    /// Next handle to issue.
    next: u64,

    /// Counters of the applied operations.
    operations: Operations,

    /// Viewport fits, in order.
    fits: Vec<Bounds>,
}

/// Marker attached to a [`Memory`] layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker<Icon> {
    /// Position of the marker.
    pub position: LatLng,

    /// Current icon.
    pub icon: Icon,

    /// Current popup content.
    pub popup: String,

    /// Whether the popup is open.
    pub popup_open: bool,
}

/// Counters of the operations applied to a [`Memory`] layer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Operations {
    /// Number of [`Layer::attach`] calls.
    pub attached: usize,

    /// Number of [`Layer::detach`] calls.
    pub detached: usize,

    /// Number of [`Layer::set_icon`] calls.
    pub icons: usize,

    /// Number of [`Layer::set_popup`] calls.
    pub popups: usize,
}

impl<Icon> Default for Memory<Icon> {
    fn default() -> Self {
        Self {
            markers: BTreeMap::new(),
            next: 1,
            operations: Operations::default(),
            fits: Vec::new(),
        }
    }
}

impl<Icon> Memory<Icon> {
    /// Returns the attached marker by its handle.
    #[must_use]
    pub fn marker(&self, handle: u64) -> Option<&Marker<Icon>> {
        self.markers.get(&handle)
    }

    /// Returns the number of attached markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Indicates whether no markers are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Opens the popup of the attached marker, as a user click would.
    pub fn open_popup(&mut self, handle: u64) {
        if let Some(m) = self.markers.get_mut(&handle) {
            m.popup_open = true;
        }
    }

    /// Returns the operation counters of this layer.
    #[must_use]
    pub const fn operations(&self) -> Operations {
        self.operations
    }

    /// Returns all the viewport fits applied to this layer.
    #[must_use]
    pub fn fits(&self) -> &[Bounds] {
        &self.fits
    }
}

impl<Icon> Layer<Icon> for Memory<Icon> {
    type Handle = u64;

    fn attach(&mut self, position: LatLng, icon: Icon, popup: String) -> u64 {
        let handle = self.next;
        self.next += 1;
        self.operations.attached += 1;
        drop(self.markers.insert(
            handle,
            Marker {
                position,
                icon,
                popup,
                popup_open: false,
            },
        ));
        handle
    }

    fn detach(&mut self, marker: u64) {
        self.operations.detached += 1;
        drop(self.markers.remove(&marker));
    }

    fn set_icon(&mut self, marker: u64, icon: Icon) {
        self.operations.icons += 1;
        if let Some(m) = self.markers.get_mut(&marker) {
            m.icon = icon;
        }
    }

    fn set_popup(&mut self, marker: u64, content: String) {
        self.operations.popups += 1;
        if let Some(m) = self.markers.get_mut(&marker) {
            m.popup = content;
        }
    }

    fn is_popup_open(&self, marker: u64) -> bool {
        self.markers.get(&marker).is_some_and(|m| m.popup_open)
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.fits.push(bounds);
    }
}
