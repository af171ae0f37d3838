//! Incremental marker reconciliation.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    hash::Hash,
};

use tracing as log;

use crate::{Bounds, LatLng, Layer};

/// Item which can be shown on the map as a marker.
pub trait Entry: Clone {
    /// Type of the identifier of this [`Entry`].
    type Id: Copy + Eq + Hash + fmt::Debug;

    /// Returns the identifier of this [`Entry`].
    fn id(&self) -> Self::Id;

    /// Returns the validated position of this [`Entry`].
    ///
    /// Entries without a position are never attached.
    fn position(&self) -> Option<LatLng>;
}

/// Appearance of markers, depending on the entry data and its selection.
pub trait Style<E> {
    /// Type of the rendered icon.
    type Icon: Clone + PartialEq;

    /// Renders the icon of the provided entry.
    fn icon(&self, entry: &E, selected: bool) -> Self::Icon;

    /// Renders the popup content of the provided entry.
    fn popup(&self, entry: &E, selected: bool) -> String;
}

/// User intent emitted by a marker click.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Intent<Id> {
    /// Add the entry to the selection.
    Select(Id),

    /// Remove the entry from the selection.
    Deselect(Id),
}

/// Summary of the layer operations applied by a [`Controller`] call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Changes {
    /// Newly attached markers.
    pub added: usize,

    /// Detached markers.
    pub removed: usize,

    /// Markers re-attached at a new position.
    pub moved: usize,

    /// Markers updated in place.
    pub updated: usize,
}

impl Changes {
    /// Indicates whether nothing was applied to the layer.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.added == 0
            && self.removed == 0
            && self.moved == 0
            && self.updated == 0
    }
}

/// Attached marker state.
#[derive(Debug)]
struct Marker<E, H, I> {
    /// Last reconciled entry.
    entry: E,

    /// Layer handle.
    handle: H,

    /// Position the marker is attached at.
    position: LatLng,

    /// Currently applied icon.
    icon: I,

    /// Popup content, as last rendered.
    popup: String,

    /// Whether the popup content is outdated because it was closed during a
    /// restyle.
    stale_popup: bool,
}

/// Owner of the marker index of a map [`Layer`].
///
/// Exactly one marker is attached per visible entry with a valid position,
/// and an entry is never attached twice.
pub struct Controller<E, S, L>
where
    E: Entry,
    S: Style<E>,
    L: Layer<S::Icon>,
{
    /// Underlying map layer.
    layer: L,

    /// Marker appearance.
    style: S,

    /// Attached markers by entry identifier.
    index: HashMap<E::Id, Marker<E, L::Handle, S::Icon>>,

    /// Whether the viewport should be fitted after the next reconciliation.
    fit_pending: bool,
}

impl<E, S, L> fmt::Debug for Controller<E, S, L>
where
    E: Entry,
    S: Style<E>,
    L: Layer<S::Icon>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("markers", &self.index.len())
            .field("fit_pending", &self.fit_pending)
            .finish_non_exhaustive()
    }
}

impl<E, S, L> Controller<E, S, L>
where
    E: Entry,
    S: Style<E>,
    L: Layer<S::Icon>,
{
    /// Creates a new [`Controller`] over an empty [`Layer`].
    ///
    /// The viewport is fitted after the first non-empty reconciliation.
    #[must_use]
    pub fn new(layer: L, style: S) -> Self {
        Self {
            layer,
            style,
            index: HashMap::new(),
            fit_pending: true,
        }
    }

    /// Returns the underlying [`Layer`].
    #[must_use]
    pub const fn layer(&self) -> &L {
        &self.layer
    }

    /// Returns the underlying [`Layer`] mutably.
    pub fn layer_mut(&mut self) -> &mut L {
        &mut self.layer
    }

    /// Returns the number of attached markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Indicates whether no markers are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the layer handle of the marker attached for the entry.
    #[must_use]
    pub fn handle(&self, id: E::Id) -> Option<L::Handle> {
        self.index.get(&id).map(|m| m.handle)
    }

    /// Returns identifiers of all the entries having an attached marker.
    pub fn ids(&self) -> impl Iterator<Item = E::Id> + '_ {
        self.index.keys().copied()
    }

    /// Marks the start of a new data load, so the viewport is fitted once
    /// more after the next reconciliation.
    pub fn reload(&mut self) {
        self.fit_pending = true;
    }

    /// Makes the attached markers match the `visible` entries.
    ///
    /// Entries without a valid position are skipped, and only the first of
    /// the duplicated identifiers is considered. Markers of unchanged entries
    /// are left untouched.
    pub fn reconcile<'e>(
        &mut self,
        visible: impl IntoIterator<Item = &'e E>,
        selection: &HashSet<E::Id>,
    ) -> Changes
    where
        E: 'e,
    {
        let mut seen = HashSet::new();
        let desired = visible
            .into_iter()
            .filter_map(|entry| {
                let id = entry.id();
                let Some(position) = entry.position() else {
                    log::debug!(?id, "entry without position is not shown");
                    return None;
                };
                seen.insert(id).then_some((id, entry, position))
            })
            .collect::<Vec<_>>();

        let mut changes = Changes::default();

        let gone = self
            .index
            .keys()
            .filter(|id| !seen.contains(*id))
            .copied()
            .collect::<Vec<_>>();
        for id in gone {
            if let Some(marker) = self.index.remove(&id) {
                self.layer.detach(marker.handle);
                changes.removed += 1;
            }
        }

        for (id, entry, position) in desired {
            let selected = selection.contains(&id);
            let icon = self.style.icon(entry, selected);
            let popup = self.style.popup(entry, selected);

            match self.index.get_mut(&id) {
                Some(marker) if marker.position == position => {
                    let mut touched = false;
                    if marker.icon != icon {
                        self.layer.set_icon(marker.handle, icon.clone());
                        marker.icon = icon;
                        touched = true;
                    }
                    if marker.popup != popup {
                        self.layer.set_popup(marker.handle, popup.clone());
                        marker.popup = popup;
                        touched = true;
                    }
                    marker.stale_popup = false;
                    marker.entry = entry.clone();
                    if touched {
                        changes.updated += 1;
                    }
                }
                Some(marker) => {
                    self.layer.detach(marker.handle);
                    marker.handle = self.layer.attach(
                        position,
                        icon.clone(),
                        popup.clone(),
                    );
                    marker.position = position;
                    marker.icon = icon;
                    marker.popup = popup;
                    marker.stale_popup = false;
                    marker.entry = entry.clone();
                    changes.moved += 1;
                }
                None => {
                    let handle = self.layer.attach(
                        position,
                        icon.clone(),
                        popup.clone(),
                    );
                    drop(self.index.insert(
                        id,
                        Marker {
                            entry: entry.clone(),
                            handle,
                            position,
                            icon,
                            popup,
                            stale_popup: false,
                        },
                    ));
                    changes.added += 1;
                }
            }
        }

        if self.fit_pending {
            if let Some(bounds) =
                Bounds::covering(self.index.values().map(|m| m.position))
            {
                self.layer.fit_bounds(bounds);
                self.fit_pending = false;
            }
        }

        log::trace!(?changes, markers = self.index.len(), "reconciled");
        changes
    }

    /// Re-skins the attached markers to reflect the `selection`.
    ///
    /// Never attaches or detaches a marker and never moves the viewport.
    /// Popups are re-rendered only while open; closed ones are refreshed by
    /// [`Controller::popup_opened()`].
    pub fn restyle(&mut self, selection: &HashSet<E::Id>) -> Changes {
        let mut changes = Changes::default();

        for (id, marker) in &mut self.index {
            let selected = selection.contains(id);
            let mut touched = false;

            let icon = self.style.icon(&marker.entry, selected);
            if marker.icon != icon {
                self.layer.set_icon(marker.handle, icon.clone());
                marker.icon = icon;
                touched = true;
            }

            let popup = self.style.popup(&marker.entry, selected);
            if marker.popup != popup {
                if self.layer.is_popup_open(marker.handle) {
                    self.layer.set_popup(marker.handle, popup.clone());
                    marker.stale_popup = false;
                    touched = true;
                } else {
                    marker.stale_popup = true;
                }
                marker.popup = popup;
            }

            if touched {
                changes.updated += 1;
            }
        }

        changes
    }

    /// Refreshes the popup content of the entry, if it went outdated while
    /// closed.
    ///
    /// Should be called whenever the map reports a popup being opened.
    pub fn popup_opened(&mut self, id: E::Id) {
        if let Some(marker) = self.index.get_mut(&id) {
            if marker.stale_popup {
                self.layer.set_popup(marker.handle, marker.popup.clone());
                marker.stale_popup = false;
            }
        }
    }

    /// Resolves a click on the marker of the entry into an [`Intent`].
    ///
    /// [`None`] if the entry has no attached marker.
    #[must_use]
    pub fn click(
        &self,
        id: E::Id,
        selection: &HashSet<E::Id>,
    ) -> Option<Intent<E::Id>> {
        self.index.contains_key(&id).then(|| {
            if selection.contains(&id) {
                Intent::Deselect(id)
            } else {
                Intent::Select(id)
            }
        })
    }
}

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use crate::{
        coordinates::parse_str,
        layer::{Memory, Operations},
        Filter, Filterable, LatLng,
    };

    use super::{Changes, Controller, Entry, Intent, Style};

    #[derive(Clone, Debug)]
    struct Pin {
        id: u32,
        name: String,
        coordinates: String,
        status: &'static str,
    }

    fn pin(id: u32, coordinates: &str) -> Pin {
        Pin {
            id,
            name: format!("Billboard {id}"),
            coordinates: coordinates.into(),
            status: "AVAILABLE",
        }
    }

    impl Entry for Pin {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }

        fn position(&self) -> Option<LatLng> {
            parse_str(&self.coordinates)
        }
    }

    impl Filterable for Pin {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn landmark(&self) -> Option<&str> {
            None
        }

        fn city(&self) -> Option<&str> {
            None
        }
    }

    #[derive(Clone, Debug, Eq, PartialEq)]
    struct Icon {
        status: &'static str,
        selected: bool,
    }

    struct Plain;

    impl Style<Pin> for Plain {
        type Icon = Icon;

        fn icon(&self, entry: &Pin, selected: bool) -> Icon {
            Icon {
                status: entry.status,
                selected,
            }
        }

        fn popup(&self, entry: &Pin, selected: bool) -> String {
            let action = if selected { "Deselect" } else { "Select" };
            format!("{} [{action}]", entry.name)
        }
    }

    type Map = Controller<Pin, Plain, Memory<Icon>>;

    fn map() -> Map {
        Controller::new(Memory::default(), Plain)
    }

    fn ids(map: &Map) -> Vec<u32> {
        let mut ids = map.ids().collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn shows_only_valid_positions() {
        let mut map = map();
        let pins = [pin(1, "32.1,13.2"), pin(2, "40,40")];

        let changes = map.reconcile(&pins, &HashSet::new());

        assert_eq!(ids(&map), [1]);
        assert_eq!(changes.added, 1);
        assert_eq!(map.layer().len(), 1);
    }

    #[test]
    fn unplaceable_entries_stay_in_the_list() {
        let mut map = map();
        let pins = [pin(1, "32.1,13.2"), pin(3, "")];

        let listed = Filter::default().apply(&pins, &HashSet::new());
        map.reconcile(listed.iter().copied(), &HashSet::new());

        assert_eq!(listed.len(), 2);
        assert_eq!(ids(&map), [1]);
    }

    #[test]
    fn index_follows_every_visible_subset() {
        let pool = [
            pin(1, "32.1,13.2"),
            pin(2, "40,40"),
            pin(3, "30.5,20.1"),
            pin(4, ""),
            pin(5, r#"{"lat": 25, "lng": 15}"#),
            pin(6, "19,9"),
        ];
        let mut map = map();

        // Gray-code order, so that consecutive subsets differ in one entry,
        // then a pass in plain order for larger jumps.
        let masks = (0u32..64)
            .map(|i| i ^ (i >> 1))
            .chain(0..64)
            .collect::<Vec<_>>();
        for mask in masks {
            let visible = pool
                .iter()
                .filter(|p| mask & (1 << (p.id - 1)) != 0)
                .collect::<Vec<_>>();
            let selection = HashSet::from([mask % 7]);

            map.reconcile(visible.iter().copied(), &selection);

            let expected = visible
                .iter()
                .filter(|p| p.position().is_some())
                .map(|p| p.id)
                .collect::<Vec<_>>();
            assert_eq!(ids(&map), expected, "mask {mask:#08b}");
            assert_eq!(map.layer().len(), expected.len(), "mask {mask:#08b}");
        }
    }

    #[test]
    fn unchanged_data_touches_nothing() {
        let mut map = map();
        let pins = [pin(1, "32.1,13.2"), pin(3, "30.5,20.1")];
        let selection = HashSet::from([3]);

        map.reconcile(&pins, &selection);
        let before = map.layer().operations();

        let changes = map.reconcile(&pins, &selection);

        assert!(changes.is_empty());
        assert_eq!(map.layer().operations(), before);
    }

    #[test]
    fn duplicated_ids_attach_once() {
        let mut map = map();
        let pins = [pin(1, "32.1,13.2"), pin(1, "30.5,20.1")];

        map.reconcile(&pins, &HashSet::new());

        assert_eq!(map.len(), 1);
        assert_eq!(map.layer().operations().attached, 1);
    }

    #[test]
    fn moved_entries_are_reattached() {
        let mut map = map();
        map.reconcile(&[pin(1, "32.1,13.2")], &HashSet::new());
        let old = map.handle(1).unwrap();

        let changes = map.reconcile(&[pin(1, "30.5,20.1")], &HashSet::new());

        let new = map.handle(1).unwrap();
        assert_eq!(changes.moved, 1);
        assert_ne!(old, new);
        assert!(map.layer().marker(old).is_none());
        assert_eq!(
            map.layer().marker(new).unwrap().position,
            LatLng {
                lat: 30.5,
                lng: 20.1
            },
        );
    }

    #[test]
    fn changed_data_is_updated_in_place() {
        let mut map = map();
        let mut pins = [pin(1, "32.1,13.2")];
        map.reconcile(&pins, &HashSet::new());
        let handle = map.handle(1).unwrap();

        pins[0].status = "RENTED";
        pins[0].name = "Renamed".into();
        let changes = map.reconcile(&pins, &HashSet::new());

        assert_eq!(
            changes,
            Changes {
                updated: 1,
                ..Changes::default()
            },
        );
        assert_eq!(map.handle(1), Some(handle));
        let marker = map.layer().marker(handle).unwrap();
        assert_eq!(marker.icon.status, "RENTED");
        assert_eq!(marker.popup, "Renamed [Select]");
    }

    #[test]
    fn restyle_keeps_markers_attached() {
        let mut map = map();
        let pins = [pin(1, "32.1,13.2"), pin(3, "30.5,20.1"), pin(4, "")];
        map.reconcile(&pins, &HashSet::new());
        let handle = map.handle(1).unwrap();
        let before = map.layer().operations();

        let changes = map.restyle(&HashSet::from([1]));

        assert_eq!(changes.updated, 1);
        assert_eq!(map.len(), 2);
        assert_eq!(map.handle(1), Some(handle));
        assert_eq!(
            map.layer().operations(),
            Operations {
                icons: before.icons + 1,
                ..before
            },
        );
        assert!(map.layer().marker(handle).unwrap().icon.selected);
    }

    #[test]
    fn restyle_never_changes_marker_count() {
        let mut map = map();
        let pins = [
            pin(1, "32.1,13.2"),
            pin(2, "40,40"),
            pin(3, "30.5,20.1"),
            pin(5, "25,15"),
        ];
        map.reconcile(&pins, &HashSet::new());

        for selection in [
            HashSet::new(),
            HashSet::from([1]),
            HashSet::from([1, 2, 3, 5]),
            HashSet::from([42]),
            HashSet::new(),
        ] {
            map.restyle(&selection);
            assert_eq!(map.len(), 3);
            assert_eq!(map.layer().len(), 3);
        }
        assert_eq!(map.layer().operations().attached, 3);
        assert_eq!(map.layer().operations().detached, 0);
    }

    #[test]
    fn open_popup_is_refreshed_on_restyle() {
        let mut map = map();
        let pins = [pin(1, "32.1,13.2"), pin(3, "30.5,20.1")];
        map.reconcile(&pins, &HashSet::new());
        let open = map.handle(1).unwrap();
        let closed = map.handle(3).unwrap();
        map.layer_mut().open_popup(open);

        map.restyle(&HashSet::from([1, 3]));

        assert_eq!(
            map.layer().marker(open).unwrap().popup,
            "Billboard 1 [Deselect]",
        );
        assert_eq!(
            map.layer().marker(closed).unwrap().popup,
            "Billboard 3 [Select]",
        );
        assert_eq!(map.layer().operations().popups, 1);

        map.layer_mut().open_popup(closed);
        map.popup_opened(3);

        assert_eq!(
            map.layer().marker(closed).unwrap().popup,
            "Billboard 3 [Deselect]",
        );
        assert_eq!(map.layer().operations().popups, 2);
    }

    #[test]
    fn fits_viewport_once_per_load() {
        let mut map = map();

        map.reconcile(&[pin(2, "40,40")], &HashSet::new());
        assert!(map.layer().fits().is_empty());

        map.reconcile(
            &[pin(1, "32.1,13.2"), pin(3, "30.5,20.1")],
            &HashSet::new(),
        );
        assert_eq!(map.layer().fits().len(), 1);
        let fitted = map.layer().fits()[0];
        assert!(fitted.contains(LatLng {
            lat: 32.1,
            lng: 13.2
        }));
        assert!(fitted.contains(LatLng {
            lat: 30.5,
            lng: 20.1
        }));

        map.restyle(&HashSet::from([1]));
        map.reconcile(&[pin(1, "32.1,13.2")], &HashSet::new());
        assert_eq!(map.layer().fits().len(), 1);

        map.reload();
        map.reconcile(&[pin(1, "32.1,13.2")], &HashSet::new());
        assert_eq!(map.layer().fits().len(), 2);
    }

    #[test]
    fn click_toggles_selection() {
        let mut map = map();
        map.reconcile(&[pin(1, "32.1,13.2"), pin(2, "40,40")], &HashSet::new());

        assert_eq!(map.click(1, &HashSet::new()), Some(Intent::Select(1)));
        assert_eq!(
            map.click(1, &HashSet::from([1])),
            Some(Intent::Deselect(1)),
        );
        assert_eq!(map.click(2, &HashSet::new()), None);
    }
}
