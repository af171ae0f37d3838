//! Visible-set derivation.

use std::{collections::HashSet, hash::Hash};

/// Value selecting no constraint in a [`Filter`] field.
pub const ALL: &str = "all";

/// Item which can be narrowed down by a [`Filter`].
pub trait Filterable {
    /// Type of the item identifier, matched against a selection.
    type Id: Eq + Hash;

    /// Returns the identifier of this item.
    fn id(&self) -> Self::Id;

    /// Returns the display name of this item.
    fn name(&self) -> &str;

    /// Returns the landmark description of this item, if any.
    fn landmark(&self) -> Option<&str>;

    /// Returns the city of this item, if any.
    fn city(&self) -> Option<&str>;
}

/// Selection-membership constraint of a [`Filter`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SelectionFilter {
    /// Every item passes.
    #[default]
    All,

    /// Only selected items pass.
    Selected,

    /// Only unselected items pass.
    Unselected,
}

/// Conjunction of the user-chosen constraints.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    /// Case-insensitive substring of either the name or the landmark.
    pub search: Option<String>,

    /// Exact city.
    pub city: Option<String>,

    /// Selection membership.
    pub selection: SelectionFilter,
}

impl Filter {
    /// Returns the `items` passing this [`Filter`], preserving their order.
    pub fn apply<'i, T>(
        &self,
        items: impl IntoIterator<Item = &'i T>,
        selection: &HashSet<T::Id>,
    ) -> Vec<&'i T>
    where
        T: Filterable + 'i,
    {
        let search = constraint(self.search.as_deref()).map(str::to_lowercase);
        let city = constraint(self.city.as_deref());

        items
            .into_iter()
            .filter(|item| {
                search.as_deref().is_none_or(|needle| {
                    contains_lowercase(item.name(), needle)
                        || item
                            .landmark()
                            .is_some_and(|l| contains_lowercase(l, needle))
                })
            })
            .filter(|item| {
                city.is_none_or(|c| item.city().is_some_and(|v| v.trim() == c))
            })
            .filter(|item| match self.selection {
                SelectionFilter::All => true,
                SelectionFilter::Selected => selection.contains(&item.id()),
                SelectionFilter::Unselected => !selection.contains(&item.id()),
            })
            .collect()
    }

    /// Indicates whether this [`Filter`] imposes no constraint at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        constraint(self.search.as_deref()).is_none()
            && constraint(self.city.as_deref()).is_none()
            && self.selection == SelectionFilter::All
    }
}

/// Normalizes a textual [`Filter`] field, treating blank values and [`ALL`]
/// as no constraint.
fn constraint(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use super::{Filter, Filterable, SelectionFilter};

    struct Item {
        id: u32,
        name: &'static str,
        landmark: Option<&'static str>,
        city: Option<&'static str>,
    }

    impl Filterable for Item {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }

        fn name(&self) -> &str {
            self.name
        }

        fn landmark(&self) -> Option<&str> {
            self.landmark
        }

        fn city(&self) -> Option<&str> {
            self.city
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: 1,
                name: "Airport Road North",
                landmark: Some("near the roundabout"),
                city: Some("Tripoli"),
            },
            Item {
                id: 2,
                name: "Corniche",
                landmark: Some("Airport exit"),
                city: Some("Benghazi"),
            },
            Item {
                id: 3,
                name: "Old Town Gate",
                landmark: None,
                city: Some("Tripoli "),
            },
            Item {
                id: 4,
                name: "Coastal Highway",
                landmark: None,
                city: None,
            },
        ]
    }

    fn ids(found: &[&Item]) -> Vec<u32> {
        found.iter().map(|i| i.id).collect()
    }

    #[test]
    fn empty_filter_passes_everything() {
        let items = items();
        let none = HashSet::new();

        assert!(Filter::default().is_empty());
        assert_eq!(ids(&Filter::default().apply(&items, &none)), [1, 2, 3, 4]);

        let sentinels = Filter {
            search: Some("  ".into()),
            city: Some("ALL".into()),
            selection: SelectionFilter::All,
        };
        assert!(sentinels.is_empty());
        assert_eq!(ids(&sentinels.apply(&items, &none)), [1, 2, 3, 4]);
    }

    #[test]
    fn searches_name_or_landmark_ignoring_case() {
        let items = items();
        let filter = Filter {
            search: Some("AIRPORT".into()),
            ..Filter::default()
        };

        assert_eq!(ids(&filter.apply(&items, &HashSet::new())), [1, 2]);
    }

    #[test]
    fn matches_city_exactly() {
        let items = items();
        let filter = Filter {
            city: Some("Tripoli".into()),
            ..Filter::default()
        };
        assert_eq!(ids(&filter.apply(&items, &HashSet::new())), [1, 3]);

        let partial = Filter {
            city: Some("Trip".into()),
            ..Filter::default()
        };
        assert!(partial.apply(&items, &HashSet::new()).is_empty());
    }

    #[test]
    fn narrows_by_selection() {
        let items = items();
        let selection = HashSet::from([2, 4]);

        let selected = Filter {
            selection: SelectionFilter::Selected,
            ..Filter::default()
        };
        let unselected = Filter {
            selection: SelectionFilter::Unselected,
            ..Filter::default()
        };

        assert_eq!(ids(&selected.apply(&items, &selection)), [2, 4]);
        assert_eq!(ids(&unselected.apply(&items, &selection)), [1, 3]);
    }

    #[test]
    fn combines_constraints() {
        let items = items();
        let filter = Filter {
            search: Some("o".into()),
            city: Some("tripoli".into()),
            selection: SelectionFilter::Unselected,
        };

        // City is case-sensitive.
        assert!(filter.apply(&items, &HashSet::new()).is_empty());

        let filter = Filter {
            city: Some("Tripoli".into()),
            ..filter
        };
        assert_eq!(ids(&filter.apply(&items, &HashSet::from([1]))), [3]);
    }

    #[test]
    fn is_idempotent() {
        let items = items();
        let selection = HashSet::from([1, 3]);

        for filter in [
            Filter::default(),
            Filter {
                search: Some("a".into()),
                ..Filter::default()
            },
            Filter {
                city: Some("Tripoli".into()),
                selection: SelectionFilter::Selected,
                ..Filter::default()
            },
            Filter {
                search: Some("gate".into()),
                selection: SelectionFilter::Unselected,
                ..Filter::default()
            },
        ] {
            let once = filter.apply(&items, &selection);
            let twice = filter.apply(once.iter().copied(), &selection);
            assert_eq!(ids(&once), ids(&twice), "{filter:?}");
        }
    }
}
