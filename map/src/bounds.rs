//! [`Bounds`] definitions.

use crate::LatLng;

/// Rectangular geographic area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Southern edge latitude.
    pub south: f64,

    /// Western edge longitude.
    pub west: f64,

    /// Northern edge latitude.
    pub north: f64,

    /// Eastern edge longitude.
    pub east: f64,
}

impl Bounds {
    /// Creates degenerate [`Bounds`] covering a single point.
    #[must_use]
    pub const fn point(p: LatLng) -> Self {
        Self {
            south: p.lat,
            west: p.lng,
            north: p.lat,
            east: p.lng,
        }
    }

    /// Creates the smallest [`Bounds`] covering all the provided points.
    ///
    /// [`None`] if there are no points.
    #[must_use]
    pub fn covering(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = Self::point(points.next()?);
        Some(points.fold(first, |mut b, p| {
            b.extend(p);
            b
        }))
    }

    /// Grows these [`Bounds`] to cover the provided point.
    pub fn extend(&mut self, p: LatLng) {
        self.south = self.south.min(p.lat);
        self.west = self.west.min(p.lng);
        self.north = self.north.max(p.lat);
        self.east = self.east.max(p.lng);
    }

    /// Indicates whether these [`Bounds`] cover the provided point.
    #[must_use]
    pub fn contains(&self, p: LatLng) -> bool {
        (self.south..=self.north).contains(&p.lat)
            && (self.west..=self.east).contains(&p.lng)
    }

    /// Returns the center of these [`Bounds`].
    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng {
            lat: (self.south + self.north) / 2.0,
            lng: (self.west + self.east) / 2.0,
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Bounds, LatLng};

    #[test]
    fn covers_all_points() {
        let points = [
            LatLng {
                lat: 32.9,
                lng: 13.2,
            },
            LatLng {
                lat: 32.1,
                lng: 20.1,
            },
            LatLng {
                lat: 27.0,
                lng: 14.4,
            },
        ];

        let bounds = Bounds::covering(points).unwrap();

        assert_eq!(
            bounds,
            Bounds {
                south: 27.0,
                west: 13.2,
                north: 32.9,
                east: 20.1,
            },
        );
        assert!(points.iter().all(|p| bounds.contains(*p)));
        assert!(!bounds.contains(LatLng {
            lat: 33.0,
            lng: 15.0
        }));
    }

    #[test]
    fn no_points_no_bounds() {
        assert_eq!(Bounds::covering([]), None);
    }
}
