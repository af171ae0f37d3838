//! Coordinate parsing.
//!
//! Billboard coordinates are stored as free text by several generations of
//! forms: `"32.89,13.18"` strings, JSON objects with `lat`/`lng` keys and
//! JSON objects with `latitude`/`longitude` keys. Everything here degrades
//! to [`None`] instead of failing.

use std::ops::RangeInclusive;

use derive_more::Display;
use serde::Deserialize;
use tracing as log;

/// Plausible latitudes of the deployment region.
pub const LATITUDE: RangeInclusive<f64> = 19.0..=34.0;

/// Plausible longitudes of the deployment region.
pub const LONGITUDE: RangeInclusive<f64> = 9.0..=26.0;

/// Validated geographic position inside the deployment region.
#[derive(Clone, Copy, Debug, Display, PartialEq)]
#[display("{lat},{lng}")]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,

    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new [`LatLng`] if both values are finite and lie inside the
    /// [`LATITUDE`] and [`LONGITUDE`] ranges.
    ///
    /// Out-of-range values are rejected, never clamped.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        (lat.is_finite()
            && lng.is_finite()
            && LATITUDE.contains(&lat)
            && LONGITUDE.contains(&lng))
        .then_some(Self { lat, lng })
    }
}

/// Single axis value of an object-shaped [`RawCoordinates`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Axis {
    /// Plain number.
    Number(f64),

    /// Number written as a string.
    Text(String),
}

impl Axis {
    /// Returns the finite numeric value of this [`Axis`], if any.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
        .filter(|v: &f64| v.is_finite())
    }
}

/// Coordinates as they come from storage or from a client.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawCoordinates {
    /// `"lat,lng"` string, or a JSON object serialized into a string.
    Text(String),

    /// Object exposing either spelling of each axis.
    Object {
        /// Latitude, read from `lat` or `latitude`.
        #[serde(default, alias = "latitude")]
        lat: Option<Axis>,

        /// Longitude, read from `lng` or `longitude`.
        #[serde(default, alias = "longitude")]
        lng: Option<Axis>,
    },
}

impl RawCoordinates {
    /// Parses these [`RawCoordinates`] into a validated [`LatLng`].
    #[must_use]
    pub fn parse(&self) -> Option<LatLng> {
        match self {
            Self::Text(s) => parse_str(s),
            Self::Object { lat, lng } => {
                let parsed = lat
                    .as_ref()
                    .and_then(Axis::value)
                    .zip(lng.as_ref().and_then(Axis::value))
                    .and_then(|(lat, lng)| LatLng::new(lat, lng));
                if parsed.is_none() {
                    log::debug!(coordinates = ?self, "invalid coordinates");
                }
                parsed
            }
        }
    }
}

impl From<&str> for RawCoordinates {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// Parses a stored coordinates string into a validated [`LatLng`].
///
/// Accepts `"lat,lng"` (whitespace around either half is ignored) and JSON
/// objects in any of the [`RawCoordinates::Object`] spellings.
#[must_use]
pub fn parse_str(raw: &str) -> Option<LatLng> {
    let raw = raw.trim();
    if raw.starts_with('{') {
        return match serde_json::from_str::<RawCoordinates>(raw) {
            Ok(obj @ RawCoordinates::Object { .. }) => obj.parse(),
            Ok(RawCoordinates::Text(_)) | Err(_) => {
                log::debug!(coordinates = raw, "malformed coordinates object");
                None
            }
        };
    }

    let parsed = raw.split_once(',').and_then(|(lat, lng)| {
        let lat = lat.trim().parse::<f64>().ok()?;
        let lng = lng.trim().parse::<f64>().ok()?;
        LatLng::new(lat, lng)
    });
    if parsed.is_none() && !raw.is_empty() {
        log::debug!(coordinates = raw, "invalid coordinates");
    }
    parsed
}

#[cfg(test)]
mod spec {
    use super::{parse_str, Axis, LatLng, RawCoordinates};

    #[test]
    fn parses_comma_separated_pairs() {
        assert_eq!(
            parse_str("32.1,13.2"),
            Some(LatLng {
                lat: 32.1,
                lng: 13.2
            }),
        );
        assert_eq!(
            parse_str("  32.8872 ,  13.1913 "),
            Some(LatLng {
                lat: 32.8872,
                lng: 13.1913
            }),
        );
    }

    #[test]
    fn accepts_the_whole_region_box() {
        for lat in [19.0, 22.5, 26.0, 30.25, 34.0] {
            for lng in [9.0, 12.5, 17.0, 21.75, 26.0] {
                assert_eq!(
                    parse_str(&format!("{lat},{lng}")),
                    Some(LatLng { lat, lng }),
                    "{lat},{lng}",
                );
            }
        }
    }

    #[test]
    fn rejects_outside_the_region_box() {
        for raw in [
            "18.99,13",
            "34.01,13",
            "32,8.99",
            "32,26.01",
            "40,40",
            "-32.1,13.2",
            "13.2,32.1",
        ] {
            assert_eq!(parse_str(raw), None, "{raw}");
        }
    }

    #[test]
    fn rejects_non_numeric_input() {
        for raw in [
            "",
            "   ",
            "32.1",
            "32.1;13.2",
            "abc,13.2",
            "32.1,",
            ",13.2",
            "32.1,13.2,5",
            "NaN,13",
            "32,inf",
        ] {
            assert_eq!(parse_str(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn reads_both_object_spellings() {
        let short: RawCoordinates =
            serde_json::from_str(r#"{"lat": 32.1, "lng": "13.2"}"#).unwrap();
        let long: RawCoordinates =
            serde_json::from_str(r#"{"latitude": "32.1", "longitude": 13.2}"#)
                .unwrap();
        let expected = Some(LatLng {
            lat: 32.1,
            lng: 13.2,
        });

        assert_eq!(short.parse(), expected);
        assert_eq!(long.parse(), expected);
        assert_eq!(parse_str(r#"{"latitude": 32.1, "lng": 13.2}"#), expected);
    }

    #[test]
    fn rejects_incomplete_objects() {
        let missing = RawCoordinates::Object {
            lat: Some(Axis::Number(32.1)),
            lng: None,
        };
        let garbage = RawCoordinates::Object {
            lat: Some(Axis::Text("north".into())),
            lng: Some(Axis::Number(13.2)),
        };

        assert_eq!(missing.parse(), None);
        assert_eq!(garbage.parse(), None);
        assert_eq!(parse_str(r#"{"lat": 32.1"#), None);
        assert_eq!(parse_str(r#"{"lat": 50, "lng": 13.2}"#), None);
    }

    #[test]
    fn strings_go_through_the_text_form() {
        let raw: RawCoordinates =
            serde_json::from_str(r#""32.1,13.2""#).unwrap();
        assert_eq!(raw, RawCoordinates::from("32.1,13.2"));
        assert!(raw.parse().is_some());
    }
}
