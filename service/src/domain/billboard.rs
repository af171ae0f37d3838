//! [`Billboard`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
use map::{coordinates, LatLng};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{contract, define_text};

/// Advertising billboard.
#[derive(Clone, Debug)]
pub struct Billboard {
    /// ID of this [`Billboard`].
    pub id: Id,

    /// [`Name`] of this [`Billboard`].
    pub name: Name,

    /// [`Landmark`] near this [`Billboard`], if any.
    pub landmark: Option<Landmark>,

    /// [`Size`] of this [`Billboard`] face.
    pub size: Size,

    /// Commercial [`Level`] of this [`Billboard`].
    pub level: Level,

    /// [`Municipality`] this [`Billboard`] belongs to, if known.
    pub municipality: Option<Municipality>,

    /// [`City`] this [`Billboard`] is located in, if known.
    pub city: Option<City>,

    /// [`District`] this [`Billboard`] is located in, if known.
    pub district: Option<District>,

    /// [`Coordinates`] of this [`Billboard`], as stored.
    pub coordinates: Coordinates,

    /// Current [`Status`] of this [`Billboard`].
    pub status: Status,

    /// Number of the [`Contract`] renting this [`Billboard`], if any.
    ///
    /// [`Contract`]: crate::domain::Contract
    pub contract_number: Option<contract::Number>,

    /// Monthly rent price of this [`Billboard`].
    pub price: Money,

    /// URL of the current design image, if any.
    pub design_url: Option<ImageUrl>,

    /// URL of the installation photo, if any.
    pub installation_url: Option<ImageUrl>,

    /// [`DateTime`] when this [`Billboard`] was created.
    pub created_at: CreationDateTime,
}

impl Billboard {
    /// Returns the validated position of this [`Billboard`], if its
    /// [`Coordinates`] are valid.
    #[must_use]
    pub fn position(&self) -> Option<LatLng> {
        self.coordinates.position()
    }

    /// Indicates whether this [`Billboard`] can be put into a new contract.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == Status::Available
    }

    /// Marks this [`Billboard`] as rented by the [`Contract`] with the
    /// provided [`contract::Number`].
    ///
    /// [`Contract`]: crate::domain::Contract
    pub fn rent(&mut self, number: contract::Number) {
        self.status = Status::Rented;
        self.contract_number = Some(number);
    }

    /// Releases this [`Billboard`] from the [`Contract`] with the provided
    /// [`contract::Number`].
    ///
    /// A [`Billboard`] under maintenance stays so. Returns `false` if this
    /// [`Billboard`] isn't held by that [`Contract`].
    ///
    /// [`Contract`]: crate::domain::Contract
    pub fn release(&mut self, number: &contract::Number) -> bool {
        if self.contract_number.as_ref() != Some(number) {
            return false;
        }
        self.contract_number = None;
        if self.status == Status::Rented {
            self.status = Status::Available;
        }
        true
    }

    /// Returns this [`Billboard`] into service after a maintenance, rented by
    /// the provided [`contract::Number`] if any active contract still covers
    /// it.
    pub fn restore(&mut self, active: Option<contract::Number>) {
        match active {
            Some(number) => self.rent(number),
            None => {
                self.status = Status::Available;
                self.contract_number = None;
            }
        }
    }
}

impl map::Filterable for Billboard {
    type Id = Id;

    fn id(&self) -> Id {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_ref()
    }

    fn landmark(&self) -> Option<&str> {
        self.landmark.as_ref().map(AsRef::as_ref)
    }

    fn city(&self) -> Option<&str> {
        self.city.as_ref().map(AsRef::as_ref)
    }
}

impl map::Entry for Billboard {
    type Id = Id;

    fn id(&self) -> Id {
        self.id
    }

    fn position(&self) -> Option<LatLng> {
        self.coordinates.position()
    }
}

/// ID of a [`Billboard`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_text! {
    #[doc = "Display name of a [`Billboard`]."]
    Name(max = 256)
}

define_text! {
    #[doc = "Landmark helping to find a [`Billboard`]."]
    Landmark(max = 512)
}

define_text! {
    #[doc = "Municipality a [`Billboard`] belongs to."]
    Municipality(max = 256)
}

define_text! {
    #[doc = "City a [`Billboard`] is located in."]
    City(max = 256)
}

define_text! {
    #[doc = "District of a city a [`Billboard`] is located in."]
    District(max = 256)
}

/// Face size of a [`Billboard`] in meters, like `3x4` or `4.5x12`.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Size(String);

impl Size {
    /// Creates a new [`Size`] if the given `size` is valid.
    ///
    /// The separator is case-insensitive and normalized to `x`.
    #[must_use]
    pub fn new(size: impl AsRef<str>) -> Option<Self> {
        static FORMAT: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\d{1,3}(\.\d{1,2})?[xX]\d{1,3}(\.\d{1,2})?$")
                .expect("valid regex")
        });

        let size = size.as_ref().trim();
        FORMAT
            .is_match(size)
            .then(|| Self(size.replace('X', "x")))
    }
}

impl FromStr for Size {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Size`")
    }
}

/// Coordinates of a [`Billboard`], as entered.
///
/// Kept verbatim, so that a malformed value only hides the [`Billboard`] from
/// the map instead of losing it.
#[derive(AsRef, Clone, Debug, Default, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Coordinates(String);

impl Coordinates {
    /// Maximum length of [`Coordinates`] in bytes.
    pub const MAX_LEN: usize = 512;

    /// Creates new [`Coordinates`] if they fit into [`Coordinates::MAX_LEN`].
    ///
    /// The content is not validated.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        (trimmed.len() <= Self::MAX_LEN).then(|| Self(trimmed.to_owned()))
    }

    /// Returns the validated position these [`Coordinates`] point to.
    #[must_use]
    pub fn position(&self) -> Option<LatLng> {
        coordinates::parse_str(&self.0)
    }
}

impl FromStr for Coordinates {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("`Coordinates` are too long")
    }
}

/// URL of a [`Billboard`] image.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`] if the given `url` is an absolute HTTP(S)
    /// URL or a root-relative path.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        let valid = url.trim() == url
            && url.len() <= 2048
            && !url.chars().any(char::is_whitespace)
            && (url.starts_with("https://")
                || url.starts_with("http://")
                || (url.starts_with('/') && url.len() > 1));
        valid.then_some(Self(url))
    }
}

impl FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

define_kind! {
    #[doc = "Commercial level of a [`Billboard`] location."]
    enum Level {
        #[doc = "Premium location."]
        S = 1,

        #[doc = "Prime location."]
        A = 2,

        #[doc = "Regular location."]
        B = 3,
    }
}

define_kind! {
    #[doc = "Status of a [`Billboard`]."]
    enum Status {
        #[doc = "Free to be rented."]
        Available = 1,

        #[doc = "Rented by an active contract."]
        Rented = 2,

        #[doc = "Under maintenance."]
        Maintenance = 3,

        #[doc = "Taken out of the inventory."]
        Removed = 4,
    }
}

/// [`DateTime`] when a [`Billboard`] was created.
pub type CreationDateTime = DateTimeOf<(Billboard, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{DateTime, Money};

    use crate::domain::contract;

    use super::{
        Billboard, Coordinates, Id, ImageUrl, Level, Name, Size, Status,
    };

    fn billboard(status: Status) -> Billboard {
        Billboard {
            id: Id::new(),
            name: Name::from_str("Airport Road").unwrap(),
            landmark: None,
            size: Size::from_str("4x12").unwrap(),
            level: Level::A,
            municipality: None,
            city: None,
            district: None,
            coordinates: Coordinates::default(),
            status,
            contract_number: None,
            price: Money::from_str("1500LYD").unwrap(),
            design_url: None,
            installation_url: None,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn releases_only_own_contract() {
        let own = contract::Number::from_sequence(1);
        let other = contract::Number::from_sequence(2);
        let mut b = billboard(Status::Available);
        b.rent(own.clone());

        assert!(!b.release(&other));
        assert_eq!(b.status, Status::Rented);

        assert!(b.release(&own));
        assert_eq!(b.status, Status::Available);
        assert_eq!(b.contract_number, None);
    }

    #[test]
    fn release_keeps_maintenance() {
        let number = contract::Number::from_sequence(1);
        let mut b = billboard(Status::Maintenance);
        b.contract_number = Some(number.clone());

        assert!(b.release(&number));
        assert_eq!(b.status, Status::Maintenance);
        assert_eq!(b.contract_number, None);
    }

    #[test]
    fn restores_after_maintenance() {
        let number = contract::Number::from_sequence(9);

        let mut rented = billboard(Status::Maintenance);
        rented.restore(Some(number.clone()));
        assert_eq!(rented.status, Status::Rented);
        assert_eq!(rented.contract_number, Some(number));

        let mut free = billboard(Status::Maintenance);
        free.restore(None);
        assert_eq!(free.status, Status::Available);
    }

    #[test]
    fn size_format() {
        assert_eq!(Size::from_str("3x4").unwrap().as_ref(), "3x4");
        assert_eq!(Size::from_str(" 4.5X12 ").unwrap().as_ref(), "4.5x12");

        assert!(Size::from_str("3 x 4").is_err());
        assert!(Size::from_str("3x").is_err());
        assert!(Size::from_str("big").is_err());
    }

    #[test]
    fn coordinates_are_kept_verbatim() {
        let bad = Coordinates::new("somewhere near the port").unwrap();
        assert_eq!(bad.as_ref(), "somewhere near the port");
        assert!(bad.position().is_none());

        let good = Coordinates::new(" 32.8872,13.1913 ").unwrap();
        assert_eq!(good.as_ref(), "32.8872,13.1913");
        assert!(good.position().is_some());

        assert!(Coordinates::new("1".repeat(513)).is_none());
    }

    #[test]
    fn image_url() {
        assert!(ImageUrl::from_str("https://cdn.example.com/a.jpg").is_ok());
        assert!(ImageUrl::from_str("/uploads/a.jpg").is_ok());

        assert!(ImageUrl::from_str("/").is_err());
        assert!(ImageUrl::from_str("ftp://example.com/a.jpg").is_err());
        assert!(ImageUrl::from_str("https://example.com/a b.jpg").is_err());
    }

    #[test]
    fn kinds_string_forms() {
        assert_eq!(Status::Maintenance.to_string(), "MAINTENANCE");
        assert_eq!(Status::from_str("rented").unwrap(), Status::Rented);
        assert_eq!(Level::from_str("S").unwrap(), Level::S);
        assert!(Status::from_str("LOST").is_err());
    }
}
