//! [`Billboard`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use service::{domain, query, read, Query as _};
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// An advertising billboard.
#[derive(Clone, Debug, From)]
pub struct Billboard(domain::Billboard);

/// An advertising billboard.
#[graphql_object(context = Context)]
impl Billboard {
    /// Unique identifier of this `Billboard`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Display name of this `Billboard`.
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Landmark helping to find this `Billboard`.
    pub fn landmark(&self) -> Option<Landmark> {
        self.0.landmark.clone().map(Into::into)
    }

    /// Face size of this `Billboard` in meters.
    pub fn size(&self) -> Size {
        self.0.size.clone().into()
    }

    /// Commercial level of this `Billboard` location.
    pub fn level(&self) -> Level {
        self.0.level.into()
    }

    /// Municipality this `Billboard` belongs to.
    pub fn municipality(&self) -> Option<Municipality> {
        self.0.municipality.clone().map(Into::into)
    }

    /// City this `Billboard` is located in.
    pub fn city(&self) -> Option<City> {
        self.0.city.clone().map(Into::into)
    }

    /// District of the city this `Billboard` is located in.
    pub fn district(&self) -> Option<District> {
        self.0.district.clone().map(Into::into)
    }

    /// Coordinates of this `Billboard`, as entered.
    pub fn coordinates(&self) -> Coordinates {
        self.0.coordinates.clone().into()
    }

    /// Validated position of this `Billboard`.
    ///
    /// `null` if the entered `coordinates` are malformed.
    pub fn position(&self) -> Option<Position> {
        self.0.position().map(Into::into)
    }

    /// Current status of this `Billboard`.
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Number of the `Contract` renting this `Billboard`.
    pub fn contract_number(&self) -> Option<api::contract::Number> {
        self.0.contract_number.clone().map(Into::into)
    }

    /// Monthly rent price of this `Billboard`.
    pub fn price(&self) -> Money {
        self.0.price
    }

    /// URL of the design image of this `Billboard`.
    pub fn design_url(&self) -> Option<ImageUrl> {
        self.0.design_url.clone().map(Into::into)
    }

    /// URL of the installation photo of this `Billboard`.
    pub fn installation_url(&self) -> Option<ImageUrl> {
        self.0.installation_url.clone().map(Into::into)
    }

    /// `DateTime` when this `Billboard` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// All the `Contract`s renting this `Billboard`, from the latest.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Billboard.contracts",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn contracts(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Contract>, Error> {
        ctx.service()
            .execute(query::billboard::Contracts::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cs| cs.into_iter().map(Into::into).collect())
    }

    /// Maintenance history of this `Billboard`, from the latest.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Billboard.maintenance",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn maintenance(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Record>, Error> {
        ctx.service()
            .execute(query::billboard::Maintenance::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Billboard`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::billboard::Id)]
#[into(domain::billboard::Id)]
#[graphql(name = "BillboardId", transparent)]
pub struct Id(Uuid);

/// Display name of a `Billboard`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "BillboardName",
    with = scalar::Via::<domain::billboard::Name>,
)]
pub struct Name(domain::billboard::Name);

/// Landmark helping to find a `Billboard`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "BillboardLandmark",
    with = scalar::Via::<domain::billboard::Landmark>,
)]
pub struct Landmark(domain::billboard::Landmark);

/// Face size of a `Billboard` in meters, like `3x4` or `4.5x12`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "BillboardSize",
    with = scalar::Via::<domain::billboard::Size>,
)]
pub struct Size(domain::billboard::Size);

/// Municipality a `Billboard` belongs to.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "Municipality",
    with = scalar::Via::<domain::billboard::Municipality>,
)]
pub struct Municipality(domain::billboard::Municipality);

/// City a `Billboard` is located in.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "City", with = scalar::Via::<domain::billboard::City>)]
pub struct City(domain::billboard::City);

/// District of a city a `Billboard` is located in.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "District",
    with = scalar::Via::<domain::billboard::District>,
)]
pub struct District(domain::billboard::District);

/// Coordinates of a `Billboard` as entered, like `32.8872,13.1913`.
///
/// Malformed values are accepted and only hide the `Billboard` from the map.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "BillboardCoordinates",
    with = scalar::Via::<domain::billboard::Coordinates>,
)]
pub struct Coordinates(domain::billboard::Coordinates);

/// Absolute HTTP(S) URL or root-relative path of a `Billboard` image.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ImageUrl",
    with = scalar::Via::<domain::billboard::ImageUrl>,
)]
pub struct ImageUrl(domain::billboard::ImageUrl);

/// Commercial level of a `Billboard` location.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "BillboardLevel")]
pub enum Level {
    /// Premium location.
    S,

    /// Prime location.
    A,

    /// Regular location.
    B,
}

impl From<domain::billboard::Level> for Level {
    fn from(level: domain::billboard::Level) -> Self {
        use domain::billboard::Level as L;
        match level {
            L::S => Self::S,
            L::A => Self::A,
            L::B => Self::B,
        }
    }
}

impl From<Level> for domain::billboard::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::S => Self::S,
            Level::A => Self::A,
            Level::B => Self::B,
        }
    }
}

/// Status of a `Billboard`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "BillboardStatus")]
pub enum Status {
    /// Free to be rented.
    Available,

    /// Rented by an active `Contract`.
    Rented,

    /// Under maintenance.
    Maintenance,

    /// Taken out of the inventory.
    Removed,
}

impl From<domain::billboard::Status> for Status {
    fn from(status: domain::billboard::Status) -> Self {
        use domain::billboard::Status as S;
        match status {
            S::Available => Self::Available,
            S::Rented => Self::Rented,
            S::Maintenance => Self::Maintenance,
            S::Removed => Self::Removed,
        }
    }
}

/// Validated geographic position.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "LatLng")]
pub struct Position {
    /// Latitude in degrees.
    pub lat: f64,

    /// Longitude in degrees.
    pub lng: f64,
}

impl From<map::LatLng> for Position {
    fn from(p: map::LatLng) -> Self {
        Self { lat: p.lat, lng: p.lng }
    }
}

/// Rectangle covering a set of positions.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "Bounds")]
pub struct Bounds {
    /// Southern latitude.
    pub south: f64,

    /// Western longitude.
    pub west: f64,

    /// Northern latitude.
    pub north: f64,

    /// Eastern longitude.
    pub east: f64,
}

impl From<map::Bounds> for Bounds {
    fn from(b: map::Bounds) -> Self {
        let map::Bounds {
            south,
            west,
            north,
            east,
        } = b;
        Self {
            south,
            west,
            north,
            east,
        }
    }
}

/// Constraint on the selection state of listed `Billboard`s.
#[derive(Clone, Copy, Debug, Default, GraphQLEnum)]
#[graphql(name = "SelectionFilter")]
pub enum SelectionFilter {
    /// No constraint.
    #[default]
    All,

    /// Only the selected `Billboard`s.
    Selected,

    /// Only the not selected `Billboard`s.
    Unselected,
}

impl From<SelectionFilter> for map::SelectionFilter {
    fn from(f: SelectionFilter) -> Self {
        match f {
            SelectionFilter::All => Self::All,
            SelectionFilter::Selected => Self::Selected,
            SelectionFilter::Unselected => Self::Unselected,
        }
    }
}

/// Filter of a `Billboard`s list.
///
/// All the provided constraints must hold. Empty strings and `all` impose no
/// constraint.
#[derive(Clone, Debug, Default, GraphQLInputObject)]
#[graphql(name = "BillboardFilter")]
pub struct Filter {
    /// Case-insensitive part of the name or landmark.
    pub search: Option<String>,

    /// Exact city.
    pub city: Option<String>,

    /// Constraint on the selection state.
    pub selection: Option<SelectionFilter>,

    /// IDs of the currently selected `Billboard`s.
    pub selected: Option<Vec<Id>>,

    /// Whether removed `Billboard`s are listed too.
    pub include_removed: Option<bool>,
}

impl From<Filter> for query::billboards::List {
    fn from(f: Filter) -> Self {
        let Filter {
            search,
            city,
            selection,
            selected,
            include_removed,
        } = f;
        Self {
            filter: map::Filter {
                search,
                city,
                selection: selection.unwrap_or_default().into(),
            },
            selection: selected
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
            include_removed: include_removed.unwrap_or_default(),
        }
    }
}

/// `Billboard` placed on the map.
#[derive(Clone, Debug, From)]
pub struct Marker(read::billboard::Marker);

/// `Billboard` placed on the map.
#[graphql_object(name = "BillboardMarker", context = Context)]
impl Marker {
    /// Placed `Billboard`.
    pub fn billboard(&self) -> Billboard {
        self.0.billboard.clone().into()
    }

    /// Validated position of the `Billboard`.
    pub fn position(&self) -> Position {
        self.0.position.into()
    }
}

/// `BillboardMarker`s of the visible `Billboard`s.
#[derive(Clone, Debug, From)]
pub struct Markers(read::billboard::Markers);

/// `BillboardMarker`s of the visible `Billboard`s.
#[graphql_object(name = "BillboardMarkers", context = Context)]
impl Markers {
    /// `BillboardMarker`s in the list order.
    pub fn markers(&self) -> Vec<Marker> {
        self.0.markers.iter().cloned().map(Into::into).collect()
    }

    /// `Bounds` covering all the `markers`, if there are any.
    pub fn bounds(&self) -> Option<Bounds> {
        self.0.bounds.map(Into::into)
    }
}
