use serde::{Deserialize, Serialize};

/// WGS84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// geo uses (x, y) = (longitude, latitude)
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

/// Which dataset a venue was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Restaurant,
    Bar,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Restaurant => "restaurant",
            DatasetKind::Bar => "bar",
        }
    }
}

/// A single venue row from one of the datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueRecord {
    pub name: String,
    pub address: String,
    pub category: String,
    pub score: f64,
    #[serde(rename = "datasetKind")]
    pub dataset_kind: DatasetKind,
    /// Absent until geocoded, and permanently absent if geocoding failed
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
}

impl VenueRecord {
    pub fn is_geocoded(&self) -> bool {
        self.coordinate.is_some()
    }
}

/// Which datasets a query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSelection {
    #[default]
    All,
    Restaurants,
    Bars,
}

impl DatasetSelection {
    #[inline]
    pub fn includes(&self, kind: DatasetKind) -> bool {
        match self {
            DatasetSelection::All => true,
            DatasetSelection::Restaurants => kind == DatasetKind::Restaurant,
            DatasetSelection::Bars => kind == DatasetKind::Bar,
        }
    }
}

/// User-chosen filters for the map view
#[derive(Debug, Clone, PartialEq)]
pub struct VenueFilter {
    pub selection: DatasetSelection,
    /// `None` means every category
    pub category: Option<String>,
    pub min_score: f64,
    pub max_score: f64,
}

impl Default for VenueFilter {
    fn default() -> Self {
        Self {
            selection: DatasetSelection::All,
            category: None,
            min_score: MIN_SCORE,
            max_score: MAX_SCORE,
        }
    }
}

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 5.0;

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// A venue together with its distance from the reference point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyVenue {
    #[serde(flatten)]
    pub venue: VenueRecord,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
}

/// Number of venues sharing a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}
