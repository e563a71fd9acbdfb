use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{DatasetSelection, VenueFilter, MAX_SCORE, MIN_SCORE};

/// Filters shared by the map endpoints, read from the query string
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct VenueQuery {
    #[serde(default)]
    pub kind: DatasetSelection,
    #[serde(default)]
    pub category: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(alias = "min_score", rename = "minScore")]
    pub min_score: Option<f64>,
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(alias = "max_score", rename = "maxScore")]
    pub max_score: Option<f64>,
}

impl VenueQuery {
    pub fn to_filter(&self) -> VenueFilter {
        VenueFilter {
            selection: self.kind,
            category: normalize_category(self.category.as_deref()),
            min_score: self.min_score.unwrap_or(MIN_SCORE),
            max_score: self.max_score.unwrap_or(MAX_SCORE),
        }
    }
}

/// Request to list venues around a reference venue
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "reference_address", rename = "referenceAddress")]
    pub reference_address: String,
    #[validate(range(min = 0.0))]
    #[serde(alias = "radius_km", rename = "radiusKm")]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub kind: DatasetSelection,
    #[serde(default)]
    pub category: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(alias = "min_score", rename = "minScore")]
    pub min_score: Option<f64>,
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(alias = "max_score", rename = "maxScore")]
    pub max_score: Option<f64>,
}

impl NearbyRequest {
    pub fn to_filter(&self) -> VenueFilter {
        VenueFilter {
            selection: self.kind,
            category: normalize_category(self.category.as_deref()),
            min_score: self.min_score.unwrap_or(MIN_SCORE),
            max_score: self.max_score.unwrap_or(MAX_SCORE),
        }
    }
}

/// Query parameters for the top-N analysis
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TopVenuesQuery {
    #[validate(range(min = 1, max = 500))]
    #[serde(default = "default_top_limit")]
    pub limit: usize,
    #[serde(default, alias = "price_tiers_only", rename = "priceTiersOnly")]
    pub price_tiers_only: bool,
}

fn default_top_limit() -> usize {
    50
}

/// Request to geocode a batch of addresses
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GeocodeRequest {
    #[validate(length(min = 1, max = 1000))]
    pub addresses: Vec<String>,
}

/// Empty and "all" selections both mean no category filter
fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}
