use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::domain::{CategoryCount, Coordinate, NearbyVenue, VenueRecord};
use crate::services::CacheStats;

/// Response for the venue map endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenuesResponse {
    pub venues: Vec<VenueRecord>,
    /// Mean position of the returned venues, `None` when there are none
    pub center: Option<Coordinate>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

/// Response for the nearby endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyResponse {
    pub reference: Coordinate,
    #[serde(rename = "referenceAddress")]
    pub reference_address: String,
    #[serde(rename = "radiusKm")]
    pub radius_km: f64,
    pub venues: Vec<NearbyVenue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCountsResponse {
    pub counts: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopVenuesResponse {
    pub venues: Vec<VenueRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub results: HashMap<String, Option<Coordinate>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "geocodedVenues")]
    pub geocoded_venues: usize,
    #[serde(rename = "totalVenues")]
    pub total_venues: usize,
    #[serde(rename = "geocodeCache")]
    pub geocode_cache: CacheStats,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
