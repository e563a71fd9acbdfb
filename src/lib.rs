//! After Geo - venue geocoding and proximity service for the After dashboard
//!
//! Loads the restaurant and bar datasets, geocodes every distinct address once
//! per process (rate limited, cached in memory), and answers radius queries
//! around a reference venue using geodesic distance.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{VenueCatalog, find_within_radius, geodesic_distance_km};
pub use models::{Coordinate, DatasetKind, VenueFilter, VenueRecord};
pub use services::{GeoLookupService, Geocoder, NominatimClient, RateLimitPolicy};
