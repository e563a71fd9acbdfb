// Core algorithm exports
pub mod analysis;
pub mod catalog;
pub mod distance;
pub mod filters;

pub use analysis::{category_counts, top_by_score};
pub use catalog::{LocatorError, MappedVenues, NearbyResult, VenueCatalog};
pub use distance::{calculate_bounding_box, centroid, find_within_radius, geodesic_distance_km, is_within_bounding_box};
pub use filters::{distinct_categories, is_price_tier, matches_filter};
