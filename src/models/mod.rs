// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BoundingBox, CategoryCount, Coordinate, DatasetKind, DatasetSelection, NearbyVenue, VenueFilter, VenueRecord};
pub use requests::{GeocodeRequest, NearbyRequest, TopVenuesQuery, VenueQuery};
pub use responses::{CategoriesResponse, CategoryCountsResponse, ErrorResponse, GeocodeResponse, HealthResponse, NearbyResponse, TopVenuesResponse, VenuesResponse};
