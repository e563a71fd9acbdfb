// Service exports
pub mod cache;
pub mod datasets;
pub mod geocoder;
pub mod lookup;

pub use cache::{CacheKey, CacheStats, GeocodeCache};
pub use datasets::{load_dataset, read_dataset, DatasetColumns, DatasetError};
pub use geocoder::{GeocodeError, Geocoder, NominatimClient};
pub use lookup::{Clock, GeoLookupService, RateLimitPolicy, SystemClock};
