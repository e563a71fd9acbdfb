use geo::GeodesicDistance;

use crate::models::{BoundingBox, Coordinate, VenueRecord};

/// Shortest length of one degree of latitude on the WGS84 ellipsoid (at the equator), in km
const MIN_KM_PER_DEGREE: f64 = 110.5;

/// Geodesic distance on the WGS84 ellipsoid in kilometers
///
/// This is the distance used for every radius decision.
#[inline]
pub fn geodesic_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    a.to_point().geodesic_distance(&b.to_point()) / 1000.0
}

/// Calculate a bounding box around a center point
///
/// Cheap pre-filter for radius queries. The box is sized with the shortest
/// degree length on the ellipsoid, so it always contains the geodesic circle.
///
/// # Arguments
/// * `lat` - Center latitude in degrees
/// * `lon` - Center longitude in degrees
/// * `radius_km` - Radius in kilometers
///
/// # Returns
/// BoundingBox with min/max lat/lon; longitude bounds may fall outside -180..180
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / MIN_KM_PER_DEGREE;

    // Longitude degrees shrink with cos(latitude); use the widest latitude the circle reaches
    let widest_lat = (lat.abs() + lat_delta).min(90.0);
    let lon_delta = radius_km / (MIN_KM_PER_DEGREE * widest_lat.to_radians().cos());

    BoundingBox {
        min_lat: lat - lat_delta,
        max_lat: lat + lat_delta,
        min_lon: lon - lon_delta,
        max_lon: lon + lon_delta,
    }
}

/// Check if a point is within a bounding box
///
/// Boxes that reach a pole or cross the antimeridian do not constrain longitude.
#[inline]
pub fn is_within_bounding_box(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    if lat < bbox.min_lat || lat > bbox.max_lat {
        return false;
    }

    let unbounded_lon = bbox.max_lat >= 90.0
        || bbox.min_lat <= -90.0
        || bbox.min_lon < -180.0
        || bbox.max_lon > 180.0
        || !bbox.min_lon.is_finite()
        || !bbox.max_lon.is_finite();

    unbounded_lon || (lon >= bbox.min_lon && lon <= bbox.max_lon)
}

/// Venues whose geodesic distance from `reference` is at most `radius_km`
///
/// # Arguments
/// * `reference` - Center of the search
/// * `candidates` - Venues to test; those without a coordinate are skipped
/// * `radius_km` - Inclusive radius in kilometers
///
/// # Returns
/// Matching venues in input order. Empty for a negative or non-finite radius.
pub fn find_within_radius(
    reference: Coordinate,
    candidates: &[VenueRecord],
    radius_km: f64,
) -> Vec<VenueRecord> {
    within_radius_with_distance(reference, candidates, radius_km)
        .into_iter()
        .map(|(venue, _)| venue.clone())
        .collect()
}

/// Same selection as [`find_within_radius`], paired with each venue's distance
pub fn within_radius_with_distance<'a>(
    reference: Coordinate,
    candidates: &'a [VenueRecord],
    radius_km: f64,
) -> Vec<(&'a VenueRecord, f64)> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Vec::new();
    }

    let bbox = calculate_bounding_box(reference.latitude, reference.longitude, radius_km);

    candidates
        .iter()
        .filter_map(|venue| venue.coordinate.map(|c| (venue, c)))
        // Stage 1: bounding box pre-filter
        .filter(|(_, c)| is_within_bounding_box(c.latitude, c.longitude, &bbox))
        // Stage 2: exact geodesic distance, inclusive boundary
        .filter_map(|(venue, c)| {
            let distance_km = geodesic_distance_km(reference, c);
            (distance_km <= radius_km).then_some((venue, distance_km))
        })
        .collect()
}

/// Mean latitude and longitude, used as the default map center
pub fn centroid<I>(coordinates: I) -> Option<Coordinate>
where
    I: IntoIterator<Item = Coordinate>,
{
    let (count, lat_sum, lon_sum) = coordinates
        .into_iter()
        .fold((0usize, 0.0, 0.0), |(n, lat, lon), c| {
            (n + 1, lat + c.latitude, lon + c.longitude)
        });

    if count == 0 {
        return None;
    }

    Some(Coordinate::new(lat_sum / count as f64, lon_sum / count as f64))
}
