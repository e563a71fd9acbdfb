use std::collections::HashMap;
use thiserror::Error;

use crate::core::{
    analysis::{category_counts, top_by_score},
    distance::{centroid, within_radius_with_distance},
    filters::{distinct_categories, matches_filter},
};
use crate::models::{
    CategoryCount, Coordinate, DatasetKind, DatasetSelection, NearbyVenue, VenueFilter, VenueRecord,
};

/// Errors raised by map queries
#[derive(Debug, Error, PartialEq)]
pub enum LocatorError {
    #[error("Reference address not found among filtered venues: {0}")]
    ReferenceNotFound(String),

    #[error("Radius must be a non-negative number of kilometers, got {0}")]
    InvalidRadius(f64),
}

/// Venues visible on the map, with their center
#[derive(Debug, Clone)]
pub struct MappedVenues {
    pub venues: Vec<VenueRecord>,
    pub center: Option<Coordinate>,
}

/// Venues around a reference venue
#[derive(Debug, Clone)]
pub struct NearbyResult {
    pub reference: Coordinate,
    pub venues: Vec<NearbyVenue>,
}

/// Both datasets after geocoding
///
/// Read-only once built; the analysis summaries use every record, the map
/// queries only the geocoded ones.
#[derive(Debug, Clone, Default)]
pub struct VenueCatalog {
    venues: Vec<VenueRecord>,
}

impl VenueCatalog {
    /// Attach resolved coordinates to the records
    ///
    /// `resolved` is the output of the geocoding pass, keyed by address as it
    /// appears in the dataset.
    pub fn build(
        records: Vec<VenueRecord>,
        resolved: &HashMap<String, Option<Coordinate>>,
    ) -> Self {
        let venues = records
            .into_iter()
            .map(|mut record| {
                record.coordinate = resolved.get(&record.address).copied().flatten();
                record
            })
            .collect();

        Self { venues }
    }

    pub fn from_records(venues: Vec<VenueRecord>) -> Self {
        Self { venues }
    }

    pub fn venues(&self) -> &[VenueRecord] {
        &self.venues
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn geocoded_count(&self) -> usize {
        self.geocoded().count()
    }

    fn geocoded(&self) -> impl Iterator<Item = &VenueRecord> {
        self.venues.iter().filter(|v| v.is_geocoded())
    }

    /// Categories offered by the map's category selector
    pub fn categories(&self, selection: DatasetSelection) -> Vec<String> {
        distinct_categories(self.geocoded(), selection)
    }

    /// Geocoded venues passing the filter
    pub fn filtered(&self, filter: &VenueFilter) -> Vec<VenueRecord> {
        self.geocoded()
            .filter(|v| matches_filter(v, filter))
            .cloned()
            .collect()
    }

    /// Venues for the default map view, centered on their mean position
    pub fn mapped(&self, filter: &VenueFilter) -> MappedVenues {
        let venues = self.filtered(filter);
        let center = centroid(venues.iter().filter_map(|v| v.coordinate));

        MappedVenues { venues, center }
    }

    /// Filtered venues within `radius_km` of the venue at `reference_address`
    ///
    /// The reference is the first filtered venue with exactly that address.
    ///
    /// # Errors
    /// * `LocatorError::InvalidRadius` - negative or non-finite radius
    /// * `LocatorError::ReferenceNotFound` - no filtered, geocoded venue has that address
    pub fn nearby(
        &self,
        filter: &VenueFilter,
        reference_address: &str,
        radius_km: f64,
    ) -> Result<NearbyResult, LocatorError> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(LocatorError::InvalidRadius(radius_km));
        }

        let filtered = self.filtered(filter);

        let reference = filtered
            .iter()
            .find(|v| v.address == reference_address)
            .and_then(|v| v.coordinate)
            .ok_or_else(|| LocatorError::ReferenceNotFound(reference_address.to_string()))?;

        let venues = within_radius_with_distance(reference, &filtered, radius_km)
            .into_iter()
            .map(|(venue, distance_km)| NearbyVenue {
                venue: venue.clone(),
                distance_km,
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "{} of {} filtered venues within {} km of {}",
            venues.len(),
            filtered.len(),
            radius_km,
            reference_address
        );

        Ok(NearbyResult { reference, venues })
    }

    pub fn category_counts(&self, kind: DatasetKind) -> Vec<CategoryCount> {
        category_counts(&self.venues, kind)
    }

    pub fn top_by_score(&self, kind: DatasetKind, limit: usize, price_tiers_only: bool) -> Vec<VenueRecord> {
        top_by_score(&self.venues, kind, limit, price_tiers_only)
    }
}
