use crate::models::{DatasetSelection, VenueFilter, VenueRecord};

/// Categories that stand for a price tier rather than a cuisine or venue type
pub const PRICE_TIERS: [&str; 4] = ["$", "$$", "$$$", "$$$$"];

/// Check if a venue passes the user's map filters
///
/// Dataset selection, then category (exact match), then the inclusive score range.
#[inline]
pub fn matches_filter(venue: &VenueRecord, filter: &VenueFilter) -> bool {
    if !filter.selection.includes(venue.dataset_kind) {
        return false;
    }

    if let Some(category) = &filter.category {
        if venue.category != *category {
            return false;
        }
    }

    venue.score >= filter.min_score && venue.score <= filter.max_score
}

/// Check if a venue's category is one of the price tiers
#[inline]
pub fn is_price_tier(venue: &VenueRecord) -> bool {
    PRICE_TIERS.contains(&venue.category.as_str())
}

/// Sorted, distinct categories of the venues in a selection
pub fn distinct_categories<'a, I>(venues: I, selection: DatasetSelection) -> Vec<String>
where
    I: IntoIterator<Item = &'a VenueRecord>,
{
    let mut categories: Vec<String> = venues
        .into_iter()
        .filter(|v| selection.includes(v.dataset_kind))
        .map(|v| v.category.clone())
        .collect();

    categories.sort();
    categories.dedup();
    categories
}
