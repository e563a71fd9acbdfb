use std::collections::HashMap;

use crate::core::filters::is_price_tier;
use crate::models::{CategoryCount, DatasetKind, VenueRecord};

/// Number of venues per category for one dataset
///
/// Sorted by count (descending), ties broken by category name.
pub fn category_counts<'a, I>(venues: I, kind: DatasetKind) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a VenueRecord>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for venue in venues.into_iter().filter(|v| v.dataset_kind == kind) {
        *counts.entry(venue.category.as_str()).or_default() += 1;
    }

    let mut counts: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();

    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    counts
}

/// Best-rated venues of one dataset
///
/// Sorted by score (descending); equal scores keep dataset order. With
/// `price_tiers_only`, only venues categorized as `$`..`$$$$` are ranked.
pub fn top_by_score<'a, I>(
    venues: I,
    kind: DatasetKind,
    limit: usize,
    price_tiers_only: bool,
) -> Vec<VenueRecord>
where
    I: IntoIterator<Item = &'a VenueRecord>,
{
    let mut ranked: Vec<&VenueRecord> = venues
        .into_iter()
        .filter(|v| v.dataset_kind == kind)
        .filter(|v| !price_tiers_only || is_price_tier(v))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_venue(name: &str, category: &str, score: f64, kind: DatasetKind) -> VenueRecord {
        VenueRecord {
            name: name.to_string(),
            address: String::new(),
            category: category.to_string(),
            score,
            dataset_kind: kind,
            coordinate: None,
        }
    }

    #[test]
    fn test_category_counts_ordering() {
        let venues = vec![
            create_venue("a", "Restaurante", 4.0, DatasetKind::Restaurant),
            create_venue("b", "$$", 4.0, DatasetKind::Restaurant),
            create_venue("c", "Restaurante", 4.0, DatasetKind::Restaurant),
            create_venue("d", "$", 4.0, DatasetKind::Restaurant),
            create_venue("e", "Bar", 4.0, DatasetKind::Bar),
        ];

        let counts = category_counts(&venues, DatasetKind::Restaurant);

        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0], CategoryCount { category: "Restaurante".to_string(), count: 2 });
        // Ties sorted by name
        assert_eq!(counts[1].category, "$");
        assert_eq!(counts[2].category, "$$");
    }

    #[test]
    fn test_top_by_score() {
        let venues = vec![
            create_venue("low", "Bar", 3.5, DatasetKind::Bar),
            create_venue("high", "Bar", 4.9, DatasetKind::Bar),
            create_venue("first-tie", "$$", 4.5, DatasetKind::Bar),
            create_venue("second-tie", "$", 4.5, DatasetKind::Bar),
            create_venue("other-dataset", "Bar", 5.0, DatasetKind::Restaurant),
        ];

        let top = top_by_score(&venues, DatasetKind::Bar, 3, false);
        let names: Vec<&str> = top.iter().map(|v| v.name.as_str()).collect();

        assert_eq!(names, vec!["high", "first-tie", "second-tie"]);
    }

    #[test]
    fn test_top_by_score_price_tiers() {
        let venues = vec![
            create_venue("generic", "Bar", 4.9, DatasetKind::Bar),
            create_venue("cheap", "$", 4.2, DatasetKind::Bar),
            create_venue("pricey", "$$$$", 4.7, DatasetKind::Bar),
        ];

        let top = top_by_score(&venues, DatasetKind::Bar, 50, true);
        let names: Vec<&str> = top.iter().map(|v| v.name.as_str()).collect();

        assert_eq!(names, vec!["pricey", "cheap"]);
    }
}
