// Integration tests for After Geo

use after_geo::core::{distance::geodesic_distance_km, find_within_radius, VenueCatalog};
use after_geo::models::{Coordinate, DatasetKind, DatasetSelection, VenueFilter, VenueRecord};
use after_geo::services::{
    read_dataset, Clock, DatasetColumns, GeoLookupService, GeocodeError, Geocoder, RateLimitPolicy,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const RESTAURANTS: &str = "NOME;PONTUACAO;TIPO;LOCAL\n\
    Dona Maria;4,5;Restaurante;Rua X, 10\n\
    Nakamura;4,8;$$$;Rua Y, 20\n\
    Sem local;4,0;$;\n";

const BARS: &str = "NOME;PONTUACAO;TIPO;LOCAL\n\
    Mincharia;4,6;Bar;Rua X, 10\n\
    Turatti;4,4;$$;Rua Longe, 99\n\
    Fechado;3,9;Bar;Rua Inexistente, 0\n";

/// Geocoder backed by a shared table that counts its calls
#[derive(Clone)]
struct CountingGeocoder {
    calls: Arc<AtomicUsize>,
    table: Arc<HashMap<String, Coordinate>>,
}

impl CountingGeocoder {
    fn new() -> Self {
        let mut table = HashMap::new();
        table.insert("Rua X, 10".to_string(), Coordinate::new(-3.73, -38.52));
        table.insert("Rua Y, 20".to_string(), Coordinate::new(-3.74, -38.53));
        table.insert("Rua Longe, 99".to_string(), Coordinate::new(-3.87, -38.60));

        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            table: Arc::new(table),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for CountingGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if address.contains("Inexistente") {
            return Err(GeocodeError::ApiError("503 Service Unavailable".to_string()));
        }
        Ok(self.table.get(address).copied())
    }
}

/// Clock that records sleeps instead of waiting
#[derive(Clone)]
struct RecordingClock {
    now: Arc<Mutex<Instant>>,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingClock {
    fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
            sleeps: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Clock for RecordingClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        *self.now.lock().unwrap() += duration;
    }
}

fn load_records() -> Vec<VenueRecord> {
    let columns = DatasetColumns::default();
    let mut records = read_dataset(RESTAURANTS.as_bytes(), DatasetKind::Restaurant, b';', &columns).unwrap();
    records.extend(read_dataset(BARS.as_bytes(), DatasetKind::Bar, b';', &columns).unwrap());
    records
}

fn venue_at(name: &str, coordinate: Option<Coordinate>) -> VenueRecord {
    VenueRecord {
        name: name.to_string(),
        address: format!("{} address", name),
        category: "Bar".to_string(),
        score: 4.0,
        dataset_kind: DatasetKind::Bar,
        coordinate,
    }
}

#[tokio::test]
async fn test_integration_end_to_end_pipeline() {
    let geocoder = CountingGeocoder::new();
    let clock = RecordingClock::new();
    let service = GeoLookupService::with_clock(geocoder.clone(), clock.clone(), RateLimitPolicy::default());

    let records = load_records();
    assert_eq!(records.len(), 6);

    let resolved = service
        .resolve_all(records.iter().map(|r| r.address.as_str()))
        .await;

    // "Rua X, 10" appears twice and "" never reaches the geocoder
    assert_eq!(geocoder.calls(), 4);
    assert_eq!(resolved.len(), 5);
    assert_eq!(clock.sleeps.lock().unwrap().len(), 3);

    let catalog = VenueCatalog::build(records, &resolved);
    assert_eq!(catalog.geocoded_count(), 4);

    let nearby = catalog
        .nearby(&VenueFilter::default(), "Rua X, 10", 2.0)
        .unwrap();
    let names: Vec<&str> = nearby.venues.iter().map(|v| v.venue.name.as_str()).collect();
    assert_eq!(names, vec!["Dona Maria", "Nakamura", "Mincharia"]);

    // Analysis still sees the venues that could not be geocoded
    let counts = catalog.category_counts(DatasetKind::Bar);
    assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), 3);
}

#[tokio::test]
async fn test_scenario_duplicate_addresses() {
    let geocoder = CountingGeocoder::new();
    let service = GeoLookupService::with_clock(geocoder.clone(), RecordingClock::new(), RateLimitPolicy::unlimited());

    let input = ["Rua X, 10", "Rua X, 10", "Rua Y, 20"];
    let resolved = service.resolve_all(input).await;

    assert_eq!(geocoder.calls(), 2);

    let entries: Vec<Option<Coordinate>> = input.iter().map(|a| resolved[*a]).collect();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0], entries[1]);
    assert!(entries.iter().all(Option::is_some));
}

#[tokio::test]
async fn test_second_resolution_makes_no_external_calls() {
    let geocoder = CountingGeocoder::new();
    let clock = RecordingClock::new();
    let service = GeoLookupService::with_clock(geocoder.clone(), clock.clone(), RateLimitPolicy::default());

    let addresses = ["Rua X, 10", "Rua Y, 20", "Rua Inexistente, 0", "Rua Nova, 1"];
    let first = service.resolve_all(addresses).await;
    let calls = geocoder.calls();
    let sleeps = clock.sleeps.lock().unwrap().len();

    let second = service.resolve_all(addresses).await;

    assert_eq!(geocoder.calls(), calls);
    assert_eq!(clock.sleeps.lock().unwrap().len(), sleeps);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_failure_isolation() {
    let geocoder = CountingGeocoder::new();
    let service = GeoLookupService::with_clock(geocoder, RecordingClock::new(), RateLimitPolicy::unlimited());

    let resolved = service.resolve_all(["Rua Inexistente, 0", "Rua Y, 20"]).await;

    assert_eq!(resolved["Rua Inexistente, 0"], None);
    assert_eq!(resolved["Rua Y, 20"], Some(Coordinate::new(-3.74, -38.53)));
}

#[test]
fn test_scenario_fortaleza_radius() {
    let reference = Coordinate::new(-3.73, -38.52);
    let candidates = vec![venue_at("candidate", Some(Coordinate::new(-3.74, -38.53)))];

    assert_eq!(find_within_radius(reference, &candidates, 2.0).len(), 1);
    assert!(find_within_radius(reference, &candidates, 1.0).is_empty());
}

#[test]
fn test_boundary_inclusion() {
    let reference = Coordinate::new(-3.73, -38.52);
    let targets = [
        Coordinate::new(-3.74, -38.53),
        Coordinate::new(-3.60, -38.40),
        Coordinate::new(-3.73, -38.90),
    ];

    for target in targets {
        let candidates = vec![venue_at("edge", Some(target))];
        let radius_km = geodesic_distance_km(reference, target);

        assert_eq!(
            find_within_radius(reference, &candidates, radius_km).len(),
            1,
            "Venue at exactly {} km should be included",
            radius_km
        );
    }
}

#[test]
fn test_radius_monotonicity() {
    let reference = Coordinate::new(-3.73, -38.52);
    let candidates: Vec<VenueRecord> = (0..40)
        .map(|i| {
            let offset = i as f64 * 0.005;
            let coordinate = if i % 7 == 0 {
                None
            } else {
                Some(Coordinate::new(-3.73 - offset, -38.52 + offset / 2.0))
            };
            venue_at(&i.to_string(), coordinate)
        })
        .collect();

    let mut previous: Vec<String> = Vec::new();
    for step in 0..=60 {
        let radius_km = step as f64 * 0.5;
        let current: Vec<String> = find_within_radius(reference, &candidates, radius_km)
            .into_iter()
            .map(|v| v.name)
            .collect();

        assert!(
            previous.iter().all(|name| current.contains(name)),
            "Increasing the radius to {} km dropped a venue",
            radius_km
        );
        previous = current;
    }

    // Every geocoded venue is within 30 km
    assert_eq!(previous.len(), candidates.iter().filter(|v| v.coordinate.is_some()).count());
}

#[test]
fn test_radius_result_preserves_order_and_is_deterministic() {
    let reference = Coordinate::new(-3.73, -38.52);
    let candidates = vec![
        venue_at("c", Some(Coordinate::new(-3.735, -38.525))),
        venue_at("a", Some(Coordinate::new(-3.731, -38.521))),
        venue_at("far", Some(Coordinate::new(-4.5, -39.0))),
        venue_at("b", Some(Coordinate::new(-3.732, -38.522))),
    ];

    let first = find_within_radius(reference, &candidates, 5.0);
    let second = find_within_radius(reference, &candidates, 5.0);

    let names: Vec<&str> = first.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
    assert_eq!(first, second);
    assert!(find_within_radius(reference, &[], 5.0).is_empty());
}

#[test]
fn test_filters_before_radius() {
    let records = vec![
        VenueRecord {
            dataset_kind: DatasetKind::Restaurant,
            ..venue_at("restaurante", Some(Coordinate::new(-3.73, -38.52)))
        },
        VenueRecord {
            score: 3.0,
            ..venue_at("bar ruim", Some(Coordinate::new(-3.731, -38.521)))
        },
        venue_at("bar bom", Some(Coordinate::new(-3.732, -38.522))),
    ];
    let catalog = VenueCatalog::from_records(records);

    let filter = VenueFilter {
        selection: DatasetSelection::Bars,
        min_score: 3.5,
        ..Default::default()
    };

    let nearby = catalog.nearby(&filter, "bar bom address", 10.0).unwrap();
    assert_eq!(nearby.venues.len(), 1);
    assert_eq!(nearby.venues[0].venue.name, "bar bom");
}
