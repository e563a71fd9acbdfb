use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::core::distance::find_within_radius;
use crate::models::{Coordinate, VenueRecord};
use crate::services::cache::{CacheKey, CacheStats, GeocodeCache};
use crate::services::geocoder::Geocoder;

/// Time source for the rate limiter
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Minimum spacing between two external geocoder calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub min_interval: Duration,
}

impl RateLimitPolicy {
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval }
    }

    /// No spacing at all
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    /// How long to wait before the next call, given the start of the previous one
    pub fn wait_time(&self, last_call: Option<Instant>, now: Instant) -> Duration {
        match last_call {
            Some(last) => self.min_interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

impl Default for RateLimitPolicy {
    /// Nominatim allows one request per second
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// Address resolution with memoization and rate limiting, plus radius queries
///
/// Owns the geocode cache. Lookups from concurrent callers are serialized so
/// each distinct address reaches the geocoder at most once per process and the
/// rate limit holds across callers.
pub struct GeoLookupService<G, C = SystemClock> {
    geocoder: G,
    clock: C,
    policy: RateLimitPolicy,
    cache: GeocodeCache,
    // Start of the most recent external call; the lock also serializes lookups
    last_call: Mutex<Option<Instant>>,
}

impl<G: Geocoder> GeoLookupService<G, SystemClock> {
    pub fn new(geocoder: G, policy: RateLimitPolicy) -> Self {
        Self::with_clock(geocoder, SystemClock, policy)
    }
}

impl<G: Geocoder, C: Clock> GeoLookupService<G, C> {
    pub fn with_clock(geocoder: G, clock: C, policy: RateLimitPolicy) -> Self {
        Self {
            geocoder,
            clock,
            policy,
            cache: GeocodeCache::new(),
            last_call: Mutex::new(None),
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Resolve every address to a coordinate or to "no result"
    ///
    /// Each distinct address not yet cached costs one geocoder call; cached
    /// addresses cost none. Geocoder errors are logged and recorded as "no
    /// result" without stopping the batch.
    ///
    /// # Arguments
    /// * `addresses` - Free-text addresses, duplicates allowed
    ///
    /// # Returns
    /// One entry per distinct input string, keyed exactly as given
    pub async fn resolve_all<I, S>(&self, addresses: I) -> HashMap<String, Option<Coordinate>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolved = HashMap::new();

        for address in addresses {
            let address = address.as_ref();
            if resolved.contains_key(address) {
                continue;
            }

            let coordinate = self.resolve(address).await;
            resolved.insert(address.to_string(), coordinate);
        }

        tracing::debug!(
            "Resolved {} distinct addresses ({} with coordinates)",
            resolved.len(),
            resolved.values().filter(|c| c.is_some()).count()
        );

        resolved
    }

    /// Resolve a single address
    pub async fn resolve(&self, address: &str) -> Option<Coordinate> {
        if CacheKey::address(address).is_empty() {
            return None;
        }

        if let Some(cached) = self.cache.get(address).await {
            return cached;
        }

        let mut last_call = self.last_call.lock().await;

        // Another caller may have resolved it while we waited for the lock
        if let Some(cached) = self.cache.get(address).await {
            return cached;
        }

        let wait = self.policy.wait_time(*last_call, self.clock.now());
        if !wait.is_zero() {
            tracing::trace!("Rate limiting geocoder for {:?}", wait);
            self.clock.sleep(wait).await;
        }

        *last_call = Some(self.clock.now());

        let coordinate = match self.geocoder.geocode(address).await {
            Ok(coordinate) => {
                if coordinate.is_none() {
                    tracing::info!("No geocoding result for address: {}", address);
                }
                coordinate
            }
            Err(e) => {
                tracing::warn!("Geocoding failed for {}, treating as no result: {}", address, e);
                None
            }
        };

        self.cache.insert(address, coordinate).await;
        drop(last_call);

        coordinate
    }

    /// Candidates within `radius_km` (inclusive) of `reference`, in input order
    pub fn find_within_radius(
        &self,
        reference: Coordinate,
        candidates: &[VenueRecord],
        radius_km: f64,
    ) -> Vec<VenueRecord> {
        find_within_radius(reference, candidates, radius_km)
    }
}
