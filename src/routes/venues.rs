use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::config::ProximitySettings;
use crate::core::{LocatorError, VenueCatalog};
use crate::models::{
    CategoriesResponse, CategoryCountsResponse, DatasetKind, ErrorResponse, GeocodeRequest, GeocodeResponse,
    HealthResponse, NearbyRequest, NearbyResponse, TopVenuesQuery, TopVenuesResponse, VenueQuery,
    VenuesResponse,
};
use crate::services::{GeoLookupService, Geocoder};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<VenueCatalog>,
    pub lookup: Arc<GeoLookupService<Box<dyn Geocoder>>>,
    pub proximity: ProximitySettings,
}

/// Configure all venue-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/venues", web::get().to(list_venues))
        .route("/venues/categories", web::get().to(list_categories))
        .route("/venues/nearby", web::post().to(find_nearby))
        .route("/analysis/{kind}/categories", web::get().to(category_counts))
        .route("/analysis/{kind}/top", web::get().to(top_venues))
        .route("/geocode", web::post().to(geocode));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let geocoded_venues = state.catalog.geocoded_count();
    let total_venues = state.catalog.len();

    let status = if geocoded_venues > 0 || total_venues == 0 { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        geocoded_venues,
        total_venues,
        geocode_cache: state.lookup.cache_stats().await,
    })
}

/// Geocoded venues for the map
///
/// GET /api/v1/venues?kind=all&category=Bar&minScore=4.0&maxScore=5.0
async fn list_venues(
    state: web::Data<AppState>,
    query: web::Query<VenueQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let mapped = state.catalog.mapped(&query.to_filter());

    if mapped.venues.is_empty() {
        tracing::info!("No venues for filter {:?}", query.0);
    }

    HttpResponse::Ok().json(VenuesResponse {
        total_results: mapped.venues.len(),
        venues: mapped.venues,
        center: mapped.center,
    })
}

/// Categories available for a dataset selection
///
/// GET /api/v1/venues/categories?kind=bars
async fn list_categories(
    state: web::Data<AppState>,
    query: web::Query<VenueQuery>,
) -> impl Responder {
    HttpResponse::Ok().json(CategoriesResponse {
        categories: state.catalog.categories(query.kind),
    })
}

/// Venues around a reference venue
///
/// POST /api/v1/venues/nearby
///
/// Request body:
/// ```json
/// {
///   "referenceAddress": "string",
///   "radiusKm": 2.0,
///   "kind": "all|restaurants|bars",
///   "category": "string",
///   "minScore": 0.0,
///   "maxScore": 5.0
/// }
/// ```
async fn find_nearby(
    state: web::Data<AppState>,
    req: web::Json<NearbyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for nearby request: field_errors={:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let radius_km = req.radius_km.unwrap_or(state.proximity.default_radius_km);
    if radius_km > state.proximity.max_radius_km {
        return bad_request(
            "Radius too large",
            format!("radiusKm must be at most {}", state.proximity.max_radius_km),
        );
    }

    match state
        .catalog
        .nearby(&req.to_filter(), &req.reference_address, radius_km)
    {
        Ok(result) => {
            tracing::info!(
                "Returning {} venues within {} km of {}",
                result.venues.len(),
                radius_km,
                req.reference_address
            );

            HttpResponse::Ok().json(NearbyResponse {
                reference: result.reference,
                reference_address: req.reference_address.clone(),
                radius_km,
                venues: result.venues,
            })
        }
        Err(e @ LocatorError::ReferenceNotFound(_)) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Reference not found".to_string(),
            message: e.to_string(),
            status_code: 404,
        }),
        Err(e @ LocatorError::InvalidRadius(_)) => bad_request("Invalid radius", e.to_string()),
    }
}

/// Venue count per category
///
/// GET /api/v1/analysis/{restaurant|bar}/categories
async fn category_counts(
    state: web::Data<AppState>,
    kind: web::Path<DatasetKind>,
) -> impl Responder {
    HttpResponse::Ok().json(CategoryCountsResponse {
        counts: state.catalog.category_counts(kind.into_inner()),
    })
}

/// Best-rated venues of a dataset
///
/// GET /api/v1/analysis/{restaurant|bar}/top?limit=50&priceTiersOnly=true
async fn top_venues(
    state: web::Data<AppState>,
    kind: web::Path<DatasetKind>,
    query: web::Query<TopVenuesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    HttpResponse::Ok().json(TopVenuesResponse {
        venues: state
            .catalog
            .top_by_score(kind.into_inner(), query.limit, query.price_tiers_only),
    })
}

/// Resolve addresses through the shared geocode cache
///
/// POST /api/v1/geocode
///
/// Request body:
/// ```json
/// { "addresses": ["string"] }
/// ```
async fn geocode(
    state: web::Data<AppState>,
    req: web::Json<GeocodeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let results = state.lookup.resolve_all(&req.addresses).await;

    tracing::debug!("Geocode request resolved {} addresses", results.len());

    HttpResponse::Ok().json(GeocodeResponse { results })
}
