use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use after_geo::config::{LoggingSettings, Settings};
use after_geo::core::VenueCatalog;
use after_geo::models::DatasetKind;
use after_geo::routes::{self, venues::AppState};
use after_geo::services::{load_dataset, DatasetColumns, GeoLookupService, Geocoder, NominatimClient};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn io_error<E: std::fmt::Display>(context: &str, e: E) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

fn init_logging(logging: &LoggingSettings) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&logging.level))
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging settings come from the config, so load it first
    let settings = Settings::load();
    init_logging(&settings.as_ref().map(|s| s.logging.clone()).unwrap_or_default());

    info!("Starting After geo service...");

    let settings = settings.map_err(|e| io_error("Failed to load configuration", e))?;

    info!("Configuration loaded successfully");

    // Load both datasets
    let delimiter = settings
        .datasets
        .delimiter_byte()
        .map_err(|e| io_error("Invalid dataset delimiter", e))?;
    let columns = DatasetColumns::from(settings.datasets.columns.clone());

    let mut records = load_dataset(&settings.datasets.restaurants_path, DatasetKind::Restaurant, delimiter, &columns)
        .map_err(|e| io_error("Failed to load restaurants", e))?;
    records.extend(
        load_dataset(&settings.datasets.bars_path, DatasetKind::Bar, delimiter, &columns)
            .map_err(|e| io_error("Failed to load bars", e))?,
    );

    // Initialize geocoder
    let nominatim = NominatimClient::new(
        settings.geocoder.endpoint.clone(),
        settings.geocoder.user_agent.clone(),
        settings.geocoder.timeout(),
    )
    .map_err(|e| io_error("Failed to create geocoder", e))?;
    let geocoder: Box<dyn Geocoder> = Box::new(nominatim);

    let lookup = Arc::new(GeoLookupService::new(geocoder, settings.geocoder.rate_limit()));

    info!(
        "Geocoder initialized ({} as {:?}, min interval {:?})",
        settings.geocoder.endpoint,
        settings.geocoder.user_agent,
        lookup.policy().min_interval
    );

    // Geocode every venue once; later requests are served from the cache
    let resolved = lookup
        .resolve_all(records.iter().map(|r| r.address.as_str()))
        .await;
    let catalog = VenueCatalog::build(records, &resolved);

    info!(
        "Geocoded {} of {} venues ({} distinct addresses)",
        catalog.geocoded_count(),
        catalog.len(),
        resolved.len()
    );

    let app_state = AppState {
        catalog: Arc::new(catalog),
        lookup,
        proximity: settings.proximity.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
