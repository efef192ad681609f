// Horse Blankets API v0.1
use axum::routing::{delete, get, post};
use axum::Router;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod db;
mod errors;
mod helpers;
mod routes;
mod services;

use config::AppConfig;
use routes::AppState;
use services::geocode::GeocodeClient;
use services::open_meteo::OpenMeteoClient;

/// Maximum number of connections in the database pool.
const DB_POOL_MAX_CONNECTIONS: u32 = 5;

/// Horse Blankets API — OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Horse Blankets API",
        version = "0.1.0",
        description = "Daily blanket recommendations for a household's horses. \
            Geocodes the configured address, summarizes today's hourly forecast \
            from Open-Meteo and picks a blanket per horse from its configured \
            temperature ranges, or keeps the horses inside when precipitation \
            is expected.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Home", description = "Today's weather and recommendations"),
        (name = "Horses", description = "Horse and blanket configuration"),
        (name = "Address", description = "Home address configuration"),
    ),
    paths(
        routes::health::health_check,
        routes::home::get_home,
        routes::horses::list_horses,
        routes::horses::create_horse,
        routes::horses::delete_horse,
        routes::horses::create_blanket,
        routes::address::get_address,
        routes::address::set_address,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::home::HomeResponse,
            services::weather::WeatherSummary,
            services::recommend::Recommendation,
            routes::horses::HorseResponse,
            routes::horses::BlanketResponse,
            routes::horses::CreateHorseRequest,
            routes::horses::CreateBlanketRequest,
            routes::address::AddressResponse,
            routes::address::SetAddressRequest,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    // Initialize tracing; exactly one of the two fmt layers is installed
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "horse_blankets_api=debug,tower_http=debug".into()),
        )
        .with(config.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!config.log_json).then(tracing_subscriber::fmt::layer))
        .init();

    // Set up database connection pool; the SQLite file is created on first run
    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .expect("DATABASE_URL must be a valid SQLite URL")
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(DB_POOL_MAX_CONNECTIONS)
        .connect_with(connect_options)
        .await
        .expect("Failed to open database");

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Upstream clients, each with a bounded request timeout
    let geocoder = GeocodeClient::new(
        &config.geocoder_url,
        &config.http_user_agent,
        config.http_timeout_secs,
    )
    .expect("Failed to build geocoding client");
    let forecaster = OpenMeteoClient::new(
        &config.forecast_url,
        &config.http_user_agent,
        config.http_timeout_secs,
    )
    .expect("Failed to build forecast client");

    let app_state = AppState {
        pool,
        geocoder,
        forecaster,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
        ])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .route("/api/v1/home", get(routes::home::get_home))
        .route(
            "/api/v1/horses",
            get(routes::horses::list_horses).post(routes::horses::create_horse),
        )
        .route("/api/v1/horses/:id", delete(routes::horses::delete_horse))
        .route(
            "/api/v1/horses/:id/blankets",
            post(routes::horses::create_blanket),
        )
        .route(
            "/api/v1/address",
            get(routes::address::get_address).put(routes::address::set_address),
        )
        .with_state(app_state);

    let app = Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
