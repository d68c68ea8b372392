#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the wildguard dashboard.
//!
//! Serves chart-ready aggregates over the upstream conflict and
//! cultivation services: every data endpoint is a self-contained panel
//! that fetches its snapshot, runs the shared pipeline, and answers with
//! either the series or a scoped JSON error body. Region boundary files
//! are served statically for the map frontend.

mod handlers;
pub mod interactive;

use std::path::Path;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use wildguard_api::{AppConfig, Client, PanelState};
use wildguard_conflict_models::SpeciesOption;
use wildguard_session::{Account, SessionManager};

/// Shared application state.
pub struct AppState {
    /// Upstream REST client.
    pub client: Client,
    /// Session lifecycle manager.
    pub sessions: SessionManager,
    /// Species options cache with stale-response protection: only the
    /// freshest upstream answer is ever kept.
    pub species_panel: PanelState<Vec<SpeciesOption>>,
    /// Region boundaries for the choropleth join, when the configured
    /// file exists.
    pub regions: Option<geojson::FeatureCollection>,
}

/// Loads the region boundary file, if present.
///
/// A missing or unparseable file downgrades the choropleth panel to an
/// explicit error state instead of failing startup.
fn load_regions(path: &Path) -> Option<geojson::FeatureCollection> {
    if !path.exists() {
        log::warn!(
            "region boundary file {} not found; choropleth panel disabled",
            path.display()
        );
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(text) => match text.parse::<geojson::FeatureCollection>() {
            Ok(collection) => {
                log::info!(
                    "loaded {} region boundaries from {}",
                    collection.features.len(),
                    path.display()
                );
                Some(collection)
            }
            Err(e) => {
                log::error!("failed to parse {}: {e}", path.display());
                None
            }
        },
        Err(e) => {
            log::error!("failed to read {}: {e}", path.display());
            None
        }
    }
}

/// Starts the wildguard API server.
///
/// Loads configuration, builds the upstream client and session manager,
/// reads the region boundaries, and starts the Actix-Web HTTP server.
/// This is a regular async function; the caller is responsible for
/// providing the async runtime (e.g. via `#[actix_web::main]`) and for
/// initializing the logger.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if the configuration file exists but cannot be parsed, or the
/// HTTP client cannot be constructed.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let config = AppConfig::load().expect("Failed to load configuration");
    let client = Client::new(&config).expect("Failed to build upstream client");

    let accounts: Vec<Account> = config
        .auth
        .accounts
        .iter()
        .map(|account| Account {
            email: account.email.clone(),
            password: account.password.clone(),
        })
        .collect();
    if accounts.is_empty() {
        log::warn!("no accounts configured; every login will be rejected");
    }
    let sessions = SessionManager::new(config.auth.session_ttl_minutes, accounts);

    let regions = load_regions(Path::new(&config.data.regions_path));

    let state = web::Data::new(AppState {
        client,
        sessions,
        species_panel: PanelState::new(),
        regions,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/filter-options", web::get().to(handlers::filter_options))
                    .route("/summary", web::get().to(handlers::summary))
                    .route("/timeline", web::get().to(handlers::timeline))
                    .route(
                        "/damage-breakdown",
                        web::get().to(handlers::damage_breakdown),
                    )
                    .route("/choropleth", web::get().to(handlers::choropleth))
                    .route("/utilization", web::get().to(handlers::utilization))
                    .route("/trend", web::get().to(handlers::trend))
                    .route("/predictions", web::get().to(handlers::predictions))
                    .route("/predict", web::post().to(handlers::predict))
                    .route("/login", web::post().to(handlers::login))
                    .route("/logout", web::post().to(handlers::logout))
                    .route("/session", web::get().to(handlers::session)),
            )
            // Serve region boundary data for the map frontend
            .service(Files::new("/data", "data").show_files_listing())
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
