#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for WSO territories, club activity and rankings.
//!
//! Every route reads through the injected [`ResultsStore`] and runs the
//! territory and analytics code over the rows it gets back. Nothing is
//! cached between requests and nothing is written back to the store.

pub mod config;
mod error;
mod handlers;

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use chrono::NaiveDate;
use wso_atlas_database::paths::db_path_from_env;
use wso_atlas_database::{DuckDbStore, ResultsStore};

pub use config::{AtlasConfig, ConfigError};
pub use error::ServerError;

/// Shared application state.
pub struct AppState {
    /// Results store shared by every request.
    pub store: Arc<dyn ResultsStore>,
    /// Pagination and activity settings.
    pub config: AtlasConfig,
    /// Fixed "today" for reproducible windows. `None` uses the local date.
    pub today: Option<NaiveDate>,
}

impl AppState {
    /// Creates state that anchors windows to the current date.
    #[must_use]
    pub fn new(store: Arc<dyn ResultsStore>, config: AtlasConfig) -> Self {
        Self {
            store,
            config,
            today: None,
        }
    }

    /// The date trailing windows are anchored to.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/wso-boundaries", web::get().to(handlers::wso_boundaries))
            .route("/wso/{slug}/clubs", web::get().to(handlers::wso_clubs))
            .route("/wso/{slug}/meets", web::get().to(handlers::wso_meets))
            .route("/debug-wso", web::get().to(handlers::debug_wso))
            .route("/club/{slug}", web::get().to(handlers::club_detail))
            .route(
                "/club-quadrant-data",
                web::get().to(handlers::club_quadrant_data),
            )
            .route(
                "/club-metrics/top-clubs",
                web::get().to(handlers::club_metrics_top_clubs),
            )
            .route(
                "/club-metrics/monthly-aggregates",
                web::get().to(handlers::club_metrics_monthly_aggregates),
            ),
    );
}

/// Starts the WSO atlas API server.
///
/// Loads the optional TOML config, opens the `DuckDB` results store named
/// by `WSO_ATLAS_DB` and serves until shut down. Logging must already be
/// initialized. This is a regular async function; the caller provides
/// the runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the config or store cannot be
/// loaded, or if the HTTP server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server(db_path: Option<&Path>) -> std::io::Result<()> {
    let config = AtlasConfig::from_env().map_err(std::io::Error::other)?;

    let db_path = db_path.map_or_else(db_path_from_env, Path::to_path_buf);
    log::info!("Opening results store at {}...", db_path.display());
    let store = DuckDbStore::open(&db_path).map_err(std::io::Error::other)?;

    let state = web::Data::new(AppState::new(Arc::new(store), config));

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
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
