use std::sync::Arc;

use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::catalog::{CatalogClient, CatalogError, Satellite};

use super::api::passes as pass_handlers;
use super::api::position as position_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;

struct CachedSatellite {
    fetched_at: DateTime<Utc>,
    satellite: Arc<Satellite>,
}

impl CachedSatellite {
    fn is_stale(&self, max_age: std::time::Duration) -> bool {
        (Utc::now() - self.fetched_at)
            .to_std()
            .map(|age| age > max_age)
            .unwrap_or(true)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    client: Arc<CatalogClient>,
    cache: Arc<RwLock<Option<CachedSatellite>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = CatalogClient::new(config.catalog.url.clone());
        Self {
            config: Arc::new(config),
            client: Arc::new(client),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// The configured satellite's current element set, re-fetched once
    /// the cached copy is older than the configured refresh interval.
    /// When a refresh fails and a previous copy exists, the stale copy
    /// is served and the failure logged.
    pub async fn satellite(&self) -> Result<Arc<Satellite>, CatalogError> {
        let max_age = self.config.catalog.refresh_interval;

        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.as_ref() {
                if !entry.is_stale(max_age) {
                    return Ok(entry.satellite.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;
        // another request may have refreshed while we waited for the lock
        if let Some(entry) = cache.as_ref() {
            if !entry.is_stale(max_age) {
                return Ok(entry.satellite.clone());
            }
        }

        let fetched = self
            .client
            .fetch_satellite(&self.config.satellite.group, &self.config.satellite.name)
            .await;

        match fetched {
            Ok(satellite) => {
                let satellite = Arc::new(satellite);
                *cache = Some(CachedSatellite {
                    fetched_at: Utc::now(),
                    satellite: satellite.clone(),
                });
                Ok(satellite)
            }
            Err(e) => match cache.as_ref() {
                Some(entry) => {
                    log::warn!("Catalog refresh failed, serving stale elements: {}", e);
                    Ok(entry.satellite.clone())
                }
                None => Err(e),
            },
        }
    }
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let state = AppState::new(config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/passes", get(pass_handlers::list_passes))
        .route("/api/position", get(position_handlers::current_position))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
