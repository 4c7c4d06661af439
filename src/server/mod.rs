//! HTTP surface over the climate queries.

pub mod error;
pub mod routes;

use crate::analyzers::ClimateAnalyzer;
use crate::error::Result;
use crate::store::Dataset;
use crate::utils::constants::{
    DEFAULT_WINDOW_DAYS, ROUTE_PRECIPITATION, ROUTE_STATIONS, ROUTE_STATS_BETWEEN,
    ROUTE_STATS_FROM, ROUTE_TOBS,
};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub window_days: u32,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }

    /// Run one query on the blocking pool.
    ///
    /// The snapshot handle is cloned into the task and dropped when the task
    /// returns, on success and failure alike, so no request keeps it past its
    /// own lifetime.
    pub async fn run_query<T, F>(&self, query: F) -> Result<T>
    where
        F: FnOnce(&ClimateAnalyzer<'_, Dataset>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let dataset = Arc::clone(&self.dataset);
        let window_days = self.window_days;

        tokio::task::spawn_blocking(move || {
            let analyzer = ClimateAnalyzer::new(dataset.as_ref()).with_window_days(window_days);
            query(&analyzer)
        })
        .await?
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route(ROUTE_PRECIPITATION, get(routes::precipitation))
        .route(ROUTE_STATIONS, get(routes::stations))
        .route(ROUTE_TOBS, get(routes::tobs))
        .route(ROUTE_STATS_FROM, get(routes::stats_from))
        .route(ROUTE_STATS_BETWEEN, get(routes::stats_between))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Climate query API listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
