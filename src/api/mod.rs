use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clients::google::GoogleSearchClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{SearchProvider, StudySearchService};

mod courses;
mod error;
mod observability;
mod search;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub study_search: Arc<StudySearchService>,

    pub config: Arc<Config>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

/// Connects the store and wires the Google search client into the cache.
pub async fn create_app_state(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let provider = Arc::new(GoogleSearchClient::new(&config.search)?);
    create_app_state_with_provider(config, provider, prometheus_handle).await
}

pub async fn create_app_state_with_provider(
    config: Config,
    provider: Arc<dyn SearchProvider>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let study_search = Arc::new(StudySearchService::new(
        provider,
        Arc::new(store.search_results()),
        &config.search,
    ));

    Ok(Arc::new(AppState {
        store,
        study_search,
        config: Arc::new(config),
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route(
            "/subjects",
            get(courses::list_subjects).post(courses::create_subject),
        )
        .route("/weeks", get(courses::list_weeks).post(courses::create_week))
        .route(
            "/lectures",
            get(courses::list_lectures).post(courses::create_lecture),
        )
        .route("/lectures/search", post(search::search_lecture))
        .route(
            "/lectures/{id}",
            get(courses::get_lecture).delete(courses::delete_lecture),
        )
        .route("/lectures/{id}/search-results", get(search::lecture_results))
        .route(
            "/exercises",
            get(courses::list_exercises).post(courses::create_exercise),
        )
        .route(
            "/exercises/{id}",
            get(courses::get_exercise).delete(courses::delete_exercise),
        )
        .route("/exercises/{id}/search", post(search::search_exercise))
        .route(
            "/exercises/{id}/search-results",
            get(search::exercise_results),
        )
        .route("/system/status", get(system::get_status))
        .route("/metrics", get(observability::get_metrics))
        // Route layer so the matched path template is visible to the metrics labels.
        .route_layer(middleware::from_fn(observability::track_metrics))
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
