use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::api::handlers::{self, AppState};
use crate::config::CorsConfig;
use crate::logic::CombinationCache;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check::<S>))
        // Combination endpoints
        .route(
            "/",
            get(handlers::demo_combinations::<S>).post(handlers::combine::<S>),
        )
        .route("/combine", post(handlers::combine::<S>))
        // Catalog and cache inspection
        .route("/elements", get(handlers::list_elements))
        .route("/combinations", get(handlers::list_combinations::<S>))
}

pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let origin = if config.allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin '{}'", o))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Router with state and middleware applied, ready to serve.
pub fn build_app<S: Store + 'static>(
    cache: Arc<CombinationCache<S>>,
    cors: &CorsConfig,
) -> Result<Router> {
    Ok(create_router()
        .layer(ServiceBuilder::new().layer(cors_layer(cors)?))
        .with_state(cache))
}
