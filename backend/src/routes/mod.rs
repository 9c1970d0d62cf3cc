//! Route definitions for the bakuwaki forecast service

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::CorsConfig, handlers, AppState};

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(handlers::health_check))
        .nest("/predict", prediction_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Prediction routes
fn prediction_routes() -> Router<AppState> {
    Router::new().route("/week", get(handlers::predict_week))
}

/// CORS for the configured frontend origins, with credentials.
///
/// Methods and headers mirror the request since wildcards cannot be combined
/// with credentials.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
