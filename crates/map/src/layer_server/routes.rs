use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};

use crate::layer_server::LayerSnapshot;

pub fn create_router(snapshot: LayerSnapshot) -> Router {
    Router::new()
        .route("/layers.geojson", get(serve_layers))
        .route("/health", get(health))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(snapshot)
}

async fn serve_layers(State(snapshot): State<LayerSnapshot>) -> Response {
    let layers = snapshot.current().await;

    match serde_json::to_string(&layers) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/geo+json")],
            body,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!("failed to encode layers: {error}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn health() -> &'static str {
    "OK"
}
