// [apps/orchestrator/src/routes.rs]
/*!
 * =================================================================
 * APARATO: ROUTING MATRIX (ESTRATO L3)
 * RESPONSABILIDAD: SUPERFICIE DE CONTROL HTTP
 * =================================================================
 */

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{crawl_status, start_crawl, stop_crawl};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/v1/crawl/start", post(start_crawl))
        .route("/v1/crawl/stop", post(stop_crawl))
        .route("/v1/crawl/status", get(crawl_status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
