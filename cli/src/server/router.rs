use std::path::Path;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::admission;
use super::handlers;
use super::state::AppState;

pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// API routes sit behind the admission middleware; anything else falls through
/// to the static assets in `public_dir`, which are not rate limited.
pub fn build_router(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/regulamentos/ultimo",
            get(handlers::latest_regulation).post(handlers::latest_regulation),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), admission::admit))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
