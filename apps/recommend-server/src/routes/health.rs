//! Liveness check — always 200 if the process is up; this server has no
//! external dependencies to probe for readiness.

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(simple_health))
}

async fn simple_health() -> &'static str {
    "OK"
}
