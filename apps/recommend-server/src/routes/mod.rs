//! HTTP route handlers for the recommend server.

mod health;
mod recommend;
mod variants;

use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new().merge(health::router()).merge(recommend::router()).merge(variants::router()).with_state(state)
}
