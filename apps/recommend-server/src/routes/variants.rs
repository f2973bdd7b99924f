use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use resonance_recommend_types::{Family, VariantDescriptor};
use serde::{Deserialize, Serialize};

use crate::error::ServerResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/variants/:family", get(list_variants)).route("/variants/:family/switch", post(switch_variant))
}

async fn list_variants(State(state): State<AppState>, Path(family): Path<Family>) -> Json<Vec<VariantDescriptor>> {
    Json(state.engine.list_variants(family))
}

#[derive(Debug, Deserialize)]
struct SwitchBody {
    name: String,
}

#[derive(Debug, Serialize)]
struct SwitchResponse {
    prior: String,
}

async fn switch_variant(
    State(state): State<AppState>,
    Path(family): Path<Family>,
    Json(body): Json<SwitchBody>,
) -> ServerResult<Json<SwitchResponse>> {
    let prior = state.engine.switch_variant(family, &body.name)?;
    Ok(Json(SwitchResponse { prior }))
}
