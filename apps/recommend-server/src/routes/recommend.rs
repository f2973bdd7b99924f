use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use resonance_recommend_types::{Request, Response, Strategy, TrackId};
use serde::Deserialize;

use crate::error::ServerResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/recommend", post(recommend)).route("/similar/:track_id", post(similar_by_track))
}

async fn recommend(State(state): State<AppState>, Json(request): Json<Request>) -> ServerResult<Json<Response>> {
    let response = state.engine.recommend(request).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct SimilarBody {
    k: u8,
    #[serde(default)]
    strategy: Option<Strategy>,
}

async fn similar_by_track(
    State(state): State<AppState>,
    Path(track_id): Path<TrackId>,
    Json(body): Json<SimilarBody>,
) -> ServerResult<Json<Response>> {
    let strategy = body.strategy.unwrap_or(Strategy::Cluster);
    let response = state.engine.similar_by_track(track_id, body.k, strategy).await?;
    Ok(Json(response))
}
