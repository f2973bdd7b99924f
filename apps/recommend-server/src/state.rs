use std::sync::Arc;

use resonance_recommend_engine::Engine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}
