//! Bundled HTTP demo for the recommendation engine: loads artifacts from
//! `MODELS_PATH`, serves track metadata out of an in-memory catalog, and
//! exposes `recommend` / `similar` / `variants` as JSON endpoints. A real
//! deployment swaps the catalog for its own `TrackLookup` and embeds
//! `Engine` directly rather than going through HTTP at all.

mod config;
mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use resonance_recommend_audio_index::AudioIndex;
use resonance_recommend_engine::Engine;
use resonance_recommend_lyrics_index::LyricsIndex;
use resonance_recommend_registry::FamilyRegistry;
use resonance_recommend_track_lookup::{InMemoryCatalog, TrackLookup};

use config::ServerConfig;
use state::AppState;

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!(origin, "invalid CORS origin, skipping");
                        None
                    })
                })
                .collect();
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        }
        _ => {
            tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing any origin");
            CorsLayer::permissive()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "resonance_recommend_server=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    tracing::info!(models_path = %config.engine.models_path.display(), "loading recommendation artifacts");

    let report = resonance_recommend_artifacts::load(&config.engine.models_path)?;
    for failure in &report.failures {
        tracing::warn!(variant = %failure.variant, file = %failure.file, reason = %failure.reason, "skipped a variant that failed to load");
    }

    // The bundled demo needs both families loaded; a host embedding `Engine`
    // directly is free to run with just one (see `FamilyRegistry::new`).
    if report.audio_variants.is_empty() || report.lyrics_variants.is_empty() {
        anyhow::bail!("MODELS_PATH must contain at least one usable variant for both the audio and lyrics families");
    }

    let vectorizer = Arc::new(
        report.lyrics_vectorizer.ok_or_else(|| anyhow::anyhow!("lyrics variants loaded without a shared vectorizer"))?,
    );

    let audio_default = report.audio_variants[0].descriptor.name.clone();
    let audio_variants: Vec<Arc<AudioIndex>> = report
        .audio_variants
        .into_iter()
        .map(|artifacts| Arc::new(AudioIndex::build(artifacts, Some(config.engine.per_cluster_cache_max))))
        .collect();
    let audio_registry = FamilyRegistry::new(audio_variants, &audio_default);

    let lyrics_default = report.lyrics_variants[0].descriptor.name.clone();
    let lyrics_variants: Vec<Arc<LyricsIndex>> = report
        .lyrics_variants
        .into_iter()
        .map(|artifacts| Arc::new(LyricsIndex::build(artifacts, Arc::clone(&vectorizer))))
        .collect();
    let lyrics_registry = FamilyRegistry::new(lyrics_variants, &lyrics_default);

    tracing::warn!("using the bundled in-memory catalog; a real deployment implements TrackLookup against its own store");
    let catalog: Arc<dyn TrackLookup> = Arc::new(InMemoryCatalog::new());

    let engine = Arc::new(Engine::new(audio_registry, lyrics_registry, catalog, &config.engine));
    let state = AppState { engine };

    let cors_layer = build_cors_layer(&config);
    let app = routes::router(state).layer(TraceLayer::new_for_http()).layer(cors_layer);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
