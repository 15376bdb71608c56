//! Keyword Scout: HTTP entrypoint
//! Boots the Axum scoring API on Shuttle, wiring weights config, metrics and tracing.

use keyword_scout::api::{self, AppState};
use keyword_scout::metrics::Metrics;
use keyword_scout::telemetry;
use shuttle_axum::ShuttleAxum;
use tracing::{info, warn};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    // Weights: config file, then env overrides. Invalid config fails startup.
    let state = AppState::from_config()?;
    let weights = *state.scorer.weights();
    info!(
        volume = weights.volume(),
        competition = weights.competition(),
        relevance = weights.relevance(),
        "scoring weights loaded"
    );

    let mut router = api::create_router(state);
    match Metrics::init(&weights) {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => warn!(error = ?e, "metrics recorder not installed"),
    }

    Ok(router.into())
}
