// src/api.rs
//! HTTP surface over the scoring engine.
//!
//! Routes:
//! - GET  /health      → "ok"
//! - GET  /weights     → active (normalized) scoring weights
//! - POST /score       → one `KeywordRecord` → `ScoredKeyword` with reasoning
//! - POST /rank        → `{ keywords, top_n? }` → ranked shortlist with reasoning
//! - POST /difficulty  → SERP signals → `{ keyword_difficulty }`

use std::sync::Arc;

use shuttle_axum::axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::config::ScoringWeights;
use crate::keyword::{KeywordRecord, ScoredKeyword};
use crate::scoring::{keyword_difficulty, KeywordScorer, SerpSignals, DEFAULT_TOP_N};

#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<KeywordScorer>,
}

impl AppState {
    pub fn new(scorer: KeywordScorer) -> Self {
        Self {
            scorer: Arc::new(scorer),
        }
    }

    /// Weights from file/env configuration.
    pub fn from_config() -> anyhow::Result<Self> {
        Ok(Self::new(KeywordScorer::from_config()?))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/weights", get(weights))
        .route("/score", post(score))
        .route("/rank", post(rank))
        .route("/difficulty", post(difficulty))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

// --- errors ---

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

/// Reject blank keywords; store the rest trimmed and lowercased.
fn normalize_keyword(record: KeywordRecord) -> Result<KeywordRecord, ApiError> {
    let keyword = record.keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return Err(ApiError::bad_request("keyword must not be empty"));
    }
    Ok(KeywordRecord { keyword, ..record })
}

// --- handlers ---

async fn weights(State(state): State<AppState>) -> Json<ScoringWeights> {
    Json(*state.scorer.weights())
}

async fn score(
    State(state): State<AppState>,
    Json(record): Json<KeywordRecord>,
) -> Result<Json<ScoredKeyword>, ApiError> {
    let record = normalize_keyword(record)?;
    let scored = state.scorer.annotate(record);
    let why = state.scorer.explain(&scored);
    debug!(keyword = scored.keyword(), score = scored.opportunity_score, "scored");
    Ok(Json(scored.with_reasoning(why)))
}

#[derive(Debug, serde::Deserialize)]
struct RankReq {
    keywords: Vec<KeywordRecord>,
    #[serde(default)]
    top_n: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
struct RankResp {
    total: usize,
    returned: usize,
    keywords: Vec<ScoredKeyword>,
}

async fn rank(
    State(state): State<AppState>,
    Json(body): Json<RankReq>,
) -> Result<Json<RankResp>, ApiError> {
    let records = body
        .keywords
        .into_iter()
        .map(normalize_keyword)
        .collect::<Result<Vec<_>, _>>()?;
    let total = records.len();
    let top_n = body.top_n.unwrap_or(DEFAULT_TOP_N);
    let keywords = state.scorer.rank_with_reasoning(records, top_n);
    Ok(Json(RankResp {
        total,
        returned: keywords.len(),
        keywords,
    }))
}

#[derive(Debug, serde::Serialize)]
struct DifficultyResp {
    keyword_difficulty: u32,
}

async fn difficulty(Json(signals): Json<SerpSignals>) -> Json<DifficultyResp> {
    Json(DifficultyResp {
        keyword_difficulty: keyword_difficulty(&signals),
    })
}
