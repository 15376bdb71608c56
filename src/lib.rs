// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod collectors;
pub mod config;
pub mod keyword;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::{ResearchConfig, ScoringWeights};
pub use crate::keyword::{KeywordRecord, ScoredKeyword};
pub use crate::pipeline::{ResearchReport, Researcher};
pub use crate::scoring::KeywordScorer;
