// src/collectors/mod.rs
//! Data acquisition collaborators feeding the scoring engine.
//!
//! Each collaborator is an async trait so the pipeline can run against real
//! HTTP clients or in-memory fakes. Errors are returned as `anyhow::Error`;
//! the pipeline swaps them for the neutral fallbacks defined here.

pub mod llm;
pub mod serp;
pub mod trends;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::keyword::Trend;

pub use llm::{LlmConfig, LlmExpander};
pub use serp::{SerpApiClient, SerpConfig};
pub use trends::{FixtureInterest, InterestSource, TrendsEstimator};

/// Generates candidate keywords and rates their relevance to the seed.
#[async_trait]
pub trait KeywordExpander: Send + Sync {
    /// Up to `count` variations (may be fewer, may repeat).
    async fn expand(&self, seed: &str, count: usize) -> Result<Vec<String>>;
    /// Relevance in [0,1] per candidate.
    async fn relevance(&self, seed: &str, candidates: &[String]) -> Result<HashMap<String, f64>>;
    fn name(&self) -> &'static str;
}

/// Search-results lookups: suggestions and competition analysis.
#[async_trait]
pub trait SerpSource: Send + Sync {
    async fn related_searches(&self, keyword: &str) -> Result<Vec<String>>;
    async fn people_also_ask(&self, keyword: &str) -> Result<Vec<String>>;
    async fn analyze(&self, keyword: &str) -> Result<SerpAnalysis>;
    fn name(&self) -> &'static str;
}

/// Search volume and interest trends.
#[async_trait]
pub trait VolumeEstimator: Send + Sync {
    /// False when trend data is switched off; volume still comes from heuristics.
    fn enabled(&self) -> bool;
    async fn related_queries(&self, keyword: &str) -> Result<Vec<String>>;
    async fn estimate_volume(&self, keyword: &str) -> Result<u64>;
    async fn interest_over_time(&self, keyword: &str) -> Result<InterestOverTime>;
    fn name(&self) -> &'static str;
}

/// Competition analysis of one keyword's results page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpAnalysis {
    pub keyword: String,
    pub competition_score: u32,
    pub big_brands_count: u32,
    pub has_featured_snippet: bool,
    pub has_knowledge_graph: bool,
    pub has_ads: bool,
    pub serp_features_count: u32,
    pub first_page_probability: f64,
    pub total_results: u64,
    pub domains: Vec<String>,
}

impl SerpAnalysis {
    /// Neutral values used when the lookup fails.
    pub fn fallback(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            competition_score: 50,
            big_brands_count: 0,
            has_featured_snippet: false,
            has_knowledge_graph: false,
            has_ads: false,
            serp_features_count: 0,
            first_page_probability: 0.5,
            total_results: 0,
            domains: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestOverTime {
    pub average_interest: u32,
    pub trend: Trend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_interest: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_interest: Option<u32>,
}

impl InterestOverTime {
    pub fn fallback() -> Self {
        Self {
            average_interest: 50,
            trend: Trend::Stable,
            max_interest: None,
            min_interest: None,
        }
    }
}

/// Run `op` up to `attempts` times, sleeping `delay` between failures.
pub(crate) async fn with_retries<T, F, Fut>(
    attempts: u32,
    delay: Duration,
    what: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if attempt < attempts => {
                warn!(error = ?e, attempt, what, "attempt failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e.context(format!("{what} failed after {attempts} attempts"))),
        }
    }
}

/// Strip a surrounding Markdown code fence (optionally tagged `json`).
pub(crate) fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let inner = trimmed.split("```").nth(1).unwrap_or_default();
    inner.strip_prefix("json").unwrap_or(inner).trim()
}
