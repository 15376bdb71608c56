// src/config/research.rs
//! Knobs for the research pipeline, read from the environment (`.env` honored).

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct ResearchConfig {
    /// Size of the returned shortlist (MAX_KEYWORDS).
    pub max_keywords: usize,
    /// Variations requested from the expander (EXPANSION_COUNT).
    pub expansion_count: usize,
    /// Candidates below this relevance are dropped (MIN_RELEVANCE_SCORE).
    pub min_relevance: f64,
    /// Pause between rate-limited collaborator calls (API_DELAY, seconds).
    #[serde(skip)]
    pub api_delay: Duration,
    /// Keywords per relevance request.
    pub relevance_batch_size: usize,
    /// GOOGLE_TRENDS_ENABLED
    pub trends_enabled: bool,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_keywords: 50,
            expansion_count: 30,
            min_relevance: 0.5,
            api_delay: Duration::from_millis(500),
            relevance_batch_size: 10,
            trends_enabled: true,
        }
    }
}

impl ResearchConfig {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        let delay_secs: f64 = env_or("API_DELAY", d.api_delay.as_secs_f64())?;
        if !delay_secs.is_finite() || delay_secs < 0.0 {
            return Err(anyhow!("API_DELAY must be a non-negative number of seconds"));
        }
        let api_delay = Duration::try_from_secs_f64(delay_secs)
            .map_err(|e| anyhow!("invalid API_DELAY={delay_secs}: {e}"))?;
        Ok(Self {
            max_keywords: env_or("MAX_KEYWORDS", d.max_keywords)?,
            expansion_count: env_or("EXPANSION_COUNT", d.expansion_count)?,
            min_relevance: env_or("MIN_RELEVANCE_SCORE", d.min_relevance)?.clamp(0.0, 1.0),
            api_delay,
            relevance_batch_size: d.relevance_batch_size,
            trends_enabled: env_flag("GOOGLE_TRENDS_ENABLED", d.trends_enabled),
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("invalid {key}={raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}

pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
