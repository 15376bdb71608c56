// src/collectors/trends.rs
//! Search-interest trends and volume estimates.
//!
//! `TrendsEstimator` reads 0..=100 interest series from an optional
//! `InterestSource`. With no source (or trends switched off) volume falls back
//! to a word-count heuristic: shorter keywords are broader, so more searched.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::{InterestOverTime, VolumeEstimator};
use crate::keyword::Trend;

pub const BASE_VOLUME: u64 = 1000;
const MIN_VOLUME: u64 = 10;
const RISING_RATIO: f64 = 1.2;
const DECLINING_RATIO: f64 = 0.8;

/// Raw interest data, e.g. a trends API or a recorded fixture.
#[async_trait]
pub trait InterestSource: Send + Sync {
    /// Interest points over time, each in 0..=100. Empty when unknown.
    async fn interest_series(&self, keyword: &str) -> Result<Vec<u32>>;
    async fn related_queries(&self, keyword: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureEntry {
    #[serde(default)]
    pub interest: Vec<u32>,
    #[serde(default)]
    pub related: Vec<String>,
}

/// Interest data loaded from JSON: `{ "<keyword>": { "interest": [..], "related": [..] } }`.
#[derive(Debug, Clone, Default)]
pub struct FixtureInterest {
    entries: HashMap<String, FixtureEntry>,
}

impl FixtureInterest {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let raw: HashMap<String, FixtureEntry> =
            serde_json::from_str(s).context("parsing trends fixture")?;
        let entries = raw
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect();
        Ok(Self { entries })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading trends fixture {}", path.display()))?;
        Self::from_json_str(&s)
    }

    /// `TRENDS_FIXTURE_PATH` if set.
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var("TRENDS_FIXTURE_PATH") {
            Ok(p) if !p.trim().is_empty() => Ok(Some(Self::from_file(p)?)),
            _ => Ok(None),
        }
    }

    fn entry(&self, keyword: &str) -> Option<&FixtureEntry> {
        self.entries.get(&keyword.trim().to_lowercase())
    }
}

#[async_trait]
impl InterestSource for FixtureInterest {
    async fn interest_series(&self, keyword: &str) -> Result<Vec<u32>> {
        Ok(self.entry(keyword).map(|e| e.interest.clone()).unwrap_or_default())
    }

    async fn related_queries(&self, keyword: &str) -> Result<Vec<String>> {
        Ok(self.entry(keyword).map(|e| e.related.clone()).unwrap_or_default())
    }
}

pub struct TrendsEstimator {
    source: Option<Arc<dyn InterestSource>>,
    enabled: bool,
}

impl TrendsEstimator {
    pub fn new(source: Option<Arc<dyn InterestSource>>, enabled: bool) -> Self {
        Self { source, enabled }
    }

    /// Heuristic only.
    pub fn disabled() -> Self {
        Self::new(None, false)
    }

    fn active_source(&self) -> Option<&Arc<dyn InterestSource>> {
        if self.enabled {
            self.source.as_ref()
        } else {
            None
        }
    }
}

#[async_trait]
impl VolumeEstimator for TrendsEstimator {
    fn enabled(&self) -> bool {
        self.active_source().is_some()
    }

    async fn related_queries(&self, keyword: &str) -> Result<Vec<String>> {
        match self.active_source() {
            Some(src) => src.related_queries(keyword).await,
            None => Ok(Vec::new()),
        }
    }

    async fn estimate_volume(&self, keyword: &str) -> Result<u64> {
        let Some(src) = self.active_source() else {
            return Ok(volume_from_word_count(keyword));
        };
        let series = src.interest_series(keyword).await?;
        let interest = summarize(&series).average_interest;
        let volume = volume_from_interest(BASE_VOLUME, interest);
        debug!(keyword, interest, volume, "volume from interest");
        Ok(volume)
    }

    async fn interest_over_time(&self, keyword: &str) -> Result<InterestOverTime> {
        match self.active_source() {
            Some(src) => Ok(summarize(&src.interest_series(keyword).await?)),
            None => Ok(InterestOverTime::fallback()),
        }
    }

    fn name(&self) -> &'static str {
        "trends"
    }
}

/// Average, extremes and direction of an interest series.
pub fn summarize(series: &[u32]) -> InterestOverTime {
    if series.is_empty() {
        return InterestOverTime {
            average_interest: 0,
            trend: Trend::NoData,
            max_interest: None,
            min_interest: None,
        };
    }
    let sum: u64 = series.iter().map(|&v| u64::from(v)).sum();
    let average = (sum as f64 / series.len() as f64).round() as u32;
    InterestOverTime {
        average_interest: average,
        trend: trend_of(series),
        max_interest: series.iter().copied().max(),
        min_interest: series.iter().copied().min(),
    }
}

/// Mean of the last three points against the first three.
pub fn trend_of(series: &[u32]) -> Trend {
    if series.is_empty() {
        return Trend::NoData;
    }
    let mean = |xs: &[u32]| xs.iter().map(|&v| f64::from(v)).sum::<f64>() / xs.len() as f64;
    let n = series.len().min(3);
    let early = mean(&series[..n]);
    let recent = mean(&series[series.len() - n..]);
    if early == 0.0 {
        return if recent > 0.0 { Trend::Rising } else { Trend::Stable };
    }
    let ratio = recent / early;
    if ratio > RISING_RATIO {
        Trend::Rising
    } else if ratio < DECLINING_RATIO {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

pub fn volume_from_interest(base: u64, interest: u32) -> u64 {
    if interest == 0 {
        return base / 10;
    }
    (base * u64::from(interest) / 50).max(MIN_VOLUME)
}

pub fn volume_from_word_count(keyword: &str) -> u64 {
    match keyword.split_whitespace().count() {
        0..=2 => 5000,
        3 => 2000,
        4 => 1000,
        _ => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "Rust Jobs": { "interest": [10, 10, 10, 20, 30, 40], "related": ["rust jobs remote"] },
        "flat": { "interest": [50, 50, 50] },
        "fading": { "interest": [80, 70, 60, 20, 10, 10] }
    }"#;

    fn estimator() -> TrendsEstimator {
        let src = FixtureInterest::from_json_str(FIXTURE).unwrap();
        TrendsEstimator::new(Some(Arc::new(src)), true)
    }

    #[test]
    fn trend_direction() {
        assert_eq!(trend_of(&[10, 10, 10, 20, 30, 40]), Trend::Rising);
        assert_eq!(trend_of(&[80, 70, 60, 20, 10, 10]), Trend::Declining);
        assert_eq!(trend_of(&[50, 55, 45]), Trend::Stable);
        assert_eq!(trend_of(&[]), Trend::NoData);
    }

    #[test]
    fn empty_series_has_no_data() {
        let s = summarize(&[]);
        assert_eq!(s.average_interest, 0);
        assert_eq!(s.trend, Trend::NoData);
    }

    #[test]
    fn interest_volume_mapping() {
        assert_eq!(volume_from_interest(1000, 0), 100);
        assert_eq!(volume_from_interest(1000, 50), 1000);
        assert_eq!(volume_from_interest(1000, 100), 2000);
        assert_eq!(volume_from_interest(1000, 1), 20);
        assert_eq!(volume_from_interest(100, 1), 10);
    }

    #[test]
    fn word_count_heuristic() {
        assert_eq!(volume_from_word_count("rust"), 5000);
        assert_eq!(volume_from_word_count("rust jobs"), 5000);
        assert_eq!(volume_from_word_count("rust jobs remote"), 2000);
        assert_eq!(volume_from_word_count("rust jobs remote europe"), 1000);
        assert_eq!(volume_from_word_count("entry level rust jobs remote"), 500);
    }

    #[tokio::test]
    async fn fixture_backed_estimates() {
        let t = estimator();
        assert!(t.enabled());
        // avg of [50,50,50] = 50 → base volume
        assert_eq!(t.estimate_volume("flat").await.unwrap(), 1000);
        let iot = t.interest_over_time("rust jobs").await.unwrap();
        assert_eq!(iot.trend, Trend::Rising);
        assert_eq!(iot.max_interest, Some(40));
        assert_eq!(
            t.related_queries("RUST JOBS").await.unwrap(),
            vec!["rust jobs remote".to_string()]
        );
        // unknown keyword: empty series → interest 0 → base/10
        assert_eq!(t.estimate_volume("unknown").await.unwrap(), 100);
    }

    #[tokio::test]
    async fn disabled_uses_heuristic() {
        let src = FixtureInterest::from_json_str(FIXTURE).unwrap();
        let t = TrendsEstimator::new(Some(Arc::new(src)), false);
        assert!(!t.enabled());
        assert_eq!(t.estimate_volume("flat").await.unwrap(), 5000);
        assert!(t.related_queries("rust jobs").await.unwrap().is_empty());
        assert_eq!(t.interest_over_time("flat").await.unwrap(), InterestOverTime::fallback());
    }
}
