// src/pipeline.rs
//! Research pipeline: seed keyword → candidate pool → enriched records →
//! ranked shortlist.
//!
//! Collaborator calls run sequentially with `api_delay` pauses between them.
//! A failing collaborator never aborts a run: its error is logged, counted
//! and replaced by neutral values.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::collectors::{
    InterestOverTime, KeywordExpander, SerpAnalysis, SerpSource, VolumeEstimator,
};
use crate::config::ResearchConfig;
use crate::keyword::{KeywordRecord, ScoredKeyword, DEFAULT_RELEVANCE, DEFAULT_VOLUME};
use crate::scoring::KeywordScorer;

/// Candidates this short are noise ("seo", "job", ...).
const MIN_KEYWORD_CHARS: usize = 4;
const MAX_TOP_DOMAINS: usize = 5;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("keywords_scored_total", "Records scored by the engine.");
        describe_counter!("keywords_ranked_total", "Records returned by the ranker.");
        describe_histogram!("rank_duration_ms", "Ranking time in milliseconds.");
        describe_counter!(
            "collector_errors_total",
            "Collaborator calls that failed and fell back to defaults."
        );
        describe_counter!(
            "research_candidates_total",
            "Unique candidate keywords after merging."
        );
        describe_counter!(
            "research_filtered_total",
            "Candidates dropped by the relevance filter."
        );
    });
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportConfiguration {
    pub max_keywords: usize,
    pub min_relevance_score: f64,
    pub volume_weight: f64,
    pub competition_weight: f64,
    pub relevance_weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    pub seed_keyword: String,
    pub generated_at: DateTime<Utc>,
    pub execution_time_seconds: f64,
    pub total_keywords_analyzed: usize,
    pub keywords_after_relevance_filter: usize,
    pub top_keywords_count: usize,
    pub configuration: ReportConfiguration,
    pub top_keywords: Vec<ScoredKeyword>,
}

pub struct Researcher {
    expander: Arc<dyn KeywordExpander>,
    serp: Arc<dyn SerpSource>,
    volume: Arc<dyn VolumeEstimator>,
    scorer: KeywordScorer,
    cfg: ResearchConfig,
}

impl Researcher {
    pub fn new(
        expander: Arc<dyn KeywordExpander>,
        serp: Arc<dyn SerpSource>,
        volume: Arc<dyn VolumeEstimator>,
        scorer: KeywordScorer,
        cfg: ResearchConfig,
    ) -> Self {
        Self {
            expander,
            serp,
            volume,
            scorer,
            cfg,
        }
    }

    pub async fn research(&self, seed: &str) -> Result<ResearchReport> {
        let seed = seed.trim().to_lowercase();
        if seed.is_empty() {
            bail!("seed keyword is empty");
        }
        ensure_metrics_described();
        let t0 = Instant::now();
        info!(seed = %seed, "keyword research started");

        // 1) Candidate pool
        let candidates = self.collect_candidates(&seed).await;
        counter!("research_candidates_total").increment(candidates.len() as u64);
        info!(n = candidates.len(), "candidate keywords collected");

        // 2) Relevance filter
        let relevance = self.rate_relevance(&seed, &candidates).await;
        let relevant: Vec<(String, f64)> = candidates
            .iter()
            .map(|kw| {
                let r = relevance.get(kw).copied().unwrap_or(DEFAULT_RELEVANCE);
                (kw.clone(), r)
            })
            .filter(|(_, r)| *r >= self.cfg.min_relevance)
            .collect();
        let dropped = candidates.len() - relevant.len();
        counter!("research_filtered_total").increment(dropped as u64);
        info!(kept = relevant.len(), dropped, "relevance filter applied");

        // 3) Competition + volume enrichment
        let mut records = Vec::with_capacity(relevant.len());
        for (i, (kw, r)) in relevant.into_iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }
            let serp = self.competition(&kw).await;
            let record = self.with_volume(apply_serp(KeywordRecord::new(&kw).relevance(r), serp)).await;
            records.push(record);
        }
        let keywords_after_relevance_filter = records.len();

        // 4) Rank
        let top_keywords = self
            .scorer
            .rank_with_reasoning(records, self.cfg.max_keywords);

        let secs = t0.elapsed().as_secs_f64();
        let weights = self.scorer.weights();
        let report = ResearchReport {
            seed_keyword: seed,
            generated_at: Utc::now(),
            execution_time_seconds: (secs * 100.0).round() / 100.0,
            total_keywords_analyzed: candidates.len(),
            keywords_after_relevance_filter,
            top_keywords_count: top_keywords.len(),
            configuration: ReportConfiguration {
                max_keywords: self.cfg.max_keywords,
                min_relevance_score: self.cfg.min_relevance,
                volume_weight: weights.volume(),
                competition_weight: weights.competition(),
                relevance_weight: weights.relevance(),
            },
            top_keywords,
        };
        info!(
            seed = %report.seed_keyword,
            top = report.top_keywords_count,
            secs = report.execution_time_seconds,
            "keyword research finished"
        );
        Ok(report)
    }

    async fn collect_candidates(&self, seed: &str) -> Vec<String> {
        let llm = self
            .expander
            .expand(seed, self.cfg.expansion_count)
            .await
            .unwrap_or_else(|e| collector_failed(self.expander.name(), "expand", seed, e));

        let mut serp = self
            .serp
            .related_searches(seed)
            .await
            .unwrap_or_else(|e| collector_failed(self.serp.name(), "related_searches", seed, e));
        self.pause().await;
        serp.extend(
            self.serp
                .people_also_ask(seed)
                .await
                .unwrap_or_else(|e| collector_failed(self.serp.name(), "people_also_ask", seed, e)),
        );
        let serp: Vec<String> = serp
            .iter()
            .map(|s| s.trim().trim_end_matches('?').to_lowercase())
            .collect();

        let trends = if self.volume.enabled() {
            self.volume
                .related_queries(seed)
                .await
                .unwrap_or_else(|e| collector_failed(self.volume.name(), "related_queries", seed, e))
        } else {
            Vec::new()
        };

        debug!(llm = llm.len(), serp = serp.len(), trends = trends.len(), "candidate sources");
        merge_keywords(seed, [llm, serp, trends])
    }

    async fn rate_relevance(&self, seed: &str, candidates: &[String]) -> HashMap<String, f64> {
        let batch_size = self.cfg.relevance_batch_size.max(1);
        let mut scores = HashMap::with_capacity(candidates.len());
        for (i, batch) in candidates.chunks(batch_size).enumerate() {
            if i > 0 {
                self.pause().await;
            }
            match self.expander.relevance(seed, batch).await {
                Ok(m) => scores.extend(m),
                Err(e) => {
                    collector_failed::<()>(self.expander.name(), "relevance", seed, e);
                }
            }
        }
        scores
    }

    async fn competition(&self, keyword: &str) -> SerpAnalysis {
        match self.serp.analyze(keyword).await {
            Ok(a) => a,
            Err(e) => {
                collector_failed::<()>(self.serp.name(), "analyze", keyword, e);
                SerpAnalysis::fallback(keyword)
            }
        }
    }

    async fn with_volume(&self, record: KeywordRecord) -> KeywordRecord {
        let volume = match self.volume.estimate_volume(&record.keyword).await {
            Ok(v) => v,
            Err(e) => {
                collector_failed::<()>(self.volume.name(), "estimate_volume", &record.keyword, e);
                DEFAULT_VOLUME
            }
        };
        let mut record = record.volume(volume);
        if self.volume.enabled() {
            let interest = match self.volume.interest_over_time(&record.keyword).await {
                Ok(i) => i,
                Err(e) => {
                    collector_failed::<()>(self.volume.name(), "interest_over_time", &record.keyword, e);
                    InterestOverTime::fallback()
                }
            };
            record.trend = Some(interest.trend);
            record.average_interest = Some(interest.average_interest);
        }
        record
    }

    async fn pause(&self) {
        if !self.cfg.api_delay.is_zero() {
            tokio::time::sleep(self.cfg.api_delay).await;
        }
    }
}

fn collector_failed<T: Default>(collector: &str, op: &str, keyword: &str, e: anyhow::Error) -> T {
    warn!(error = ?e, collector, op, keyword, "collector failed, using defaults");
    counter!("collector_errors_total", "collector" => collector.to_string()).increment(1);
    T::default()
}

/// Copy competition analysis onto a record.
pub fn apply_serp(mut record: KeywordRecord, serp: SerpAnalysis) -> KeywordRecord {
    record.competition_score = Some(serp.competition_score);
    record.big_brands_count = Some(serp.big_brands_count);
    record.has_featured_snippet = serp.has_featured_snippet;
    record.has_knowledge_graph = serp.has_knowledge_graph;
    record.has_ads = serp.has_ads;
    record.first_page_probability = Some(serp.first_page_probability);
    record.total_results = Some(serp.total_results);
    record.serp_features_count = Some(serp.serp_features_count);
    record.top_domains = serp.domains.into_iter().take(MAX_TOP_DOMAINS).collect();
    record
}

/// Concatenate the sources and the seed; lowercase, trim, drop short entries
/// and duplicates (first occurrence wins).
pub fn merge_keywords<I>(seed: &str, sources: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .flatten()
        .chain(std::iter::once(seed.to_string()))
        .map(|kw| kw.trim().to_lowercase())
        .filter(|kw| kw.chars().count() >= MIN_KEYWORD_CHARS)
        .filter(|kw| seen.insert(kw.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn merge_dedups_and_appends_seed() {
        let out = merge_keywords(
            "rust jobs",
            [
                v(&["Rust Jobs Remote", " rust jobs remote ", "seo"]),
                v(&["rust developer salary"]),
                v(&[]),
            ],
        );
        assert_eq!(out, v(&["rust jobs remote", "rust developer salary", "rust jobs"]));
    }

    #[test]
    fn merge_keeps_seed_once() {
        let out = merge_keywords("rust jobs", [v(&["rust jobs"])]);
        assert_eq!(out, v(&["rust jobs"]));
    }

    #[test]
    fn serp_fields_are_copied() {
        let mut a = SerpAnalysis::fallback("x kw");
        a.domains = v(&["a", "b", "c", "d", "e", "f", "g"]);
        a.has_ads = true;
        let r = apply_serp(KeywordRecord::new("x kw"), a);
        assert_eq!(r.competition_score, Some(50));
        assert_eq!(r.first_page_probability, Some(0.5));
        assert_eq!(r.top_domains.len(), 5);
        assert!(r.has_ads);
    }
}
