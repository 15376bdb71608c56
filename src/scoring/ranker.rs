// src/scoring/ranker.rs
//! Ranker: score the full pool, stable-sort by opportunity (desc), keep top-N,
//! assign dense 1-based ranks.
//!
//! Every input record is scored, including the ones truncated away. Equal scores
//! keep their input order (`sort_by` is stable).

use metrics::{counter, histogram};
use std::time::Instant;
use tracing::debug;

use super::KeywordScorer;
use crate::keyword::{KeywordRecord, ScoredKeyword};

pub fn rank(scorer: &KeywordScorer, records: Vec<KeywordRecord>, top_n: usize) -> Vec<ScoredKeyword> {
    let t0 = Instant::now();
    let pool = records.len();

    // 1) Annotate the whole pool
    let mut scored: Vec<ScoredKeyword> = records.into_iter().map(|r| scorer.annotate(r)).collect();

    // 2) Stable descending sort
    scored.sort_by(|a, b| b.opportunity_score.total_cmp(&a.opportunity_score));

    // 3) Truncate + dense ranks
    scored.truncate(top_n);
    let ranked: Vec<ScoredKeyword> = scored
        .into_iter()
        .enumerate()
        .map(|(i, s)| s.with_rank((i + 1) as u32))
        .collect();

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("rank_duration_ms").record(ms);
    counter!("keywords_ranked_total").increment(ranked.len() as u64);
    debug!(pool, top_n, kept = ranked.len(), ms, "ranked keyword pool");

    ranked
}

/// `rank` followed by reasoning for every retained entry.
pub fn rank_with_reasoning(
    scorer: &KeywordScorer,
    records: Vec<KeywordRecord>,
    top_n: usize,
) -> Vec<ScoredKeyword> {
    rank(scorer, records, top_n)
        .into_iter()
        .map(|s| {
            let why = scorer.explain(&s);
            s.with_reasoning(why)
        })
        .collect()
}
