//! Keyword difficulty (0 = easiest, 100 = hardest) from SERP signals.
//!
//! - big brands      : 8 points each, max 40
//! - SERP features   : 10 points each for featured snippet, knowledge graph, ads
//! - total results   : >100M → 30, >10M → 20, >1M → 10
//!
//! Informational only; it never feeds the opportunity score. The SERP client's
//! competition score uses a different point table and stays separate.

use crate::keyword::KeywordRecord;
use serde::Deserialize;

const BRAND_POINTS: u32 = 8;
const BRAND_CAP: u32 = 40;
const FEATURE_POINTS: u32 = 10;

/// SERP signals needed for the difficulty estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SerpSignals {
    #[serde(default)]
    pub big_brands_count: u32,
    #[serde(default)]
    pub has_featured_snippet: bool,
    #[serde(default)]
    pub has_knowledge_graph: bool,
    #[serde(default)]
    pub has_ads: bool,
    #[serde(default)]
    pub total_results: u64,
}

impl SerpSignals {
    pub fn from_record(r: &KeywordRecord) -> Self {
        Self {
            big_brands_count: r.big_brands_count.unwrap_or(0),
            has_featured_snippet: r.has_featured_snippet,
            has_knowledge_graph: r.has_knowledge_graph,
            has_ads: r.has_ads,
            total_results: r.total_results.unwrap_or(0),
        }
    }
}

pub fn keyword_difficulty(s: &SerpSignals) -> u32 {
    let mut difficulty = s.big_brands_count.saturating_mul(BRAND_POINTS).min(BRAND_CAP);

    for present in [s.has_featured_snippet, s.has_knowledge_graph, s.has_ads] {
        if present {
            difficulty += FEATURE_POINTS;
        }
    }

    difficulty += match s.total_results {
        n if n > 100_000_000 => 30,
        n if n > 10_000_000 => 20,
        n if n > 1_000_000 => 10,
        _ => 0,
    };

    difficulty.min(100)
}
