// src/scoring/mod.rs
//! Scoring engine entry: normalize → score → classify → explain → rank.
//!
//! Everything here is pure computation over in-memory values. The only shared
//! state is the immutable `ScoringWeights` held by `KeywordScorer`, so one
//! scorer can be wrapped in an `Arc` and used from any number of tasks, and
//! several scorers with different weights can coexist.

pub mod classify;
pub mod difficulty;
pub mod normalize;
pub mod opportunity;
pub mod ranker;
pub mod reasoning;

use metrics::counter;

use crate::config::ScoringWeights;
use crate::keyword::{KeywordRecord, ScoredKeyword};

// Re-export convenient types.
pub use crate::scoring::classify::classify;
pub use crate::scoring::difficulty::{keyword_difficulty, SerpSignals};
pub use crate::scoring::normalize::NormalizedMetrics;
pub use crate::scoring::opportunity::OpportunityScorer;
pub use crate::scoring::reasoning::explain;

/// Default shortlist size when callers don't specify one.
pub const DEFAULT_TOP_N: usize = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeywordScorer {
    scorer: OpportunityScorer,
}

impl KeywordScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            scorer: OpportunityScorer::new(weights),
        }
    }

    /// Build from file/env configuration (see `config::weights`).
    pub fn from_config() -> anyhow::Result<Self> {
        Ok(Self::new(ScoringWeights::load_default()?))
    }

    pub fn weights(&self) -> &ScoringWeights {
        self.scorer.weights()
    }

    pub fn opportunity(&self, record: &KeywordRecord) -> f64 {
        self.scorer.score(record)
    }

    /// Move a record into its scored form (no rank, no reasoning yet).
    pub fn annotate(&self, record: KeywordRecord) -> ScoredKeyword {
        let opportunity_score = self.scorer.score(&record);
        let ranking_potential = classify(&record, opportunity_score);
        let keyword_difficulty = keyword_difficulty(&SerpSignals::from_record(&record));
        counter!("keywords_scored_total").increment(1);
        ScoredKeyword {
            record,
            opportunity_score,
            ranking_potential,
            keyword_difficulty,
            rank: None,
            reasoning: None,
        }
    }

    pub fn explain(&self, scored: &ScoredKeyword) -> String {
        explain(&scored.record)
    }

    pub fn rank(&self, records: Vec<KeywordRecord>, top_n: usize) -> Vec<ScoredKeyword> {
        ranker::rank(self, records, top_n)
    }

    pub fn rank_with_reasoning(
        &self,
        records: Vec<KeywordRecord>,
        top_n: usize,
    ) -> Vec<ScoredKeyword> {
        ranker::rank_with_reasoning(self, records, top_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyword::{DifficultyCategory, OpportunityRating, Recommendation};

    #[test]
    fn annotate_fills_every_derived_field() {
        let s = KeywordScorer::default();
        let out = s.annotate(
            KeywordRecord::new("remote international internship programs")
                .volume(2400)
                .competition(22)
                .relevance(0.92)
                .brands(1)
                .first_page(0.78),
        );
        assert_eq!(out.opportunity_score, 51.56);
        assert_eq!(out.ranking_potential.difficulty_category, DifficultyCategory::Low);
        assert_eq!(out.ranking_potential.opportunity_rating, OpportunityRating::Fair);
        assert_eq!(out.ranking_potential.recommendation, Recommendation::QuickWin);
        assert_eq!(out.keyword_difficulty, 8);
        assert!(out.rank.is_none());
        assert!(out.reasoning.is_none());
    }

    #[test]
    fn default_filled_record_is_poor() {
        let out = KeywordScorer::default().annotate(KeywordRecord::new("nothing measured"));
        assert_eq!(out.opportunity_score, 31.26);
        assert_eq!(out.ranking_potential.opportunity_rating, OpportunityRating::Poor);
        assert_eq!(out.ranking_potential.difficulty_category, DifficultyCategory::Medium);
    }
}
