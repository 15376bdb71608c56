//! Opportunity score: weighted blend of normalized volume, inverted competition
//! and relevance.
//!
//! opportunity = volume_norm*Wv + competition_norm*Wc + relevance_norm*Wr
//! rounded to two decimals. Always finite and within [0,100] because every
//! term is in [0,100] and the weights sum to 1.

use super::normalize::{NormalizedMetrics, NORMALIZED_MAX};
use crate::config::ScoringWeights;
use crate::keyword::KeywordRecord;

/// Stateless scorer over an immutable weights value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OpportunityScorer {
    weights: ScoringWeights,
}

impl OpportunityScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a record (defaults applied to missing metrics).
    pub fn score(&self, record: &KeywordRecord) -> f64 {
        self.score_normalized(&NormalizedMetrics::from_record(record))
    }

    pub fn score_normalized(&self, m: &NormalizedMetrics) -> f64 {
        let w = &self.weights;
        let raw = m.volume * w.volume() + m.competition * w.competition() + m.relevance * w.relevance();
        round2(raw.clamp(0.0, NORMALIZED_MAX))
    }
}

/// Round half away from zero to two decimals.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
