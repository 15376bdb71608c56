//! Metric normalization onto a shared 0..=100 scale.
//!
//! - volume      : sqrt(volume) / 10, capped at 100 (diminishing credit for huge volumes)
//! - competition : 100 - competition_score (difficulty inverted into opportunity)
//! - relevance   : relevance_score * 100

use crate::keyword::KeywordRecord;

pub const NORMALIZED_MAX: f64 = 100.0;

/// Three comparable contributions in [0,100]. Keep it small and clear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedMetrics {
    pub volume: f64,
    pub competition: f64,
    pub relevance: f64,
}

impl NormalizedMetrics {
    /// Normalize a record's metrics, applying neutral defaults for missing ones.
    pub fn from_record(record: &KeywordRecord) -> Self {
        Self {
            volume: normalize_volume(record.effective_volume()),
            competition: normalize_competition(record.effective_competition()),
            relevance: normalize_relevance(record.effective_relevance()),
        }
    }
}

pub fn normalize_volume(volume: u64) -> f64 {
    ((volume as f64).sqrt() / 10.0).min(NORMALIZED_MAX)
}

pub fn normalize_competition(competition: u32) -> f64 {
    NORMALIZED_MAX - f64::from(competition.min(100))
}

pub fn normalize_relevance(relevance: f64) -> f64 {
    crate::keyword::clamp01(relevance) * NORMALIZED_MAX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_is_sqrt_compressed_and_capped() {
        assert!((normalize_volume(2400) - 4.898979485566356).abs() < 1e-9);
        assert_eq!(normalize_volume(0), 0.0);
        assert_eq!(normalize_volume(1_000_000), 100.0);
        assert_eq!(normalize_volume(50_000_000), 100.0);
    }

    #[test]
    fn competition_is_inverted() {
        assert_eq!(normalize_competition(22), 78.0);
        assert_eq!(normalize_competition(0), 100.0);
        assert_eq!(normalize_competition(250), 0.0);
    }

    #[test]
    fn defaults_apply_for_empty_record() {
        let m = NormalizedMetrics::from_record(&KeywordRecord::new("empty"));
        assert!((m.volume - 1000f64.sqrt() / 10.0).abs() < 1e-12);
        assert_eq!(m.competition, 50.0);
        assert_eq!(m.relevance, 50.0);
    }
}
