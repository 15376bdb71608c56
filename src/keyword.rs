// src/keyword.rs
//! Keyword records flowing through the scoring pipeline.
//!
//! `KeywordRecord` carries the raw, possibly partial metrics measured upstream.
//! Scoring never mutates a record: it is moved into a `ScoredKeyword` that adds
//! the derived fields (opportunity score, ranking potential, rank, reasoning).

use serde::{Deserialize, Serialize};

/// Neutral fallbacks used when a metric was never measured.
pub const DEFAULT_VOLUME: u64 = 1000;
pub const DEFAULT_COMPETITION: u32 = 50;
pub const DEFAULT_RELEVANCE: f64 = 0.5;
pub const DEFAULT_FIRST_PAGE_PROBABILITY: f64 = 0.5;

/// One candidate keyword with its raw metrics. Every metric is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,

    /// Monthly search estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_volume: Option<u64>,
    /// 0..=100, higher is harder to rank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition_score: Option<u32>,
    /// 0.0..=1.0 semantic closeness to the seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    /// High-authority domains among the top organic results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub big_brands_count: Option<u32>,

    #[serde(default)]
    pub has_featured_snippet: bool,
    #[serde(default)]
    pub has_knowledge_graph: bool,
    #[serde(default)]
    pub has_ads: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_page_probability: Option<f64>,

    // Pass-through enrichment; persisted in reports, not used for scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serp_features_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_domains: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_interest: Option<u32>,
}

impl KeywordRecord {
    /// New record with only the keyword set (trimmed + lowercased).
    pub fn new(keyword: impl AsRef<str>) -> Self {
        Self {
            keyword: keyword.as_ref().trim().to_lowercase(),
            ..Default::default()
        }
    }

    pub fn volume(mut self, v: u64) -> Self {
        self.estimated_volume = Some(v);
        self
    }

    pub fn competition(mut self, c: u32) -> Self {
        self.competition_score = Some(c);
        self
    }

    pub fn relevance(mut self, r: f64) -> Self {
        self.relevance_score = Some(r);
        self
    }

    pub fn brands(mut self, n: u32) -> Self {
        self.big_brands_count = Some(n);
        self
    }

    pub fn serp_features(mut self, featured_snippet: bool, knowledge_graph: bool, ads: bool) -> Self {
        self.has_featured_snippet = featured_snippet;
        self.has_knowledge_graph = knowledge_graph;
        self.has_ads = ads;
        self
    }

    pub fn first_page(mut self, p: f64) -> Self {
        self.first_page_probability = Some(p);
        self
    }

    // --- effective values (defaults applied, clamped to their domains) ---

    pub fn effective_volume(&self) -> u64 {
        self.estimated_volume.unwrap_or(DEFAULT_VOLUME)
    }

    pub fn effective_competition(&self) -> u32 {
        self.competition_score.unwrap_or(DEFAULT_COMPETITION).min(100)
    }

    pub fn effective_relevance(&self) -> f64 {
        clamp01(self.relevance_score.unwrap_or(DEFAULT_RELEVANCE))
    }

    pub fn effective_first_page_probability(&self) -> f64 {
        clamp01(
            self.first_page_probability
                .unwrap_or(DEFAULT_FIRST_PAGE_PROBABILITY),
        )
    }
}

/// Direction of search interest over the last year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Rising,
    Declining,
    Stable,
    NoData,
}

/// Five ordered difficulty bands over `competition_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DifficultyCategory {
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Medium-Low")]
    MediumLow,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    #[serde(rename = "High")]
    High,
}

impl DifficultyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::MediumLow => "Medium-Low",
            Self::Medium => "Medium",
            Self::MediumHigh => "Medium-High",
            Self::High => "High",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Easy to rank with quality content",
            Self::MediumLow => "Good opportunity with moderate effort",
            Self::Medium => "Requires strong content and backlinks",
            Self::MediumHigh => "Challenging, needs authority and optimization",
            Self::High => "Very difficult, dominated by major brands",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpportunityRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl OpportunityRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// Actionable advice. Serialized as the full sentence shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "🎯 High Priority: Low competition, good volume - target immediately")]
    HighPriority,
    #[serde(rename = "✅ Quick Win: Easy to rank, highly relevant - great for content strategy")]
    QuickWin,
    #[serde(rename = "⚠️ Long-term Target: High competition - requires authority building")]
    LongTermTarget,
    #[serde(rename = "💡 Niche Opportunity: Low volume but easy rank - good for specific audiences")]
    NicheOpportunity,
    #[serde(rename = "📊 Moderate Opportunity: Balanced metrics - include in content mix")]
    ModerateOpportunity,
    #[serde(rename = "⏸️ Low Priority: Better opportunities available - consider alternatives")]
    LowPriority,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Self::HighPriority => {
                "🎯 High Priority: Low competition, good volume - target immediately"
            }
            Self::QuickWin => {
                "✅ Quick Win: Easy to rank, highly relevant - great for content strategy"
            }
            Self::LongTermTarget => {
                "⚠️ Long-term Target: High competition - requires authority building"
            }
            Self::NicheOpportunity => {
                "💡 Niche Opportunity: Low volume but easy rank - good for specific audiences"
            }
            Self::ModerateOpportunity => {
                "📊 Moderate Opportunity: Balanced metrics - include in content mix"
            }
            Self::LowPriority => {
                "⏸️ Low Priority: Better opportunities available - consider alternatives"
            }
        }
    }
}

/// Qualitative assessment attached to every scored keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingPotential {
    pub difficulty_category: DifficultyCategory,
    pub difficulty_description: String,
    pub opportunity_rating: OpportunityRating,
    pub first_page_probability: f64,
    pub recommendation: Recommendation,
}

/// A record plus everything the scoring engine derives from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredKeyword {
    #[serde(flatten)]
    pub record: KeywordRecord,
    /// 0..=100, two decimals.
    pub opportunity_score: f64,
    pub ranking_potential: RankingPotential,
    /// Informational 0..=100 difficulty from SERP signals.
    pub keyword_difficulty: u32,
    /// Dense 1-based rank; set only on entries kept by the ranker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl ScoredKeyword {
    pub fn keyword(&self) -> &str {
        &self.record.keyword
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}

pub(crate) fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_metrics_fall_back_to_neutral_values() {
        let r = KeywordRecord::new("  Remote Internships ");
        assert_eq!(r.keyword, "remote internships");
        assert_eq!(r.effective_volume(), 1000);
        assert_eq!(r.effective_competition(), 50);
        assert!((r.effective_relevance() - 0.5).abs() < 1e-12);
        assert!((r.effective_first_page_probability() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_metrics_are_clamped() {
        let r = KeywordRecord::new("x").competition(140).relevance(1.7);
        assert_eq!(r.effective_competition(), 100);
        assert!((r.effective_relevance() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn partial_json_record_deserializes() {
        let r: KeywordRecord =
            serde_json::from_value(json!({"keyword": "rust jobs", "competition_score": 12}))
                .unwrap();
        assert_eq!(r.competition_score, Some(12));
        assert!(r.estimated_volume.is_none());
        assert!(!r.has_ads);
    }

    #[test]
    fn vocabulary_serializes_exactly() {
        assert_eq!(
            serde_json::to_value(DifficultyCategory::MediumLow).unwrap(),
            json!("Medium-Low")
        );
        assert_eq!(
            serde_json::to_value(OpportunityRating::Fair).unwrap(),
            json!("Fair")
        );
        let rec = serde_json::to_value(Recommendation::QuickWin).unwrap();
        assert_eq!(rec, json!(Recommendation::QuickWin.message()));
        assert!(rec.as_str().unwrap().contains("Quick Win"));
    }
}
