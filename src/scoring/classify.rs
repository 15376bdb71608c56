//! # Ranking Potential
//! Pure mapping `(record, opportunity)` → `RankingPotential`.
//!
//! Difficulty bands use exclusive upper bounds on competition (30/50/70/85).
//! Ratings are evaluated highest threshold first (75/60/45).
//! Recommendations are a fixed-priority guard chain: the first matching rule
//! wins even when a later rule would also match.

use crate::keyword::{
    DifficultyCategory, KeywordRecord, OpportunityRating, RankingPotential, Recommendation,
};

pub fn difficulty_category(competition: u32) -> DifficultyCategory {
    if competition < 30 {
        DifficultyCategory::Low
    } else if competition < 50 {
        DifficultyCategory::MediumLow
    } else if competition < 70 {
        DifficultyCategory::Medium
    } else if competition < 85 {
        DifficultyCategory::MediumHigh
    } else {
        DifficultyCategory::High
    }
}

pub fn opportunity_rating(opportunity: f64) -> OpportunityRating {
    if opportunity >= 75.0 {
        OpportunityRating::Excellent
    } else if opportunity >= 60.0 {
        OpportunityRating::Good
    } else if opportunity >= 45.0 {
        OpportunityRating::Fair
    } else {
        OpportunityRating::Poor
    }
}

/// Priority order:
/// 1) high opportunity + low competition
/// 2) easy + highly relevant
/// 3) big volume but contested
/// 4) easy but tiny
/// 5) middling opportunity
/// 6) everything else
pub fn recommend(record: &KeywordRecord, opportunity: f64) -> Recommendation {
    let competition = record.effective_competition();
    let volume = record.effective_volume();
    let relevance = record.effective_relevance();

    if opportunity >= 70.0 && competition < 40 {
        Recommendation::HighPriority
    } else if competition < 30 && relevance > 0.7 {
        Recommendation::QuickWin
    } else if volume > 5000 && competition > 70 {
        Recommendation::LongTermTarget
    } else if competition < 30 && volume < 500 {
        Recommendation::NicheOpportunity
    } else if (40.0..70.0).contains(&opportunity) {
        Recommendation::ModerateOpportunity
    } else {
        Recommendation::LowPriority
    }
}

/// Full qualitative assessment. Idempotent: same inputs, same output.
pub fn classify(record: &KeywordRecord, opportunity: f64) -> RankingPotential {
    let category = difficulty_category(record.effective_competition());
    RankingPotential {
        difficulty_category: category,
        difficulty_description: category.description().to_string(),
        opportunity_rating: opportunity_rating(opportunity),
        first_page_probability: record.effective_first_page_probability(),
        recommendation: recommend(record, opportunity),
    }
}
