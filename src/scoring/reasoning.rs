//! Human-readable reasoning: `"<keyword>: clause, clause, ..."`.
//!
//! One clause per populated dimension, always in this order:
//! volume, competition, brand dominance, relevance, then optional SERP features.
//! Dimensions that were never measured are skipped instead of guessed.

use crate::keyword::KeywordRecord;

/// Clause used when no dimension was populated.
pub const NOTHING_MEASURED: &str = "no metrics measured";

pub fn explain(record: &KeywordRecord) -> String {
    let mut reasons: Vec<String> = Vec::with_capacity(6);

    if let Some(volume) = record.estimated_volume {
        let band = if volume > 5000 {
            "high"
        } else if volume > 1000 {
            "moderate"
        } else {
            "low"
        };
        reasons.push(format!(
            "{band} search volume ({}/month)",
            group_thousands(volume)
        ));
    }

    if let Some(competition) = record.competition_score {
        reasons.push(
            if competition < 30 {
                "low competition"
            } else if competition < 50 {
                "moderate competition"
            } else {
                "high competition"
            }
            .to_string(),
        );
    }

    if let Some(brands) = record.big_brands_count {
        reasons.push(match brands {
            0 => "no major brands in top 10".to_string(),
            1..=2 => format!("only {brands} major brand(s) in top 10"),
            _ => format!("{brands} major brands dominating results"),
        });
    }

    if let Some(relevance) = record.relevance_score {
        reasons.push(
            if relevance >= 0.8 {
                "highly relevant to seed keyword"
            } else if relevance >= 0.6 {
                "moderately relevant"
            } else {
                "loosely related"
            }
            .to_string(),
        );
    }

    if record.has_featured_snippet {
        reasons.push("featured snippet present".to_string());
    }
    if record.has_knowledge_graph {
        reasons.push("knowledge graph present".to_string());
    }

    if reasons.is_empty() {
        return format!("{}: {NOTHING_MEASURED}", record.keyword);
    }
    format!("{}: {}", record.keyword, reasons.join(", "))
}

/// 1234567 → "1,234,567"
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_record_lists_every_dimension_in_order() {
        let r = KeywordRecord::new("remote international internship programs")
            .volume(2400)
            .competition(22)
            .relevance(0.92)
            .brands(1)
            .serp_features(true, true, false);
        assert_eq!(
            explain(&r),
            "remote international internship programs: moderate search volume (2,400/month), \
             low competition, only 1 major brand(s) in top 10, highly relevant to seed keyword, \
             featured snippet present, knowledge graph present"
        );
    }

    #[test]
    fn band_edges() {
        let r = KeywordRecord::new("k").volume(5000).competition(50).brands(3).relevance(0.6);
        assert_eq!(
            explain(&r),
            "k: moderate search volume (5,000/month), high competition, \
             3 major brands dominating results, moderately relevant"
        );
        let r = KeywordRecord::new("k").volume(1000).competition(30).brands(0).relevance(0.59);
        assert_eq!(
            explain(&r),
            "k: low search volume (1,000/month), moderate competition, \
             no major brands in top 10, loosely related"
        );
    }

    #[test]
    fn unmeasured_dimensions_are_skipped() {
        let r = KeywordRecord::new("bare").volume(12_000);
        assert_eq!(explain(&r), "bare: high search volume (12,000/month)");
    }

    #[test]
    fn record_without_metrics_has_no_dangling_separator() {
        assert_eq!(explain(&KeywordRecord::new("bare kw")), "bare kw: no metrics measured");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
