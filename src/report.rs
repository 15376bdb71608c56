// src/report.rs
//! Research report output: pretty JSON file + plain-text console summary.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::pipeline::ResearchReport;
use crate::scoring::reasoning::group_thousands;

pub const SUMMARY_LIMIT: usize = 10;

/// `keywords_<seed>_<YYYYmmdd_HHMMSS>.json`, spaces in the seed replaced by `_`.
pub fn report_file_name(report: &ResearchReport) -> String {
    let seed = report.seed_keyword.trim().replace(' ', "_");
    let ts = report.generated_at.format("%Y%m%d_%H%M%S");
    format!("keywords_{seed}_{ts}.json")
}

/// Write the report as pretty JSON under `dir` (created if missing).
pub fn save_report(report: &ResearchReport, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output dir {}", dir.display()))?;
    let path = dir.join(report_file_name(report));
    let json = serde_json::to_string_pretty(report).context("serializing report")?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "report saved");
    Ok(path)
}

pub fn render_summary(report: &ResearchReport, limit: usize) -> String {
    let rule = "=".repeat(80);
    let thin = "-".repeat(80);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "KEYWORD RESEARCH RESULTS: {}", report.seed_keyword);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Execution time: {:.2}s", report.execution_time_seconds);
    let _ = writeln!(out, "Total keywords analyzed: {}", report.total_keywords_analyzed);
    let _ = writeln!(
        out,
        "After relevance filter: {}",
        report.keywords_after_relevance_filter
    );
    let _ = writeln!(out, "Top keywords returned: {}", report.top_keywords_count);
    let _ = writeln!(out, "{rule}");

    let shown = report.top_keywords.len().min(limit);
    if shown > 0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "TOP {shown} KEYWORDS:");
        let _ = writeln!(out, "{thin}");
    }

    for (i, kw) in report.top_keywords.iter().take(limit).enumerate() {
        let rank = kw.rank.unwrap_or((i + 1) as u32);
        let rp = &kw.ranking_potential;
        let r = &kw.record;
        let _ = writeln!(out);
        let _ = writeln!(out, "{rank}. {}", kw.keyword().to_uppercase());
        let _ = writeln!(out, "   Opportunity Score: {:.1}/100", kw.opportunity_score);
        let _ = writeln!(
            out,
            "   Competition: {}/100 ({})",
            r.effective_competition(),
            rp.difficulty_category.as_str()
        );
        let _ = writeln!(
            out,
            "   Est. Volume: {}/month",
            group_thousands(r.effective_volume())
        );
        let _ = writeln!(out, "   Relevance: {:.0}%", r.effective_relevance() * 100.0);
        let _ = writeln!(
            out,
            "   First Page Probability: {:.0}%",
            rp.first_page_probability * 100.0
        );
        let _ = writeln!(out, "   {}", rp.recommendation.message());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{rule}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyword::KeywordRecord;
    use crate::pipeline::ReportConfiguration;
    use crate::scoring::KeywordScorer;
    use chrono::TimeZone;

    fn report() -> ResearchReport {
        let scorer = KeywordScorer::default();
        let top = scorer.rank_with_reasoning(
            vec![
                KeywordRecord::new("remote international internship programs")
                    .volume(2400)
                    .competition(22)
                    .relevance(0.92)
                    .brands(1)
                    .first_page(0.78),
                KeywordRecord::new("internship abroad").volume(12000).competition(80),
            ],
            50,
        );
        ResearchReport {
            seed_keyword: "global internship".into(),
            generated_at: chrono::Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap(),
            execution_time_seconds: 12.34,
            total_keywords_analyzed: 40,
            keywords_after_relevance_filter: 2,
            top_keywords_count: top.len(),
            configuration: ReportConfiguration {
                max_keywords: 50,
                min_relevance_score: 0.5,
                volume_weight: 0.4,
                competition_weight: 0.4,
                relevance_weight: 0.2,
            },
            top_keywords: top,
        }
    }

    #[test]
    fn file_name_uses_seed_and_timestamp() {
        assert_eq!(
            report_file_name(&report()),
            "keywords_global_internship_20240501_093005.json"
        );
    }

    #[test]
    fn saves_pretty_json_with_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested/output");
        let path = save_report(&report(), &out_dir).unwrap();
        assert!(path.starts_with(&out_dir));

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("✅ Quick Win"));
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["seed_keyword"], "global internship");
        assert_eq!(v["top_keywords_count"], 2);
        assert_eq!(v["configuration"]["volume_weight"], 0.4);
        assert_eq!(v["top_keywords"][0]["rank"], 1);
        assert_eq!(v["top_keywords"][0]["opportunity_score"], 51.56);
    }

    #[test]
    fn summary_lists_top_entries() {
        let s = render_summary(&report(), SUMMARY_LIMIT);
        assert!(s.contains("KEYWORD RESEARCH RESULTS: global internship"));
        assert!(s.contains("TOP 2 KEYWORDS:"));
        assert!(s.contains("1. REMOTE INTERNATIONAL INTERNSHIP PROGRAMS"));
        assert!(s.contains("Opportunity Score: 51.6/100"));
        assert!(s.contains("Competition: 22/100 (Low)"));
        assert!(s.contains("Est. Volume: 2,400/month"));
        assert!(s.contains("Relevance: 92%"));
        assert!(s.contains("First Page Probability: 78%"));

        let one = render_summary(&report(), 1);
        assert!(one.contains("TOP 1 KEYWORDS:"));
        assert!(!one.contains("INTERNSHIP ABROAD"));
    }
}
