// src/collectors/serp.rs
//! SerpApi client: related searches, "people also ask", and competition analysis
//! of the top 10 organic results.
//!
//! Competition score (0..=100, higher = harder):
//! - big brands    : 10 points each, max 50
//! - SERP features : 10 points each (featured snippet/answer box, knowledge graph, ads)
//! - total results : >100M → 20, >10M → 15, >1M → 10, >100k → 5
//!
//! First-page probability starts from a base per competition band and is
//! reduced by brand and feature penalties (floor 0.05).

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{with_retries, SerpAnalysis, SerpSource};

pub const SERPAPI_URL: &str = "https://serpapi.com/search.json";

/// Domains treated as high-authority competitors.
pub const HIGH_AUTHORITY_DOMAINS: [&str; 15] = [
    "wikipedia.org",
    "amazon.com",
    "linkedin.com",
    "indeed.com",
    "glassdoor.com",
    "forbes.com",
    "nytimes.com",
    "medium.com",
    "reddit.com",
    "youtube.com",
    "stackoverflow.com",
    "github.com",
    "quora.com",
    "bbc.com",
    "cnn.com",
];

const ORGANIC_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct SerpConfig {
    pub api_key: String,
    pub location: String,
    pub language: String,
    pub country: String,
    pub endpoint: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl SerpConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("SERP_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow!("SERP API key not found. Set SERP_API_KEY environment variable."))?;
        let var_or = |k: &str, d: &str| std::env::var(k).unwrap_or_else(|_| d.to_string());
        Ok(Self {
            api_key,
            location: var_or("SERP_LOCATION", "United States"),
            language: var_or("SERP_LANGUAGE", "en"),
            country: var_or("SERP_COUNTRY", "us"),
            endpoint: var_or("SERP_ENDPOINT", SERPAPI_URL),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        })
    }
}

pub struct SerpApiClient {
    http: reqwest::Client,
    cfg: SerpConfig,
}

impl SerpApiClient {
    pub fn new(cfg: SerpConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("keyword-scout/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()
            .context("building serp http client")?;
        Ok(Self { http, cfg })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(SerpConfig::from_env()?)
    }

    async fn search_once(&self, keyword: &str, num: usize) -> Result<Value> {
        let num = num.to_string();
        let resp = self
            .http
            .get(&self.cfg.endpoint)
            .query(&[
                ("q", keyword),
                ("api_key", self.cfg.api_key.as_str()),
                ("engine", "google"),
                ("location", self.cfg.location.as_str()),
                ("gl", self.cfg.country.as_str()),
                ("hl", self.cfg.language.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .context("serp request")?
            .error_for_status()
            .context("serp status")?;
        let body: Value = resp.json().await.context("serp response body")?;
        if let Some(err) = body.get("error").and_then(Value::as_str) {
            return Err(anyhow!("serpapi error: {err}"));
        }
        Ok(body)
    }

    pub async fn search(&self, keyword: &str, num: usize) -> Result<Value> {
        with_retries(self.cfg.max_retries, self.cfg.retry_delay, "serp search", move || {
            self.search_once(keyword, num)
        })
        .await
    }
}

#[async_trait]
impl SerpSource for SerpApiClient {
    async fn related_searches(&self, keyword: &str) -> Result<Vec<String>> {
        let results = self.search(keyword, ORGANIC_LIMIT).await?;
        Ok(collect_strings(&results, "related_searches", "query"))
    }

    async fn people_also_ask(&self, keyword: &str) -> Result<Vec<String>> {
        let results = self.search(keyword, ORGANIC_LIMIT).await?;
        Ok(collect_strings(&results, "related_questions", "question")
            .into_iter()
            .map(|q| html_escape::decode_html_entities(&q).into_owned())
            .collect())
    }

    async fn analyze(&self, keyword: &str) -> Result<SerpAnalysis> {
        let results = self.search(keyword, ORGANIC_LIMIT).await?;
        let analysis = analyze_results(keyword, &results);
        debug!(
            keyword,
            competition = analysis.competition_score,
            brands = analysis.big_brands_count,
            "serp analysis"
        );
        Ok(analysis)
    }

    fn name(&self) -> &'static str {
        "serpapi"
    }
}

/// `results[list][*][field]` as strings, skipping entries without the field.
pub fn collect_strings(results: &Value, list: &str, field: &str) -> Vec<String> {
    results
        .get(list)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|it| it.get(field).and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Competition analysis of a raw SerpApi response.
pub fn analyze_results(keyword: &str, results: &Value) -> SerpAnalysis {
    let total_results = results
        .pointer("/search_information/total_results")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    let has_featured_snippet =
        results.get("featured_snippet").is_some() || results.get("answer_box").is_some();
    let has_knowledge_graph = results.get("knowledge_graph").is_some();
    let has_ads = results.get("ads").is_some() || results.get("top_ads").is_some();

    let mut domains = Vec::new();
    let mut big_brands_count = 0u32;
    if let Some(organic) = results.get("organic_results").and_then(Value::as_array) {
        for r in organic.iter().take(ORGANIC_LIMIT) {
            let domain = r
                .get("domain")
                .or_else(|| r.get("displayed_link"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if is_high_authority(&domain) {
                big_brands_count += 1;
            }
            domains.push(domain);
        }
    }

    let serp_features_count = [has_featured_snippet, has_knowledge_graph, has_ads]
        .iter()
        .filter(|f| **f)
        .count() as u32;

    let competition_score = competition_score(
        big_brands_count,
        serp_features_count,
        total_results,
    );
    let first_page_probability =
        first_page_probability(competition_score, big_brands_count, serp_features_count);

    SerpAnalysis {
        keyword: keyword.to_string(),
        competition_score,
        big_brands_count,
        has_featured_snippet,
        has_knowledge_graph,
        has_ads,
        serp_features_count,
        first_page_probability,
        total_results,
        domains,
    }
}

pub fn is_high_authority(domain: &str) -> bool {
    let d = domain.to_ascii_lowercase();
    HIGH_AUTHORITY_DOMAINS.iter().any(|auth| d.contains(auth))
}

pub fn competition_score(big_brands: u32, serp_features: u32, total_results: u64) -> u32 {
    let mut score = big_brands.saturating_mul(10).min(50);
    score += serp_features.min(3) * 10;
    score += match total_results {
        n if n > 100_000_000 => 20,
        n if n > 10_000_000 => 15,
        n if n > 1_000_000 => 10,
        n if n > 100_000 => 5,
        _ => 0,
    };
    score.min(100)
}

pub fn first_page_probability(competition: u32, big_brands: u32, serp_features: u32) -> f64 {
    let base = match competition {
        c if c < 20 => 0.85,
        c if c < 40 => 0.65,
        c if c < 60 => 0.45,
        c if c < 80 => 0.25,
        _ => 0.10,
    };
    let brand_penalty = (f64::from(big_brands) * 0.08).min(0.30);
    let feature_penalty = (f64::from(serp_features) * 0.05).min(0.20);
    let p = (base - brand_penalty - feature_penalty).max(0.05);
    (p * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> Value {
        json!({
            "search_information": { "total_results": 250_000_000u64 },
            "answer_box": { "answer": "42" },
            "knowledge_graph": { "title": "Internship" },
            "organic_results": [
                { "domain": "en.wikipedia.org" },
                { "displayed_link": "https://www.indeed.com › jobs" },
                { "domain": "smallblog.dev" },
                { "domain": "www.LinkedIn.com" }
            ],
            "related_searches": [ { "query": "global internship programs" }, { "link": "x" } ],
            "related_questions": [ { "question": "What is a global internship?" } ]
        })
    }

    #[test]
    fn analysis_counts_brands_features_and_results() {
        let a = analyze_results("global internship", &fixture());
        assert_eq!(a.big_brands_count, 3);
        assert!(a.has_featured_snippet);
        assert!(a.has_knowledge_graph);
        assert!(!a.has_ads);
        assert_eq!(a.serp_features_count, 2);
        // 30 (brands) + 20 (features) + 20 (results)
        assert_eq!(a.competition_score, 70);
        // base 0.25 - 0.24 - 0.10 → floor
        assert_eq!(a.first_page_probability, 0.05);
        assert_eq!(a.domains.len(), 4);
    }

    #[test]
    fn suggestions_are_extracted() {
        let v = fixture();
        assert_eq!(
            collect_strings(&v, "related_searches", "query"),
            vec!["global internship programs".to_string()]
        );
        assert_eq!(
            collect_strings(&v, "related_questions", "question"),
            vec!["What is a global internship?".to_string()]
        );
        assert!(collect_strings(&v, "missing", "query").is_empty());
    }

    #[test]
    fn empty_page_is_easy() {
        let a = analyze_results("obscure", &json!({}));
        assert_eq!(a.competition_score, 0);
        assert_eq!(a.first_page_probability, 0.85);
    }

    #[test]
    fn competition_caps() {
        assert_eq!(competition_score(9, 3, 500_000_000), 100);
        assert_eq!(competition_score(0, 0, 100_001), 5);
        assert_eq!(competition_score(0, 0, 100_000), 0);
    }
}
