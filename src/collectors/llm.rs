// src/collectors/llm.rs
//! LLM keyword expansion + relevance rating over an OpenAI-compatible
//! Chat Completions API (Groq by default).
//!
//! Env:
//! - GROQ_API_KEY   (required)
//! - LLM_BASE_URL   default https://api.groq.com/openai/v1
//! - LLM_MODEL      default llama-3.1-70b-versatile

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, warn};

use super::{strip_code_fence, with_retries, KeywordExpander};
use crate::keyword::DEFAULT_RELEVANCE;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-70b-versatile";

/// Reply that parsed as neither number nor JSON.
const UNPARSABLE_RELEVANCE: f64 = 0.6;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl LlmConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| anyhow!("Groq API key not found. Set GROQ_API_KEY environment variable."))?;
        if api_key.trim().is_empty() {
            bail!("GROQ_API_KEY is empty");
        }
        Ok(Self {
            api_key,
            base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        })
    }
}

pub struct LlmExpander {
    http: reqwest::Client,
    cfg: LlmConfig,
}

impl LlmExpander {
    pub fn new(cfg: LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("keyword-scout/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(60))
            .build()
            .context("building llm http client")?;
        Ok(Self { http, cfg })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(LlmConfig::from_env()?)
    }

    async fn chat(&self, system: &str, user: &str, temperature: f32, max_tokens: u32) -> Result<String> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let req = Req {
            model: &self.cfg.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
        };

        let url = format!("{}/chat/completions", self.cfg.base_url.trim_end_matches('/'));
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.cfg.api_key)
            .json(&req)
            .send()
            .await
            .context("llm request")?
            .error_for_status()
            .context("llm status")?;
        let body: Resp = resp.json().await.context("llm response body")?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("llm returned no choices"))?;
        Ok(content.trim().to_string())
    }

    async fn relevance_one(&self, seed: &str, candidate: &str) -> f64 {
        let prompt = format!(
            "Rate the semantic relevance between these two keywords on a scale of 0.0 to 1.0:\n\n\
             Seed keyword: \"{seed}\"\nCandidate keyword: \"{candidate}\"\n\n\
             Consider:\n- Topic similarity\n- Search intent alignment\n- Semantic relationship\n\n\
             Return ONLY a decimal number between 0.0 and 1.0, nothing else.\n\
             Examples: 0.95, 0.72, 0.43\n\nYour rating:"
        );
        match self
            .chat(
                "You are a semantic analysis expert. Return only a decimal number.",
                &prompt,
                0.3,
                10,
            )
            .await
        {
            Ok(content) => parse_single_score(&content),
            Err(e) => {
                warn!(error = ?e, candidate, "relevance call failed");
                DEFAULT_RELEVANCE
            }
        }
    }
}

#[async_trait]
impl KeywordExpander for LlmExpander {
    async fn expand(&self, seed: &str, count: usize) -> Result<Vec<String>> {
        let prompt_owned = expansion_prompt(seed, count);
        let prompt = prompt_owned.as_str();
        let content = with_retries(
            self.cfg.max_retries,
            self.cfg.retry_delay,
            "keyword expansion",
            move || {
                self.chat(
                    "You are an SEO expert specializing in keyword research. Return only valid JSON.",
                    prompt,
                    0.7,
                    2000,
                )
            },
        )
        .await?;
        let out = parse_keyword_list(&content, count);
        debug!(seed, requested = count, got = out.len(), "llm expansion");
        Ok(out)
    }

    async fn relevance(&self, seed: &str, candidates: &[String]) -> Result<HashMap<String, f64>> {
        if candidates.is_empty() {
            return Ok(HashMap::new());
        }
        let listed = candidates
            .iter()
            .enumerate()
            .map(|(i, kw)| format!("{}. {kw}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Rate the semantic relevance of each keyword to the seed keyword.\n\
             Return scores as a JSON object where each keyword maps to a score (0.0 to 1.0).\n\n\
             Seed keyword: \"{seed}\"\n\nCandidate keywords:\n{listed}\n\n\
             Return format:\n{{\n  \"keyword 1\": 0.85,\n  \"keyword 2\": 0.72,\n  ...\n}}\n\n\
             Your ratings:"
        );

        let batch = self
            .chat(
                "You are a semantic analysis expert. Return only valid JSON.",
                &prompt,
                0.3,
                1000,
            )
            .await
            .and_then(|content| parse_relevance_map(&content, candidates));

        match batch {
            Ok(scores) => Ok(scores),
            Err(e) => {
                // One call per keyword instead.
                warn!(error = ?e, n = candidates.len(), "batch relevance failed, rating individually");
                let mut scores = HashMap::with_capacity(candidates.len());
                for kw in candidates {
                    let s = self.relevance_one(seed, kw).await;
                    scores.insert(kw.clone(), s);
                }
                Ok(scores)
            }
        }
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

fn expansion_prompt(seed: &str, count: usize) -> String {
    format!(
        "You are an SEO expert. Generate {count} keyword variations for the seed keyword: \"{seed}\"\n\n\
         Requirements:\n\
         1. Mix of short-tail (2-3 words) and long-tail (4+ words) keywords\n\
         2. Include question-based keywords (how, what, why, where, when)\n\
         3. Include commercial intent keywords (best, top, review, comparison)\n\
         4. Include informational keywords (guide, tutorial, tips, learn)\n\
         5. All keywords must be relevant to the seed keyword\n\
         6. No duplicates\n\
         7. Return ONLY a JSON array of strings\n\n\
         Example format:\n[\"keyword 1\", \"keyword 2\", \"keyword 3\"]\n\n\
         Generate the keywords now:"
    )
}

/// JSON array of strings → lowercase, trimmed, deduplicated, at most `count`.
/// Non-JSON replies fall back to line extraction.
pub fn parse_keyword_list(content: &str, count: usize) -> Vec<String> {
    let body = strip_code_fence(content);
    match serde_json::from_str::<Vec<serde_json::Value>>(body) {
        Ok(items) => {
            let mut seen = HashSet::new();
            items
                .into_iter()
                .filter_map(|v| v.as_str().map(|s| s.trim().to_lowercase()))
                .filter(|s| !s.is_empty())
                .filter(|s| seen.insert(s.clone()))
                .take(count)
                .collect()
        }
        Err(_) => extract_keywords_from_text(body).into_iter().take(count).collect(),
    }
}

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*•]\s+|\d+[.)]\s+)").expect("list marker regex"));

/// One keyword per line; list markers and quotes removed; lines of ≤3 chars dropped.
pub fn extract_keywords_from_text(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            let line = LIST_MARKER.replace(line.trim(), "");
            line.trim_matches(|c: char| c == '"' || c == '\'' || c == ',')
                .trim()
                .to_lowercase()
        })
        .filter(|line| line.chars().count() > 3)
        .collect()
}

/// JSON object keyword → score. Missing keywords get the neutral default;
/// values are clamped to [0,1].
pub fn parse_relevance_map(content: &str, candidates: &[String]) -> Result<HashMap<String, f64>> {
    let body = strip_code_fence(content);
    let raw: HashMap<String, serde_json::Value> =
        serde_json::from_str(body).context("parsing relevance json")?;
    let mut out = HashMap::with_capacity(candidates.len());
    for kw in candidates {
        let score = match raw.get(kw) {
            None => DEFAULT_RELEVANCE,
            Some(v) => v
                .as_f64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
                .ok_or_else(|| anyhow!("non-numeric relevance for {kw:?}"))?,
        };
        out.insert(kw.clone(), score.clamp(0.0, 1.0));
    }
    Ok(out)
}

pub fn parse_single_score(content: &str) -> f64 {
    match content.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => UNPARSABLE_RELEVANCE,
    }
}
