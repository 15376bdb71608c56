// src/config/weights.rs
//! Scoring weights for the opportunity formula.
//!
//! File shape (TOML or JSON, every field optional):
//! ```toml
//! volume_weight = 0.4
//! competition_weight = 0.4
//! relevance_weight = 0.2
//! ```
//!
//! Resolution order:
//! 1) file at $SCORING_WEIGHTS_PATH, else `config/scoring.toml`, else `config/scoring.json`
//! 2) per-field env overrides: VOLUME_WEIGHT, COMPETITION_WEIGHT, RELEVANCE_WEIGHT
//! 3) built-in defaults 0.4 / 0.4 / 0.2
//!
//! The resulting value is immutable. Weights that do not sum to 1.0 (within 0.01)
//! are divided by their sum at construction.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ENV_WEIGHTS_PATH: &str = "SCORING_WEIGHTS_PATH";
pub const ENV_VOLUME_WEIGHT: &str = "VOLUME_WEIGHT";
pub const ENV_COMPETITION_WEIGHT: &str = "COMPETITION_WEIGHT";
pub const ENV_RELEVANCE_WEIGHT: &str = "RELEVANCE_WEIGHT";

pub const DEFAULT_VOLUME_WEIGHT: f64 = 0.4;
pub const DEFAULT_COMPETITION_WEIGHT: f64 = 0.4;
pub const DEFAULT_RELEVANCE_WEIGHT: f64 = 0.2;

/// Allowed deviation of the raw sum from 1.0 before renormalizing.
pub const SUM_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    volume_weight: f64,
    competition_weight: f64,
    relevance_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            volume_weight: DEFAULT_VOLUME_WEIGHT,
            competition_weight: DEFAULT_COMPETITION_WEIGHT,
            relevance_weight: DEFAULT_RELEVANCE_WEIGHT,
        }
    }
}

impl ScoringWeights {
    /// Validate and normalize. Fails on negative or non-finite weights and on a zero sum.
    pub fn new(volume: f64, competition: f64, relevance: f64) -> Result<Self> {
        for (name, w) in [
            ("volume_weight", volume),
            ("competition_weight", competition),
            ("relevance_weight", relevance),
        ] {
            if !w.is_finite() {
                bail!("{name} must be a finite number, got {w}");
            }
            if w < 0.0 {
                bail!("{name} must be non-negative, got {w}");
            }
        }

        let total = volume + competition + relevance;
        if total <= f64::EPSILON {
            bail!("scoring weights sum to zero");
        }

        if (total - 1.0).abs() > SUM_TOLERANCE {
            debug!(total, "normalizing scoring weights");
            return Ok(Self {
                volume_weight: volume / total,
                competition_weight: competition / total,
                relevance_weight: relevance / total,
            });
        }

        Ok(Self {
            volume_weight: volume,
            competition_weight: competition,
            relevance_weight: relevance,
        })
    }

    pub fn volume(&self) -> f64 {
        self.volume_weight
    }

    pub fn competition(&self) -> f64 {
        self.competition_weight
    }

    pub fn relevance(&self) -> f64 {
        self.relevance_weight
    }

    pub fn sum(&self) -> f64 {
        self.volume_weight + self.competition_weight + self.relevance_weight
    }

    /// Load using file + env fallbacks (see module docs).
    pub fn load_default() -> Result<Self> {
        let file = load_weights_file_default()?;
        let from_env = |key: &str| -> Result<Option<f64>> {
            match std::env::var(key) {
                Ok(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|e| anyhow!("invalid {key}={raw:?}: {e}")),
                Err(_) => Ok(None),
            }
        };

        let volume = from_env(ENV_VOLUME_WEIGHT)?
            .or(file.volume_weight)
            .unwrap_or(DEFAULT_VOLUME_WEIGHT);
        let competition = from_env(ENV_COMPETITION_WEIGHT)?
            .or(file.competition_weight)
            .unwrap_or(DEFAULT_COMPETITION_WEIGHT);
        let relevance = from_env(ENV_RELEVANCE_WEIGHT)?
            .or(file.relevance_weight)
            .unwrap_or(DEFAULT_RELEVANCE_WEIGHT);

        let w = Self::new(volume, competition, relevance)?;
        info!(
            volume = w.volume_weight,
            competition = w.competition_weight,
            relevance = w.relevance_weight,
            "scoring weights loaded"
        );
        Ok(w)
    }
}

/// Partial weights as stored on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct WeightsFile {
    pub volume_weight: Option<f64>,
    pub competition_weight: Option<f64>,
    pub relevance_weight: Option<f64>,
}

/// Load weights from an explicit path. Supports TOML or JSON.
pub fn load_weights_from(path: &Path) -> Result<WeightsFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading scoring weights from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_weights(&content, ext.as_str())
        .with_context(|| format!("parsing scoring weights in {}", path.display()))
}

/// 1) $SCORING_WEIGHTS_PATH
/// 2) config/scoring.toml
/// 3) config/scoring.json
/// Nothing found → empty file (all defaults).
pub fn load_weights_file_default() -> Result<WeightsFile> {
    if let Ok(p) = std::env::var(ENV_WEIGHTS_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_weights_from(&pb);
        }
        bail!("{ENV_WEIGHTS_PATH} points to non-existent path");
    }
    for candidate in ["config/scoring.toml", "config/scoring.json"] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return load_weights_from(&p);
        }
    }
    Ok(WeightsFile::default())
}

fn parse_weights(s: &str, hint_ext: &str) -> Result<WeightsFile> {
    if hint_ext == "json" {
        return Ok(serde_json::from_str(s)?);
    }
    if hint_ext == "toml" {
        return Ok(toml::from_str(s)?);
    }
    // Unknown extension: sniff.
    if s.trim_start().starts_with('{') {
        Ok(serde_json::from_str(s)?)
    } else {
        Ok(toml::from_str(s)?)
    }
}
