// src/config/mod.rs
//! Configuration: scoring weights (file + env) and research pipeline options (env).

pub mod research;
pub mod weights;

pub use research::ResearchConfig;
pub use weights::ScoringWeights;
