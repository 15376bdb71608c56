// src/bin/keyword_research.rs
//! Command-line keyword research.
//!
//! ```text
//! keyword-research --seed "global internship" --limit 25 --output reports
//! ```
//!
//! Needs GROQ_API_KEY and SERP_API_KEY (env or `.env`). Trend data comes from
//! TRENDS_FIXTURE_PATH when set; otherwise volume is estimated heuristically.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use keyword_scout::collectors::{
    FixtureInterest, InterestSource, LlmExpander, SerpApiClient, TrendsEstimator,
};
use keyword_scout::config::ResearchConfig;
use keyword_scout::pipeline::Researcher;
use keyword_scout::report::{render_summary, save_report, SUMMARY_LIMIT};
use keyword_scout::scoring::KeywordScorer;
use keyword_scout::telemetry;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "keyword-research")]
#[command(about = "Expand a seed keyword, score the candidates and rank the best opportunities")]
struct Args {
    /// Seed keyword to research
    #[arg(short, long)]
    seed: String,

    /// Directory for the JSON report
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Number of keywords to return
    #[arg(short, long, default_value_t = 50)]
    limit: usize,

    /// Print results without writing a report file
    #[arg(long)]
    no_save: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "keyword research failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut cfg = ResearchConfig::from_env()?;
    cfg.max_keywords = args.limit;

    let interest = FixtureInterest::from_env()?.map(|f| Arc::new(f) as Arc<dyn InterestSource>);
    let trends = TrendsEstimator::new(interest, cfg.trends_enabled);

    let researcher = Researcher::new(
        Arc::new(LlmExpander::from_env()?),
        Arc::new(SerpApiClient::from_env()?),
        Arc::new(trends),
        KeywordScorer::from_config()?,
        cfg,
    );

    let report = researcher.research(&args.seed).await?;
    println!("{}", render_summary(&report, SUMMARY_LIMIT));

    if !args.no_save {
        let path = save_report(&report, &args.output)?;
        println!("Results saved to: {}", path.display());
    }
    Ok(())
}
