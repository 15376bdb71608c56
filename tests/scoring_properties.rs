//! Property sweeps over the scoring engine with seeded random records.
//! Deterministic: every test uses a fixed `StdRng` seed.

use keyword_scout::config::ScoringWeights;
use keyword_scout::keyword::{KeywordRecord, Recommendation};
use keyword_scout::scoring::{classify, keyword_difficulty, KeywordScorer, SerpSignals};
use rand::{rngs::StdRng, Rng, SeedableRng};

const ROUNDS: usize = 500;

fn random_record(rng: &mut StdRng, i: usize) -> KeywordRecord {
    let mut r = KeywordRecord::new(format!("keyword {i}"));
    if rng.random_bool(0.8) {
        r = r.volume(rng.random_range(0..2_000_000));
    }
    if rng.random_bool(0.8) {
        r = r.competition(rng.random_range(0..=120));
    }
    if rng.random_bool(0.8) {
        r = r.relevance(rng.random_range(-0.2..1.2));
    }
    if rng.random_bool(0.5) {
        r = r.brands(rng.random_range(0..10));
    }
    if rng.random_bool(0.5) {
        r = r.first_page(rng.random_range(0.0..1.0));
    }
    r.serp_features(rng.random_bool(0.3), rng.random_bool(0.3), rng.random_bool(0.3))
}

#[test]
fn weights_always_sum_to_about_one() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..ROUNDS {
        let w = ScoringWeights::new(
            rng.random_range(0.0..10.0),
            rng.random_range(0.0..10.0),
            rng.random_range(0.01..10.0),
        )
        .expect("positive weights are valid");
        // Sums within 0.01 of 1 are accepted as-is.
        assert!((w.sum() - 1.0).abs() <= 0.01 + 1e-9, "sum was {}", w.sum());
    }
}

#[test]
fn opportunity_stays_in_bounds() {
    let mut rng = StdRng::seed_from_u64(11);
    let scorer = KeywordScorer::default();
    for i in 0..ROUNDS {
        let r = random_record(&mut rng, i);
        let s = scorer.opportunity(&r);
        assert!((0.0..=100.0).contains(&s), "{s} out of range for {r:?}");
    }
}

#[test]
fn more_volume_never_scores_lower() {
    let mut rng = StdRng::seed_from_u64(13);
    let scorer = KeywordScorer::default();
    for _ in 0..ROUNDS {
        let c = rng.random_range(0..=100);
        let rel = rng.random_range(0.0..=1.0);
        let v1: u64 = rng.random_range(0..500_000);
        let v2 = v1 + rng.random_range(0..500_000);
        let a = scorer.opportunity(&KeywordRecord::new("a").volume(v1).competition(c).relevance(rel));
        let b = scorer.opportunity(&KeywordRecord::new("b").volume(v2).competition(c).relevance(rel));
        assert!(b >= a, "volume {v1}->{v2}: {a} > {b}");
    }
}

#[test]
fn more_competition_always_scores_lower() {
    let mut rng = StdRng::seed_from_u64(17);
    let scorer = KeywordScorer::default();
    for _ in 0..ROUNDS {
        let v = rng.random_range(0..100_000);
        let rel = rng.random_range(0.0..=1.0);
        let c1 = rng.random_range(0..100);
        let c2 = rng.random_range(c1 + 1..=100);
        let a = scorer.opportunity(&KeywordRecord::new("a").volume(v).competition(c1).relevance(rel));
        let b = scorer.opportunity(&KeywordRecord::new("b").volume(v).competition(c2).relevance(rel));
        assert!(a > b, "competition {c1}->{c2}: {a} <= {b}");
    }
}

#[test]
fn classification_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(19);
    let scorer = KeywordScorer::default();
    for i in 0..ROUNDS {
        let r = random_record(&mut rng, i);
        let s = scorer.opportunity(&r);
        assert_eq!(classify(&r, s), classify(&r, s));
    }
}

#[test]
fn ranking_is_sorted_dense_and_truncated() {
    let mut rng = StdRng::seed_from_u64(23);
    let scorer = KeywordScorer::default();
    for round in 0..50 {
        let n = rng.random_range(0..60);
        let top_n = rng.random_range(0..80);
        let pool: Vec<_> = (0..n).map(|i| random_record(&mut rng, round * 100 + i)).collect();
        let out = scorer.rank(pool, top_n);

        assert_eq!(out.len(), n.min(top_n));
        for w in out.windows(2) {
            assert!(w[0].opportunity_score >= w[1].opportunity_score);
        }
        let ranks: Vec<u32> = out.iter().filter_map(|k| k.rank).collect();
        let expected: Vec<u32> = (1..=out.len() as u32).collect();
        assert_eq!(ranks, expected);
    }
}

#[test]
fn equal_scores_keep_input_order() {
    let mut rng = StdRng::seed_from_u64(29);
    let scorer = KeywordScorer::default();
    // Three metric profiles, many keywords each, shuffled by construction order.
    let profiles = [(1000u64, 40u32, 0.6f64), (5000, 20, 0.9), (200, 80, 0.3)];
    let pool: Vec<_> = (0..60)
        .map(|i| {
            let (v, c, r) = profiles[rng.random_range(0..profiles.len())];
            KeywordRecord::new(format!("kw {i:02}")).volume(v).competition(c).relevance(r)
        })
        .collect();
    let input_order: Vec<String> = pool.iter().map(|r| r.keyword.clone()).collect();
    let out = scorer.rank(pool, 60);

    for pair in out.windows(2) {
        if pair[0].opportunity_score == pair[1].opportunity_score {
            let a = input_order.iter().position(|k| k == pair[0].keyword());
            let b = input_order.iter().position(|k| k == pair[1].keyword());
            assert!(a < b, "{} should precede {}", pair[0].keyword(), pair[1].keyword());
        }
    }
}

#[test]
fn reference_scenarios() {
    let scorer = KeywordScorer::default();
    let scored = scorer.annotate(
        KeywordRecord::new("remote international internship programs")
            .volume(2400)
            .competition(22)
            .relevance(0.92)
            .brands(1)
            .first_page(0.78),
    );
    assert_eq!(scored.opportunity_score, 51.56);
    assert_eq!(scored.ranking_potential.recommendation, Recommendation::QuickWin);

    let hard = SerpSignals {
        big_brands_count: 3,
        has_featured_snippet: true,
        has_knowledge_graph: true,
        has_ads: false,
        total_results: 150_000_000,
    };
    assert_eq!(keyword_difficulty(&hard), 74);

    let empty = scorer.annotate(KeywordRecord::new("nothing known"));
    assert_eq!(empty.opportunity_score, 31.26);
}
