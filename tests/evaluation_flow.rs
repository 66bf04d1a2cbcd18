use speech_eval::engine::analyzers::Analyzers;
use speech_eval::rubric::{self, RubricError};
use speech_eval::{Criterion, EvaluationEngine, RubricConfig};
use std::path::PathBuf;

const INTRODUCTION: &str = "Good morning everyone! My name is Muskan Agrawal. \
    I am fourteen years old and I study in class nine at Delhi Public School. \
    I live with my parents and my younger brother. My hobby is painting and I \
    love to read storybooks. My goal is to become a doctor and help people in \
    my village. I am excited to share my journey with all of you. Thank you.";

fn heuristic_engine() -> EvaluationEngine {
    EvaluationEngine::new(RubricConfig::default(), Analyzers::heuristic_only())
        .expect("default rubric is valid")
}

fn resource(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn rubric_with_broken_weight_sum_is_rejected() {
    let csv = "\
criterion,weight,params
salutation,5,
keyword_presence,30,
flow,5,
speech_rate,10,
grammar,10,
vocabulary,10,
filler_rate,15,
sentiment,10,
";
    let err = rubric::loader::from_reader(csv.as_bytes()).expect_err("weight sum 95 must fail");
    assert!(matches!(err, RubricError::WeightSum { actual: 95 }));
}

#[test]
fn overall_score_stays_in_range_even_for_empty_input() {
    let engine = heuristic_engine();

    let empty = engine.evaluate("", None).expect("empty input evaluates");
    assert_eq!(empty.overall_score, 0.0);
    assert_eq!(empty.word_count, 0);
    assert_eq!(empty.criteria.len(), 8);

    let full = engine
        .evaluate(INTRODUCTION, Some(0.5))
        .expect("introduction evaluates");
    assert!(full.overall_score > 0.0 && full.overall_score <= 100.0);
}

#[test]
fn evaluation_is_deterministic() {
    let engine = heuristic_engine();
    let first = engine
        .evaluate(INTRODUCTION, Some(0.5))
        .expect("first pass evaluates");
    let second = engine
        .evaluate(INTRODUCTION, Some(0.5))
        .expect("second pass evaluates");
    assert_eq!(first.overall_score, second.overall_score);
    for (a, b) in first.criteria.iter().zip(second.criteria.iter()) {
        assert_eq!(a.score, b.score);
    }
}

#[test]
fn introduction_scores_expected_criteria() {
    let engine = heuristic_engine();
    let report = engine
        .evaluate(INTRODUCTION, Some(0.5))
        .expect("introduction evaluates");

    let salutation = report
        .criterion(Criterion::Salutation)
        .expect("salutation scored");
    assert_eq!(salutation.score, 4.0);
    assert_eq!(salutation.details["label"], "Good");

    let keywords = report
        .criterion(Criterion::KeywordPresence)
        .expect("keywords scored");
    // All six mandatory categories plus the goal category.
    assert!((keywords.score - (20.0 + 10.0 / 3.0)).abs() < 1e-9);

    let pace = report
        .criterion(Criterion::SpeechRate)
        .expect("pace scored");
    // 68 words over half a minute: 136 wpm, inside the ideal band.
    assert_eq!(pace.score, 10.0);

    let filler = report
        .criterion(Criterion::FillerRate)
        .expect("filler scored");
    assert_eq!(filler.score, 15.0);

    let grammar = report
        .criterion(Criterion::Grammar)
        .expect("grammar scored");
    assert_eq!(grammar.score, 10.0);
}

#[test]
fn short_introduction_without_duration_still_scores_sensibly() {
    let engine = heuristic_engine();
    let report = engine
        .evaluate(
            "Hello everyone, myself Muskan, studying in class 8th B section from \
             Christ Public School. I am 13 years old. Thank you for listening.",
            None,
        )
        .expect("short introduction evaluates");

    let salutation = report
        .criterion(Criterion::Salutation)
        .expect("salutation scored");
    assert!(salutation.score > 0.0);

    let keywords = report
        .criterion(Criterion::KeywordPresence)
        .expect("keywords scored");
    let found = keywords.details["found_must"]
        .as_array()
        .expect("found_must is an array")
        .clone();
    for expected in ["name", "age", "school", "class"] {
        assert!(
            found.iter().any(|value| value == expected),
            "expected {expected} to be detected"
        );
    }

    assert!(report.overall_score > 0.0 && report.overall_score < 100.0);
}

#[test]
fn sloppy_transcript_is_caught_by_the_heuristic_grammar_engine() {
    let engine = heuristic_engine();
    let report = engine
        .evaluate("the the cat sat. i am happy.", None)
        .expect("sloppy transcript evaluates");

    let grammar = report
        .criterion(Criterion::Grammar)
        .expect("grammar scored");
    assert_eq!(grammar.details["engine"], "heuristic");
    assert_eq!(grammar.details["repeated_words"], 1);
    assert_eq!(grammar.details["lowercase_i"], 1);
    assert_eq!(grammar.details["sentence_case"], 2);
    assert_eq!(grammar.score, 0.0);
}

#[test]
fn missing_duration_zeroes_only_the_pace_criterion() {
    let engine = heuristic_engine();
    let report = engine
        .evaluate(INTRODUCTION, None)
        .expect("introduction evaluates without duration");

    let pace = report
        .criterion(Criterion::SpeechRate)
        .expect("pace scored");
    assert_eq!(pace.score, 0.0);
    assert_eq!(pace.details["error"], "duration unavailable");

    let keywords = report
        .criterion(Criterion::KeywordPresence)
        .expect("keywords scored");
    assert!(keywords.score > 0.0);
}

#[test]
fn unique_vocabulary_reaches_the_top_band() {
    let engine = heuristic_engine();
    let report = engine
        .evaluate("Every single token here appears exactly once today", None)
        .expect("unique-word transcript evaluates");

    let vocabulary = report
        .criterion(Criterion::Vocabulary)
        .expect("vocabulary scored");
    assert_eq!(vocabulary.score, 10.0);
}

#[test]
fn bundled_resources_enable_the_precise_engines() {
    use speech_eval::config::EngineResources;

    let resources = EngineResources {
        grammar_rules: Some(resource("data/grammar_rules.tsv")),
        sentiment_lexicon: Some(resource("data/sentiment_lexicon.tsv")),
    };
    let analyzers = Analyzers::probe(&resources);
    assert_eq!(analyzers.grammar.kind(), "precise");
    assert_eq!(analyzers.sentiment.kind(), "precise");

    let engine = EvaluationEngine::new(RubricConfig::default(), analyzers)
        .expect("default rubric is valid");
    let report = engine
        .evaluate(INTRODUCTION, Some(0.5))
        .expect("introduction evaluates");

    let grammar = report
        .criterion(Criterion::Grammar)
        .expect("grammar scored");
    assert_eq!(grammar.details["engine"], "precise");
    assert_eq!(grammar.details["degraded"], false);

    let sentiment = report
        .criterion(Criterion::Sentiment)
        .expect("sentiment scored");
    assert_eq!(sentiment.details["engine"], "precise");
    assert!(sentiment.score > 0.0);
}

#[test]
fn bundled_rubric_table_matches_the_builtin_defaults() {
    let loaded = rubric::loader::from_path(resource("rubric/rubric.csv"))
        .expect("bundled rubric table loads");
    let defaults = RubricConfig::default();
    for criterion in Criterion::ordered() {
        assert_eq!(loaded.weight_of(criterion), defaults.weight_of(criterion));
    }
    assert_eq!(loaded.speech_rate.ideal_min_wpm, 111.0);
    assert_eq!(loaded.speech_rate.fast_max_wpm, 161.0);
}
