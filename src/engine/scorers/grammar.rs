use crate::engine::analyzers::GrammarEngine;
use crate::engine::transcript::Transcript;
use crate::engine::{round2, CriterionResult};
use crate::rubric::{Criterion, GrammarConfig};
use serde_json::{json, Value};
use tracing::warn;

/// Two-path grammar criterion. The precise rule set is used when probed
/// available; any fault it raises degrades this criterion to the local
/// heuristic instead of aborting the evaluation.
pub(crate) fn score(
    transcript: &Transcript,
    config: &GrammarConfig,
    engine: &GrammarEngine,
) -> CriterionResult {
    if transcript.is_empty() {
        return CriterionResult::new(
            Criterion::Grammar,
            0.0,
            config.weight,
            json!({ "error": "empty transcript" }),
        );
    }

    let (errors, rule_details, engine_used, degraded) = match engine {
        GrammarEngine::Precise(rules) => match rules.check(transcript.raw()) {
            Ok(findings) => (
                findings.errors,
                json!({ "matched_rules": findings.messages }),
                "precise",
                false,
            ),
            Err(fault) => {
                warn!(error = %fault, "precise grammar engine faulted, substituting heuristic");
                let counts = HeuristicCounts::of(transcript);
                (counts.total(), counts.details(), "heuristic", true)
            }
        },
        GrammarEngine::Heuristic => {
            let counts = HeuristicCounts::of(transcript);
            (counts.total(), counts.details(), "heuristic", false)
        }
    };

    let errors_per_hundred = errors as f64 / transcript.word_count() as f64 * 100.0;
    let ratio = (1.0 - errors_per_hundred / config.error_rate_cap).max(0.0);

    let mut details = json!({
        "errors": errors,
        "errors_per_hundred": round2(errors_per_hundred),
        "engine": engine_used,
        "degraded": degraded,
    });
    if let (Value::Object(map), Value::Object(extra)) = (&mut details, rule_details) {
        map.extend(extra);
    }

    CriterionResult::new(
        Criterion::Grammar,
        ratio * f64::from(config.weight),
        config.weight,
        details,
    )
}

/// Deterministic local rules: sentence-initial lowercase letters, the
/// standalone pronoun "i" left lowercase, and immediately repeated words.
struct HeuristicCounts {
    sentence_case: usize,
    lowercase_i: usize,
    repeated_words: usize,
}

impl HeuristicCounts {
    fn of(transcript: &Transcript) -> Self {
        let sentence_case = transcript
            .sentences()
            .iter()
            .filter(|sentence| {
                sentence
                    .chars()
                    .next()
                    .is_some_and(|first| first.is_alphabetic() && first.is_lowercase())
            })
            .count();

        let lowercase_i = raw_tokens(transcript.raw())
            .filter(|token| *token == "i")
            .count();

        let repeated_words = transcript
            .words()
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .count();

        Self {
            sentence_case,
            lowercase_i,
            repeated_words,
        }
    }

    fn total(&self) -> usize {
        self.sentence_case + self.lowercase_i + self.repeated_words
    }

    fn details(&self) -> Value {
        json!({
            "sentence_case": self.sentence_case,
            "lowercase_i": self.lowercase_i,
            "repeated_words": self.repeated_words,
        })
    }
}

fn raw_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|token| !token.is_empty())
}
