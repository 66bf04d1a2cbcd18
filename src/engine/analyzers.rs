//! Fallback strategy layer for the grammar and sentiment criteria.
//!
//! Each analyzer is a capability with two variants: a precise engine backed
//! by an on-disk resource, and a built-in heuristic that never fails. The
//! probe runs once at startup; a missing or unreadable resource degrades the
//! capability instead of failing the process. A fault raised by a precise
//! engine during scoring is absorbed by the calling scorer, which substitutes
//! the heuristic for that criterion only.

use crate::config::EngineResources;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Resource problems found while probing. Never fatal; they only downgrade
/// the capability to its heuristic.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("failed to read analyzer resource")]
    Io(#[from] std::io::Error),
    #[error("line {line}: invalid rule pattern '{pattern}': {source}")]
    Pattern {
        line: usize,
        pattern: String,
        source: regex::Error,
    },
    #[error("line {line}: invalid valence '{value}'")]
    Valence { line: usize, value: String },
    #[error("line {line}: expected '<entry>\\t<value>'")]
    Malformed { line: usize },
}

/// Fault raised by a precise engine mid-evaluation.
#[derive(Debug, Error)]
pub enum AnalyzerFault {
    #[error("grammar rule set contains no rules")]
    EmptyRuleSet,
    #[error("sentiment lexicon contains no entries")]
    EmptyLexicon,
}

#[derive(Debug)]
struct GrammarRule {
    pattern: Regex,
    message: String,
}

/// What a precise grammar pass found: the total error count and the
/// messages of the rules that fired, for diagnostic detail.
#[derive(Debug)]
pub struct GrammarFindings {
    pub errors: usize,
    pub messages: Vec<String>,
}

/// Precise grammar checker: a list of tab-separated `pattern<TAB>message`
/// rules applied to the raw transcript.
#[derive(Debug)]
pub struct GrammarRuleSet {
    rules: Vec<GrammarRule>,
}

impl GrammarRuleSet {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AnalyzerError> {
        Self::from_str(&fs::read_to_string(path)?)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(source: &str) -> Result<Self, AnalyzerError> {
        let mut rules = Vec::new();
        for (index, raw_line) in source.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_number = index + 1;
            let (pattern, message) = line
                .split_once('\t')
                .ok_or(AnalyzerError::Malformed { line: line_number })?;
            let pattern = Regex::new(pattern.trim()).map_err(|source| AnalyzerError::Pattern {
                line: line_number,
                pattern: pattern.trim().to_string(),
                source,
            })?;
            rules.push(GrammarRule {
                pattern,
                message: message.trim().to_string(),
            });
        }
        Ok(Self { rules })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Applies every rule to the text, totalling matches.
    pub fn check(&self, text: &str) -> Result<GrammarFindings, AnalyzerFault> {
        if self.rules.is_empty() {
            return Err(AnalyzerFault::EmptyRuleSet);
        }
        let mut errors = 0;
        let mut messages = Vec::new();
        for rule in &self.rules {
            let count = rule.pattern.find_iter(text).count();
            if count > 0 {
                errors += count;
                messages.push(rule.message.clone());
            }
        }
        Ok(GrammarFindings { errors, messages })
    }
}

/// Precise sentiment analyzer: per-token valences summed and normalized to
/// a compound polarity score in [-1, 1].
#[derive(Debug)]
pub struct PolarityLexicon {
    valences: HashMap<String, f64>,
}

impl PolarityLexicon {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AnalyzerError> {
        Self::from_str(&fs::read_to_string(path)?)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(source: &str) -> Result<Self, AnalyzerError> {
        let mut valences = HashMap::new();
        for (index, raw_line) in source.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_number = index + 1;
            let (token, value) = line
                .split_once('\t')
                .ok_or(AnalyzerError::Malformed { line: line_number })?;
            let valence: f64 = value.trim().parse().map_err(|_| AnalyzerError::Valence {
                line: line_number,
                value: value.trim().to_string(),
            })?;
            valences.insert(token.trim().to_lowercase(), valence);
        }
        Ok(Self { valences })
    }

    pub fn entry_count(&self) -> usize {
        self.valences.len()
    }

    /// Compound polarity over the given lowercased tokens, normalized as
    /// `s / sqrt(s^2 + 15)` so any valence sum lands in [-1, 1].
    pub fn compound(&self, words: &[String]) -> Result<f64, AnalyzerFault> {
        if self.valences.is_empty() {
            return Err(AnalyzerFault::EmptyLexicon);
        }
        let sum: f64 = words
            .iter()
            .filter_map(|word| self.valences.get(word.as_str()))
            .sum();
        Ok(sum / (sum * sum + 15.0).sqrt())
    }
}

#[derive(Debug)]
pub enum GrammarEngine {
    Precise(GrammarRuleSet),
    Heuristic,
}

impl GrammarEngine {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Precise(_) => "precise",
            Self::Heuristic => "heuristic",
        }
    }
}

#[derive(Debug)]
pub enum SentimentEngine {
    Precise(PolarityLexicon),
    Heuristic,
}

impl SentimentEngine {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Precise(_) => "precise",
            Self::Heuristic => "heuristic",
        }
    }
}

/// The analyzer capabilities selected for the lifetime of the process.
#[derive(Debug)]
pub struct Analyzers {
    pub grammar: GrammarEngine,
    pub sentiment: SentimentEngine,
}

impl Analyzers {
    /// Probes the configured resources once. Absence of a precise engine is
    /// never an error; the capability degrades to its heuristic.
    pub fn probe(resources: &EngineResources) -> Self {
        let grammar = match &resources.grammar_rules {
            Some(path) => match GrammarRuleSet::from_path(path) {
                Ok(rules) => {
                    info!(path = %path.display(), rules = rules.rule_count(), "precise grammar engine available");
                    GrammarEngine::Precise(rules)
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "grammar rules unavailable, using heuristic");
                    GrammarEngine::Heuristic
                }
            },
            None => {
                info!("no grammar rules configured, using heuristic");
                GrammarEngine::Heuristic
            }
        };

        let sentiment = match &resources.sentiment_lexicon {
            Some(path) => match PolarityLexicon::from_path(path) {
                Ok(lexicon) => {
                    info!(path = %path.display(), entries = lexicon.entry_count(), "precise sentiment engine available");
                    SentimentEngine::Precise(lexicon)
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "sentiment lexicon unavailable, using heuristic");
                    SentimentEngine::Heuristic
                }
            },
            None => {
                info!("no sentiment lexicon configured, using heuristic");
                SentimentEngine::Heuristic
            }
        };

        Self { grammar, sentiment }
    }

    /// Forces both capabilities onto their fallback path.
    pub fn heuristic_only() -> Self {
        Self {
            grammar: GrammarEngine::Heuristic,
            sentiment: SentimentEngine::Heuristic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn parses_grammar_rules_and_counts_matches() {
        let rules = GrammarRuleSet::from_str(
            "# comment line\n\\bdont\\b\tmissing apostrophe\n(?i)\\bme and him\\b\tcase of pronoun\n",
        )
        .expect("rule file parses");
        assert_eq!(rules.rule_count(), 2);
        let findings = rules
            .check("I dont know. Me and him went home. dont ask.")
            .expect("rule set has rules");
        assert_eq!(findings.errors, 3);
        assert_eq!(findings.messages.len(), 2);
    }

    #[test]
    fn rejects_malformed_rule_lines() {
        let err = GrammarRuleSet::from_str("no tab separator here").expect_err("must fail");
        assert!(matches!(err, AnalyzerError::Malformed { line: 1 }));
    }

    #[test]
    fn empty_rule_set_faults_instead_of_scoring() {
        let rules = GrammarRuleSet::from_str("# only comments\n").expect("parses");
        assert!(matches!(
            rules.check("anything"),
            Err(AnalyzerFault::EmptyRuleSet)
        ));
    }

    #[test]
    fn lexicon_compound_is_bounded_and_signed() {
        let lexicon = PolarityLexicon::from_str("great\t3.1\nhappy\t2.7\nsad\t-2.1\n")
            .expect("lexicon parses");
        let positive = lexicon
            .compound(&words("great happy day"))
            .expect("lexicon has entries");
        assert!(positive > 0.5 && positive < 1.0);

        let negative = lexicon.compound(&words("sad sad sad")).expect("has entries");
        assert!(negative < 0.0 && negative > -1.0);

        let neutral = lexicon.compound(&words("completely unknown words")).expect("has entries");
        assert_eq!(neutral, 0.0);
    }

    #[test]
    fn probe_without_resources_selects_heuristics() {
        let analyzers = Analyzers::probe(&EngineResources::default());
        assert_eq!(analyzers.grammar.kind(), "heuristic");
        assert_eq!(analyzers.sentiment.kind(), "heuristic");
    }

    #[test]
    fn probe_with_missing_file_degrades_gracefully() {
        let resources = EngineResources {
            grammar_rules: Some("does/not/exist.tsv".into()),
            sentiment_lexicon: Some("does/not/exist.tsv".into()),
        };
        let analyzers = Analyzers::probe(&resources);
        assert_eq!(analyzers.grammar.kind(), "heuristic");
        assert_eq!(analyzers.sentiment.kind(), "heuristic");
    }
}
