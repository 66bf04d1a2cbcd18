//! Static phrase and pattern tables backing the scorers, plus the default
//! keyword categories the rubric starts from. Patterns run against the
//! lowercased transcript.

use crate::rubric::{KeywordCategorySpec, RubricError};
use once_cell::sync::Lazy;
use regex::Regex;

/// Greeting quality tiers, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalutationTier {
    Excellent,
    Good,
    Basic,
}

impl SalutationTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::Excellent, Self::Good, Self::Basic]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Basic => "Basic",
        }
    }
}

pub static SALUTATION_TIERS: Lazy<Vec<(SalutationTier, Vec<Regex>)>> = Lazy::new(|| {
    vec![
        (
            SalutationTier::Excellent,
            compile(&[
                r"i am excited to introduce",
                r"i'm excited",
                r"i am excited",
                r"feeling great",
            ]),
        ),
        (
            SalutationTier::Good,
            compile(&[
                r"\bgood morning\b",
                r"\bgood afternoon\b",
                r"\bgood evening\b",
                r"\bgood day\b",
                r"\bhello everyone\b",
            ]),
        ),
        (
            SalutationTier::Basic,
            compile(&[r"\bhi\b", r"\bhello\b"]),
        ),
    ]
});

pub static CLOSING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\bthank you\b",
        r"\bthanks\b",
        r"\bthankyou\b",
        r"that'?s all",
    ])
});

/// Positive/negative word lists for the heuristic sentiment fallback.
pub const POSITIVE_WORDS: &[&str] = &[
    "excited",
    "love",
    "great",
    "good",
    "happy",
    "enjoy",
    "confident",
    "passion",
    "thank",
];

pub const NEGATIVE_WORDS: &[&str] = &["hate", "bad", "boring", "sad", "nervous"];

pub fn default_filler_phrases() -> Vec<String> {
    [
        "you know",
        "i mean",
        "sort of",
        "kinda",
        "um",
        "uh",
        "like",
        "so",
        "actually",
        "basically",
        "right",
        "well",
        "okay",
        "hmm",
        "ah",
        "erm",
        "huh",
    ]
    .iter()
    .map(|phrase| phrase.to_string())
    .collect()
}

pub fn default_keyword_categories() -> Vec<KeywordCategorySpec> {
    fn category(name: &str, must_have: bool, patterns: &[&str]) -> KeywordCategorySpec {
        KeywordCategorySpec {
            name: name.to_string(),
            must_have,
            patterns: patterns.iter().map(|pattern| pattern.to_string()).collect(),
        }
    }

    vec![
        category(
            "name",
            true,
            &[
                r"\bname is\b",
                r"\bmy name\b",
                r"\bi am\b",
                r"\bmyself\b",
                r"\bthis is\b",
            ],
        ),
        category(
            "age",
            true,
            &[r"\bage\b", r"\byears old\b", r"\bi am \d+\b", r"\bi'm \d+\b"],
        ),
        category(
            "school",
            true,
            &[
                r"\bschool\b",
                r"\bstudent of\b",
                r"\bstudy in\b",
                r"\bstudying in\b",
                r"\bclass of\b",
            ],
        ),
        category(
            "class",
            true,
            &[
                r"\bclass\b",
                r"\bgrade\b",
                r"\bstandard\b",
                r"\b\d+(st|nd|rd|th)\b",
            ],
        ),
        category(
            "family",
            true,
            &[
                r"\bfamily\b",
                r"\bparents\b",
                r"\bmother\b",
                r"\bfather\b",
                r"\bbrother\b",
                r"\bsister\b",
            ],
        ),
        category(
            "hobby",
            true,
            &[
                r"\bhobby\b",
                r"\bhobbies\b",
                r"\blike to\b",
                r"\blove to\b",
                r"\benjoy\b",
                r"\bplaying\b",
                r"\bplay\b",
            ],
        ),
        category(
            "goal",
            false,
            &[
                r"\bgoal\b",
                r"\bambition\b",
                r"\bdream\b",
                r"\bwant to be\b",
                r"\bi want to\b",
            ],
        ),
        category(
            "fun_fact",
            false,
            &[
                r"\bfun fact\b",
                r"\bonce\b",
                r"\bsecret\b",
                r"\bsurprising\b",
                r"\bdon'?t know\b",
            ],
        ),
        category(
            "interest",
            false,
            &[
                r"\binterest\b",
                r"\bpassionate\b",
                r"\bfan of\b",
                r"\binterested in\b",
            ],
        ),
    ]
}

/// A keyword category with its patterns compiled, ready for scoring.
#[derive(Debug, Clone)]
pub struct CompiledCategory {
    pub name: String,
    pub must_have: bool,
    pub patterns: Vec<Regex>,
}

impl CompiledCategory {
    pub fn matches(&self, lowered: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(lowered))
    }
}

/// Compiles rubric-supplied category specs once, so invalid patterns fail
/// at load time instead of during scoring.
pub fn compile_categories(
    specs: &[KeywordCategorySpec],
) -> Result<Vec<CompiledCategory>, RubricError> {
    specs
        .iter()
        .map(|spec| {
            let patterns = spec
                .patterns
                .iter()
                .map(|pattern| {
                    Regex::new(pattern).map_err(|err| RubricError::InvalidValue {
                        field: format!("keywords.categories.{}", spec.name),
                        reason: format!("invalid pattern '{pattern}': {err}"),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CompiledCategory {
                name: spec.name.clone(),
                must_have: spec.must_have,
                patterns,
            })
        })
        .collect()
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("static lexicon pattern compiles"))
        .collect()
}
