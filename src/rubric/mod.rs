pub mod loader;

use crate::engine::lexicon;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The eight rubric criteria, in declaration order. Report rows follow this
/// order so breakdowns render reproducibly regardless of scoring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Salutation,
    KeywordPresence,
    Flow,
    SpeechRate,
    Grammar,
    Vocabulary,
    FillerRate,
    Sentiment,
}

impl Criterion {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Salutation,
            Self::KeywordPresence,
            Self::Flow,
            Self::SpeechRate,
            Self::Grammar,
            Self::Vocabulary,
            Self::FillerRate,
            Self::Sentiment,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Salutation => "Salutation",
            Self::KeywordPresence => "Keyword Presence",
            Self::Flow => "Flow (Order)",
            Self::SpeechRate => "Speech Rate (WPM)",
            Self::Grammar => "Grammar",
            Self::Vocabulary => "Vocabulary (TTR)",
            Self::FillerRate => "Filler Rate",
            Self::Sentiment => "Sentiment",
        }
    }

    /// Resolves a rubric-source row name. Accepts a few spellings so the
    /// spreadsheet does not have to match enum names exactly.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key
            .trim()
            .to_ascii_lowercase()
            .replace([' ', '-'], "_");
        match normalized.as_str() {
            "salutation" | "greeting" => Some(Self::Salutation),
            "keyword_presence" | "keywords" => Some(Self::KeywordPresence),
            "flow" | "flow_order" => Some(Self::Flow),
            "speech_rate" | "wpm" => Some(Self::SpeechRate),
            "grammar" => Some(Self::Grammar),
            "vocabulary" | "ttr" => Some(Self::Vocabulary),
            "filler_rate" | "filler" | "filler_words" => Some(Self::FillerRate),
            "sentiment" => Some(Self::Sentiment),
            _ => None,
        }
    }
}

/// Lower-inclusive numeric band: a value belongs to the first band whose
/// `min` it reaches, bands sorted descending by `min`. The ratio is a
/// fraction of the criterion weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub ratio: f64,
}

impl Band {
    pub const fn new(min: f64, ratio: f64) -> Self {
        Self { min, ratio }
    }
}

/// First band whose lower bound the value reaches; `below_ratio` when the
/// value falls under every band. Upper bounds are implied by the band above,
/// keeping every boundary lower-inclusive/upper-exclusive.
pub fn classify(bands: &[Band], value: f64, below_ratio: f64) -> f64 {
    for band in bands {
        if value >= band.min {
            return band.ratio;
        }
    }
    below_ratio
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalutationConfig {
    pub weight: u32,
    /// Only the opening of the transcript counts as a greeting.
    pub window_words: usize,
    pub excellent_ratio: f64,
    pub good_ratio: f64,
    pub basic_ratio: f64,
}

impl Default for SalutationConfig {
    fn default() -> Self {
        Self {
            weight: 5,
            window_words: 40,
            excellent_ratio: 1.0,
            good_ratio: 0.8,
            basic_ratio: 0.4,
        }
    }
}

/// A named group of semantically equivalent phrases, graded mandatory or
/// bonus. Patterns are regex source strings, compiled once by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCategorySpec {
    pub name: String,
    pub must_have: bool,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub weight: u32,
    /// Points carried by the mandatory categories as a block.
    pub must_points: f64,
    /// Points carried by the optional categories as a block.
    pub optional_points: f64,
    pub categories: Vec<KeywordCategorySpec>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            weight: 30,
            must_points: 20.0,
            optional_points: 10.0,
            categories: lexicon::default_keyword_categories(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub weight: u32,
    /// Category names contributing to the "basic details" phase.
    pub basic_categories: Vec<String>,
    /// Category names contributing to the "optional details" phase.
    pub detail_categories: Vec<String>,
    /// Credit granted when the text is too short to order but basic
    /// details are present.
    pub short_text_ratio: f64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            weight: 5,
            basic_categories: vec![
                "name".to_string(),
                "age".to_string(),
                "class".to_string(),
                "school".to_string(),
            ],
            detail_categories: vec![
                "hobby".to_string(),
                "interest".to_string(),
                "goal".to_string(),
                "fun_fact".to_string(),
            ],
            short_text_ratio: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechRateConfig {
    pub weight: u32,
    pub ideal_min_wpm: f64,
    pub ideal_max_wpm: f64,
    pub slow_min_wpm: f64,
    pub fast_max_wpm: f64,
    pub mid_ratio: f64,
    pub low_ratio: f64,
}

impl Default for SpeechRateConfig {
    fn default() -> Self {
        Self {
            weight: 10,
            ideal_min_wpm: 111.0,
            ideal_max_wpm: 141.0,
            slow_min_wpm: 81.0,
            fast_max_wpm: 161.0,
            mid_ratio: 0.6,
            low_ratio: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    pub weight: u32,
    /// Errors per hundred words at which the score bottoms out.
    pub error_rate_cap: f64,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            weight: 10,
            error_rate_cap: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub weight: u32,
    /// Type-token ratio bands, descending by `min`.
    pub bands: Vec<Band>,
    pub floor_ratio: f64,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            weight: 10,
            bands: vec![
                Band::new(0.9, 1.0),
                Band::new(0.7, 0.8),
                Band::new(0.5, 0.6),
                Band::new(0.3, 0.4),
            ],
            floor_ratio: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillerConfig {
    pub weight: u32,
    /// Filler phrases; multi-word entries are matched before single words.
    pub phrases: Vec<String>,
    /// Filler-rate bands over percent of words, descending by `min`.
    /// Higher rates land in lower-ratio bands.
    pub bands: Vec<Band>,
    /// Ratio granted below every band (the cleanest speech).
    pub clean_ratio: f64,
}

impl Default for FillerConfig {
    fn default() -> Self {
        Self {
            weight: 15,
            phrases: lexicon::default_filler_phrases(),
            bands: vec![
                Band::new(12.0, 0.2),
                Band::new(9.0, 0.4),
                Band::new(6.0, 0.6),
                Band::new(3.0, 0.8),
            ],
            clean_ratio: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub weight: u32,
    /// Compound-score bands in [-1, 1], descending by `min`.
    pub bands: Vec<Band>,
    pub floor_ratio: f64,
    /// Scales the heuristic positive-word ratio onto the compound range.
    pub heuristic_scale: f64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            weight: 15,
            bands: vec![
                Band::new(0.5, 1.0),
                Band::new(0.3, 0.8),
                Band::new(0.1, 0.6),
                Band::new(-0.1, 0.4),
            ],
            floor_ratio: 0.2,
            heuristic_scale: 10.0,
        }
    }
}

/// The full rubric: per-criterion weight plus tunable thresholds and
/// keyword lists. Loaded once and treated as immutable during scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RubricConfig {
    pub salutation: SalutationConfig,
    pub keywords: KeywordConfig,
    pub flow: FlowConfig,
    pub speech_rate: SpeechRateConfig,
    pub grammar: GrammarConfig,
    pub vocabulary: VocabularyConfig,
    pub filler: FillerConfig,
    pub sentiment: SentimentConfig,
}

impl RubricConfig {
    pub fn weight_of(&self, criterion: Criterion) -> u32 {
        match criterion {
            Criterion::Salutation => self.salutation.weight,
            Criterion::KeywordPresence => self.keywords.weight,
            Criterion::Flow => self.flow.weight,
            Criterion::SpeechRate => self.speech_rate.weight,
            Criterion::Grammar => self.grammar.weight,
            Criterion::Vocabulary => self.vocabulary.weight,
            Criterion::FillerRate => self.filler.weight,
            Criterion::Sentiment => self.sentiment.weight,
        }
    }

    pub(crate) fn set_weight(&mut self, criterion: Criterion, weight: u32) {
        match criterion {
            Criterion::Salutation => self.salutation.weight = weight,
            Criterion::KeywordPresence => self.keywords.weight = weight,
            Criterion::Flow => self.flow.weight = weight,
            Criterion::SpeechRate => self.speech_rate.weight = weight,
            Criterion::Grammar => self.grammar.weight = weight,
            Criterion::Vocabulary => self.vocabulary.weight = weight,
            Criterion::FillerRate => self.filler.weight = weight,
            Criterion::Sentiment => self.sentiment.weight = weight,
        }
    }

    /// Fails fast on nonsensical rubrics: wrong weight sum, empty or
    /// unordered band tables, degenerate thresholds.
    pub fn validate(&self) -> Result<(), RubricError> {
        let total: u32 = Criterion::ordered()
            .iter()
            .map(|criterion| self.weight_of(*criterion))
            .sum();
        if total != 100 {
            return Err(RubricError::WeightSum { actual: total });
        }

        if self.salutation.window_words == 0 {
            return Err(RubricError::InvalidValue {
                field: "salutation.window_words".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.keywords.categories.is_empty() {
            return Err(RubricError::MissingParameter {
                criterion: "keyword_presence",
                parameter: "categories",
            });
        }
        if self.keywords.must_points < 0.0 || self.keywords.optional_points < 0.0 {
            return Err(RubricError::InvalidValue {
                field: "keywords.must_points/optional_points".to_string(),
                reason: "points must be non-negative".to_string(),
            });
        }

        let rate = &self.speech_rate;
        if !(rate.slow_min_wpm < rate.ideal_min_wpm
            && rate.ideal_min_wpm < rate.ideal_max_wpm
            && rate.ideal_max_wpm < rate.fast_max_wpm)
        {
            return Err(RubricError::InvalidValue {
                field: "speech_rate".to_string(),
                reason: "band boundaries must be strictly increasing".to_string(),
            });
        }

        if self.grammar.error_rate_cap <= 0.0 {
            return Err(RubricError::InvalidValue {
                field: "grammar.error_rate_cap".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        validate_bands("vocabulary.bands", &self.vocabulary.bands)?;
        validate_bands("filler.bands", &self.filler.bands)?;
        validate_bands("sentiment.bands", &self.sentiment.bands)?;

        if self.filler.phrases.is_empty() {
            return Err(RubricError::MissingParameter {
                criterion: "filler_rate",
                parameter: "phrases",
            });
        }

        Ok(())
    }
}

fn validate_bands(field: &str, bands: &[Band]) -> Result<(), RubricError> {
    if bands.is_empty() {
        return Err(RubricError::InvalidValue {
            field: field.to_string(),
            reason: "at least one band is required".to_string(),
        });
    }
    for pair in bands.windows(2) {
        if pair[0].min <= pair[1].min {
            return Err(RubricError::InvalidValue {
                field: field.to_string(),
                reason: "bands must be strictly descending by min".to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RubricError {
    #[error("criterion weights sum to {actual}, expected 100")]
    WeightSum { actual: u32 },
    #[error("unknown criterion '{0}' in rubric source")]
    UnknownCriterion(String),
    #[error("duplicate criterion '{0}' in rubric source")]
    DuplicateCriterion(String),
    #[error("criterion '{criterion}' is missing required parameter '{parameter}'")]
    MissingParameter {
        criterion: &'static str,
        parameter: &'static str,
    },
    #[error("invalid rubric value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("failed to read rubric source")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rubric row")]
    Csv(#[from] csv::Error),
    #[error("invalid params for criterion '{criterion}': {source}")]
    Params {
        criterion: &'static str,
        source: serde_json::Error,
    },
}
