use crate::engine::lexicon::{CompiledCategory, CLOSING_PATTERNS, SALUTATION_TIERS};
use crate::engine::transcript::Transcript;
use crate::engine::{round2, CriterionResult};
use crate::rubric::{Criterion, FlowConfig};
use regex::Regex;
use serde_json::{json, Map, Value};

/// The canonical phase sequence of a well-structured introduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowPhase {
    Salutation,
    BasicDetails,
    OptionalDetails,
    Closing,
}

impl FlowPhase {
    const fn ordered() -> [Self; 4] {
        [
            Self::Salutation,
            Self::BasicDetails,
            Self::OptionalDetails,
            Self::Closing,
        ]
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Salutation => "salutation",
            Self::BasicDetails => "basic_details",
            Self::OptionalDetails => "optional_details",
            Self::Closing => "closing",
        }
    }
}

/// Positional heuristic: compares the mean word position of each detected
/// phase against the canonical ordering. Credit is the fraction of
/// correctly ordered phase pairs; phases without matches are left out of
/// the comparison rather than penalized twice.
pub(crate) fn score(
    transcript: &Transcript,
    config: &FlowConfig,
    categories: &[CompiledCategory],
) -> CriterionResult {
    let weight = f64::from(config.weight);
    let positions: Vec<(FlowPhase, Option<f64>)> = FlowPhase::ordered()
        .iter()
        .map(|phase| (*phase, mean_position(transcript, *phase, config, categories)))
        .collect();

    let detected: Vec<(FlowPhase, f64)> = positions
        .iter()
        .filter_map(|(phase, position)| position.map(|p| (*phase, p)))
        .collect();

    let mut position_details = Map::new();
    for (phase, position) in &positions {
        let value = match position {
            Some(p) => json!(round2(*p)),
            None => Value::Null,
        };
        position_details.insert(phase.label().to_string(), value);
    }

    if detected.len() < 2 {
        let basic_found = detected
            .iter()
            .any(|(phase, _)| *phase == FlowPhase::BasicDetails);
        let (score, reason) = if basic_found {
            (
                config.short_text_ratio * weight,
                "too short to order, basic details present",
            )
        } else {
            (0.0, "no structure detected")
        };
        return CriterionResult::new(
            Criterion::Flow,
            score,
            config.weight,
            json!({ "reason": reason, "positions": position_details }),
        );
    }

    let mut correct_pairs = 0u32;
    let mut total_pairs = 0u32;
    for i in 0..detected.len() {
        for j in (i + 1)..detected.len() {
            total_pairs += 1;
            if detected[i].1 < detected[j].1 {
                correct_pairs += 1;
            }
        }
    }

    let score = f64::from(correct_pairs) / f64::from(total_pairs) * weight;

    CriterionResult::new(
        Criterion::Flow,
        score,
        config.weight,
        json!({
            "correct_pairs": correct_pairs,
            "total_pairs": total_pairs,
            "positions": position_details,
        }),
    )
}

/// Mean word index over every pattern match belonging to the phase.
fn mean_position(
    transcript: &Transcript,
    phase: FlowPhase,
    config: &FlowConfig,
    categories: &[CompiledCategory],
) -> Option<f64> {
    let lowered = transcript.lowered();
    let mut indices: Vec<usize> = Vec::new();

    let mut collect = |pattern: &Regex| {
        for found in pattern.find_iter(lowered) {
            indices.push(transcript.word_index_at(found.start()));
        }
    };

    match phase {
        FlowPhase::Salutation => {
            for (_, patterns) in SALUTATION_TIERS.iter() {
                patterns.iter().for_each(&mut collect);
            }
        }
        FlowPhase::BasicDetails => {
            category_patterns(categories, &config.basic_categories).for_each(&mut collect)
        }
        FlowPhase::OptionalDetails => {
            category_patterns(categories, &config.detail_categories).for_each(&mut collect)
        }
        FlowPhase::Closing => CLOSING_PATTERNS.iter().for_each(&mut collect),
    }

    if indices.is_empty() {
        None
    } else {
        Some(indices.iter().sum::<usize>() as f64 / indices.len() as f64)
    }
}

fn category_patterns<'a>(
    categories: &'a [CompiledCategory],
    names: &'a [String],
) -> impl Iterator<Item = &'a Regex> {
    categories
        .iter()
        .filter(move |category| names.iter().any(|name| name == &category.name))
        .flat_map(|category| category.patterns.iter())
}
