pub mod config;
pub mod engine;
pub mod error;
pub mod rubric;
pub mod telemetry;

pub use engine::{CriterionResult, EvaluationEngine, EvaluationReport, EvaluationRequest};
pub use rubric::{Criterion, RubricConfig, RubricError};
