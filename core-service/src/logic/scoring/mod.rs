//! Scoring Module - the risk-scoring flow
//!
//! `RiskScorer` ties features, model and thresholds together.

pub mod impact;
pub mod recommendations;
pub mod scorer;

pub use impact::{feature_importance_list, feature_impacts, FeatureImportance};
pub use scorer::{RiskAssessment, RiskScorer, ScoringError, ScoringMethod};
