//! CardioML Core
//!
//! Cardiovascular risk scoring shared by the HTTP API and the terminal wizard.

pub mod constants;
pub mod logic;

pub use logic::features::{FeatureError, PatientFeatures};
pub use logic::model::{ModelError, ModelHandle, RiskCategory};
pub use logic::scoring::{RiskAssessment, RiskScorer, ScoringError};
