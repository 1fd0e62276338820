//! Prediction model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cardioml_core::logic::model::ModelCard;
use cardioml_core::logic::scoring::ScoringMethod;
use cardioml_core::{RiskAssessment, RiskCategory};

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub risk_percentage: u8,
    pub feature_impacts: BTreeMap<String, f64>,
    pub recommendations: Vec<String>,
    pub model_name: String,
    pub model_version: String,
    pub accuracy: f64,
    pub method: ScoringMethod,
    pub inference_ms: f64,
    pub timestamp: String,
}

impl PredictionResponse {
    pub fn new(assessment: RiskAssessment, card: &ModelCard) -> Self {
        Self {
            risk_score: (assessment.probability * 1000.0).round() / 1000.0,
            risk_category: assessment.category,
            risk_percentage: assessment.percentage,
            feature_impacts: assessment.feature_impacts,
            recommendations: assessment.recommendations,
            model_name: card.name.clone(),
            model_version: card.version.clone(),
            accuracy: card.accuracy,
            method: assessment.method,
            inference_ms: assessment.inference_ms,
            timestamp: chrono::Local::now().to_rfc3339(),
        }
    }
}
