//! Risk Scorer
//!
//! features → scaling → inference → category → feature impacts.
//! The only mutable state is the latency buffer.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::impact::feature_impacts;
use super::recommendations;
use crate::logic::features::{FeatureError, PatientFeatures, FEATURE_LAYOUT};
use crate::logic::model::{
    predict_fallback, InferenceError, LatencyBuffer, LatencyStatus, ModelHandle, RiskCategory,
    RiskThresholds,
};

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error("Prediction error: {0}")]
    Inference(#[from] InferenceError),
}

/// How the probability was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMethod {
    Model,
    Fallback,
}

/// Scoring output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// P(positive class) in [0, 1]
    pub probability: f64,
    /// floor(probability * 100)
    pub percentage: u8,
    pub category: RiskCategory,
    pub feature_impacts: BTreeMap<String, f64>,
    pub recommendations: Vec<String>,
    pub method: ScoringMethod,
    pub inference_ms: f64,
}

/// Risk scorer with its rolling latency buffer
#[derive(Debug, Default)]
pub struct RiskScorer {
    thresholds: RiskThresholds,
    latency: LatencyBuffer,
}

impl RiskScorer {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self {
            thresholds,
            latency: LatencyBuffer::default(),
        }
    }

    /// Score one patient. `model` is `None` when no artifact is loaded.
    pub fn score(
        &self,
        features: &PatientFeatures,
        model: Option<&ModelHandle>,
    ) -> Result<RiskAssessment, ScoringError> {
        check_finite(features)?;

        let start = Instant::now();
        let (probability, method) = match model {
            Some(handle) => (handle.predict_probability(features)?, ScoringMethod::Model),
            None => (predict_fallback(features), ScoringMethod::Fallback),
        };
        let inference_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.latency.push(inference_ms);

        let category = self.thresholds.categorize(probability);
        log::debug!(
            "Scored patient: p={:.3} category={} method={:?} ({:.3} ms)",
            probability,
            category,
            method,
            inference_ms
        );

        Ok(RiskAssessment {
            probability,
            percentage: (probability * 100.0).floor().clamp(0.0, 100.0) as u8,
            category,
            feature_impacts: feature_impacts(model),
            recommendations: recommendations::for_features(features),
            method,
            inference_ms,
        })
    }

    /// Parse a JSON body and score it. Parsing errors never reach the model.
    pub fn score_json(
        &self,
        body: &Value,
        model: Option<&ModelHandle>,
    ) -> Result<(PatientFeatures, RiskAssessment), ScoringError> {
        let features = PatientFeatures::from_json(body)?;
        let assessment = self.score(&features, model)?;
        Ok((features, assessment))
    }

    pub fn latency(&self) -> &LatencyBuffer {
        &self.latency
    }

    pub fn latency_status(&self) -> LatencyStatus {
        self.latency.status()
    }

    pub fn thresholds(&self) -> RiskThresholds {
        self.thresholds
    }
}

fn check_finite(features: &PatientFeatures) -> Result<(), FeatureError> {
    for (name, value) in FEATURE_LAYOUT.iter().zip(features.to_array()) {
        if !value.is_finite() {
            return Err(FeatureError::InvalidType {
                field: *name,
                reason: format!("must be a finite number, got {}", value),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::logic::features::FEATURE_COUNT;
    use crate::logic::model::{Classifier, ModelCard, StandardScaler};

    /// Fixed-output classifier that counts calls
    struct FixedClassifier {
        probability: f64,
        calls: Arc<AtomicUsize>,
    }

    impl Classifier for FixedClassifier {
        fn predict_proba(&self, _scaled: &[f64; FEATURE_COUNT]) -> Result<f64, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.probability)
        }

        fn backend(&self) -> &'static str {
            "fixed"
        }
    }

    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn predict_proba(&self, _scaled: &[f64; FEATURE_COUNT]) -> Result<f64, InferenceError> {
            Err(InferenceError::Run("session poisoned".to_string()))
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    fn fixed_handle(probability: f64) -> (ModelHandle, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = ModelHandle::from_parts(
            ModelCard::default(),
            StandardScaler::identity(),
            Box::new(FixedClassifier {
                probability,
                calls: calls.clone(),
            }),
        )
        .unwrap();
        (handle, calls)
    }

    #[test]
    fn test_score_with_model() {
        let scorer = RiskScorer::default();
        let (handle, calls) = fixed_handle(0.734);

        let result = scorer.score(&PatientFeatures::default(), Some(&handle)).unwrap();
        assert_eq!(result.category, RiskCategory::High);
        assert_eq!(result.percentage, 73);
        assert_eq!(result.method, ScoringMethod::Model);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(scorer.latency().len(), 1);
    }

    #[test]
    fn test_score_fallback_in_range() {
        let scorer = RiskScorer::default();
        let result = scorer.score(&PatientFeatures::default(), None).unwrap();

        assert!((0.0..=1.0).contains(&result.probability));
        assert!(!result.category.as_str().is_empty());
        assert_eq!(result.method, ScoringMethod::Fallback);
        let total: f64 = result.feature_impacts.values().sum();
        assert!((total - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_boundary_probabilities() {
        let scorer = RiskScorer::default();
        for (p, expected) in [
            (0.70, RiskCategory::High),
            (0.50, RiskCategory::Moderate),
            (0.49, RiskCategory::Low),
        ] {
            let (handle, _) = fixed_handle(p);
            let result = scorer.score(&PatientFeatures::default(), Some(&handle)).unwrap();
            assert_eq!(result.category, expected, "p = {}", p);
        }
    }

    #[test]
    fn test_missing_field_never_calls_model() {
        let scorer = RiskScorer::default();
        let (handle, calls) = fixed_handle(0.9);

        let body = serde_json::json!({
            "age": 60, "bmi": 25.0, "cholesterol": 1, "gluc": 1,
            "systolic_bp": 130, "smoking_status": 0, "alcohol_intake": 0,
            "physical_activity": 1
        });

        let err = scorer.score_json(&body, Some(&handle)).unwrap_err();
        match err {
            ScoringError::Feature(FeatureError::Missing(field)) => {
                assert_eq!(field, "diastolic_bp")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(scorer.latency().is_empty());
    }

    #[test]
    fn test_non_finite_feature_rejected() {
        let scorer = RiskScorer::default();
        let (handle, calls) = fixed_handle(0.3);
        let features = PatientFeatures {
            bmi: f64::NAN,
            ..Default::default()
        };

        let err = scorer.score(&features, Some(&handle)).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Feature(FeatureError::InvalidType { field: "bmi", .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_model_failure_reported() {
        let scorer = RiskScorer::default();
        let handle = ModelHandle::from_parts(
            ModelCard::default(),
            StandardScaler::identity(),
            Box::new(FailingClassifier),
        )
        .unwrap();

        let err = scorer.score(&PatientFeatures::default(), Some(&handle)).unwrap_err();
        assert!(matches!(err, ScoringError::Inference(_)));
        assert!(err.to_string().contains("session poisoned"));
        assert!(scorer.latency().is_empty());
    }

    #[test]
    fn test_out_of_range_probability_clamped() {
        let scorer = RiskScorer::default();
        let (handle, _) = fixed_handle(1.7);
        let result = scorer.score(&PatientFeatures::default(), Some(&handle)).unwrap();
        assert_eq!(result.probability, 1.0);
        assert_eq!(result.percentage, 100);
    }

    #[test]
    fn test_latency_buffer_capped() {
        let scorer = RiskScorer::default();
        for _ in 0..101 {
            scorer.score(&PatientFeatures::default(), None).unwrap();
        }
        let status = scorer.latency_status();
        assert_eq!(status.total_predictions, 100);
        assert_eq!(status.lifetime_predictions, 101);
    }
}
