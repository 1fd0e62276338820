//! Integration Tests for the feature pipeline
//!
//! Wizard answers and JSON bodies must produce the same model input, and
//! both must flow through the scorer unchanged.

#[cfg(test)]
mod integration_tests {
    use serde_json::json;

    use crate::logic::features::{
        layout::{layout_hash, validate_names, FEATURE_LAYOUT},
        FeatureError, Level, PatientFeatures,
    };
    use crate::logic::model::{
        ClassifierSpec, LogisticClassifier, ModelCard, ModelHandle, RiskCategory, StandardScaler,
    };
    use crate::logic::scoring::{RiskScorer, ScoringMethod};
    use crate::logic::wizard::{Answers, WizardState};

    fn answers() -> Answers {
        Answers {
            name: "Jane Doe".to_string(),
            age: 62,
            height_cm: 170,
            weight_kg: 80,
            systolic_bp: 150,
            diastolic_bp: 95,
            cholesterol: Level::AboveNormal,
            glucose: Level::Normal,
            smoker: true,
            alcohol: false,
            active: false,
            ..Default::default()
        }
    }

    /// Wizard path and JSON path agree on the feature vector
    #[test]
    fn test_wizard_and_json_agree() {
        let from_wizard = answers().to_features().unwrap();

        let body = json!({
            "age": 62,
            "height": 170,
            "weight": 80,
            "cholesterol": 2,
            "gluc": 1,
            "systolic_bp": 150,
            "diastolic_bp": 95,
            "smoking_status": 1,
            "alcohol_intake": 0,
            "physical_activity": 0
        });
        let from_json = PatientFeatures::from_json(&body).unwrap();

        assert_eq!(from_wizard.to_array(), from_json.to_array());
    }

    /// Vector order follows the layout
    #[test]
    fn test_array_follows_layout() {
        let features = answers().to_features().unwrap();
        let array = features.to_array();

        for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
            assert_eq!(Some(array[i]), features.get_by_name(name), "feature {}", name);
        }
    }

    /// Layout validation and hash are stable across calls
    #[test]
    fn test_layout_consistency() {
        assert!(validate_names(FEATURE_LAYOUT).is_ok());
        assert_eq!(layout_hash(), layout_hash());

        let mut reordered: Vec<&str> = FEATURE_LAYOUT.to_vec();
        reordered.swap(0, 1);
        assert!(validate_names(reordered.as_slice()).is_err());
    }

    /// Completed wizard → scorer with no model uses the placeholder
    #[test]
    fn test_wizard_to_fallback_score() {
        let state = WizardState::new()
            .start()
            .and_then(|s| s.edit_answers(|a| *a = answers()))
            .and_then(|s| s.advance())
            .and_then(|s| s.advance())
            .and_then(|s| s.advance())
            .unwrap();

        let features = state.features().unwrap();
        let scorer = RiskScorer::default();
        let assessment = scorer.score(&features, None).unwrap();

        // (150/140 + 2/300 + 62/100) / 3
        let expected = (150.0 / 140.0 + 2.0 / 300.0 + 0.62) / 3.0;
        assert!((assessment.probability - expected).abs() < 1e-9);
        assert_eq!(assessment.method, ScoringMethod::Fallback);
        assert_eq!(assessment.category, RiskCategory::Moderate);
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("blood pressure")));
    }

    /// JSON body → model handle with a logistic classifier
    #[test]
    fn test_json_to_model_score() {
        let mut coefficients = vec![0.0; FEATURE_LAYOUT.len()];
        coefficients[4] = 0.05; // systolic_bp
        let card = ModelCard {
            classifier: ClassifierSpec::Logistic {
                coefficients: coefficients.clone(),
                intercept: -6.0,
            },
            ..Default::default()
        };
        let classifier = LogisticClassifier::new(&coefficients, -6.0).unwrap();
        let handle =
            ModelHandle::from_parts(card, StandardScaler::identity(), Box::new(classifier))
                .unwrap();

        let scorer = RiskScorer::default();
        let body = json!({
            "age": "45", "bmi": 27.5, "cholesterol": 1, "gluc": 1,
            "systolic_bp": 160, "diastolic_bp": 90,
            "smoking_status": 0, "alcohol_intake": 0, "physical_activity": 1
        });

        let (features, assessment) = scorer.score_json(&body, Some(&handle)).unwrap();
        assert_eq!(features.age, 45.0);

        // sigmoid(0.05 * 160 - 6) = sigmoid(2)
        let expected = 1.0 / (1.0 + (-2.0f64).exp());
        assert!((assessment.probability - expected).abs() < 1e-9);
        assert_eq!(assessment.category, RiskCategory::High);
        assert_eq!(assessment.method, ScoringMethod::Model);
        assert_eq!(scorer.latency().len(), 1);
    }

    /// Invalid bodies never reach the model or the latency buffer
    #[test]
    fn test_invalid_body_not_scored() {
        let scorer = RiskScorer::default();
        let body = json!({ "age": 45 });

        let err = scorer.score_json(&body, None).unwrap_err();
        assert!(err.to_string().contains("Missing required field"));
        assert!(scorer.latency().is_empty());

        let err = PatientFeatures::from_json(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, FeatureError::NotAnObject);
    }
}
