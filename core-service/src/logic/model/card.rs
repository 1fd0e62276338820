//! Model Card - static metadata shipped next to the model
//!
//! Persisted as `model_card.json` in the model directory.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ModelError;
use crate::logic::features::layout::{self, FEATURE_LAYOUT};

/// Which classifier backend the directory holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClassifierSpec {
    /// ONNX graph file, relative to the model directory
    Onnx { file: String },

    /// Logistic regression over scaled features
    Logistic { coefficients: Vec<f64>, intercept: f64 },
}

/// Training hyperparameters reported by the metadata endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub n_estimators: u32,
    pub max_depth: Option<u32>,
    pub min_samples_leaf: u32,
    pub random_state: u64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            max_depth: None,
            min_samples_leaf: 1,
            random_state: 42,
        }
    }
}

/// Model card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCard {
    pub name: String,
    pub version: String,
    pub accuracy: f64,
    #[serde(default)]
    pub auc_roc: Option<f64>,
    #[serde(default)]
    pub f1_score: Option<f64>,
    #[serde(default)]
    pub training_dataset: Option<String>,
    #[serde(default)]
    pub trained_at: Option<String>,
    #[serde(default = "default_library")]
    pub library: String,

    /// Feature names the model was fitted on, must equal the layout
    pub features: Vec<String>,

    /// Intrinsic importance scores in feature order (unnormalized)
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,

    #[serde(default)]
    pub hyperparameters: Option<Hyperparameters>,

    /// Accuracy of every model evaluated during selection
    #[serde(default)]
    pub candidates: BTreeMap<String, f64>,

    pub classifier: ClassifierSpec,
}

fn default_library() -> String {
    "scikit-learn".to_string()
}

impl Default for ModelCard {
    fn default() -> Self {
        Self {
            name: "Random Forest Classifier".to_string(),
            version: "v2.4".to_string(),
            accuracy: 0.942,
            auc_roc: Some(0.96),
            f1_score: Some(0.91),
            training_dataset: Some("Heart Disease Research Dataset (HRDD)".to_string()),
            trained_at: Some("2024-01-05T13:04:00".to_string()),
            library: default_library(),
            features: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            feature_importances: None,
            hyperparameters: Some(Hyperparameters::default()),
            candidates: BTreeMap::new(),
            classifier: ClassifierSpec::Onnx {
                file: "cardio_model.onnx".to_string(),
            },
        }
    }
}

impl ModelCard {
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let card: ModelCard = serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        card.validate()?;
        Ok(card)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        layout::validate_names(self.features.as_slice())?;

        if let Some(importances) = &self.feature_importances {
            let valid = importances.len() == self.features.len()
                && importances.iter().all(|v| v.is_finite() && *v >= 0.0);
            if !valid {
                return Err(ModelError::Invalid(
                    "feature_importances must be non-negative, one per feature".to_string(),
                ));
            }
        }

        if let ClassifierSpec::Logistic { coefficients, intercept } = &self.classifier {
            if coefficients.len() != self.features.len() || !intercept.is_finite() {
                return Err(ModelError::Invalid(format!(
                    "logistic model expects {} coefficients, got {}",
                    self.features.len(),
                    coefficients.len()
                )));
            }
        }

        Ok(())
    }

    pub fn hyperparameters_or_default(&self) -> Hyperparameters {
        self.hyperparameters.clone().unwrap_or_default()
    }
}
