//! Inference Engine - classifier backends and the model handle
//!
//! The model directory is loaded once into an immutable `ModelHandle` which is
//! then passed explicitly to scoring. Backends: ONNX Runtime graph, or a
//! logistic model described entirely in the model card.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use super::card::{ClassifierSpec, ModelCard};
use super::scaler::StandardScaler;
use crate::constants::{MODEL_CARD_FILE, SCALER_FILE};
use crate::logic::features::layout::LayoutMismatchError;
use crate::logic::features::{PatientFeatures, FEATURE_COUNT};

// ============================================================================
// ERRORS
// ============================================================================

/// Failure while loading a model directory
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("model artifact not found: {0}")]
    MissingArtifact(PathBuf),

    #[error("invalid model: {0}")]
    Invalid(String),

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    #[error("ONNX session error: {0}")]
    Session(String),
}

/// Failure inside a classifier call
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("tensor error: {0}")]
    Tensor(String),

    #[error("inference failed: {0}")]
    Run(String),

    #[error("model produced no probability output")]
    NoProbabilityOutput,

    #[error("model produced a non-finite probability: {0}")]
    NonFinite(f64),
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Probabilistic binary classifier over scaled features
pub trait Classifier: Send + Sync {
    /// P(positive class) for one scaled feature vector
    fn predict_proba(&self, scaled: &[f64; FEATURE_COUNT]) -> Result<f64, InferenceError>;

    /// Short backend name for metadata
    fn backend(&self) -> &'static str;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// ONNX Runtime classifier.
///
/// Expects a graph with one `[1, 9]` float input and a float probability
/// output of shape `[1, 2]` (or `[1, 1]`), e.g. a scikit-learn export with
/// zipmap disabled.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    output_names: Vec<String>,
}

impl OnnxClassifier {
    pub fn from_file(model_path: &Path) -> Result<Self, ModelError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(ModelError::MissingArtifact(model_path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| ModelError::Session(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::Session(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ModelError::Session(format!("Failed to load model: {}", e)))?;

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        if output_names.is_empty() {
            return Err(ModelError::Session("No output defined".to_string()));
        }

        log::info!("ONNX model loaded (outputs: {:?})", output_names);

        Ok(Self {
            session: Mutex::new(session),
            output_names,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict_proba(&self, scaled: &[f64; FEATURE_COUNT]) -> Result<f64, InferenceError> {
        let input: Vec<f32> = scaled.iter().map(|v| *v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input)
            .map_err(|e| InferenceError::Tensor(e.to_string()))?;
        let input_tensor =
            Value::from_array(input_array).map_err(|e| InferenceError::Tensor(e.to_string()))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Run(e.to_string()))?;

        // The label output is int64 and fails float extraction; the
        // probability output is the first float tensor.
        for name in &self.output_names {
            let Some(output) = outputs.get(name.as_str()) else {
                continue;
            };
            let Ok((_, data)) = output.try_extract_tensor::<f32>() else {
                continue;
            };
            let probability = match data.len() {
                0 => continue,
                1 => data[0],
                _ => data[1],
            };
            return Ok(probability as f64);
        }

        Err(InferenceError::NoProbabilityOutput)
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}

// ============================================================================
// LOGISTIC IMPLEMENTATION
// ============================================================================

/// Logistic regression: sigmoid(intercept + coefficients · x)
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LogisticClassifier {
    pub fn new(coefficients: &[f64], intercept: f64) -> Result<Self, ModelError> {
        let coefficients: [f64; FEATURE_COUNT] = coefficients.try_into().map_err(|_| {
            ModelError::Invalid(format!(
                "logistic model expects {} coefficients, got {}",
                FEATURE_COUNT,
                coefficients.len()
            ))
        })?;
        Ok(Self {
            coefficients,
            intercept,
        })
    }
}

impl Classifier for LogisticClassifier {
    fn predict_proba(&self, scaled: &[f64; FEATURE_COUNT]) -> Result<f64, InferenceError> {
        let logit = self.intercept
            + self
                .coefficients
                .iter()
                .zip(scaled)
                .map(|(c, x)| c * x)
                .sum::<f64>();
        Ok(1.0 / (1.0 + (-logit).exp()))
    }

    fn backend(&self) -> &'static str {
        "logistic"
    }
}

// ============================================================================
// MODEL HANDLE
// ============================================================================

/// Loaded classifier + scaler + metadata. Read-only after construction.
pub struct ModelHandle {
    card: ModelCard,
    scaler: StandardScaler,
    classifier: Box<dyn Classifier>,
    checksum: Option<String>,
    source: String,
    loaded_at: DateTime<Utc>,
}

impl ModelHandle {
    /// Load `model_card.json`, `scaler.json` and the classifier artifact from `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ModelError> {
        let dir = dir.as_ref();
        log::info!("Loading model directory: {}", dir.display());

        let card_path = dir.join(MODEL_CARD_FILE);
        if !card_path.exists() {
            return Err(ModelError::MissingArtifact(card_path));
        }
        let card = ModelCard::from_file(&card_path)?;
        let scaler = StandardScaler::from_file(&dir.join(SCALER_FILE))?;

        let (classifier, checksum): (Box<dyn Classifier>, String) = match &card.classifier {
            ClassifierSpec::Onnx { file } => {
                let path = dir.join(file);
                let checksum = file_checksum(&path)?;
                (Box::new(OnnxClassifier::from_file(&path)?), checksum)
            }
            ClassifierSpec::Logistic { coefficients, intercept } => (
                Box::new(LogisticClassifier::new(coefficients, *intercept)?),
                file_checksum(&card_path)?,
            ),
        };

        log::info!(
            "Model loaded: {} {} ({}, sha256 {})",
            card.name,
            card.version,
            classifier.backend(),
            &checksum[..12.min(checksum.len())]
        );

        Ok(Self {
            card,
            scaler,
            classifier,
            checksum: Some(checksum),
            source: dir.display().to_string(),
            loaded_at: Utc::now(),
        })
    }

    /// Build a handle from already-constructed parts
    pub fn from_parts(
        card: ModelCard,
        scaler: StandardScaler,
        classifier: Box<dyn Classifier>,
    ) -> Result<Self, ModelError> {
        card.validate()?;
        scaler.validate()?;

        Ok(Self {
            card,
            scaler,
            classifier,
            checksum: None,
            source: "<memory>".to_string(),
            loaded_at: Utc::now(),
        })
    }

    /// Scale then classify; P(positive class) clamped to [0, 1]
    pub fn predict_probability(&self, features: &PatientFeatures) -> Result<f64, InferenceError> {
        let scaled = self.scaler.transform(&features.to_array());
        let probability = self.classifier.predict_proba(&scaled)?;

        if !probability.is_finite() {
            return Err(InferenceError::NonFinite(probability));
        }
        Ok(probability.clamp(0.0, 1.0))
    }

    pub fn card(&self) -> &ModelCard {
        &self.card
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn backend(&self) -> &'static str {
        self.classifier.backend()
    }

    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("name", &self.card.name)
            .field("version", &self.card.version)
            .field("backend", &self.classifier.backend())
            .field("source", &self.source)
            .finish()
    }
}

fn file_checksum(path: &Path) -> Result<String, ModelError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            return ModelError::MissingArtifact(path.to_path_buf());
        }
        ModelError::Io {
            path: path.display().to_string(),
            source,
        }
    })?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

// ============================================================================
// FALLBACK
// ============================================================================

/// Placeholder probability used when no model artifact is present
pub fn predict_fallback(features: &PatientFeatures) -> f64 {
    let raw = (features.systolic_bp / 140.0 + features.cholesterol / 300.0 + features.age / 100.0)
        / 3.0;
    raw.min(0.9).clamp(0.0, 1.0)
}
