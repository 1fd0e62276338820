//! Model Module - classifier loading and inference
//!
//! Scaling, classifier backends, model metadata, risk thresholds and the
//! rolling latency buffer.

pub mod buffer;
pub mod card;
pub mod inference;
pub mod scaler;
pub mod threshold;

// Re-export common types
pub use buffer::{LatencyBuffer, LatencyStatus};
pub use card::{ClassifierSpec, Hyperparameters, ModelCard};
pub use inference::{
    predict_fallback, Classifier, InferenceError, LogisticClassifier, ModelError, ModelHandle,
    OnnxClassifier,
};
pub use scaler::StandardScaler;
pub use threshold::{categorize, RiskCategory, RiskThresholds};
