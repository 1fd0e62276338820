//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the model input schema**
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The trained classifier and its scaler were fitted against this exact order.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector.
/// These are also the JSON field names accepted by the API.
pub const FEATURE_LAYOUT: &[&str] = &[
    "age",               // 0: years
    "bmi",               // 1: kg/m², derived from height and weight
    "cholesterol",       // 2: level (1-3) or mg/dL
    "gluc",              // 3: level (1-3)
    "systolic_bp",       // 4: mmHg
    "diastolic_bp",      // 5: mmHg
    "smoking_status",    // 6: 0/1
    "alcohol_intake",    // 7: 0/1
    "physical_activity", // 8: 0/1
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 9;

/// Features parsed as floats
pub const FLOAT_FEATURES: &[&str] = &[
    "age",
    "bmi",
    "cholesterol",
    "gluc",
    "systolic_bp",
    "diastolic_bp",
];

/// Features parsed as 0/1 flags
pub const FLAG_FEATURES: &[&str] = &["smoking_status", "alcohol_intake", "physical_activity"];

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 of version + ordered names, used to detect model/layout mismatches
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

/// Layout information for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when a model's feature list doesn't match the layout
#[derive(Debug, Clone, thiserror::Error)]
#[error("Feature layout mismatch: expected {expected:?}, got {actual:?}")]
pub struct LayoutMismatchError {
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}

/// Validate a feature list (e.g. from a model card) against the layout
pub fn validate_names<S: AsRef<str>>(names: &[S]) -> Result<(), LayoutMismatchError> {
    let matches = names.len() == FEATURE_COUNT
        && names.iter().zip(FEATURE_LAYOUT).all(|(a, b)| a.as_ref() == *b);

    if matches {
        Ok(())
    } else {
        Err(LayoutMismatchError {
            expected: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            actual: names.iter().map(|s| s.as_ref().to_string()).collect(),
        })
    }
}

// ============================================================================
// FEATURE LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Human-readable label for a feature
pub fn feature_label(name: &str) -> String {
    let label = match name {
        "systolic_bp" => "Systolic Blood Pressure",
        "diastolic_bp" => "Diastolic Blood Pressure",
        "cholesterol" => "Cholesterol",
        "gluc" => "Glucose",
        "age" => "Age",
        "bmi" => "BMI",
        "smoking_status" => "Smoking Status",
        "physical_activity" => "Physical Activity",
        "alcohol_intake" => "Alcohol Intake",
        other => return title_case(other),
    };
    label.to_string()
}

fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display names used in model metadata listings
pub const FEATURE_DESCRIPTIONS: &[&str] = &[
    "Age (years)",
    "BMI (Body Mass Index)",
    "Total Cholesterol (mg/dL)",
    "Glucose Level",
    "Systolic Blood Pressure (mmHg)",
    "Diastolic Blood Pressure (mmHg)",
    "Smoking Status",
    "Alcohol Intake",
    "Physical Activity Level",
];

// ============================================================================
// TESTS
// ============================================================================
