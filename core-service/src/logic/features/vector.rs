//! Patient Feature Vector - Core data structure for model input
//!
//! Nine fields in `FEATURE_LAYOUT` order. Parsing from JSON checks every
//! field before anything reaches the model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::layout::{FEATURE_COUNT, FLAG_FEATURES, FLOAT_FEATURES};
use super::vitals::{bmi, VitalsError};

// ============================================================================
// ERRORS
// ============================================================================

/// Input validation failure, always naming the offending field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureError {
    #[error("Missing required field: {0}")]
    Missing(&'static str),

    #[error("Invalid data format: field '{field}' {reason}")]
    InvalidType { field: &'static str, reason: String },

    #[error("Invalid data format: field '{field}': {source}")]
    InvalidValue {
        field: &'static str,
        #[source]
        source: VitalsError,
    },

    #[error("Invalid data format: request body must be a JSON object")]
    NotAnObject,
}

impl FeatureError {
    /// Field the error refers to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            FeatureError::Missing(f) => Some(*f),
            FeatureError::InvalidType { field, .. } => Some(*field),
            FeatureError::InvalidValue { field, .. } => Some(*field),
            FeatureError::NotAnObject => None,
        }
    }
}

// ============================================================================
// PATIENT FEATURES
// ============================================================================

/// Model input for one patient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientFeatures {
    pub age: f64,
    pub bmi: f64,
    pub cholesterol: f64,
    pub gluc: f64,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub smoking_status: u8,
    pub alcohol_intake: u8,
    pub physical_activity: u8,
}

impl PatientFeatures {
    /// Values in layout order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age,
            self.bmi,
            self.cholesterol,
            self.gluc,
            self.systolic_bp,
            self.diastolic_bp,
            self.smoking_status as f64,
            self.alcohol_intake as f64,
            self.physical_activity as f64,
        ]
    }

    /// Get feature by layout name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        super::layout::feature_index(name).map(|i| self.to_array()[i])
    }

    /// Parse an API request body.
    ///
    /// Fields are checked in layout order so the first missing one is reported.
    /// In the `bmi` slot, `height` (cm) and `weight` (kg) are used when either is
    /// present; otherwise a pre-derived `bmi` is required.
    pub fn from_json(body: &Value) -> Result<Self, FeatureError> {
        let map = body.as_object().ok_or(FeatureError::NotAnObject)?;

        let mut floats = [0.0f64; FLOAT_FEATURES.len()];
        for (slot, name) in floats.iter_mut().zip(FLOAT_FEATURES) {
            *slot = match *name {
                "bmi" => bmi_field(map)?,
                other => float_field(map, other)?,
            };
        }

        let mut flags = [0u8; FLAG_FEATURES.len()];
        for (slot, name) in flags.iter_mut().zip(FLAG_FEATURES) {
            *slot = flag_field(map, *name)?;
        }

        let [age, bmi, cholesterol, gluc, systolic_bp, diastolic_bp] = floats;
        let [smoking_status, alcohol_intake, physical_activity] = flags;

        Ok(Self {
            age,
            bmi,
            cholesterol,
            gluc,
            systolic_bp,
            diastolic_bp,
            smoking_status,
            alcohol_intake,
            physical_activity,
        })
    }
}

impl Default for PatientFeatures {
    fn default() -> Self {
        Self {
            age: 30.0,
            bmi: 23.88,
            cholesterol: 1.0,
            gluc: 1.0,
            systolic_bp: 120.0,
            diastolic_bp: 80.0,
            smoking_status: 0,
            alcohol_intake: 0,
            physical_activity: 1,
        }
    }
}

// ============================================================================
// FIELD PARSING
// ============================================================================

/// Derived from height/weight when either is sent, else the explicit `bmi`
fn bmi_field(map: &Map<String, Value>) -> Result<f64, FeatureError> {
    if !map.contains_key("height") && !map.contains_key("weight") {
        return float_field(map, "bmi");
    }

    let height = float_field(map, "height")?;
    let weight = float_field(map, "weight")?;

    bmi(height, weight).map_err(|source| FeatureError::InvalidValue { field: "bmi", source })
}

fn float_field(map: &Map<String, Value>, name: &'static str) -> Result<f64, FeatureError> {
    let value = map.get(name).ok_or(FeatureError::Missing(name))?;

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(FeatureError::InvalidType {
            field: name,
            reason: format!("expected a number, got {}", value),
        }),
    }
}

fn flag_field(map: &Map<String, Value>, name: &'static str) -> Result<u8, FeatureError> {
    let value = map.get(name).ok_or(FeatureError::Missing(name))?;

    let parsed = match value {
        Value::Bool(b) => Some(*b as i64),
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v @ (0 | 1)) => Ok(v as u8),
        Some(v) => Err(FeatureError::InvalidType {
            field: name,
            reason: format!("must be 0 or 1, got {}", v),
        }),
        None => Err(FeatureError::InvalidType {
            field: name,
            reason: format!("expected an integer, got {}", value),
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================
