//! Feature Scaler - standard scaling fitted at training time
//!
//! Persisted as `scaler.json`: `{"mean": [...], "scale": [...]}`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ModelError;
use crate::logic::features::FEATURE_COUNT;

/// Standard scaler parameters, one entry per feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Identity transform
    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let scaler: StandardScaler =
            serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        scaler.validate()?;
        Ok(scaler)
    }

    /// Check arity and that no scale is zero or non-finite
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "scaler expects {} features, got mean={} scale={}",
                FEATURE_COUNT,
                self.mean.len(),
                self.scale.len()
            )));
        }

        let bad_scale = self.scale.iter().any(|s| !s.is_finite() || *s == 0.0);
        let bad_mean = self.mean.iter().any(|m| !m.is_finite());
        if bad_scale || bad_mean {
            return Err(ModelError::Invalid(
                "scaler parameters must be finite with non-zero scale".to_string(),
            ));
        }

        Ok(())
    }

    /// (x - mean) / scale
    pub fn transform(&self, features: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut scaled = [0.0f64; FEATURE_COUNT];
        for (i, value) in features.iter().enumerate() {
            scaled[i] = (value - self.mean[i]) / self.scale[i];
        }
        scaled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let scaler = StandardScaler {
            mean: vec![50.0, 25.0, 1.0, 1.0, 120.0, 80.0, 0.5, 0.5, 0.5],
            scale: vec![10.0, 5.0, 1.0, 1.0, 20.0, 10.0, 0.5, 0.5, 0.5],
        };
        let scaled = scaler.transform(&[60.0, 30.0, 2.0, 1.0, 140.0, 90.0, 1.0, 0.0, 1.0]);
        assert_eq!(scaled, [1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_identity() {
        let input = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.0, 1.0, 0.0];
        assert_eq!(StandardScaler::identity().transform(&input), input);
    }

    #[test]
    fn test_validate_rejects_bad_params() {
        let mut scaler = StandardScaler::identity();
        scaler.scale[3] = 0.0;
        assert!(scaler.validate().is_err());

        let short = StandardScaler {
            mean: vec![0.0; 4],
            scale: vec![1.0; 4],
        };
        assert!(short.validate().is_err());
    }
}
