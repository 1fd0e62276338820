//! Vitals - BMI derivation, blood pressure plausibility, categorical levels

use serde::{Deserialize, Serialize};

/// Realistic systolic range (mmHg)
pub const SYSTOLIC_RANGE: (f64, f64) = (70.0, 250.0);

/// Realistic diastolic range (mmHg)
pub const DIASTOLIC_RANGE: (f64, f64) = (40.0, 150.0);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VitalsError {
    #[error("height and weight must be positive numbers (got {height} cm, {weight} kg)")]
    InvalidBodyMeasure { height: f64, weight: f64 },

    #[error("Systolic BP must be higher than Diastolic BP.")]
    SystolicNotAboveDiastolic,

    #[error("Systolic BP value looks unrealistic.")]
    SystolicOutOfRange,

    #[error("Diastolic BP value looks unrealistic.")]
    DiastolicOutOfRange,
}

/// Body mass index from height (cm) and weight (kg)
pub fn bmi(height_cm: f64, weight_kg: f64) -> Result<f64, VitalsError> {
    let valid = height_cm.is_finite() && weight_kg.is_finite() && height_cm > 0.0 && weight_kg > 0.0;
    if !valid {
        return Err(VitalsError::InvalidBodyMeasure {
            height: height_cm,
            weight: weight_kg,
        });
    }

    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

/// Blood pressure plausibility check
pub fn validate_bp(systolic: f64, diastolic: f64) -> Result<(), VitalsError> {
    if systolic <= diastolic {
        return Err(VitalsError::SystolicNotAboveDiastolic);
    }
    if systolic < SYSTOLIC_RANGE.0 || systolic > SYSTOLIC_RANGE.1 {
        return Err(VitalsError::SystolicOutOfRange);
    }
    if diastolic < DIASTOLIC_RANGE.0 || diastolic > DIASTOLIC_RANGE.1 {
        return Err(VitalsError::DiastolicOutOfRange);
    }
    Ok(())
}

/// Cholesterol / glucose level as collected by the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Level {
    #[default]
    Normal,
    AboveNormal,
    WellAboveNormal,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Normal, Level::AboveNormal, Level::WellAboveNormal];

    /// Encoded value used by the model
    pub fn code(self) -> u8 {
        match self {
            Level::Normal => 1,
            Level::AboveNormal => 2,
            Level::WellAboveNormal => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Normal => "Normal",
            Level::AboveNormal => "Above Normal",
            Level::WellAboveNormal => "Well Above Normal",
        }
    }

    /// Parse a label or a code (1-3)
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|l| {
            l.label().to_ascii_lowercase() == needle || l.code().to_string() == needle
        })
    }
}
