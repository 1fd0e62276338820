//! Risk Thresholds
//!
//! Maps a probability to a risk band. Lower bounds are inclusive.

use serde::{Deserialize, Serialize};

/// Risk band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low Risk",
            RiskCategory::Moderate => "Moderate Risk",
            RiskCategory::High => "High Risk",
        }
    }

    /// Short upper-case form used in reports
    pub fn short(&self) -> &'static str {
        match self {
            RiskCategory::Low => "LOW",
            RiskCategory::Moderate => "MODERATE",
            RiskCategory::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold Configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Probability at or above which the patient is High risk
    pub high: f64,

    /// Probability at or above which the patient is Moderate risk
    pub moderate: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 0.70,
            moderate: 0.50,
        }
    }
}

impl RiskThresholds {
    /// Total over all inputs; NaN lands in Low
    pub fn categorize(&self, probability: f64) -> RiskCategory {
        if probability >= self.high {
            RiskCategory::High
        } else if probability >= self.moderate {
            RiskCategory::Moderate
        } else {
            RiskCategory::Low
        }
    }
}

/// Categorize with the default thresholds
pub fn categorize(probability: f64) -> RiskCategory {
    RiskThresholds::default().categorize(probability)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_inclusive() {
        assert_eq!(categorize(0.70), RiskCategory::High);
        assert_eq!(categorize(0.50), RiskCategory::Moderate);
        assert_eq!(categorize(0.6999), RiskCategory::Moderate);
        assert_eq!(categorize(0.4999), RiskCategory::Low);
        assert_eq!(categorize(0.0), RiskCategory::Low);
        assert_eq!(categorize(1.0), RiskCategory::High);
    }

    #[test]
    fn test_categories_exhaustive_and_exclusive() {
        for i in 0..=1000 {
            let p = i as f64 / 1000.0;
            let expected = if p >= 0.70 {
                RiskCategory::High
            } else if p >= 0.50 {
                RiskCategory::Moderate
            } else {
                RiskCategory::Low
            };
            assert_eq!(categorize(p), expected, "p = {}", p);
        }
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&RiskCategory::Moderate).unwrap();
        assert_eq!(json, "\"Moderate Risk\"");
        assert_eq!(RiskCategory::High.to_string(), "High Risk");
    }
}
