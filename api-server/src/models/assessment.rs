//! Model metadata model

use serde::{Deserialize, Serialize};

use cardioml_core::logic::features::LayoutInfo;
use cardioml_core::logic::model::{Hyperparameters, LatencyStatus};
use cardioml_core::logic::scoring::FeatureImportance;

#[derive(Debug, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub model_name: String,
    pub model_version: String,
    pub accuracy: f64,
    pub auc_roc: Option<f64>,
    pub f1_score: Option<f64>,
    pub training_dataset: Option<String>,
    pub features: Vec<String>,
    pub model_metrics: ModelMetrics,
    pub hyperparameters: Hyperparameters,
    pub feature_importance: Vec<FeatureImportance>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub uptime: Uptime,
    pub inference_speed: LatencyStatus,
    pub trained_at: Option<String>,
    pub library: String,
    pub feature_count: usize,
    /// Version and CRC32 of the input layout the server expects
    pub feature_layout: LayoutInfo,
    pub model_loaded: bool,
    pub checksum: Option<String>,
}

/// Server uptime, broken down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uptime {
    pub days: u64,
    /// Hours within the current day
    pub hours: u64,
    pub minutes: u64,
    /// Total seconds
    pub seconds: u64,
    pub formatted: String,
}

impl Uptime {
    pub fn from_seconds(seconds: u64) -> Self {
        let days = seconds / 86_400;
        let hours = (seconds % 86_400) / 3_600;
        let minutes = (seconds % 3_600) / 60;

        let formatted = if days > 0 {
            format!("{}d {}h {}m", days, hours, minutes)
        } else {
            format!("{}h {}m", hours, minutes)
        };

        Self {
            days,
            hours,
            minutes,
            seconds,
            formatted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uptime_under_a_day() {
        let uptime = Uptime::from_seconds(2 * 3_600 + 5 * 60 + 9);
        assert_eq!(uptime.days, 0);
        assert_eq!(uptime.hours, 2);
        assert_eq!(uptime.minutes, 5);
        assert_eq!(uptime.seconds, 7_509);
        assert_eq!(uptime.formatted, "2h 5m");
    }

    #[test]
    fn test_uptime_with_days() {
        let uptime = Uptime::from_seconds(86_400 + 3 * 3_600 + 60);
        assert_eq!(uptime.days, 1);
        assert_eq!(uptime.hours, 3);
        assert_eq!(uptime.formatted, "1d 3h 1m");
    }
}
