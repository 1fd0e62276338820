//! Report model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use cardioml_core::logic::report::{PatientSummary, ReportBundle, CONFIDENTIALITY};
use cardioml_core::RiskCategory;

/// Report request: every field optional
#[derive(Debug, Default, Deserialize)]
pub struct ReportRequest {
    pub name: Option<String>,
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub bmi: Option<f64>,
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,
    /// Level label or numeric code
    pub cholesterol: Option<Value>,
    pub risk_score: Option<f64>,
}

pub const DEFAULT_RISK_SCORE: f64 = 0.5;

impl ReportRequest {
    pub fn risk_score(&self) -> f64 {
        self.risk_score.unwrap_or(DEFAULT_RISK_SCORE)
    }

    pub fn patient(&self) -> PatientSummary {
        PatientSummary {
            name: self.name.clone(),
            age: self.age,
            gender: self.gender.clone(),
            bmi: self.bmi,
            systolic_bp: self.systolic_bp,
            diastolic_bp: self.diastolic_bp,
            cholesterol: self.cholesterol.as_ref().and_then(|v| match v {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report_id: String,
    pub generated_at: String,
    pub patient_summary: PatientSummaryView,
    pub risk_assessment: RiskAssessmentView,
    pub recommendations: Vec<String>,
    pub clinical_notes: String,
    pub disclaimer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PatientSummaryView {
    pub name: Option<String>,
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub bmi: Option<f64>,
    pub blood_pressure: String,
    pub cholesterol: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RiskAssessmentView {
    pub score: f64,
    pub category: RiskCategory,
    pub percentile: String,
}

impl From<&ReportBundle> for ReportResponse {
    fn from(bundle: &ReportBundle) -> Self {
        let patient = &bundle.patient;

        Self {
            report_id: bundle.report_id.clone(),
            generated_at: bundle.generated_at.to_rfc3339(),
            patient_summary: PatientSummaryView {
                name: patient.name.clone(),
                age: patient.age,
                gender: patient.gender.clone(),
                bmi: patient.bmi,
                blood_pressure: patient.blood_pressure(),
                cholesterol: patient.cholesterol.clone(),
            },
            risk_assessment: RiskAssessmentView {
                score: bundle.risk.score,
                category: bundle.risk.category,
                percentile: bundle.risk.percentile.clone(),
            },
            recommendations: bundle.recommendations.clone(),
            clinical_notes: bundle.clinical_notes.clone(),
            disclaimer: CONFIDENTIALITY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults() {
        let request: ReportRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.risk_score(), 0.5);
        assert_eq!(request.patient().blood_pressure(), "N/A/N/A");
    }

    #[test]
    fn test_numeric_cholesterol_kept() {
        let request: ReportRequest =
            serde_json::from_value(json!({ "cholesterol": 2, "systolic_bp": 130, "diastolic_bp": 85 }))
                .unwrap();
        let patient = request.patient();
        assert_eq!(patient.cholesterol.as_deref(), Some("2"));
        assert_eq!(patient.blood_pressure(), "130/85");
    }
}
