//! Report Bundle - renderer-independent report content
//!
//! Built from either wizard answers + assessment, or the loosely-typed
//! fields posted to the report endpoint.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::constants::DISCLAIMER;
use crate::logic::model::{categorize, RiskCategory};
use crate::logic::scoring::{recommendations, RiskAssessment};
use crate::logic::wizard::Answers;

pub const CLINICAL_NOTES: &str = "This prediction is for informational purposes only and should \
not replace professional medical advice.";

pub const CONFIDENTIALITY: &str = "HIPAA Compliant • Confidential Patient Data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PatientSummary {
    pub name: Option<String>,
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub bmi: Option<f64>,
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,
    pub cholesterol: Option<String>,
}

impl PatientSummary {
    /// "120/80", with N/A for missing parts
    pub fn blood_pressure(&self) -> String {
        format!(
            "{}/{}",
            fmt_opt(self.systolic_bp),
            fmt_opt(self.diastolic_bp)
        )
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
        Some(v) => format!("{}", v),
        None => "N/A".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSection {
    pub score: f64,
    pub category: RiskCategory,
    pub percentile: String,
}

impl RiskSection {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            score: probability,
            category: categorize(probability),
            percentile: percentile(probability),
        }
    }

    /// Percentage with one decimal
    pub fn percent(&self) -> f64 {
        (self.score * 1000.0).round() / 10.0
    }
}

/// "Top N%" where N = floor((1 - p) * 100)
pub fn percentile(probability: f64) -> String {
    let top = ((1.0 - probability.clamp(0.0, 1.0)) * 100.0).floor() as i64;
    format!("Top {}%", top)
}

fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    cleaned.trim_start_matches('.').to_string()
}

/// "CARDIO-YYYYMMDDHHMMSS"
pub fn report_id(at: DateTime<Local>) -> String {
    format!("CARDIO-{}", at.format("%Y%m%d%H%M%S"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportBundle {
    pub report_id: String,
    pub generated_at: DateTime<Local>,
    pub patient: PatientSummary,
    pub risk: RiskSection,
    pub recommendations: Vec<String>,
    pub clinical_notes: String,
    pub disclaimer: String,
    pub model_name: String,
}

impl ReportBundle {
    pub fn new(patient: PatientSummary, probability: f64, model_name: &str) -> Self {
        let generated_at = Local::now();
        let risk = RiskSection::from_probability(probability);
        let recommendations = recommendations::for_category(risk.category)
            .iter()
            .map(|r| r.to_string())
            .collect();

        Self {
            report_id: report_id(generated_at),
            generated_at,
            patient,
            risk,
            recommendations,
            clinical_notes: CLINICAL_NOTES.to_string(),
            disclaimer: DISCLAIMER.to_string(),
            model_name: model_name.to_string(),
        }
    }

    /// Report for a completed wizard run
    pub fn from_wizard(answers: &Answers, assessment: &RiskAssessment, model_name: &str) -> Self {
        let name = answers.name.trim();
        let patient = PatientSummary {
            name: (!name.is_empty()).then(|| name.to_string()),
            age: Some(answers.age as f64),
            gender: Some(answers.gender.label().to_string()),
            bmi: answers.bmi().ok(),
            systolic_bp: Some(answers.systolic_bp as f64),
            diastolic_bp: Some(answers.diastolic_bp as f64),
            cholesterol: Some(answers.cholesterol.label().to_string()),
        };

        Self::new(patient, assessment.probability, model_name)
    }

    /// "{Name_With_Underscores} Cardiovascular Health Report.{ext}"
    ///
    /// The name is reduced to ASCII alphanumerics, `_`, `-` and `.` (anything
    /// else becomes `_`, leading dots are dropped), so the result is always a
    /// single path component and a valid quoted header value.
    pub fn file_name(&self, extension: &str) -> String {
        let stem = self
            .patient
            .name
            .as_deref()
            .map(sanitize_file_stem)
            .unwrap_or_default();

        if stem.is_empty() {
            format!("Cardiovascular Health Report.{}", extension)
        } else {
            format!("{} Cardiovascular Health Report.{}", stem, extension)
        }
    }

    /// Plain-text rendering of the same content as the PDF
    pub fn to_text(&self) -> String {
        let mut lines = vec![
            "Cardiovascular Health Report".to_string(),
            "============================".to_string(),
            format!("Report ID: {}", self.report_id),
            String::new(),
            "Patient Summary".to_string(),
            format!("Name: {}", self.patient.name.as_deref().unwrap_or("N/A")),
            format!("Age: {} years", fmt_opt(self.patient.age)),
        ];
        if let Some(gender) = &self.patient.gender {
            lines.push(format!("Gender: {}", gender));
        }
        lines.push(format!(
            "BMI: {}",
            self.patient
                .bmi
                .map(|b| format!("{:.2}", b))
                .unwrap_or_else(|| "N/A".to_string())
        ));
        lines.push(format!("Blood Pressure: {} mmHg", self.patient.blood_pressure()));
        if let Some(chol) = &self.patient.cholesterol {
            lines.push(format!("Cholesterol: {}", chol));
        }

        lines.push(String::new());
        lines.push("Risk Assessment".to_string());
        lines.push(format!(
            "Predicted Cardiovascular Risk: {:.1}%",
            self.risk.percent()
        ));
        lines.push(format!("Risk Category: {}", self.risk.category.short()));
        lines.push(format!("Percentile: {}", self.risk.percentile));

        lines.push(String::new());
        lines.push("Recommendations".to_string());
        for rec in &self.recommendations {
            lines.push(format!("- {}", rec));
        }

        lines.push(String::new());
        lines.push(self.disclaimer.clone());
        lines.push(String::new());
        lines.push(format!("Model Used: {}", self.model_name));
        lines.push(format!(
            "Generated on: {}",
            self.generated_at.format("%d %b %Y, %I:%M %p")
        ));

        lines.join("\n") + "\n"
    }
}
