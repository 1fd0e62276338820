//! Recommendations - rule-based follow-up advice

use crate::logic::features::PatientFeatures;
use crate::logic::model::RiskCategory;

pub const CONSULT_PROVIDER: &str = "Consult with healthcare provider for personalized advice";

/// Advice derived from individual vitals (API responses)
pub fn for_features(features: &PatientFeatures) -> Vec<String> {
    let mut recs = Vec::new();

    if features.systolic_bp > 130.0 {
        recs.push("Monitor blood pressure regularly".to_string());
    }
    if features.cholesterol > 240.0 {
        recs.push("Consider cholesterol management".to_string());
    }
    if features.physical_activity == 0 {
        recs.push("Increase physical activity".to_string());
    }
    recs.push(CONSULT_PROVIDER.to_string());

    recs
}

/// Advice for a risk band (reports)
pub fn for_category(category: RiskCategory) -> &'static [&'static str] {
    match category {
        RiskCategory::Low => &[
            "Maintain active lifestyle",
            "Follow balanced diet",
            "Annual health screening recommended",
        ],
        RiskCategory::Moderate => &[
            "Increase physical activity",
            "Monitor blood pressure regularly",
            "Adopt preventive lifestyle measures",
        ],
        RiskCategory::High => &[
            "Consult a cardiologist",
            "Monitor blood pressure regularly",
            "Adopt heart-healthy lifestyle changes",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_patient_gets_only_consult() {
        let recs = for_features(&PatientFeatures::default());
        assert_eq!(recs, vec![CONSULT_PROVIDER.to_string()]);
    }

    #[test]
    fn test_rules_fire() {
        let features = PatientFeatures {
            systolic_bp: 150.0,
            cholesterol: 260.0,
            physical_activity: 0,
            ..Default::default()
        };
        let recs = for_features(&features);
        assert_eq!(recs.len(), 4);
        assert_eq!(recs[0], "Monitor blood pressure regularly");
        assert_eq!(recs.last().map(String::as_str), Some(CONSULT_PROVIDER));
    }

    #[test]
    fn test_category_advice() {
        assert_eq!(for_category(RiskCategory::High)[0], "Consult a cardiologist");
        assert_eq!(for_category(RiskCategory::Low).len(), 3);
    }
}
