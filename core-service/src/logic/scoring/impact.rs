//! Feature Impact - normalized importance breakdown

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::logic::features::{feature_label, FEATURE_LAYOUT};
use crate::logic::model::ModelHandle;

/// Used when no model (or no importances) is available
pub const STATIC_IMPACTS: &[(&str, f64)] = &[
    ("systolic_bp", 68.9),
    ("age", 12.8),
    ("cholesterol", 7.2),
    ("diastolic_bp", 3.1),
    ("smoking_status", 2.8),
    ("bmi", 2.5),
    ("physical_activity", 1.9),
    ("alcohol_intake", 0.8),
];

/// One row of the sorted importance listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub name: String,
    pub label: String,
    pub value: f64,
}

/// Feature name → percentage of total importance (one decimal)
pub fn feature_impacts(model: Option<&ModelHandle>) -> BTreeMap<String, f64> {
    model
        .and_then(|m| m.card().feature_importances.as_deref())
        .and_then(normalize)
        .unwrap_or_else(static_impacts)
}

/// Normalize raw importances to percentages; None when they sum to zero
pub fn normalize(importances: &[f64]) -> Option<BTreeMap<String, f64>> {
    let total: f64 = importances.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return None;
    }

    Some(
        FEATURE_LAYOUT
            .iter()
            .zip(importances)
            .map(|(name, value)| (name.to_string(), round1(value / total * 100.0)))
            .collect(),
    )
}

fn static_impacts() -> BTreeMap<String, f64> {
    STATIC_IMPACTS
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

/// Impacts sorted by value, largest first, with display labels
pub fn feature_importance_list(model: Option<&ModelHandle>) -> Vec<FeatureImportance> {
    let mut list: Vec<FeatureImportance> = feature_impacts(model)
        .into_iter()
        .map(|(name, value)| FeatureImportance {
            label: feature_label(&name),
            name,
            value,
        })
        .collect();

    list.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    list
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
