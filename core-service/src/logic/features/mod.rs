//! Features Module - Patient feature assembly
//!
//! Layout, parsing and vitals checks. Everything the model sees goes
//! through `PatientFeatures`.

pub mod layout;
pub mod vector;
pub mod vitals;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{feature_label, layout_hash, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use vector::{FeatureError, PatientFeatures};
pub use vitals::{bmi, validate_bp, Level, VitalsError};
