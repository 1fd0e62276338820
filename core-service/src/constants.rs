//! Central Configuration Constants
//!
//! Single source of truth for defaults shared by the API server and the wizard.

use std::path::PathBuf;

/// Default model directory (relative to the working directory)
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Model card file inside the model directory
pub const MODEL_CARD_FILE: &str = "model_card.json";

/// Scaler parameters file inside the model directory
pub const SCALER_FILE: &str = "scaler.json";

/// Default directory for wizard reports
pub const DEFAULT_REPORT_DIR: &str = ".";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "CardioML";

/// Shown on every report
pub const DISCLAIMER: &str = "Disclaimer: This report is generated using a machine learning model \
and is intended for educational purposes only. It should not be used as a substitute for \
professional medical advice.";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Model directory from environment or default
pub fn get_model_dir() -> PathBuf {
    std::env::var("CARDIOML_MODEL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_DIR))
}

/// Report output directory from environment or default
pub fn get_report_dir() -> PathBuf {
    std::env::var("CARDIOML_REPORT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_REPORT_DIR))
}

/// Extra font directory searched first by the PDF renderer
pub fn get_font_dir() -> Option<PathBuf> {
    std::env::var("CARDIOML_FONT_DIR").ok().map(PathBuf::from)
}
