//! Report Module - health report content and rendering

pub mod bundle;
pub mod pdf;

use std::path::PathBuf;

pub use bundle::{
    percentile, report_id, PatientSummary, ReportBundle, RiskSection, CLINICAL_NOTES, CONFIDENTIALITY,
};
pub use pdf::PdfRenderer;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("no suitable fonts found (searched {0:?}); install Liberation fonts or set CARDIOML_FONT_DIR")]
    FontsUnavailable(Vec<PathBuf>),

    #[error("PDF render failed: {0}")]
    Render(String),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
