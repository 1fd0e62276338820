//! PDF Renderer
//!
//! Rendering strategy: `genpdf` (pure Rust). Fonts are embedded, so a
//! Liberation Sans family must be found on disk.

use std::path::PathBuf;

use genpdf::elements::{Break, Paragraph};
use genpdf::fonts;
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Document, Element, SimplePageDecorator};

use super::bundle::ReportBundle;
use super::ReportError;
use crate::constants::get_font_dir;

/// System font directories to search
const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/TTF",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "C:\\Windows\\Fonts",
];

const FONT_FAMILY: &str = "LiberationSans";

const GREY: Color = Color::Rgb(110, 110, 110);

/// PDF renderer for health reports
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    font_dirs: Vec<PathBuf>,
}

impl PdfRenderer {
    /// Search `CARDIOML_FONT_DIR` first, then the system directories
    pub fn new() -> Self {
        let mut font_dirs: Vec<PathBuf> = FONT_DIRS.iter().map(PathBuf::from).collect();
        if let Some(dir) = get_font_dir() {
            font_dirs.insert(0, dir);
        }
        Self { font_dirs }
    }

    /// Only search the given directories
    pub fn with_font_dirs(font_dirs: Vec<PathBuf>) -> Self {
        Self { font_dirs }
    }

    fn load_fonts(&self) -> Result<fonts::FontFamily<fonts::FontData>, ReportError> {
        self.font_dirs
            .iter()
            .filter(|dir| dir.exists())
            .find_map(|dir| fonts::from_files(dir, FONT_FAMILY, None).ok())
            .ok_or_else(|| ReportError::FontsUnavailable(self.font_dirs.clone()))
    }

    /// Render a bundle to PDF bytes
    pub fn render(&self, bundle: &ReportBundle) -> Result<Vec<u8>, ReportError> {
        let font_family = self.load_fonts()?;

        let mut doc = Document::new(font_family);
        doc.set_title(format!("Cardiovascular Health Report - {}", bundle.report_id));
        doc.set_minimal_conformance();
        doc.set_line_spacing(1.25);

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(15);
        doc.set_page_decorator(decorator);

        // Title
        doc.push(
            Paragraph::new("Cardiovascular Health Report")
                .aligned(Alignment::Center)
                .styled(Style::new().bold().with_font_size(16)),
        );
        doc.push(
            Paragraph::new(format!("Report ID: {}", bundle.report_id))
                .aligned(Alignment::Center)
                .styled(Style::new().with_font_size(9).with_color(GREY)),
        );
        doc.push(Break::new(1.0));

        // Patient summary
        let patient = &bundle.patient;
        push_heading(&mut doc, "Patient Summary");
        push_line(&mut doc, format!("Name: {}", patient.name.as_deref().unwrap_or("N/A")));
        if let Some(age) = patient.age {
            push_line(&mut doc, format!("Age: {} years", age));
        }
        if let Some(gender) = &patient.gender {
            push_line(&mut doc, format!("Gender: {}", gender));
        }
        if let Some(bmi) = patient.bmi {
            push_line(&mut doc, format!("BMI: {:.2}", bmi));
        }
        push_line(&mut doc, format!("Blood Pressure: {} mmHg", patient.blood_pressure()));
        if let Some(chol) = &patient.cholesterol {
            push_line(&mut doc, format!("Cholesterol: {}", chol));
        }
        doc.push(Break::new(0.5));

        // Risk
        push_heading(&mut doc, "Risk Assessment");
        push_line(
            &mut doc,
            format!("Predicted Cardiovascular Risk: {:.1}%", bundle.risk.percent()),
        );
        push_line(&mut doc, format!("Risk Category: {}", bundle.risk.category.short()));
        push_line(&mut doc, format!("Percentile: {}", bundle.risk.percentile));
        doc.push(Break::new(0.5));

        // Recommendations
        push_heading(&mut doc, "Recommendations");
        for rec in &bundle.recommendations {
            push_line(&mut doc, format!("- {}", rec));
        }
        doc.push(Break::new(1.0));

        doc.push(
            Paragraph::new(bundle.disclaimer.as_str())
                .styled(Style::new().italic().with_font_size(9)),
        );
        doc.push(Break::new(1.5));

        // Footer
        doc.push(
            Paragraph::new(format!("Model Used: {}", bundle.model_name))
                .styled(Style::new().with_font_size(9).with_color(GREY)),
        );
        doc.push(
            Paragraph::new(format!(
                "Generated on: {}",
                bundle.generated_at.format("%d %b %Y, %I:%M %p")
            ))
            .aligned(Alignment::Right)
            .styled(Style::new().with_font_size(9).with_color(GREY)),
        );

        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| ReportError::Render(e.to_string()))?;

        log::debug!("Rendered report {} ({} bytes)", bundle.report_id, buffer.len());
        Ok(buffer)
    }
}

fn push_heading(doc: &mut Document, text: &str) {
    doc.push(Paragraph::new(text).styled(Style::new().bold().with_font_size(12)));
}

fn push_line(doc: &mut Document, text: String) {
    doc.push(Paragraph::new(text).styled(Style::new().with_font_size(11)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::report::bundle::PatientSummary;

    fn bundle() -> ReportBundle {
        ReportBundle::new(
            PatientSummary {
                name: Some("Jane Doe".to_string()),
                age: Some(54.0),
                bmi: Some(24.2),
                systolic_bp: Some(128.0),
                diastolic_bp: Some(82.0),
                ..Default::default()
            },
            0.42,
            "Random Forest Classifier",
        )
    }

    #[test]
    fn test_missing_fonts_reported() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PdfRenderer::with_font_dirs(vec![dir.path().to_path_buf()]);

        let err = renderer.render(&bundle()).unwrap_err();
        assert!(matches!(err, ReportError::FontsUnavailable(_)));
    }

    #[test]
    fn test_render_when_fonts_present() {
        // Only meaningful on hosts with Liberation fonts installed
        match PdfRenderer::new().render(&bundle()) {
            Ok(bytes) => assert!(bytes.starts_with(b"%PDF-")),
            Err(ReportError::FontsUnavailable(_)) => {}
            Err(other) => panic!("unexpected render error: {other}"),
        }
    }
}
