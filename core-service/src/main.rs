//! CardioML Assessment Wizard - Main Entry Point

use std::io;

use cardioml_core::constants::{self, get_model_dir, get_report_dir};
use cardioml_core::logic::model::ModelHandle;
use cardioml_core::logic::report::PdfRenderer;
use cardioml_core::logic::scoring::RiskScorer;
use cardioml_core::logic::wizard::{self, WizardContext};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} wizard v{}", constants::APP_NAME, constants::APP_VERSION);

    let model_dir = get_model_dir();
    let model = match ModelHandle::load(&model_dir) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("Model not loaded from {}: {}", model_dir.display(), e);
            log::warn!("Using placeholder scoring");
            None
        }
    };

    let scorer = RiskScorer::default();
    let renderer = PdfRenderer::new();
    let ctx = WizardContext {
        scorer: &scorer,
        model: model.as_ref(),
        renderer: &renderer,
        report_dir: get_report_dir(),
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let outcome = wizard::run(&ctx, &mut input, &mut output)?;
    log::info!("Session finished, {} report(s) written", outcome.reports.len());

    Ok(())
}
