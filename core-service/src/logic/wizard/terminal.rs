//! Terminal front-end for the assessment wizard
//!
//! Line-oriented: every prompt shows the current value and an empty line
//! keeps it. EOF at any prompt ends the session.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use super::state::{Answers, Gender, Step, StepError, WizardState};
use crate::logic::features::Level;
use crate::logic::model::{ModelCard, ModelHandle};
use crate::logic::report::{PdfRenderer, ReportBundle, ReportError};
use crate::logic::scoring::RiskScorer;

/// Everything the wizard needs besides its I/O
pub struct WizardContext<'a> {
    pub scorer: &'a RiskScorer,
    pub model: Option<&'a ModelHandle>,
    pub renderer: &'a PdfRenderer,
    pub report_dir: PathBuf,
}

/// What a session produced
#[derive(Debug, Default)]
pub struct WizardOutcome {
    pub reports: Vec<PathBuf>,
    pub last_state: Option<WizardState>,
}

enum Nav {
    Next,
    Back,
    Quit,
}

/// Run the wizard until the user quits or input ends
pub fn run<R: BufRead, W: Write>(
    ctx: &WizardContext<'_>,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<WizardOutcome> {
    let default_card = ModelCard::default();
    let card = ctx.model.map(|m| m.card()).unwrap_or(&default_card);

    let mut outcome = WizardOutcome::default();
    let mut state = WizardState::new();

    writeln!(out, "Cardiovascular Health Assessment")?;
    writeln!(out, "ML-powered system to estimate cardiovascular disease risk")?;
    writeln!(out)?;

    loop {
        outcome.last_state = Some(state.clone());

        if let Some(caption) = state.step().caption() {
            writeln!(out, "{}", caption)?;
        }
        writeln!(out, "== {} ==", state.step().title())?;

        let next = match state.step() {
            Step::Dashboard => {
                render_dashboard(card, ctx.model.is_some(), out)?;
                match prompt(input, out, "Start health assessment? [Y/n]", "y")? {
                    Some(answer) if is_no(&answer) => None,
                    Some(_) => Some(state.start()?),
                    None => None,
                }
            }
            Step::Patient => form_step(&state, input, out, ask_patient)?,
            Step::Vitals => form_step(&state, input, out, ask_vitals)?,
            Step::Lifestyle => form_step(&state, input, out, ask_lifestyle)?,
            Step::Report => {
                let path = produce_report(ctx, &state, card, out)?;
                outcome.reports.push(path);

                match prompt(input, out, "[e]dit information or [q]uit", "q")? {
                    Some(answer) if answer.trim().eq_ignore_ascii_case("e") => Some(state.edit()?),
                    _ => None,
                }
            }
        };

        match next {
            Some(next) => state = next,
            None => break,
        }
        writeln!(out)?;
    }

    writeln!(out, "Goodbye.")?;
    Ok(outcome)
}

// ============================================================================
// STEPS
// ============================================================================

type AskFn<R, W> = fn(&Answers, &mut R, &mut W) -> io::Result<Option<Answers>>;

/// Collect a form step, then navigate. Validation failures repeat the step.
fn form_step<R: BufRead, W: Write>(
    state: &WizardState,
    input: &mut R,
    out: &mut W,
    ask: AskFn<R, W>,
) -> anyhow::Result<Option<WizardState>> {
    let mut current = state.clone();

    loop {
        let Some(answers) = ask(current.answers(), input, out)? else {
            return Ok(None);
        };
        current = current.edit_answers(|a| *a = answers)?;

        let can_go_back = current.step() != Step::Patient;
        let label = match (current.step(), can_go_back) {
            (Step::Lifestyle, _) => "[Enter] generate health report, [b]ack, [q]uit",
            (_, true) => "[Enter] next, [b]ack, [q]uit",
            (_, false) => "[Enter] next, [q]uit",
        };

        let nav = match prompt(input, out, label, "")? {
            None => Nav::Quit,
            Some(a) if a.trim().eq_ignore_ascii_case("q") => Nav::Quit,
            Some(a) if can_go_back && a.trim().eq_ignore_ascii_case("b") => Nav::Back,
            Some(_) => Nav::Next,
        };

        match nav {
            Nav::Quit => return Ok(None),
            Nav::Back => return Ok(Some(current.back()?)),
            Nav::Next => match current.advance() {
                Ok(next) => return Ok(Some(next)),
                Err(err @ (StepError::NameRequired
                | StepError::OutOfRange { .. }
                | StepError::Vitals(_))) => {
                    log::debug!("Step {:?} blocked: {}", current.step(), err);
                    writeln!(out, "Warning: {}", err)?;
                }
                Err(other) => return Err(other.into()),
            },
        }
    }
}

fn ask_patient<R: BufRead, W: Write>(
    answers: &Answers,
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<Answers>> {
    let mut a = answers.clone();

    let Some(name) = prompt(input, out, "Full Name", &a.name)? else {
        return Ok(None);
    };
    a.name = name;

    let Some(age) = ask_number(input, out, "Age (Years, 20-90)", a.age)? else {
        return Ok(None);
    };
    a.age = age;

    let Some(gender) = ask_choice(input, out, "Gender (Female/Male)", a.gender, Gender::parse)?
    else {
        return Ok(None);
    };
    a.gender = gender;

    let Some(height) = ask_number(input, out, "Height (cm, 140-210)", a.height_cm)? else {
        return Ok(None);
    };
    a.height_cm = height;

    let Some(weight) = ask_number(input, out, "Weight (kg, 40-200)", a.weight_kg)? else {
        return Ok(None);
    };
    a.weight_kg = weight;

    Ok(Some(a))
}

fn ask_vitals<R: BufRead, W: Write>(
    answers: &Answers,
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<Answers>> {
    let mut a = answers.clone();
    writeln!(out, "Blood pressure format: Systolic / Diastolic (e.g. 120 / 80 mmHg)")?;

    let Some(sys) = ask_number(input, out, "Systolic BP", a.systolic_bp)? else {
        return Ok(None);
    };
    a.systolic_bp = sys;

    let Some(dia) = ask_number(input, out, "Diastolic BP", a.diastolic_bp)? else {
        return Ok(None);
    };
    a.diastolic_bp = dia;

    let level_hint = "(Normal / Above Normal / Well Above Normal)";
    let Some(chol) = ask_choice(
        input,
        out,
        &format!("Cholesterol Level {}", level_hint),
        a.cholesterol,
        Level::parse,
    )?
    else {
        return Ok(None);
    };
    a.cholesterol = chol;

    let Some(gluc) = ask_choice(
        input,
        out,
        &format!("Glucose Level {}", level_hint),
        a.glucose,
        Level::parse,
    )?
    else {
        return Ok(None);
    };
    a.glucose = gluc;

    Ok(Some(a))
}

fn ask_lifestyle<R: BufRead, W: Write>(
    answers: &Answers,
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<Answers>> {
    let mut a = answers.clone();

    let Some(smoker) = ask_yes_no(input, out, "Smoking (Yes/No)", a.smoker)? else {
        return Ok(None);
    };
    a.smoker = smoker;

    let Some(alcohol) = ask_yes_no(input, out, "Alcohol Consumption (Yes/No)", a.alcohol)? else {
        return Ok(None);
    };
    a.alcohol = alcohol;

    let Some(active) = ask_choice(
        input,
        out,
        "Physical Activity (Inactive/Active)",
        a.active,
        parse_activity,
    )?
    else {
        return Ok(None);
    };
    a.active = active;

    Ok(Some(a))
}

fn render_dashboard<W: Write>(card: &ModelCard, loaded: bool, out: &mut W) -> io::Result<()> {
    if !loaded {
        writeln!(out, "(no model artifact found - using placeholder scoring)")?;
    }

    if card.candidates.is_empty() {
        writeln!(out, "{:<32} {:>7.2}%  * selected", card.name, card.accuracy * 100.0)?;
        return Ok(());
    }

    for (name, accuracy) in &card.candidates {
        let bar = "#".repeat((accuracy.clamp(0.0, 1.0) * 40.0).round() as usize);
        let marker = if *name == card.name { "  * selected" } else { "" };
        writeln!(out, "{:<32} {:>7.2}% {}{}", name, accuracy * 100.0, bar, marker)?;
    }
    Ok(())
}

fn produce_report<W: Write>(
    ctx: &WizardContext<'_>,
    state: &WizardState,
    card: &ModelCard,
    out: &mut W,
) -> anyhow::Result<PathBuf> {
    let answers = state
        .final_inputs()
        .ok_or(StepError::InvalidTransition {
            action: "render report",
            step: state.step(),
        })?;
    let features = state.features()?;
    let assessment = ctx.scorer.score(&features, ctx.model)?;
    let bundle = ReportBundle::from_wizard(answers, &assessment, &card.name);

    if let Some(name) = &bundle.patient.name {
        writeln!(out, "Patient Name: {}", name)?;
    }
    writeln!(
        out,
        "Age: {} yrs | BMI: {:.2} | Blood Pressure: {}",
        answers.age,
        features.bmi,
        bundle.patient.blood_pressure()
    )?;
    writeln!(
        out,
        "Risk: {:.1}% - {}",
        bundle.risk.percent(),
        assessment.category
    )?;
    writeln!(out, "Recommended Actions:")?;
    for rec in &bundle.recommendations {
        writeln!(out, "  - {}", rec)?;
    }
    writeln!(out, "This report is generated using a machine learning model and is for educational purposes only.")?;

    let path = write_report(ctx.renderer, &bundle, &ctx.report_dir)?;
    writeln!(out, "Report saved to {}", path.display())?;
    Ok(path)
}

/// Write the PDF, or a text report when no fonts are available
pub fn write_report(
    renderer: &PdfRenderer,
    bundle: &ReportBundle,
    dir: &Path,
) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir)?;

    let (path, bytes) = match renderer.render(bundle) {
        Ok(bytes) => (dir.join(bundle.file_name("pdf")), bytes),
        Err(ReportError::FontsUnavailable(searched)) => {
            log::warn!(
                "No PDF fonts found in {:?}; writing plain-text report instead",
                searched
            );
            (dir.join(bundle.file_name("txt")), bundle.to_text().into_bytes())
        }
        Err(other) => return Err(other),
    };

    std::fs::write(&path, bytes)?;
    log::info!("Report {} written to {}", bundle.report_id, path.display());
    Ok(path)
}

// ============================================================================
// PROMPTS
// ============================================================================

/// Prompt once; None on EOF, the default on an empty line
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    default: &str,
) -> io::Result<Option<String>> {
    if default.is_empty() {
        write!(out, "{}: ", label)?;
    } else {
        write!(out, "{} [{}]: ", label, default)?;
    }
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        Ok(Some(default.to_string()))
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

fn ask_number<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    current: u32,
) -> io::Result<Option<u32>> {
    ask_choice(input, out, label, current, |s| s.trim().parse::<u32>().ok())
}

fn ask_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    current: bool,
) -> io::Result<Option<bool>> {
    loop {
        let default = if current { "Yes" } else { "No" };
        let Some(answer) = prompt(input, out, label, default)? else {
            return Ok(None);
        };
        match answer.to_ascii_lowercase().as_str() {
            "yes" | "y" => return Ok(Some(true)),
            "no" | "n" => return Ok(Some(false)),
            _ => writeln!(out, "Please answer Yes or No.")?,
        }
    }
}

/// Re-prompt until `parse` accepts the answer
fn ask_choice<R: BufRead, W: Write, T: ChoiceLabel + Copy>(
    input: &mut R,
    out: &mut W,
    label: &str,
    current: T,
    parse: impl Fn(&str) -> Option<T>,
) -> io::Result<Option<T>> {
    loop {
        let Some(answer) = prompt(input, out, label, &current.choice_label())? else {
            return Ok(None);
        };
        match parse(&answer) {
            Some(value) => return Ok(Some(value)),
            None => writeln!(out, "Invalid value '{}', please try again.", answer)?,
        }
    }
}

fn parse_activity(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "active" | "a" => Some(true),
        "inactive" | "i" => Some(false),
        _ => None,
    }
}

fn is_no(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "n" | "no" | "q")
}

/// Display form of a prompt's current value
trait ChoiceLabel {
    fn choice_label(&self) -> String;
}

impl ChoiceLabel for u32 {
    fn choice_label(&self) -> String {
        self.to_string()
    }
}

impl ChoiceLabel for Gender {
    fn choice_label(&self) -> String {
        self.label().to_string()
    }
}

impl ChoiceLabel for Level {
    fn choice_label(&self) -> String {
        self.label().to_string()
    }
}

impl ChoiceLabel for bool {
    fn choice_label(&self) -> String {
        if *self { "Active" } else { "Inactive" }.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn context<'a>(
        scorer: &'a RiskScorer,
        renderer: &'a PdfRenderer,
        dir: &Path,
    ) -> WizardContext<'a> {
        WizardContext {
            scorer,
            model: None,
            renderer,
            report_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_full_session_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let fonts = tempfile::tempdir().unwrap();
        let scorer = RiskScorer::default();
        let renderer = PdfRenderer::with_font_dirs(vec![fonts.path().to_path_buf()]);
        let ctx = context(&scorer, &renderer, dir.path());

        // dashboard, patient (name + 4 defaults), nav, vitals (4 defaults), nav,
        // lifestyle (smoker yes, 2 defaults), nav, quit
        let script = "\nJane Doe\n\n\n\n\n\n\n\n\n\n\nyes\n\n\n\nq\n";
        let mut input = Cursor::new(script.as_bytes());
        let mut output = Vec::new();

        let outcome = run(&ctx, &mut input, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert_eq!(outcome.reports.len(), 1);
        let path = &outcome.reports[0];
        assert!(path.exists());
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "Jane_Doe Cardiovascular Health Report.txt"
        );
        assert!(text.contains("Step 4 of 4"));
        assert!(text.contains("BMI: 23.88"));
        assert_eq!(scorer.latency().len(), 1);

        let last = outcome.last_state.unwrap();
        assert_eq!(last.step(), Step::Report);
        assert!(last.final_inputs().unwrap().smoker);
    }

    #[test]
    fn test_report_stays_inside_report_dir() {
        let fonts = tempfile::tempdir().unwrap();
        let renderer = PdfRenderer::with_font_dirs(vec![fonts.path().to_path_buf()]);

        for (name, expected) in [
            ("Jane/Doe", "Jane_Doe Cardiovascular Health Report.txt"),
            ("../../escaped", "_.._escaped Cardiovascular Health Report.txt"),
        ] {
            let dir = tempfile::tempdir().unwrap();
            let scorer = RiskScorer::default();
            let ctx = context(&scorer, &renderer, dir.path());

            let script = format!("\n{}\n\n\n\n\n\n\n\n\n\n\n\n\n\n\nq\n", name);
            let mut input = Cursor::new(script.into_bytes());
            let mut output = Vec::new();

            let outcome = run(&ctx, &mut input, &mut output).unwrap();

            assert_eq!(outcome.reports.len(), 1, "name {:?}", name);
            let path = &outcome.reports[0];
            assert_eq!(path.parent(), Some(dir.path()));
            assert_eq!(path.file_name().unwrap().to_str().unwrap(), expected);
            assert!(path.exists());
        }
    }

    #[test]
    fn test_blank_name_repeats_step() {
        let dir = tempfile::tempdir().unwrap();
        let scorer = RiskScorer::default();
        let renderer = PdfRenderer::with_font_dirs(vec![]);
        let ctx = context(&scorer, &renderer, dir.path());

        // blank name, then nav Enter → warning, then input ends
        let script = "\n\n\n\n\n\n\n";
        let mut input = Cursor::new(script.as_bytes());
        let mut output = Vec::new();

        let outcome = run(&ctx, &mut input, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.contains("Please enter patient's full name"));
        assert!(outcome.reports.is_empty());
        assert_eq!(outcome.last_state.unwrap().step(), Step::Patient);
    }

    #[test]
    fn test_bad_bp_blocks_progression() {
        let dir = tempfile::tempdir().unwrap();
        let scorer = RiskScorer::default();
        let renderer = PdfRenderer::with_font_dirs(vec![]);
        let ctx = context(&scorer, &renderer, dir.path());

        // patient ok, vitals 80/90 → blocked, then quit
        let script = "\nA\n\n\n\n\n\n80\n90\n\n\n\nq\n";
        let mut input = Cursor::new(script.as_bytes());
        let mut output = Vec::new();

        let outcome = run(&ctx, &mut input, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.contains("Systolic BP must be higher than Diastolic BP."));
        assert!(!text.contains("Step 3 of 4"));
        assert!(outcome.reports.is_empty());
    }

    #[test]
    fn test_decline_on_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let scorer = RiskScorer::default();
        let renderer = PdfRenderer::with_font_dirs(vec![]);
        let ctx = context(&scorer, &renderer, dir.path());

        let mut input = Cursor::new(b"n\n".as_slice());
        let mut output = Vec::new();
        let outcome = run(&ctx, &mut input, &mut output).unwrap();

        assert!(outcome.reports.is_empty());
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Random Forest Classifier"));
        assert!(text.contains("placeholder scoring"));
    }
}
