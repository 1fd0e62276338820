//! Wizard State - explicit step record for the assessment flow
//!
//! Transitions borrow the current state and return a new one, so a rejected
//! transition leaves the caller's state untouched.

use serde::{Deserialize, Serialize};

use crate::logic::features::{bmi, validate_bp, Level, PatientFeatures, VitalsError};

// ============================================================================
// STEPS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Dashboard,
    Patient,
    Vitals,
    Lifestyle,
    Report,
}

impl Step {
    pub fn index(self) -> u8 {
        match self {
            Step::Dashboard => 0,
            Step::Patient => 1,
            Step::Vitals => 2,
            Step::Lifestyle => 3,
            Step::Report => 4,
        }
    }

    /// "Step N of 4", none on the dashboard
    pub fn caption(self) -> Option<String> {
        match self {
            Step::Dashboard => None,
            other => Some(format!("Step {} of 4", other.index())),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Dashboard => "Model Performance Dashboard",
            Step::Patient => "Patient Information",
            Step::Vitals => "Clinical Vitals",
            Step::Lifestyle => "Lifestyle Factors",
            Step::Report => "Cardiovascular Health Report",
        }
    }

    fn is_form(self) -> bool {
        matches!(self, Step::Patient | Step::Vitals | Step::Lifestyle)
    }
}

// ============================================================================
// ANSWERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Gender {
    #[default]
    Female,
    Male,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Some(Gender::Female),
            "male" | "m" => Some(Gender::Male),
            _ => None,
        }
    }
}

/// Accumulated form answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answers {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: u32,
    pub weight_kg: u32,
    pub systolic_bp: u32,
    pub diastolic_bp: u32,
    pub cholesterol: Level,
    pub glucose: Level,
    pub smoker: bool,
    pub alcohol: bool,
    pub active: bool,
}

impl Default for Answers {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: 30,
            gender: Gender::Female,
            height_cm: 165,
            weight_kg: 65,
            systolic_bp: 120,
            diastolic_bp: 80,
            cholesterol: Level::Normal,
            glucose: Level::Normal,
            smoker: false,
            alcohol: false,
            active: true,
        }
    }
}

pub const AGE_RANGE: (u32, u32) = (20, 90);
pub const HEIGHT_RANGE: (u32, u32) = (140, 210);
pub const WEIGHT_RANGE: (u32, u32) = (40, 200);

impl Answers {
    pub fn bmi(&self) -> Result<f64, VitalsError> {
        bmi(self.height_cm as f64, self.weight_kg as f64)
    }

    /// Model input from the answers
    pub fn to_features(&self) -> Result<PatientFeatures, VitalsError> {
        Ok(PatientFeatures {
            age: self.age as f64,
            bmi: self.bmi()?,
            cholesterol: self.cholesterol.code() as f64,
            gluc: self.glucose.code() as f64,
            systolic_bp: self.systolic_bp as f64,
            diastolic_bp: self.diastolic_bp as f64,
            smoking_status: self.smoker as u8,
            alcohol_intake: self.alcohol as u8,
            physical_activity: self.active as u8,
        })
    }

    fn validate_patient(&self) -> Result<(), StepError> {
        if self.name.trim().is_empty() {
            return Err(StepError::NameRequired);
        }
        check_range("age", self.age, AGE_RANGE)?;
        check_range("height", self.height_cm, HEIGHT_RANGE)?;
        check_range("weight", self.weight_kg, WEIGHT_RANGE)?;
        Ok(())
    }

    fn validate_vitals(&self) -> Result<(), StepError> {
        validate_bp(self.systolic_bp as f64, self.diastolic_bp as f64)?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<(), StepError> {
    if value < min || value > max {
        return Err(StepError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepError {
    #[error("Please enter patient's full name before proceeding.")]
    NameRequired,

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("{0}")]
    Vitals(#[from] VitalsError),

    #[error("cannot {action} from step '{}'", .step.title())]
    InvalidTransition { action: &'static str, step: Step },
}

// ============================================================================
// STATE
// ============================================================================

/// Current step + accumulated answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    step: Step,
    answers: Answers,
    final_inputs: Option<Answers>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            step: Step::Dashboard,
            answers: Answers::default(),
            final_inputs: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// Answers frozen when the report was requested
    pub fn final_inputs(&self) -> Option<&Answers> {
        self.final_inputs.as_ref()
    }

    /// Dashboard → Patient
    pub fn start(&self) -> Result<Self, StepError> {
        match self.step {
            Step::Dashboard => Ok(self.moved_to(Step::Patient)),
            step => Err(StepError::InvalidTransition { action: "start", step }),
        }
    }

    /// Apply edits to the answers; only on form steps
    pub fn edit_answers(&self, edit: impl FnOnce(&mut Answers)) -> Result<Self, StepError> {
        if !self.step.is_form() {
            return Err(StepError::InvalidTransition {
                action: "edit answers",
                step: self.step,
            });
        }

        let mut next = self.clone();
        edit(&mut next.answers);
        Ok(next)
    }

    /// Validate the current step and move forward
    pub fn advance(&self) -> Result<Self, StepError> {
        match self.step {
            Step::Patient => {
                self.answers.validate_patient()?;
                Ok(self.moved_to(Step::Vitals))
            }
            Step::Vitals => {
                self.answers.validate_vitals()?;
                Ok(self.moved_to(Step::Lifestyle))
            }
            Step::Lifestyle => {
                let mut next = self.moved_to(Step::Report);
                next.final_inputs = Some(self.answers.clone());
                Ok(next)
            }
            step => Err(StepError::InvalidTransition { action: "advance", step }),
        }
    }

    /// Vitals → Patient, Lifestyle → Vitals
    pub fn back(&self) -> Result<Self, StepError> {
        match self.step {
            Step::Vitals => Ok(self.moved_to(Step::Patient)),
            Step::Lifestyle => Ok(self.moved_to(Step::Vitals)),
            step => Err(StepError::InvalidTransition { action: "go back", step }),
        }
    }

    /// Report → Patient, discarding the frozen inputs
    pub fn edit(&self) -> Result<Self, StepError> {
        match self.step {
            Step::Report => {
                let mut next = self.moved_to(Step::Patient);
                next.final_inputs = None;
                Ok(next)
            }
            step => Err(StepError::InvalidTransition { action: "edit", step }),
        }
    }

    /// Model input from the frozen answers
    pub fn features(&self) -> Result<PatientFeatures, StepError> {
        let inputs = self.final_inputs.as_ref().ok_or(StepError::InvalidTransition {
            action: "score",
            step: self.step,
        })?;
        Ok(inputs.to_features()?)
    }

    fn moved_to(&self, step: Step) -> Self {
        Self {
            step,
            answers: self.answers.clone(),
            final_inputs: self.final_inputs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_patient(name: &str) -> WizardState {
        WizardState::new()
            .start()
            .unwrap()
            .edit_answers(|a| a.name = name.to_string())
            .unwrap()
    }

    #[test]
    fn test_full_flow() {
        let state = at_patient("Jane Doe");
        assert_eq!(state.step().caption().as_deref(), Some("Step 1 of 4"));

        let state = state.advance().unwrap();
        assert_eq!(state.step(), Step::Vitals);

        let state = state.advance().unwrap();
        assert_eq!(state.step(), Step::Lifestyle);

        let state = state.edit_answers(|a| a.smoker = true).unwrap();
        let state = state.advance().unwrap();
        assert_eq!(state.step(), Step::Report);

        let inputs = state.final_inputs().unwrap();
        assert!(inputs.smoker);

        let features = state.features().unwrap();
        assert!((features.bmi - 23.88).abs() < 0.01);
        assert_eq!(features.smoking_status, 1);
        assert_eq!(features.physical_activity, 1);
        assert_eq!(features.cholesterol, 1.0);
    }

    #[test]
    fn test_blank_name_blocks() {
        let state = at_patient("   ");
        assert_eq!(state.advance(), Err(StepError::NameRequired));
        assert_eq!(state.step(), Step::Patient);
    }

    #[test]
    fn test_out_of_range_patient_fields() {
        let state = at_patient("A").edit_answers(|a| a.age = 95).unwrap();
        assert!(matches!(
            state.advance(),
            Err(StepError::OutOfRange { field: "age", .. })
        ));

        let state = at_patient("A").edit_answers(|a| a.weight_kg = 20).unwrap();
        assert!(matches!(
            state.advance(),
            Err(StepError::OutOfRange { field: "weight", .. })
        ));
    }

    #[test]
    fn test_bad_bp_blocks_vitals() {
        let vitals = at_patient("A").advance().unwrap();

        let bad = vitals
            .edit_answers(|a| {
                a.systolic_bp = 80;
                a.diastolic_bp = 90;
            })
            .unwrap();
        assert_eq!(
            bad.advance(),
            Err(StepError::Vitals(VitalsError::SystolicNotAboveDiastolic))
        );
        assert_eq!(bad.step(), Step::Vitals);

        let unrealistic = vitals
            .edit_answers(|a| {
                a.systolic_bp = 260;
                a.diastolic_bp = 90;
            })
            .unwrap();
        assert!(unrealistic.advance().is_err());
    }

    #[test]
    fn test_back_and_edit() {
        let vitals = at_patient("A").advance().unwrap();
        assert_eq!(vitals.back().unwrap().step(), Step::Patient);

        let lifestyle = vitals.advance().unwrap();
        assert_eq!(lifestyle.back().unwrap().step(), Step::Vitals);

        let report = lifestyle.advance().unwrap();
        assert!(report.final_inputs().is_some());

        let edited = report.edit().unwrap();
        assert_eq!(edited.step(), Step::Patient);
        assert!(edited.final_inputs().is_none());
        assert_eq!(edited.answers().name, "A");
    }

    #[test]
    fn test_invalid_transitions() {
        let dashboard = WizardState::new();
        assert!(dashboard.advance().is_err());
        assert!(dashboard.back().is_err());
        assert!(dashboard.edit().is_err());
        assert!(dashboard.features().is_err());
        assert!(dashboard.edit_answers(|a| a.age = 40).is_err());

        let patient = dashboard.start().unwrap();
        assert!(patient.start().is_err());
        assert!(patient.back().is_err());
    }
}
