//! Wizard Module - the four-step assessment flow
//!
//! `state` holds the transition rules, `terminal` drives them over a
//! line-oriented reader/writer pair.

pub mod state;
pub mod terminal;

pub use state::{Answers, Gender, Step, StepError, WizardState};
pub use terminal::{run, write_report, WizardContext, WizardOutcome};
