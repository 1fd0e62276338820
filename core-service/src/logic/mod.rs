//! Logic Module - scoring engine and assessment flow
//!
//! - `features/` - Patient feature layout, parsing and vitals validation
//! - `model/` - Classifier loading, inference, thresholds, latency buffer
//! - `scoring/` - Risk scoring, feature impacts, recommendations
//! - `wizard/` - Step-by-step assessment state machine
//! - `report/` - Health report content and PDF rendering

pub mod features;
pub mod model;
pub mod report;
pub mod scoring;
pub mod wizard;
