//! Request/response models

pub mod assessment;
pub mod prediction;
pub mod report;

pub use assessment::*;
pub use prediction::*;
pub use report::*;
