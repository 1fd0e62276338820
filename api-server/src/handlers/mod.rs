//! HTTP handlers

pub mod assessment;
pub mod health;
pub mod predict;
pub mod report;
