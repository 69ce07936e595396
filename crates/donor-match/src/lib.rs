//! Donor eligibility and priority scoring for blood request dispatch.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod matching;
pub mod records;
pub mod telemetry;
