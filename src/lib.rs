//! Budget health, pay-alignment and income-shock resilience scoring.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;
