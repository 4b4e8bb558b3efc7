//! Greenhouse-gas footprint engine.
//!
//! Activity records (fuel burned, refrigerant refilled, energy purchased, goods consumed,
//! waste generated, distance traveled) are normalized into canonical units, matched against
//! an immutable emission-factor registry and folded into a scope 1/2/3 footprint report.

pub mod activity_import;
pub mod config;
pub mod emissions;
pub mod error;
pub mod telemetry;
