//! Design area calculator and its catalog.
//!
//! Turns a plot area plus the options a visitor picked into area usage,
//! occupancy and a total price, and stores each calculation.

pub mod calculators;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{compute, compute_with_ratio, DesignCalculationResult, DesignOption, BASIC_AREA_RATIO};
pub use routes::router;
