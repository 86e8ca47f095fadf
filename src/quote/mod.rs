//! Website quote calculator.

pub mod calculators;
pub mod routes;

pub use calculators::{calculate_price, DesignLevel};
pub use routes::router;
