//! Read-only project portfolio.

pub mod models;
pub mod queries;
pub mod routes;

pub use routes::router;
