//! Marketplace of ready-made house designs.
//!
//! Product listing with filters, the filter definitions the front end
//! renders, product publishing and per-visitor favorites.

pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

pub use routes::router;
