//! Blog posts and visitor like/favorite interactions.
//!
//! Interactions are an append-only event log keyed by `(blog_id, visitor_id)`.
//! A visitor's current state is their latest event; counts are aggregated
//! from those latest events, never stored.

pub mod models;
pub mod queries;
pub mod routes;

pub use routes::router;
