//! Impact-Graph Library
//!
//! Entity connection graph service for news impact visualization.
//!
//! # Key Features
//! - Co-occurrence graph builder: article→entity mention rows in, weighted
//!   undirected graph out, capped for UI-scale force-directed rendering
//! - Explicit relationship merging with a named duplicate-resolution policy
//! - Trending entity ranking by article count
//! - REST API with Prometheus metrics and structured errors
//!
//! The builder core is pure and request-scoped: data access sits behind the
//! [`source::NewsDataSource`] trait, layout/rendering belongs to the client.

pub mod config;
pub mod constants;
pub mod errors;
pub mod graph;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod model;
pub mod source;
pub mod tracing_setup;
pub mod validation;

// Re-export dependencies so tests use the same versions
pub use chrono;
pub use uuid;
