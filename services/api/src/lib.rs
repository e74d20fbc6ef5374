//! Storefront API service
//!
//! Exposed as a library so the integration tests can drive the
//! repositories, stats composer, and handlers directly.

pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod stats;
