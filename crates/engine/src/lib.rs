//! Content collection writer library.
//!
//! Reads and writes ordered content collections (story packages, content
//! packages) to Neo4j over HTTP.
//!
//! ## Structure
//!
//! - `use_cases/` - Per-kind collection service
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition
//! - `config`, `telemetry` - Startup concerns

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod telemetry;
pub mod use_cases;

/// E2E integration tests using real Neo4j via testcontainers.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
