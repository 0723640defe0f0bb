//! Configuration for the collection writer.
//!
//! CLI arguments with environment fallbacks using clap.

use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Reads and writes content collections to Neo4j
#[derive(Parser, Debug, Clone)]
#[command(name = "collection-rw-neo4j")]
#[command(about = "A RESTful API for managing content collections in Neo4j")]
pub struct Args {
    /// Neo4j Bolt endpoint
    #[arg(long, env = "NEO_URL", default_value = "bolt://localhost:7687")]
    pub neo_url: String,

    #[arg(long, env = "NEO_USER", default_value = "neo4j")]
    pub neo_user: String,

    #[arg(long, env = "NEO_PASSWORD", default_value = "password", hide_env_values = true)]
    pub neo_password: String,

    /// Port to listen on
    #[arg(long, env = "APP_PORT", default_value = "8080")]
    pub port: u16,

    /// Upper bound on one store batch, in seconds
    #[arg(long, env = "QUERY_TIMEOUT_SECS", default_value = "30")]
    pub query_timeout_secs: u64,

    /// Environment this app is running in
    #[arg(long, env = "APP_ENV", default_value = "local")]
    pub env: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Args {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.query_timeout_secs == 0 {
            return Err("QUERY_TIMEOUT_SECS must be greater than zero".to_string());
        }
        if self.neo_url.trim().is_empty() {
            return Err("NEO_URL must not be empty".to_string());
        }
        Ok(())
    }
}
