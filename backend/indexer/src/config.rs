//! Application configuration loaded from environment variables.

use crate::errors::{IndexerError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Soroban RPC endpoint (e.g. https://soroban-testnet.stellar.org)
    pub rpc_url: String,
    /// The CourseManager contract address (Strkey format)
    pub contract_id: String,
    /// Path to the SQLite database file
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// How often (in seconds) to poll the RPC for new events
    pub poll_interval_secs: u64,
    /// Maximum number of events to fetch per RPC request
    pub events_per_page: u32,
    /// Ledger to start from if no cursor is saved
    pub start_ledger: u32,
    /// Delay between `getTransaction` checks while awaiting finality
    pub finality_poll_secs: u64,
    /// Give up awaiting finality after this many seconds
    pub finality_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            rpc_url: env_var("RPC_URL")
                .unwrap_or_else(|_| "https://soroban-testnet.stellar.org".to_string()),
            contract_id: env_var("CONTRACT_ID").map_err(|_| {
                IndexerError::Config("CONTRACT_ID environment variable is required".to_string())
            })?,
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./course_events.db".to_string()),
            api_port: parse_var("API_PORT", "3001")?,
            poll_interval_secs: parse_var("POLL_INTERVAL_SECS", "5")?,
            events_per_page: parse_var("EVENTS_PER_PAGE", "100")?,
            start_ledger: parse_var("START_LEDGER", "0")?,
            finality_poll_secs: parse_var("FINALITY_POLL_SECS", "2")?,
            finality_timeout_secs: parse_var("FINALITY_TIMEOUT_SECS", "60")?,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| IndexerError::Config(format!("Missing env var: {key}")))
}

/// Read `key`, falling back to `default`, and parse it.
fn parse_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T> {
    env_var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| IndexerError::Config(format!("Invalid {key}")))
}
