//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event parse error: {0}")]
    EventParse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The ledger executed the transaction and rejected it.
    #[error("Transaction {0} was rejected by the ledger")]
    Rejected(String),

    /// The transaction was not finalized within the configured window.
    #[error("Timed out awaiting finality of transaction {0}")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, IndexerError>;
