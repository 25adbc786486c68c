//! Waiting for a submitted transaction to reach a closed ledger.
//!
//! A caller that submits `claim_certificate` (or any other mutation) must not
//! report success until the transaction is finalized. [`await_finalization`]
//! polls `getTransaction` until the ledger reports success or failure, or the
//! configured window runs out.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::errors::{IndexerError, Result};
use crate::rpc::{self, TxStatus};

/// Length in bytes of a Stellar transaction hash.
const TX_HASH_LEN: usize = 32;

/// Reject anything that is not a 64-character hex transaction hash.
pub fn validate_tx_hash(tx_hash: &str) -> Result<()> {
    let bytes = hex::decode(tx_hash)
        .map_err(|e| IndexerError::InvalidInput(format!("tx hash is not hex: {e}")))?;
    if bytes.len() != TX_HASH_LEN {
        return Err(IndexerError::InvalidInput(format!(
            "tx hash must be {TX_HASH_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(())
}

/// Block until `tx_hash` is finalized and return its ledger sequence.
///
/// Fails with [`IndexerError::Rejected`] if the ledger applied the transaction
/// as failed and [`IndexerError::Timeout`] if it is still unknown after
/// `timeout`.
pub async fn await_finalization(
    client: &Client,
    rpc_url: &str,
    tx_hash: &str,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<u64> {
    poll_until_final(tx_hash, poll_interval, timeout, || {
        rpc::get_transaction(client, rpc_url, tx_hash)
    })
    .await
}

async fn poll_until_final<F, Fut>(
    tx_hash: &str,
    poll_interval: Duration,
    timeout: Duration,
    mut fetch: F,
) -> Result<u64>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<TxStatus>>,
{
    validate_tx_hash(tx_hash)?;

    tokio::time::timeout(timeout, poll_loop(tx_hash, poll_interval, &mut fetch))
        .await
        .map_err(|_| IndexerError::Timeout(tx_hash.to_string()))?
}

async fn poll_loop<F, Fut>(tx_hash: &str, poll_interval: Duration, fetch: &mut F) -> Result<u64>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<TxStatus>>,
{
    loop {
        match fetch().await? {
            TxStatus::Success { ledger } => {
                info!("Transaction {tx_hash} finalized in ledger {ledger}");
                return Ok(ledger);
            }
            TxStatus::Failed => {
                warn!("Transaction {tx_hash} failed on ledger");
                return Err(IndexerError::Rejected(tx_hash.to_string()));
            }
            TxStatus::NotFound => {
                debug!("Transaction {tx_hash} not yet visible; polling again");
                tokio::time::sleep(poll_interval).await;
            }
        }
    }
}
