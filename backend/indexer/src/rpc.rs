//! Soroban RPC client: polls `getEvents`, decodes CourseManager events, and
//! looks up transaction status with `getTransaction`.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{CourseEvent, EventKind};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// XDR-encoded topic list
    pub topic: Vec<String>,
    /// XDR-encoded event value / data
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionResult {
    pub status: String,
    pub ledger: Option<u64>,
}

/// Where a submitted transaction currently stands on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    /// Included in a closed ledger and applied.
    Success { ledger: u64 },
    /// Included in a closed ledger but failed; none of its effects apply.
    Failed,
    /// Not (yet) known to the RPC node.
    NotFound,
}

impl TxStatus {
    fn from_result(result: TransactionResult) -> Result<Self> {
        match result.status.as_str() {
            "SUCCESS" => result
                .ledger
                .map(|ledger| Self::Success { ledger })
                .ok_or_else(|| {
                    IndexerError::EventParse("SUCCESS transaction without a ledger".to_string())
                }),
            "FAILED" => Ok(Self::Failed),
            "NOT_FOUND" => Ok(Self::NotFound),
            other => Err(IndexerError::EventParse(format!(
                "Unexpected transaction status: {other}"
            ))),
        }
    }
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger`: the ledger sequence to scan from (inclusive).
/// * `cursor`: optional opaque pagination cursor from a previous response.
/// * `limit`: maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let params = build_params(contract_id, start_ledger, cursor, limit);
    let result: EventsResult = call(client, rpc_url, "getEvents", params).await?;

    debug!(
        "Fetched {} events (latest_ledger={:?})",
        result.events.len(),
        result.latest_ledger
    );

    Ok((result.events, result.cursor, result.latest_ledger))
}

/// Look up the ledger status of a submitted transaction.
pub async fn get_transaction(client: &Client, rpc_url: &str, tx_hash: &str) -> Result<TxStatus> {
    let result: TransactionResult =
        call(client, rpc_url, "getTransaction", json!({ "hash": tx_hash })).await?;
    debug!("Transaction {tx_hash} status={}", result.status);
    TxStatus::from_result(result)
}

/// Issue one JSON-RPC request, retrying transient failures with back-off.
async fn call<T: DeserializeOwned>(
    client: &Client,
    rpc_url: &str,
    method: &str,
    params: Value,
) -> Result<T> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params,
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!("RPC {method} failed (will retry in {backoff}s): {e}");
            }
            Ok(resp) if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS => {
                warn!("Rate-limited by RPC (will retry in {backoff}s)");
            }
            Ok(resp) => {
                let body: RpcResponse<T> = resp.json().await?;

                if let Some(err) = body.error {
                    // Code -32600 / -32601 / -32602 are hard failures; everything else we retry
                    if matches!(err.code, -32600 | -32601 | -32602) {
                        return Err(IndexerError::EventParse(format!(
                            "RPC hard error {}: {}",
                            err.code, err.message
                        )));
                    }
                    warn!(
                        "RPC soft error (will retry in {backoff}s): {} {}",
                        err.code, err.message
                    );
                } else {
                    return body.result.ok_or_else(|| {
                        IndexerError::EventParse(format!("Empty result from {method}"))
                    });
                }
            }
        }

        tokio::time::sleep(Duration::from_secs(backoff)).await;
        backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`CourseEvent`] structs.
///
/// Events emitted by reverted invocations are dropped, as are events with no
/// RPC id to key them on.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<CourseEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call.unwrap_or(true))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<CourseEvent> {
    let event_id = raw.id.clone()?;
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&extract_symbol(first_topic));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let course_id = kind
        .course_topic_index()
        .and_then(|i| raw.topic.get(i))
        .map(|t| extract_scalar(t));

    let (actor, amount, token_id) = decode_data(raw, &kind);

    Some(CourseEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        course_id,
        actor,
        amount,
        token_id,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Pull `(actor, amount, token_id)` out of an event.
/// The XDR is decoded by the RPC into a `{"type":…, …}` JSON object.
fn decode_data(
    raw: &RawEvent,
    kind: &EventKind,
) -> (Option<String>, Option<String>, Option<String>) {
    let value = &raw.value;
    match kind {
        EventKind::CourseAdded => (None, extract_field(value, &["min_coins_required"]), None),
        EventKind::CoinRewarded => {
            let actor = extract_field(value, &["user"])
                .or_else(|| raw.topic.get(1).map(|t| extract_scalar(t)));
            (actor, extract_field(value, &["new_balance"]), None)
        }
        EventKind::CertificateMinted | EventKind::CertificateClaimed => (
            extract_field(value, &["user"]),
            None,
            extract_field(value, &["token_id"]),
        ),
        EventKind::CertificateStocked => (
            None,
            extract_field(value, &["inventory_size"]),
            extract_field(value, &["token_id"]),
        ),
        EventKind::RoleSet | EventKind::RoleDel | EventKind::OwnershipTransferred => {
            // The subject of a role event is its second topic.
            (raw.topic.get(1).map(|t| extract_scalar(t)), None, None)
        }
        EventKind::Unknown => (None, None, None),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(key).or_else(|| find_nested(value, key)) {
            let s = match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => v.get("value").and_then(scalar_to_string),
            };
            if s.is_some() {
                return s;
            }
        }
    }
    None
}

fn find_nested<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    if let Value::Object(map) = value {
        for (k, v) in map {
            if k == key {
                return Some(v);
            }
            if let Some(found) = find_nested(v, key) {
                return Some(found);
            }
        }
    }
    None
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract a Soroban Symbol from the XDR-decoded topic string.
/// The RPC may return `{"type":"symbol","value":"course"}` or just the raw string.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    raw.to_string()
}

/// Extract a u64 or address from a topic entry that might be a JSON object or a raw string.
fn extract_scalar(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| v.get("value").and_then(scalar_to_string))
        .unwrap_or_else(|| raw.to_string())
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
