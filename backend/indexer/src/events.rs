//! Canonical event types emitted by the CourseManager contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/course_manager/src/events.rs` and `contracts/course_manager/src/rbac.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the CourseManager contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A course was registered (`course` topic).
    CourseAdded,
    /// A learner was credited a coin (`coin` topic).
    CoinRewarded,
    /// A claim minted a fresh certificate (`minted` topic).
    CertificateMinted,
    /// A claim handed out an inventory certificate (`claimed` topic).
    CertificateClaimed,
    /// A certificate was added to a course inventory (`cert_add` topic).
    CertificateStocked,
    /// A capability was granted (`role_set` topic).
    RoleSet,
    /// The rewarder capability was revoked (`role_del` topic).
    RoleDel,
    /// Registry ownership moved (`owner` topic).
    OwnershipTransferred,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "course" => Self::CourseAdded,
            "coin" => Self::CoinRewarded,
            "minted" => Self::CertificateMinted,
            "claimed" => Self::CertificateClaimed,
            "cert_add" => Self::CertificateStocked,
            "role_set" => Self::RoleSet,
            "role_del" => Self::RoleDel,
            "owner" => Self::OwnershipTransferred,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CourseAdded => "course_added",
            Self::CoinRewarded => "coin_rewarded",
            Self::CertificateMinted => "certificate_minted",
            Self::CertificateClaimed => "certificate_claimed",
            Self::CertificateStocked => "certificate_stocked",
            Self::RoleSet => "role_set",
            Self::RoleDel => "role_del",
            Self::OwnershipTransferred => "ownership_transferred",
            Self::Unknown => "unknown",
        }
    }

    /// Position of the course ID within the topic list, if the event has one.
    pub fn course_topic_index(&self) -> Option<usize> {
        match self {
            Self::CoinRewarded => Some(2),
            Self::CourseAdded
            | Self::CertificateMinted
            | Self::CertificateClaimed
            | Self::CertificateStocked => Some(1),
            Self::RoleSet | Self::RoleDel | Self::OwnershipTransferred | Self::Unknown => None,
        }
    }
}

/// A fully decoded course event, ready to be stored in the database.
///
/// `amount` holds the event's integer payload: the threshold for
/// `course_added`, the new balance for `coin_rewarded`, and the inventory size
/// for `certificate_stocked`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseEvent {
    /// RPC-assigned unique event ID; the idempotency key.
    pub event_id: String,
    pub event_type: String,
    pub course_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub token_id: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub course_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub token_id: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// A learner's standing in one course, projected from finalized events only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseProgress {
    pub user: String,
    pub course_id: String,
    pub coins: u64,
    pub claimed: bool,
    pub token_id: Option<String>,
}
