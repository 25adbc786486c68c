//! # Types
//!
//! Shared data structures used across all modules of the course manager.
//!
//! ## Design decisions
//!
//! ### Config / Inventory split
//!
//! A course is stored as separate ledger entries:
//!
//! - [`CourseConfig`]: written once by `add_course`; never mutated.
//! - the certificate inventory (`Vec<u64>`) and its hand-out cursor (`u32`),
//!   written by `add_certificate_to_course` and by inventory-backed claims.
//!
//! The public API exposes the reconstructed [`Course`] view.
//!
//! ### Claim lifecycle per (user, course)
//!
//! ```text
//! NotEligible ──► Eligible ──► Claimed
//! ```
//!
//! `Claimed` is terminal. Coins are never taken away, so a user never moves
//! from `Eligible` back to `NotEligible` unless an inventory runs dry.

use soroban_sdk::contracttype;

/// How `claim_certificate` hands out a certificate. Fixed at `init`.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClaimMode {
    /// Mint a fresh token with the claimant-supplied URI on every claim.
    MintOnDemand,
    /// Transfer the next pre-allocated token from the course inventory.
    Inventory,
}

/// Immutable course configuration, written once at registration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CourseConfig {
    pub course_id: u64,
    pub min_coins_required: u64,
}

/// Public view of a registered course.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Course {
    /// Caller-supplied identifier, immutable once created.
    pub course_id: u64,
    /// Coins a user must hold in this course before claiming.
    pub min_coins_required: u64,
    /// Number of inventory certificates already handed out.
    pub current_index: u32,
    /// Number of certificates ever added to the inventory.
    pub inventory_size: u32,
}

impl Course {
    /// Certificates still available through the inventory path.
    pub fn remaining(&self) -> u32 {
        self.inventory_size - self.current_index
    }
}
