//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the certificate
//! collection.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key           | Type      | Description                              |
//! |---------------|-----------|------------------------------------------|
//! | `Authority`   | `Address` | The only address allowed to mint         |
//! | `Name`        | `String`  | Collection name                          |
//! | `Symbol`      | `String`  | Collection symbol                        |
//! | `NextTokenId` | `u64`     | Auto-increment token ID counter          |
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                    | Type       | Description                          |
//! |------------------------|------------|--------------------------------------|
//! | `Owner(id)`            | `Address`  | Current holder of a token            |
//! | `Uri(id)`              | `String`   | Metadata URI, written once at mint   |
//! | `Approved(id)`         | `Address`  | Single-token transfer approval       |
//! | `Operator(owner, op)`  | `bool`     | Collection-wide operator approval    |
//! | `Owned(owner)`         | `Vec<u64>` | Enumeration list of held tokens      |

use soroban_sdk::{contracttype, Address, Env, String, Vec};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Authority,
    Name,
    Symbol,
    NextTokenId,
    Owner(u64),
    Uri(u64),
    Approved(u64),
    Operator(Address, Address),
    Owned(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Authority)
}

pub fn save_metadata(env: &Env, name: &String, symbol: &String) {
    env.storage().instance().set(&DataKey::Name, name);
    env.storage().instance().set(&DataKey::Symbol, symbol);
    bump_instance(env);
}

pub fn load_name(env: &Env) -> Option<String> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Name)
}

pub fn load_symbol(env: &Env) -> Option<String> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Symbol)
}

pub fn set_authority(env: &Env, authority: &Address) {
    env.storage().instance().set(&DataKey::Authority, authority);
    bump_instance(env);
}

/// Returns `None` before `init`.
pub fn get_authority(env: &Env) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Authority)
}

/// Atomically reads, increments, and stores the token counter.
/// Returns the ID to use for the *current* mint (pre-increment value).
pub fn get_and_increment_token_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::NextTokenId)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::NextTokenId, &(current + 1));
    current
}

/// Number of tokens minted so far; also the next ID to be assigned.
pub fn total_minted(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::NextTokenId)
        .unwrap_or(0)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn load_owner(env: &Env, token_id: u64) -> Option<Address> {
    let key = DataKey::Owner(token_id);
    let owner = env.storage().persistent().get(&key);
    if owner.is_some() {
        bump_persistent(env, &key);
    }
    owner
}

pub fn save_owner(env: &Env, token_id: u64, owner: &Address) {
    let key = DataKey::Owner(token_id);
    env.storage().persistent().set(&key, owner);
    bump_persistent(env, &key);
}

pub fn load_uri(env: &Env, token_id: u64) -> Option<String> {
    let key = DataKey::Uri(token_id);
    let uri = env.storage().persistent().get(&key);
    if uri.is_some() {
        bump_persistent(env, &key);
    }
    uri
}

/// Written exactly once, from `mint`.
pub fn save_uri(env: &Env, token_id: u64, uri: &String) {
    let key = DataKey::Uri(token_id);
    env.storage().persistent().set(&key, uri);
    bump_persistent(env, &key);
}

pub fn load_approved(env: &Env, token_id: u64) -> Option<Address> {
    env.storage().persistent().get(&DataKey::Approved(token_id))
}

pub fn save_approved(env: &Env, token_id: u64, approved: &Address) {
    let key = DataKey::Approved(token_id);
    env.storage().persistent().set(&key, approved);
    bump_persistent(env, &key);
}

pub fn clear_approved(env: &Env, token_id: u64) {
    env.storage()
        .persistent()
        .remove(&DataKey::Approved(token_id));
}

pub fn is_operator(env: &Env, owner: &Address, operator: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Operator(owner.clone(), operator.clone()))
        .unwrap_or(false)
}

pub fn set_operator(env: &Env, owner: &Address, operator: &Address, approved: bool) {
    let key = DataKey::Operator(owner.clone(), operator.clone());
    if approved {
        env.storage().persistent().set(&key, &true);
        bump_persistent(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn load_owned(env: &Env, owner: &Address) -> Vec<u64> {
    let key = DataKey::Owned(owner.clone());
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env))
}

fn save_owned(env: &Env, owner: &Address, tokens: &Vec<u64>) {
    let key = DataKey::Owned(owner.clone());
    if tokens.is_empty() {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, tokens);
        bump_persistent(env, &key);
    }
}

pub fn push_owned(env: &Env, owner: &Address, token_id: u64) {
    let mut tokens = load_owned(env, owner);
    tokens.push_back(token_id);
    save_owned(env, owner, &tokens);
}

pub fn remove_owned(env: &Env, owner: &Address, token_id: u64) {
    let mut tokens = load_owned(env, owner);
    if let Some(index) = tokens.first_index_of(token_id) {
        tokens.remove(index);
        save_owned(env, owner, &tokens);
    }
}
