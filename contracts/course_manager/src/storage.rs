//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by the course manager.
//! Entry points never touch `env.storage()` directly; everything goes through
//! this module so the contract logic stays independent of the key layout.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key           | Type        | Description                              |
//! |---------------|-------------|------------------------------------------|
//! | `Certificate` | `Address`   | Certificate NFT contract                 |
//! | `ClaimMode`   | `ClaimMode` | Mint-on-demand or inventory hand-out     |
//! | `CourseCount` | `u32`       | Number of registered courses             |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                      | Type           | Description                        |
//! |--------------------------|----------------|------------------------------------|
//! | `Course(id)`             | `CourseConfig` | Immutable course configuration     |
//! | `CourseAt(n)`            | `u64`          | ID of the n-th registered course   |
//! | `Inventory(id)`          | `Vec<u64>`     | Pre-allocated certificate token IDs|
//! | `Cursor(id)`             | `u32`          | Inventory slots already handed out |
//! | `Coins(user, id)`        | `u64`          | Per-user per-course coin balance   |
//! | `Received(user, id)`     | `bool`         | One-way claim flag                 |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, Env, IntoVal, Val, Vec};

use crate::types::{ClaimMode, Course, CourseConfig};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Certificate NFT contract address (Instance).
    Certificate,
    /// Claim strategy chosen at init (Instance).
    ClaimMode,
    /// Number of registered courses (Instance).
    CourseCount,
    /// Immutable course configuration keyed by ID (Persistent).
    Course(u64),
    /// Course ID keyed by registration position (Persistent).
    CourseAt(u32),
    /// Certificate inventory keyed by course ID (Persistent).
    Inventory(u64),
    /// Inventory hand-out cursor keyed by course ID (Persistent).
    Cursor(u64),
    /// Coin balance keyed by (user, course ID) (Persistent).
    Coins(Address, u64),
    /// Claim flag keyed by (user, course ID) (Persistent).
    Received(Address, u64),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
pub(crate) fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_configured(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Certificate)
}

/// Store the certificate contract and claim mode. Written once, from `init`.
pub fn save_config(env: &Env, certificate: &Address, mode: ClaimMode) {
    env.storage()
        .instance()
        .set(&DataKey::Certificate, certificate);
    env.storage().instance().set(&DataKey::ClaimMode, &mode);
    bump_instance(env);
}

pub fn get_certificate(env: &Env) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Certificate)
}

pub fn get_claim_mode(env: &Env) -> Option<ClaimMode> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::ClaimMode)
}

pub fn course_count(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::CourseCount)
        .unwrap_or(0)
}

/// Registered course IDs in registration order.
pub fn load_course_ids(env: &Env) -> Vec<u64> {
    let mut ids = Vec::new(env);
    for index in 0..course_count(env) {
        let key = DataKey::CourseAt(index);
        if let Some(course_id) = env.storage().persistent().get::<_, u64>(&key) {
            bump_persistent(env, &key);
            ids.push_back(course_id);
        }
    }
    ids
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
pub(crate) fn bump_persistent<K: IntoVal<Env, Val>>(env: &Env, key: &K) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn course_exists(env: &Env, course_id: u64) -> bool {
    let key = DataKey::Course(course_id);
    let exists = env.storage().persistent().has(&key);
    if exists {
        bump_persistent(env, &key);
    }
    exists
}

/// Save a new course configuration and record its registration position.
pub fn save_course(env: &Env, config: &CourseConfig) {
    let key = DataKey::Course(config.course_id);
    env.storage().persistent().set(&key, config);
    bump_persistent(env, &key);

    let index = course_count(env);
    let slot = DataKey::CourseAt(index);
    env.storage().persistent().set(&slot, &config.course_id);
    bump_persistent(env, &slot);
    env.storage().instance().set(&DataKey::CourseCount, &(index + 1));
}

/// Load the immutable course configuration, `None` if never registered.
pub fn load_course_config(env: &Env, course_id: u64) -> Option<CourseConfig> {
    let key = DataKey::Course(course_id);
    let config = env.storage().persistent().get(&key);
    if config.is_some() {
        bump_persistent(env, &key);
    }
    config
}

/// Reconstruct the public [`Course`] view from config, inventory and cursor.
pub fn load_course(env: &Env, course_id: u64) -> Option<Course> {
    let config = load_course_config(env, course_id)?;
    Some(Course {
        course_id: config.course_id,
        min_coins_required: config.min_coins_required,
        current_index: load_cursor(env, course_id),
        inventory_size: load_inventory(env, course_id).len(),
    })
}

pub fn load_inventory(env: &Env, course_id: u64) -> Vec<u64> {
    let key = DataKey::Inventory(course_id);
    let inventory: Option<Vec<u64>> = env.storage().persistent().get(&key);
    match inventory {
        Some(slots) => {
            bump_persistent(env, &key);
            slots
        }
        None => Vec::new(env),
    }
}

pub fn save_inventory(env: &Env, course_id: u64, slots: &Vec<u64>) {
    let key = DataKey::Inventory(course_id);
    env.storage().persistent().set(&key, slots);
    bump_persistent(env, &key);
}

pub fn load_cursor(env: &Env, course_id: u64) -> u32 {
    let key = DataKey::Cursor(course_id);
    let cursor: Option<u32> = env.storage().persistent().get(&key);
    if cursor.is_some() {
        bump_persistent(env, &key);
    }
    cursor.unwrap_or(0)
}

pub fn save_cursor(env: &Env, course_id: u64, cursor: u32) {
    let key = DataKey::Cursor(course_id);
    env.storage().persistent().set(&key, &cursor);
    bump_persistent(env, &key);
}

/// Coin balance for `(user, course_id)`; 0 when nothing was ever rewarded.
pub fn load_coins(env: &Env, user: &Address, course_id: u64) -> u64 {
    let key = DataKey::Coins(user.clone(), course_id);
    let coins: Option<u64> = env.storage().persistent().get(&key);
    if coins.is_some() {
        bump_persistent(env, &key);
    }
    coins.unwrap_or(0)
}

pub fn save_coins(env: &Env, user: &Address, course_id: u64, coins: u64) {
    let key = DataKey::Coins(user.clone(), course_id);
    env.storage().persistent().set(&key, &coins);
    bump_persistent(env, &key);
}

pub fn has_received(env: &Env, user: &Address, course_id: u64) -> bool {
    let key = DataKey::Received(user.clone(), course_id);
    let received: Option<bool> = env.storage().persistent().get(&key);
    if received.is_some() {
        bump_persistent(env, &key);
    }
    received.unwrap_or(false)
}

/// One-way flip; nothing in this module clears it.
pub fn mark_received(env: &Env, user: &Address, course_id: u64) {
    let key = DataKey::Received(user.clone(), course_id);
    env.storage().persistent().set(&key, &true);
    bump_persistent(env, &key);
}
