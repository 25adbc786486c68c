//! # RBAC: capability checks
//!
//! The course manager gates mutations behind two independent capabilities:
//!
//! ```text
//! RegistryOwner   add_course, add_certificate_to_course,
//!                 grant_rewarder, revoke_rewarder, transfer_ownership
//! Rewarder        reward_coin, record_answer
//! ```
//!
//! `init` hands both to the deploying owner, so a fresh deployment behaves as a
//! single-owner contract. The two predicates are stored and checked separately:
//! revoking `Rewarder` from the owner leaves course administration intact, and
//! granting `Rewarder` to a quiz backend does not let it register courses.
//!
//! ## Storage layout
//!
//! - `RbacKey::Owner`            → `Address` (instance), the one and only registry owner.
//! - `RbacKey::Rewarder(addr)`   → `bool` (persistent), present while `addr` may reward.
//!
//! Every read and write extends the TTL of the entry it touches, so
//! capabilities stay live for as long as the contract is in use.
//!
//! ## Event emissions
//!
//! | Event topic prefix | Trigger |
//! |--------------------|---------|
//! | `role_set`         | Capability granted |
//! | `role_del`         | Rewarder revoked |
//! | `owner`            | Registry ownership transferred |

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::storage;
use crate::Error;

// ─────────────────────────────────────────────────────────
// Capability enum
// ─────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Capability {
    /// Registers courses and stocks certificate inventories.
    RegistryOwner,
    /// Credits coins to learners.
    Rewarder,
}

// ─────────────────────────────────────────────────────────
// Storage keys
// ─────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RbacKey {
    Owner,
    Rewarder(Address),
}

// ─────────────────────────────────────────────────────────
// Storage helpers (private)
// ─────────────────────────────────────────────────────────

fn store_rewarder(env: &Env, address: &Address) {
    let key = RbacKey::Rewarder(address.clone());
    env.storage().persistent().set(&key, &true);
    storage::bump_persistent(env, &key);
}

fn clear_rewarder(env: &Env, address: &Address) {
    env.storage()
        .persistent()
        .remove(&RbacKey::Rewarder(address.clone()));
}

fn store_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&RbacKey::Owner, owner);
    storage::bump_instance(env);
}

/// Read the registry owner, returning `None` before init.
pub fn get_owner(env: &Env) -> Option<Address> {
    storage::bump_instance(env);
    env.storage().instance().get(&RbacKey::Owner)
}

// ─────────────────────────────────────────────────────────
// Initialisation
// ─────────────────────────────────────────────────────────

/// Set the initial owner and make it a rewarder as well.
/// Panics with `Error::AlreadyInitialized` if called again.
pub fn init_owner(env: &Env, owner: &Address) {
    if env.storage().instance().has(&RbacKey::Owner) {
        panic_with_error_rbac(env, Error::AlreadyInitialized);
    }
    store_owner(env, owner);
    store_rewarder(env, owner);

    emit(env, owner, Capability::RegistryOwner, None);
    emit(env, owner, Capability::Rewarder, None);
}

// ─────────────────────────────────────────────────────────
// Capability assignment
// ─────────────────────────────────────────────────────────

/// Allow `target` to reward coins. `caller` must be the registry owner.
/// Granting to an existing rewarder is a no-op apart from the event.
pub fn grant_rewarder(env: &Env, caller: &Address, target: &Address) {
    require_registry_owner(env, caller);
    store_rewarder(env, target);
    emit(env, target, Capability::Rewarder, Some(caller.clone()));
}

/// Withdraw the rewarder capability from `target`.
///
/// The owner may revoke its own rewarder capability; registry ownership is
/// unaffected. Emits `role_del` only if `target` was a rewarder.
pub fn revoke_rewarder(env: &Env, caller: &Address, target: &Address) {
    require_registry_owner(env, caller);
    if is_rewarder(env, target) {
        clear_rewarder(env, target);
        env.events()
            .publish((symbol_short!("role_del"), target.clone()), Some(caller.clone()));
    }
}

/// Move registry ownership from `current` to `new`.
///
/// Only `RegistryOwner` moves; rewarder grants stay with whoever holds them.
pub fn transfer_ownership(env: &Env, current: &Address, new: &Address) {
    require_registry_owner(env, current);
    store_owner(env, new);
    env.events()
        .publish((symbol_short!("owner"), new.clone()), current.clone());
}

// ─────────────────────────────────────────────────────────
// Access guards (called from lib.rs handlers)
// ─────────────────────────────────────────────────────────

/// Panics with `Error::NotAuthorized` unless `address` is the registry owner,
/// or `Error::NotInitialized` before `init`.
pub fn require_registry_owner(env: &Env, address: &Address) {
    match get_owner(env) {
        Some(ref owner) if owner == address => {}
        Some(_) => panic_with_error_rbac(env, Error::NotAuthorized),
        None => panic_with_error_rbac(env, Error::NotInitialized),
    }
}

/// Panics with `Error::NotAuthorized` unless `address` holds `Rewarder`.
pub fn require_rewarder(env: &Env, address: &Address) {
    storage::bump_instance(env);
    if !is_rewarder(env, address) {
        panic_with_error_rbac(env, Error::NotAuthorized);
    }
}

// ─────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────

pub fn is_rewarder(env: &Env, address: &Address) -> bool {
    let key = RbacKey::Rewarder(address.clone());
    let granted: Option<bool> = env.storage().persistent().get(&key);
    if granted.is_some() {
        storage::bump_persistent(env, &key);
    }
    granted.unwrap_or(false)
}

/// Returns `true` if `address` currently holds `capability`.
pub fn has_capability(env: &Env, address: &Address, capability: Capability) -> bool {
    match capability {
        Capability::RegistryOwner => get_owner(env).as_ref() == Some(address),
        Capability::Rewarder => is_rewarder(env, address),
    }
}

// ─────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────

/// Topic: `(role_set, target_address, capability_symbol)`
/// Data:  `Option<caller_address>`
fn emit(env: &Env, target: &Address, capability: Capability, by: Option<Address>) {
    let topics = (
        symbol_short!("role_set"),
        target.clone(),
        capability_to_symbol(capability),
    );
    env.events().publish(topics, by);
}

fn capability_to_symbol(capability: Capability) -> Symbol {
    match capability {
        Capability::RegistryOwner => symbol_short!("owner"),
        Capability::Rewarder => symbol_short!("rewarder"),
    }
}

#[inline(always)]
fn panic_with_error_rbac(env: &Env, err: Error) -> ! {
    soroban_sdk::panic_with_error!(env, err)
}
