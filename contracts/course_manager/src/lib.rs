//! # Course Manager Contract
//!
//! On-chain half of the course platform. Learners earn per-course coins for
//! correct quiz answers; once a course's coin threshold is met they may claim
//! exactly one certificate NFT for it.
//!
//! | Phase        | Entry Point(s)                                                   |
//! |--------------|------------------------------------------------------------------|
//! | Bootstrap    | [`CourseManager::init`]                                          |
//! | Capabilities | `transfer_ownership`, `grant_rewarder`, `revoke_rewarder`        |
//! | Registry     | [`CourseManager::add_course`], `add_certificate_to_course`       |
//! | Coins        | [`CourseManager::reward_coin`], `record_answer`                  |
//! | Claims       | [`CourseManager::claim_certificate`]                             |
//! | Queries      | `get_course`, `list_courses`, `get_user_coins`, `can_claim_certificate`, `has_received_certificate` |
//!
//! ## Claim modes
//!
//! The hand-out strategy is chosen once at `init` ([`ClaimMode`]):
//!
//! - `MintOnDemand`: each claim mints a new token carrying the claimant's
//!   metadata URI. The certificate contract's mint authority must have been
//!   transferred to this contract beforehand.
//! - `Inventory`: the owner stocks each course with existing token IDs and
//!   claims consume them in order. Holders of stocked tokens must approve
//!   this contract on the certificate contract.
//!
//! ## Architecture
//!
//! Authorization is delegated to [`rbac`], storage access to [`storage`], and
//! every cross-contract call to [`certificate`]. Claims follow
//! checks-effects-interactions: the claim flag and inventory cursor are
//! written before the certificate contract is called, and any failure reverts
//! the whole invocation.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, Address, Env, String, Vec,
};

mod certificate;
pub mod events;
pub mod rbac;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod rbac_test;
#[cfg(test)]
mod test_events;

pub use rbac::Capability;
pub use types::{ClaimMode, Course, CourseConfig};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotAuthorized = 3,
    AlreadyExists = 4,
    InvalidCourse = 5,
    NotEnoughCoins = 6,
    AlreadyReceived = 7,
    NoCertificateLeft = 8,
    MissingTokenUri = 9,
    CertificateCallFailed = 10,
    Overflow = 11,
    WrongClaimMode = 12,
}

#[contract]
pub struct CourseManager;

#[contractimpl]
impl CourseManager {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the contract.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls panic with `Error::AlreadyInitialized`.
    ///
    /// - `owner` receives both the registry-owner and rewarder capabilities.
    /// - `certificate` is the certificate NFT contract.
    /// - `claim_mode` is fixed for the lifetime of the contract.
    pub fn init(env: Env, owner: Address, certificate: Address, claim_mode: ClaimMode) {
        owner.require_auth();
        if storage::is_configured(&env) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        rbac::init_owner(&env, &owner);
        storage::save_config(&env, &certificate, claim_mode);
    }

    // ─────────────────────────────────────────────────────────
    // Capability management
    // ─────────────────────────────────────────────────────────

    /// Hand the registry-owner capability to `new_owner`.
    pub fn transfer_ownership(env: Env, current_owner: Address, new_owner: Address) {
        current_owner.require_auth();
        rbac::transfer_ownership(&env, &current_owner, &new_owner);
    }

    /// Allow `target` to reward coins. `caller` must be the registry owner.
    pub fn grant_rewarder(env: Env, caller: Address, target: Address) {
        caller.require_auth();
        rbac::grant_rewarder(&env, &caller, &target);
    }

    /// Withdraw the rewarder capability from `target`.
    pub fn revoke_rewarder(env: Env, caller: Address, target: Address) {
        caller.require_auth();
        rbac::revoke_rewarder(&env, &caller, &target);
    }

    pub fn owner(env: Env) -> Address {
        rbac::get_owner(&env).unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized))
    }

    pub fn is_rewarder(env: Env, address: Address) -> bool {
        rbac::is_rewarder(&env, &address)
    }

    pub fn has_capability(env: Env, address: Address, capability: Capability) -> bool {
        rbac::has_capability(&env, &address, capability)
    }

    // ─────────────────────────────────────────────────────────
    // Course registry
    // ─────────────────────────────────────────────────────────

    /// Register a course with its certificate coin threshold.
    ///
    /// Panics with `Error::AlreadyExists` if `course_id` is taken; courses are
    /// never updated or removed.
    pub fn add_course(env: Env, caller: Address, course_id: u64, min_coins_required: u64) {
        caller.require_auth();
        rbac::require_registry_owner(&env, &caller);

        if storage::course_exists(&env, course_id) {
            panic_with_error!(&env, Error::AlreadyExists);
        }

        storage::save_course(
            &env,
            &CourseConfig {
                course_id,
                min_coins_required,
            },
        );
        events::emit_course_added(&env, course_id, min_coins_required);
    }

    /// `None` for courses that were never registered.
    pub fn get_course(env: Env, course_id: u64) -> Option<Course> {
        storage::load_course(&env, course_id)
    }

    /// Registered course IDs in registration order.
    pub fn list_courses(env: Env) -> Vec<u64> {
        storage::load_course_ids(&env)
    }

    /// Append an existing certificate token to a course's inventory.
    ///
    /// Only valid in `ClaimMode::Inventory`. The token's holder must approve
    /// this contract before it can be claimed.
    pub fn add_certificate_to_course(env: Env, caller: Address, course_id: u64, token_id: u64) {
        caller.require_auth();
        rbac::require_registry_owner(&env, &caller);

        if !storage::course_exists(&env, course_id) {
            panic_with_error!(&env, Error::InvalidCourse);
        }
        if load_claim_mode(&env) != ClaimMode::Inventory {
            panic_with_error!(&env, Error::WrongClaimMode);
        }

        let mut slots = storage::load_inventory(&env, course_id);
        slots.push_back(token_id);
        storage::save_inventory(&env, course_id, &slots);

        events::emit_certificate_stocked(&env, course_id, token_id, slots.len());
    }

    // ─────────────────────────────────────────────────────────
    // Coin ledger
    // ─────────────────────────────────────────────────────────

    /// Credit `user` with one coin in `course_id`.
    ///
    /// `caller` must hold the rewarder capability.
    pub fn reward_coin(env: Env, caller: Address, user: Address, course_id: u64) {
        caller.require_auth();
        rbac::require_rewarder(&env, &caller);
        credit_coin(&env, &user, course_id);
    }

    /// Record a quiz answer: correct answers earn one coin, incorrect ones
    /// earn nothing. Returns the resulting balance.
    pub fn record_answer(
        env: Env,
        caller: Address,
        user: Address,
        course_id: u64,
        is_correct: bool,
    ) -> u64 {
        caller.require_auth();
        rbac::require_rewarder(&env, &caller);

        if is_correct {
            credit_coin(&env, &user, course_id)
        } else {
            if !storage::course_exists(&env, course_id) {
                panic_with_error!(&env, Error::InvalidCourse);
            }
            storage::load_coins(&env, &user, course_id)
        }
    }

    pub fn get_user_coins(env: Env, user: Address, course_id: u64) -> u64 {
        storage::load_coins(&env, &user, course_id)
    }

    // ─────────────────────────────────────────────────────────
    // Certificate claims
    // ─────────────────────────────────────────────────────────

    /// `true` iff `claim_certificate` would currently succeed for `user`
    /// (ignoring the token URI). Never panics.
    pub fn can_claim_certificate(env: Env, user: Address, course_id: u64) -> bool {
        match storage::get_claim_mode(&env) {
            Some(mode) => check_claim(&env, &user, course_id, mode).is_ok(),
            None => false,
        }
    }

    pub fn has_received_certificate(env: Env, user: Address, course_id: u64) -> bool {
        storage::has_received(&env, &user, course_id)
    }

    /// Claim the certificate for `course_id` and return its token ID.
    ///
    /// Failure order: `InvalidCourse`, `NotEnoughCoins`, `AlreadyReceived`,
    /// then `NoCertificateLeft` (inventory mode) or `MissingTokenUri`
    /// (mint-on-demand mode, where `token_uri` is required).
    pub fn claim_certificate(
        env: Env,
        claimant: Address,
        course_id: u64,
        token_uri: Option<String>,
    ) -> u64 {
        claimant.require_auth();

        let mode = load_claim_mode(&env);
        let certificate = load_certificate(&env);
        if let Err(err) = check_claim(&env, &claimant, course_id, mode) {
            panic_with_error!(&env, err);
        }

        match mode {
            ClaimMode::MintOnDemand => {
                let uri =
                    token_uri.unwrap_or_else(|| panic_with_error!(&env, Error::MissingTokenUri));

                storage::mark_received(&env, &claimant, course_id);
                let token_id = certificate::mint(&env, &certificate, &claimant, &uri);

                events::emit_certificate_minted(&env, claimant, course_id, token_id);
                token_id
            }
            ClaimMode::Inventory => {
                let slots = storage::load_inventory(&env, course_id);
                let cursor = storage::load_cursor(&env, course_id);
                let token_id = slots
                    .get(cursor)
                    .unwrap_or_else(|| panic_with_error!(&env, Error::NoCertificateLeft));

                storage::save_cursor(&env, course_id, cursor + 1);
                storage::mark_received(&env, &claimant, course_id);
                certificate::hand_out(&env, &certificate, &claimant, token_id);

                events::emit_certificate_claimed(&env, claimant, course_id, token_id);
                token_id
            }
        }
    }

    // ─────────────────────────────────────────────────────────
    // Wiring diagnostics
    // ─────────────────────────────────────────────────────────

    pub fn certificate(env: Env) -> Address {
        load_certificate(&env)
    }

    pub fn claim_mode(env: Env) -> ClaimMode {
        load_claim_mode(&env)
    }

    /// `true` iff the certificate contract has delegated minting to this
    /// contract. Mint-on-demand claims cannot succeed until it is.
    pub fn is_mint_authority_wired(env: Env) -> bool {
        match storage::get_certificate(&env) {
            Some(certificate) => certificate::is_mint_authority(&env, &certificate),
            None => false,
        }
    }
}

// ─────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────

fn load_claim_mode(env: &Env) -> ClaimMode {
    storage::get_claim_mode(env).unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

fn load_certificate(env: &Env) -> Address {
    storage::get_certificate(env).unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

/// Add one coin and return the new balance.
fn credit_coin(env: &Env, user: &Address, course_id: u64) -> u64 {
    if !storage::course_exists(env, course_id) {
        panic_with_error!(env, Error::InvalidCourse);
    }

    let new_balance = storage::load_coins(env, user, course_id)
        .checked_add(1)
        .unwrap_or_else(|| panic_with_error!(env, Error::Overflow));
    storage::save_coins(env, user, course_id, new_balance);

    events::emit_coin_rewarded(env, user.clone(), course_id, new_balance);
    new_balance
}

/// Eligibility rules shared by `can_claim_certificate` and
/// `claim_certificate`, returning the first violated rule.
fn check_claim(env: &Env, user: &Address, course_id: u64, mode: ClaimMode) -> Result<(), Error> {
    let config = storage::load_course_config(env, course_id).ok_or(Error::InvalidCourse)?;

    if storage::load_coins(env, user, course_id) < config.min_coins_required {
        return Err(Error::NotEnoughCoins);
    }
    if storage::has_received(env, user, course_id) {
        return Err(Error::AlreadyReceived);
    }
    if mode == ClaimMode::Inventory
        && storage::load_cursor(env, course_id) >= storage::load_inventory(env, course_id).len()
    {
        return Err(Error::NoCertificateLeft);
    }
    Ok(())
}
