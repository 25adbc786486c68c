//! # Certificate NFT Contract
//!
//! Non-fungible course completion certificates. Each token carries an
//! immutable metadata URI (typically an IPFS CID pointing at the certificate
//! JSON and image) and is owned by exactly one address.
//!
//! | Phase       | Entry Point(s)                                              |
//! |-------------|-------------------------------------------------------------|
//! | Bootstrap   | [`CertificateNft::init`]                                    |
//! | Authority   | `transfer_mint_authority`, `mint_authority`                 |
//! | Minting     | [`CertificateNft::mint`]                                    |
//! | Transfers   | `transfer`, `transfer_from`, `approve`, `approve_for_all`   |
//! | Queries     | `owner_of`, `token_uri`, `balance`, `token_of_owner_by_index`, `total_supply` |
//!
//! ## Mint authority
//!
//! A single address holds the right to mint. After deployment it is handed to
//! the course manager contract, which then mints on behalf of claimants. Any
//! other `minter` is rejected with [`Error::NotAuthority`].

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, panic_with_error, Address, Env, String};

pub mod events;
mod storage;


#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotAuthority = 3,
    TokenNotFound = 4,
    NotOwner = 5,
    NotApproved = 6,
    IndexOutOfBounds = 7,
}

#[contract]
pub struct CertificateNft;

#[contractimpl]
impl CertificateNft {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the collection and set the first mint authority.
    ///
    /// Must be called exactly once immediately after deployment.
    pub fn init(env: Env, authority: Address, name: String, symbol: String) {
        authority.require_auth();
        if storage::is_initialized(&env) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        storage::set_authority(&env, &authority);
        storage::save_metadata(&env, &name, &symbol);
    }

    // ─────────────────────────────────────────────────────────
    // Mint authority
    // ─────────────────────────────────────────────────────────

    /// Hand the minting right to `new_authority`.
    ///
    /// `current` must authorize and hold the authority. Used once during
    /// setup to delegate minting to the course manager.
    pub fn transfer_mint_authority(env: Env, current: Address, new_authority: Address) {
        current.require_auth();
        require_authority(&env, &current);

        storage::set_authority(&env, &new_authority);
        events::emit_authority_transferred(&env, current, new_authority);
    }

    pub fn mint_authority(env: Env) -> Address {
        storage::get_authority(&env)
            .unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized))
    }

    // ─────────────────────────────────────────────────────────
    // Minting
    // ─────────────────────────────────────────────────────────

    /// Mint a new certificate to `to` and return its ID.
    ///
    /// IDs start at 0 and increase by one per mint. The URI is fixed for the
    /// lifetime of the token.
    pub fn mint(env: Env, minter: Address, to: Address, uri: String) -> u64 {
        minter.require_auth();
        require_authority(&env, &minter);

        let token_id = storage::get_and_increment_token_id(&env);
        storage::save_owner(&env, token_id, &to);
        storage::save_uri(&env, token_id, &uri);
        storage::push_owned(&env, &to, token_id);

        events::emit_minted(&env, token_id, to, uri);
        token_id
    }

    // ─────────────────────────────────────────────────────────
    // Transfers and approvals
    // ─────────────────────────────────────────────────────────

    /// Transfer `token_id` from its owner `from` to `to`.
    pub fn transfer(env: Env, from: Address, to: Address, token_id: u64) {
        from.require_auth();
        let owner = load_owner(&env, token_id);
        if owner != from {
            panic_with_error!(&env, Error::NotOwner);
        }
        move_token(&env, &from, &to, token_id);
    }

    /// Transfer `token_id` on behalf of `from`.
    ///
    /// `spender` must be the owner, the token's approved address, or an
    /// operator approved for all of `from`'s tokens.
    pub fn transfer_from(env: Env, spender: Address, from: Address, to: Address, token_id: u64) {
        spender.require_auth();
        let owner = load_owner(&env, token_id);
        if owner != from {
            panic_with_error!(&env, Error::NotOwner);
        }
        if !is_approved_or_owner(&env, &spender, &owner, token_id) {
            panic_with_error!(&env, Error::NotApproved);
        }
        move_token(&env, &from, &to, token_id);
    }

    /// Approve `approved` to transfer a single token. Cleared on transfer.
    pub fn approve(env: Env, owner: Address, approved: Address, token_id: u64) {
        owner.require_auth();
        let current = load_owner(&env, token_id);
        if current != owner && !storage::is_operator(&env, &current, &owner) {
            panic_with_error!(&env, Error::NotOwner);
        }
        storage::save_approved(&env, token_id, &approved);
        events::emit_approve(&env, current, approved, token_id);
    }

    /// Grant or revoke `operator` the right to move every token of `owner`.
    pub fn approve_for_all(env: Env, owner: Address, operator: Address, approved: bool) {
        owner.require_auth();
        storage::set_operator(&env, &owner, &operator, approved);
        events::emit_approve_for_all(&env, owner, operator, approved);
    }

    pub fn get_approved(env: Env, token_id: u64) -> Option<Address> {
        load_owner(&env, token_id);
        storage::load_approved(&env, token_id)
    }

    pub fn is_approved_for_all(env: Env, owner: Address, operator: Address) -> bool {
        storage::is_operator(&env, &owner, &operator)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Panics with `Error::TokenNotFound` for IDs never minted.
    pub fn owner_of(env: Env, token_id: u64) -> Address {
        load_owner(&env, token_id)
    }

    pub fn token_uri(env: Env, token_id: u64) -> String {
        storage::load_uri(&env, token_id)
            .unwrap_or_else(|| panic_with_error!(&env, Error::TokenNotFound))
    }

    pub fn balance(env: Env, owner: Address) -> u32 {
        storage::load_owned(&env, &owner).len()
    }

    /// Enumerate `owner`'s tokens by position.
    pub fn token_of_owner_by_index(env: Env, owner: Address, index: u32) -> u64 {
        storage::load_owned(&env, &owner)
            .get(index)
            .unwrap_or_else(|| panic_with_error!(&env, Error::IndexOutOfBounds))
    }

    pub fn total_supply(env: Env) -> u64 {
        storage::total_minted(&env)
    }

    pub fn name(env: Env) -> String {
        storage::load_name(&env)
            .unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized))
    }

    pub fn symbol(env: Env) -> String {
        storage::load_symbol(&env)
            .unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized))
    }
}

// ─────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────

fn require_authority(env: &Env, caller: &Address) {
    match storage::get_authority(env) {
        Some(ref authority) if authority == caller => {}
        Some(_) => panic_with_error!(env, Error::NotAuthority),
        None => panic_with_error!(env, Error::NotInitialized),
    }
}

fn load_owner(env: &Env, token_id: u64) -> Address {
    storage::load_owner(env, token_id)
        .unwrap_or_else(|| panic_with_error!(env, Error::TokenNotFound))
}

fn is_approved_or_owner(env: &Env, spender: &Address, owner: &Address, token_id: u64) -> bool {
    if spender == owner {
        return true;
    }
    if storage::load_approved(env, token_id).as_ref() == Some(spender) {
        return true;
    }
    storage::is_operator(env, owner, spender)
}

fn move_token(env: &Env, from: &Address, to: &Address, token_id: u64) {
    storage::clear_approved(env, token_id);
    storage::remove_owned(env, from, token_id);
    storage::save_owner(env, token_id, to);
    storage::push_owned(env, to, token_id);

    events::emit_transfer(env, from.clone(), to.clone(), token_id);
}
