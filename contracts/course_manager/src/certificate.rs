//! # Certificate contract boundary
//!
//! Every call into the certificate NFT contract goes through this module.
//! Calls use the fallible `try_` client methods; any failure on the other side
//! (missing mint authority, missing approval, unknown token) is reported as
//! `Error::CertificateCallFailed`, which reverts the whole invocation.
//!
//! Callers must finish all of their own state writes before calling in here.

use soroban_sdk::{contractclient, panic_with_error, Address, Env, String};

use crate::Error;

/// The subset of the certificate NFT interface the course manager relies on.
#[allow(dead_code)]
#[contractclient(name = "CertificateClient")]
pub trait CertificateInterface {
    fn mint(env: Env, minter: Address, to: Address, uri: String) -> u64;
    fn transfer_from(env: Env, spender: Address, from: Address, to: Address, token_id: u64);
    fn owner_of(env: Env, token_id: u64) -> Address;
    fn mint_authority(env: Env) -> Address;
}

/// Mint a fresh certificate to `to`, acting as the delegated mint authority.
pub fn mint(env: &Env, certificate: &Address, to: &Address, uri: &String) -> u64 {
    let client = CertificateClient::new(env, certificate);
    match client.try_mint(&env.current_contract_address(), to, uri) {
        Ok(Ok(token_id)) => token_id,
        _ => panic_with_error!(env, Error::CertificateCallFailed),
    }
}

/// Move a pre-allocated certificate from whoever holds it to `to`.
///
/// The holder must have approved this contract for the token, or for all of
/// its tokens.
pub fn hand_out(env: &Env, certificate: &Address, to: &Address, token_id: u64) {
    let client = CertificateClient::new(env, certificate);
    let holder = match client.try_owner_of(&token_id) {
        Ok(Ok(holder)) => holder,
        _ => panic_with_error!(env, Error::CertificateCallFailed),
    };
    if client
        .try_transfer_from(&env.current_contract_address(), &holder, to, &token_id)
        .is_err()
    {
        panic_with_error!(env, Error::CertificateCallFailed);
    }
}

/// `true` iff the certificate contract's mint authority is this contract.
pub fn is_mint_authority(env: &Env, certificate: &Address) -> bool {
    let client = CertificateClient::new(env, certificate);
    match client.try_mint_authority() {
        Ok(Ok(authority)) => authority == env.current_contract_address(),
        _ => false,
    }
}
