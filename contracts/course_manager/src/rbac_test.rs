#![cfg(test)]

use soroban_sdk::{testutils::Address as _, Address, Env};

use crate::{Capability, ClaimMode, CourseManager, CourseManagerClient, Error};

// ─── Helpers ─────────────────────────────────────────────

fn setup_with_init() -> (Env, CourseManagerClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(CourseManager, ());
    let client = CourseManagerClient::new(&env, &contract_id);
    let owner = Address::generate(&env);
    // The certificate contract is never called by these tests.
    let certificate = Address::generate(&env);
    client.init(&owner, &certificate, &ClaimMode::Inventory);
    (env, client, owner)
}

// ─── 1. Initialisation ───────────────────────────────────

#[test]
fn test_init_grants_both_capabilities_to_owner() {
    let (_env, client, owner) = setup_with_init();
    assert_eq!(client.owner(), owner);
    assert!(client.has_capability(&owner, &Capability::RegistryOwner));
    assert!(client.has_capability(&owner, &Capability::Rewarder));
    assert!(client.is_rewarder(&owner));
}

#[test]
fn test_stranger_has_no_capability() {
    let (env, client, _owner) = setup_with_init();
    let stranger = Address::generate(&env);
    assert!(!client.has_capability(&stranger, &Capability::RegistryOwner));
    assert!(!client.has_capability(&stranger, &Capability::Rewarder));
}

// ─── 2. Rewarder capability ──────────────────────────────

#[test]
fn test_granted_rewarder_can_reward() {
    let (env, client, owner) = setup_with_init();
    let quiz_backend = Address::generate(&env);
    let learner = Address::generate(&env);
    client.add_course(&owner, &1, &3);

    client.grant_rewarder(&owner, &quiz_backend);
    client.reward_coin(&quiz_backend, &learner, &1);

    assert_eq!(client.get_user_coins(&learner, &1), 1);
}

#[test]
#[should_panic(expected = "Error(Contract, #3)")]
fn test_rewarder_cannot_add_course() {
    let (env, client, owner) = setup_with_init();
    let quiz_backend = Address::generate(&env);
    client.grant_rewarder(&owner, &quiz_backend);

    client.add_course(&quiz_backend, &1, &3);
}

#[test]
#[should_panic(expected = "Error(Contract, #3)")]
fn test_rewarder_cannot_stock_inventory() {
    let (env, client, owner) = setup_with_init();
    let quiz_backend = Address::generate(&env);
    client.add_course(&owner, &1, &3);
    client.grant_rewarder(&owner, &quiz_backend);

    client.add_certificate_to_course(&quiz_backend, &1, &0);
}

#[test]
#[should_panic(expected = "Error(Contract, #3)")]
fn test_non_rewarder_cannot_reward() {
    let (env, client, owner) = setup_with_init();
    let stranger = Address::generate(&env);
    client.add_course(&owner, &1, &3);

    client.reward_coin(&stranger, &stranger, &1);
}

#[test]
#[should_panic(expected = "Error(Contract, #3)")]
fn test_non_rewarder_cannot_record_answer() {
    let (env, client, owner) = setup_with_init();
    let stranger = Address::generate(&env);
    client.add_course(&owner, &1, &3);

    client.record_answer(&stranger, &stranger, &1, &true);
}

#[test]
fn test_owner_keeps_registry_after_revoking_own_rewarder() {
    let (env, client, owner) = setup_with_init();
    let learner = Address::generate(&env);

    client.revoke_rewarder(&owner, &owner);

    assert!(!client.is_rewarder(&owner));
    client.add_course(&owner, &1, &3);
    assert_eq!(
        client.try_reward_coin(&owner, &learner, &1),
        Err(Ok(Error::NotAuthorized.into()))
    );
    assert_eq!(client.get_user_coins(&learner, &1), 0);
}

#[test]
fn test_revoked_rewarder_loses_access() {
    let (env, client, owner) = setup_with_init();
    let quiz_backend = Address::generate(&env);
    let learner = Address::generate(&env);
    client.add_course(&owner, &1, &3);

    client.grant_rewarder(&owner, &quiz_backend);
    client.revoke_rewarder(&owner, &quiz_backend);

    assert!(!client.is_rewarder(&quiz_backend));
    assert_eq!(
        client.try_reward_coin(&quiz_backend, &learner, &1),
        Err(Ok(Error::NotAuthorized.into()))
    );
}

#[test]
fn test_revoke_non_rewarder_is_noop() {
    let (env, client, owner) = setup_with_init();
    let stranger = Address::generate(&env);
    client.revoke_rewarder(&owner, &stranger);
    assert!(!client.is_rewarder(&stranger));
}

#[test]
#[should_panic(expected = "Error(Contract, #3)")]
fn test_rewarder_cannot_grant_rewarder() {
    let (env, client, owner) = setup_with_init();
    let quiz_backend = Address::generate(&env);
    let accomplice = Address::generate(&env);
    client.grant_rewarder(&owner, &quiz_backend);

    client.grant_rewarder(&quiz_backend, &accomplice);
}

#[test]
#[should_panic(expected = "Error(Contract, #3)")]
fn test_stranger_cannot_revoke_rewarder() {
    let (env, client, owner) = setup_with_init();
    let stranger = Address::generate(&env);
    client.revoke_rewarder(&stranger, &owner);
}

// ─── 3. Ownership transfer ───────────────────────────────

#[test]
fn test_transfer_ownership_moves_registry_only() {
    let (env, client, owner) = setup_with_init();
    let new_owner = Address::generate(&env);

    client.transfer_ownership(&owner, &new_owner);

    assert_eq!(client.owner(), new_owner);
    assert!(client.has_capability(&new_owner, &Capability::RegistryOwner));
    assert!(!client.has_capability(&owner, &Capability::RegistryOwner));
    // Rewarder grants are untouched.
    assert!(client.is_rewarder(&owner));
    assert!(!client.is_rewarder(&new_owner));

    client.add_course(&new_owner, &1, &3);
    assert_eq!(
        client.try_add_course(&owner, &2, &3),
        Err(Ok(Error::NotAuthorized.into()))
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #3)")]
fn test_stranger_cannot_transfer_ownership() {
    let (env, client, _owner) = setup_with_init();
    let stranger = Address::generate(&env);
    client.transfer_ownership(&stranger, &stranger);
}
