extern crate std;

use certificate_nft::{CertificateNft, CertificateNftClient};
use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, Env, IntoVal, String, Symbol, TryIntoVal,
};

use crate::events::{
    CertificateClaimed, CertificateMinted, CertificateStocked, CoinRewarded, CourseAdded,
};
use crate::{ClaimMode, CourseManager, CourseManagerClient};

fn setup(
    mode: ClaimMode,
) -> (
    Env,
    CourseManagerClient<'static>,
    CertificateNftClient<'static>,
    Address,
) {
    let env = Env::default();
    env.mock_all_auths();
    let owner = Address::generate(&env);

    let nft_id = env.register(CertificateNft, ());
    let nft = CertificateNftClient::new(&env, &nft_id);
    nft.init(
        &owner,
        &String::from_str(&env, "CourseCertificate"),
        &String::from_str(&env, "CERT"),
    );

    let manager_id = env.register(CourseManager, ());
    let manager = CourseManagerClient::new(&env, &manager_id);
    manager.init(&owner, &nft_id, &mode);
    if mode == ClaimMode::MintOnDemand {
        nft.transfer_mint_authority(&owner, &manager_id);
    }
    (env, manager, nft, owner)
}

#[test]
fn test_course_added_event() {
    let (env, manager, _nft, owner) = setup(ClaimMode::MintOnDemand);

    manager.add_course(&owner, &1, &5);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("course"), course_id)
    assert_eq!(last_event.0, manager.address);
    let expected_topics = vec![
        &env,
        symbol_short!("course").into_val(&env),
        1u64.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: CourseAdded = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CourseAdded {
            course_id: 1,
            min_coins_required: 5,
        }
    );
}

#[test]
fn test_coin_rewarded_event_carries_new_balance() {
    let (env, manager, _nft, owner) = setup(ClaimMode::MintOnDemand);
    let learner = Address::generate(&env);
    manager.add_course(&owner, &1, &5);

    manager.reward_coin(&owner, &learner, &1);
    manager.reward_coin(&owner, &learner, &1);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("coin"), user, course_id)
    assert_eq!(last_event.0, manager.address);
    let expected_topics = vec![
        &env,
        symbol_short!("coin").into_val(&env),
        learner.into_val(&env),
        1u64.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: CoinRewarded = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CoinRewarded {
            user: learner.clone(),
            course_id: 1,
            new_balance: 2,
        }
    );
}

#[test]
fn test_incorrect_answer_emits_no_coin_event() {
    let (env, manager, _nft, owner) = setup(ClaimMode::MintOnDemand);
    let learner = Address::generate(&env);
    manager.add_course(&owner, &1, &5);

    manager.record_answer(&owner, &learner, &1, &false);

    let coin_events = env
        .events()
        .all()
        .iter()
        .filter(|e| {
            let topic: Symbol = e.1.get(0).unwrap().try_into_val(&env).unwrap();
            topic == symbol_short!("coin")
        })
        .count();
    assert_eq!(coin_events, 0);
}

#[test]
fn test_certificate_minted_event() {
    let (env, manager, _nft, owner) = setup(ClaimMode::MintOnDemand);
    let learner = Address::generate(&env);
    manager.add_course(&owner, &1, &0);

    let token_id = manager.claim_certificate(
        &learner,
        &1,
        &Some(String::from_str(&env, "ipfs://metadata")),
    );

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("minted"), course_id)
    assert_eq!(last_event.0, manager.address);
    let expected_topics = vec![
        &env,
        symbol_short!("minted").into_val(&env),
        1u64.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: CertificateMinted = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CertificateMinted {
            user: learner.clone(),
            course_id: 1,
            token_id,
        }
    );
}

#[test]
fn test_inventory_events() {
    let (env, manager, nft, owner) = setup(ClaimMode::Inventory);
    let learner = Address::generate(&env);
    manager.add_course(&owner, &1, &0);
    let token_id = nft.mint(&owner, &owner, &String::from_str(&env, "uri"));
    nft.approve_for_all(&owner, &manager.address, &true);

    manager.add_certificate_to_course(&owner, &1, &token_id);

    let stocked = env.events().all().last().expect("No events found");
    assert_eq!(
        stocked.1,
        vec![
            &env,
            symbol_short!("cert_add").into_val(&env),
            1u64.into_val(&env),
        ]
    );
    let stocked_data: CertificateStocked = stocked.2.try_into_val(&env).unwrap();
    assert_eq!(
        stocked_data,
        CertificateStocked {
            course_id: 1,
            token_id,
            inventory_size: 1,
        }
    );

    manager.claim_certificate(&learner, &1, &None);

    let claimed = env.events().all().last().expect("No events found");
    assert_eq!(claimed.0, manager.address);
    assert_eq!(
        claimed.1,
        vec![
            &env,
            symbol_short!("claimed").into_val(&env),
            1u64.into_val(&env),
        ]
    );
    let claimed_data: CertificateClaimed = claimed.2.try_into_val(&env).unwrap();
    assert_eq!(
        claimed_data,
        CertificateClaimed {
            user: learner.clone(),
            course_id: 1,
            token_id,
        }
    );
}
