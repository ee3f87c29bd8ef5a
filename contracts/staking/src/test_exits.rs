extern crate std;

use accounting::testutils::{MockLocker, MockLockerClient};
use accounting::PoolError;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Env, Vec,
};

use crate::test::{balance, emit, fund, setup, DAY, PRECISION};
use crate::{StakingPool, StakingPoolClient};

fn ids(env: &Env, range: core::ops::RangeInclusive<u64>) -> Vec<u64> {
    let mut out = Vec::new(env);
    for id in range {
        out.push_back(id);
    }
    out
}

// ── Mass exit ─────────────────────────────────────────────────────────────────

#[test]
fn test_mass_exit_rejects_oversized_batch() {
    let s = setup();
    let alice = fund(&s, 1);
    s.pool.stake(&alice, &1, &alice);

    let result = s.pool.try_mass_exit(&alice, &ids(&s.env, 1..=21));
    assert_eq!(result.unwrap_err().unwrap(), PoolError::TooManyPositions);
}

#[test]
fn test_mass_exit_closes_full_batch() {
    let s = setup();
    let alice = fund(&s, 20);
    for _ in 0..20 {
        s.pool.stake(&alice, &1, &alice);
    }
    assert_eq!(s.pool.get_positions_of(&alice).len(), 20);

    s.env.ledger().set_timestamp(DAY);
    let returned = s.pool.mass_exit(&alice, &ids(&s.env, 1..=20));

    assert_eq!(returned, 20);
    assert_eq!(balance(&s.env, &s.stake_token, &alice), 20);
    assert_eq!(s.pool.get_total_staked(), 0);
    assert_eq!(s.pool.get_positions_of(&alice).len(), 0);
    assert_eq!(s.allocator.total_emitted(), emit(DAY));

    // Each position keeps its settled share.
    let share = emit(DAY) / 20;
    assert_eq!(s.pool.get_position(&7).stash, share);
    assert_eq!(s.pool.harvest(&alice, &7), share);
}

#[test]
fn test_mass_exit_with_foreign_position_reverts() {
    let s = setup();
    let alice = fund(&s, 1);
    let bob = fund(&s, 1);
    s.pool.stake(&alice, &1, &alice);
    s.pool.stake(&bob, &1, &bob);

    let result = s.pool.try_mass_exit(&alice, &ids(&s.env, 1..=2));
    assert_eq!(result.unwrap_err().unwrap(), PoolError::Unauthorized);
    assert_eq!(s.pool.get_total_staked(), 2);
    assert_eq!(s.pool.get_position(&1).balance, 1);
}

#[test]
fn test_mass_exit_skips_repeated_and_empty_positions() {
    let s = setup();
    let alice = fund(&s, 3);
    for _ in 0..3 {
        s.pool.stake(&alice, &1, &alice);
    }
    s.pool.withdraw(&alice, &2, &1);

    s.env.ledger().set_timestamp(DAY);
    let batch = Vec::from_array(&s.env, [1u64, 1, 2, 3, 3]);
    assert_eq!(s.pool.mass_exit(&alice, &batch), 2);

    assert_eq!(balance(&s.env, &s.stake_token, &alice), 3);
    assert_eq!(s.pool.get_total_staked(), 0);
    assert_eq!(s.pool.get_positions_of(&alice).len(), 0);
    assert_eq!(s.pool.get_position(&1).stash, emit(DAY) / 2);
    assert_eq!(s.pool.get_position(&2).stash, 0);
}

// ── Emergency exit ────────────────────────────────────────────────────────────

#[test]
fn test_emergency_exit_forfeits_rewards_to_remaining_stakers() {
    let s = setup();
    let alice = fund(&s, 1);
    let bob = fund(&s, 1);
    let a = s.pool.stake(&alice, &1, &alice);
    let b = s.pool.stake(&bob, &1, &bob);

    s.env.ledger().set_timestamp(DAY);
    let mut batch = Vec::new(&s.env);
    batch.push_back(a);
    assert_eq!(s.pool.emergency_exit(&alice, &batch), 1);

    assert_eq!(balance(&s.env, &s.stake_token, &alice), 1);
    assert_eq!(s.allocator.total_emitted(), 0);
    let position = s.pool.get_position(&a);
    assert_eq!((position.balance, position.stash), (0, 0));
    assert_eq!(s.pool.get_positions_of(&alice).len(), 0);

    let result = s.pool.try_harvest(&alice, &a);
    assert_eq!(result.unwrap_err().unwrap(), PoolError::NoReward);

    // Bob is now the only weight when the day is pulled.
    assert_eq!(s.pool.harvest(&bob, &b), emit(DAY));
}

#[test]
fn test_emergency_exit_skips_repeated_and_empty_positions() {
    let s = setup();
    let alice = fund(&s, 2);
    let a = s.pool.stake(&alice, &1, &alice);
    let b = s.pool.stake(&alice, &1, &alice);
    s.pool.withdraw(&alice, &b, &1);

    s.env.ledger().set_timestamp(DAY);
    let batch = Vec::from_array(&s.env, [a, a, b]);
    assert_eq!(s.pool.emergency_exit(&alice, &batch), 1);

    assert_eq!(balance(&s.env, &s.stake_token, &alice), 2);
    assert_eq!(s.pool.get_total_staked(), 0);
    assert_eq!(s.pool.get_position(&a).balance, 0);
    assert_eq!(s.pool.get_positions_of(&alice).len(), 0);
}

#[test]
fn test_emergency_exit_rejects_oversized_batch() {
    let s = setup();
    let alice = fund(&s, 1);
    s.pool.stake(&alice, &1, &alice);

    let result = s.pool.try_emergency_exit(&alice, &ids(&s.env, 1..=21));
    assert_eq!(result.unwrap_err().unwrap(), PoolError::TooManyPositions);
}

#[test]
fn test_emergency_exit_works_without_a_live_allocator() {
    let env = Env::default();
    env.mock_all_auths();

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let admin = Address::generate(&env);
    let missing_allocator = Address::generate(&env);
    let pool = StakingPoolClient::new(&env, &env.register(StakingPool, ()));
    pool.initialize(&admin, &stake_token, &missing_allocator, &PRECISION);

    let alice = Address::generate(&env);
    StellarAssetClient::new(&env, &stake_token).mint(&alice, &10);
    let id = pool.stake(&alice, &10, &alice);

    env.ledger().set_timestamp(DAY);
    assert!(pool.try_withdraw(&alice, &id, &10).is_err());

    let mut batch = Vec::new(&env);
    batch.push_back(id);
    assert_eq!(pool.emergency_exit(&alice, &batch), 10);
    assert_eq!(balance(&env, &stake_token, &alice), 10);
    assert_eq!(pool.get_total_staked(), 0);
}

// ── Lock ──────────────────────────────────────────────────────────────────────

#[test]
fn test_lock_without_locker_fails() {
    let s = setup();
    let alice = fund(&s, 1);
    let id = s.pool.stake(&alice, &1, &alice);

    s.env.ledger().set_timestamp(DAY);
    let result = s.pool.try_lock(&alice, &id, &1);
    assert_eq!(result.unwrap_err().unwrap(), PoolError::NoLocker);
}

#[test]
fn test_lock_moves_rewards_into_locker() {
    let s = setup();
    let locker_id = s.env.register(MockLocker, ());
    let locker = MockLockerClient::new(&s.env, &locker_id);
    s.pool.set_locker(&s.admin, &locker_id);
    assert_eq!(s.pool.get_locker(), Some(locker_id.clone()));

    let alice = fund(&s, 1);
    let id = s.pool.stake(&alice, &1, &alice);
    s.env.ledger().set_timestamp(DAY);

    let result = s.pool.try_lock(&alice, &id, &0);
    assert_eq!(result.unwrap_err().unwrap(), PoolError::ZeroAmount);
    let result = s.pool.try_lock(&alice, &id, &(emit(DAY) + 1));
    assert_eq!(result.unwrap_err().unwrap(), PoolError::InsufficientBalance);

    s.pool.lock(&alice, &id, &10_000);
    assert_eq!(locker.locked(&alice), 10_000);
    assert_eq!(balance(&s.env, &s.reward_token, &locker_id), 10_000);
    assert_eq!(balance(&s.env, &s.reward_token, &alice), 0);
    assert_eq!(s.pool.get_position(&id).stash, emit(DAY) - 10_000);

    // The remainder is still harvestable.
    assert_eq!(s.pool.harvest(&alice, &id), emit(DAY) - 10_000);
    let result = s.pool.try_lock(&alice, &id, &1);
    assert_eq!(result.unwrap_err().unwrap(), PoolError::NoReward);
}
