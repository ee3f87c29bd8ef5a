extern crate std;

use accounting::PoolError;
use common::Role;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::{Address, Vec};

use crate::test::{fund, setup, DAY};

#[test]
fn test_admin_is_bootstrapped_as_owner() {
    let s = setup();
    assert_eq!(s.pool.get_role(&s.admin), Some(Role::Owner));
    assert_eq!(s.pool.get_role(&Address::generate(&s.env)), None);
}

#[test]
fn test_pause_blocks_stake_only() {
    let s = setup();
    let alice = fund(&s, 10);
    let id = s.pool.stake(&alice, &5, &alice);

    s.pool.pause(&s.admin);
    assert!(s.pool.is_paused());

    let result = s.pool.try_stake(&alice, &5, &alice);
    assert_eq!(result.unwrap_err().unwrap(), PoolError::Paused);

    // Exits and harvests stay open while paused.
    s.env.ledger().set_timestamp(DAY);
    s.pool.harvest(&alice, &id);
    s.pool.withdraw(&alice, &id, &2);
    let mut batch = Vec::new(&s.env);
    batch.push_back(id);
    assert_eq!(s.pool.mass_exit(&alice, &batch), 3);

    s.pool.resume(&s.admin);
    assert!(!s.pool.is_paused());
    s.pool.stake(&alice, &5, &alice);
}

#[test]
fn test_pause_and_resume_must_change_state() {
    let s = setup();

    let result = s.pool.try_resume(&s.admin);
    assert_eq!(result.unwrap_err().unwrap(), PoolError::NotPaused);

    s.pool.pause(&s.admin);
    let result = s.pool.try_pause(&s.admin);
    assert_eq!(result.unwrap_err().unwrap(), PoolError::Paused);
}

#[test]
fn test_guardian_may_pause_but_not_set_locker() {
    let s = setup();
    let guardian = Address::generate(&s.env);
    let locker = Address::generate(&s.env);

    let result = s.pool.try_pause(&guardian);
    assert_eq!(result.unwrap_err().unwrap(), PoolError::Unauthorized);

    s.pool.grant_role(&s.admin, &guardian, &Role::Guardian);
    assert_eq!(s.pool.get_role(&guardian), Some(Role::Guardian));
    s.pool.pause(&guardian);
    s.pool.resume(&guardian);

    let result = s.pool.try_set_locker(&guardian, &locker);
    assert_eq!(result.unwrap_err().unwrap(), PoolError::Unauthorized);
    assert_eq!(s.pool.get_locker(), None);
}

#[test]
fn test_controller_may_set_locker() {
    let s = setup();
    let controller = Address::generate(&s.env);
    let locker = Address::generate(&s.env);

    s.pool.grant_role(&s.admin, &controller, &Role::Controller);
    s.pool.set_locker(&controller, &locker);
    assert_eq!(s.pool.get_locker(), Some(locker));

    // Controllers cannot hand out roles.
    let result = s.pool.try_grant_role(&controller, &controller, &Role::Owner);
    assert_eq!(result.unwrap_err().unwrap(), PoolError::Unauthorized);
}

#[test]
fn test_revoke_role() {
    let s = setup();
    let guardian = Address::generate(&s.env);
    s.pool.grant_role(&s.admin, &guardian, &Role::Guardian);

    let result = s.pool.try_revoke_role(&guardian, &s.admin);
    assert_eq!(result.unwrap_err().unwrap(), PoolError::Unauthorized);

    s.pool.revoke_role(&s.admin, &guardian);
    assert_eq!(s.pool.get_role(&guardian), None);
    let result = s.pool.try_pause(&guardian);
    assert_eq!(result.unwrap_err().unwrap(), PoolError::Unauthorized);

    // The bootstrap owner stays.
    let result = s.pool.try_revoke_role(&s.admin, &s.admin);
    assert_eq!(result.unwrap_err().unwrap(), PoolError::Unauthorized);
}
