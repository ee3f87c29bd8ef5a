#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub staking_asset: Address,
    pub allocator: Address,
    pub precision: i128,
    pub timestamp: u64,
}

/// Fired when units enter a position.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub position_id: u64,
    pub owner: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub timestamp: u64,
}

/// Fired when units leave a position through the settled path.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub position_id: u64,
    pub owner: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestedEvent {
    pub position_id: u64,
    pub owner: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockedEvent {
    pub position_id: u64,
    pub owner: Address,
    pub locker: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when units leave a position without settlement.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyExitEvent {
    pub position_id: u64,
    pub owner: Address,
    pub amount: i128,
    pub forfeited: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockerSetEvent {
    pub locker: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseEvent {
    pub caller: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    staking_asset: Address,
    allocator: Address,
    precision: i128,
) {
    let timestamp = env.ledger().timestamp();
    env.events().publish(
        (symbol_short!("INIT"), admin.clone()),
        InitializedEvent {
            admin,
            staking_asset,
            allocator,
            precision,
            timestamp,
        },
    );
}

pub fn publish_staked(
    env: &Env,
    position_id: u64,
    owner: Address,
    amount: i128,
    new_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("STAKE"), owner.clone()),
        StakedEvent {
            position_id,
            owner,
            amount,
            new_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    position_id: u64,
    owner: Address,
    amount: i128,
    new_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), owner.clone()),
        WithdrawnEvent {
            position_id,
            owner,
            amount,
            new_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_harvested(env: &Env, position_id: u64, owner: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("HARVEST"), owner.clone()),
        HarvestedEvent {
            position_id,
            owner,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_locked(env: &Env, position_id: u64, owner: Address, locker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("LOCK"), owner.clone()),
        LockedEvent {
            position_id,
            owner,
            locker,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emergency_exit(
    env: &Env,
    position_id: u64,
    owner: Address,
    amount: i128,
    forfeited: i128,
) {
    env.events().publish(
        (symbol_short!("EMERGENCY"), owner.clone()),
        EmergencyExitEvent {
            position_id,
            owner,
            amount,
            forfeited,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_locker_set(env: &Env, locker: Address) {
    env.events().publish(
        (symbol_short!("LOCKER"),),
        LockerSetEvent {
            locker,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_paused(env: &Env, caller: Address) {
    env.events().publish(
        (symbol_short!("PAUSED"), caller.clone()),
        PauseEvent {
            caller,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_resumed(env: &Env, caller: Address) {
    env.events().publish(
        (symbol_short!("RESUMED"), caller.clone()),
        PauseEvent {
            caller,
            timestamp: env.ledger().timestamp(),
        },
    );
}
