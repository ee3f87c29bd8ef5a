#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub max_budget: i128,
    pub half_life: u64,
    pub timestamp: u64,
}

/// Fired once per recipient whose allocation changes in a reconfiguration.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllocationChangedEvent {
    pub recipient: Address,
    pub old_bps: u32,
    pub new_bps: u32,
    pub timestamp: u64,
}

/// Fired when the allocation sum crosses between 0 and the full denominator.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActivationEvent {
    pub active: bool,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeclaredEvent {
    pub recipient: Address,
    pub amount: i128,
    pub unminted: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintedEvent {
    pub recipient: Address,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HalfLifeChangedEvent {
    pub old_half_life: u64,
    pub new_half_life: u64,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    reward_token: Address,
    max_budget: i128,
    half_life: u64,
) {
    let timestamp = env.ledger().timestamp();
    env.events().publish(
        (symbol_short!("INIT"), admin.clone()),
        InitializedEvent {
            admin,
            reward_token,
            max_budget,
            half_life,
            timestamp,
        },
    );
}

pub fn publish_allocation_changed(env: &Env, recipient: Address, old_bps: u32, new_bps: u32) {
    env.events().publish(
        (symbol_short!("ALLOC"), recipient.clone()),
        AllocationChangedEvent {
            recipient,
            old_bps,
            new_bps,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_activation(env: &Env, active: bool) {
    env.events().publish(
        (symbol_short!("ACTIVE"),),
        ActivationEvent {
            active,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_declared(env: &Env, recipient: Address, amount: i128, unminted: i128) {
    env.events().publish(
        (symbol_short!("DECLARE"), recipient.clone()),
        DeclaredEvent {
            recipient,
            amount,
            unminted,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_minted(env: &Env, recipient: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("MINT"), recipient.clone()),
        MintedEvent {
            recipient,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_half_life_changed(env: &Env, old_half_life: u64, new_half_life: u64) {
    env.events().publish(
        (symbol_short!("HALFLIFE"),),
        HalfLifeChangedEvent {
            old_half_life,
            new_half_life,
            timestamp: env.ledger().timestamp(),
        },
    );
}
