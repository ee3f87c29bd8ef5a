use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use common::access::{TTL_EXTEND_TO, TTL_THRESHOLD};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");
const HALF_LIFE_CHANGED: Symbol = symbol_short!("HL_CHG");
const TOTAL_EMITTED: Symbol = symbol_short!("TOT_EMIT");
const TOTAL_BPS: Symbol = symbol_short!("TOT_BPS");
const RECIPIENTS: Symbol = symbol_short!("RCPTS");

// Per-recipient persistent storage uses tuple keys: (prefix, recipient)
const RECIPIENT: Symbol = symbol_short!("RCPT");

// ── Stored types ─────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionConfig {
    pub reward_token: Address,
    pub max_budget: i128,
    pub half_life: u64,
}

/// Settlement bookkeeping for one recipient.
///
/// `undeclared` holds what was accrued on the recipient's behalf during a
/// forced settlement (reallocation or half-life change) and has not yet been
/// moved into `unminted` by `declare`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecipientEntry {
    pub allocation_bps: u32,
    pub unminted: i128,
    pub undeclared: i128,
    pub last_update: u64,
}

impl RecipientEntry {
    pub fn new(now: u64) -> Self {
        Self {
            allocation_bps: 0,
            unminted: 0,
            undeclared: 0,
            last_update: now,
        }
    }
}

/// A recipient paired with its entry, as returned by paginated reads.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecipientInfo {
    pub recipient: Address,
    pub entry: RecipientEntry,
}

// ── Instance data ────────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn mark_initialized(env: &Env) {
    env.storage().instance().set(&INITIALIZED, &true);
    bump_instance(env);
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn config(env: &Env) -> Option<EmissionConfig> {
    env.storage().instance().get(&CONFIG)
}

pub fn set_config(env: &Env, config: &EmissionConfig) {
    env.storage().instance().set(&CONFIG, config);
}

pub fn half_life_changed(env: &Env) -> Option<u64> {
    env.storage().instance().get(&HALF_LIFE_CHANGED)
}

pub fn set_half_life_changed(env: &Env, at: u64) {
    env.storage().instance().set(&HALF_LIFE_CHANGED, &at);
}

pub fn total_emitted(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_EMITTED).unwrap_or(0)
}

pub fn set_total_emitted(env: &Env, total: i128) {
    env.storage().instance().set(&TOTAL_EMITTED, &total);
}

pub fn total_bps(env: &Env) -> u32 {
    env.storage().instance().get(&TOTAL_BPS).unwrap_or(0)
}

pub fn set_total_bps(env: &Env, total: u32) {
    env.storage().instance().set(&TOTAL_BPS, &total);
}

pub fn recipients(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&RECIPIENTS)
        .unwrap_or(Vec::new(env))
}

pub fn set_recipients(env: &Env, list: &Vec<Address>) {
    env.storage().instance().set(&RECIPIENTS, list);
}

// ── Recipient table ──────────────────────────────────────────────────────────

fn entry_key(recipient: &Address) -> (Symbol, Address) {
    (RECIPIENT, recipient.clone())
}

pub fn entry(env: &Env, recipient: &Address) -> Option<RecipientEntry> {
    let key = entry_key(recipient);
    let found: Option<RecipientEntry> = env.storage().persistent().get(&key);
    if found.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    found
}

pub fn save_entry(env: &Env, recipient: &Address, entry: &RecipientEntry) {
    let key = entry_key(recipient);
    env.storage().persistent().set(&key, entry);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
