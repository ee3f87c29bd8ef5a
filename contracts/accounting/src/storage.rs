use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use common::access::{TTL_EXTEND_TO, TTL_THRESHOLD};

use crate::{PoolError, PoolState, Position};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");
const POOL: Symbol = symbol_short!("POOL");
const POSITION_COUNTER: Symbol = symbol_short!("POS_CTR");
const LOCKER: Symbol = symbol_short!("LOCKER");

// Persistent storage uses tuple keys: (prefix, id or address)
const POSITION: Symbol = symbol_short!("POS");
const OWNED: Symbol = symbol_short!("OWNED");
const OWNER_POSITION: Symbol = symbol_short!("USR_POS");
const TOKEN_POSITION: Symbol = symbol_short!("TOK_POS");
const POSITION_TOKENS: Symbol = symbol_short!("POS_TOKS");

/// Addresses a pool is wired to at deployment.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Token (fungible SAC or NFT contract) users stake.
    pub staking_asset: Address,
    /// Emission allocator this pool is a recipient of.
    pub allocator: Address,
}

fn bump<K>(env: &Env, key: &K)
where
    K: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Instance data ────────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn mark_initialized(env: &Env) {
    env.storage().instance().set(&INITIALIZED, &true);
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn config(env: &Env) -> Result<PoolConfig, PoolError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(PoolError::NotInitialized)
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&CONFIG, config);
}

pub fn pool(env: &Env) -> Result<PoolState, PoolError> {
    env.storage()
        .instance()
        .get(&POOL)
        .ok_or(PoolError::NotInitialized)
}

pub fn set_pool(env: &Env, pool: &PoolState) {
    env.storage().instance().set(&POOL, pool);
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn locker(env: &Env) -> Option<Address> {
    env.storage().instance().get(&LOCKER)
}

pub fn set_locker(env: &Env, locker: &Address) {
    env.storage().instance().set(&LOCKER, locker);
}

/// Number of position ids handed out so far. Ids start at 1.
pub fn positions_len(env: &Env) -> u64 {
    env.storage().instance().get(&POSITION_COUNTER).unwrap_or(0)
}

pub fn next_position_id(env: &Env) -> u64 {
    let id = positions_len(env).saturating_add(1);
    env.storage().instance().set(&POSITION_COUNTER, &id);
    id
}

// ── Positions ────────────────────────────────────────────────────────────────

pub fn position(env: &Env, id: u64) -> Option<Position> {
    let key = (POSITION, id);
    let found: Option<Position> = env.storage().persistent().get(&key);
    if found.is_some() {
        bump(env, &key);
    }
    found
}

pub fn save_position(env: &Env, id: u64, position: &Position) {
    let key = (POSITION, id);
    env.storage().persistent().set(&key, position);
    bump(env, &key);
}

/// Open position ids held by `owner`, in opening order.
pub fn owned(env: &Env, owner: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&(OWNED, owner.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn add_owned(env: &Env, owner: &Address, id: u64) {
    let key = (OWNED, owner.clone());
    let mut ids = owned(env, owner);
    if !ids.contains(id) {
        ids.push_back(id);
    }
    env.storage().persistent().set(&key, &ids);
    bump(env, &key);
}

pub fn remove_owned(env: &Env, owner: &Address, id: u64) {
    let key = (OWNED, owner.clone());
    let mut ids = owned(env, owner);
    if let Some(index) = ids.first_index_of(id) {
        ids.remove(index);
        env.storage().persistent().set(&key, &ids);
    }
}

// ── Per-owner aggregate positions ────────────────────────────────────────────

pub fn owner_position(env: &Env, owner: &Address) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&(OWNER_POSITION, owner.clone()))
}

pub fn set_owner_position(env: &Env, owner: &Address, id: u64) {
    let key = (OWNER_POSITION, owner.clone());
    env.storage().persistent().set(&key, &id);
    bump(env, &key);
}

// ── Unit side table ──────────────────────────────────────────────────────────

pub fn token_position(env: &Env, token_id: u64) -> Option<u64> {
    env.storage().persistent().get(&(TOKEN_POSITION, token_id))
}

pub fn set_token_position(env: &Env, token_id: u64, id: u64) {
    let key = (TOKEN_POSITION, token_id);
    env.storage().persistent().set(&key, &id);
    bump(env, &key);
}

pub fn clear_token_position(env: &Env, token_id: u64) {
    env.storage().persistent().remove(&(TOKEN_POSITION, token_id));
}

pub fn position_tokens(env: &Env, id: u64) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&(POSITION_TOKENS, id))
        .unwrap_or(Vec::new(env))
}

pub fn set_position_tokens(env: &Env, id: u64, tokens: &Vec<u64>) {
    let key = (POSITION_TOKENS, id);
    env.storage().persistent().set(&key, tokens);
    bump(env, &key);
}
