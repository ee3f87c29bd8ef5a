//! Deployment configuration and privileged operations shared by every pool
//! variant. Callers authenticate `caller` before reaching these helpers.

use common::access::{self, Role};
use common::pause;
use soroban_sdk::{Address, Env};

use crate::{events, storage, PoolConfig, PoolError, PoolState, MAX_PRECISION};

/// Stores the pool's wiring and an empty pool, and makes `admin` its owner.
pub fn initialize(
    env: &Env,
    admin: &Address,
    staking_asset: &Address,
    allocator: &Address,
    precision: i128,
) -> Result<(), PoolError> {
    if storage::is_initialized(env) {
        return Err(PoolError::AlreadyInitialized);
    }
    if !(1..=MAX_PRECISION).contains(&precision) {
        return Err(PoolError::InvalidPrecision);
    }

    storage::set_config(
        env,
        &PoolConfig {
            staking_asset: staking_asset.clone(),
            allocator: allocator.clone(),
        },
    );
    storage::set_pool(env, &PoolState::new(env, precision, env.ledger().timestamp()));
    storage::mark_initialized(env);
    access::bootstrap(env, admin);

    events::publish_initialized(
        env,
        admin.clone(),
        staking_asset.clone(),
        allocator.clone(),
        precision,
    );
    Ok(())
}

pub fn require_initialized(env: &Env) -> Result<(), PoolError> {
    if !storage::is_initialized(env) {
        return Err(PoolError::NotInitialized);
    }
    Ok(())
}

pub fn require_role(env: &Env, caller: &Address, min: Role) -> Result<(), PoolError> {
    require_initialized(env)?;
    if !access::is_authorized(env, caller, min) {
        return Err(PoolError::Unauthorized);
    }
    Ok(())
}

pub fn require_not_paused(env: &Env) -> Result<(), PoolError> {
    if pause::is_paused(env) {
        return Err(PoolError::Paused);
    }
    Ok(())
}

/// Rejects recipients that could never withdraw: the pool itself and the
/// allocator.
pub fn require_recipient(env: &Env, recipient: &Address) -> Result<(), PoolError> {
    let config = storage::config(env)?;
    if *recipient == env.current_contract_address() || *recipient == config.allocator {
        return Err(PoolError::BadRecipient);
    }
    Ok(())
}

// ── Privileged operations ────────────────────────────────────────────────────

pub fn pause(env: &Env, caller: &Address) -> Result<(), PoolError> {
    require_role(env, caller, Role::Guardian)?;
    if !pause::set_paused(env, true) {
        return Err(PoolError::Paused);
    }
    events::publish_paused(env, caller.clone());
    Ok(())
}

pub fn resume(env: &Env, caller: &Address) -> Result<(), PoolError> {
    require_role(env, caller, Role::Guardian)?;
    if !pause::set_paused(env, false) {
        return Err(PoolError::NotPaused);
    }
    events::publish_resumed(env, caller.clone());
    Ok(())
}

pub fn set_locker(env: &Env, caller: &Address, locker: &Address) -> Result<(), PoolError> {
    require_role(env, caller, Role::Controller)?;
    storage::set_locker(env, locker);
    events::publish_locker_set(env, locker.clone());
    Ok(())
}

pub fn grant_role(env: &Env, caller: &Address, target: &Address, role: Role) -> Result<(), PoolError> {
    require_initialized(env)?;
    if !access::grant(env, caller, target, role) {
        return Err(PoolError::Unauthorized);
    }
    Ok(())
}

pub fn revoke_role(env: &Env, caller: &Address, target: &Address) -> Result<(), PoolError> {
    require_initialized(env)?;
    if !access::revoke(env, caller, target) {
        return Err(PoolError::Unauthorized);
    }
    Ok(())
}
