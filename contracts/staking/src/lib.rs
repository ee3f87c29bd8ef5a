#![no_std]

use accounting::{admin, events, ledger, storage, Ledger, PoolError, PoolState, Position, MAX_BATCH};
use common::access::{self, Role};
use common::pause;
use soroban_sdk::{contract, contractimpl, token, Address, Env, Vec};

// ── Contract ─────────────────────────────────────────────────────────────────

/// Staking pool for a fungible token. Every `stake` opens a new position, so
/// one owner may hold many positions with different entry times.
#[contract]
pub struct StakingPool;

#[contractimpl]
impl StakingPool {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `stake_token` – SAC address of the token users stake.
    /// * `allocator`   – emission allocator that lists this pool as a
    ///                   recipient.
    /// * `precision`   – fixed-point factor for the reward accumulators, at
    ///                   most 10^36. Deployments use about 10^30.
    pub fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        allocator: Address,
        precision: i128,
    ) -> Result<(), PoolError> {
        admin::initialize(&env, &admin, &stake_token, &allocator, precision)
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Pull `amount` stake tokens from `from` into a new position owned by
    /// `recipient`. Returns the position id.
    pub fn stake(env: Env, from: Address, amount: i128, recipient: Address) -> Result<u64, PoolError> {
        admin::require_initialized(&env)?;
        from.require_auth();

        if amount <= 0 {
            return Err(PoolError::ZeroAmount);
        }
        admin::require_recipient(&env, &recipient)?;
        admin::require_not_paused(&env)?;

        // 1. Bring the pool up to date, then open the position at "now".
        let mut ledger = Ledger::load(&env)?;
        ledger.settle_pool()?;
        let (id, mut position) = ledger.open(&recipient);
        ledger.deposit(&mut position, amount)?;

        // 2. Pull tokens from the staker into the contract.
        let config = storage::config(&env)?;
        token::Client::new(&env, &config.staking_asset).transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );

        // 3. Persist.
        ledger.store(id, &position);
        storage::add_owned(&env, &recipient, id);
        ledger.commit();

        events::publish_staked(&env, id, recipient, amount, ledger.pool.total_staked);

        Ok(id)
    }

    /// Return `amount` stake tokens from position `position_id` to its owner.
    /// Rewards earned so far stay in the position's stash.
    pub fn withdraw(env: Env, owner: Address, position_id: u64, amount: i128) -> Result<(), PoolError> {
        admin::require_initialized(&env)?;
        owner.require_auth();

        if amount <= 0 {
            return Err(PoolError::ZeroAmount);
        }

        let mut ledger = Ledger::load(&env)?;
        let mut position = ledger.owned(position_id, &owner)?;
        if amount > position.balance {
            return Err(PoolError::InsufficientBalance);
        }

        ledger.settle_pool()?;
        ledger.withdraw(&mut position, amount)?;
        Self::close_if_empty(&env, position_id, &position);
        ledger.store(position_id, &position);
        ledger.commit();

        Self::send_stake(&env, &owner, amount)?;
        events::publish_withdrawn(&env, position_id, owner, amount, ledger.pool.total_staked);

        Ok(())
    }

    /// Withdraw the whole balance of up to 20 positions. Returns the total
    /// amount sent back. Ids that are already empty, including repeats
    /// within the batch, are skipped.
    pub fn mass_exit(env: Env, owner: Address, position_ids: Vec<u64>) -> Result<i128, PoolError> {
        admin::require_initialized(&env)?;
        owner.require_auth();

        if position_ids.len() > MAX_BATCH {
            return Err(PoolError::TooManyPositions);
        }

        let mut ledger = Ledger::load(&env)?;
        ledger.settle_pool()?;

        let mut total: i128 = 0;
        for id in position_ids.iter() {
            let mut position = ledger.owned(id, &owner)?;
            if position.balance == 0 {
                continue;
            }
            let amount = position.balance;
            ledger.withdraw(&mut position, amount)?;
            Self::close_if_empty(&env, id, &position);
            ledger.store(id, &position);
            total = total.checked_add(amount).ok_or(PoolError::Overflow)?;
            events::publish_withdrawn(&env, id, owner.clone(), amount, ledger.pool.total_staked);
        }
        ledger.commit();

        if total > 0 {
            Self::send_stake(&env, &owner, total)?;
        }
        Ok(total)
    }

    /// Return the principal of up to 20 positions without touching the
    /// allocator. Unharvested rewards of those positions are forfeited.
    /// Empty positions are skipped and keep their stash.
    pub fn emergency_exit(env: Env, owner: Address, position_ids: Vec<u64>) -> Result<i128, PoolError> {
        admin::require_initialized(&env)?;
        owner.require_auth();

        if position_ids.len() > MAX_BATCH {
            return Err(PoolError::TooManyPositions);
        }

        let mut ledger = Ledger::load(&env)?;
        let mut total: i128 = 0;
        for id in position_ids.iter() {
            let mut position = ledger.owned(id, &owner)?;
            if position.balance == 0 {
                continue;
            }
            let amount = position.balance;
            let forfeited = ledger.forfeit(&mut position, amount)?;
            Self::close_if_empty(&env, id, &position);
            ledger.store(id, &position);
            total = total.checked_add(amount).ok_or(PoolError::Overflow)?;
            events::publish_emergency_exit(&env, id, owner.clone(), amount, forfeited);
        }
        ledger.commit();

        if total > 0 {
            Self::send_stake(&env, &owner, total)?;
        }
        Ok(total)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Mint the settled stash of `position_id` to its owner.
    pub fn harvest(env: Env, owner: Address, position_id: u64) -> Result<i128, PoolError> {
        admin::require_initialized(&env)?;
        owner.require_auth();

        let mut ledger = Ledger::load(&env)?;
        let mut position = ledger.owned(position_id, &owner)?;
        ledger.settle_pool()?;
        let amount = ledger.claim(&mut position, None)?;

        // Effects before the mint call.
        ledger.store(position_id, &position);
        ledger.commit();
        ledger.pay(&owner, amount)?;

        events::publish_harvested(&env, position_id, owner, amount);

        Ok(amount)
    }

    /// Mint `amount` of the settled stash of `position_id` into the vesting
    /// locker on behalf of its owner.
    pub fn lock(env: Env, owner: Address, position_id: u64, amount: i128) -> Result<(), PoolError> {
        admin::require_initialized(&env)?;
        owner.require_auth();

        if amount <= 0 {
            return Err(PoolError::ZeroAmount);
        }
        if storage::locker(&env).is_none() {
            return Err(PoolError::NoLocker);
        }

        let mut ledger = Ledger::load(&env)?;
        let mut position = ledger.owned(position_id, &owner)?;
        ledger.settle_pool()?;
        let amount = ledger.claim(&mut position, Some(amount))?;

        ledger.store(position_id, &position);
        ledger.commit();
        let locker = ledger.pay_into_locker(&owner, amount)?;

        events::publish_locked(&env, position_id, owner, locker, amount);

        Ok(())
    }

    // ── Administration ──────────────────────────────────────────────────────

    pub fn pause(env: Env, caller: Address) -> Result<(), PoolError> {
        caller.require_auth();
        admin::pause(&env, &caller)
    }

    pub fn resume(env: Env, caller: Address) -> Result<(), PoolError> {
        caller.require_auth();
        admin::resume(&env, &caller)
    }

    pub fn set_locker(env: Env, caller: Address, locker: Address) -> Result<(), PoolError> {
        caller.require_auth();
        admin::set_locker(&env, &caller, &locker)
    }

    pub fn grant_role(env: Env, caller: Address, target: Address, role: Role) -> Result<(), PoolError> {
        caller.require_auth();
        admin::grant_role(&env, &caller, &target, role)
    }

    pub fn revoke_role(env: Env, caller: Address, target: Address) -> Result<(), PoolError> {
        caller.require_auth();
        admin::revoke_role(&env, &caller, &target)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn get_position(env: Env, position_id: u64) -> Result<Position, PoolError> {
        storage::position(&env, position_id).ok_or(PoolError::PositionNotFound)
    }

    /// Open positions of `owner`, oldest first.
    pub fn get_positions_of(env: Env, owner: Address) -> Vec<u64> {
        storage::owned(&env, &owner)
    }

    /// Number of positions ever opened.
    pub fn get_positions_len(env: Env) -> u64 {
        storage::positions_len(&env)
    }

    /// Stash plus what a settlement right now would add.
    pub fn get_pending_rewards(env: Env, position_id: u64) -> Result<i128, PoolError> {
        ledger::pending_rewards(&env, position_id)
    }

    pub fn get_pool_state(env: Env) -> Result<PoolState, PoolError> {
        storage::pool(&env)
    }

    pub fn get_total_staked(env: Env) -> Result<i128, PoolError> {
        Ok(storage::pool(&env)?.total_staked)
    }

    pub fn get_stake_token(env: Env) -> Result<Address, PoolError> {
        Ok(storage::config(&env)?.staking_asset)
    }

    pub fn get_allocator(env: Env) -> Result<Address, PoolError> {
        Ok(storage::config(&env)?.allocator)
    }

    pub fn get_locker(env: Env) -> Option<Address> {
        storage::locker(&env)
    }

    pub fn get_role(env: Env, address: Address) -> Option<Role> {
        access::role_of(&env, &address)
    }

    pub fn is_paused(env: Env) -> bool {
        pause::is_paused(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    // ── Internal helpers ────────────────────────────────────────────────────

    fn close_if_empty(env: &Env, id: u64, position: &Position) {
        if position.balance == 0 {
            storage::remove_owned(env, &position.owner, id);
        }
    }

    fn send_stake(env: &Env, to: &Address, amount: i128) -> Result<(), PoolError> {
        let config = storage::config(env)?;
        token::Client::new(env, &config.staking_asset).transfer(
            &env.current_contract_address(),
            to,
            &amount,
        );
        Ok(())
    }
}

#[cfg(test)]
mod test_admin;
#[cfg(test)]
mod test_exits;
