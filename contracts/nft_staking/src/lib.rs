#![no_std]

use accounting::collaborators::NftClient;
use accounting::{admin, events, ledger, storage, Ledger, PoolError, PoolState, Position, MAX_BATCH};
use common::access::{self, Role};
use common::pause;
use soroban_sdk::{contract, contractimpl, Address, Env, Vec};

/// Most tokens one aggregate position may hold.
pub const MAX_TOKENS_PER_POSITION: u32 = 100;

// ── Contract ─────────────────────────────────────────────────────────────────

/// Staking pool for NFTs. Each token counts as one unit; an owner holds a
/// single aggregate position whose `entry_sum` mixes units staked at
/// different times. A side table records which position every staked token
/// belongs to.
#[contract]
pub struct NftStakingPool;

#[contractimpl]
impl NftStakingPool {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `nft`       – contract of the collection users stake.
    /// * `allocator` – emission allocator that lists this pool as a
    ///                 recipient.
    /// * `precision` – fixed-point factor for the reward accumulators,
    ///                 at most 10^36. Deployments use about 10^30.
    pub fn initialize(
        env: Env,
        admin: Address,
        nft: Address,
        allocator: Address,
        precision: i128,
    ) -> Result<(), PoolError> {
        admin::initialize(&env, &admin, &nft, &allocator, precision)
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Move `token_ids` from `from` into the position of `recipient`.
    /// The pool must be an approved operator of `from`. Returns the
    /// position id.
    pub fn stake(env: Env, from: Address, token_ids: Vec<u64>, recipient: Address) -> Result<u64, PoolError> {
        admin::require_initialized(&env)?;
        from.require_auth();

        Self::check_batch(&token_ids)?;
        admin::require_recipient(&env, &recipient)?;
        admin::require_not_paused(&env)?;

        let nft = Self::nft(&env)?;
        let this = env.current_contract_address();
        if !nft.is_approved_for_all(&from, &this) {
            return Err(PoolError::NotApproved);
        }
        for token_id in token_ids.iter() {
            if nft.owner_of(&token_id) != from {
                return Err(PoolError::NotTokenOwner);
            }
        }

        let mut ledger = Ledger::load(&env)?;
        ledger.settle_pool()?;
        let (id, mut position) = match storage::owner_position(&env, &recipient) {
            Some(id) => (id, ledger.position(id)?),
            None => ledger.open(&recipient),
        };

        let mut held = storage::position_tokens(&env, id);
        if held.len() + token_ids.len() > MAX_TOKENS_PER_POSITION {
            return Err(PoolError::TooManyTokens);
        }
        ledger.deposit(&mut position, i128::from(token_ids.len()))?;

        for token_id in token_ids.iter() {
            nft.transfer_from(&this, &from, &this, &token_id);
            storage::set_token_position(&env, token_id, id);
            held.push_back(token_id);
        }

        storage::set_position_tokens(&env, id, &held);
        storage::set_owner_position(&env, &recipient, id);
        ledger.store(id, &position);
        ledger.commit();

        events::publish_staked(
            &env,
            id,
            recipient,
            i128::from(token_ids.len()),
            ledger.pool.total_staked,
        );

        Ok(id)
    }

    /// Return `token_ids` from the caller's position. Rewards earned so far
    /// stay in the stash.
    pub fn withdraw(env: Env, owner: Address, token_ids: Vec<u64>) -> Result<(), PoolError> {
        admin::require_initialized(&env)?;
        owner.require_auth();

        Self::check_batch(&token_ids)?;
        let mut ledger = Ledger::load(&env)?;
        let id = Self::position_id(&env, &owner)?;
        let mut position = ledger.owned(id, &owner)?;
        Self::check_held(&env, id, &token_ids)?;

        ledger.settle_pool()?;
        ledger.withdraw(&mut position, i128::from(token_ids.len()))?;
        Self::release(&env, id, &token_ids);
        ledger.store(id, &position);
        ledger.commit();

        Self::send_tokens(&env, &owner, &token_ids)?;
        events::publish_withdrawn(
            &env,
            id,
            owner,
            i128::from(token_ids.len()),
            ledger.pool.total_staked,
        );

        Ok(())
    }

    /// Return `token_ids` without touching the allocator. The whole
    /// unharvested reward of the position is forfeited.
    pub fn emergency_exit(env: Env, owner: Address, token_ids: Vec<u64>) -> Result<(), PoolError> {
        admin::require_initialized(&env)?;
        owner.require_auth();

        Self::check_batch(&token_ids)?;
        let mut ledger = Ledger::load(&env)?;
        let id = Self::position_id(&env, &owner)?;
        let mut position = ledger.owned(id, &owner)?;
        Self::check_held(&env, id, &token_ids)?;

        let amount = i128::from(token_ids.len());
        let forfeited = ledger.forfeit(&mut position, amount)?;
        Self::release(&env, id, &token_ids);
        ledger.store(id, &position);
        ledger.commit();

        Self::send_tokens(&env, &owner, &token_ids)?;
        events::publish_emergency_exit(&env, id, owner, amount, forfeited);

        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Mint the caller's settled stash to them.
    pub fn harvest(env: Env, owner: Address) -> Result<i128, PoolError> {
        admin::require_initialized(&env)?;
        owner.require_auth();

        let mut ledger = Ledger::load(&env)?;
        let id = Self::position_id(&env, &owner)?;
        let mut position = ledger.owned(id, &owner)?;
        ledger.settle_pool()?;
        let amount = ledger.claim(&mut position, None)?;

        ledger.store(id, &position);
        ledger.commit();
        ledger.pay(&owner, amount)?;

        events::publish_harvested(&env, id, owner, amount);

        Ok(amount)
    }

    /// Mint `amount` of the caller's settled stash into the vesting locker.
    pub fn lock(env: Env, owner: Address, amount: i128) -> Result<(), PoolError> {
        admin::require_initialized(&env)?;
        owner.require_auth();

        if amount <= 0 {
            return Err(PoolError::ZeroAmount);
        }
        if storage::locker(&env).is_none() {
            return Err(PoolError::NoLocker);
        }

        let mut ledger = Ledger::load(&env)?;
        let id = Self::position_id(&env, &owner)?;
        let mut position = ledger.owned(id, &owner)?;
        ledger.settle_pool()?;
        let amount = ledger.claim(&mut position, Some(amount))?;

        ledger.store(id, &position);
        ledger.commit();
        let locker = ledger.pay_into_locker(&owner, amount)?;

        events::publish_locked(&env, id, owner, locker, amount);

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

    pub fn position_of(env: Env, owner: Address) -> Option<u64> {
        storage::owner_position(&env, &owner)
    }

    pub fn get_position(env: Env, position_id: u64) -> Result<Position, PoolError> {
        storage::position(&env, position_id).ok_or(PoolError::PositionNotFound)
    }

    /// Tokens currently staked in `owner`'s position, in staking order.
    pub fn tokens_of(env: Env, owner: Address) -> Vec<u64> {
        match storage::owner_position(&env, &owner) {
            Some(id) => storage::position_tokens(&env, id),
            None => Vec::new(&env),
        }
    }

    /// Owner of the position a staked token belongs to.
    pub fn owner_of_token(env: Env, token_id: u64) -> Option<Address> {
        let id = storage::token_position(&env, token_id)?;
        storage::position(&env, id).map(|position| position.owner)
    }

    pub fn pending_rewards(env: Env, owner: Address) -> Result<i128, PoolError> {
        let id = Self::position_id(&env, &owner)?;
        ledger::pending_rewards(&env, id)
    }

    pub fn get_pool_state(env: Env) -> Result<PoolState, PoolError> {
        storage::pool(&env)
    }

    pub fn get_total_staked(env: Env) -> Result<i128, PoolError> {
        Ok(storage::pool(&env)?.total_staked)
    }

    pub fn get_nft(env: Env) -> Result<Address, PoolError> {
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

    fn nft(env: &Env) -> Result<NftClient<'_>, PoolError> {
        let config = storage::config(env)?;
        Ok(NftClient::new(env, &config.staking_asset))
    }

    fn position_id(env: &Env, owner: &Address) -> Result<u64, PoolError> {
        storage::owner_position(env, owner).ok_or(PoolError::PositionNotFound)
    }

    /// Non-empty, at most [`MAX_BATCH`] ids, no id twice.
    fn check_batch(token_ids: &Vec<u64>) -> Result<(), PoolError> {
        if token_ids.is_empty() {
            return Err(PoolError::ZeroAmount);
        }
        if token_ids.len() > MAX_BATCH {
            return Err(PoolError::TooManyTokens);
        }
        for (index, token_id) in token_ids.iter().enumerate() {
            if token_ids
                .iter()
                .skip(index + 1)
                .any(|other| other == token_id)
            {
                return Err(PoolError::DuplicateToken);
            }
        }
        Ok(())
    }

    fn check_held(env: &Env, id: u64, token_ids: &Vec<u64>) -> Result<(), PoolError> {
        for token_id in token_ids.iter() {
            if storage::token_position(env, token_id) != Some(id) {
                return Err(PoolError::InvalidToken);
            }
        }
        Ok(())
    }

    /// Drops `token_ids` from the side table.
    fn release(env: &Env, id: u64, token_ids: &Vec<u64>) {
        let mut held = storage::position_tokens(env, id);
        for token_id in token_ids.iter() {
            storage::clear_token_position(env, token_id);
            if let Some(index) = held.first_index_of(token_id) {
                held.remove(index);
            }
        }
        storage::set_position_tokens(env, id, &held);
    }

    fn send_tokens(env: &Env, to: &Address, token_ids: &Vec<u64>) -> Result<(), PoolError> {
        let nft = Self::nft(env)?;
        let this = env.current_contract_address();
        for token_id in token_ids.iter() {
            nft.transfer_from(&this, &this, to, &token_id);
        }
        Ok(())
    }
}
