use soroban_sdk::{Address, Env};

use crate::collaborators::{AllocatorClient, LockerClient};
use crate::{storage, PoolError, PoolState, Position};

/// A pool loaded for one call.
///
/// Every operation follows the same order: load, validate, bring the pool's
/// accumulators up to date with [`Ledger::settle_pool`], settle the acting
/// position, change balances, then [`Ledger::commit`]. Positions are passed
/// in by reference and written back with [`Ledger::store`].
pub struct Ledger {
    env: Env,
    pub pool: PoolState,
    pub now: u64,
}

impl Ledger {
    pub fn load(env: &Env) -> Result<Self, PoolError> {
        Ok(Self {
            env: env.clone(),
            pool: storage::pool(env)?,
            now: env.ledger().timestamp(),
        })
    }

    /// Pulls the pool's newly owed reward from the allocator and folds it
    /// into the accumulators.
    ///
    /// Nothing is pulled while the pool has no time-weight to spread it
    /// over; that emission stays with the allocator until the next pull.
    pub fn settle_pool(&mut self) -> Result<(), PoolError> {
        let reward = if self.pool.total_staked > 0 && self.pool.time_weight(self.now)? > 0 {
            self.allocator()?.declare(&self.env.current_contract_address())
        } else {
            0
        };
        self.pool.distribute(reward, self.now)
    }

    /// Like [`Ledger::settle_pool`] but uses the allocator's read-only view,
    /// for computing pending rewards without writing anything.
    pub fn preview_pool(&mut self) -> Result<(), PoolError> {
        let reward = if self.pool.total_staked > 0 && self.pool.time_weight(self.now)? > 0 {
            self.allocator()?
                .pending_rewards(&self.env.current_contract_address())
        } else {
            0
        };
        self.pool.distribute(reward, self.now)
    }

    fn allocator(&self) -> Result<AllocatorClient<'_>, PoolError> {
        let config = storage::config(&self.env)?;
        Ok(AllocatorClient::new(&self.env, &config.allocator))
    }

    // ── Positions ───────────────────────────────────────────────────────────

    pub fn position(&self, id: u64) -> Result<Position, PoolError> {
        storage::position(&self.env, id).ok_or(PoolError::PositionNotFound)
    }

    /// Loads position `id` and checks that `owner` holds it.
    pub fn owned(&self, id: u64, owner: &Address) -> Result<Position, PoolError> {
        let position = self.position(id)?;
        if position.owner != *owner {
            return Err(PoolError::Unauthorized);
        }
        Ok(position)
    }

    /// Hands out a fresh position id with an empty position for `owner`.
    pub fn open(&self, owner: &Address) -> (u64, Position) {
        let id = storage::next_position_id(&self.env);
        (id, Position::open(owner.clone(), &self.pool, self.now))
    }

    pub fn store(&self, id: u64, position: &Position) {
        storage::save_position(&self.env, id, position);
    }

    pub fn commit(&self) {
        storage::set_pool(&self.env, &self.pool);
    }

    // ── Transitions ─────────────────────────────────────────────────────────

    pub fn deposit(&mut self, position: &mut Position, amount: i128) -> Result<(), PoolError> {
        if amount <= 0 {
            return Err(PoolError::ZeroAmount);
        }
        self.pool.settle(position, self.now)?;
        self.pool.enter(position, amount, self.now)
    }

    pub fn withdraw(&mut self, position: &mut Position, amount: i128) -> Result<(), PoolError> {
        if amount <= 0 {
            return Err(PoolError::ZeroAmount);
        }
        if amount > position.balance {
            return Err(PoolError::InsufficientBalance);
        }
        self.pool.settle(position, self.now)?;
        self.pool.exit(position, amount)
    }

    /// Settles `position` and takes `amount` (or the whole stash when `None`)
    /// out of its stash. Returns the amount taken.
    pub fn claim(&mut self, position: &mut Position, amount: Option<i128>) -> Result<i128, PoolError> {
        self.pool.settle(position, self.now)?;
        if position.stash == 0 {
            return Err(PoolError::NoReward);
        }
        let taken = match amount {
            Some(amount) if amount <= 0 => return Err(PoolError::ZeroAmount),
            Some(amount) if amount > position.stash => {
                return Err(PoolError::InsufficientBalance)
            }
            Some(amount) => amount,
            None => position.stash,
        };
        position.stash -= taken;
        Ok(taken)
    }

    /// Removes `amount` units without settling the pool or the position.
    /// Returns the stash that was dropped.
    pub fn forfeit(&mut self, position: &mut Position, amount: i128) -> Result<i128, PoolError> {
        if amount <= 0 {
            return Err(PoolError::ZeroAmount);
        }
        self.pool.forfeit(position, amount, self.now)
    }

    // ── Payouts ─────────────────────────────────────────────────────────────

    /// Has the allocator mint `amount` of this pool's declared reward to `to`.
    pub fn pay(&self, to: &Address, amount: i128) -> Result<(), PoolError> {
        self.allocator()?
            .mint(&self.env.current_contract_address(), to, &amount);
        Ok(())
    }

    /// Mints `amount` to the configured vesting locker on behalf of
    /// `beneficiary`.
    pub fn pay_into_locker(&self, beneficiary: &Address, amount: i128) -> Result<Address, PoolError> {
        let locker = storage::locker(&self.env).ok_or(PoolError::NoLocker)?;
        self.pay(&locker, amount)?;
        LockerClient::new(&self.env, &locker).deposit(
            &self.env.current_contract_address(),
            beneficiary,
            &amount,
        );
        Ok(locker)
    }
}

/// Stash plus what a settlement at the current time would add to it.
pub fn pending_rewards(env: &Env, id: u64) -> Result<i128, PoolError> {
    let mut ledger = Ledger::load(env)?;
    let position = ledger.position(id)?;
    ledger.preview_pool()?;
    let earned = ledger.pool.earned(&position)?;
    position.stash.checked_add(earned).ok_or(PoolError::Overflow)
}
