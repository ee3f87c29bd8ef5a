//! Pool and position arithmetic.
//!
//! For a reward increment `Δ` distributed at time `now`:
//!
//! ```text
//! W                  = now × total_staked − sum_weighted_entry
//! reward_rate_accum += Δ × P / W                        (rounded up)
//! ideal_position    += Δ × P × (now − init_time) / W    (floored)
//! ```
//!
//! and a position holding `balance` units with `entry_sum = Σ units × entry`
//! earns, between two settlements,
//!
//! ```text
//! earned = (balance × Δideal − (entry_sum − balance × init_time) × Δrate) / P
//! ```
//!
//! which is `Σ Δ × balance × (now − entry) / W` over the distributions in
//! between: its exact time-weighted share. Rounding the rate up and the ideal
//! position down keeps every computed share at or below the exact share, so
//! the shares of all positions never add up to more than what was
//! distributed.
//!
//! Rounding the rate up costs a position at most
//! `(entry_sum − balance × init_time) / P` reward units per distribution,
//! which is why the accumulators are 256-bit and `P` is expected to be
//! around 10^30: far above `total_staked × pool age` for any realistic pool.

use soroban_sdk::{contracttype, Address, Env, I256};

use crate::{wide, PoolError};

fn add(a: i128, b: i128) -> Result<i128, PoolError> {
    a.checked_add(b).ok_or(PoolError::Overflow)
}

fn sub(a: i128, b: i128) -> Result<i128, PoolError> {
    a.checked_sub(b).ok_or(PoolError::Overflow)
}

fn mul(a: i128, b: i128) -> Result<i128, PoolError> {
    a.checked_mul(b).ok_or(PoolError::Overflow)
}

// ── Pool ─────────────────────────────────────────────────────────────────────

/// Balances and entry sums are `i128`. The two accumulators carry a factor
/// of `precision` and are kept in 256 bits, so `precision` can be large
/// enough that the per-distribution rounding of the rate stays far below
/// one reward unit for any position.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    pub total_staked: i128,
    /// Σ units × entry timestamp over all staked units.
    pub sum_weighted_entry: i128,
    pub ideal_position: I256,
    pub reward_rate_accum: I256,
    pub last_update: u64,
    /// Set by the first stake ever, never reset afterwards.
    pub init_time: Option<u64>,
    /// Fixed-point factor applied to both accumulators.
    pub precision: i128,
}

impl PoolState {
    pub fn new(env: &Env, precision: i128, now: u64) -> Self {
        Self {
            total_staked: 0,
            sum_weighted_entry: 0,
            ideal_position: wide::zero(env),
            reward_rate_accum: wide::zero(env),
            last_update: now,
            init_time: None,
            precision,
        }
    }

    fn env(&self) -> &Env {
        self.ideal_position.env()
    }

    fn origin(&self) -> u64 {
        self.init_time.unwrap_or(self.last_update)
    }

    /// Σ units × (now − entry) over all staked units.
    pub fn time_weight(&self, now: u64) -> Result<i128, PoolError> {
        sub(
            mul(i128::from(now), self.total_staked)?,
            self.sum_weighted_entry,
        )
    }

    /// Folds a reward increment into the accumulators and moves
    /// `last_update` to `now`.
    pub fn distribute(&mut self, reward: i128, now: u64) -> Result<(), PoolError> {
        if reward > 0 {
            let weight = self.time_weight(now)?;
            if weight <= 0 {
                return Err(PoolError::NoTimeWeight);
            }
            let env = self.env();
            let weight = wide::from(env, weight);
            let scaled = wide::mul(&wide::from(env, reward), &wide::from(env, self.precision))?;
            let since_origin = wide::from(env, i128::from(now.saturating_sub(self.origin())));

            let rate = wide::add(&self.reward_rate_accum, &wide::div_ceil(&scaled, &weight))?;
            let ideal = wide::add(
                &self.ideal_position,
                &wide::div_floor(&wide::mul(&scaled, &since_origin)?, &weight),
            )?;
            self.reward_rate_accum = rate;
            self.ideal_position = ideal;
        }
        self.last_update = now;
        Ok(())
    }

    /// What `position` has earned since its snapshot.
    pub fn earned(&self, position: &Position) -> Result<i128, PoolError> {
        if position.balance == 0 {
            return Ok(0);
        }
        let env = self.env();
        let relative_entry = sub(
            position.entry_sum,
            mul(position.balance, i128::from(self.origin()))?,
        )?;
        let gross = wide::mul(
            &wide::from(env, position.balance),
            &wide::sub(&self.ideal_position, &position.ideal_snapshot)?,
        )?;
        let offset = wide::mul(
            &wide::from(env, relative_entry),
            &wide::sub(&self.reward_rate_accum, &position.rate_snapshot)?,
        )?;
        let net = wide::sub(&gross, &offset)?;
        if net <= wide::zero(env) {
            return Ok(0);
        }
        wide::narrow(&wide::div_floor(&net, &wide::from(env, self.precision)))
    }

    /// Moves what `position` earned into its stash and snapshots it at the
    /// current accumulators. Returns the amount added to the stash.
    pub fn settle(&self, position: &mut Position, now: u64) -> Result<i128, PoolError> {
        let earned = self.earned(position)?;
        position.stash = add(position.stash, earned)?;
        position.ideal_snapshot = self.ideal_position.clone();
        position.rate_snapshot = self.reward_rate_accum.clone();
        position.last_update = now;
        Ok(earned)
    }

    /// Adds `amount` units entered at `now`. The position must be settled.
    pub fn enter(&mut self, position: &mut Position, amount: i128, now: u64) -> Result<(), PoolError> {
        let weighted = mul(amount, i128::from(now))?;
        let total_staked = add(self.total_staked, amount)?;
        let sum_weighted_entry = add(self.sum_weighted_entry, weighted)?;
        let balance = add(position.balance, amount)?;
        let entry_sum = add(position.entry_sum, weighted)?;

        if self.init_time.is_none() {
            self.init_time = Some(now);
        }
        self.total_staked = total_staked;
        self.sum_weighted_entry = sum_weighted_entry;
        position.balance = balance;
        position.entry_sum = entry_sum;
        Ok(())
    }

    /// Removes `amount` units together with the matching slice of the
    /// position's `entry_sum`, so the remaining units keep their weighted
    /// entry time. The position must be settled.
    pub fn exit(&mut self, position: &mut Position, amount: i128) -> Result<(), PoolError> {
        if amount > position.balance {
            return Err(PoolError::InsufficientBalance);
        }
        let slice = if amount == position.balance {
            position.entry_sum
        } else {
            mul(position.entry_sum, amount)? / position.balance
        };

        let total_staked = sub(self.total_staked, amount)?;
        let sum_weighted_entry = sub(self.sum_weighted_entry, slice)?;

        self.total_staked = total_staked;
        self.sum_weighted_entry = sum_weighted_entry;
        position.balance -= amount;
        position.entry_sum -= slice;
        Ok(())
    }

    /// Removes `amount` units without settling. Everything the position
    /// earned and has not yet been paid is dropped.
    pub fn forfeit(&mut self, position: &mut Position, amount: i128, now: u64) -> Result<i128, PoolError> {
        self.exit(position, amount)?;
        let dropped = position.stash;
        position.stash = 0;
        position.ideal_snapshot = self.ideal_position.clone();
        position.rate_snapshot = self.reward_rate_accum.clone();
        position.last_update = now;
        Ok(dropped)
    }
}

// ── Position ─────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub owner: Address,
    pub balance: i128,
    /// Σ units × entry timestamp over the units this position holds.
    pub entry_sum: i128,
    /// Settled, not yet harvested rewards.
    pub stash: i128,
    pub ideal_snapshot: I256,
    pub rate_snapshot: I256,
    pub last_update: u64,
}

impl Position {
    /// An empty position snapshotted at the pool's current accumulators.
    pub fn open(owner: Address, pool: &PoolState, now: u64) -> Self {
        Self {
            owner,
            balance: 0,
            entry_sum: 0,
            stash: 0,
            ideal_snapshot: pool.ideal_position.clone(),
            rate_snapshot: pool.reward_rate_accum.clone(),
            last_update: now,
        }
    }
}

// ── Unit tests ──────────────────────────────────────────────────────────────
