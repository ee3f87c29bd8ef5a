#![no_std]

pub mod curve;
pub mod events;
mod storage;

use common::access::{self, Role};
use common::Cooldown;
use soroban_sdk::{contract, contractimpl, token, Address, Env, Vec};

pub use storage::{EmissionConfig, RecipientEntry, RecipientInfo};

const DAY: u64 = 86_400;

/// A half-life at or below this value is rejected.
pub const MIN_HALF_LIFE: u64 = 10 * DAY;
/// Minimum spacing between two half-life changes.
pub const HALF_LIFE_COOLDOWN: Cooldown = Cooldown::new(2 * DAY);
/// A single change must lower the half-life by less than this.
pub const MAX_HALF_LIFE_DECREASE: u64 = 30 * DAY;
/// Upper bound on tracked recipients; settlement walks the whole table.
pub const MAX_RECIPIENTS: u32 = 64;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AllocatorError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    LengthMismatch = 5,
    InvalidAllocationSum = 6,
    NoOpAllocation = 7,
    DuplicateRecipient = 8,
    TooManyRecipients = 9,
    InvalidAmount = 10,
    TooSoon = 11,
    TooSteepDecrease = 12,
    HalfLifeTooLow = 13,
    UnchangedHalfLife = 14,
    IndexOutOfBounds = 15,
    NoRecipients = 16,
    Overflow = 17,
}

// ── Contract ─────────────────────────────────────────────────────────────────

/// Splits a decaying reward budget across recipients (usually staking pools)
/// by basis-point allocation, and mints each recipient's declared share on
/// request.
#[contract]
pub struct EmissionAllocator;

#[contractimpl]
impl EmissionAllocator {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the allocator.
    ///
    /// * `reward_token` – SAC address whose admin is this contract.
    /// * `max_budget`   – ceiling a single settlement window approaches.
    /// * `half_life`    – window length at which half the budget is emitted.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        max_budget: i128,
        half_life: u64,
    ) -> Result<(), AllocatorError> {
        if storage::is_initialized(&env) {
            return Err(AllocatorError::AlreadyInitialized);
        }
        if max_budget <= 0 {
            return Err(AllocatorError::InvalidInput);
        }
        if half_life <= MIN_HALF_LIFE {
            return Err(AllocatorError::HalfLifeTooLow);
        }

        storage::set_config(
            &env,
            &EmissionConfig {
                reward_token: reward_token.clone(),
                max_budget,
                half_life,
            },
        );
        storage::mark_initialized(&env);
        access::bootstrap(&env, &admin);

        events::publish_initialized(&env, admin, reward_token, max_budget, half_life);

        Ok(())
    }

    // ── Allocation ──────────────────────────────────────────────────────────

    /// Replace the allocation of each listed recipient.
    ///
    /// Every tracked recipient is settled at its current allocation first, so
    /// what it earned before this call is locked into `undeclared`. After the
    /// update the allocations must sum to either 0 (inactive) or 10 000.
    pub fn reconfigure(
        env: Env,
        caller: Address,
        recipients: Vec<Address>,
        allocations: Vec<u32>,
    ) -> Result<(), AllocatorError> {
        let config = Self::load_config(&env)?;
        caller.require_auth();
        Self::require_role(&env, &caller, Role::Controller)?;

        if recipients.len() != allocations.len() {
            return Err(AllocatorError::LengthMismatch);
        }
        if recipients.is_empty() {
            return Err(AllocatorError::InvalidInput);
        }

        // 1. Validate the whole batch before touching storage.
        let tracked = storage::recipients(&env);
        let mut total = u64::from(storage::total_bps(&env));
        let mut tracked_after = tracked.len();
        for (i, (recipient, bps)) in recipients.iter().zip(allocations.iter()).enumerate() {
            if recipients.first_index_of(&recipient) != Some(i as u32) {
                return Err(AllocatorError::DuplicateRecipient);
            }
            let old = match storage::entry(&env, &recipient) {
                Some(entry) => entry.allocation_bps,
                None => {
                    tracked_after = tracked_after.saturating_add(1);
                    0
                }
            };
            if old == bps {
                return Err(AllocatorError::NoOpAllocation);
            }
            total = total
                .saturating_sub(u64::from(old))
                .saturating_add(u64::from(bps));
        }
        if tracked_after > MAX_RECIPIENTS {
            return Err(AllocatorError::TooManyRecipients);
        }
        let denominator = u64::from(curve::BPS_DENOMINATOR);
        if total != 0 && total != denominator {
            return Err(AllocatorError::InvalidAllocationSum);
        }

        // 2. Settle everyone at the allocation they held until now.
        let now = env.ledger().timestamp();
        let was_active = Self::active(&env);
        Self::settle_all(&env, &tracked, &config, was_active, now)?;

        // 3. Apply the new allocations.
        let mut table = tracked;
        for (recipient, bps) in recipients.iter().zip(allocations.iter()) {
            let mut entry = match storage::entry(&env, &recipient) {
                Some(entry) => entry,
                None => {
                    table.push_back(recipient.clone());
                    RecipientEntry::new(now)
                }
            };
            let old = entry.allocation_bps;
            entry.allocation_bps = bps;
            entry.last_update = now;
            storage::save_entry(&env, &recipient, &entry);
            events::publish_allocation_changed(&env, recipient, old, bps);
        }
        storage::set_recipients(&env, &table);
        storage::set_total_bps(&env, total as u32);

        let is_active = total == denominator;
        if is_active != was_active {
            events::publish_activation(&env, is_active);
        }
        storage::bump_instance(&env);

        Ok(())
    }

    // ── Settlement ──────────────────────────────────────────────────────────

    /// Move everything `recipient` is owed since its last settlement into its
    /// mintable balance and return the amount moved.
    ///
    /// Only `recipient` may declare for itself. An address that was never
    /// allocated anything gets 0.
    pub fn declare(env: Env, recipient: Address) -> Result<i128, AllocatorError> {
        recipient.require_auth();
        let config = Self::load_config(&env)?;
        let mut entry = match storage::entry(&env, &recipient) {
            Some(entry) => entry,
            None => return Ok(0),
        };

        let now = env.ledger().timestamp();
        let amount = Self::accrued(&config, &entry, Self::active(&env), now)?
            .checked_add(entry.undeclared)
            .ok_or(AllocatorError::Overflow)?;

        entry.unminted = entry
            .unminted
            .checked_add(amount)
            .ok_or(AllocatorError::Overflow)?;
        entry.undeclared = 0;
        entry.last_update = now;
        storage::save_entry(&env, &recipient, &entry);

        let total = storage::total_emitted(&env)
            .checked_add(amount)
            .ok_or(AllocatorError::Overflow)?;
        storage::set_total_emitted(&env, total);

        events::publish_declared(&env, recipient, amount, entry.unminted);

        Ok(amount)
    }

    /// Mint `amount` of the recipient's declared balance to `to`.
    ///
    /// Only the recipient itself may mint.
    pub fn mint(
        env: Env,
        recipient: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), AllocatorError> {
        let config = Self::load_config(&env)?;
        recipient.require_auth();

        let mut entry = storage::entry(&env, &recipient).ok_or(AllocatorError::InvalidAmount)?;
        if amount <= 0 || amount > entry.unminted {
            return Err(AllocatorError::InvalidAmount);
        }

        // Effects before the token call.
        entry.unminted -= amount;
        storage::save_entry(&env, &recipient, &entry);

        token::StellarAssetClient::new(&env, &config.reward_token).mint(&to, &amount);

        events::publish_minted(&env, recipient, to, amount);

        Ok(())
    }

    // ── Curve parameters ────────────────────────────────────────────────────

    /// Change the half-life. Every recipient is settled at the old value
    /// first.
    pub fn set_half_life(env: Env, caller: Address, half_life: u64) -> Result<(), AllocatorError> {
        let mut config = Self::load_config(&env)?;
        caller.require_auth();
        Self::require_role(&env, &caller, Role::Controller)?;

        let current = config.half_life;
        if half_life == current {
            return Err(AllocatorError::UnchangedHalfLife);
        }
        if half_life <= MIN_HALF_LIFE {
            return Err(AllocatorError::HalfLifeTooLow);
        }
        let now = env.ledger().timestamp();
        if !HALF_LIFE_COOLDOWN.ready(storage::half_life_changed(&env), now) {
            return Err(AllocatorError::TooSoon);
        }
        if half_life <= current.saturating_sub(MAX_HALF_LIFE_DECREASE) {
            return Err(AllocatorError::TooSteepDecrease);
        }

        let tracked = storage::recipients(&env);
        Self::settle_all(&env, &tracked, &config, Self::active(&env), now)?;

        config.half_life = half_life;
        storage::set_config(&env, &config);
        storage::set_half_life_changed(&env, now);

        events::publish_half_life_changed(&env, current, half_life);

        Ok(())
    }

    // ── Role management ─────────────────────────────────────────────────────

    pub fn grant_role(
        env: Env,
        caller: Address,
        target: Address,
        role: Role,
    ) -> Result<(), AllocatorError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !access::grant(&env, &caller, &target, role) {
            return Err(AllocatorError::Unauthorized);
        }
        Ok(())
    }

    pub fn revoke_role(env: Env, caller: Address, target: Address) -> Result<(), AllocatorError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !access::revoke(&env, &caller, &target) {
            return Err(AllocatorError::Unauthorized);
        }
        Ok(())
    }

    pub fn role_of(env: Env, address: Address) -> Option<Role> {
        access::role_of(&env, &address)
    }

    // ── Views ───────────────────────────────────────────────────────────────

    /// What `declare(recipient)` would return if called now.
    pub fn pending_rewards(env: Env, recipient: Address) -> Result<i128, AllocatorError> {
        let config = Self::load_config(&env)?;
        let entry = match storage::entry(&env, &recipient) {
            Some(entry) => entry,
            None => return Ok(0),
        };
        let now = env.ledger().timestamp();
        Self::accrued(&config, &entry, Self::active(&env), now)?
            .checked_add(entry.undeclared)
            .ok_or(AllocatorError::Overflow)
    }

    pub fn recipient(env: Env, recipient: Address) -> Option<RecipientEntry> {
        storage::entry(&env, &recipient)
    }

    /// Number of tracked recipients, including those at zero allocation.
    pub fn recipients_len(env: Env) -> u32 {
        storage::recipients(&env).len()
    }

    /// Tracked recipients at indices `from..=to`; `to` is clamped to the
    /// last index.
    pub fn recipients(env: Env, from: u32, to: u32) -> Result<Vec<RecipientInfo>, AllocatorError> {
        let table = storage::recipients(&env);
        if table.is_empty() {
            return Err(AllocatorError::NoRecipients);
        }
        if from >= table.len() || from > to {
            return Err(AllocatorError::IndexOutOfBounds);
        }
        let last = to.min(table.len() - 1);

        let mut page = Vec::new(&env);
        for i in from..=last {
            if let Some(recipient) = table.get(i) {
                if let Some(entry) = storage::entry(&env, &recipient) {
                    page.push_back(RecipientInfo { recipient, entry });
                }
            }
        }
        Ok(page)
    }

    pub fn total_emitted(env: Env) -> i128 {
        storage::total_emitted(&env)
    }

    pub fn is_active(env: Env) -> bool {
        Self::active(&env)
    }

    pub fn half_life(env: Env) -> Result<u64, AllocatorError> {
        Ok(Self::load_config(&env)?.half_life)
    }

    pub fn max_budget(env: Env) -> Result<i128, AllocatorError> {
        Ok(Self::load_config(&env)?.max_budget)
    }

    pub fn reward_token(env: Env) -> Result<Address, AllocatorError> {
        Ok(Self::load_config(&env)?.reward_token)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    // ── Internal helpers ────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), AllocatorError> {
        if !storage::is_initialized(env) {
            return Err(AllocatorError::NotInitialized);
        }
        Ok(())
    }

    fn load_config(env: &Env) -> Result<EmissionConfig, AllocatorError> {
        Self::require_initialized(env)?;
        storage::config(env).ok_or(AllocatorError::NotInitialized)
    }

    fn require_role(env: &Env, caller: &Address, min: Role) -> Result<(), AllocatorError> {
        if !access::is_authorized(env, caller, min) {
            return Err(AllocatorError::Unauthorized);
        }
        Ok(())
    }

    fn active(env: &Env) -> bool {
        storage::total_bps(env) == curve::BPS_DENOMINATOR
    }

    /// The recipient's cut of the window `last_update..now`. Nothing accrues
    /// while the allocator is inactive.
    fn accrued(
        config: &EmissionConfig,
        entry: &RecipientEntry,
        active: bool,
        now: u64,
    ) -> Result<i128, AllocatorError> {
        if !active || entry.allocation_bps == 0 {
            return Ok(0);
        }
        curve::accrual(
            now.saturating_sub(entry.last_update),
            config.max_budget,
            config.half_life,
            entry.allocation_bps,
        )
        .ok_or(AllocatorError::Overflow)
    }

    /// Fold each tracked recipient's accrual into `undeclared` and restart its
    /// window at `now`.
    fn settle_all(
        env: &Env,
        tracked: &Vec<Address>,
        config: &EmissionConfig,
        active: bool,
        now: u64,
    ) -> Result<(), AllocatorError> {
        for recipient in tracked.iter() {
            let mut entry = match storage::entry(env, &recipient) {
                Some(entry) => entry,
                None => continue,
            };
            let accrued = Self::accrued(config, &entry, active, now)?;
            entry.undeclared = entry
                .undeclared
                .checked_add(accrued)
                .ok_or(AllocatorError::Overflow)?;
            entry.last_update = now;
            storage::save_entry(env, &recipient, &entry);
        }
        Ok(())
    }
}
