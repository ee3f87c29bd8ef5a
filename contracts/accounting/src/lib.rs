//! Time-weighted position accounting shared by the staking pool contracts.
//!
//! A pool keeps two global accumulators and the weighted sum of entry
//! timestamps. From those, and a per-position snapshot, any position's share
//! of the rewards distributed since its last settlement is computed in O(1):
//! each position earns in proportion to `balance × time staked`, without
//! iterating over other positions.
//!
//! - [`pool`]: the pure arithmetic on [`PoolState`] and [`Position`].
//! - [`ledger`]: loads pool state from storage, pulls rewards from the
//!   allocator, and applies stake/withdraw/claim transitions.
//! - [`admin`]: configuration, roles, pause switch and vesting sink shared by
//!   every pool variant.
//! - [`collaborators`]: client interfaces of the allocator, vesting locker
//!   and NFT contracts.

#![no_std]

pub mod admin;
pub mod collaborators;
pub mod events;
pub mod ledger;
pub mod pool;
pub mod storage;
pub mod wide;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use ledger::Ledger;
pub use pool::{PoolState, Position};
pub use storage::PoolConfig;

/// Largest number of positions or units handled by one batch call.
pub const MAX_BATCH: u32 = 20;

/// Upper bound of the per-pool fixed-point factor.
pub const MAX_PRECISION: i128 = 1_000_000_000_000_000_000_000_000_000_000_000_000;

// ── Errors ───────────────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PoolError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    ZeroAmount = 4,
    BadRecipient = 5,
    InsufficientBalance = 6,
    NoReward = 7,
    TooManyPositions = 8,
    PositionNotFound = 9,
    Paused = 10,
    NotPaused = 11,
    NoLocker = 12,
    InvalidPrecision = 13,
    InvalidToken = 14,
    NotTokenOwner = 15,
    DuplicateToken = 16,
    TooManyTokens = 17,
    NoTimeWeight = 18,
    Overflow = 19,
    NotApproved = 20,
}
