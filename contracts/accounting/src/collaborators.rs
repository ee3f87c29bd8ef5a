//! Interfaces of the contracts a pool calls out to.

use soroban_sdk::{contractclient, Address, Env};

/// The emission allocator, seen from one of its recipients.
#[contractclient(name = "AllocatorClient")]
pub trait RewardAllocator {
    /// Moves the caller's newly owed reward into its mintable balance and
    /// returns the amount moved.
    fn declare(env: Env, recipient: Address) -> i128;

    /// What `declare` would return now.
    fn pending_rewards(env: Env, recipient: Address) -> i128;

    fn mint(env: Env, recipient: Address, to: Address, amount: i128);
}

/// A vesting sink that takes custody of minted rewards for a beneficiary.
#[contractclient(name = "LockerClient")]
pub trait VestingLocker {
    fn deposit(env: Env, depositor: Address, beneficiary: Address, amount: i128);
}

/// A non-fungible token ledger with operator approvals.
#[contractclient(name = "NftClient")]
pub trait NonFungibleToken {
    fn owner_of(env: Env, token_id: u64) -> Address;

    fn is_approved_for_all(env: Env, owner: Address, operator: Address) -> bool;

    /// Moves `token_id` from `from` to `to`. `spender` must be `from` or an
    /// approved operator of `from`.
    fn transfer_from(env: Env, spender: Address, from: Address, to: Address, token_id: u64);
}
