//! Stand-in collaborator contracts for tests.

use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Symbol};

const OWNER: Symbol = symbol_short!("OWNER");
const BALANCE: Symbol = symbol_short!("BAL");
const APPROVAL: Symbol = symbol_short!("APPROVAL");
const LOCKED: Symbol = symbol_short!("LOCKED");

/// Minimal NFT ledger: mint, operator approvals and `transfer_from`.
#[contract]
pub struct MockNft;

#[contractimpl]
impl MockNft {
    pub fn mint(env: Env, to: Address, token_id: u64) {
        let key = (OWNER, token_id);
        if env.storage().persistent().has(&key) {
            panic!("token already minted");
        }
        env.storage().persistent().set(&key, &to);
        Self::shift_balance(&env, &to, 1);
    }

    pub fn owner_of(env: Env, token_id: u64) -> Address {
        match env.storage().persistent().get(&(OWNER, token_id)) {
            Some(owner) => owner,
            None => panic!("unknown token"),
        }
    }

    pub fn balance_of(env: Env, owner: Address) -> u32 {
        env.storage()
            .persistent()
            .get(&(BALANCE, owner))
            .unwrap_or(0)
    }

    pub fn set_approval_for_all(env: Env, owner: Address, operator: Address, approved: bool) {
        owner.require_auth();
        env.storage()
            .persistent()
            .set(&(APPROVAL, owner, operator), &approved);
    }

    pub fn is_approved_for_all(env: Env, owner: Address, operator: Address) -> bool {
        env.storage()
            .persistent()
            .get(&(APPROVAL, owner, operator))
            .unwrap_or(false)
    }

    pub fn transfer_from(env: Env, spender: Address, from: Address, to: Address, token_id: u64) {
        spender.require_auth();
        if Self::owner_of(env.clone(), token_id) != from {
            panic!("not the owner");
        }
        if spender != from && !Self::is_approved_for_all(env.clone(), from.clone(), spender) {
            panic!("not approved");
        }
        env.storage().persistent().set(&(OWNER, token_id), &to);
        Self::shift_balance(&env, &from, -1);
        Self::shift_balance(&env, &to, 1);
    }

    fn shift_balance(env: &Env, owner: &Address, delta: i64) {
        let key = (BALANCE, owner.clone());
        let current: u32 = env.storage().persistent().get(&key).unwrap_or(0);
        let next = (i64::from(current) + delta) as u32;
        env.storage().persistent().set(&key, &next);
    }
}

/// Vesting sink that only records how much each beneficiary was credited.
#[contract]
pub struct MockLocker;

#[contractimpl]
impl MockLocker {
    pub fn deposit(env: Env, depositor: Address, beneficiary: Address, amount: i128) {
        depositor.require_auth();
        let key = (LOCKED, beneficiary);
        let current: i128 = env.storage().persistent().get(&key).unwrap_or(0);
        env.storage().persistent().set(&key, &(current + amount));
    }

    pub fn locked(env: Env, beneficiary: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&(LOCKED, beneficiary))
            .unwrap_or(0)
    }
}
