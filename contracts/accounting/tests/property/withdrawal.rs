//! Proportional withdrawal invariants:
//! - the remaining units keep their weighted entry time (up to one unit of
//!   rounding, always towards a later entry)
//! - pool totals move by exactly what the position loses

use accounting::{PoolState, Position};
use proptest::prelude::*;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, Env};

proptest! {
    #[test]
    fn prop_partial_withdraw_keeps_entry_time(
        entries in prop::collection::vec((1i128..1_000_000, 0u64..10_000_000), 1..8),
        percent in 1i128..100,
    ) {
        let env = Env::default();
        let mut pool = PoolState::new(&env, 1_000_000_000_000_000_000_000_000_000_000, 0);
        let mut position = Position::open(Address::generate(&env), &pool, 0);

        let mut sorted = entries.clone();
        sorted.sort_by_key(|(_, at)| *at);
        for (amount, at) in &sorted {
            pool.enter(&mut position, *amount, *at).unwrap();
        }

        let balance = position.balance;
        let entry_sum = position.entry_sum;
        let amount = (balance * percent / 100).max(1);
        prop_assume!(amount < balance);

        pool.exit(&mut position, amount).unwrap();
        let remaining = balance - amount;
        prop_assert_eq!(position.balance, remaining);

        // entry_sum / balance is unchanged up to rounding:
        // E × (b − a) ≤ rest × b < E × (b − a) + b
        let lhs = position.entry_sum * balance;
        prop_assert!(lhs >= entry_sum * remaining);
        prop_assert!(lhs < entry_sum * remaining + balance);

        prop_assert_eq!(pool.total_staked, position.balance);
        prop_assert_eq!(pool.sum_weighted_entry, position.entry_sum);
    }
}
