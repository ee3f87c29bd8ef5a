//! Allocation invariants against a deployed allocator:
//! - a reallocation never changes what a recipient accrued before it
//! - declared amounts always sum to `total_emitted`

use emission::{curve, EmissionAllocator, EmissionAllocatorClient};
use proptest::prelude::*;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::{vec, Address, Env};

const DAY: u64 = 86_400;
const BUDGET: i128 = 10_000_000_000;
const HALF_LIFE: u64 = 200 * DAY;

fn setup() -> (Env, EmissionAllocatorClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(EmissionAllocator, ());
    let client = EmissionAllocatorClient::new(&env, &contract_id);
    let reward_token = env
        .register_stellar_asset_contract_v2(contract_id.clone())
        .address();

    let admin = Address::generate(&env);
    client.initialize(&admin, &reward_token, &BUDGET, &HALF_LIFE);
    (env, client, admin)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_reallocation_preserves_prior_accrual(
        split in 1u32..10_000,
        resplit in 1u32..10_000,
        first_window in 1u64..=30 * DAY,
        second_window in 1u64..=30 * DAY,
    ) {
        prop_assume!(split != resplit);
        let (env, client, admin) = setup();
        let a = Address::generate(&env);
        let b = Address::generate(&env);

        client.reconfigure(
            &admin,
            &vec![&env, a.clone(), b.clone()],
            &vec![&env, split, 10_000 - split],
        );

        env.ledger().set_timestamp(first_window);
        let owed_a = client.pending_rewards(&a);
        let owed_b = client.pending_rewards(&b);

        client.reconfigure(
            &admin,
            &vec![&env, a.clone(), b.clone()],
            &vec![&env, resplit, 10_000 - resplit],
        );
        prop_assert_eq!(client.recipient(&a).unwrap().undeclared, owed_a);
        prop_assert_eq!(client.recipient(&b).unwrap().undeclared, owed_b);

        env.ledger().set_timestamp(first_window + second_window);
        let window = curve::emit(second_window, BUDGET, HALF_LIFE).unwrap();
        let declared_a = client.declare(&a);
        let declared_b = client.declare(&b);
        prop_assert_eq!(declared_a, owed_a + curve::share(window, resplit).unwrap());
        prop_assert_eq!(declared_b, owed_b + curve::share(window, 10_000 - resplit).unwrap());
        prop_assert_eq!(client.total_emitted(), declared_a + declared_b);
        prop_assert!(declared_a + declared_b <= curve::emit(first_window, BUDGET, HALF_LIFE).unwrap() + window);
    }
}
