#![no_main]

use arbitrary::Arbitrary;
use emission::{EmissionAllocator, EmissionAllocatorClient};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    vec, Address, Env,
};
use staking::{StakingPool, StakingPoolClient};

const DAY: u64 = 86_400;
const USERS: usize = 4;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { user: u8, amount: u32 },
    Withdraw { user: u8, position: u8, amount: u32 },
    Harvest { user: u8, position: u8 },
    EmergencyExit { user: u8, position: u8 },
    Advance { seconds: u32 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let allocator_id = env.register(EmissionAllocator, ());
    let allocator = EmissionAllocatorClient::new(&env, &allocator_id);
    let reward_token = env
        .register_stellar_asset_contract_v2(allocator_id.clone())
        .address();
    let stake_token = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();
    allocator.initialize(&admin, &reward_token, &1_000_000_000_000, &(200 * DAY));

    let pool_id = env.register(StakingPool, ());
    let pool = StakingPoolClient::new(&env, &pool_id);
    pool.initialize(&admin, &stake_token, &allocator_id, &1_000_000_000_000_000_000_000_000_000_000);
    allocator.reconfigure(&admin, &vec![&env, pool_id.clone()], &vec![&env, 10_000u32]);

    let rewards = TokenClient::new(&env, &reward_token);
    let staked = TokenClient::new(&env, &stake_token);
    let mut users = Vec::new();
    for _ in 0..USERS {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &stake_token).mint(&user, &i128::from(u32::MAX));
        users.push(user);
    }

    let mut now = 0u64;
    for action in actions.into_iter().take(64) {
        match action {
            FuzzAction::Stake { user, amount } => {
                let user = &users[usize::from(user) % USERS];
                let _ = pool.try_stake(user, &i128::from(amount), user);
            }
            FuzzAction::Withdraw { user, position, amount } => {
                let user = &users[usize::from(user) % USERS];
                let id = u64::from(position) % 16 + 1;
                let _ = pool.try_withdraw(user, &id, &i128::from(amount));
            }
            FuzzAction::Harvest { user, position } => {
                let user = &users[usize::from(user) % USERS];
                let id = u64::from(position) % 16 + 1;
                let _ = pool.try_harvest(user, &id);
            }
            FuzzAction::EmergencyExit { user, position } => {
                let user = &users[usize::from(user) % USERS];
                let id = u64::from(position) % 16 + 1;
                let _ = pool.try_emergency_exit(user, &vec![&env, id]);
            }
            FuzzAction::Advance { seconds } => {
                now = now.saturating_add(u64::from(seconds));
                env.ledger().set_timestamp(now);
            }
        }

        // Rewards paid out never exceed what the allocator declared.
        let minted: i128 = users.iter().map(|user| rewards.balance(user)).sum();
        assert!(minted <= allocator.total_emitted());

        // The pool holds exactly the principal it accounts for.
        assert_eq!(staked.balance(&pool_id), pool.get_total_staked());
    }
});
