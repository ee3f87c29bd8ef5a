//! Random stake / withdraw / harvest / time sequences against the pure pool
//! arithmetic, checked against an independent floating-point reference that
//! hands each distribution out as `reward × balance × (now − entry) / W`.
//!
//! Invariants tested:
//! - paid + stashed never exceeds what was distributed, at any step
//! - every position ends within rounding distance of its exact share
//! - a single genesis staker of one unit receives every distribution exactly

use accounting::{PoolState, Position};
use proptest::prelude::*;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, Env};

const PRECISION: i128 = 1_000_000_000_000_000_000_000_000_000_000;
const STAKERS: usize = 4;

#[derive(Clone, Debug)]
enum Op {
    Stake { who: usize, amount: i128 },
    Withdraw { who: usize, percent: i128 },
    Advance { seconds: u64, reward: i128 },
    Harvest { who: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..STAKERS, 1i128..1_000_000_000_000).prop_map(|(who, amount)| Op::Stake { who, amount }),
        (0..STAKERS, 1i128..=100).prop_map(|(who, percent)| Op::Withdraw { who, percent }),
        (1u64..=7 * 86_400, 0i128..1_000_000_000)
            .prop_map(|(seconds, reward)| Op::Advance { seconds, reward }),
        (0..STAKERS).prop_map(|who| Op::Harvest { who }),
    ]
}

struct Sim {
    pool: PoolState,
    positions: Vec<Position>,
    paid: Vec<i128>,
    exact: Vec<f64>,
    now: u64,
    distributed: i128,
}

impl Sim {
    fn new(env: &Env) -> Self {
        let pool = PoolState::new(env, PRECISION, 0);
        let positions = (0..STAKERS)
            .map(|_| Position::open(Address::generate(env), &pool, 0))
            .collect();
        Self {
            pool,
            positions,
            paid: vec![0; STAKERS],
            exact: vec![0.0; STAKERS],
            now: 0,
            distributed: 0,
        }
    }

    fn apply(&mut self, op: &Op) {
        let now = self.now;
        match *op {
            Op::Stake { who, amount } => {
                let position = &mut self.positions[who];
                self.pool.settle(position, now).unwrap();
                self.pool.enter(position, amount, now).unwrap();
            }
            Op::Withdraw { who, percent } => {
                let position = &mut self.positions[who];
                let amount = position.balance * percent / 100;
                if amount == 0 {
                    return;
                }
                self.pool.settle(position, now).unwrap();
                self.pool.exit(position, amount).unwrap();
            }
            Op::Advance { seconds, reward } => {
                self.now += seconds;
                let now = self.now;
                let weight = self.pool.time_weight(now).unwrap();
                if reward > 0 && weight > 0 {
                    for (i, position) in self.positions.iter().enumerate() {
                        let own = position.balance * i128::from(now) - position.entry_sum;
                        self.exact[i] += reward as f64 * own as f64 / weight as f64;
                    }
                    self.pool.distribute(reward, now).unwrap();
                    self.distributed += reward;
                } else {
                    self.pool.distribute(0, now).unwrap();
                }
            }
            Op::Harvest { who } => {
                let position = &mut self.positions[who];
                self.pool.settle(position, now).unwrap();
                self.paid[who] += position.stash;
                position.stash = 0;
            }
        }
    }

    fn claimed(&self) -> i128 {
        self.positions
            .iter()
            .zip(self.paid.iter())
            .map(|(position, paid)| position.stash + paid)
            .sum()
    }
}

proptest! {
    #[test]
    fn prop_conservation_and_exactness(ops in prop::collection::vec(op(), 1..40)) {
        let env = Env::default();
        env.cost_estimate().budget().reset_unlimited();
        let mut sim = Sim::new(&env);

        for op in &ops {
            sim.apply(op);
            prop_assert!(sim.claimed() <= sim.distributed);
        }

        let now = sim.now;
        for position in sim.positions.iter_mut() {
            sim.pool.settle(position, now).unwrap();
        }
        prop_assert!(sim.claimed() <= sim.distributed);

        let tolerance = ops.len() as f64 + 2.0;
        for i in 0..STAKERS {
            let got = (sim.positions[i].stash + sim.paid[i]) as f64;
            let exact = sim.exact[i];
            prop_assert!(got <= exact + 1e-6 * exact.max(1.0), "position {} got {} > exact {}", i, got, exact);
            prop_assert!(got >= exact - tolerance, "position {} got {} << exact {}", i, got, exact);
        }
    }

    #[test]
    fn prop_sole_unit_staker_is_exact(
        windows in prop::collection::vec((1u64..=86_400, 0i128..1_000_000_000), 1..30),
        harvest_every in 1usize..5,
    ) {
        let env = Env::default();
        env.cost_estimate().budget().reset_unlimited();
        let mut pool = PoolState::new(&env, PRECISION, 0);
        let mut alice = Position::open(Address::generate(&env), &pool, 0);
        pool.enter(&mut alice, 1, 0).unwrap();

        let mut now = 0;
        let mut distributed = 0;
        let mut paid = 0;
        for (i, (seconds, reward)) in windows.iter().enumerate() {
            now += seconds;
            pool.distribute(*reward, now).unwrap();
            distributed += reward;
            if i % harvest_every == 0 {
                pool.settle(&mut alice, now).unwrap();
                paid += alice.stash;
                alice.stash = 0;
            }
        }
        pool.settle(&mut alice, now).unwrap();
        prop_assert_eq!(paid + alice.stash, distributed);
    }
}
