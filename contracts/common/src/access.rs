use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const ROLE_PREFIX: Symbol = symbol_short!("ROLE");
const OWNER: Symbol = symbol_short!("OWNER");
const MEMBERS: Symbol = symbol_short!("ROLE_LST");

pub const TTL_THRESHOLD: u32 = 518_400;
pub const TTL_EXTEND_TO: u32 = 3_110_400;

// ── Roles ────────────────────────────────────────────────────────────────────

/// Ranked roles for privileged entry points.
///
/// - `Guardian`   – may pause and resume staking.
/// - `Controller` – may change economic parameters (allocations, half-life,
///                  vesting sink) and do anything a guardian can.
/// - `Owner`      – may do everything, including granting and revoking roles.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    Guardian = 1,
    Controller = 2,
    Owner = 3,
}

impl Role {
    pub fn rank(&self) -> u32 {
        *self as u32
    }

    /// Returns true if this role is at least as high as `min`.
    pub fn covers(&self, min: Role) -> bool {
        self.rank() >= min.rank()
    }
}

fn role_key(who: &Address) -> (Symbol, Address) {
    (ROLE_PREFIX, who.clone())
}

// ── Queries ──────────────────────────────────────────────────────────────────

pub fn role_of(env: &Env, who: &Address) -> Option<Role> {
    let key = role_key(who);
    let role: Option<Role> = env.storage().persistent().get(&key);
    if role.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    role
}

/// The predicate every contract consults before a privileged action.
///
/// Callers authenticate `who` with `require_auth()` themselves.
pub fn is_authorized(env: &Env, who: &Address, min: Role) -> bool {
    match role_of(env, who) {
        Some(role) => role.covers(min),
        None => false,
    }
}

pub fn owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&OWNER)
}

pub fn members(env: &Env) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&MEMBERS)
        .unwrap_or(Vec::new(env))
}

// ── Mutations ────────────────────────────────────────────────────────────────

fn assign(env: &Env, who: &Address, role: Role) {
    let key = role_key(who);
    env.storage().persistent().set(&key, &role);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    let mut list = members(env);
    if !list.contains(who) {
        list.push_back(who.clone());
        env.storage().persistent().set(&MEMBERS, &list);
    }
}

/// Records the deploying admin as the first `Owner`. Only called from
/// `initialize`.
pub fn bootstrap(env: &Env, owner: &Address) {
    env.storage().instance().set(&OWNER, owner);
    assign(env, owner, Role::Owner);
}

/// Gives `target` the role `role`. Returns `false` when `caller` is not an
/// `Owner`.
pub fn grant(env: &Env, caller: &Address, target: &Address, role: Role) -> bool {
    if !is_authorized(env, caller, Role::Owner) {
        return false;
    }
    assign(env, target, role);
    true
}

/// Strips every role from `target`. Returns `false` when `caller` is not an
/// `Owner`, or when `target` is the bootstrap owner (the contract would
/// otherwise be left without anyone able to grant roles).
pub fn revoke(env: &Env, caller: &Address, target: &Address) -> bool {
    if !is_authorized(env, caller, Role::Owner) {
        return false;
    }
    if owner(env).as_ref() == Some(target) {
        return false;
    }
    env.storage().persistent().remove(&role_key(target));

    let list = members(env);
    let mut kept = Vec::new(env);
    for member in list.iter() {
        if member != *target {
            kept.push_back(member);
        }
    }
    env.storage().persistent().set(&MEMBERS, &kept);
    true
}
