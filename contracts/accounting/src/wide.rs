//! Checked arithmetic on the host's 256-bit integers.
//!
//! The host traps on 256-bit overflow. These helpers check the bounds first
//! so an overflowing accumulator surfaces as [`PoolError::Overflow`] instead.
//! Every value they produce stays within `[-MAX, MAX]`, which keeps negation
//! total.

use soroban_sdk::{Env, I256};

use crate::PoolError;

pub fn from(env: &Env, value: i128) -> I256 {
    I256::from_i128(env, value)
}

pub fn zero(env: &Env) -> I256 {
    I256::from_i32(env, 0)
}

fn max(env: &Env) -> I256 {
    I256::from_parts(env, i64::MAX, u64::MAX, u64::MAX, u64::MAX)
}

fn abs(a: &I256) -> I256 {
    let zero = zero(a.env());
    if *a < zero {
        zero.sub(a)
    } else {
        a.clone()
    }
}

pub fn add(a: &I256, b: &I256) -> Result<I256, PoolError> {
    let env = a.env();
    let max = max(env);
    let zero = zero(env);
    let fits = if *b > zero {
        *a <= max.sub(b)
    } else {
        *a >= zero.sub(&max).sub(b)
    };
    if !fits {
        return Err(PoolError::Overflow);
    }
    Ok(a.add(b))
}

pub fn sub(a: &I256, b: &I256) -> Result<I256, PoolError> {
    add(a, &zero(b.env()).sub(b))
}

pub fn mul(a: &I256, b: &I256) -> Result<I256, PoolError> {
    let env = a.env();
    let zero = zero(env);
    if *a == zero || *b == zero {
        return Ok(zero);
    }
    if abs(a) > max(env).div(&abs(b)) {
        return Err(PoolError::Overflow);
    }
    Ok(a.mul(b))
}

/// Floor division of a non-negative numerator by a positive divisor.
pub fn div_floor(a: &I256, b: &I256) -> I256 {
    a.div(b)
}

/// Ceiling division of a non-negative numerator by a positive divisor.
pub fn div_ceil(a: &I256, b: &I256) -> I256 {
    let env = a.env();
    let quotient = a.div(b);
    if a.rem_euclid(b) == zero(env) {
        quotient
    } else {
        quotient.add(&I256::from_i32(env, 1))
    }
}

pub fn narrow(a: &I256) -> Result<i128, PoolError> {
    a.to_i128().ok_or(PoolError::Overflow)
}
