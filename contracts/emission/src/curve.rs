//! The emission curve.
//!
//! ```text
//! emit(elapsed) = max_budget × elapsed / (half_life + elapsed)
//! ```
//!
//! The curve rises monotonically with `elapsed`, reaches `max_budget / 2`
//! when `elapsed == half_life`, and approaches but never reaches
//! `max_budget`. Every settlement window is evaluated on its own, so the
//! running total depends on how often recipients declare.

/// Basis-point denominator for allocations.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Amount emitted over a single window of `elapsed` seconds, floored.
///
/// Returns `None` if the intermediate product overflows `i128`.
pub fn emit(elapsed: u64, max_budget: i128, half_life: u64) -> Option<i128> {
    let span = i128::from(half_life).checked_add(i128::from(elapsed))?;
    if span == 0 {
        return Some(0);
    }
    max_budget
        .checked_mul(i128::from(elapsed))?
        .checked_div(span)
}

/// `amount × bps / 10_000`, floored.
pub fn share(amount: i128, bps: u32) -> Option<i128> {
    amount
        .checked_mul(i128::from(bps))?
        .checked_div(i128::from(BPS_DENOMINATOR))
}

/// A recipient's cut of one settlement window.
pub fn accrual(elapsed: u64, max_budget: i128, half_life: u64, bps: u32) -> Option<i128> {
    share(emit(elapsed, max_budget, half_life)?, bps)
}
