//! Minimum-spacing guard for parameter changes.
//!
//! Unlike a request counter, a cooldown only remembers when the guarded
//! action last happened. `None` means it never happened, so the first change
//! after deployment is always allowed.

/// A fixed spacing, in seconds, between two guarded actions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cooldown {
    pub spacing: u64,
}

impl Cooldown {
    pub const fn new(spacing: u64) -> Self {
        Self { spacing }
    }

    /// Earliest timestamp at which the action may happen again.
    pub fn next_allowed(&self, last: Option<u64>) -> u64 {
        match last {
            Some(at) => at.saturating_add(self.spacing),
            None => 0,
        }
    }

    /// Returns `true` if the action may happen at `now`.
    pub fn ready(&self, last: Option<u64>, now: u64) -> bool {
        now >= self.next_allowed(last)
    }
}
