//! Shared building blocks for the reward contracts.
//!
//! - [`access`]: ranked roles and the `is_authorized` predicate that gates
//!   privileged entry points.
//! - [`pause`]: a contract-wide pause switch.
//! - [`cooldown`]: minimum spacing between parameter changes.

#![no_std]

pub mod access;
pub mod cooldown;
pub mod pause;

pub use access::Role;
pub use cooldown::Cooldown;
