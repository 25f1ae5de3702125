//! Library surface of the `tabsync` binary.
//!
//! Split out so scenarios and seeding are testable without spawning the
//! binary.

pub mod config;
pub mod factory;
pub mod scenario;
pub mod seeds;
