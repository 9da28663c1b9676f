//! Fixtures and reference implementations shared by the test suites.

mod brute_force;
pub mod fixtures;

pub use brute_force::BruteForceRules;
