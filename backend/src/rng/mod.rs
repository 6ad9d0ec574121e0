//! Deterministic random number generation
//!
//! Uses xorshift64* algorithm for fast, deterministic random number generation.
//! CRITICAL: All randomness in the sampler MUST go through this module, and
//! the generator is always passed explicitly (no global or time-seeded state).

mod xorshift;

pub use xorshift::{derive_seed, RngManager};
