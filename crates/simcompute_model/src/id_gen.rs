//! Identifiers for resource quantities.
//!
//! Every [`ResourceQuantity`](crate::quantity::ResourceQuantity) carries a
//! 64-bit identity that is unrelated to the node's [`NodeId`](simcompute_system::node::NodeId).
//! Generators are injected where quantities are created so tests can use a
//! deterministic sequence.

use core::sync::atomic::{AtomicU64, Ordering};

/// Number of random hex digits in a generated identifier (56 bits).
pub const ID_HEX_DIGITS: usize = 14;

const HEX_ALPHABET: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
];

/// Source of quantity identifiers.
pub trait IdGenerator: Send + Sync + 'static {
    /// Returns the next identifier.
    fn next_id(&self) -> u64;
}

/// Random identifiers built from [`ID_HEX_DIGITS`] hex digits drawn with `nanoid`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NanoIdGenerator;

impl IdGenerator for NanoIdGenerator {
    fn next_id(&self) -> u64 {
        nanoid::nanoid!(ID_HEX_DIGITS, &HEX_ALPHABET)
            .chars()
            .filter_map(|c| c.to_digit(16))
            .fold(0, |id, digit| (id << 4) | u64::from(digit))
    }
}

/// Deterministic identifiers counting up from a starting value.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a generator whose first identifier is `start`.
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// Draws a fresh random identifier.
#[must_use]
pub fn generate_id() -> u64 {
    NanoIdGenerator.next_id()
}
