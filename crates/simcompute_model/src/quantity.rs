//! Resource quantities: a CPU amount, a memory amount and an identity.
//!
//! A [`ResourceQuantity`] is a value type. Reserving draws a requested amount
//! down from an available one, releasing adds it back. Both return a new
//! quantity that keeps the identity of the left operand.
//!
//! ```
//! use simcompute_model::quantity::ResourceQuantity;
//!
//! let available = ResourceQuantity::with_uuid(500, 300, 7);
//! let left = available.reserve(&ResourceQuantity::new(200, 100)).unwrap();
//! assert_eq!((left.cpu(), left.mem(), left.uuid()), (300, 200, 7));
//!
//! let back = left.release(&ResourceQuantity::new(200, 100)).unwrap();
//! assert_eq!((back.cpu(), back.mem()), (500, 300));
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuantityError;
use crate::id_gen::{IdGenerator, generate_id};
use crate::limits::QuantityLimits;

/// A bundle of CPU and memory with a 64-bit identity.
///
/// Equality compares all three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceQuantity {
    cpu: u64,
    mem: u64,
    uuid: u64,
}

impl ResourceQuantity {
    /// Creates a quantity with a freshly generated identity.
    #[must_use]
    pub fn new(cpu: u64, mem: u64) -> Self {
        Self::with_uuid(cpu, mem, generate_id())
    }

    /// Creates a quantity whose identity is drawn from `ids`.
    #[must_use]
    pub fn with_generator(cpu: u64, mem: u64, ids: &dyn IdGenerator) -> Self {
        Self::with_uuid(cpu, mem, ids.next_id())
    }

    /// Creates a quantity with an explicit identity.
    #[must_use]
    pub const fn with_uuid(cpu: u64, mem: u64, uuid: u64) -> Self {
        Self { cpu, mem, uuid }
    }

    /// Creates a quantity holding the maxima of `limits`.
    #[must_use]
    pub fn full(limits: &QuantityLimits, ids: &dyn IdGenerator) -> Self {
        Self::with_generator(limits.max_cpu, limits.max_mem, ids)
    }

    /// CPU amount.
    #[must_use]
    pub const fn cpu(&self) -> u64 {
        self.cpu
    }

    /// Memory amount.
    #[must_use]
    pub const fn mem(&self) -> u64 {
        self.mem
    }

    /// Identity.
    #[must_use]
    pub const fn uuid(&self) -> u64 {
        self.uuid
    }

    /// Draws `requested` down from this quantity.
    ///
    /// The result keeps this quantity's identity.
    ///
    /// # Errors
    ///
    /// [`QuantityError::InsufficientResources`] if either dimension of
    /// `requested` exceeds what this quantity holds.
    pub fn reserve(&self, requested: &ResourceQuantity) -> Result<Self, QuantityError> {
        match (
            self.cpu.checked_sub(requested.cpu),
            self.mem.checked_sub(requested.mem),
        ) {
            (Some(cpu), Some(mem)) => Ok(Self::with_uuid(cpu, mem, self.uuid)),
            _ => Err(QuantityError::InsufficientResources {
                available_cpu: self.cpu,
                available_mem: self.mem,
                requested_cpu: requested.cpu,
                requested_mem: requested.mem,
            }),
        }
    }

    /// Adds `released` back to this quantity, checked against the
    /// process-wide [`QuantityLimits`].
    ///
    /// # Errors
    ///
    /// [`QuantityError::OverCapacity`] if the sum exceeds a maximum.
    pub fn release(&self, released: &ResourceQuantity) -> Result<Self, QuantityError> {
        self.release_within(released, &QuantityLimits::global())
    }

    /// Adds `released` back to this quantity, checked against `limits`.
    ///
    /// The sum is validated, not the operands.
    ///
    /// # Errors
    ///
    /// [`QuantityError::OverCapacity`] if the sum exceeds a maximum or
    /// overflows.
    pub fn release_within(
        &self,
        released: &ResourceQuantity,
        limits: &QuantityLimits,
    ) -> Result<Self, QuantityError> {
        let cpu = self.cpu.checked_add(released.cpu);
        let mem = self.mem.checked_add(released.mem);
        match (cpu, mem) {
            (Some(cpu), Some(mem)) if limits.admits(cpu, mem) => {
                Ok(Self::with_uuid(cpu, mem, self.uuid))
            }
            _ => Err(QuantityError::OverCapacity {
                cpu: cpu.unwrap_or(u64::MAX),
                mem: mem.unwrap_or(u64::MAX),
                max_cpu: limits.max_cpu,
                max_mem: limits.max_mem,
            }),
        }
    }

    /// Returns `true` if both dimensions are within the process-wide limits.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_within(&QuantityLimits::global())
    }

    /// Returns `true` if both dimensions are within `limits`.
    #[must_use]
    pub const fn is_valid_within(&self, limits: &QuantityLimits) -> bool {
        limits.admits(self.cpu, self.mem)
    }
}

impl Default for ResourceQuantity {
    /// The process-wide maxima with a fresh identity.
    fn default() -> Self {
        let limits = QuantityLimits::global();
        Self::new(limits.max_cpu, limits.max_mem)
    }
}

impl fmt::Display for ResourceQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.cpu, self.mem, self.uuid)
    }
}

impl FromStr for ResourceQuantity {
    type Err = QuantityError;

    /// Parses `cpu:mem` (fresh identity) or `cpu:mem:uuid`.
    ///
    /// Every field is plain decimal digits: no sign, no whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || QuantityError::MalformedText(s.to_owned());
        let fields = s
            .split(':')
            .map(|field| {
                if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                field.parse::<u64>().ok()
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(malformed)?;

        match fields.as_slice() {
            &[cpu, mem] => Ok(Self::new(cpu, mem)),
            &[cpu, mem, uuid] => Ok(Self::with_uuid(cpu, mem, uuid)),
            _ => Err(malformed()),
        }
    }
}
