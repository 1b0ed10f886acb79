//! Identifiers and the modular arithmetic of the ring.
#![warn(missing_docs)]
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::consts::MAX_RING_BITS;
use crate::error::Error;
use crate::error::Result;

/// A position on the ring. Node ids and keys share the same space.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Identifier(u64);

impl Identifier {
    /// Wrap a raw value. The value is not checked against any ring, see [Ring::id].
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw value.
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Identifier> for u64 {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Identifier {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

/// The circular identifier space `[0, 2^bits)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ring {
    bits: u8,
}

impl Ring {
    /// Create a ring of `2^bits` identifiers, `bits` must be in `1..=63`.
    pub fn new(bits: u8) -> Result<Self> {
        if bits == 0 || bits > MAX_RING_BITS {
            return Err(Error::InvalidRingBits(bits));
        }
        Ok(Self { bits })
    }

    /// Bit width, which is also the length of every finger table.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Number of identifiers on the ring.
    pub fn size(&self) -> u64 {
        1u64 << self.bits
    }

    /// Check that `value` is a valid position and wrap it.
    pub fn id(&self, value: u64) -> Result<Identifier> {
        if value >= self.size() {
            return Err(Error::IdentifierOutOfRange(value, self.size()));
        }
        Ok(Identifier(value))
    }

    /// Whether `id` lies inside the ring.
    pub fn contains(&self, id: Identifier) -> bool {
        id.0 < self.size()
    }

    /// `(id + delta) mod 2^bits`
    pub fn add(&self, id: Identifier, delta: u64) -> Identifier {
        let size = self.size();
        // Both operands are below 2^63, the sum never overflows.
        Identifier((id.0 % size + delta % size) % size)
    }

    /// `(id - delta) mod 2^bits`
    pub fn sub(&self, id: Identifier, delta: u64) -> Identifier {
        let size = self.size();
        Identifier((id.0 % size + size - delta % size) % size)
    }

    /// Clockwise distance walking from `from` to `to`.
    pub fn distance(&self, from: Identifier, to: Identifier) -> u64 {
        self.sub(to, from.0).0
    }

    /// Start of the `i`th finger of `id`: `(id + 2^i) mod 2^bits`, for `i < bits`.
    pub fn finger_start(&self, id: Identifier, i: usize) -> Identifier {
        self.add(id, self.power(i))
    }

    /// `2^i mod 2^bits`
    pub fn power(&self, i: usize) -> u64 {
        1u64.checked_shl(i as u32).unwrap_or(0) % self.size()
    }

    /// Whether `x` lies on the clockwise arc from `left` to `right`.
    ///
    /// When `left == right` the arc covers the whole ring: every `x` other than
    /// the shared point is inside, and the shared point is inside iff either bound is inclusive.
    pub fn between(
        &self,
        x: Identifier,
        left: Identifier,
        right: Identifier,
        incl_left: bool,
        incl_right: bool,
    ) -> bool {
        if left == right {
            return x != left || incl_left || incl_right;
        }
        let dx = self.distance(left, x);
        let dr = self.distance(left, right);
        if dx == 0 {
            incl_left
        } else if dx == dr {
            incl_right
        } else {
            dx < dr
        }
    }
}
