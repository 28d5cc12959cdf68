// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Types and helpers related to the SMC Calling Convention.

use core::fmt::{self, Debug, Display, Formatter};

const FAST_CALL: u32 = 0x8000_0000;
const SMC64: u32 = 0x4000_0000;
const OEN_MASK: u32 = 0x3f00_0000;
const OEN_SHIFT: u8 = 24;

/// The call completed successfully.
pub const SUCCESS: i32 = 0;

/// The function is not recognised or not supported by the implementation.
pub const NOT_SUPPORTED: i32 = -1;

/// The type of an SMCCC call: whether it is a fast call or yielding call, and
/// which calling convention it uses.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SmcccCallType {
    /// An SMC32/HVC32 fast call.
    Fast32,
    /// An SMC64/HVC64 fast call.
    Fast64,
    /// A yielding call.
    Yielding,
}

/// An SMCCC function ID.
#[derive(Copy, Clone, Eq, PartialEq)]
#[repr(transparent)]
pub struct FunctionId(pub u32);

impl FunctionId {
    /// Returns the Owning Entity Number bits of the function ID.
    pub fn oen(self) -> u8 {
        ((self.0 & OEN_MASK) >> OEN_SHIFT) as u8
    }

    /// Returns the lower 16 bits of the function ID.
    pub fn number(self) -> u16 {
        self.0 as u16
    }

    /// Returns what type of call this is.
    pub fn call_type(self) -> SmcccCallType {
        if self.0 & FAST_CALL == 0 {
            SmcccCallType::Yielding
        } else if self.0 & SMC64 == 0 {
            SmcccCallType::Fast32
        } else {
            SmcccCallType::Fast64
        }
    }
}

impl Debug for FunctionId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "FunctionId({:#010x})", self.0)
    }
}

impl Display for FunctionId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:#010x} ({:?}, OEN {})", self.0, self.call_type(), self.oen())
    }
}

/// The register values returned from an SMC call.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct SmcReturn {
    used: usize,
    values: [u64; Self::MAX_VALUES],
}

impl SmcReturn {
    /// The maximum number of values an SMC call here returns.
    pub const MAX_VALUES: usize = 4;

    /// A return holding no values.
    pub const EMPTY: Self = Self {
        used: 0,
        values: [0; Self::MAX_VALUES],
    };

    /// Returns a slice containing the used values.
    pub fn values(&self) -> &[u64] {
        &self.values[0..self.used]
    }

    /// Returns true if no values are used.
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }
}

impl Debug for SmcReturn {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "SmcReturn([")?;
        let values = self.values();
        if let Some(first) = values.first() {
            write!(f, "{first:#x}")?;
            for value in &values[1..] {
                write!(f, ", {value:#x}")?;
            }
        }
        write!(f, "])")?;
        Ok(())
    }
}

impl From<u64> for SmcReturn {
    fn from(value: u64) -> Self {
        Self {
            used: 1,
            values: [value, 0, 0, 0],
        }
    }
}

impl From<i64> for SmcReturn {
    fn from(value: i64) -> Self {
        Self::from(value as u64)
    }
}

impl From<u32> for SmcReturn {
    fn from(value: u32) -> Self {
        Self::from(u64::from(value))
    }
}

impl From<i32> for SmcReturn {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_type_decoding() {
        assert_eq!(FunctionId(0xc500_fff1).call_type(), SmcccCallType::Fast64);
        assert_eq!(FunctionId(0x8400_0001).call_type(), SmcccCallType::Fast32);
        assert_eq!(FunctionId(0x0500_0000).call_type(), SmcccCallType::Yielding);
    }

    #[test]
    fn not_supported_is_minus_one_in_x0() {
        let ret = SmcReturn::from(NOT_SUPPORTED);
        assert_eq!(ret.values(), &[u64::MAX]);
    }
}
