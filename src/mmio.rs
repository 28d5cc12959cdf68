// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Register bus abstraction.
//!
//! Every hardware access in this crate goes through the [`Mmio`] trait, so
//! the controllers can be driven against [`fake::FakeMmio`] in unit tests
//! and against [`DeviceMmio`] in the firmware image.

use crate::aarch64;

/// A 32-bit register bus with a microsecond delay primitive.
pub trait Mmio {
    /// Reads the 32-bit register at `reg`.
    fn read32(&self, reg: u32) -> u32;

    /// Writes `value` to the 32-bit register at `reg`.
    fn write32(&self, reg: u32, value: u32);

    /// Waits for at least `micros` microseconds.
    fn udelay(&self, micros: u32);
}

/// The real register bus: volatile accesses to physical device memory.
#[derive(Clone, Copy)]
pub struct DeviceMmio {
    _private: (),
}

impl DeviceMmio {
    /// Creates the device bus.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that the register blocks named in
    /// [`crate::layout`] are identity-mapped as device memory for the
    /// lifetime of the returned value, and that nothing else in the image
    /// drives the same registers.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Mmio for DeviceMmio {
    fn read32(&self, reg: u32) -> u32 {
        // SAFETY: The constructor contract guarantees `reg` is a mapped
        // device register, and u32 reads of device memory are always valid.
        unsafe { (reg as usize as *const u32).read_volatile() }
    }

    fn write32(&self, reg: u32, value: u32) {
        // SAFETY: The constructor contract guarantees `reg` is a mapped
        // device register owned by this crate.
        unsafe { (reg as usize as *mut u32).write_volatile(value) }
    }

    fn udelay(&self, micros: u32) {
        aarch64::udelay(micros);
    }
}

impl Mmio for &DeviceMmio {
    fn read32(&self, reg: u32) -> u32 {
        (**self).read32(reg)
    }

    fn write32(&self, reg: u32, value: u32) {
        (**self).write32(reg, value)
    }

    fn udelay(&self, micros: u32) {
        (**self).udelay(micros)
    }
}
