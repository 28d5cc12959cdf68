// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! AArch64 barrier and low-power instruction wrappers.
//!
//! On other architectures (i.e. when unit testing on the host) these are
//! no-ops, so code using them can run unchanged under `cargo test`.

#[cfg(target_arch = "aarch64")]
use core::arch::asm;

/// Data synchronization barrier, full system.
#[inline]
pub fn dsb_sy() {
    #[cfg(target_arch = "aarch64")]
    // SAFETY: A barrier has no side effects other than ordering.
    unsafe {
        asm!("dsb sy", options(nomem, nostack));
    }
}

/// Instruction synchronization barrier.
#[inline]
pub fn isb() {
    #[cfg(target_arch = "aarch64")]
    // SAFETY: A barrier has no side effects other than ordering.
    unsafe {
        asm!("isb", options(nomem, nostack));
    }
}

/// Clears the local monitor's exclusive access state.
#[inline]
pub fn clr_ex() {
    #[cfg(target_arch = "aarch64")]
    // SAFETY: Clearing the exclusive monitor cannot violate memory safety.
    unsafe {
        asm!("clrex", options(nomem, nostack));
    }
}

/// Waits for an interrupt or wake event.
#[inline]
pub fn wfi() {
    #[cfg(target_arch = "aarch64")]
    // SAFETY: WFI suspends execution until a wake event; no memory is touched.
    unsafe {
        asm!("wfi", options(nomem, nostack));
    }
}

/// Busy-waits for at least `micros` microseconds using the generic timer.
pub fn udelay(micros: u32) {
    #[cfg(target_arch = "aarch64")]
    {
        let frequency: u64;
        let start: u64;
        // SAFETY: CNTFRQ_EL0 and CNTPCT_EL0 are read-only counter registers.
        unsafe {
            asm!("mrs {}, cntfrq_el0", out(reg) frequency, options(nomem, nostack));
            asm!("isb", "mrs {}, cntpct_el0", out(reg) start, options(nomem, nostack));
        }
        let ticks = frequency * u64::from(micros) / 1_000_000;
        loop {
            let now: u64;
            // SAFETY: CNTPCT_EL0 is a read-only counter register.
            unsafe {
                asm!("isb", "mrs {}, cntpct_el0", out(reg) now, options(nomem, nostack));
            }
            if now.wrapping_sub(start) >= ticks {
                break;
            }
            core::hint::spin_loop();
        }
    }
    #[cfg(not(target_arch = "aarch64"))]
    let _ = micros;
}
