// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! NoC bus-idle handshake.
//!
//! Before an IP power domain loses power its NoC interface must be idled, and
//! after power-up it must be released, by a request/acknowledge handshake
//! with the PMC. The handshake is the only bounded wait in this crate; on
//! timeout the caller decides whether to continue.

use crate::layout::{PMC_NOC_POWER_IDLE_REG, PMC_NOC_POWER_IDLEACK_REG, PMC_NOC_POWER_IDLEREQ_REG};
use crate::mmio::Mmio;

/// Per-domain idle-request masks, one bit per NoC interface.
pub mod masks {
    /// Vivobus interface.
    pub const VIVOBUS: u32 = 1 << 15;
    /// Image video processor interface.
    pub const IVP: u32 = 1 << 14;
    /// Display subsystem interface.
    pub const DSS: u32 = 1 << 13;
    /// Video encoder interface.
    pub const VENC: u32 = 1 << 11;
    /// Video decoder interface.
    pub const VDEC: u32 = 1 << 10;
    /// Image computing subsystem interface.
    pub const ICS: u32 = 1 << 9;
    /// Image signal processor interface.
    pub const ISP: u32 = 1 << 5;
    /// Video codec subsystem interface.
    pub const VCODEC: u32 = 1 << 4;
}

/// Maximum number of acknowledge polls before giving up.
const TIMEOUT_POLLS: u32 = 100;
/// Spacing between acknowledge polls.
const POLL_INTERVAL_US: u32 = 1;

/// The PMC did not acknowledge an idle-state change in time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IdleTimeout {
    /// The request mask whose acknowledgement timed out.
    pub mask: u32,
}

/// Requests that the NoC interfaces in `mask` enter the idle state.
///
/// The upper half of the request register is the write mask, so the request
/// value is `mask | mask << 16`. Both the acknowledge and the idle status
/// registers must report the bits set before the handshake is complete.
pub fn set_idle<M: Mmio>(bus: &M, mask: u32) -> Result<(), IdleTimeout> {
    bus.write32(PMC_NOC_POWER_IDLEREQ_REG, mask | mask << 16);
    wait(bus, mask, mask)
}

/// Releases the NoC interfaces in `mask` from the idle state.
pub fn clear_idle<M: Mmio>(bus: &M, mask: u32) -> Result<(), IdleTimeout> {
    bus.write32(PMC_NOC_POWER_IDLEREQ_REG, mask << 16);
    wait(bus, mask, 0)
}

fn wait<M: Mmio>(bus: &M, mask: u32, expected: u32) -> Result<(), IdleTimeout> {
    for _ in 0..TIMEOUT_POLLS {
        let ack = bus.read32(PMC_NOC_POWER_IDLEACK_REG);
        let idle = bus.read32(PMC_NOC_POWER_IDLE_REG);
        if ack & mask == expected && idle & mask == expected {
            return Ok(());
        }
        bus.udelay(POLL_INTERVAL_US);
    }
    Err(IdleTimeout { mask })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmio::fake::FakeMmio;

    #[test]
    fn set_idle_writes_mask_in_both_halves() {
        let mmio = FakeMmio::new();
        mmio.set_reg(PMC_NOC_POWER_IDLEACK_REG, masks::DSS);
        mmio.set_reg(PMC_NOC_POWER_IDLE_REG, masks::DSS);
        set_idle(&mmio, masks::DSS).unwrap();
        assert_eq!(
            mmio.writes(),
            vec![(PMC_NOC_POWER_IDLEREQ_REG, masks::DSS | masks::DSS << 16)]
        );
        assert!(mmio.delays().is_empty());
    }

    #[test]
    fn clear_idle_writes_mask_half_only() {
        let mmio = FakeMmio::new();
        clear_idle(&mmio, masks::VDEC).unwrap();
        assert_eq!(mmio.writes(), vec![(PMC_NOC_POWER_IDLEREQ_REG, masks::VDEC << 16)]);
    }

    #[test]
    fn set_idle_times_out_after_bounded_polls() {
        let mmio = FakeMmio::new();
        let result = set_idle(&mmio, masks::ISP);
        assert_eq!(result, Err(IdleTimeout { mask: masks::ISP }));
        assert_eq!(mmio.delays().len(), 100);
        assert!(mmio.delays().iter().all(|&d| d == 1));
    }

    #[test]
    fn set_idle_ignores_unrelated_bits() {
        let mmio = FakeMmio::new();
        mmio.set_reg(PMC_NOC_POWER_IDLEACK_REG, masks::VENC | masks::IVP);
        mmio.set_reg(PMC_NOC_POWER_IDLE_REG, masks::VENC | masks::VCODEC);
        set_idle(&mmio, masks::VENC).unwrap();
    }
}
