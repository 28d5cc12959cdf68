// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Cache-coherent interconnect snoop and DVM control.
//!
//! Each cluster owns one slave interface on the CCI. Toggling snoops is part
//! of cluster power transitions: snoops come on before the first core of a
//! cluster runs and go off after the last core has committed to power-down.

use crate::layout::CCI_BASE;
use crate::mmio::Mmio;

/// Slave interface index per cluster.
const CLUSTER_IFACE: [u32; 2] = [3, 4];

const IFACE_STRIDE: u32 = 0x1000;
const SNOOP_CTRL_OFFSET: u32 = 0x0;
const STATUS_REG: u32 = CCI_BASE + 0xc;

const SNOOP_EN_BIT: u32 = 1 << 0;
const DVM_EN_BIT: u32 = 1 << 1;
const CHANGE_PENDING_BIT: u32 = 1 << 0;

pub(crate) fn snoop_ctrl_reg(cluster: usize) -> u32 {
    CCI_BASE + (CLUSTER_IFACE[cluster] + 1) * IFACE_STRIDE + SNOOP_CTRL_OFFSET
}

/// Enables snoop and DVM messages for `cluster`'s interface and waits for
/// the change to take effect.
pub fn enable_snoop_dvm<M: Mmio>(bus: &M, cluster: usize) {
    bus.write32(snoop_ctrl_reg(cluster), SNOOP_EN_BIT | DVM_EN_BIT);
    while bus.read32(STATUS_REG) & CHANGE_PENDING_BIT != 0 {
        core::hint::spin_loop();
    }
}

/// Disables snoop and DVM messages for `cluster`'s interface and waits for
/// the change to take effect.
pub fn disable_snoop_dvm<M: Mmio>(bus: &M, cluster: usize) {
    bus.write32(snoop_ctrl_reg(cluster), 0);
    while bus.read32(STATUS_REG) & CHANGE_PENDING_BIT != 0 {
        core::hint::spin_loop();
    }
}

// Test observation point for cluster bring-up.
#[cfg(test)]
pub(crate) const SNOOP_ON: u32 = SNOOP_EN_BIT | DVM_EN_BIT;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmio::fake::FakeMmio;

    #[test]
    fn clusters_use_distinct_interfaces() {
        assert_ne!(snoop_ctrl_reg(0), snoop_ctrl_reg(1));
    }

    #[test]
    fn enable_then_disable_round_trips() {
        let mmio = FakeMmio::new();
        enable_snoop_dvm(&mmio, 1);
        assert_eq!(mmio.read32(snoop_ctrl_reg(1)), SNOOP_ON);
        disable_snoop_dvm(&mmio, 1);
        assert_eq!(mmio.read32(snoop_ctrl_reg(1)), 0);
        assert_eq!(mmio.write_count(snoop_ctrl_reg(1)), 2);
    }
}
