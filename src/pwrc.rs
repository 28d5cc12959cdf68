// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! CPU and cluster power-domain controller.
//!
//! Tracks, per cluster, which cores are marked idle (committed to a suspend
//! entry) and which are marked booted, behind a per-cluster spinlock. The
//! flags decide cluster teardown: a core counts as down when its idle flag
//! is set or its boot flag is clear, and the last running core of a cluster
//! is the one allowed to tear the cluster down.
//!
//! The controller also owns the per-cluster PDC (the wake controller that
//! finishes power removal once the core has executed WFI) and the warm-boot
//! entry point mailboxes.

use crate::aarch64::{dsb_sy, wfi};
use crate::layout::{
    CLUSTER_COUNT, CLUSTER_RAIL_BIT, CORES_PER_CLUSTER, DMAC_AXI_CONF_DEFAULT, DMAC_AXI_CONF_REG,
    DMAC_SEC_CTRL_DEFAULT, DMAC_SEC_CTRL_REG, PDC_CTRL_DISABLE, PDC_CTRL_ENABLE,
    PDC_REQ_CLUSTER_IDLE, PDC_REQ_SYSTEM_SLEEP, cluster_crg, core_mailbox, pdc_regs,
};
use crate::mmio::Mmio;
use bitflags::bitflags;
use log::debug;
use spin::mutex::{SpinMutex, SpinMutexGuard};

bitflags! {
    /// One bit per core of a cluster.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    struct CoreMask: u8 {
        /// Core 0.
        const CORE0 = 1 << 0;
        /// Core 1.
        const CORE1 = 1 << 1;
        /// Core 2.
        const CORE2 = 1 << 2;
        /// Core 3.
        const CORE3 = 1 << 3;
    }
}

fn core_bit(core: usize) -> CoreMask {
    debug_assert!(core < CORES_PER_CLUSTER);
    CoreMask::from_bits_truncate(1 << core)
}

struct ClusterFlags {
    idle: CoreMask,
    boot: CoreMask,
}

impl ClusterFlags {
    const EMPTY: Self = Self {
        idle: CoreMask::empty(),
        boot: CoreMask::empty(),
    };

    fn core_is_down(&self, core: usize) -> bool {
        let bit = core_bit(core);
        self.idle.contains(bit) || !self.boot.contains(bit)
    }
}

/// Holds one cluster's flag word locked; flag mutation and the teardown
/// decision go through this guard so they form one critical section.
pub struct ClusterGuard<'a> {
    flags: SpinMutexGuard<'a, ClusterFlags>,
}

impl ClusterGuard<'_> {
    /// Marks the core as committed to an idle/suspend entry.
    pub fn set_idle_flag(&mut self, core: usize) {
        self.flags.idle.insert(core_bit(core));
    }

    /// Clears the core's idle mark on the resume path.
    pub fn clear_idle_flag(&mut self, core: usize) {
        self.flags.idle.remove(core_bit(core));
    }

    /// Marks the core as booted (running or about to run).
    pub fn set_boot_flag(&mut self, core: usize) {
        self.flags.boot.insert(core_bit(core));
    }

    /// Clears the core's boot mark when it is switched off.
    pub fn clear_boot_flag(&mut self, core: usize) {
        self.flags.boot.remove(core_bit(core));
    }

    /// Returns whether every core of the cluster except `core` is down.
    ///
    /// This is the sole gate for cluster teardown.
    pub fn all_other_cores_down(&self, core: usize) -> bool {
        (0..CORES_PER_CLUSTER)
            .filter(|&other| other != core)
            .all(|other| self.flags.core_is_down(other))
    }
}

/// The CPU/cluster power controller.
pub struct PowerController<M: Mmio> {
    bus: M,
    clusters: [SpinMutex<ClusterFlags>; CLUSTER_COUNT],
}

impl<M: Mmio> PowerController<M> {
    /// Creates a controller with no core marked booted or idle.
    pub const fn new(bus: M) -> Self {
        Self {
            bus,
            clusters: [
                SpinMutex::new(ClusterFlags::EMPTY),
                SpinMutex::new(ClusterFlags::EMPTY),
            ],
        }
    }

    /// Locks `cluster`'s flags for a critical section.
    pub fn lock(&self, cluster: usize) -> ClusterGuard<'_> {
        ClusterGuard {
            flags: self.clusters[cluster].lock(),
        }
    }

    /// Records that a core is running without a power transition, for the
    /// cores already up when the firmware initializes.
    pub fn mark_core_booted(&self, cluster: usize, core: usize) {
        self.lock(cluster).set_boot_flag(core);
    }

    /// Reads whether the cluster rail is currently powered.
    pub fn cluster_is_powered_on(&self, cluster: usize) -> bool {
        let crg = cluster_crg(cluster);
        self.bus.read32(crg.stat) & CLUSTER_RAIL_BIT != 0
    }

    /// Programs the warm-boot entry point mailbox for a core.
    pub fn set_entrypoint(&self, cluster: usize, core: usize, entrypoint: u64) {
        let (low, high) = core_mailbox(cluster, core);
        self.bus.write32(low, entrypoint as u32);
        self.bus.write32(high, (entrypoint >> 32) as u32);
    }

    /// Switches one core's power on: rail, settle, isolation off, reset
    /// release.
    pub fn powerup_core(&self, cluster: usize, core: usize) {
        let crg = cluster_crg(cluster);
        let bit = u32::from(core_bit(core).bits());
        self.bus.write32(crg.pwren, bit);
        self.bus.udelay(100);
        self.bus.write32(crg.isodis, bit);
        self.bus.write32(crg.rstdis, bit);
    }

    /// Switches one core's power off: reset, isolation, rail.
    pub fn powerdn_core(&self, cluster: usize, core: usize) {
        let crg = cluster_crg(cluster);
        let bit = u32::from(core_bit(core).bits());
        self.bus.write32(crg.rsten, bit);
        self.bus.write32(crg.isoen, bit);
        self.bus.write32(crg.pwrdis, bit);
    }

    /// Powers the cluster rail, then the named core.
    pub fn powerup_cluster(&self, cluster: usize, core: usize) {
        debug!("powering up cluster {cluster}");
        let crg = cluster_crg(cluster);
        self.bus.write32(crg.pwren, CLUSTER_RAIL_BIT);
        self.bus.udelay(100);
        self.bus.write32(crg.isodis, CLUSTER_RAIL_BIT);
        self.bus.write32(crg.rstdis, CLUSTER_RAIL_BIT);
        self.powerup_core(cluster, core);
    }

    /// Removes power from the cluster rail.
    pub fn powerdn_cluster(&self, cluster: usize) {
        debug!("powering down cluster {cluster}");
        let crg = cluster_crg(cluster);
        self.bus.write32(crg.rsten, CLUSTER_RAIL_BIT);
        self.bus.write32(crg.isoen, CLUSTER_RAIL_BIT);
        self.bus.write32(crg.pwrdis, CLUSTER_RAIL_BIT);
    }

    /// Arms the cluster's wake controller.
    pub fn enable_pdc(&self, cluster: usize) {
        self.bus.write32(pdc_regs(cluster).ctrl, PDC_CTRL_ENABLE);
    }

    /// Disarms the cluster's wake controller.
    pub fn disable_pdc(&self, cluster: usize) {
        self.bus.write32(pdc_regs(cluster).ctrl, PDC_CTRL_DISABLE);
    }

    /// Masks every wake interrupt of the cluster except the power
    /// controller's own.
    pub fn mask_cluster_wakeirq(&self, cluster: usize) {
        self.bus.write32(pdc_regs(cluster).intr_mask, u32::MAX);
    }

    /// Arms core-level idle for `core`; the generic suspend path executes
    /// the final WFI.
    pub fn enter_core_idle(&self, cluster: usize, core: usize) {
        self.bus
            .write32(pdc_regs(cluster).pwr_req, u32::from(core_bit(core).bits()));
    }

    /// Requests cluster retention and waits; the wake controller removes
    /// power once the WFI retires.
    pub fn enter_cluster_idle(&self, cluster: usize) {
        self.bus.write32(pdc_regs(cluster).pwr_req, PDC_REQ_CLUSTER_IDLE);
        dsb_sy();
        wfi();
    }

    /// Requests system sleep and waits; resume re-enters through the warm
    /// boot mailbox.
    pub fn enter_system_suspend(&self, cluster: usize) {
        debug!("entering system suspend from cluster {cluster}");
        self.bus.write32(pdc_regs(cluster).pwr_req, PDC_REQ_SYSTEM_SLEEP);
        dsb_sy();
        wfi();
    }

    /// Restores the DMA controller's secure configuration after a system
    /// resume wiped the always-on domain.
    pub fn dma_resume(&self) {
        self.bus.write32(DMAC_SEC_CTRL_REG, DMAC_SEC_CTRL_DEFAULT);
        self.bus.write32(DMAC_AXI_CONF_REG, DMAC_AXI_CONF_DEFAULT);
    }
}
