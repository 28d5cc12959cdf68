// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! SoC register map and memory-window constants.
//!
//! These are configuration data for the rest of the crate: the system
//! controller (SCTRL), the peripheral clock/reset/power block (CRG), the
//! power-management controller (PMC, which fronts the NoC idle handshake),
//! the two media-subsystem CRG mirrors, the per-cluster power/wake
//! controller (PDC) and the cache-coherent interconnect (CCI).

/// System controller block.
pub const SCTRL_BASE: u32 = 0xfff0_a000;
/// System status register; the reset path leaves a diagnostic marker here.
pub const SCTRL_SCSYSSTAT_REG: u32 = SCTRL_BASE + 0x004;
/// Peripheral enable register 1 (reset-time handshakes).
pub const SCTRL_SCPEREN1_REG: u32 = SCTRL_BASE + 0x170;
/// Peripheral enable register 4 (always-on media clocks).
pub const SCTRL_SCPEREN4_REG: u32 = SCTRL_BASE + 0x1b0;
/// Peripheral disable register 4.
pub const SCTRL_SCPERDIS4_REG: u32 = SCTRL_BASE + 0x1b4;

/// Skips waiting for DRAM self-refresh completion during reset.
pub const SCPEREN1_DDR_SELFREFRESH_DONE_BYPASS: u32 = 1 << 1;
/// Diagnostic marker written to `SCTRL_SCSYSSTAT_REG` on a requested reset.
pub const RESET_DIAGNOSTIC_MAGIC: u32 = 0xdead_beef;

/// Peripheral clock/reset/power block.
pub const CRG_BASE: u32 = 0xfff3_5000;
/// Peripheral clock enable register 0.
pub const CRG_PEREN0_REG: u32 = CRG_BASE + 0x000;
/// Peripheral clock disable register 0.
pub const CRG_PERDIS0_REG: u32 = CRG_BASE + 0x004;
/// Peripheral clock enable register 3.
pub const CRG_PEREN3_REG: u32 = CRG_BASE + 0x030;
/// Peripheral clock disable register 3.
pub const CRG_PERDIS3_REG: u32 = CRG_BASE + 0x034;
/// Peripheral clock enable register 4.
pub const CRG_PEREN4_REG: u32 = CRG_BASE + 0x040;
/// Peripheral clock disable register 4.
pub const CRG_PERDIS4_REG: u32 = CRG_BASE + 0x044;
/// Peripheral reset assert register 4.
pub const CRG_PERRSTEN4_REG: u32 = CRG_BASE + 0x090;
/// Peripheral reset deassert register 4.
pub const CRG_PERRSTDIS4_REG: u32 = CRG_BASE + 0x094;
/// Peripheral reset assert register 5.
pub const CRG_PERRSTEN5_REG: u32 = CRG_BASE + 0x0a8;
/// Peripheral reset deassert register 5.
pub const CRG_PERRSTDIS5_REG: u32 = CRG_BASE + 0x0ac;
/// Clock divider register 6 (upper half is a write mask).
pub const CRG_CLKDIV6_REG: u32 = CRG_BASE + 0x0f0;
/// Clock divider register 18 (upper half is a write mask).
pub const CRG_CLKDIV18_REG: u32 = CRG_BASE + 0x120;
/// Clock divider register 20 (upper half is a write mask).
pub const CRG_CLKDIV20_REG: u32 = CRG_BASE + 0x128;
/// Isolation enable register.
pub const CRG_ISOEN_REG: u32 = CRG_BASE + 0x144;
/// Isolation disable register.
pub const CRG_ISODIS_REG: u32 = CRG_BASE + 0x148;
/// Peripheral power switch enable register.
pub const CRG_PERPWREN_REG: u32 = CRG_BASE + 0x150;
/// Peripheral power switch disable register.
pub const CRG_PERPWRDIS_REG: u32 = CRG_BASE + 0x154;
/// Peripheral clock enable register 6.
pub const CRG_PEREN6_REG: u32 = CRG_BASE + 0x410;
/// Peripheral clock disable register 6.
pub const CRG_PERDIS6_REG: u32 = CRG_BASE + 0x414;

/// Power-management controller block (hosts the NoC idle handshake).
pub const PMC_BASE: u32 = 0xfff3_1000;
/// NoC power idle request register (upper half is a write mask).
pub const PMC_NOC_POWER_IDLEREQ_REG: u32 = PMC_BASE + 0x380;
/// NoC power idle acknowledge register.
pub const PMC_NOC_POWER_IDLEACK_REG: u32 = PMC_BASE + 0x384;
/// NoC power idle status register.
pub const PMC_NOC_POWER_IDLE_REG: u32 = PMC_BASE + 0x388;

/// Media subsystem 1 CRG mirror.
pub const MEDIA1_CRG_BASE: u32 = 0xe87f_f000;
/// Media 1 clock enable register 0.
pub const MEDIA1_PEREN0_REG: u32 = MEDIA1_CRG_BASE + 0x000;
/// Media 1 clock disable register 0.
pub const MEDIA1_PERDIS0_REG: u32 = MEDIA1_CRG_BASE + 0x004;
/// Media 1 clock enable register 1.
pub const MEDIA1_PEREN1_REG: u32 = MEDIA1_CRG_BASE + 0x010;
/// Media 1 clock disable register 1.
pub const MEDIA1_PERDIS1_REG: u32 = MEDIA1_CRG_BASE + 0x014;
/// Media 1 clock enable register 2.
pub const MEDIA1_PEREN2_REG: u32 = MEDIA1_CRG_BASE + 0x020;
/// Media 1 clock disable register 2.
pub const MEDIA1_PERDIS2_REG: u32 = MEDIA1_CRG_BASE + 0x024;
/// Media 1 reset assert register 0.
pub const MEDIA1_PERRSTEN0_REG: u32 = MEDIA1_CRG_BASE + 0x030;
/// Media 1 reset deassert register 0.
pub const MEDIA1_PERRSTDIS0_REG: u32 = MEDIA1_CRG_BASE + 0x034;
/// Media 1 reset assert register 1.
pub const MEDIA1_PERRSTEN1_REG: u32 = MEDIA1_CRG_BASE + 0x040;
/// Media 1 reset deassert register 1.
pub const MEDIA1_PERRSTDIS1_REG: u32 = MEDIA1_CRG_BASE + 0x044;
/// Media 1 secure ISP reset assert register.
pub const MEDIA1_PERRSTEN_ISP_SEC_REG: u32 = MEDIA1_CRG_BASE + 0x048;
/// Media 1 secure ISP reset deassert register.
pub const MEDIA1_PERRSTDIS_ISP_SEC_REG: u32 = MEDIA1_CRG_BASE + 0x04c;
/// Media 1 clock divider register 0 (masked write).
pub const MEDIA1_CLKDIV0_REG: u32 = MEDIA1_CRG_BASE + 0x060;
/// Media 1 clock divider register 2 (masked write).
pub const MEDIA1_CLKDIV2_REG: u32 = MEDIA1_CRG_BASE + 0x068;
/// Media 1 clock divider register 5 (masked write).
pub const MEDIA1_CLKDIV5_REG: u32 = MEDIA1_CRG_BASE + 0x074;
/// Media 1 clock divider register 9 (masked write).
pub const MEDIA1_CLKDIV9_REG: u32 = MEDIA1_CRG_BASE + 0x084;
/// Media 1 automatic divider register 0 (masked write).
pub const MEDIA1_AUTODIV0_REG: u32 = MEDIA1_CRG_BASE + 0x090;
/// Media 1 automatic divider register 1 (masked write).
pub const MEDIA1_AUTODIV1_REG: u32 = MEDIA1_CRG_BASE + 0x094;
/// Media 1 automatic divider register 4 (masked write).
pub const MEDIA1_AUTODIV4_REG: u32 = MEDIA1_CRG_BASE + 0x0a0;

/// Media subsystem 2 CRG mirror.
pub const MEDIA2_CRG_BASE: u32 = 0xe890_0000;
/// Media 2 clock enable register 0.
pub const MEDIA2_PEREN0_REG: u32 = MEDIA2_CRG_BASE + 0x000;
/// Media 2 clock disable register 0.
pub const MEDIA2_PERDIS0_REG: u32 = MEDIA2_CRG_BASE + 0x004;
/// Media 2 reset assert register 0.
pub const MEDIA2_PERRSTEN0_REG: u32 = MEDIA2_CRG_BASE + 0x030;
/// Media 2 reset deassert register 0.
pub const MEDIA2_PERRSTDIS0_REG: u32 = MEDIA2_CRG_BASE + 0x034;

/// Video decoder configuration block.
pub const VDEC_CFG_BASE: u32 = 0xe880_0000;
/// VDEC internal memory configuration word, set once after power-up.
pub const VDEC_MEM_CFG0_REG: u32 = VDEC_CFG_BASE + 0xc074;
/// VDEC internal memory configuration word, set once after power-up.
pub const VDEC_MEM_CFG1_REG: u32 = VDEC_CFG_BASE + 0xf008;

/// Video encoder configuration block.
pub const VENC_CFG_BASE: u32 = 0xe8a0_0000;
/// VENC internal memory configuration word, set once after power-up.
pub const VENC_MEM_CFG0_REG: u32 = VENC_CFG_BASE + 0x1b0;
/// VENC internal memory configuration word, set once after power-up.
pub const VENC_MEM_CFG1_REG: u32 = VENC_CFG_BASE + 0x1_0008;

/// Vivobus NoC quality-of-service priority word, set once after full media
/// bring-up.
pub const VIVO_NOC_QOS_PRIORITY_REG: u32 = 0xe858_3800;
/// Vivobus NoC quality-of-service mode word, set once after full media
/// bring-up.
pub const VIVO_NOC_QOS_MODE_REG: u32 = 0xe858_3804;

/// Cache-coherent interconnect base.
pub const CCI_BASE: u32 = 0xe810_0000;

/// DMA controller base.
pub const DMAC_BASE: u32 = 0xfdf3_0000;
/// DMA controller secure channel configuration register.
pub const DMAC_SEC_CTRL_REG: u32 = DMAC_BASE + 0x694;
/// Value restoring the DMA controller's secure channel split after resume.
pub const DMAC_SEC_CTRL_DEFAULT: u32 = 0x3;
/// DMA controller AXI configuration register.
pub const DMAC_AXI_CONF_REG: u32 = DMAC_BASE + 0x698;
/// Value restoring the DMA controller's AXI attributes after resume.
pub const DMAC_AXI_CONF_DEFAULT: u32 = 0x20_1201;

/// Number of CPU clusters.
pub const CLUSTER_COUNT: usize = 2;
/// Number of cores per cluster.
pub const CORES_PER_CLUSTER: usize = 4;

/// Per-cluster CRG registers controlling core and cluster power switches.
///
/// Bits 0..=3 address the cores of the cluster, [`CLUSTER_RAIL_BIT`]
/// addresses the cluster rail itself.
pub struct ClusterCrg {
    /// Power switch enable.
    pub pwren: u32,
    /// Power switch disable.
    pub pwrdis: u32,
    /// Isolation enable.
    pub isoen: u32,
    /// Isolation disable.
    pub isodis: u32,
    /// Reset assert.
    pub rsten: u32,
    /// Reset deassert.
    pub rstdis: u32,
    /// Power status (read-only).
    pub stat: u32,
}

/// Bit addressing the whole cluster rail in a [`ClusterCrg`] register.
pub const CLUSTER_RAIL_BIT: u32 = 1 << 4;

/// Returns the CRG register bank for `cluster`.
pub const fn cluster_crg(cluster: usize) -> ClusterCrg {
    let base = CRG_BASE + 0x200 + 0x40 * cluster as u32;
    ClusterCrg {
        pwren: base,
        pwrdis: base + 0x04,
        isoen: base + 0x08,
        isodis: base + 0x0c,
        rsten: base + 0x10,
        rstdis: base + 0x14,
        stat: base + 0x18,
    }
}

/// Per-cluster power/wake controller (PDC) registers.
pub struct PdcRegs {
    /// Controller arm/disarm.
    pub ctrl: u32,
    /// Wake interrupt mask; all-ones masks every wake source but the PMIC.
    pub intr_mask: u32,
    /// Low-power request register; see the `PDC_REQ_*` values.
    pub pwr_req: u32,
}

/// PDC arm value for [`PdcRegs::ctrl`].
pub const PDC_CTRL_ENABLE: u32 = 0x1;
/// PDC disarm value for [`PdcRegs::ctrl`].
pub const PDC_CTRL_DISABLE: u32 = 0x0;
/// Cluster-retention request code for [`PdcRegs::pwr_req`].
pub const PDC_REQ_CLUSTER_IDLE: u32 = 1 << 8;
/// System-sleep request code for [`PdcRegs::pwr_req`].
pub const PDC_REQ_SYSTEM_SLEEP: u32 = 1 << 9;

/// Returns the PDC register bank for `cluster`.
pub const fn pdc_regs(cluster: usize) -> PdcRegs {
    let base = 0xfff0_e000 + 0x400 * cluster as u32;
    PdcRegs {
        ctrl: base,
        intr_mask: base + 0x04,
        pwr_req: base + 0x08,
    }
}

/// Returns the warm-boot entry point mailbox for a core as a (low, high)
/// register pair.
pub const fn core_mailbox(cluster: usize, core: usize) -> (u32, u32) {
    let index = (cluster * CORES_PER_CLUSTER + core) as u32;
    let low = SCTRL_BASE + 0x600 + index * 8;
    (low, low + 4)
}

/// Base of the DRAM window the non-secure world may enter at.
pub const DDR_BASE: u64 = 0x0;
/// Size of the DRAM window the non-secure world may enter at.
pub const DDR_SIZE: u64 = 0xc000_0000;
