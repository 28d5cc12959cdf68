// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! PSCI platform hooks.
//!
//! The generic PSCI layer in the firmware image coordinates requests and
//! picks composite target states; this module supplies the platform half:
//! what actually happens to a Kirin-class SoC when a core turns on or off,
//! when a cluster loses its last running core, and when the whole system
//! suspends. The contract is [`PsciPlatformInterface`]; the implementation
//! is [`KirinPsciPlatform`].

use crate::aarch64::{clr_ex, dsb_sy, isb};
use crate::cci;
use crate::ip_power::IpPowerController;
use crate::layout::{
    CLUSTER_COUNT, CORES_PER_CLUSTER, DDR_BASE, DDR_SIZE, RESET_DIAGNOSTIC_MAGIC,
    SCPEREN1_DDR_SELFREFRESH_DONE_BYPASS, SCTRL_SCPEREN1_REG, SCTRL_SCSYSSTAT_REG,
};
use crate::mmio::Mmio;
use crate::pwrc::PowerController;
use arm_psci::{ErrorCode, Mpidr};
use log::info;

/// Number of power levels the platform exposes.
pub const POWER_LEVEL_COUNT: usize = 3;
/// Power level of a single core.
pub const CORE_LEVEL: usize = 0;
/// Power level of a cluster.
pub const CLUSTER_LEVEL: usize = 1;
/// Power level of the whole system.
pub const SYSTEM_LEVEL: usize = 2;

const PSTATE_ID_MASK: u32 = 0xffff;
const PSTATE_TYPE_POWERDOWN_BIT: u32 = 1 << 16;
const PSTATE_LEVEL_SHIFT: u32 = 24;
const PSTATE_LEVEL_MASK: u32 = 0x3;

/// The local state of one power domain level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LocalState {
    /// Running normally.
    Run,
    /// Retention: state preserved, execution stopped.
    Retention,
    /// Powered off.
    Off,
}

/// A composite power state: one [`LocalState`] per level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PowerDomainState([LocalState; POWER_LEVEL_COUNT]);

impl PowerDomainState {
    /// Everything running.
    pub const RUN: Self = Self([LocalState::Run; POWER_LEVEL_COUNT]);
    /// Everything off; also the deepest state system suspend targets.
    pub const OFF: Self = Self([LocalState::Off; POWER_LEVEL_COUNT]);

    /// Core-level retention with the higher levels running.
    pub const fn core_retention() -> Self {
        Self([LocalState::Retention, LocalState::Run, LocalState::Run])
    }

    /// Power-down up to and including `level`, running above it.
    pub const fn off_through(level: usize) -> Self {
        match level {
            CORE_LEVEL => Self([LocalState::Off, LocalState::Run, LocalState::Run]),
            CLUSTER_LEVEL => Self([LocalState::Off, LocalState::Off, LocalState::Run]),
            _ => Self::OFF,
        }
    }

    /// The core-level state.
    pub fn core_state(&self) -> LocalState {
        self.0[CORE_LEVEL]
    }

    /// The cluster-level state.
    pub fn cluster_state(&self) -> LocalState {
        self.0[CLUSTER_LEVEL]
    }

    /// The system-level state.
    pub fn system_state(&self) -> LocalState {
        self.0[SYSTEM_LEVEL]
    }
}

/// The platform half of PSCI: invoked by the generic coordination layer
/// with requests already validated against the topology.
pub trait PsciPlatformInterface {
    /// Powers on the core identified by `target`. Called on a core that is
    /// already running.
    fn power_domain_on(&self, target: Mpidr) -> Result<(), ErrorCode>;

    /// Runs on a core that has just come out of reset after a power-on or a
    /// power-down-suspend wakeup; `previous_state` is the state it left.
    fn power_domain_on_finish(&self, mpidr: Mpidr, previous_state: &PowerDomainState);

    /// Runs on the calling core on its way off (CPU_OFF).
    fn power_domain_off(&self, mpidr: Mpidr, target_state: &PowerDomainState);

    /// Runs on the calling core on its way into `target_state`
    /// (CPU_SUSPEND). Returns for standby states and for power-down states
    /// whose final wait is executed by the generic layer.
    fn power_domain_suspend(&self, mpidr: Mpidr, target_state: &PowerDomainState);

    /// Runs on the calling core after it woke from a power-down suspend.
    fn power_domain_suspend_finish(&self, mpidr: Mpidr, previous_state: &PowerDomainState);

    /// Checks and decodes a CPU_SUSPEND power-state parameter.
    fn validate_power_state(&self, power_state: u32) -> Result<PowerDomainState, ErrorCode>;

    /// Checks a non-secure entry point address.
    fn validate_ns_entrypoint(&self, entrypoint: u64) -> Result<(), ErrorCode>;

    /// Returns the composite state SYSTEM_SUSPEND targets.
    fn sys_suspend_power_state(&self) -> PowerDomainState;

    /// Resets the system; does not return.
    fn system_reset(&self) -> !;
}

/// Board collaborators outside this crate's scope: the interrupt controller
/// driver and the console, owned by the firmware image.
pub trait BoardInterface {
    /// Per-CPU interrupt controller initialization after a core powers on.
    fn gic_pcpu_init(&self);
    /// Enables the calling core's CPU interface.
    fn gic_cpuif_enable(&self);
    /// Disables the calling core's CPU interface.
    fn gic_cpuif_disable(&self);
    /// Reinitializes the distributor after the system-level domain was off.
    fn gic_distif_init(&self);
    /// Reinitializes the console after the system-level domain was off.
    fn console_reinit(&self);
}

fn affinity(mpidr: Mpidr) -> (usize, usize) {
    (usize::from(mpidr.aff1), usize::from(mpidr.aff0))
}

/// The Kirin implementation of the platform hooks.
pub struct KirinPsciPlatform<M: Mmio, B: BoardInterface> {
    bus: M,
    regulator: IpPowerController<M>,
    pwrc: PowerController<M>,
    board: B,
    sec_entrypoint: u64,
}

impl<M: Mmio + Clone, B: BoardInterface> KirinPsciPlatform<M, B> {
    /// Creates the platform. `sec_entrypoint` is the warm-boot entry every
    /// powered-on core starts at; `boot_cpu` is the core running now.
    pub fn new(bus: M, board: B, sec_entrypoint: u64, boot_cpu: Mpidr) -> Self {
        let platform = Self {
            regulator: IpPowerController::new(bus.clone()),
            pwrc: PowerController::new(bus.clone()),
            bus,
            board,
            sec_entrypoint,
        };
        let (cluster, core) = affinity(boot_cpu);
        platform.pwrc.mark_core_booted(cluster, core);
        info!("PSCI platform up, secure entry point {sec_entrypoint:#x}");
        platform
    }
}

impl<M: Mmio, B: BoardInterface> KirinPsciPlatform<M, B> {
    /// The IP power-domain controller, shared with the regulator service.
    pub fn regulator(&self) -> &IpPowerController<M> {
        &self.regulator
    }

    /// The CPU/cluster power controller.
    pub fn power_controller(&self) -> &PowerController<M> {
        &self.pwrc
    }
}

impl<M: Mmio, B: BoardInterface> PsciPlatformInterface for KirinPsciPlatform<M, B> {
    fn power_domain_on(&self, target: Mpidr) -> Result<(), ErrorCode> {
        let (cluster, core) = affinity(target);
        if cluster >= CLUSTER_COUNT || core >= CORES_PER_CLUSTER {
            return Err(ErrorCode::InvalidParameters);
        }
        // Sample the rail before marking the core, so a cluster powering
        // up right now is seen as off and gets the full sequence.
        let cluster_was_on = self.pwrc.cluster_is_powered_on(cluster);
        self.pwrc.lock(cluster).set_boot_flag(core);
        self.pwrc.set_entrypoint(cluster, core, self.sec_entrypoint);
        if cluster_was_on {
            self.pwrc.powerup_core(cluster, core);
        } else {
            self.pwrc.powerup_cluster(cluster, core);
        }
        Ok(())
    }

    fn power_domain_on_finish(&self, mpidr: Mpidr, previous_state: &PowerDomainState) {
        let (cluster, _) = affinity(mpidr);
        if previous_state.cluster_state() == LocalState::Off {
            cci::enable_snoop_dvm(&self.bus, cluster);
        }
        self.board.gic_pcpu_init();
        self.board.gic_cpuif_enable();
    }

    fn power_domain_off(&self, mpidr: Mpidr, _target_state: &PowerDomainState) {
        let (cluster, core) = affinity(mpidr);
        clr_ex();
        isb();
        dsb_sy();
        self.board.gic_cpuif_disable();
        let mut flags = self.pwrc.lock(cluster);
        flags.clear_boot_flag(core);
        self.pwrc.powerdn_core(cluster, core);
        if flags.all_other_cores_down(core) {
            cci::disable_snoop_dvm(&self.bus, cluster);
            isb();
            dsb_sy();
            self.pwrc.powerdn_cluster(cluster);
        }
    }

    fn power_domain_suspend(&self, mpidr: Mpidr, target_state: &PowerDomainState) {
        if target_state.core_state() != LocalState::Off {
            // Core standby: nothing to sequence, the generic layer waits.
            return;
        }
        let (cluster, core) = affinity(mpidr);
        clr_ex();
        isb();
        dsb_sy();
        self.board.gic_cpuif_disable();
        self.pwrc.set_entrypoint(cluster, core, self.sec_entrypoint);
        self.pwrc.enter_core_idle(cluster, core);
        if target_state.cluster_state() != LocalState::Off {
            self.pwrc.lock(cluster).set_idle_flag(core);
            return;
        }
        // The idle mark and the teardown gate share one critical section:
        // of two sibling cores racing here, only the one whose mark lands
        // last can see every other core down.
        let mut flags = self.pwrc.lock(cluster);
        flags.set_idle_flag(core);
        self.pwrc.disable_pdc(cluster);
        if flags.all_other_cores_down(core) {
            cci::disable_snoop_dvm(&self.bus, cluster);
            isb();
            dsb_sy();
            self.pwrc.mask_cluster_wakeirq(cluster);
            self.pwrc.enable_pdc(cluster);
            // The final wait never returns here, so the lock cannot be
            // held across it.
            drop(flags);
            if target_state.system_state() == LocalState::Off {
                self.regulator.disable_all();
                self.pwrc.enter_system_suspend(cluster);
            } else {
                self.pwrc.enter_cluster_idle(cluster);
            }
        } else {
            // Another core is still up; re-arm the wake controller and let
            // it finish this core alone.
            self.pwrc.enable_pdc(cluster);
        }
    }

    fn power_domain_suspend_finish(&self, mpidr: Mpidr, previous_state: &PowerDomainState) {
        if previous_state.core_state() != LocalState::Off {
            return;
        }
        let (cluster, core) = affinity(mpidr);
        self.pwrc.lock(cluster).clear_idle_flag(core);
        if previous_state.system_state() == LocalState::Off {
            self.pwrc.dma_resume();
            self.board.gic_distif_init();
            self.board.console_reinit();
            self.regulator.enable_all();
        }
        self.power_domain_on_finish(mpidr, previous_state);
    }

    fn validate_power_state(&self, power_state: u32) -> Result<PowerDomainState, ErrorCode> {
        let level = ((power_state >> PSTATE_LEVEL_SHIFT) & PSTATE_LEVEL_MASK) as usize;
        if level >= POWER_LEVEL_COUNT {
            return Err(ErrorCode::InvalidParameters);
        }
        // No sub-states are defined, so a state ID must be zero.
        if power_state & PSTATE_ID_MASK != 0 {
            return Err(ErrorCode::InvalidParameters);
        }
        if power_state & PSTATE_TYPE_POWERDOWN_BIT == 0 {
            // Standby only exists at the core level.
            if level != CORE_LEVEL {
                return Err(ErrorCode::InvalidParameters);
            }
            Ok(PowerDomainState::core_retention())
        } else {
            Ok(PowerDomainState::off_through(level))
        }
    }

    fn validate_ns_entrypoint(&self, entrypoint: u64) -> Result<(), ErrorCode> {
        if entrypoint > DDR_BASE && entrypoint < DDR_BASE + DDR_SIZE {
            Ok(())
        } else {
            Err(ErrorCode::InvalidAddress)
        }
    }

    fn sys_suspend_power_state(&self) -> PowerDomainState {
        PowerDomainState::OFF
    }

    fn system_reset(&self) -> ! {
        // Let the DRAM controller skip the self-refresh handshake, leave a
        // marker for post-mortem and wait for the external watchdog.
        self.bus
            .write32(SCTRL_SCPEREN1_REG, SCPEREN1_DDR_SELFREFRESH_DONE_BYPASS);
        self.bus.write32(SCTRL_SCSYSSTAT_REG, RESET_DIAGNOSTIC_MAGIC);
        dsb_sy();
        panic!("system reset requested, waiting for the watchdog");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CLUSTER_RAIL_BIT, cluster_crg, core_mailbox, pdc_regs};
    use crate::layout::{
        CRG_PERPWRDIS_REG, CRG_PERPWREN_REG, DMAC_SEC_CTRL_REG, PDC_CTRL_DISABLE, PDC_CTRL_ENABLE,
        PDC_REQ_CLUSTER_IDLE, PDC_REQ_SYSTEM_SLEEP,
    };
    use crate::mmio::fake::FakeMmio;
    use spin::mutex::SpinMutex;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::thread;

    const SEC_ENTRYPOINT: u64 = 0x4030_0000;

    struct FakeBoard {
        events: SpinMutex<Vec<&'static str>>,
    }

    impl FakeBoard {
        fn new() -> Self {
            Self {
                events: SpinMutex::new(Vec::new()),
            }
        }

        fn events(&self) -> Vec<&'static str> {
            self.events.lock().clone()
        }
    }

    impl BoardInterface for &FakeBoard {
        fn gic_pcpu_init(&self) {
            self.events.lock().push("gic_pcpu_init");
        }

        fn gic_cpuif_enable(&self) {
            self.events.lock().push("gic_cpuif_enable");
        }

        fn gic_cpuif_disable(&self) {
            self.events.lock().push("gic_cpuif_disable");
        }

        fn gic_distif_init(&self) {
            self.events.lock().push("gic_distif_init");
        }

        fn console_reinit(&self) {
            self.events.lock().push("console_reinit");
        }
    }

    fn mpidr(cluster: u8, core: u8) -> Mpidr {
        Mpidr {
            aff0: core,
            aff1: cluster,
            aff2: 0,
            aff3: Some(0),
        }
    }

    fn platform<'a>(
        mmio: &'a FakeMmio,
        board: &'a FakeBoard,
    ) -> KirinPsciPlatform<&'a FakeMmio, &'a FakeBoard> {
        KirinPsciPlatform::new(mmio, board, SEC_ENTRYPOINT, mpidr(0, 0))
    }

    fn write_count(mmio: &FakeMmio, reg: u32, value: u32) -> usize {
        mmio.writes()
            .iter()
            .filter(|&&(r, v)| r == reg && v == value)
            .count()
    }

    #[test]
    fn validate_power_state_matrix() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        // Core standby.
        assert_eq!(
            plat.validate_power_state(0x0000_0000),
            Ok(PowerDomainState::core_retention())
        );
        // Standby above the core level does not exist.
        assert_eq!(
            plat.validate_power_state(0x0100_0000),
            Err(ErrorCode::InvalidParameters)
        );
        // Power-down at each level.
        assert_eq!(
            plat.validate_power_state(0x0001_0000),
            Ok(PowerDomainState::off_through(CORE_LEVEL))
        );
        assert_eq!(
            plat.validate_power_state(0x0101_0000),
            Ok(PowerDomainState::off_through(CLUSTER_LEVEL))
        );
        assert_eq!(
            plat.validate_power_state(0x0201_0000),
            Ok(PowerDomainState::OFF)
        );
        // Level out of range.
        assert_eq!(
            plat.validate_power_state(0x0301_0000),
            Err(ErrorCode::InvalidParameters)
        );
        // Non-zero state IDs are rejected for both request types.
        assert_eq!(
            plat.validate_power_state(0x0001_0001),
            Err(ErrorCode::InvalidParameters)
        );
        assert_eq!(
            plat.validate_power_state(0x0000_0001),
            Err(ErrorCode::InvalidParameters)
        );
    }

    #[test]
    fn ns_entrypoint_must_be_inside_dram_window() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        assert_eq!(plat.validate_ns_entrypoint(0), Err(ErrorCode::InvalidAddress));
        assert_eq!(plat.validate_ns_entrypoint(0x1000), Ok(()));
        assert_eq!(plat.validate_ns_entrypoint(DDR_SIZE - 4), Ok(()));
        assert_eq!(
            plat.validate_ns_entrypoint(DDR_SIZE),
            Err(ErrorCode::InvalidAddress)
        );
        assert_eq!(
            plat.validate_ns_entrypoint(u64::MAX),
            Err(ErrorCode::InvalidAddress)
        );
    }

    #[test]
    fn on_with_powered_cluster_skips_the_rail() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        mmio.set_reg(cluster_crg(0).stat, CLUSTER_RAIL_BIT);
        plat.power_domain_on(mpidr(0, 1)).unwrap();
        let crg = cluster_crg(0);
        assert_eq!(write_count(&mmio, crg.pwren, 0x2), 1);
        assert_eq!(write_count(&mmio, crg.pwren, CLUSTER_RAIL_BIT), 0);
        let (low, _) = core_mailbox(0, 1);
        assert_eq!(mmio.read32(low), SEC_ENTRYPOINT as u32);
    }

    #[test]
    fn on_with_unpowered_cluster_brings_the_rail_up_too() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        plat.power_domain_on(mpidr(1, 0)).unwrap();
        let crg = cluster_crg(1);
        assert_eq!(write_count(&mmio, crg.pwren, CLUSTER_RAIL_BIT), 1);
        assert_eq!(write_count(&mmio, crg.pwren, 0x1), 1);
    }

    #[test]
    fn on_rejects_out_of_topology_targets() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        assert_eq!(
            plat.power_domain_on(mpidr(2, 0)),
            Err(ErrorCode::InvalidParameters)
        );
        assert_eq!(
            plat.power_domain_on(mpidr(0, 4)),
            Err(ErrorCode::InvalidParameters)
        );
        assert!(mmio.writes().is_empty());
    }

    #[test]
    fn on_finish_enables_snoops_only_after_cluster_power_up() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        plat.power_domain_on_finish(mpidr(0, 1), &PowerDomainState::off_through(CORE_LEVEL));
        assert_eq!(write_count(&mmio, cci::snoop_ctrl_reg(0), cci::SNOOP_ON), 0);
        plat.power_domain_on_finish(mpidr(0, 1), &PowerDomainState::off_through(CLUSTER_LEVEL));
        assert_eq!(write_count(&mmio, cci::snoop_ctrl_reg(0), cci::SNOOP_ON), 1);
        assert_eq!(
            board.events(),
            vec![
                "gic_pcpu_init",
                "gic_cpuif_enable",
                "gic_pcpu_init",
                "gic_cpuif_enable"
            ]
        );
    }

    #[test]
    fn off_tears_cluster_down_only_with_the_last_core() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        plat.power_controller().mark_core_booted(0, 1);
        let crg = cluster_crg(0);

        plat.power_domain_off(mpidr(0, 1), &PowerDomainState::off_through(CORE_LEVEL));
        assert_eq!(write_count(&mmio, crg.pwrdis, 0x2), 1);
        assert_eq!(write_count(&mmio, crg.pwrdis, CLUSTER_RAIL_BIT), 0);

        plat.power_domain_off(mpidr(0, 0), &PowerDomainState::off_through(CLUSTER_LEVEL));
        assert_eq!(write_count(&mmio, cci::snoop_ctrl_reg(0), 0), 1);
        assert_eq!(write_count(&mmio, crg.pwrdis, CLUSTER_RAIL_BIT), 1);
        assert_eq!(board.events(), vec!["gic_cpuif_disable", "gic_cpuif_disable"]);
    }

    #[test]
    fn standby_suspend_touches_nothing() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        plat.power_domain_suspend(mpidr(0, 0), &PowerDomainState::core_retention());
        assert!(mmio.writes().is_empty());
        assert!(board.events().is_empty());
    }

    #[test]
    fn core_suspend_arms_core_idle_without_touching_the_pdc() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        plat.power_domain_suspend(mpidr(0, 0), &PowerDomainState::off_through(CORE_LEVEL));
        let pdc = pdc_regs(0);
        assert_eq!(write_count(&mmio, pdc.pwr_req, 0x1), 1);
        assert_eq!(write_count(&mmio, pdc.ctrl, PDC_CTRL_DISABLE), 0);
        assert_eq!(write_count(&mmio, pdc.ctrl, PDC_CTRL_ENABLE), 0);
        let (low, _) = core_mailbox(0, 0);
        assert_eq!(mmio.read32(low), SEC_ENTRYPOINT as u32);
        assert_eq!(board.events(), vec!["gic_cpuif_disable"]);
    }

    #[test]
    fn last_core_system_suspend_disables_regulators_and_requests_sleep() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        plat.power_domain_suspend(mpidr(0, 0), &PowerDomainState::OFF);
        let pdc = pdc_regs(0);
        assert_eq!(write_count(&mmio, pdc.intr_mask, u32::MAX), 1);
        assert_eq!(write_count(&mmio, pdc.pwr_req, PDC_REQ_SYSTEM_SLEEP), 1);
        // The media 1 rail went down as part of disable_all.
        assert_eq!(write_count(&mmio, CRG_PERPWRDIS_REG, 0x20), 1);
    }

    #[test]
    fn sibling_core_suspend_rearms_without_teardown() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        plat.power_controller().mark_core_booted(0, 1);
        plat.power_domain_suspend(mpidr(0, 0), &PowerDomainState::off_through(CLUSTER_LEVEL));
        let pdc = pdc_regs(0);
        assert_eq!(write_count(&mmio, pdc.ctrl, PDC_CTRL_DISABLE), 1);
        assert_eq!(write_count(&mmio, pdc.ctrl, PDC_CTRL_ENABLE), 1);
        assert_eq!(write_count(&mmio, pdc.intr_mask, u32::MAX), 0);
        assert_eq!(write_count(&mmio, pdc.pwr_req, PDC_REQ_CLUSTER_IDLE), 0);
    }

    #[test]
    fn concurrent_sibling_suspends_tear_down_exactly_once() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        plat.power_controller().mark_core_booted(0, 1);
        let target = PowerDomainState::off_through(CLUSTER_LEVEL);
        thread::scope(|scope| {
            scope.spawn(|| plat.power_domain_suspend(mpidr(0, 0), &target));
            scope.spawn(|| plat.power_domain_suspend(mpidr(0, 1), &target));
        });
        let pdc = pdc_regs(0);
        assert_eq!(write_count(&mmio, pdc.intr_mask, u32::MAX), 1);
        assert_eq!(write_count(&mmio, cci::snoop_ctrl_reg(0), 0), 1);
        assert_eq!(write_count(&mmio, pdc.pwr_req, PDC_REQ_CLUSTER_IDLE), 1);
    }

    #[test]
    fn system_resume_restores_world_in_order() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        plat.power_domain_suspend_finish(mpidr(0, 0), &PowerDomainState::OFF);
        assert_eq!(
            board.events(),
            vec![
                "gic_distif_init",
                "console_reinit",
                "gic_pcpu_init",
                "gic_cpuif_enable"
            ]
        );
        assert_eq!(write_count(&mmio, DMAC_SEC_CTRL_REG, 0x3), 1);
        // The media 1 rail came back as part of enable_all.
        assert_eq!(write_count(&mmio, CRG_PERPWREN_REG, 0x20), 1);
        assert_eq!(write_count(&mmio, cci::snoop_ctrl_reg(0), cci::SNOOP_ON), 1);
    }

    #[test]
    fn cluster_resume_skips_the_system_restores() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        plat.power_domain_suspend_finish(mpidr(0, 0), &PowerDomainState::off_through(CLUSTER_LEVEL));
        assert_eq!(board.events(), vec!["gic_pcpu_init", "gic_cpuif_enable"]);
        assert_eq!(write_count(&mmio, DMAC_SEC_CTRL_REG, 0x3), 0);
    }

    #[test]
    fn standby_resume_is_a_no_op() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        plat.power_domain_suspend_finish(mpidr(0, 0), &PowerDomainState::core_retention());
        assert!(mmio.writes().is_empty());
        assert!(board.events().is_empty());
    }

    #[test]
    fn system_reset_leaves_marker_and_waits_for_watchdog() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        let result = catch_unwind(AssertUnwindSafe(|| plat.system_reset()));
        let message = *result.unwrap_err().downcast::<&str>().unwrap();
        assert!(message.contains("watchdog"));
        assert_eq!(
            write_count(&mmio, SCTRL_SCSYSSTAT_REG, RESET_DIAGNOSTIC_MAGIC),
            1
        );
        assert_eq!(
            write_count(&mmio, SCTRL_SCPEREN1_REG, SCPEREN1_DDR_SELFREFRESH_DONE_BYPASS),
            1
        );
    }

    #[test]
    fn system_suspend_targets_everything_off() {
        let mmio = FakeMmio::new();
        let board = FakeBoard::new();
        let plat = platform(&mmio, &board);
        assert_eq!(plat.sys_suspend_power_state(), PowerDomainState::OFF);
    }
}
