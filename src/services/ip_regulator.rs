// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Privileged IP-regulator service.
//!
//! A vendor-reserved block of sixteen SMC function IDs lets the Normal
//! World's regulator framework switch and query the IP power domains. The
//! service only demultiplexes: the actual sequencing lives behind
//! [`RegulatorOps`], which [`crate::ip_power::IpPowerController`]
//! implements.

use super::Service;
use crate::smccc::{FunctionId, NOT_SUPPORTED, SmcReturn};
use log::{debug, warn};

/// Mask selecting the reserved function-ID block.
pub const IP_REGULATOR_FID_MASK: u32 = 0xffff_fff0;
/// Value of the reserved function-ID block.
pub const IP_REGULATOR_FID_VALUE: u32 = 0xc500_fff0;

/// x2 selector: remove power from the device.
const OP_POWER_DOWN: u64 = 0;
/// x2 selector: apply power to the device.
const OP_POWER_UP: u64 = 1;
/// x2 selector: query whether the device is powered.
const OP_POWER_STATE: u64 = 2;

/// Errors a [`RegulatorOps`] implementation can report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegulatorError {
    /// The device ID does not name a known power domain.
    UnknownDevice,
}

/// Platform operations backing the regulator service.
pub trait RegulatorOps {
    /// Applies power to the device; returns the value to hand back in x0.
    fn set_power_up(&self, device: u64) -> Result<u64, RegulatorError>;

    /// Removes power from the device; returns the value to hand back in x0.
    fn set_power_down(&self, device: u64) -> Result<u64, RegulatorError>;

    /// Returns 1 in x0 if the device is powered, 0 if not.
    fn power_state(&self, device: u64) -> Result<u64, RegulatorError>;
}

/// The regulator service: demultiplexes the reserved function-ID block onto
/// a [`RegulatorOps`] implementation.
pub struct IpRegulatorService<O: RegulatorOps> {
    ops: O,
}

impl<O: RegulatorOps> IpRegulatorService<O> {
    /// Creates the service.
    ///
    /// A missing platform registration is a build misconfiguration, not a
    /// runtime condition, so it fails here rather than on the first call.
    pub fn setup(ops: Option<O>) -> Self {
        let Some(ops) = ops else {
            panic!("IP regulator service initialized without platform operations");
        };
        debug!("IP regulator service registered");
        Self { ops }
    }
}

fn complete(result: Result<u64, RegulatorError>) -> SmcReturn {
    match result {
        Ok(value) => value.into(),
        Err(RegulatorError::UnknownDevice) => NOT_SUPPORTED.into(),
    }
}

impl<O: RegulatorOps> Service for IpRegulatorService<O> {
    fn owns(&self, function: FunctionId) -> bool {
        function.0 & IP_REGULATOR_FID_MASK == IP_REGULATOR_FID_VALUE
    }

    fn handle_smc(&self, regs: &[u64; 4]) -> SmcReturn {
        let device = regs[1];
        match regs[2] {
            OP_POWER_DOWN => complete(self.ops.set_power_down(device)),
            OP_POWER_UP => complete(self.ops.set_power_up(device)),
            OP_POWER_STATE => complete(self.ops.power_state(device)),
            selector => {
                warn!("unknown regulator operation {selector}");
                NOT_SUPPORTED.into()
            }
        }
    }
}
