// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! SMC service dispatch.
//!
//! Each service claims a range of SMCCC function IDs via [`Service::owns`];
//! the dispatcher walks the registered services in order and hands the call
//! to the first owner. A call nobody owns returns the SMCCC "unknown
//! function" value.

pub mod ip_regulator;

use crate::smccc::{FunctionId, NOT_SUPPORTED, SmcReturn};

/// A service which handles some range of SMC calls.
pub trait Service {
    /// Returns whether this service is intended to handle the given function
    /// ID.
    fn owns(&self, function: FunctionId) -> bool;

    /// Handles the given SMC call from the Normal World. `regs` holds x0-x3
    /// of the call.
    fn handle_smc(&self, _regs: &[u64; 4]) -> SmcReturn {
        NOT_SUPPORTED.into()
    }
}

/// Routes one SMC to the first service owning its function ID.
pub fn dispatch(services: &[&dyn Service], regs: &[u64; 4]) -> SmcReturn {
    let function = FunctionId(regs[0] as u32);
    for service in services {
        if service.owns(function) {
            return service.handle_smc(regs);
        }
    }
    NOT_SUPPORTED.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedService {
        function: u32,
        answer: u64,
    }

    impl Service for FixedService {
        fn owns(&self, function: FunctionId) -> bool {
            function.0 == self.function
        }

        fn handle_smc(&self, _regs: &[u64; 4]) -> SmcReturn {
            self.answer.into()
        }
    }

    #[test]
    fn first_owner_wins() {
        let a = FixedService {
            function: 0x8400_0000,
            answer: 1,
        };
        let b = FixedService {
            function: 0x8400_0000,
            answer: 2,
        };
        let services: [&dyn Service; 2] = [&a, &b];
        let ret = dispatch(&services, &[0x8400_0000, 0, 0, 0]);
        assert_eq!(ret.values(), &[1]);
    }

    #[test]
    fn unowned_function_is_unknown() {
        let a = FixedService {
            function: 0x8400_0000,
            answer: 1,
        };
        let services: [&dyn Service; 1] = [&a];
        let ret = dispatch(&services, &[0x8400_0001, 0, 0, 0]);
        assert_eq!(ret.values(), &[u64::MAX]);
    }
}
