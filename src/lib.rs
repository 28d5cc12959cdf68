// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Secure-world power management for Kirin-class SoCs.
//!
//! This crate is the platform power core linked into the EL3 runtime
//! firmware: the PSCI platform hooks ([`psci`]), the CPU/cluster power
//! controller ([`pwrc`]), the IP power-domain sequencing engine
//! ([`ip_power`]) with its NoC bus-idle handshake ([`noc`]), and the
//! privileged SMC service ([`services::ip_regulator`]) that exposes the IP
//! domains to the Normal World's regulator framework.
//!
//! The containing firmware image provides the runtime the crate leans on:
//! the SMC trap path, the generic PSCI coordination layer, the interrupt
//! controller driver and the log sink. Hardware access is abstracted behind
//! [`mmio::Mmio`], so everything here runs under `cargo test` on the host
//! against recording fakes.

#![cfg_attr(not(test), no_std)]

pub mod aarch64;
pub mod cci;
pub mod ip_power;
pub mod layout;
pub mod mmio;
pub mod noc;
pub mod psci;
pub mod pwrc;
pub mod services;
pub mod smccc;
