/*++

Licensed under the Apache-2.0 license.

File Name:

    ctrl.rs

Abstract:

    Low-level eFuse controller driver. The session, bit programmer, field
    writer, programmable-bits calculator, checksum check and cache access are
    implemented on `EfuseCtrl` in their own modules.

--*/

use crate::config::EfuseConfig;
use crate::hal::RegisterBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerMode {
    Locked,
    Read,
    Program,
}

/// Read margin applied while the controller is unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginRead {
    Normal,
    /// Stricter sensing threshold, used when verifying freshly programmed bits.
    Margin,
}

pub struct EfuseCtrl<B: RegisterBus> {
    pub(crate) bus: B,
    pub(crate) config: EfuseConfig,
    pub(crate) mode: ControllerMode,
    /// Set by every program pulse, cleared by a successful cache reload.
    pub(crate) cache_stale: bool,
}

impl<B: RegisterBus> EfuseCtrl<B> {
    pub fn new(bus: B, config: EfuseConfig) -> Self {
        Self {
            bus,
            config,
            mode: ControllerMode::Locked,
            cache_stale: false,
        }
    }

    pub fn mode(&self) -> ControllerMode {
        self.mode
    }

    /// True when fuses were programmed since the last cache reload.
    pub fn cache_stale(&self) -> bool {
        self.cache_stale
    }

    pub fn config(&self) -> &EfuseConfig {
        &self.config
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    pub(crate) fn read_ctrl(&mut self, offset: u32) -> u32 {
        let addr = self.config.ctrl_reg(offset);
        self.bus.read(addr)
    }

    pub(crate) fn write_ctrl(&mut self, offset: u32, value: u32) {
        let addr = self.config.ctrl_reg(offset);
        self.bus.write(addr, value)
    }
}
