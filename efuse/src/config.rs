// Licensed under the Apache-2.0 license

use registers_efuse::{EFUSE_CACHE_BASE, EFUSE_CTRL_BASE};

/// Base addresses, poll budgets and runtime capabilities of the eFuse engine.
///
/// Poll budgets count register reads, not time; the hardware waits are plain
/// busy loops.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EfuseConfig {
    /// eFuse controller base address
    pub ctrl_offset: u32,
    /// eFuse read cache base address
    pub cache_offset: u32,
    /// Polls allowed for a program pulse to finish
    pub pgm_timeout: u32,
    /// Polls allowed for a row read to finish
    pub rd_timeout: u32,
    /// Polls allowed for a cache reload to finish
    pub cache_load_timeout: u32,
    /// Polls allowed for a checksum self-check to finish
    pub crc_timeout: u32,
    /// Spin iterations between two polls
    pub poll_interval: u32,
    /// Consult the environment guard before programming
    pub env_monitoring: bool,
}

pub const DEFAULT_EFUSE_CONFIG: EfuseConfig = EfuseConfig {
    ctrl_offset: EFUSE_CTRL_BASE,
    cache_offset: EFUSE_CACHE_BASE,
    pgm_timeout: 0x1000,
    rd_timeout: 0x1000,
    cache_load_timeout: 0x10_0000,
    crc_timeout: 0x1000,
    poll_interval: 0x10,
    env_monitoring: false,
};

impl Default for EfuseConfig {
    fn default() -> Self {
        DEFAULT_EFUSE_CONFIG
    }
}

impl EfuseConfig {
    pub const fn ctrl_reg(&self, offset: u32) -> u32 {
        self.ctrl_offset + offset
    }

    pub const fn cache_reg(&self, offset: u32) -> u32 {
        self.cache_offset + offset
    }
}
