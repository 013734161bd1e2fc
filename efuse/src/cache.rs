// Licensed under the Apache-2.0 license

use log::{error, info};
use registers_efuse::bits::CacheLoad;
use registers_efuse::{masks, offsets};

use crate::ctrl::EfuseCtrl;
use crate::error::{EfuseError, EfuseResult, ErrorKind};
use crate::hal::{wait_for_events, RegisterBus};

impl<B: RegisterBus> EfuseCtrl<B> {
    /// Reloads the read cache from the array.
    pub fn reload_cache(&mut self) -> EfuseResult<()> {
        info!("[mcu-efuse] Reloading cache");
        self.write_ctrl(offsets::CACHE_LOAD, CacheLoad::LOAD::SET.value);
        let status = self.config.ctrl_reg(offsets::STATUS);
        if wait_for_events(
            &mut self.bus,
            status,
            masks::STATUS_CACHE_DONE,
            self.config.cache_load_timeout,
            self.config.poll_interval,
        )
        .is_err()
        {
            error!("[mcu-efuse] Cache reload timed out");
            return Err(ErrorKind::CacheLoadTimeout.into());
        }
        if self.read_ctrl(offsets::ISR) & masks::ISR_CACHE_ERROR != 0 {
            error!("[mcu-efuse] Cache reload reported an error");
            return Err(ErrorKind::CacheParityError.into());
        }
        self.cache_stale = false;
        Ok(())
    }

    /// Copies cached words starting at byte `offset` of the cache.
    pub fn read_cache_range(&mut self, offset: u32, dest: &mut [u32]) -> EfuseResult<()> {
        if offset % 4 != 0 {
            return Err(EfuseError::before_programming(ErrorKind::InvalidParameter));
        }
        self.check_cache_parity()?;
        let addr = self.config.cache_reg(offset);
        self.bus.read_range(addr, dest);
        Ok(())
    }

    pub fn read_cache_word(&mut self, offset: u32) -> EfuseResult<u32> {
        let mut word = [0u32; 1];
        self.read_cache_range(offset, &mut word)?;
        Ok(word[0])
    }
}
