// Licensed under the Apache-2.0 license

use log::error;
use registers_efuse::{masks, offsets};

use crate::ctrl::EfuseCtrl;
use crate::error::{EfuseError, EfuseResult, ErrorKind};
use crate::hal::RegisterBus;

/// Bits of `requested` that are still 0 in `cached`.
pub const fn programmable_mask(requested: u32, cached: u32) -> u32 {
    requested & !cached
}

impl<B: RegisterBus> EfuseCtrl<B> {
    /// Fails if the controller flagged the read cache as corrupt.
    pub fn check_cache_parity(&mut self) -> EfuseResult<()> {
        if self.read_ctrl(offsets::ISR) & masks::ISR_CACHE_ERROR != 0 {
            error!("[mcu-efuse] Cache parity error");
            return Err(EfuseError::before_programming(ErrorKind::CacheParityError));
        }
        Ok(())
    }

    /// Masks `requested` against the cache words at `start..=end` (byte
    /// offsets, 4-byte steps) and stores the bits still to program in `out`.
    /// A cache left stale by earlier pulses is reloaded first.
    pub fn compute_programmable_bits(
        &mut self,
        requested: &[u32],
        start: u32,
        end: u32,
        out: &mut [u32],
    ) -> EfuseResult<()> {
        if self.cache_stale {
            self.reload_cache()
                .map_err(|err| EfuseError::before_programming(err.kind))?;
        }
        self.check_cache_parity()?;
        if start % 4 != 0 || end < start {
            return Err(EfuseError::before_programming(ErrorKind::InvalidParameter));
        }
        let count = ((end - start) / 4 + 1) as usize;
        if requested.len() < count || out.len() < count {
            return Err(EfuseError::before_programming(ErrorKind::InvalidParameter));
        }
        for (i, offset) in (start..=end).step_by(4).enumerate() {
            let cached = self.bus.read(self.config.cache_reg(offset));
            out[i] = programmable_mask(requested[i], cached);
        }
        Ok(())
    }

    /// Single-word form of [`Self::compute_programmable_bits`].
    pub fn programmable_word(&mut self, requested: u32, offset: u32) -> EfuseResult<u32> {
        let mut out = [0u32; 1];
        self.compute_programmable_bits(&[requested], offset, offset, &mut out)?;
        Ok(out[0])
    }
}
