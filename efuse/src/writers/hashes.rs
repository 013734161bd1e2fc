// Licensed under the Apache-2.0 license

use log::info;

use crate::efuse::Efuse;
use crate::error::{EfuseResult, FuseSlot};
use crate::guard::EnvironmentGuard;
use crate::hal::RegisterBus;
use crate::layout::{IvType, PpkType, IV_NUM_WORDS};
use crate::types::{Iv, PpkHash};

impl<B: RegisterBus, G: EnvironmentGuard> Efuse<B, G> {
    pub fn write_ppk_hash(&mut self, ppk: PpkType, hash: &PpkHash) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing {:?} hash", ppk);
        self.program(Ok(()), |ctrl, ()| ctrl.write_field(&ppk.field(), &hash.0))
            .map_err(|e| e.at(FuseSlot::PpkHash(ppk)))
    }

    /// Programs the IV bits that are not set yet. Bits already set are kept,
    /// so re-writing a programmed IV issues no program pulses.
    pub fn write_iv(&mut self, iv_type: IvType, iv: &Iv) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing {:?} IV", iv_type);
        let field = iv_type.field();
        self.program(Ok(()), |ctrl, ()| {
            let start = field.cache_offset();
            let end = start + (IV_NUM_WORDS as u32 - 1) * 4;
            let mut bits = [0u32; IV_NUM_WORDS];
            ctrl.compute_programmable_bits(&iv.0, start, end, &mut bits)?;
            ctrl.write_field(&field, &bits)
        })
        .map_err(|e| e.at(FuseSlot::Iv(iv_type)))
    }
}
