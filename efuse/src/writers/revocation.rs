// Licensed under the Apache-2.0 license

use log::info;

use crate::efuse::{invalid, Efuse};
use crate::error::{EfuseResult, FuseSlot};
use crate::guard::EnvironmentGuard;
use crate::hal::RegisterBus;
use crate::layout::{
    offchip_revocation_id_address, revocation_id_address, MAX_OFFCHIP_REVOCATION_ID,
    MAX_REVOCATION_ID,
};

impl<B: RegisterBus, G: EnvironmentGuard> Efuse<B, G> {
    /// Revokes id `id` in 1..=256.
    pub fn write_revocation_id(&mut self, id: u32) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing revocation id {}", id);
        let addr = if (1..=MAX_REVOCATION_ID).contains(&id) {
            Ok(revocation_id_address(id))
        } else {
            Err(invalid(FuseSlot::RevocationId))
        };
        self.program(addr, |ctrl, addr| ctrl.program_bit_once(addr))
            .map_err(|e| e.at(FuseSlot::RevocationId))
    }

    /// Revokes off-chip id `id` in 1..=256.
    pub fn write_offchip_revocation_id(&mut self, id: u32) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing off-chip revocation id {}", id);
        let addr = if (1..=MAX_OFFCHIP_REVOCATION_ID).contains(&id) {
            Ok(offchip_revocation_id_address(id))
        } else {
            Err(invalid(FuseSlot::OffChipRevocationId))
        };
        self.program(addr, |ctrl, addr| ctrl.program_bit_once(addr))
            .map_err(|e| e.at(FuseSlot::OffChipRevocationId))
    }
}
