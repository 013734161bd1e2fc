// Licensed under the Apache-2.0 license

use log::info;
use registers_efuse::cache::DmeFips;

use crate::efuse::{invalid, protected, Efuse};
use crate::error::{EfuseResult, FuseSlot};
use crate::guard::EnvironmentGuard;
use crate::hal::RegisterBus;
use crate::layout::{
    ctrl_row_cache_offset, dme_revoke_addresses, dme_user_key_field, FuseAddress, Page,
    DME_FIPS_ROW, DME_KEY_SLOTS, FIPS_VERSION_COLS, IP_DISABLE_0_ROW,
};
use crate::types::DmeKey;

const MAX_FIPS_VERSION: u32 = 7;

impl<B: RegisterBus, G: EnvironmentGuard> Efuse<B, G> {
    /// Programs device-management key `slot`. Refused once DME mode is set.
    pub fn write_dme_user_key(&mut self, slot: u8, key: &DmeKey) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing DME user key {}", slot);
        let fuse_slot = FuseSlot::DmeUserKey(slot);
        let field = if slot < DME_KEY_SLOTS {
            Ok(dme_user_key_field(slot))
        } else {
            Err(invalid(fuse_slot))
        };
        self.program(field, |ctrl, field| {
            let dme_fips = ctrl.read_cache_word(ctrl_row_cache_offset(DME_FIPS_ROW))?;
            if dme_fips & DmeFips::DME_MODE::SET.value != 0 {
                return Err(protected(fuse_slot));
            }
            ctrl.write_field(&field, &key.0)
        })
        .map_err(|e| e.at(fuse_slot))
    }

    /// Programs both revocation bits of device-management key `slot`.
    pub fn write_dme_revoke(&mut self, slot: u8) -> EfuseResult<()> {
        info!("[mcu-efuse] Revoking DME key {}", slot);
        let fuse_slot = FuseSlot::DmeRevoke(slot);
        let addresses = if slot < DME_KEY_SLOTS {
            Ok(dme_revoke_addresses(slot))
        } else {
            Err(invalid(fuse_slot))
        };
        self.program(addresses, |ctrl, addresses| {
            addresses
                .iter()
                .try_for_each(|addr| ctrl.program_bit_once(*addr))
        })
        .map_err(|e| e.at(fuse_slot))
    }

    /// Sets DME mode bits (3:0).
    pub fn write_dme_mode(&mut self, mode: u32) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing DME mode {:#x}", mode);
        let requested = if mode & !DmeFips::DME_MODE.mask == 0 {
            Ok(DmeFips::DME_MODE.val(mode).value)
        } else {
            Err(invalid(FuseSlot::DmeMode))
        };
        self.program(requested, |ctrl, requested| {
            ctrl.write_masked_row(DME_FIPS_ROW, requested)
        })
        .map_err(|e| e.at(FuseSlot::DmeMode))
    }

    /// Programs the FIPS mode byte and the 3-bit FIPS version.
    pub fn write_fips_info(&mut self, mode: u32, version: u32) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing FIPS mode {:#x} version {}", mode, version);
        let input = if mode & !DmeFips::FIPS_MODE.mask != 0 {
            Err(invalid(FuseSlot::FipsMode))
        } else if version > MAX_FIPS_VERSION {
            Err(invalid(FuseSlot::FipsVersion))
        } else {
            Ok(DmeFips::FIPS_MODE.val(mode).value)
        };
        self.program(input, |ctrl, mode_bits| {
            ctrl.write_masked_row(DME_FIPS_ROW, mode_bits)
                .map_err(|e| e.at(FuseSlot::FipsMode))?;
            for (bit, col) in FIPS_VERSION_COLS.iter().enumerate() {
                if version & (1 << bit) != 0 {
                    ctrl.program_bit_once(FuseAddress::new(Page::Page0, IP_DISABLE_0_ROW, *col))
                        .map_err(|e| e.at(FuseSlot::FipsVersion))?;
                }
            }
            Ok(())
        })
    }
}
