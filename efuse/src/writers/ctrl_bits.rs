// Licensed under the Apache-2.0 license

//! Packed control-bit groups. Every group is masked against its cached row
//! first, so bits that are already set are never pulsed again.

use log::info;
use registers_efuse::cache::{
    AnlgTrim3, BootEnvCtrl, BootModeDis, MiscCtrl, SecurityCtrl, SecurityMisc1,
};
use tock_registers::fields::FieldValue;

use crate::efuse::{invalid, Efuse};
use crate::error::{EfuseResult, FuseSlot};
use crate::guard::EnvironmentGuard;
use crate::hal::RegisterBus;
use crate::layout::{
    ANLG_TRIM_3_ROW, BOOT_ENV_CTRL_ROW, BOOT_MODE_DIS_ROW, MISC_CTRL_ROW, PLM_UPDATE_DIS,
    SECURITY_CTRL_ROW, SECURITY_MISC_1_ROW,
};

impl<B: RegisterBus, G: EnvironmentGuard> Efuse<B, G> {
    fn write_ctrl_row(&mut self, row: u32, requested: u32, slot: FuseSlot) -> EfuseResult<()> {
        self.program(Ok(()), |ctrl, ()| ctrl.write_masked_row(row, requested))
            .map_err(|e| e.at(slot))
    }

    pub fn write_misc_ctrl_bits(&mut self, bits: FieldValue<u32, MiscCtrl::Register>) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing misc ctrl bits {:#x}", bits.value);
        self.write_ctrl_row(MISC_CTRL_ROW, bits.value, FuseSlot::MiscCtrl)
    }

    pub fn write_sec_ctrl_bits(
        &mut self,
        bits: FieldValue<u32, SecurityCtrl::Register>,
    ) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing security ctrl bits {:#x}", bits.value);
        self.write_ctrl_row(SECURITY_CTRL_ROW, bits.value, FuseSlot::SecCtrl)
    }

    pub fn write_sec_misc1_bits(
        &mut self,
        bits: FieldValue<u32, SecurityMisc1::Register>,
    ) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing security misc1 bits {:#x}", bits.value);
        self.write_ctrl_row(SECURITY_MISC_1_ROW, bits.value, FuseSlot::SecMisc1)
    }

    pub fn write_boot_env_ctrl_bits(
        &mut self,
        bits: FieldValue<u32, BootEnvCtrl::Register>,
    ) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing boot env ctrl bits {:#x}", bits.value);
        self.write_ctrl_row(BOOT_ENV_CTRL_ROW, bits.value, FuseSlot::BootEnvCtrl)
    }

    /// Programs the glitch detector configuration, then its write lock if
    /// requested.
    pub fn write_glitch_config(&mut self, bits: FieldValue<u32, AnlgTrim3::Register>) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing glitch config {:#x}", bits.value);
        let config = bits.value & AnlgTrim3::GLITCH_DET_CONFIG::SET.value;
        let write_lock = bits.value & AnlgTrim3::GLITCH_DET_WR_LK::SET.value;
        self.program(Ok(()), |ctrl, ()| {
            ctrl.write_masked_row(ANLG_TRIM_3_ROW, config)
                .map_err(|e| e.at(FuseSlot::GlitchConfig))?;
            ctrl.write_masked_row(ANLG_TRIM_3_ROW, write_lock)
                .map_err(|e| e.at(FuseSlot::GlitchWriteLock))
        })
    }

    /// Disables the boot modes in `mask` (bits 15:0).
    pub fn write_boot_mode_disable(&mut self, mask: u32) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing boot mode disable {:#x}", mask);
        let field = BootModeDis::BOOT_MODE_DIS;
        let requested = if mask & !field.mask == 0 {
            Ok(field.val(mask).value)
        } else {
            Err(invalid(FuseSlot::BootModeDisable))
        };
        self.program(requested, |ctrl, requested| {
            ctrl.write_masked_row(BOOT_MODE_DIS_ROW, requested)
        })
        .map_err(|e| e.at(FuseSlot::BootModeDisable))
    }

    pub fn write_disable_plm_update(&mut self) -> EfuseResult<()> {
        info!("[mcu-efuse] Disabling in-place PLM update");
        self.program(Ok(()), |ctrl, ()| ctrl.program_bit_once(PLM_UPDATE_DIS))
            .map_err(|e| e.at(FuseSlot::PlmUpdate))
    }
}
