// Licensed under the Apache-2.0 license

use log::info;
use registers_efuse::cache::{SecurityCtrl, SecurityMisc0};

use crate::crc::{compute_checksum, EFUSE_CRC_AES_ZEROS};
use crate::efuse::{protected, Efuse};
use crate::error::{EfuseError, EfuseResult, ErrorKind, FuseSlot};
use crate::guard::EnvironmentGuard;
use crate::hal::RegisterBus;
use crate::layout::{
    ctrl_row_cache_offset, AesKeyType, SECURITY_CTRL_ROW, SECURITY_MISC_0_ROW, UDS_CHECKSUM_CHECK,
    UDS_RANGES,
};
use crate::types::{AesKey, UdsSecret};

impl<B: RegisterBus, G: EnvironmentGuard> Efuse<B, G> {
    /// Programs a symmetric key without reading it back, then confirms it with
    /// the hardware checksum self-check.
    pub fn write_aes_key(&mut self, key_type: AesKeyType, key: &AesKey) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing {:?}", key_type);
        let slot = FuseSlot::AesKey(key_type);
        self.program(Ok(()), |ctrl, ()| {
            ctrl.write_ranges(key_type.ranges(), &key.0)?;
            ctrl.reload_cache()?;
            ctrl.check_checksum(&key_type.checksum_check(), compute_checksum(&key.0))
        })
        .map_err(|e| e.at(slot))
    }

    /// Programs the device root secret. Refused once UDS_WR_LK is set.
    pub fn write_uds(&mut self, uds: &UdsSecret) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing UDS");
        self.program(Ok(()), |ctrl, ()| {
            let sec_ctrl = ctrl.read_cache_word(ctrl_row_cache_offset(SECURITY_CTRL_ROW))?;
            if sec_ctrl & SecurityCtrl::UDS_WR_LK::SET.value != 0 {
                return Err(protected(FuseSlot::Uds));
            }
            ctrl.write_ranges(&UDS_RANGES, &uds.0)?;
            ctrl.reload_cache()?;
            ctrl.check_checksum(&UDS_CHECKSUM_CHECK, compute_checksum(&uds.0))
        })
        .map_err(|e| e.at(FuseSlot::Uds))
    }

    /// Restricts the primary AES key to decryption. The key must already be
    /// programmed.
    pub fn write_dec_only(&mut self) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing decrypt-only");
        let check = AesKeyType::AesKey.checksum_check();
        self.program(Ok(()), |ctrl, ()| {
            // a passing check against the all-zero checksum means a blank key
            match ctrl.check_checksum(&check, EFUSE_CRC_AES_ZEROS) {
                Ok(()) => {
                    return Err(EfuseError::before_programming(ErrorKind::KeyNotProgrammed))
                }
                Err(e) if e.kind == ErrorKind::ChecksumMismatch => {}
                Err(e) => return Err(e),
            }
            ctrl.write_masked_row(SECURITY_MISC_0_ROW, SecurityMisc0::DEC_ONLY::SET.value)
        })
        .map_err(|e| e.at(FuseSlot::DecOnly))
    }
}
