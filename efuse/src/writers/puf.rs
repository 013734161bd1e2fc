// Licensed under the Apache-2.0 license

use log::{info, warn};
use registers_efuse::cache::PufEccCtrl;

use crate::ctrl::EfuseCtrl;
use crate::efuse::{protected, Efuse};
use crate::error::{EfuseError, EfuseResult, ErrorKind, FuseSlot};
use crate::guard::EnvironmentGuard;
use crate::hal::RegisterBus;
use crate::layout::{
    ctrl_row_cache_offset, FuseAddress, FuseField, Page, PUF_CHASH_ROW, PUF_ECC_CTRL_ROW,
    PUF_RO_SWAP_ROW, PUF_SEC_CTRL_COLS, PUF_SYN_DATA_FIELDS, PUF_SYN_DATA_NUM_WORDS,
};
use crate::types::PufHelperData;

fn already_programmed(slot: FuseSlot) -> EfuseError {
    EfuseError::before_programming(ErrorKind::AlreadyProgrammed).at(slot)
}

/// Fails unless the chash, aux and syndrome regions are still blank.
fn check_puf_regions_empty<B: RegisterBus>(ctrl: &mut EfuseCtrl<B>, ecc_ctrl: u32) -> EfuseResult<()> {
    if ctrl.read_cache_word(ctrl_row_cache_offset(PUF_CHASH_ROW))? != 0 {
        warn!("[mcu-efuse] PUF chash already programmed");
        return Err(already_programmed(FuseSlot::PufChash));
    }
    if ecc_ctrl & PufEccCtrl::ECC_23_0::SET.value != 0 {
        warn!("[mcu-efuse] PUF aux already programmed");
        return Err(already_programmed(FuseSlot::PufAux));
    }
    let mut syn_data = [0u32; PUF_SYN_DATA_NUM_WORDS];
    ctrl.read_cache_range(PUF_SYN_DATA_FIELDS[0].field.cache_offset(), &mut syn_data)?;
    if syn_data.iter().any(|word| *word != 0) {
        warn!("[mcu-efuse] PUF syndrome data already programmed");
        return Err(already_programmed(FuseSlot::PufSynData));
    }
    Ok(())
}

impl<B: RegisterBus, G: EnvironmentGuard> Efuse<B, G> {
    /// Programs PUF helper data and the PUF security-control bits.
    ///
    /// Refused when the PUF is disabled or its syndrome is locked. Helper data
    /// may only be written into blank regions.
    pub fn write_puf_helper_data(&mut self, data: &PufHelperData) -> EfuseResult<()> {
        info!("[mcu-efuse] Writing PUF helper data");
        self.program(Ok(()), |ctrl, ()| {
            let ecc_ctrl = ctrl.read_cache_word(ctrl_row_cache_offset(PUF_ECC_CTRL_ROW))?;
            let locked = PufEccCtrl::PUF_DIS::SET.value | PufEccCtrl::SYN_LK::SET.value;
            if ecc_ctrl & locked != 0 {
                return Err(protected(FuseSlot::PufSynData));
            }

            if data.program_helper_data {
                check_puf_regions_empty(ctrl, ecc_ctrl)?;
                ctrl.write_ranges(&PUF_SYN_DATA_FIELDS, &data.syn_data)
                    .map_err(|e| e.at(FuseSlot::PufSynData))?;
                ctrl.write_field(&FuseField::rows(Page::Page0, PUF_CHASH_ROW, 1), &[data.chash])
                    .map_err(|e| e.at(FuseSlot::PufChash))?;
                let aux = data.aux & PufEccCtrl::ECC_23_0::SET.value;
                ctrl.write_field(&FuseField::rows(Page::Page0, PUF_ECC_CTRL_ROW, 1), &[aux])
                    .map_err(|e| e.at(FuseSlot::PufAux))?;
                ctrl.write_field(&FuseField::rows(Page::Page0, PUF_RO_SWAP_ROW, 1), &[data.ro_swap])
                    .map_err(|e| e.at(FuseSlot::PufRoSwap))?;
            }

            for (enabled, col) in data.sec_ctrl.as_array().iter().zip(PUF_SEC_CTRL_COLS) {
                if *enabled {
                    ctrl.program_bit_once(FuseAddress::new(Page::Page0, PUF_ECC_CTRL_ROW, col))
                        .map_err(|e| e.at(FuseSlot::PufSecCtrl))?;
                }
            }
            Ok(())
        })
    }
}
