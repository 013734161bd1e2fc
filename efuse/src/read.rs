// Licensed under the Apache-2.0 license

use registers_efuse::cache::{MiscCtrl, SecurityCtrl};
use registers_efuse::EFUSE_ROWS_PER_PAGE;
use tock_registers::LocalRegisterCopy;

use crate::efuse::{invalid, Efuse};
use crate::error::{EfuseError, EfuseResult, ErrorKind, FuseSlot};
use crate::guard::EnvironmentGuard;
use crate::hal::RegisterBus;
use crate::layout::{
    cache_offset, ctrl_row_cache_offset, revocation_id_address, IvType, Page, PpkType,
    MAX_REVOCATION_ID, MISC_CTRL_ROW, SECURITY_CTRL_ROW,
};
use crate::types::{Iv, PpkHash};

impl<B: RegisterBus, G: EnvironmentGuard> Efuse<B, G> {
    /// Reads one row straight from the array in a read-mode session.
    pub fn read_row(&mut self, page: Page, row: u32) -> EfuseResult<u32> {
        let row = if row < EFUSE_ROWS_PER_PAGE {
            Ok(row)
        } else {
            Err(EfuseError::before_programming(ErrorKind::InvalidParameter))
        };
        self.read(row, |ctrl, row| ctrl.read_row_data(page, row))
    }

    pub fn read_cache_range(&mut self, offset: u32, dest: &mut [u32]) -> EfuseResult<()> {
        self.ctrl.read_cache_range(offset, dest)
    }

    pub fn reload_cache(&mut self) -> EfuseResult<()> {
        self.ctrl.reload_cache()
    }

    pub fn read_iv(&mut self, iv_type: IvType) -> EfuseResult<Iv> {
        let mut iv = Iv::default();
        self.ctrl.read_cache_range(iv_type.field().cache_offset(), &mut iv.0)?;
        Ok(iv)
    }

    pub fn read_ppk_hash(&mut self, ppk: PpkType) -> EfuseResult<PpkHash> {
        let mut hash = PpkHash::default();
        self.ctrl.read_cache_range(ppk.field().cache_offset(), &mut hash.0)?;
        Ok(hash)
    }

    pub fn read_sec_ctrl_bits(&mut self) -> EfuseResult<LocalRegisterCopy<u32, SecurityCtrl::Register>> {
        let word = self.ctrl.read_cache_word(ctrl_row_cache_offset(SECURITY_CTRL_ROW))?;
        Ok(LocalRegisterCopy::new(word))
    }

    pub fn read_misc_ctrl_bits(&mut self) -> EfuseResult<LocalRegisterCopy<u32, MiscCtrl::Register>> {
        let word = self.ctrl.read_cache_word(ctrl_row_cache_offset(MISC_CTRL_ROW))?;
        Ok(LocalRegisterCopy::new(word))
    }

    pub fn is_revocation_id_revoked(&mut self, id: u32) -> EfuseResult<bool> {
        if !(1..=MAX_REVOCATION_ID).contains(&id) {
            return Err(invalid(FuseSlot::RevocationId));
        }
        let addr = revocation_id_address(id);
        let word = self.ctrl.read_cache_word(cache_offset(addr.page, addr.row))?;
        Ok(word & (1 << addr.col) != 0)
    }
}
