// Licensed under the Apache-2.0 license

use log::{debug, error};
use registers_efuse::bits::{Cfg, WrLock};
use registers_efuse::{offsets, WR_LOCK_VALUE, WR_UNLOCK_PASSCODE};
use tock_registers::fields::FieldValue;

use crate::ctrl::{ControllerMode, EfuseCtrl, MarginRead};
use crate::error::{EfuseError, EfuseResult, ErrorKind};
use crate::hal::RegisterBus;

impl MarginRead {
    fn cfg(self) -> FieldValue<u32, Cfg::Register> {
        match self {
            MarginRead::Normal => Cfg::MARGIN_RD::Normal,
            MarginRead::Margin => Cfg::MARGIN_RD::Margin,
        }
    }
}

impl<B: RegisterBus> EfuseCtrl<B> {
    /// Unlocks the controller and selects `mode` with the given read margin.
    pub fn setup(&mut self, mode: ControllerMode, margin: MarginRead) -> EfuseResult<()> {
        if self.mode != ControllerMode::Locked {
            error!("[mcu-efuse] Setup while a session is active: {:?}", self.mode);
            return Err(EfuseError::before_programming(ErrorKind::InvalidParameter));
        }
        let pgm_en = match mode {
            ControllerMode::Program => Cfg::PGM_EN::SET,
            ControllerMode::Read => Cfg::PGM_EN::CLEAR,
            ControllerMode::Locked => {
                return Err(EfuseError::before_programming(ErrorKind::InvalidParameter))
            }
        };

        self.unlock()?;
        self.mode = mode;
        self.write_cfg(pgm_en + margin.cfg(), ErrorKind::ReadModeMismatch)?;
        debug!("[mcu-efuse] Controller in {:?} mode, margin {:?}", mode, margin);
        Ok(())
    }

    /// Resets the read mode, disables programming and re-locks.
    ///
    /// Every step runs even if an earlier one failed; the first failure is
    /// returned.
    pub fn close(&mut self) -> EfuseResult<()> {
        let read_mode = self.write_cfg(MarginRead::Normal.cfg(), ErrorKind::ReadModeMismatch);
        let disable = self.write_cfg(Cfg::PGM_EN::CLEAR, ErrorKind::ProgramDisable);
        let lock = self.lock();
        self.mode = ControllerMode::Locked;
        read_mode.and(disable).and(lock)
    }

    fn unlock(&mut self) -> EfuseResult<()> {
        self.write_ctrl(offsets::WR_LOCK, WR_UNLOCK_PASSCODE);
        if self.read_ctrl(offsets::WR_LOCK) & WrLock::LOCKED::SET.value != 0 {
            error!("[mcu-efuse] Controller failed to unlock");
            return Err(EfuseError::before_programming(ErrorKind::ControllerUnlock));
        }
        Ok(())
    }

    fn lock(&mut self) -> EfuseResult<()> {
        self.write_ctrl(offsets::WR_LOCK, WR_LOCK_VALUE);
        if self.read_ctrl(offsets::WR_LOCK) & WrLock::LOCKED::SET.value == 0 {
            error!("[mcu-efuse] Controller failed to lock");
            return Err(ErrorKind::ControllerLock.into());
        }
        Ok(())
    }

    /// Applies `value` to CFG and confirms it by reading the register back.
    fn write_cfg(&mut self, value: FieldValue<u32, Cfg::Register>, kind: ErrorKind) -> EfuseResult<()> {
        let addr = self.config.ctrl_reg(offsets::CFG);
        self.bus.modify(addr, value.mask(), value.value);
        if self.bus.read(addr) & value.mask() != value.value {
            error!("[mcu-efuse] CFG readback mismatch: {}", kind);
            return Err(kind.into());
        }
        Ok(())
    }
}
