// Licensed under the Apache-2.0 license

use log::warn;
use registers_efuse::bits::{PgmAddr, RdAddr};
use registers_efuse::{masks, offsets};

use crate::ctrl::EfuseCtrl;
use crate::error::{EfuseResult, ErrorKind};
use crate::hal::{wait_for_events, RegisterBus};
use crate::layout::{FuseAddress, Page};

impl<B: RegisterBus> EfuseCtrl<B> {
    /// Issues one program pulse. Never retried.
    pub fn program_bit(&mut self, addr: FuseAddress) -> EfuseResult<()> {
        let pgm_addr = PgmAddr::PAGE.val(addr.page.index())
            + PgmAddr::ROW.val(addr.row)
            + PgmAddr::COLUMN.val(addr.col);
        self.write_ctrl(offsets::PGM_ADDR, pgm_addr.value);
        self.cache_stale = true;

        let isr = self.config.ctrl_reg(offsets::ISR);
        let events = wait_for_events(
            &mut self.bus,
            isr,
            masks::ISR_PGM_DONE | masks::ISR_PGM_ERROR,
            self.config.pgm_timeout,
            self.config.poll_interval,
        );
        self.bus.write(isr, masks::ISR_PGM_DONE | masks::ISR_PGM_ERROR);

        match events {
            Err(last) => {
                warn!("[mcu-efuse] Program timeout at {:?}, isr {:#x}", addr, last);
                Err(ErrorKind::ProgramTimeout.into())
            }
            Ok(events) if events & masks::ISR_PGM_ERROR != 0 => {
                warn!("[mcu-efuse] Program error at {:?}", addr);
                Err(ErrorKind::ProgramFailed.into())
            }
            Ok(_) => Ok(()),
        }
    }

    /// Reads one row of the array through the controller data path.
    pub fn read_row_data(&mut self, page: Page, row: u32) -> EfuseResult<u32> {
        let rd_addr = RdAddr::PAGE.val(page.index()) + RdAddr::ROW.val(row);
        self.write_ctrl(offsets::RD_ADDR, rd_addr.value);

        let isr = self.config.ctrl_reg(offsets::ISR);
        let done = wait_for_events(
            &mut self.bus,
            isr,
            masks::ISR_RD_DONE,
            self.config.rd_timeout,
            self.config.poll_interval,
        );
        let data = self.read_ctrl(offsets::RD_DATA);
        self.bus.write(isr, masks::ISR_RD_DONE);

        match done {
            Ok(_) => Ok(data),
            Err(_) => {
                warn!("[mcu-efuse] Read timeout at page {:?} row {}", page, row);
                Err(ErrorKind::ReadTimeout.into())
            }
        }
    }

    pub fn verify_bit(&mut self, addr: FuseAddress) -> EfuseResult<()> {
        let data = self.read_row_data(addr.page, addr.row)?;
        if data & (1 << addr.col) == 0 {
            warn!("[mcu-efuse] Verify mismatch at {:?}", addr);
            return Err(ErrorKind::VerifyMismatch.into());
        }
        Ok(())
    }

    pub fn program_and_verify_bit(&mut self, addr: FuseAddress, skip_verify: bool) -> EfuseResult<()> {
        self.program_bit(addr)?;
        if !skip_verify {
            self.verify_bit(addr)?;
        }
        Ok(())
    }
}
