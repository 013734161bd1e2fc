// Licensed under the Apache-2.0 license

//! Bit-serial checksum matching the controller's self-check engine.

use log::{debug, error};
use registers_efuse::offsets;

use crate::ctrl::EfuseCtrl;
use crate::error::{EfuseResult, ErrorKind};
use crate::hal::{poll, RegisterBus};
use crate::layout::ChecksumCheck;

/// Reflected CRC-32C polynomial.
pub const EFUSE_CRC_POLYNOMIAL: u32 = 0x82F6_3B78;

/// Checksum of an all-zero 256-bit key.
pub const EFUSE_CRC_AES_ZEROS: u32 = 0x6858_A3D5;

/// Bits of the remaining word count mixed in after each word.
const ROW_INDEX_BITS: u32 = 5;

fn shift_bits(mut crc: u32, mut value: u32, bits: u32) -> u32 {
    for _ in 0..bits {
        crc = if (value ^ crc) & 1 != 0 {
            (crc >> 1) ^ EFUSE_CRC_POLYNOMIAL
        } else {
            crc >> 1
        };
        value >>= 1;
    }
    crc
}

/// Computes the checksum of `words`, last word first, each followed by the
/// low 5 bits of the number of words still to process.
pub fn compute_checksum(words: &[u32]) -> u32 {
    let len = words.len();
    words.iter().rev().enumerate().fold(0, |crc, (idx, &word)| {
        let crc = shift_bits(crc, word, u32::BITS);
        shift_bits(crc, (len - idx) as u32, ROW_INDEX_BITS)
    })
}

impl<B: RegisterBus> EfuseCtrl<B> {
    /// Hands `expected` to the self-check engine and waits for its verdict.
    pub fn check_against_hardware(
        &mut self,
        reg: u32,
        done: u32,
        pass: u32,
        expected: u32,
    ) -> EfuseResult<()> {
        self.write_ctrl(reg, expected);
        let status = self.config.ctrl_reg(offsets::STATUS);
        let status = poll(
            &mut self.bus,
            status,
            |value| value & done != 0,
            self.config.crc_timeout,
            self.config.poll_interval,
        )
        .map_err(|_| {
            error!("[mcu-efuse] Checksum check timed out");
            ErrorKind::ChecksumTimeout
        })?;
        if status & pass == 0 {
            error!("[mcu-efuse] Checksum mismatch");
            return Err(ErrorKind::ChecksumMismatch.into());
        }
        debug!("[mcu-efuse] Checksum check passed");
        Ok(())
    }

    pub fn check_checksum(&mut self, check: &ChecksumCheck, expected: u32) -> EfuseResult<()> {
        self.check_against_hardware(check.reg, check.done, check.pass, expected)
    }
}
