// Licensed under the Apache-2.0 license

use core::hint::black_box;

use log::{debug, error};
use registers_efuse::EFUSE_BITS_PER_ROW;

use crate::ctrl::EfuseCtrl;
use crate::error::{EfuseError, EfuseResult, ErrorKind};
use crate::hal::RegisterBus;
use crate::layout::{FieldRange, FuseAddress, FuseField};

impl<B: RegisterBus> EfuseCtrl<B> {
    /// Programs every 1 bit of `words` into `field`.
    ///
    /// Bits are consumed LSB first and a new word starts every 32 bits,
    /// whatever the column window of the field. Zero bits are skipped, so the
    /// walk never clears a fuse. The first failing bit aborts the walk.
    pub fn write_field(&mut self, field: &FuseField, words: &[u32]) -> EfuseResult<()> {
        if !field.is_valid() || words.len() < field.word_count() {
            return Err(EfuseError::before_programming(ErrorKind::InvalidParameter));
        }
        debug!(
            "[mcu-efuse] Writing field page {:?} rows {}..{} cols {}..={}",
            field.page,
            field.start_row,
            field.end_row(),
            field.col_start,
            field.col_end
        );

        let mut word = 0;
        let mut bit = 0;
        let mut row = field.start_row;
        while row < field.end_row() {
            for col in field.col_start..=field.col_end {
                if bit == EFUSE_BITS_PER_ROW {
                    word += 1;
                    bit = 0;
                }
                if (words[word] >> bit) & 1 != 0 {
                    let addr = FuseAddress::new(field.page, row, col);
                    self.program_and_verify_bit(addr, field.skip_verify)?;
                }
                bit += 1;
            }
            row += 1;
        }

        check_row_cursor(black_box(row), field.end_row())
    }

    /// Writes each range of a multi-range value from its first word onwards.
    /// Every range is checked against `words` before the first pulse.
    pub fn write_ranges(&mut self, ranges: &[FieldRange], words: &[u32]) -> EfuseResult<()> {
        let fits = |range: &FieldRange| {
            range.field.is_valid()
                && words
                    .get(range.first_word..)
                    .is_some_and(|rest| rest.len() >= range.field.word_count())
        };
        if !ranges.iter().all(fits) {
            return Err(EfuseError::before_programming(ErrorKind::InvalidParameter));
        }
        for range in ranges {
            self.write_field(&range.field, &words[range.first_word..])?;
        }
        Ok(())
    }
}

/// The walk must leave the row cursor exactly one past the field. Anything
/// else means the loop was skipped or cut short.
fn check_row_cursor(row: u32, end_row: u32) -> EfuseResult<()> {
    if row != end_row {
        error!("[mcu-efuse] Field walk ended at row {}, expected {}", row, end_row);
        return Err(ErrorKind::GlitchDetected.into());
    }
    Ok(())
}
