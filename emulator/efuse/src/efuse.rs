/*++

Licensed under the Apache-2.0 license.

File Name:

    efuse.rs

Abstract:

    File contains the eFuse controller model: the fuse array, its read cache,
    the program/read state machines and the checksum self-check engine.

--*/

use log::trace;
use mcu_efuse::crc::compute_checksum;
use mcu_efuse::layout::{
    is_secret_row, AesKeyType, FieldRange, AES_KEY_NUM_WORDS, UDS_NUM_WORDS, UDS_RANGES,
};
use mcu_efuse::{EfuseConfig, FuseAddress, FuseField, Page, RegisterBus, DEFAULT_EFUSE_CONFIG};
use registers_efuse::bits::{Cfg, PgmAddr, RdAddr};
use registers_efuse::{
    masks, offsets, EFUSE_BITS_PER_ROW, EFUSE_CACHE_PAGE_SIZE, EFUSE_PAGE_COUNT,
    EFUSE_ROWS_PER_PAGE, WR_UNLOCK_PASSCODE,
};
use tock_registers::LocalRegisterCopy;

const ROWS: usize = EFUSE_ROWS_PER_PAGE as usize;
const PAGES: usize = EFUSE_PAGE_COUNT as usize;
/// Pages 0 and 1 are cached.
const CACHE_WORDS: usize = 2 * ROWS;

/// Faults the model can be told to inject.
#[derive(Debug, Default, Clone)]
pub struct EfuseFaults {
    /// Program pulses never complete.
    pub hang_program: bool,
    /// Program pulses complete with PGM_ERROR.
    pub program_error: bool,
    /// Row reads never complete.
    pub hang_read: bool,
    pub hang_cache_load: bool,
    pub hang_checksum: bool,
    /// CACHE_ERROR stays asserted in ISR.
    pub cache_parity: bool,
    pub refuse_unlock: bool,
    pub refuse_lock: bool,
    /// Bits that report a successful pulse but never blow.
    pub stuck_bits: Vec<FuseAddress>,
}

/// eFuse controller model
pub struct EfuseModel {
    ctrl_base: u32,
    cache_base: u32,
    array: [[u32; ROWS]; PAGES],
    cache: Vec<u32>,
    locked: bool,
    cfg: u32,
    status: u32,
    isr: u32,
    rd_data: u32,
    faults: EfuseFaults,
    pulses: Vec<FuseAddress>,
    writes: Vec<(u32, u32)>,
}

impl EfuseModel {
    /// Create a blank, locked controller at the default addresses.
    pub fn new() -> Self {
        Self::with_config(&DEFAULT_EFUSE_CONFIG)
    }

    pub fn with_config(config: &EfuseConfig) -> Self {
        Self {
            ctrl_base: config.ctrl_offset,
            cache_base: config.cache_offset,
            array: [[0; ROWS]; PAGES],
            cache: vec![0; CACHE_WORDS],
            locked: true,
            cfg: 0,
            status: 0,
            isr: 0,
            rd_data: 0,
            faults: EfuseFaults::default(),
            pulses: vec![],
            writes: vec![],
        }
    }

    pub fn faults_mut(&mut self) -> &mut EfuseFaults {
        &mut self.faults
    }

    /// Blows `value` into a row as if it had been programmed in an earlier
    /// boot, then refreshes the cache.
    pub fn preset_row(&mut self, page: Page, row: u32, value: u32) {
        self.array[page.index() as usize][row as usize] |= value;
        self.load_cache();
    }

    pub fn preset_bit(&mut self, addr: FuseAddress) {
        self.preset_row(addr.page, addr.row, 1 << addr.col);
    }

    /// Blows `words` into `field` using the writer's bit order.
    pub fn preset_field(&mut self, field: &FuseField, words: &[u32]) {
        for (addr, word, bit) in field_bits(field) {
            if (words[word] >> bit) & 1 != 0 {
                self.array[addr.page.index() as usize][addr.row as usize] |= 1 << addr.col;
            }
        }
        self.load_cache();
    }

    pub fn row(&self, page: Page, row: u32) -> u32 {
        self.array[page.index() as usize][row as usize]
    }

    pub fn bit(&self, addr: FuseAddress) -> bool {
        self.row(addr.page, addr.row) & (1 << addr.col) != 0
    }

    /// Value held by `field`, gathered in the writer's bit order.
    pub fn field_value(&self, field: &FuseField) -> Vec<u32> {
        let mut words = vec![0; field.word_count()];
        for (addr, word, bit) in field_bits(field) {
            if self.bit(addr) {
                words[word] |= 1 << bit;
            }
        }
        words
    }

    /// Cached word at byte `offset` of the cache window.
    pub fn cache_word(&self, offset: u32) -> u32 {
        self.cache.get((offset / 4) as usize).copied().unwrap_or(0)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn cfg(&self) -> u32 {
        self.cfg
    }

    /// Every program pulse accepted by the controller.
    pub fn pulses(&self) -> &[FuseAddress] {
        &self.pulses
    }

    /// Values written to the controller register at `offset`.
    pub fn writes_to(&self, offset: u32) -> Vec<u32> {
        let addr = self.ctrl_base + offset;
        self.writes
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn clear_journal(&mut self) {
        self.pulses.clear();
        self.writes.clear();
    }

    fn load_cache(&mut self) {
        for page in [Page::Page0, Page::Page1] {
            for row in 0..EFUSE_ROWS_PER_PAGE {
                let index = ((page.index() * EFUSE_CACHE_PAGE_SIZE) / 4 + row) as usize;
                self.cache[index] = if is_secret_row(page, row) {
                    0
                } else {
                    self.array[page.index() as usize][row as usize]
                };
            }
        }
    }

    fn program(&mut self, value: u32) {
        let reg = LocalRegisterCopy::<u32, PgmAddr::Register>::new(value);
        let Some(page) = Page::from_index(reg.read(PgmAddr::PAGE)) else {
            self.isr |= masks::ISR_PGM_ERROR | masks::ISR_PGM_DONE;
            return;
        };
        let addr = FuseAddress::new(page, reg.read(PgmAddr::ROW), reg.read(PgmAddr::COLUMN));
        let cfg = LocalRegisterCopy::<u32, Cfg::Register>::new(self.cfg);
        if self.locked || !cfg.is_set(Cfg::PGM_EN) {
            trace!("[efuse-model] Rejected pulse at {:?}", addr);
            self.isr |= masks::ISR_PGM_ERROR | masks::ISR_PGM_DONE;
            return;
        }
        self.pulses.push(addr);
        if self.faults.hang_program {
            return;
        }
        if self.faults.program_error {
            self.isr |= masks::ISR_PGM_ERROR | masks::ISR_PGM_DONE;
            return;
        }
        if !self.faults.stuck_bits.contains(&addr) {
            self.array[page.index() as usize][addr.row as usize] |= 1 << addr.col;
        }
        self.isr |= masks::ISR_PGM_DONE;
    }

    fn read_row(&mut self, value: u32) {
        if self.faults.hang_read {
            return;
        }
        let reg = LocalRegisterCopy::<u32, RdAddr::Register>::new(value);
        let page = reg.read(RdAddr::PAGE) as usize;
        let row = reg.read(RdAddr::ROW) as usize;
        self.rd_data = self
            .array
            .get(page)
            .and_then(|rows| rows.get(row))
            .copied()
            .unwrap_or(0);
        self.isr |= masks::ISR_RD_DONE;
    }

    fn checksum_check(
        &mut self,
        ranges: &[FieldRange],
        words: usize,
        done: u32,
        pass: u32,
        expected: u32,
    ) {
        self.status &= !(done | pass);
        if self.faults.hang_checksum {
            return;
        }
        let mut value = vec![0u32; words];
        for range in ranges {
            let part = self.field_value(&range.field);
            value[range.first_word..range.first_word + part.len()].copy_from_slice(&part);
        }
        self.status |= done;
        if compute_checksum(&value) == expected {
            self.status |= pass;
        }
    }

    fn write_ctrl(&mut self, offset: u32, value: u32) {
        match offset {
            offsets::WR_LOCK => {
                if value == WR_UNLOCK_PASSCODE {
                    self.locked = self.faults.refuse_unlock;
                } else if !self.faults.refuse_lock {
                    self.locked = true;
                }
            }
            offsets::CFG if !self.locked => self.cfg = value,
            offsets::PGM_ADDR => self.program(value),
            offsets::RD_ADDR => self.read_row(value),
            offsets::ISR => self.isr &= !value,
            offsets::CACHE_LOAD if value & 1 != 0 => {
                self.status &= !masks::STATUS_CACHE_DONE;
                if !self.faults.hang_cache_load {
                    self.load_cache();
                    self.status |= masks::STATUS_CACHE_DONE;
                }
            }
            offsets::AES_CRC | offsets::AES_USR_KEY0_CRC | offsets::AES_USR_KEY1_CRC => {
                let key_type = match offset {
                    offsets::AES_CRC => AesKeyType::AesKey,
                    offsets::AES_USR_KEY0_CRC => AesKeyType::UserKey0,
                    _ => AesKeyType::UserKey1,
                };
                let check = key_type.checksum_check();
                self.checksum_check(
                    key_type.ranges(),
                    AES_KEY_NUM_WORDS,
                    check.done,
                    check.pass,
                    value,
                );
            }
            offsets::UDS_CRC => self.checksum_check(
                &UDS_RANGES,
                UDS_NUM_WORDS,
                masks::STATUS_UDS_CRC_DONE,
                masks::STATUS_UDS_CRC_PASS,
                value,
            ),
            _ => {}
        }
    }

    fn read_ctrl(&self, offset: u32) -> u32 {
        match offset {
            offsets::WR_LOCK => self.locked as u32,
            offsets::CFG => self.cfg,
            offsets::STATUS => self.status,
            offsets::RD_DATA => self.rd_data,
            offsets::ISR if self.faults.cache_parity => self.isr | masks::ISR_CACHE_ERROR,
            offsets::ISR => self.isr,
            _ => 0,
        }
    }
}

impl Default for EfuseModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for EfuseModel {
    fn read(&mut self, addr: u32) -> u32 {
        if (self.ctrl_base..self.ctrl_base + offsets::CTRL_SIZE).contains(&addr) {
            self.read_ctrl(addr - self.ctrl_base)
        } else if addr >= self.cache_base {
            self.cache_word(addr - self.cache_base)
        } else {
            0
        }
    }

    fn write(&mut self, addr: u32, value: u32) {
        self.writes.push((addr, value));
        if (self.ctrl_base..self.ctrl_base + offsets::CTRL_SIZE).contains(&addr) {
            self.write_ctrl(addr - self.ctrl_base, value);
        }
    }
}

/// (address, word index, bit index) of every bit of `field` in walk order.
fn field_bits(field: &FuseField) -> impl Iterator<Item = (FuseAddress, usize, u32)> + '_ {
    let width = field.width();
    (0..field.bit_count()).map(move |n| {
        let addr = FuseAddress::new(
            field.page,
            field.start_row + n / width,
            field.col_start + n % width,
        );
        (addr, (n / EFUSE_BITS_PER_ROW) as usize, n % EFUSE_BITS_PER_ROW)
    })
}
