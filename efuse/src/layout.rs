// Licensed under the Apache-2.0 license

//! Physical placement of every fuse category.
//!
//! The array has three pages of 256 rows, 32 columns per row. Pages 0 and 1 are
//! mirrored by the read cache at `page * 0x400 + row * 4`; secret rows read as
//! zero there. Control rows are mirrored bit for bit, so a field's bit index in
//! its cached word is also its column.

use registers_efuse::cache::{BootModeDis, IpDisable0, PufEccCtrl};
use registers_efuse::{masks, offsets, EFUSE_BITS_PER_ROW, EFUSE_CACHE_PAGE_SIZE, EFUSE_ROWS_PER_PAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Page {
    Page0 = 0,
    Page1 = 1,
    Page2 = 2,
}

impl Page {
    pub const fn index(self) -> u32 {
        self as u32
    }

    pub const fn from_index(index: u32) -> Option<Page> {
        match index {
            0 => Some(Page::Page0),
            1 => Some(Page::Page1),
            2 => Some(Page::Page2),
            _ => None,
        }
    }

    /// Page 2 has no cache mirror.
    pub const fn is_cached(self) -> bool {
        !matches!(self, Page::Page2)
    }
}

/// The smallest programmable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuseAddress {
    pub page: Page,
    pub row: u32,
    pub col: u32,
}

impl FuseAddress {
    pub const fn new(page: Page, row: u32, col: u32) -> Self {
        Self { page, row, col }
    }
}

/// A rectangular bit region: `num_rows` rows from `start_row`, columns
/// `col_start..=col_end` in each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuseField {
    pub page: Page,
    pub start_row: u32,
    pub col_start: u32,
    pub col_end: u32,
    pub num_rows: u32,
    /// Secret rows are confirmed by checksum instead of reading them back.
    pub skip_verify: bool,
}

impl FuseField {
    pub const fn new(page: Page, start_row: u32, col_start: u32, col_end: u32, num_rows: u32) -> Self {
        Self {
            page,
            start_row,
            col_start,
            col_end,
            num_rows,
            skip_verify: false,
        }
    }

    /// Whole rows, all 32 columns.
    pub const fn rows(page: Page, start_row: u32, num_rows: u32) -> Self {
        Self::new(page, start_row, 0, EFUSE_BITS_PER_ROW - 1, num_rows)
    }

    pub const fn secret(self) -> Self {
        Self {
            skip_verify: true,
            ..self
        }
    }

    pub const fn end_row(&self) -> u32 {
        self.start_row + self.num_rows
    }

    pub const fn width(&self) -> u32 {
        self.col_end - self.col_start + 1
    }

    pub const fn bit_count(&self) -> u32 {
        self.width() * self.num_rows
    }

    /// Words consumed from the value when walking the whole field.
    pub const fn word_count(&self) -> usize {
        self.bit_count().div_ceil(EFUSE_BITS_PER_ROW) as usize
    }

    pub const fn is_valid(&self) -> bool {
        self.num_rows != 0
            && self.col_start <= self.col_end
            && self.col_end < EFUSE_BITS_PER_ROW
            && self.end_row() <= EFUSE_ROWS_PER_PAGE
    }

    pub const fn contains_row(&self, page: Page, row: u32) -> bool {
        self.page as u8 == page as u8 && row >= self.start_row && row < self.end_row()
    }

    pub const fn cache_offset(&self) -> u32 {
        cache_offset(self.page, self.start_row)
    }
}

pub const fn cache_offset(page: Page, row: u32) -> u32 {
    page.index() * EFUSE_CACHE_PAGE_SIZE + row * 4
}

/// One piece of a multi-word value; the field is fed from `value[first_word..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRange {
    pub field: FuseField,
    pub first_word: usize,
}

impl FieldRange {
    const fn secret(page: Page, start_row: u32, num_rows: u32, first_word: usize) -> Self {
        Self {
            field: FuseField::rows(page, start_row, num_rows).secret(),
            first_word,
        }
    }
}

/// Hardware checksum self-check of one secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumCheck {
    pub reg: u32,
    pub done: u32,
    pub pass: u32,
}

// Control rows, page 0
pub const ANLG_TRIM_3_ROW: u32 = 3;
pub const DME_FIPS_ROW: u32 = 4;
pub const IP_DISABLE_0_ROW: u32 = 5;
pub const DME_REVOKE_0_1_ROW: u32 = 6;
pub const DME_REVOKE_2_3_ROW: u32 = 7;
pub const SECURITY_CTRL_ROW: u32 = 8;
pub const SECURITY_MISC_0_ROW: u32 = 9;
pub const SECURITY_MISC_1_ROW: u32 = 10;
pub const MISC_CTRL_ROW: u32 = 11;
pub const BOOT_ENV_CTRL_ROW: u32 = 12;
pub const BOOT_MODE_DIS_ROW: u32 = 13;
pub const PUF_ECC_CTRL_ROW: u32 = 14;
pub const PUF_CHASH_ROW: u32 = 15;
pub const PUF_RO_SWAP_ROW: u32 = 16;

pub const IV_NUM_WORDS: usize = 3;
pub const PPK_HASH_NUM_WORDS: usize = 12;
pub const AES_KEY_NUM_WORDS: usize = 8;
pub const UDS_NUM_WORDS: usize = 8;
pub const DME_USER_KEY_NUM_WORDS: usize = 4;
pub const DME_KEY_SLOTS: u8 = 4;
pub const PUF_SYN_DATA_NUM_WORDS: usize = 127;

/// Revocation ids 1..=128 and 129..=256 live in two groups of 16 rows,
/// eight ids per row.
pub const REVOCATION_ID_GROUP_A_ROW: u32 = 68;
pub const REVOCATION_ID_GROUP_B_ROW: u32 = 84;
pub const REVOCATION_ID_COL: u32 = 0;
pub const REVOCATION_IDS_PER_ROW: u32 = 8;
pub const REVOCATION_ID_GROUP_SIZE: u32 = 128;
pub const MAX_REVOCATION_ID: u32 = 256;

pub const OFFCHIP_REVOCATION_ID_ROW: u32 = 100;
pub const MAX_OFFCHIP_REVOCATION_ID: u32 = 256;

pub const DME_USER_KEY_ROW: u32 = 160;
pub const DME_USER_KEY_ROWS: u32 = 8;
pub const DME_USER_KEY_COL_END: u32 = 15;

pub const PUF_SYN_DATA_PAGE0_ROW: u32 = 192;
pub const PUF_SYN_DATA_PAGE0_ROWS: u32 = 64;
pub const PUF_SYN_DATA_PAGE1_ROW: u32 = 0;
pub const PUF_SYN_DATA_PAGE1_ROWS: u32 = 63;

pub const FIPS_VERSION_COLS: [u32; 3] = [
    IpDisable0::FIPS_VERSION_0.shift as u32,
    IpDisable0::FIPS_VERSION_1.shift as u32,
    IpDisable0::FIPS_VERSION_2.shift as u32,
];

pub const PLM_UPDATE_DIS: FuseAddress = FuseAddress::new(
    Page::Page0,
    BOOT_MODE_DIS_ROW,
    BootModeDis::PLM_UPDATE_DIS.shift as u32,
);

pub const PUF_SEC_CTRL_COLS: [u32; 3] = [
    PufEccCtrl::REGIS_DIS.shift as u32,
    PufEccCtrl::HD_INVLD.shift as u32,
    PufEccCtrl::REGEN_DIS.shift as u32,
];

pub const PUF_SYN_DATA_FIELDS: [FieldRange; 2] = [
    FieldRange {
        field: FuseField::rows(Page::Page0, PUF_SYN_DATA_PAGE0_ROW, PUF_SYN_DATA_PAGE0_ROWS),
        first_word: 0,
    },
    FieldRange {
        field: FuseField::rows(Page::Page1, PUF_SYN_DATA_PAGE1_ROW, PUF_SYN_DATA_PAGE1_ROWS),
        first_word: PUF_SYN_DATA_PAGE0_ROWS as usize,
    },
];

/// Cache offset of a control row on page 0.
pub const fn ctrl_row_cache_offset(row: u32) -> u32 {
    cache_offset(Page::Page0, row)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AesKeyType {
    AesKey = 0,
    UserKey0 = 1,
    UserKey1 = 2,
}

const AES_KEY_RANGES: [FieldRange; 2] = [
    FieldRange::secret(Page::Page0, 108, 4, 0),
    FieldRange::secret(Page::Page0, 116, 4, 4),
];

const USER_KEY_0_RANGES: [FieldRange; 3] = [
    FieldRange::secret(Page::Page0, 120, 2, 0),
    FieldRange::secret(Page::Page0, 124, 4, 2),
    FieldRange::secret(Page::Page0, 130, 2, 6),
];

const USER_KEY_1_RANGES: [FieldRange; 3] = [
    FieldRange::secret(Page::Page0, 132, 2, 0),
    FieldRange::secret(Page::Page0, 136, 2, 2),
    FieldRange::secret(Page::Page0, 140, 4, 4),
];

pub const UDS_RANGES: [FieldRange; 3] = [
    FieldRange::secret(Page::Page0, 146, 2, 0),
    FieldRange::secret(Page::Page0, 150, 4, 2),
    FieldRange::secret(Page::Page0, 156, 2, 6),
];

pub const UDS_CHECKSUM_CHECK: ChecksumCheck = ChecksumCheck {
    reg: offsets::UDS_CRC,
    done: masks::STATUS_UDS_CRC_DONE,
    pass: masks::STATUS_UDS_CRC_PASS,
};

impl AesKeyType {
    pub const fn ranges(self) -> &'static [FieldRange] {
        match self {
            AesKeyType::AesKey => &AES_KEY_RANGES,
            AesKeyType::UserKey0 => &USER_KEY_0_RANGES,
            AesKeyType::UserKey1 => &USER_KEY_1_RANGES,
        }
    }

    pub const fn checksum_check(self) -> ChecksumCheck {
        match self {
            AesKeyType::AesKey => ChecksumCheck {
                reg: offsets::AES_CRC,
                done: masks::STATUS_AES_CRC_DONE,
                pass: masks::STATUS_AES_CRC_PASS,
            },
            AesKeyType::UserKey0 => ChecksumCheck {
                reg: offsets::AES_USR_KEY0_CRC,
                done: masks::STATUS_AES_USR_KEY0_CRC_DONE,
                pass: masks::STATUS_AES_USR_KEY0_CRC_PASS,
            },
            AesKeyType::UserKey1 => ChecksumCheck {
                reg: offsets::AES_USR_KEY1_CRC,
                done: masks::STATUS_AES_USR_KEY1_CRC_DONE,
                pass: masks::STATUS_AES_USR_KEY1_CRC_PASS,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PpkType {
    Ppk0 = 0,
    Ppk1 = 1,
    Ppk2 = 2,
}

impl PpkType {
    pub const fn field(self) -> FuseField {
        let start_row = match self {
            PpkType::Ppk0 => 32,
            PpkType::Ppk1 => 44,
            PpkType::Ppk2 => 56,
        };
        FuseField::rows(Page::Page0, start_row, PPK_HASH_NUM_WORDS as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IvType {
    MetaHeader = 0,
    Blk = 1,
    Plm = 2,
    DataPartition = 3,
}

impl IvType {
    pub const fn field(self) -> FuseField {
        let start_row = match self {
            IvType::MetaHeader => 17,
            IvType::Blk => 20,
            IvType::Plm => 23,
            IvType::DataPartition => 26,
        };
        FuseField::rows(Page::Page0, start_row, IV_NUM_WORDS as u32)
    }
}

/// Location of revocation id `id` (1-based, already range checked).
pub const fn revocation_id_address(id: u32) -> FuseAddress {
    let (base, index) = if id <= REVOCATION_ID_GROUP_SIZE {
        (REVOCATION_ID_GROUP_A_ROW, id - 1)
    } else {
        (REVOCATION_ID_GROUP_B_ROW, id - 1 - REVOCATION_ID_GROUP_SIZE)
    };
    FuseAddress::new(
        Page::Page0,
        base + index / REVOCATION_IDS_PER_ROW,
        REVOCATION_ID_COL + index % REVOCATION_IDS_PER_ROW,
    )
}

/// Location of off-chip revocation id `id` (1-based, already range checked).
pub const fn offchip_revocation_id_address(id: u32) -> FuseAddress {
    FuseAddress::new(
        Page::Page0,
        OFFCHIP_REVOCATION_ID_ROW + (id - 1) / EFUSE_BITS_PER_ROW,
        (id - 1) % EFUSE_BITS_PER_ROW,
    )
}

/// Device-management key `slot` (already range checked) uses a 16-column
/// window, so each value word spans two rows.
pub const fn dme_user_key_field(slot: u8) -> FuseField {
    FuseField::new(
        Page::Page0,
        DME_USER_KEY_ROW + slot as u32 * DME_USER_KEY_ROWS,
        0,
        DME_USER_KEY_COL_END,
        DME_USER_KEY_ROWS,
    )
}

/// The two columns of device-management revocation `slot`.
pub const fn dme_revoke_addresses(slot: u8) -> [FuseAddress; 2] {
    let row = if slot < 2 {
        DME_REVOKE_0_1_ROW
    } else {
        DME_REVOKE_2_3_ROW
    };
    let col = (slot as u32 % 2) * 2;
    [
        FuseAddress::new(Page::Page0, row, col),
        FuseAddress::new(Page::Page0, row, col + 1),
    ]
}

/// Rows holding secret material; the cache never mirrors them.
pub fn is_secret_row(page: Page, row: u32) -> bool {
    [AesKeyType::AesKey, AesKeyType::UserKey0, AesKeyType::UserKey1]
        .iter()
        .flat_map(|key| key.ranges().iter())
        .chain(UDS_RANGES.iter())
        .any(|range| range.field.contains_row(page, row))
}
