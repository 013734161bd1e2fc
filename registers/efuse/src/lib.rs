// Licensed under the Apache-2.0 license

//! Register contract of the eFuse controller and its read cache.
//!
//! Offsets are relative to the controller base or the cache base. Bitfields are
//! declared with `tock-registers` so that drivers and the emulated controller
//! share a single definition of every flag.

#![cfg_attr(target_arch = "riscv32", no_std)]

pub const EFUSE_CTRL_BASE: u32 = 0xF124_0000;
pub const EFUSE_CACHE_BASE: u32 = 0xF125_0000;

/// Bits in one fuse row.
pub const EFUSE_BITS_PER_ROW: u32 = 32;
/// Rows in one fuse page.
pub const EFUSE_ROWS_PER_PAGE: u32 = 256;
pub const EFUSE_PAGE_COUNT: u32 = 3;
/// Byte stride of one cached page.
pub const EFUSE_CACHE_PAGE_SIZE: u32 = EFUSE_ROWS_PER_PAGE * 4;

pub mod offsets {
    pub const WR_LOCK: u32 = 0x00;
    pub const CFG: u32 = 0x04;
    pub const STATUS: u32 = 0x08;
    pub const PGM_ADDR: u32 = 0x0C;
    pub const RD_ADDR: u32 = 0x10;
    pub const RD_DATA: u32 = 0x14;
    pub const ISR: u32 = 0x1C;
    pub const CACHE_LOAD: u32 = 0x20;
    pub const AES_CRC: u32 = 0x24;
    pub const AES_USR_KEY0_CRC: u32 = 0x28;
    pub const AES_USR_KEY1_CRC: u32 = 0x2C;
    pub const UDS_CRC: u32 = 0x30;
    /// Size of the controller register window.
    pub const CTRL_SIZE: u32 = 0x34;
}

/// Value written to `WR_LOCK` to unlock the controller.
pub const WR_UNLOCK_PASSCODE: u32 = 0xDF0D;
/// Any other value re-locks the controller.
pub const WR_LOCK_VALUE: u32 = 0x0;

pub mod bits {
    use tock_registers::register_bitfields;

    register_bitfields! [
        u32,

        pub WrLock [
            LOCKED OFFSET(0) NUMBITS(1) [],
        ],

        pub Cfg [
            PGM_EN OFFSET(1) NUMBITS(1) [],
            MARGIN_RD OFFSET(2) NUMBITS(2) [
                Normal = 0,
                Margin = 2,
            ],
        ],

        pub Status [
            CACHE_DONE OFFSET(5) NUMBITS(1) [],
            AES_CRC_PASS OFFSET(6) NUMBITS(1) [],
            AES_CRC_DONE OFFSET(7) NUMBITS(1) [],
            AES_USR_KEY0_CRC_PASS OFFSET(8) NUMBITS(1) [],
            AES_USR_KEY0_CRC_DONE OFFSET(9) NUMBITS(1) [],
            AES_USR_KEY1_CRC_PASS OFFSET(10) NUMBITS(1) [],
            AES_USR_KEY1_CRC_DONE OFFSET(11) NUMBITS(1) [],
            UDS_CRC_PASS OFFSET(12) NUMBITS(1) [],
            UDS_CRC_DONE OFFSET(13) NUMBITS(1) [],
        ],

        pub PgmAddr [
            COLUMN OFFSET(0) NUMBITS(5) [],
            ROW OFFSET(5) NUMBITS(8) [],
            PAGE OFFSET(13) NUMBITS(2) [],
        ],

        pub RdAddr [
            ROW OFFSET(5) NUMBITS(8) [],
            PAGE OFFSET(13) NUMBITS(2) [],
        ],

        pub Isr [
            PGM_DONE OFFSET(0) NUMBITS(1) [],
            PGM_ERROR OFFSET(1) NUMBITS(1) [],
            RD_DONE OFFSET(2) NUMBITS(1) [],
            CACHE_ERROR OFFSET(4) NUMBITS(1) [],
        ],

        pub CacheLoad [
            LOAD OFFSET(0) NUMBITS(1) [],
        ],
    ];
}

/// Layout of the cached control rows. Each row mirrors one 32-bit fuse row, so
/// a field's shift is also its fuse column.
pub mod cache {
    use tock_registers::register_bitfields;

    register_bitfields! [
        u32,

        pub AnlgTrim3 [
            GLITCH_DET_CONFIG OFFSET(0) NUMBITS(28) [],
            GLITCH_DET_WR_LK OFFSET(31) NUMBITS(1) [],
        ],

        pub DmeFips [
            DME_MODE OFFSET(0) NUMBITS(4) [],
            FIPS_MODE OFFSET(8) NUMBITS(8) [],
        ],

        pub IpDisable0 [
            FIPS_VERSION_0 OFFSET(24) NUMBITS(1) [],
            FIPS_VERSION_1 OFFSET(25) NUMBITS(1) [],
            FIPS_VERSION_2 OFFSET(26) NUMBITS(1) [],
        ],

        pub DmeRevoke [
            LOWER OFFSET(0) NUMBITS(2) [],
            UPPER OFFSET(2) NUMBITS(2) [],
        ],

        pub SecurityCtrl [
            AES_DIS OFFSET(0) NUMBITS(1) [],
            JTAG_ERROR_OUT_DIS OFFSET(1) NUMBITS(1) [],
            JTAG_DIS OFFSET(2) NUMBITS(1) [],
            PPK0_WR_LK OFFSET(4) NUMBITS(1) [],
            PPK1_WR_LK OFFSET(5) NUMBITS(1) [],
            PPK2_WR_LK OFFSET(6) NUMBITS(1) [],
            AES_CRC_LK OFFSET(7) NUMBITS(2) [],
            AES_WR_LK OFFSET(9) NUMBITS(1) [],
            USER_KEY_0_CRC_LK OFFSET(10) NUMBITS(1) [],
            USER_KEY_0_WR_LK OFFSET(11) NUMBITS(1) [],
            USER_KEY_1_CRC_LK OFFSET(12) NUMBITS(1) [],
            USER_KEY_1_WR_LK OFFSET(13) NUMBITS(1) [],
            UDS_WR_LK OFFSET(15) NUMBITS(1) [],
            HWTSTBITS_DIS OFFSET(16) NUMBITS(1) [],
            PMC_SC_EN OFFSET(17) NUMBITS(1) [],
            BOOT_ENV_WR_LK OFFSET(19) NUMBITS(1) [],
            REG_INIT_DIS OFFSET(20) NUMBITS(2) [],
        ],

        pub SecurityMisc0 [
            DEC_ONLY OFFSET(0) NUMBITS(16) [],
        ],

        pub SecurityMisc1 [
            LPD_SC_EN OFFSET(0) NUMBITS(3) [],
            PMC_SC_EN OFFSET(3) NUMBITS(3) [],
            LPD_MBIST_EN OFFSET(6) NUMBITS(3) [],
            PMC_MBIST_EN OFFSET(9) NUMBITS(3) [],
            LPD_NOC_SC_EN OFFSET(12) NUMBITS(3) [],
            SYSMON_VOLT_MON_EN OFFSET(15) NUMBITS(2) [],
        ],

        pub MiscCtrl [
            GD_HALT_BOOT_EN OFFSET(0) NUMBITS(2) [],
            GD_ROM_MONITOR_EN OFFSET(2) NUMBITS(1) [],
            HALT_BOOT_ERROR OFFSET(3) NUMBITS(2) [],
            HALT_BOOT_ENV OFFSET(5) NUMBITS(2) [],
            SAFETY_MISSION_EN OFFSET(8) NUMBITS(1) [],
            LBIST_EN OFFSET(14) NUMBITS(1) [],
            CRYPTO_KAT_EN OFFSET(15) NUMBITS(1) [],
            PPK0_INVLD OFFSET(26) NUMBITS(2) [],
            PPK1_INVLD OFFSET(28) NUMBITS(2) [],
            PPK2_INVLD OFFSET(30) NUMBITS(2) [],
        ],

        pub BootEnvCtrl [
            SYSMON_TEMP_COLD OFFSET(0) NUMBITS(2) [],
            SYSMON_VOLT_SOC OFFSET(8) NUMBITS(2) [],
            SYSMON_VOLT_PSLP OFFSET(10) NUMBITS(2) [],
            SYSMON_VOLT_PMC OFFSET(12) NUMBITS(2) [],
            SYSMON_TEMP_HOT OFFSET(17) NUMBITS(2) [],
            SYSMON_VOLT_EN OFFSET(20) NUMBITS(1) [],
            SYSMON_TEMP_EN OFFSET(21) NUMBITS(1) [],
        ],

        pub BootModeDis [
            BOOT_MODE_DIS OFFSET(0) NUMBITS(16) [],
            PLM_UPDATE_DIS OFFSET(16) NUMBITS(1) [],
        ],

        pub PufEccCtrl [
            ECC_23_0 OFFSET(0) NUMBITS(24) [],
            SYN_LK OFFSET(27) NUMBITS(1) [],
            PUF_DIS OFFSET(28) NUMBITS(1) [],
            REGIS_DIS OFFSET(29) NUMBITS(1) [],
            HD_INVLD OFFSET(30) NUMBITS(1) [],
            REGEN_DIS OFFSET(31) NUMBITS(1) [],
        ],
    ];
}

/// Raw masks for the flags that are polled through the register bus.
pub mod masks {
    pub const ISR_PGM_DONE: u32 = 1 << 0;
    pub const ISR_PGM_ERROR: u32 = 1 << 1;
    pub const ISR_RD_DONE: u32 = 1 << 2;
    pub const ISR_CACHE_ERROR: u32 = 1 << 4;

    pub const STATUS_CACHE_DONE: u32 = 1 << 5;
    pub const STATUS_AES_CRC_PASS: u32 = 1 << 6;
    pub const STATUS_AES_CRC_DONE: u32 = 1 << 7;
    pub const STATUS_AES_USR_KEY0_CRC_PASS: u32 = 1 << 8;
    pub const STATUS_AES_USR_KEY0_CRC_DONE: u32 = 1 << 9;
    pub const STATUS_AES_USR_KEY1_CRC_PASS: u32 = 1 << 10;
    pub const STATUS_AES_USR_KEY1_CRC_DONE: u32 = 1 << 11;
    pub const STATUS_UDS_CRC_PASS: u32 = 1 << 12;
    pub const STATUS_UDS_CRC_DONE: u32 = 1 << 13;
}
