// Licensed under the Apache-2.0 license

use core::fmt;

use crate::layout::{AesKeyType, IvType, PpkType};

/// Failure kinds reported by the eFuse engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input outside the accepted shape or range.
    InvalidParameter,
    /// A write-once region already holds data.
    AlreadyProgrammed,
    /// A lock or disable fuse forbids the write.
    FuseProtected,
    /// The read cache reported a parity/integrity fault.
    CacheParityError,
    ProgramTimeout,
    ProgramFailed,
    ReadTimeout,
    /// The bit was programmed but reads back as 0.
    VerifyMismatch,
    /// The hardware self-check rejected the programmed secret.
    ChecksumMismatch,
    ChecksumTimeout,
    /// Control flow left a field walk in an impossible state.
    GlitchDetected,
    ControllerUnlock,
    ControllerLock,
    ReadModeMismatch,
    ProgramDisable,
    CacheLoadTimeout,
    /// The environment guard vetoed programming.
    EnvironmentUnsafe,
    /// A write depends on a key that is still blank.
    KeyNotProgrammed,
    KeepAliveMismatch,
}

impl ErrorKind {
    pub const fn code(self) -> u8 {
        match self {
            ErrorKind::InvalidParameter => 0x01,
            ErrorKind::AlreadyProgrammed => 0x02,
            ErrorKind::FuseProtected => 0x03,
            ErrorKind::CacheParityError => 0x04,
            ErrorKind::ProgramTimeout => 0x05,
            ErrorKind::ProgramFailed => 0x06,
            ErrorKind::ReadTimeout => 0x07,
            ErrorKind::VerifyMismatch => 0x08,
            ErrorKind::ChecksumMismatch => 0x09,
            ErrorKind::ChecksumTimeout => 0x0A,
            ErrorKind::GlitchDetected => 0x0B,
            ErrorKind::ControllerUnlock => 0x0C,
            ErrorKind::ControllerLock => 0x0D,
            ErrorKind::ReadModeMismatch => 0x0E,
            ErrorKind::CacheLoadTimeout => 0x0F,
            ErrorKind::EnvironmentUnsafe => 0x10,
            ErrorKind::KeyNotProgrammed => 0x11,
            ErrorKind::KeepAliveMismatch => 0x12,
            ErrorKind::ProgramDisable => 0x13,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidParameter => "invalid parameter",
            ErrorKind::AlreadyProgrammed => "already programmed",
            ErrorKind::FuseProtected => "fuse protected",
            ErrorKind::CacheParityError => "cache parity error",
            ErrorKind::ProgramTimeout => "program timeout",
            ErrorKind::ProgramFailed => "program failed",
            ErrorKind::ReadTimeout => "read timeout",
            ErrorKind::VerifyMismatch => "verify mismatch",
            ErrorKind::ChecksumMismatch => "checksum mismatch",
            ErrorKind::ChecksumTimeout => "checksum timeout",
            ErrorKind::GlitchDetected => "glitch detected",
            ErrorKind::ControllerUnlock => "controller unlock failed",
            ErrorKind::ControllerLock => "controller lock failed",
            ErrorKind::ReadModeMismatch => "read mode mismatch",
            ErrorKind::ProgramDisable => "program disable failed",
            ErrorKind::CacheLoadTimeout => "cache load timeout",
            ErrorKind::EnvironmentUnsafe => "environment unsafe for programming",
            ErrorKind::KeyNotProgrammed => "key not programmed",
            ErrorKind::KeepAliveMismatch => "keep-alive counter mismatch",
        };
        f.write_str(s)
    }
}

/// The fuse category, and slot within it, that an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuseSlot {
    AesKey(AesKeyType),
    PpkHash(PpkType),
    Iv(IvType),
    RevocationId,
    OffChipRevocationId,
    MiscCtrl,
    SecCtrl,
    SecMisc1,
    BootEnvCtrl,
    GlitchConfig,
    GlitchWriteLock,
    DecOnly,
    Uds,
    DmeUserKey(u8),
    DmeRevoke(u8),
    DmeMode,
    PlmUpdate,
    BootModeDisable,
    FipsMode,
    FipsVersion,
    PufSynData,
    PufChash,
    PufAux,
    PufRoSwap,
    PufSecCtrl,
}

impl FuseSlot {
    /// Returns the (category, index) pair used by the packed encoding.
    pub const fn code(self) -> (u8, u8) {
        match self {
            FuseSlot::AesKey(t) => (0x01, t as u8),
            FuseSlot::PpkHash(t) => (0x02, t as u8),
            FuseSlot::Iv(t) => (0x03, t as u8),
            FuseSlot::RevocationId => (0x04, 0),
            FuseSlot::OffChipRevocationId => (0x05, 0),
            FuseSlot::MiscCtrl => (0x06, 0),
            FuseSlot::SecCtrl => (0x07, 0),
            FuseSlot::SecMisc1 => (0x08, 0),
            FuseSlot::BootEnvCtrl => (0x09, 0),
            FuseSlot::GlitchConfig => (0x0A, 0),
            FuseSlot::GlitchWriteLock => (0x0A, 1),
            FuseSlot::DecOnly => (0x0B, 0),
            FuseSlot::Uds => (0x0C, 0),
            FuseSlot::DmeUserKey(n) => (0x0D, n),
            FuseSlot::DmeRevoke(n) => (0x0E, n),
            FuseSlot::DmeMode => (0x0F, 0),
            FuseSlot::PlmUpdate => (0x10, 0),
            FuseSlot::BootModeDisable => (0x11, 0),
            FuseSlot::FipsMode => (0x12, 0),
            FuseSlot::FipsVersion => (0x12, 1),
            FuseSlot::PufSynData => (0x13, 0),
            FuseSlot::PufChash => (0x13, 1),
            FuseSlot::PufAux => (0x13, 2),
            FuseSlot::PufRoSwap => (0x13, 3),
            FuseSlot::PufSecCtrl => (0x13, 4),
        }
    }
}

/// Whether any fuse could have been touched when the error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPhase {
    BeforeProgramming,
    DuringProgramming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EfuseError {
    pub kind: ErrorKind,
    pub slot: Option<FuseSlot>,
    pub phase: ErrorPhase,
}

pub type EfuseResult<T> = Result<T, EfuseError>;

const ENCODE_SLOT_INDEX_SHIFT: u32 = 8;
const ENCODE_SLOT_CATEGORY_SHIFT: u32 = 16;
const ENCODE_BEFORE_PROGRAMMING: u32 = 1 << 31;

impl EfuseError {
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            slot: None,
            phase: ErrorPhase::DuringProgramming,
        }
    }

    /// An error raised at a safe abort point, before any bit of the value was touched.
    pub const fn before_programming(kind: ErrorKind) -> Self {
        Self {
            kind,
            slot: None,
            phase: ErrorPhase::BeforeProgramming,
        }
    }

    /// Attaches `slot` unless an inner layer already named one.
    pub fn at(self, slot: FuseSlot) -> Self {
        Self {
            slot: self.slot.or(Some(slot)),
            ..self
        }
    }

    pub fn is_before_programming(&self) -> bool {
        self.phase == ErrorPhase::BeforeProgramming
    }

    /// Packs the error into the integer status used by host tools.
    pub fn encode(&self) -> u32 {
        let (category, index) = match self.slot {
            Some(slot) => slot.code(),
            None => (0, 0),
        };
        let mut value = self.kind.code() as u32
            | (index as u32) << ENCODE_SLOT_INDEX_SHIFT
            | (category as u32) << ENCODE_SLOT_CATEGORY_SHIFT;
        if self.is_before_programming() {
            value |= ENCODE_BEFORE_PROGRAMMING;
        }
        value
    }
}

impl From<ErrorKind> for EfuseError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for EfuseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(slot) = self.slot {
            write!(f, " at {:?}", slot)?;
        }
        if self.is_before_programming() {
            f.write_str(" (before programming)")?;
        }
        Ok(())
    }
}

/// Packs a result into the integer status used by host tools; success is 0.
pub fn encode_status(result: &EfuseResult<()>) -> u32 {
    match result {
        Ok(()) => 0,
        Err(e) => e.encode(),
    }
}
