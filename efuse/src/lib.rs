// Licensed under the Apache-2.0 license

//! eFuse programming and verification engine.
//!
//! `EfuseCtrl` drives the controller registers: sessions, single-bit program
//! and verify, field walks, cache masking and checksum self-checks. `Efuse`
//! builds the per-category writers on top of it.

#![cfg_attr(target_arch = "riscv32", no_std)]

mod bit;
mod cache;
pub mod config;
pub mod crc;
pub mod ctrl;
mod efuse;
pub mod error;
mod field;
pub mod guard;
pub mod hal;
pub mod keep_alive;
pub mod layout;
pub mod mask;
mod read;
mod session;
pub mod types;
mod writers;

pub use config::{EfuseConfig, DEFAULT_EFUSE_CONFIG};
pub use ctrl::{ControllerMode, EfuseCtrl, MarginRead};
pub use efuse::Efuse;
pub use error::{encode_status, EfuseError, EfuseResult, ErrorKind, ErrorPhase, FuseSlot};
pub use guard::{EnvironmentGuard, NoEnvironmentGuard};
pub use hal::{MmioBus, RegisterBus};
pub use layout::{AesKeyType, FuseAddress, FuseField, IvType, Page, PpkType};
pub use types::{AesKey, DmeKey, Iv, PpkHash, PufHelperData, PufSecCtrlBits, UdsSecret};
