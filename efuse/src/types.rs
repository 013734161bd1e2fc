// Licensed under the Apache-2.0 license

//! Values accepted by the domain writers.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::layout::{
    AES_KEY_NUM_WORDS, DME_USER_KEY_NUM_WORDS, IV_NUM_WORDS, PPK_HASH_NUM_WORDS,
    PUF_SYN_DATA_NUM_WORDS, UDS_NUM_WORDS,
};

/// 256-bit symmetric key; word 0 holds bits 0..31.
#[repr(C)]
#[derive(Clone, FromBytes, IntoBytes, Immutable, KnownLayout, Zeroize, ZeroizeOnDrop)]
pub struct AesKey(pub [u32; AES_KEY_NUM_WORDS]);

/// SHA3-384 hash of a primary public key.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct PpkHash(pub [u32; PPK_HASH_NUM_WORDS]);

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct Iv(pub [u32; IV_NUM_WORDS]);

/// Device root secret.
#[repr(C)]
#[derive(Clone, FromBytes, IntoBytes, Immutable, KnownLayout, Zeroize, ZeroizeOnDrop)]
pub struct UdsSecret(pub [u32; UDS_NUM_WORDS]);

/// Device-management private key.
#[repr(C)]
#[derive(Clone, FromBytes, IntoBytes, Immutable, KnownLayout, Zeroize, ZeroizeOnDrop)]
pub struct DmeKey(pub [u32; DME_USER_KEY_NUM_WORDS]);

/// PUF security-control fuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PufSecCtrlBits {
    pub regis_dis: bool,
    pub hd_invld: bool,
    pub regen_dis: bool,
}

impl PufSecCtrlBits {
    pub(crate) fn as_array(&self) -> [bool; 3] {
        [self.regis_dis, self.hd_invld, self.regen_dis]
    }
}

/// PUF registration output plus the security bits to program with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PufHelperData {
    pub syn_data: [u32; PUF_SYN_DATA_NUM_WORDS],
    pub chash: u32,
    /// Only bits 23:0 are stored.
    pub aux: u32,
    pub ro_swap: u32,
    pub sec_ctrl: PufSecCtrlBits,
    /// Program syndrome, chash, aux and RO swap; otherwise only the security bits.
    pub program_helper_data: bool,
}

impl Default for PufHelperData {
    fn default() -> Self {
        Self {
            syn_data: [0; PUF_SYN_DATA_NUM_WORDS],
            chash: 0,
            aux: 0,
            ro_swap: 0,
            sec_ctrl: PufSecCtrlBits::default(),
            program_helper_data: false,
        }
    }
}
