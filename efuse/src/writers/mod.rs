// Licensed under the Apache-2.0 license

//! Domain writers, one per fuse category.

mod ctrl_bits;
mod dme;
mod hashes;
mod keys;
mod puf;
mod revocation;
