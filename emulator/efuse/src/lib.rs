// Licensed under the Apache-2.0 license

mod efuse;

pub use efuse::{EfuseFaults, EfuseModel};
