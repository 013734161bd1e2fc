// Licensed under the Apache-2.0 license

//! Register access and bounded polling.

/// Raw 32-bit register access used by every component of the engine.
pub trait RegisterBus {
    fn read(&mut self, addr: u32) -> u32;

    fn write(&mut self, addr: u32, value: u32);

    /// Read-modify-write of the bits selected by `mask`.
    fn modify(&mut self, addr: u32, mask: u32, value: u32) {
        let old = self.read(addr);
        self.write(addr, (old & !mask) | (value & mask));
    }

    /// Bulk copy of consecutive words starting at `addr`.
    fn read_range(&mut self, addr: u32, dest: &mut [u32]) {
        for (i, word) in dest.iter_mut().enumerate() {
            *word = self.read(addr + (i as u32) * 4);
        }
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    fn read(&mut self, addr: u32) -> u32 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u32, value: u32) {
        (**self).write(addr, value)
    }

    fn modify(&mut self, addr: u32, mask: u32, value: u32) {
        (**self).modify(addr, mask, value)
    }

    fn read_range(&mut self, addr: u32, dest: &mut [u32]) {
        (**self).read_range(addr, dest)
    }
}

/// Volatile access to the physical register file.
pub struct MmioBus {
    _private: (),
}

impl MmioBus {
    /// # Safety
    ///
    /// Every address later passed to the bus must be a valid, aligned MMIO
    /// register of this platform, and nothing else may access the eFuse
    /// controller while the bus is alive.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for MmioBus {
    fn read(&mut self, addr: u32) -> u32 {
        // SAFETY: validity of the address is a precondition of `MmioBus::new`.
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    fn write(&mut self, addr: u32, value: u32) {
        // SAFETY: validity of the address is a precondition of `MmioBus::new`.
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, value) }
    }
}

/// Polls `addr` until `predicate` accepts the value or `budget` reads are spent.
///
/// Returns the accepted value, or the last value seen on timeout. At least one
/// read is always issued.
pub fn poll<B: RegisterBus + ?Sized>(
    bus: &mut B,
    addr: u32,
    mut predicate: impl FnMut(u32) -> bool,
    budget: u32,
    interval: u32,
) -> Result<u32, u32> {
    let mut last = 0;
    for _ in 0..budget.max(1) {
        last = bus.read(addr);
        if predicate(last) {
            return Ok(last);
        }
        for _ in 0..interval {
            core::hint::spin_loop();
        }
    }
    Err(last)
}

/// Waits for any of `events` to be set at `addr`; returns the matched events.
pub fn wait_for_events<B: RegisterBus + ?Sized>(
    bus: &mut B,
    addr: u32,
    events: u32,
    budget: u32,
    interval: u32,
) -> Result<u32, u32> {
    poll(bus, addr, |value| value & events != 0, budget, interval).map(|value| value & events)
}
