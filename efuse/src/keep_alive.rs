/*++

Licensed under the Apache-2.0 license.

File Name:

    keep_alive.rs

Abstract:

    Heartbeat state shared with the companion processor. The companion
    mirrors the counter into a shared register; a periodic task compares it
    with the expected value and sends the next keep-alive event.

--*/

use log::{error, warn};

use crate::error::{EfuseResult, ErrorKind};
use crate::hal::RegisterBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepAliveStatus {
    NotStarted,
    Started,
    Error,
    /// No companion processor on this platform.
    Unavailable,
}

/// The companion processor as seen by the heartbeat task.
pub trait Companion {
    fn is_present(&self) -> bool;

    fn send_keep_alive(&mut self) -> EfuseResult<()>;
}

/// Stands in for the companion on platforms that do not have one.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCompanion;

impl Companion for NoCompanion {
    fn is_present(&self) -> bool {
        false
    }

    fn send_keep_alive(&mut self) -> EfuseResult<()> {
        Ok(())
    }
}

pub struct KeepAliveMonitor {
    counter_addr: u32,
    counter: u32,
    status: KeepAliveStatus,
}

impl KeepAliveMonitor {
    pub const fn new(counter_addr: u32) -> Self {
        Self {
            counter_addr,
            counter: 0,
            status: KeepAliveStatus::NotStarted,
        }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn increment(&mut self) {
        self.counter = self.counter.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        self.counter = 0;
    }

    pub fn status(&self) -> KeepAliveStatus {
        self.status
    }

    pub fn set_status(&mut self, status: KeepAliveStatus) {
        self.status = status;
    }

    /// One heartbeat period. An error means the task should be descheduled.
    ///
    /// Once in the error state every further period is a no-op. The shared
    /// counter is only compared after the first keep-alive has been sent.
    pub fn check<B: RegisterBus, C: Companion>(
        &mut self,
        bus: &mut B,
        companion: &mut C,
    ) -> EfuseResult<()> {
        if self.status == KeepAliveStatus::Error {
            return Ok(());
        }
        if !companion.is_present() {
            self.status = KeepAliveStatus::Unavailable;
            return Ok(());
        }

        let observed = bus.read(self.counter_addr);
        if self.status == KeepAliveStatus::Started && observed != self.counter {
            error!(
                "[mcu-efuse] Keep-alive mismatch: expected {} observed {}",
                self.counter, observed
            );
            bus.write(self.counter_addr, 0);
            self.clear();
            self.status = KeepAliveStatus::Error;
            return Err(ErrorKind::KeepAliveMismatch.into());
        }

        self.increment();
        if let Err(err) = companion.send_keep_alive() {
            warn!("[mcu-efuse] Keep-alive event failed: {}", err);
            self.status = KeepAliveStatus::Error;
            return Err(err);
        }
        self.status = KeepAliveStatus::Started;
        Ok(())
    }
}
