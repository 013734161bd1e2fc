// Licensed under the Apache-2.0 license

use log::{error, warn};

use crate::config::EfuseConfig;
use crate::ctrl::{ControllerMode, EfuseCtrl, MarginRead};
use crate::error::{EfuseError, EfuseResult, ErrorKind, FuseSlot};
use crate::guard::{EnvironmentGuard, NoEnvironmentGuard};
use crate::hal::RegisterBus;
use crate::layout::{cache_offset, FuseAddress, FuseField, Page};

/// Public entry points of the eFuse engine.
///
/// Every writer validates its input, opens a program-mode session, checks its
/// write-once precondition, programs, and then closes the session on every
/// path.
pub struct Efuse<B: RegisterBus, G: EnvironmentGuard = NoEnvironmentGuard> {
    pub(crate) ctrl: EfuseCtrl<B>,
    guard: G,
}

impl<B: RegisterBus> Efuse<B> {
    pub fn new(bus: B, config: EfuseConfig) -> Self {
        Self::with_guard(bus, config, NoEnvironmentGuard)
    }
}

impl<B: RegisterBus, G: EnvironmentGuard> Efuse<B, G> {
    pub fn with_guard(bus: B, config: EfuseConfig, guard: G) -> Self {
        Self {
            ctrl: EfuseCtrl::new(bus, config),
            guard,
        }
    }

    pub fn ctrl(&self) -> &EfuseCtrl<B> {
        &self.ctrl
    }

    pub fn bus(&self) -> &B {
        self.ctrl.bus()
    }

    pub fn bus_mut(&mut self) -> &mut B {
        self.ctrl.bus_mut()
    }

    pub fn into_bus(self) -> B {
        self.ctrl.into_bus()
    }

    /// Runs `op` inside a program-mode session once `input` validated, and
    /// reloads the cache if `op` left it stale, whether or not `op` failed.
    pub(crate) fn program<V, T>(
        &mut self,
        input: EfuseResult<V>,
        op: impl FnOnce(&mut EfuseCtrl<B>, V) -> EfuseResult<T>,
    ) -> EfuseResult<T> {
        let result = match input {
            Ok(value) => self
                .open_program_session()
                .and_then(|()| op(&mut self.ctrl, value)),
            Err(err) => Err(err),
        };
        let result = self.refresh_cache(result);
        self.finish(result)
    }

    /// Runs `op` inside a read-mode session once `input` validated.
    pub(crate) fn read<V, T>(
        &mut self,
        input: EfuseResult<V>,
        op: impl FnOnce(&mut EfuseCtrl<B>, V) -> EfuseResult<T>,
    ) -> EfuseResult<T> {
        let result = match input {
            Ok(value) => self
                .ctrl
                .setup(ControllerMode::Read, MarginRead::Normal)
                .and_then(|()| op(&mut self.ctrl, value)),
            Err(err) => Err(err),
        };
        self.finish(result)
    }

    fn open_program_session(&mut self) -> EfuseResult<()> {
        self.ctrl.setup(ControllerMode::Program, MarginRead::Margin)?;
        if self.ctrl.config.env_monitoring && !self.guard.check_safe_to_program() {
            warn!("[mcu-efuse] Environment guard vetoed programming");
            return Err(EfuseError::before_programming(ErrorKind::EnvironmentUnsafe));
        }
        Ok(())
    }

    /// Reloads a stale cache so partial writes are visible to the next
    /// writer. A reload failure only surfaces if `result` is Ok.
    fn refresh_cache<T>(&mut self, result: EfuseResult<T>) -> EfuseResult<T> {
        if !self.ctrl.cache_stale {
            return result;
        }
        match (result, self.ctrl.reload_cache()) {
            (result, Ok(())) => result,
            (Ok(_), Err(reload)) => Err(reload),
            (Err(err), Err(reload)) => {
                error!("[mcu-efuse] Cache reload failed after {}: {}", err, reload);
                Err(err)
            }
        }
    }

    /// Closes the session. A close failure only surfaces if `result` is Ok.
    fn finish<T>(&mut self, result: EfuseResult<T>) -> EfuseResult<T> {
        let closed = self.ctrl.close();
        match (result, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(close)) => {
                error!("[mcu-efuse] Close failed: {}", close);
                Err(close)
            }
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close)) => {
                error!("[mcu-efuse] Close failed after {}: {}", err, close);
                Err(err)
            }
        }
    }
}

pub(crate) fn invalid(slot: FuseSlot) -> EfuseError {
    EfuseError::before_programming(ErrorKind::InvalidParameter).at(slot)
}

pub(crate) fn protected(slot: FuseSlot) -> EfuseError {
    EfuseError::before_programming(ErrorKind::FuseProtected).at(slot)
}

impl<B: RegisterBus> EfuseCtrl<B> {
    /// Programs the bits of `requested` that the cached copy of control row
    /// `row` does not have yet.
    pub(crate) fn write_masked_row(&mut self, row: u32, requested: u32) -> EfuseResult<()> {
        let bits = self.programmable_word(requested, cache_offset(Page::Page0, row))?;
        if bits == 0 {
            return Ok(());
        }
        self.write_field(&FuseField::rows(Page::Page0, row, 1), &[bits])
    }

    /// Programs and verifies a single bit unless the cache already shows it set.
    pub(crate) fn program_bit_once(&mut self, addr: FuseAddress) -> EfuseResult<()> {
        if !addr.page.is_cached() {
            return Err(EfuseError::before_programming(ErrorKind::InvalidParameter));
        }
        let bits = self.programmable_word(1 << addr.col, cache_offset(addr.page, addr.row))?;
        if bits == 0 {
            return Ok(());
        }
        self.program_and_verify_bit(addr, false)
    }
}
