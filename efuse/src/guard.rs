// Licensed under the Apache-2.0 license

/// Platform hook that vetoes programming outside safe voltage/temperature.
///
/// Thresholds are board specific and supplied by the integrator.
pub trait EnvironmentGuard {
    fn check_safe_to_program(&self) -> bool;
}

/// Guard for platforms without environmental monitoring.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEnvironmentGuard;

impl EnvironmentGuard for NoEnvironmentGuard {
    fn check_safe_to_program(&self) -> bool {
        true
    }
}

impl<F: Fn() -> bool> EnvironmentGuard for F {
    fn check_safe_to_program(&self) -> bool {
        self()
    }
}
