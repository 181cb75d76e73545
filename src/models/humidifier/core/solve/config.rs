use std::num::NonZeroUsize;

use crate::support::constraint::{Constrained, StrictlyPositive, UnitIntervalLowerOpen};

const DEFAULT_MAX_ITERATIONS: NonZeroUsize = match NonZeroUsize::new(10_000) {
    Some(cap) => cap,
    None => unreachable!(),
};

/// Iteration controls for the field solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Iteration cap.
    pub max_iterations: Constrained<usize, StrictlyPositive>,

    /// Largest raw cell change (humidity ratio or enthalpy) accepted as converged.
    pub convergence_threshold: f64,

    /// Fraction of each proposed change committed per iteration.
    pub relaxation_factor: Constrained<f64, UnitIntervalLowerOpen>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS.into(),
            convergence_threshold: 1e-4,
            relaxation_factor: UnitIntervalLowerOpen::one(),
        }
    }
}
