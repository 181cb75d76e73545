//! Iterative field solver for the cross-flow membrane exchanger.

mod config;
mod error;
mod flux;
mod march;
mod relax;

pub use config::SolverConfig;
pub use error::SolveError;

use crate::support::constraint::{Constrained, UnitIntervalLowerOpen};

use super::{Fields, PerStream};

use flux::Fluxes;
use march::Proposal;

/// Errors above this value abort the solve as diverged.
pub const DIVERGENCE_CEILING: f64 = 1e6;

const PROGRESS_INTERVAL: usize = 1000;

/// Scalar transport parameters held fixed for a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    /// Per-channel mass flow of each stream, kg/s.
    pub channel_flow: PerStream<f64>,

    /// Ratio of grid size to physical dry channel count.
    pub dry_scale: f64,

    /// Stream pressures, kPa.
    pub pressure: PerStream<f64>,

    /// Lumped heat transfer resistance, K/W.
    pub heat_resistance: f64,

    /// Lumped mass transfer resistance, s/m³.
    pub mass_resistance: f64,

    /// Flux derating for device aging.
    pub life_cycle_factor: Constrained<f64, UnitIntervalLowerOpen>,
}

impl Transport {
    /// Dry stream mass flow carried by one grid row.
    #[must_use]
    pub fn dry_row_flow(&self) -> f64 {
        self.channel_flow.dry / self.dry_scale
    }
}

/// A converged set of fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub fields: Fields,

    /// Iterations performed, including the one that met the threshold.
    pub iterations: usize,

    /// Error of the final iteration.
    pub error: f64,
}

/// Reusable per-iteration buffers.
struct Workspace {
    fluxes: Fluxes,
    proposal: Proposal,
}

impl Workspace {
    fn new(size: usize) -> Self {
        Self {
            fluxes: Fluxes::zeros(size),
            proposal: Proposal::zeros(size),
        }
    }

    /// Advances `fields` by one iteration and returns its raw error.
    ///
    /// The error is taken between the unrelaxed proposal and the fields as
    /// they were before this iteration.
    fn iterate(&mut self, fields: &mut Fields, transport: &Transport, relaxation: f64) -> f64 {
        self.fluxes.evaluate(fields, transport);
        self.proposal.march(fields, &self.fluxes, transport);

        let error = relax::max_change(fields, &self.proposal);

        relax::relax(fields, &self.proposal, relaxation);
        relax::refresh(fields, &transport.pressure);

        error
    }
}

/// Iterates `fields` to a fixed point.
///
/// Each iteration evaluates the membrane fluxes, marches both streams,
/// relaxes the working fields toward the marched proposal and refreshes the
/// derived temperature and relative humidity. The dry inlet column and wet
/// inlet row of `fields` are never modified.
///
/// # Errors
///
/// - [`SolveError::Diverged`] if an iteration's error exceeds
///   [`DIVERGENCE_CEILING`] or is not a number.
/// - [`SolveError::NotConverged`] if `config.max_iterations` iterations run
///   without meeting `config.convergence_threshold`.
pub(crate) fn solve(
    mut fields: Fields,
    transport: &Transport,
    config: &SolverConfig,
) -> Result<Solution, SolveError> {
    let relaxation = config.relaxation_factor.get();
    let mut workspace = Workspace::new(fields.size());
    let mut iteration = 0;

    loop {
        iteration += 1;
        let error = workspace.iterate(&mut fields, transport, relaxation);
        log::trace!("iteration {iteration}: error = {error:e}");

        if error.is_nan() || error > DIVERGENCE_CEILING {
            log::warn!("field solve diverged at iteration {iteration} (error = {error:e})");
            return Err(SolveError::Diverged { error, iteration });
        }

        if error <= config.convergence_threshold {
            log::info!("field solve converged in {iteration} iterations (error = {error:e})");
            return Ok(Solution {
                fields,
                iterations: iteration,
                error,
            });
        }

        if iteration >= config.max_iterations.get() {
            log::warn!("field solve stopped after {iteration} iterations (error = {error:e})");
            return Err(SolveError::NotConverged {
                error,
                iterations: iteration,
            });
        }

        if iteration % PROGRESS_INTERVAL == 0 {
            log::debug!("iteration {iteration}: error = {error:e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        models::humidifier::core::test_support::{inlets, transport},
        support::constraint::StrictlyPositive,
    };

    fn config(relaxation: f64) -> SolverConfig {
        SolverConfig {
            relaxation_factor: UnitIntervalLowerOpen::new(relaxation).unwrap(),
            ..SolverConfig::default()
        }
    }

    #[test]
    fn inlet_boundaries_are_never_modified() {
        let initial = Fields::uniform(5, &inlets());
        let transport = transport();

        let mut fields = initial.clone();
        let mut workspace = Workspace::new(5);

        for _ in 0..12 {
            workspace.iterate(&mut fields, &transport, 0.7);

            assert_eq!(fields.humidity_ratio.dry.column(0), initial.humidity_ratio.dry.column(0));
            assert_eq!(fields.enthalpy.dry.column(0), initial.enthalpy.dry.column(0));
            assert_eq!(fields.humidity_ratio.wet.row(0), initial.humidity_ratio.wet.row(0));
            assert_eq!(fields.enthalpy.wet.row(0), initial.enthalpy.wet.row(0));
        }
    }

    #[test]
    fn unit_relaxation_commits_the_proposal() {
        let mut fields = Fields::uniform(4, &inlets());
        let transport = transport();
        let mut workspace = Workspace::new(4);

        workspace.iterate(&mut fields, &transport, 0.5);

        let mut expected = Proposal::zeros(4);
        let mut fluxes = Fluxes::zeros(4);
        fluxes.evaluate(&fields, &transport);
        expected.march(&fields, &fluxes, &transport);

        workspace.iterate(&mut fields, &transport, 1.0);

        assert_eq!(fields.humidity_ratio, expected.humidity_ratio);
        assert_eq!(fields.enthalpy, expected.enthalpy);
    }

    #[test]
    fn error_is_measured_before_relaxation() {
        let transport = transport();

        let mut full = Fields::uniform(4, &inlets());
        let mut damped = full.clone();

        let full_error = Workspace::new(4).iterate(&mut full, &transport, 1.0);
        let damped_error = Workspace::new(4).iterate(&mut damped, &transport, 0.1);

        assert_eq!(full_error, damped_error);
        assert_ne!(full.humidity_ratio, damped.humidity_ratio);
    }

    #[test]
    fn converges_within_two_sweeps_without_relaxation() {
        let size = 6;
        let solution = solve(Fields::uniform(size, &inlets()), &transport(), &config(1.0)).unwrap();

        assert!(solution.error <= 1e-4);
        assert!(
            solution.iterations <= 2 * size,
            "took {} iterations",
            solution.iterations
        );
    }

    #[test]
    fn under_relaxed_errors_shrink_every_iteration() {
        let cap = 1000;
        let threshold = SolverConfig::default().convergence_threshold;
        let transport = transport();
        let mut fields = Fields::uniform(8, &inlets());
        let mut workspace = Workspace::new(8);

        let mut errors = Vec::new();
        while errors.last().is_none_or(|&error| error > threshold) && errors.len() < cap {
            errors.push(workspace.iterate(&mut fields, &transport, 0.5));
        }

        assert!(errors.len() < cap, "no convergence in {cap} iterations");
        assert!(errors[0] > 1e3);
        for (k, pair) in errors.windows(2).enumerate() {
            assert!(
                pair[1] <= pair[0],
                "error rose at iteration {}: {} -> {}",
                k + 2,
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn under_relaxed_solve_reaches_the_same_fixed_point() {
        let size = 6;
        let fields = Fields::uniform(size, &inlets());
        let transport = transport();

        let exact = solve(fields.clone(), &transport, &config(1.0)).unwrap();
        let damped = solve(fields, &transport, &config(0.5)).unwrap();

        assert!(damped.iterations > exact.iterations);
        let w_exact = exact.fields.humidity_ratio.dry[[size - 1, size - 1]];
        let w_damped = damped.fields.humidity_ratio.dry[[size - 1, size - 1]];
        assert!((w_exact - w_damped).abs() < 1e-3);
    }

    #[test]
    fn moisture_and_heat_move_from_wet_to_dry() {
        let mut inlets = inlets();
        inlets.wet.temperature = 85.0;
        let fields = Fields::uniform(8, &inlets);

        let solution = solve(fields.clone(), &transport(), &config(1.0)).unwrap();
        let solved = &solution.fields;

        let mean = |view: ndarray::ArrayView1<'_, f64>| view.mean().unwrap();
        assert!(
            mean(Fields::dry_outlet(&solved.humidity_ratio.dry))
                > mean(Fields::dry_inlet(&fields.humidity_ratio.dry))
        );
        assert!(
            mean(Fields::wet_outlet(&solved.humidity_ratio.wet))
                < mean(Fields::wet_inlet(&fields.humidity_ratio.wet))
        );
        assert!(
            mean(Fields::dry_outlet(&solved.enthalpy.dry))
                > mean(Fields::dry_inlet(&fields.enthalpy.dry))
        );
    }

    #[test]
    fn tiny_resistance_diverges_on_first_iteration() {
        let transport = Transport {
            mass_resistance: 1e-12,
            ..transport()
        };

        let result = solve(Fields::uniform(4, &inlets()), &transport, &config(1.0));

        match result {
            Err(SolveError::Diverged { error, iteration }) => {
                assert_eq!(iteration, 1);
                assert!(error > DIVERGENCE_CEILING);
            }
            other => panic!("expected divergence, got {other:?}"),
        }
    }

    #[test]
    fn nan_error_is_divergence() {
        let transport = Transport {
            heat_resistance: 0.0,
            ..transport()
        };

        // Equal temperatures over a zero resistance give 0/0 heat flux.
        let result = solve(Fields::uniform(3, &inlets()), &transport, &config(1.0));

        let Err(err @ SolveError::Diverged { .. }) = result else {
            panic!("expected divergence, got {result:?}");
        };
        assert!(err.error().is_nan());
        assert_eq!(err.iterations(), 1);
    }

    #[test]
    fn iteration_cap_stops_after_exactly_one_iteration() {
        let config = SolverConfig {
            max_iterations: StrictlyPositive::new(1).unwrap(),
            convergence_threshold: 0.0,
            ..SolverConfig::default()
        };

        let result = solve(Fields::uniform(4, &inlets()), &transport(), &config);

        match result {
            Err(SolveError::NotConverged { error, iterations }) => {
                assert_eq!(iterations, 1);
                assert!(error > 0.0 && error <= DIVERGENCE_CEILING);
            }
            other => panic!("expected non-convergence, got {other:?}"),
        }
    }
}
