//! Cross-flow membrane humidifier modeling.
//!
//! Both streams share a square N×N grid of cells. The dry stream flows along
//! the grid columns and the wet stream along the rows. Moisture and heat pass
//! through the membrane in each cell, and the steady state is found by fixed
//! point iteration of the humidity ratio and enthalpy fields.

mod device;
mod fields;
mod pressure_drop;
mod results;
mod solve;
mod stream;

#[cfg(test)]
mod test_support;

pub use device::{Channel, Device, Mesh};
pub use fields::{Fields, InletState};
pub use results::{Performance, PortState, StreamPerformance};
pub use solve::{DIVERGENCE_CEILING, Solution, SolveError, SolverConfig, Transport};
pub use stream::{PerStream, Stream};

use pressure_drop::pressure_drop;
use results::Boundary;

/// Operating point in field units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    /// Total mass flow of each stream, kg/s.
    pub mass_flow: PerStream<f64>,

    /// Inlet state of each stream.
    pub inlets: PerStream<InletState>,
}

/// Initializes the fields for `conditions` and iterates them to steady state.
///
/// # Errors
///
/// Returns a [`SolveError`] if the iteration diverges or does not converge.
pub(crate) fn solve_fields(
    device: &Device,
    conditions: &Conditions,
    config: &SolverConfig,
) -> Result<Solution, SolveError> {
    let transport = device.transport(&conditions.mass_flow, &conditions.inlets);
    let fields = Fields::uniform(device.mesh.size, &conditions.inlets);
    solve::solve(fields, &transport, config)
}

/// Runs the full model: solve, pressure drop and report.
///
/// # Errors
///
/// Returns a [`SolveError`] if the iteration diverges or does not converge.
pub(crate) fn simulate(
    device: &Device,
    conditions: &Conditions,
    config: &SolverConfig,
) -> Result<Performance, SolveError> {
    let solution = solve_fields(device, conditions, config)?;

    let layers = device.layers.get();
    let boundary = Boundary {
        mass_flow: conditions.mass_flow,
        pressure: conditions.inlets.map(|inlet| inlet.pressure),
        pressure_drop: PerStream::new(
            pressure_drop(conditions.mass_flow.dry, layers, &device.pressure_drop.dry),
            pressure_drop(conditions.mass_flow.wet, layers, &device.pressure_drop.wet),
        ),
    };

    Ok(results::compile(&solution.fields, solution.iterations, &boundary))
}
