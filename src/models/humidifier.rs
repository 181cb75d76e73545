//! Membrane humidifier model.
//!
//! [`Humidifier`] implements [`twine_core::Model`]: given the inlet state of
//! both streams it predicts their outlet states, the moisture carried across
//! the membrane and the pressure drop of each side. Device geometry and model
//! constants come from a [`HumidifierConfig`] catalog.
//!
//! # Example
//!
//! ```
//! use humidifier_models::models::humidifier::{
//!     Humidifier, HumidifierConfig, InletConditions, OperatingPoint,
//! };
//! use uom::si::{
//!     f64::{MassRate, Pressure, Ratio, ThermodynamicTemperature},
//!     mass_rate::kilogram_per_second,
//!     pressure::kilopascal,
//!     ratio::percent,
//!     thermodynamic_temperature::degree_celsius,
//! };
//!
//! let config = HumidifierConfig::bundled().unwrap();
//! let humidifier = Humidifier::new(&config, "ax150", 100, "BOL").unwrap();
//!
//! let inlet = |rh| InletConditions {
//!     mass_flow: MassRate::new::<kilogram_per_second>(0.1),
//!     temperature: ThermodynamicTemperature::new::<degree_celsius>(80.0),
//!     relative_humidity: Ratio::new::<percent>(rh),
//!     pressure: Pressure::new::<kilopascal>(120.0),
//! };
//!
//! let performance = humidifier
//!     .solve(&OperatingPoint { dry: inlet(10.0), wet: inlet(90.0) })
//!     .unwrap();
//! assert!(performance.dry.outlet.humidity_ratio > performance.dry.inlet.humidity_ratio);
//! ```

mod config;
pub(crate) mod core;

use thiserror::Error;
use twine_core::Model;
use uom::si::{
    f64::{MassRate, Pressure, Ratio, ThermodynamicTemperature},
    mass_rate::kilogram_per_second,
    pressure::kilopascal,
    ratio::percent,
    thermodynamic_temperature::degree_celsius,
};

use crate::support::constraint::{ConstraintError, StrictlyPositive, UnitIntervalLowerOpen};

pub use config::{
    AirProperties, ConfigError, DryChannel, HumidifierConfig, MembraneProperties,
    PressureDropCoefficients, ProductSpec, SolverSettings, WetChannel, normalize_product_name,
};
pub use self::core::{
    Channel, DIVERGENCE_CEILING, Device, Fields, InletState, Mesh, PerStream, Performance,
    PortState, Solution, SolveError, SolverConfig, Stream, StreamPerformance, Transport,
};

use self::core::{Conditions, simulate, solve_fields};

/// Inlet state and mass flow of one stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InletConditions {
    pub mass_flow: MassRate,
    pub temperature: ThermodynamicTemperature,

    /// In (0, 100] %. A bone-dry inlet has no dew point, so 0 % is rejected.
    pub relative_humidity: Ratio,

    pub pressure: Pressure,
}

/// Inlet conditions of both streams.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    pub dry: InletConditions,
    pub wet: InletConditions,
}

/// Errors returned by [`Humidifier`].
#[derive(Debug, Error)]
pub enum HumidifierError {
    #[error("configuration error")]
    Config(#[from] ConfigError),

    #[error("invalid {context}")]
    InvalidInput {
        context: &'static str,
        #[source]
        source: ConstraintError,
    },

    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// A membrane humidifier stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Humidifier {
    device: Device,
    solver: SolverConfig,
}

impl Humidifier {
    /// Builds a humidifier of `layer_count` layers of a catalog product at a
    /// life-cycle stage, using the catalog's solver settings.
    ///
    /// # Errors
    ///
    /// - [`HumidifierError::Config`] if the product or stage is unknown, or
    ///   the product geometry or solver settings are invalid.
    /// - [`HumidifierError::InvalidInput`] if `layer_count` is zero.
    pub fn new(
        config: &HumidifierConfig,
        product: &str,
        layer_count: usize,
        life_cycle: &str,
    ) -> Result<Self, HumidifierError> {
        let layers = StrictlyPositive::new(layer_count).map_err(|source| {
            HumidifierError::InvalidInput {
                context: "layer count",
                source,
            }
        })?;
        let product = config.product(product)?;
        let life_cycle_factor = config.life_cycle_factor(life_cycle)?;

        Ok(Self {
            device: Device::new(config, product, layers, life_cycle_factor)?,
            solver: config.solver_config()?,
        })
    }

    /// Replaces the solver settings.
    #[must_use]
    pub fn with_solver(self, solver: SolverConfig) -> Self {
        Self { solver, ..self }
    }

    /// Returns the resolved device.
    #[must_use]
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Returns the solver settings in use.
    #[must_use]
    pub fn solver(&self) -> &SolverConfig {
        &self.solver
    }

    /// Predicts the humidifier's performance at an operating point.
    ///
    /// # Errors
    ///
    /// - [`HumidifierError::InvalidInput`] for a non-positive mass flow or
    ///   pressure, or a relative humidity outside (0, 100] %.
    /// - [`HumidifierError::Solve`] if the field solve fails.
    pub fn solve(&self, point: &OperatingPoint) -> Result<Performance, HumidifierError> {
        let conditions = conditions(point)?;
        Ok(simulate(&self.device, &conditions, &self.solver)?)
    }

    /// Solves the fields at an operating point without compiling a report.
    ///
    /// # Errors
    ///
    /// Same as [`Humidifier::solve`].
    pub fn solve_fields(&self, point: &OperatingPoint) -> Result<Solution, HumidifierError> {
        let conditions = conditions(point)?;
        Ok(solve_fields(&self.device, &conditions, &self.solver)?)
    }
}

impl Model for Humidifier {
    type Input = OperatingPoint;
    type Output = Performance;
    type Error = HumidifierError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.solve(input)
    }
}

/// Validates an operating point and converts it to field units.
fn conditions(point: &OperatingPoint) -> Result<Conditions, HumidifierError> {
    let (dry_flow, dry) = stream_conditions(
        &point.dry,
        ["dry mass flow", "dry pressure", "dry relative humidity"],
    )?;
    let (wet_flow, wet) = stream_conditions(
        &point.wet,
        ["wet mass flow", "wet pressure", "wet relative humidity"],
    )?;

    Ok(Conditions {
        mass_flow: PerStream::new(dry_flow, wet_flow),
        inlets: PerStream::new(dry, wet),
    })
}

fn stream_conditions(
    inlet: &InletConditions,
    [flow_context, pressure_context, humidity_context]: [&'static str; 3],
) -> Result<(f64, InletState), HumidifierError> {
    let invalid = |context| move |source| HumidifierError::InvalidInput { context, source };

    let mass_flow = StrictlyPositive::new(inlet.mass_flow.get::<kilogram_per_second>())
        .map_err(invalid(flow_context))?;
    let pressure = StrictlyPositive::new(inlet.pressure.get::<kilopascal>())
        .map_err(invalid(pressure_context))?;
    let relative_humidity = UnitIntervalLowerOpen::new(inlet.relative_humidity)
        .map_err(invalid(humidity_context))?;

    Ok((
        mass_flow.into_inner(),
        InletState {
            temperature: inlet.temperature.get::<degree_celsius>(),
            relative_humidity: relative_humidity.into_inner().get::<percent>(),
            pressure: pressure.into_inner(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::ratio::ratio;

    fn inlet(rh: f64) -> InletConditions {
        InletConditions {
            mass_flow: MassRate::new::<kilogram_per_second>(0.1),
            temperature: ThermodynamicTemperature::new::<degree_celsius>(80.0),
            relative_humidity: Ratio::new::<percent>(rh),
            pressure: Pressure::new::<kilopascal>(120.0),
        }
    }

    fn point() -> OperatingPoint {
        OperatingPoint {
            dry: inlet(10.0),
            wet: inlet(90.0),
        }
    }

    fn humidifier() -> Humidifier {
        let config = HumidifierConfig::bundled().unwrap();
        Humidifier::new(&config, "AX_150", 100, "BOL").unwrap()
    }

    #[test]
    fn model_call_matches_solve() {
        let humidifier = humidifier();
        let point = point();

        let via_model = humidifier.call(&point).unwrap();
        let direct = humidifier.solve(&point).unwrap();
        assert_eq!(via_model, direct);
    }

    #[test]
    fn aged_device_transfers_less_water() {
        let config = HumidifierConfig::bundled().unwrap();
        let fresh = Humidifier::new(&config, "AX_150", 100, "BOL").unwrap();
        let aged = Humidifier::new(&config, "AX_150", 100, "EOL").unwrap();

        let fresh = fresh.solve(&point()).unwrap().vapor_transport;
        let aged = aged.solve(&point()).unwrap().vapor_transport;
        assert!(aged < fresh);
    }

    #[test]
    fn converts_inputs_to_field_units() {
        let conditions = conditions(&point()).unwrap();

        assert_relative_eq!(conditions.mass_flow.dry, 0.1);
        assert_relative_eq!(conditions.inlets.dry.temperature, 80.0, epsilon = 1e-9);
        assert_relative_eq!(conditions.inlets.wet.relative_humidity, 90.0, epsilon = 1e-9);
        assert_relative_eq!(conditions.inlets.wet.pressure, 120.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_invalid_inputs() {
        let humidifier = humidifier();

        let mut too_humid = point();
        too_humid.wet.relative_humidity = Ratio::new::<ratio>(1.2);
        match humidifier.solve(&too_humid) {
            Err(HumidifierError::InvalidInput { context, source }) => {
                assert_eq!(context, "wet relative humidity");
                assert_eq!(source, ConstraintError::AboveMaximum);
            }
            other => panic!("expected invalid humidity, got {other:?}"),
        }

        let mut bone_dry = point();
        bone_dry.dry.relative_humidity = Ratio::new::<percent>(0.0);
        match humidifier.solve(&bone_dry) {
            Err(HumidifierError::InvalidInput { context, source }) => {
                assert_eq!(context, "dry relative humidity");
                assert_eq!(source, ConstraintError::BelowMinimum);
            }
            other => panic!("expected invalid humidity, got {other:?}"),
        }

        let mut no_flow = point();
        no_flow.dry.mass_flow = MassRate::new::<kilogram_per_second>(0.0);
        assert!(matches!(
            humidifier.solve(&no_flow),
            Err(HumidifierError::InvalidInput {
                context: "dry mass flow",
                ..
            })
        ));
    }

    #[test]
    fn construction_errors() {
        let config = HumidifierConfig::bundled().unwrap();

        assert!(matches!(
            Humidifier::new(&config, "AX_150", 0, "BOL"),
            Err(HumidifierError::InvalidInput {
                context: "layer count",
                ..
            })
        ));
        assert!(matches!(
            Humidifier::new(&config, "AX_999", 10, "BOL"),
            Err(HumidifierError::Config(ConfigError::UnknownProduct(_)))
        ));
        assert!(matches!(
            Humidifier::new(&config, "AX_150", 10, "new"),
            Err(HumidifierError::Config(ConfigError::UnknownLifeCycle(_)))
        ));
    }

    #[test]
    fn solver_failures_surface_as_solve_errors() {
        let solver = SolverConfig {
            max_iterations: StrictlyPositive::new(1).unwrap(),
            convergence_threshold: 0.0,
            ..SolverConfig::default()
        };
        let humidifier = humidifier().with_solver(solver);

        match humidifier.solve(&point()) {
            Err(HumidifierError::Solve(err @ SolveError::NotConverged { .. })) => {
                assert_eq!(err.iterations(), 1);
            }
            other => panic!("expected non-convergence, got {other:?}"),
        }
    }
}
