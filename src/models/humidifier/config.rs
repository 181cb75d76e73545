//! Device catalog and model constants.
//!
//! A catalog is a TOML document listing product geometries, air and membrane
//! properties, solver settings and life-cycle derating factors. The catalog
//! shipped with the crate is available through [`HumidifierConfig::bundled`].

mod error;

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

pub use error::ConfigError;

use crate::support::constraint::{
    Constrained, StrictlyPositive, UnitIntervalLowerOpen,
};

use super::core::{PerStream, SolverConfig};

const BUNDLED: &str = include_str!("../../../config/humidifier.toml");

/// A humidifier catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HumidifierConfig {
    pub solver: SolverSettings,
    pub air: AirProperties,
    pub membrane: MembraneProperties,

    /// Derating factor per life-cycle stage, in (0, 1].
    pub life_cycle: BTreeMap<String, f64>,

    pub products: BTreeMap<String, ProductSpec>,
}

/// Solver settings as stored in a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverSettings {
    pub max_iterations: usize,
    pub convergence_threshold: f64,
    pub relaxation_factor: f64,
}

/// Transport properties of humid air.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AirProperties {
    /// W/m·K
    pub thermal_conductivity: f64,
    /// J/kg·K
    pub heat_capacity: f64,
    pub lewis_number: f64,
}

/// Membrane properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MembraneProperties {
    /// m
    pub thickness: f64,
    /// W/m·K
    pub thermal_conductivity: f64,
    /// s/m
    pub mass_transfer_resistance: f64,
}

/// Geometry and pressure-drop correlation of one product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductSpec {
    pub dry: DryChannel,
    pub wet: WetChannel,
    pub pressure_drop: PerStream<PressureDropCoefficients>,
}

/// Dry side channel dimensions, m.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DryChannel {
    pub pitch: f64,
    pub width: f64,
    pub length: f64,
}

/// Wet side channel dimensions, m.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WetChannel {
    pub pitch: f64,
    pub width: f64,
    pub length: f64,
    pub edge_thickness: f64,
    pub wall_thickness: f64,
}

/// Coefficients of `Δp = poly · slpm² + line · slpm` (kPa).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PressureDropCoefficients {
    pub poly_coefficient: f64,
    pub line_coefficient: f64,
}

impl HumidifierConfig {
    /// Loads the catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the bundled catalog fails to parse or validate.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUNDLED)
    }

    /// Parses and validates a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::InvalidValue`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`HumidifierConfig::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Looks up a product by name.
    ///
    /// Known product names are matched loosely (see [`normalize_product_name`]);
    /// anything else must match a catalog key exactly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProduct`] if no product matches.
    pub fn product(&self, name: &str) -> Result<&ProductSpec, ConfigError> {
        self.products
            .get(&normalize_product_name(name))
            .ok_or_else(|| ConfigError::UnknownProduct(name.to_owned()))
    }

    /// Returns the derating factor of a life-cycle stage.
    ///
    /// Stage names are matched exactly, then in upper case.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownLifeCycle`] for an unknown stage, or
    /// [`ConfigError::InvalidValue`] if its factor is outside (0, 1].
    pub fn life_cycle_factor(
        &self,
        stage: &str,
    ) -> Result<Constrained<f64, UnitIntervalLowerOpen>, ConfigError> {
        let factor = self
            .life_cycle
            .get(stage)
            .or_else(|| self.life_cycle.get(&stage.to_ascii_uppercase()))
            .ok_or_else(|| ConfigError::UnknownLifeCycle(stage.to_owned()))?;

        UnitIntervalLowerOpen::new(*factor)
            .map_err(|source| ConfigError::invalid(format!("life_cycle.{stage}"), source))
    }

    /// Builds the solver configuration from the `[solver]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if any setting is out of range.
    pub fn solver_config(&self) -> Result<SolverConfig, ConfigError> {
        let settings = &self.solver;

        let max_iterations = StrictlyPositive::new(settings.max_iterations)
            .map_err(|source| ConfigError::invalid("solver.max_iterations", source))?;
        StrictlyPositive::new(settings.convergence_threshold)
            .map_err(|source| ConfigError::invalid("solver.convergence_threshold", source))?;
        let relaxation_factor = UnitIntervalLowerOpen::new(settings.relaxation_factor)
            .map_err(|source| ConfigError::invalid("solver.relaxation_factor", source))?;

        Ok(SolverConfig {
            max_iterations,
            convergence_threshold: settings.convergence_threshold,
            relaxation_factor,
        })
    }

    /// Checks every value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.solver_config()?;

        let air = &self.air;
        positive("air.thermal_conductivity", air.thermal_conductivity)?;
        positive("air.heat_capacity", air.heat_capacity)?;
        positive("air.lewis_number", air.lewis_number)?;

        let membrane = &self.membrane;
        positive("membrane.thickness", membrane.thickness)?;
        positive("membrane.thermal_conductivity", membrane.thermal_conductivity)?;
        positive(
            "membrane.mass_transfer_resistance",
            membrane.mass_transfer_resistance,
        )?;

        for stage in self.life_cycle.keys() {
            self.life_cycle_factor(stage)?;
        }

        for (name, product) in &self.products {
            product.validate(name)?;
        }

        Ok(())
    }
}

impl ProductSpec {
    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let dry = &self.dry;
        let wet = &self.wet;
        for (field, value) in [
            ("dry.pitch", dry.pitch),
            ("dry.width", dry.width),
            ("dry.length", dry.length),
            ("wet.pitch", wet.pitch),
            ("wet.width", wet.width),
            ("wet.length", wet.length),
            ("wet.edge_thickness", wet.edge_thickness),
            ("wet.wall_thickness", wet.wall_thickness),
        ] {
            positive(&format!("products.{name}.{field}"), value)?;
        }
        Ok(())
    }
}

fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
    StrictlyPositive::new(value)
        .map(|_| ())
        .map_err(|source| ConfigError::invalid(key, source))
}

/// Maps loose spellings of known product names to their catalog keys.
///
/// `ax150`, `AX-150`, `ax 150` and `ax_150` all become `AX_150` (likewise
/// for `AX_100`). Any other name is returned unchanged.
#[must_use]
pub fn normalize_product_name(name: &str) -> String {
    let compact: String = name
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    match compact.as_str() {
        "AX150" => "AX_150".to_owned(),
        "AX100" => "AX_100".to_owned(),
        _ => name.to_owned(),
    }
}
