//! Device geometry and transport precomputation.

use crate::{
    models::humidifier::config::{
        AirProperties, ConfigError, HumidifierConfig, MembraneProperties,
        PressureDropCoefficients, ProductSpec,
    },
    support::{
        constraint::{Constrained, StrictlyPositive, UnitIntervalLowerOpen},
        psychro,
    },
};

use super::{InletState, PerStream, Transport};

/// Channel counts and solver grid size of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    /// Physical channels per layer on each side.
    pub channels: PerStream<usize>,

    /// Side length N of the square solver grid.
    pub size: usize,

    /// Membrane area of one grid cell, m².
    pub transfer_area: f64,
}

impl Mesh {
    /// Derives the mesh from a product's channel geometry.
    ///
    /// The grid size is the wet channel count rounded to a whole multiple of
    /// the dry channel count.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DegenerateMesh`] if either side has no channels
    /// or the grid would be smaller than 2×2.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(product: &ProductSpec) -> Result<Self, ConfigError> {
        let dry = &product.dry;
        let wet = &product.wet;

        let dry_channels = (dry.length / dry.width).floor().max(0.0) as usize;
        let wet_length = wet.length - 2.0 * wet.edge_thickness + wet.wall_thickness;
        let wet_channels = (wet_length / (wet.width + wet.wall_thickness))
            .floor()
            .max(0.0) as usize;

        let size = if dry_channels == 0 {
            0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let ratio = wet_channels as f64 / dry_channels as f64;
            ratio.round_ties_even() as usize * dry_channels
        };

        if dry_channels == 0 || wet_channels == 0 || size < 2 {
            return Err(ConfigError::DegenerateMesh {
                dry_channels,
                wet_channels,
                size,
            });
        }

        Ok(Self {
            channels: PerStream::new(dry_channels, wet_channels),
            size,
            transfer_area: wet.width * wet.width,
        })
    }

    /// Grid rows per physical dry channel.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn dry_scale(&self) -> f64 {
        self.size as f64 / self.channels.dry as f64
    }
}

/// Cross-section of one flow channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
    pub pitch: f64,
    pub width: f64,
    pub length: f64,

    /// Flow area, m².
    pub area: f64,

    /// Hydraulic diameter, m.
    pub hydraulic_diameter: f64,
}

impl Channel {
    fn new(pitch: f64, width: f64, length: f64) -> Self {
        Self {
            pitch,
            width,
            length,
            area: pitch * width,
            hydraulic_diameter: 2.0 * pitch * width / (pitch + width),
        }
    }

    /// Convective heat and mass transfer coefficients for a channel flow.
    ///
    /// Returns `(h, k_m)` in W/m²·K and m/s.
    fn convection(&self, flow: f64, inlet: &InletState, air: &AirProperties) -> (f64, f64) {
        let w = psychro::humidity_ratio(inlet.temperature, inlet.relative_humidity, inlet.pressure);
        let v = psychro::specific_volume(inlet.temperature, w, inlet.pressure);

        let re = psychro::reynolds(
            flow,
            self.hydraulic_diameter,
            self.area,
            psychro::viscosity(inlet.temperature),
        );
        let nu = psychro::nusselt(
            self.pitch,
            self.width,
            self.length,
            self.hydraulic_diameter,
            re,
        );

        let h = nu * air.thermal_conductivity / self.hydraulic_diameter;
        let k_m = h * v / air.heat_capacity * air.lewis_number.powf(-2.0 / 3.0);
        (h, k_m)
    }
}

/// A product resolved against a catalog for a given stack height and age.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Device {
    pub mesh: Mesh,
    pub channels: PerStream<Channel>,
    pub layers: Constrained<usize, StrictlyPositive>,
    pub life_cycle_factor: Constrained<f64, UnitIntervalLowerOpen>,
    pub pressure_drop: PerStream<PressureDropCoefficients>,
    air: AirProperties,
    membrane: MembraneProperties,
}

impl Device {
    /// Builds the device from catalog data.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DegenerateMesh`] if the product geometry does
    /// not produce a usable grid.
    pub fn new(
        config: &HumidifierConfig,
        product: &ProductSpec,
        layers: Constrained<usize, StrictlyPositive>,
        life_cycle_factor: Constrained<f64, UnitIntervalLowerOpen>,
    ) -> Result<Self, ConfigError> {
        let dry = &product.dry;
        let wet = &product.wet;

        Ok(Self {
            mesh: Mesh::new(product)?,
            channels: PerStream::new(
                Channel::new(dry.pitch, dry.width, dry.length),
                Channel::new(wet.pitch, wet.width, wet.length),
            ),
            layers,
            life_cycle_factor,
            pressure_drop: product.pressure_drop,
            air: config.air,
            membrane: config.membrane,
        })
    }

    /// Mass flow through one channel of each side, kg/s.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn channel_flow(&self, mass_flow: &PerStream<f64>) -> PerStream<f64> {
        let layers = self.layers.get() as f64;
        PerStream::new(
            mass_flow.dry / layers / self.mesh.channels.dry as f64,
            mass_flow.wet / layers / self.mesh.channels.wet as f64,
        )
    }

    /// Precomputes the solver's transport parameters for an operating point.
    ///
    /// Convection coefficients are evaluated at each stream's inlet state and
    /// combined in series with the membrane.
    #[must_use]
    pub fn transport(
        &self,
        mass_flow: &PerStream<f64>,
        inlets: &PerStream<InletState>,
    ) -> Transport {
        let channel_flow = self.channel_flow(mass_flow);

        let (h_dry, k_dry) = self
            .channels
            .dry
            .convection(channel_flow.dry, &inlets.dry, &self.air);
        let (h_wet, k_wet) = self
            .channels
            .wet
            .convection(channel_flow.wet, &inlets.wet, &self.air);

        let membrane = &self.membrane;
        let area = self.mesh.transfer_area;

        Transport {
            channel_flow,
            dry_scale: self.mesh.dry_scale(),
            pressure: inlets.map(|inlet| inlet.pressure),
            heat_resistance: (1.0 / h_dry
                + 1.0 / h_wet
                + membrane.thickness / membrane.thermal_conductivity)
                / area,
            mass_resistance: (1.0 / k_dry + 1.0 / k_wet + membrane.mass_transfer_resistance)
                / area,
            life_cycle_factor: self.life_cycle_factor,
        }
    }
}
