//! Performance report compiled from converged fields.

use std::fmt;

use ndarray::ArrayView1;
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{
        AvailableEnergy, MassRate, Pressure, Ratio, TemperatureInterval,
        ThermodynamicTemperature,
    },
    mass_rate::{gram_per_second, kilogram_per_second},
    pressure::kilopascal,
    ratio::{percent, ratio},
    temperature_interval,
    thermodynamic_temperature::degree_celsius,
};

use crate::support::psychro;

use super::{Fields, PerStream};

/// Bulk state of one stream at its inlet or outlet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortState {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
    pub relative_humidity: Ratio,

    /// Mass of water vapor per mass of dry air.
    pub humidity_ratio: Ratio,

    /// Enthalpy per mass of dry air.
    pub enthalpy: AvailableEnergy,

    pub dew_point: ThermodynamicTemperature,
}

/// Inlet and outlet states of one stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamPerformance {
    pub mass_flow: MassRate,
    pub pressure_drop: Pressure,
    pub inlet: PortState,
    pub outlet: PortState,
}

/// Humidifier performance at one operating point.
///
/// Values are unrounded; the [`Display`](fmt::Display) output rounds them
/// for reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Performance {
    pub dry: StreamPerformance,
    pub wet: StreamPerformance,

    /// Wet inlet dew point minus dry outlet dew point.
    pub dew_point_approach: TemperatureInterval,

    /// Water vapor picked up by the dry stream.
    pub vapor_transport: MassRate,

    /// Share of the wet inlet vapor recovered into the dry stream.
    pub water_recovery_ratio: Ratio,

    /// Spread between the highest and lowest port pressure.
    pub max_pressure_differential: Pressure,

    /// Solver iterations used.
    pub iterations: usize,
}

/// Port values in field units (°C, kPa, %, kg/kg, J/kg).
#[derive(Debug, Clone, Copy)]
struct Port {
    temperature: f64,
    pressure: f64,
    relative_humidity: f64,
    humidity_ratio: f64,
    enthalpy: f64,
    dew_point: f64,
}

impl Port {
    fn from_means(enthalpy: ArrayView1<'_, f64>, humidity: ArrayView1<'_, f64>, pressure: f64) -> Self {
        let enthalpy = mean(enthalpy);
        let humidity_ratio = mean(humidity);
        let temperature = psychro::temperature_from_enthalpy(enthalpy, humidity_ratio);
        let relative_humidity = psychro::relative_humidity(temperature, humidity_ratio, pressure);

        Self {
            temperature,
            pressure,
            relative_humidity,
            humidity_ratio,
            enthalpy,
            dew_point: psychro::dew_point(temperature, relative_humidity),
        }
    }

    fn to_state(self) -> PortState {
        PortState {
            temperature: ThermodynamicTemperature::new::<degree_celsius>(self.temperature),
            pressure: Pressure::new::<kilopascal>(self.pressure),
            relative_humidity: Ratio::new::<percent>(self.relative_humidity),
            humidity_ratio: Ratio::new::<ratio>(self.humidity_ratio),
            enthalpy: AvailableEnergy::new::<joule_per_kilogram>(self.enthalpy),
            dew_point: ThermodynamicTemperature::new::<degree_celsius>(self.dew_point),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: ArrayView1<'_, f64>) -> f64 {
    values.sum() / values.len() as f64
}

/// Operating data the report needs besides the fields.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Boundary {
    /// kg/s
    pub mass_flow: PerStream<f64>,
    /// Inlet pressure, kPa.
    pub pressure: PerStream<f64>,
    /// kPa
    pub pressure_drop: PerStream<f64>,
}

/// Reduces converged fields to inlet and outlet states and derived metrics.
///
/// Dry ports average over columns 0 and N-1, wet ports over rows 0 and N-1.
pub(crate) fn compile(fields: &Fields, iterations: usize, boundary: &Boundary) -> Performance {
    let e = &fields.enthalpy;
    let w = &fields.humidity_ratio;
    let p = &boundary.pressure;
    let dp = &boundary.pressure_drop;

    let dry_in = Port::from_means(Fields::dry_inlet(&e.dry), Fields::dry_inlet(&w.dry), p.dry);
    let dry_out = Port::from_means(
        Fields::dry_outlet(&e.dry),
        Fields::dry_outlet(&w.dry),
        p.dry - dp.dry,
    );
    let wet_in = Port::from_means(Fields::wet_inlet(&e.wet), Fields::wet_inlet(&w.wet), p.wet);
    let wet_out = Port::from_means(
        Fields::wet_outlet(&e.wet),
        Fields::wet_outlet(&w.wet),
        p.wet - dp.wet,
    );

    let flow = &boundary.mass_flow;
    let vapor_transport = flow.dry * (dry_out.humidity_ratio - dry_in.humidity_ratio);
    let recovery = vapor_transport / (flow.wet * wet_in.humidity_ratio) * 100.0;

    let pressures = [dry_in, dry_out, wet_in, wet_out].map(|port| port.pressure);
    let highest = pressures.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = pressures.iter().copied().fold(f64::INFINITY, f64::min);

    let stream = |mass_flow: f64, pressure_drop: f64, inlet: Port, outlet: Port| {
        StreamPerformance {
            mass_flow: MassRate::new::<kilogram_per_second>(mass_flow),
            pressure_drop: Pressure::new::<kilopascal>(pressure_drop),
            inlet: inlet.to_state(),
            outlet: outlet.to_state(),
        }
    };

    Performance {
        dry: stream(flow.dry, dp.dry, dry_in, dry_out),
        wet: stream(flow.wet, dp.wet, wet_in, wet_out),
        dew_point_approach: TemperatureInterval::new::<temperature_interval::kelvin>(
            wet_in.dew_point - dry_out.dew_point,
        ),
        vapor_transport: MassRate::new::<kilogram_per_second>(vapor_transport),
        water_recovery_ratio: Ratio::new::<percent>(recovery),
        max_pressure_differential: Pressure::new::<kilopascal>(highest - lowest),
        iterations,
    }
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T {:.1} °C, P {:.1} kPa, RH {:.1} %, w {:.3}, h {:.0} J/kg, TD {:.1} °C",
            self.temperature.get::<degree_celsius>(),
            self.pressure.get::<kilopascal>(),
            self.relative_humidity.get::<percent>(),
            self.humidity_ratio.get::<ratio>(),
            self.enthalpy.get::<joule_per_kilogram>(),
            self.dew_point.get::<degree_celsius>(),
        )
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, stream) in [("dry", &self.dry), ("wet", &self.wet)] {
            writeln!(
                f,
                "{name}: {:.4} kg/s, pressure drop {:.1} kPa",
                stream.mass_flow.get::<kilogram_per_second>(),
                stream.pressure_drop.get::<kilopascal>(),
            )?;
            writeln!(f, "  inlet:  {}", stream.inlet)?;
            writeln!(f, "  outlet: {}", stream.outlet)?;
        }
        writeln!(
            f,
            "dew point approach: {:.1} K",
            self.dew_point_approach.get::<temperature_interval::kelvin>()
        )?;
        writeln!(
            f,
            "vapor transport: {:.2} g/s",
            self.vapor_transport.get::<gram_per_second>()
        )?;
        writeln!(
            f,
            "water recovery ratio: {:.1} %",
            self.water_recovery_ratio.get::<percent>()
        )?;
        writeln!(
            f,
            "max pressure differential: {:.1} kPa",
            self.max_pressure_differential.get::<kilopascal>()
        )?;
        write!(f, "iterations: {}", self.iterations)
    }
}
