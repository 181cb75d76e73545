//! Moist-air psychrometric relations.
//!
//! All functions work on plain `f64` values in a fixed set of units, which
//! is what the humidifier field arrays store:
//!
//! | Quantity            | Unit              |
//! |---------------------|-------------------|
//! | Temperature         | °C                |
//! | Relative humidity   | %                 |
//! | Pressure            | kPa               |
//! | Humidity ratio      | kg water / kg dry |
//! | Enthalpy            | J / kg dry        |
//! | Specific volume     | m³ / kg dry       |
//! | Dynamic viscosity   | kg / m·s          |
//!
//! ```
//! use humidifier_models::support::psychro;
//!
//! let w = psychro::humidity_ratio(80.0, 90.0, 120.0);
//! let e = psychro::enthalpy(80.0, w);
//! assert!((psychro::temperature_from_enthalpy(e, w) - 80.0).abs() < 1e-9);
//! ```

/// Ratio of the molar masses of water vapor and dry air.
const MOLAR_MASS_RATIO: f64 = 0.622;

/// Specific gas constant of dry air, J/kg·K.
const DRY_AIR_GAS_CONSTANT: f64 = 287.0;

/// Offset between the Celsius and Kelvin scales.
const KELVIN_OFFSET: f64 = 273.15;

/// Saturation vapor pressure in kPa at temperature `t`.
#[must_use]
pub fn saturation_vapor_pressure(t: f64) -> f64 {
    0.61121 * ((18.678 - t / 234.5) * (t / (257.14 + t))).exp()
}

/// Humidity ratio of air at temperature `t`, relative humidity `rh` and pressure `p`.
#[must_use]
pub fn humidity_ratio(t: f64, rh: f64, p: f64) -> f64 {
    let pg = saturation_vapor_pressure(t);
    MOLAR_MASS_RATIO * rh * pg / 100.0 / (p - pg * rh / 100.0)
}

/// Enthalpy of moist air per unit mass of dry air.
#[must_use]
pub fn enthalpy(t: f64, w: f64) -> f64 {
    (1.006 * t + w * (2501.0 + 1.86 * t)) * 1000.0
}

/// Temperature of moist air with enthalpy `e` and humidity ratio `w`.
///
/// Inverse of [`enthalpy`] in temperature.
#[must_use]
pub fn temperature_from_enthalpy(e: f64, w: f64) -> f64 {
    (e / 1000.0 - 2501.0 * w) / (1.006 + 1.86 * w)
}

/// Relative humidity of air with humidity ratio `w` at temperature `t` and pressure `p`.
#[must_use]
pub fn relative_humidity(t: f64, w: f64, p: f64) -> f64 {
    let pg = saturation_vapor_pressure(t);
    (w * p / (MOLAR_MASS_RATIO + w) / pg) * 100.0
}

/// Relative humidity of air at temperature `t` with dew point `td`.
#[must_use]
pub fn relative_humidity_from_dew_point(t: f64, td: f64) -> f64 {
    100.0 * ((17.625 * td) / (243.04 + td)).exp() / ((17.625 * t) / (243.04 + t)).exp()
}

/// Dew point temperature of air at temperature `t` and relative humidity `rh`.
#[must_use]
pub fn dew_point(t: f64, rh: f64) -> f64 {
    const B: f64 = 17.62;
    const C: f64 = 243.12;
    let gamma = (rh / 100.0).ln() + (B * t) / (C + t);
    C * gamma / (B - gamma)
}

/// Enthalpy of vaporization of water in J/kg at temperature `t`.
#[must_use]
pub fn vaporization_enthalpy(t: f64) -> f64 {
    (2501.0 + 1.86 * t) * 1000.0
}

/// Specific volume of moist air per unit mass of dry air.
#[must_use]
pub fn specific_volume(t: f64, w: f64, p: f64) -> f64 {
    DRY_AIR_GAS_CONSTANT * (KELVIN_OFFSET + t) * (1.0 + w / MOLAR_MASS_RATIO) / (p * 1000.0)
}

/// Dynamic viscosity of air at temperature `t`.
#[must_use]
pub fn viscosity(t: f64) -> f64 {
    2.8e-7 * (t + KELVIN_OFFSET).powf(0.735_476)
}

/// Reynolds number of a channel flow.
///
/// Takes the mass flow (kg/s), hydraulic diameter (m), flow cross-section (m²)
/// and dynamic viscosity (kg/m·s).
#[must_use]
pub fn reynolds(mass_flow: f64, hydraulic_diameter: f64, area: f64, viscosity: f64) -> f64 {
    mass_flow * hydraulic_diameter / area / viscosity
}

/// Nusselt number of developing laminar flow in a rectangular channel.
///
/// The fully developed term is a polynomial in the aspect ratio
/// `pitch / width`; the entry term grows with `Re·Pr·Dh/L` with `Pr = 0.7`.
#[must_use]
pub fn nusselt(pitch: f64, width: f64, length: f64, hydraulic_diameter: f64, reynolds: f64) -> f64 {
    let ar = pitch / width;

    let developed = (8.234
        * (1.0 - 2.0421 * ar + 3.0853 * ar.powi(2) - 2.4765 * ar.powi(3) + 1.0578 * ar.powi(4)
            - 0.01861 * ar.powi(5)))
    .powi(2);
    let entry = (1.615 * reynolds * 0.7 * hydraulic_diameter / length).powi(2);

    (developed + entry).sqrt()
}
