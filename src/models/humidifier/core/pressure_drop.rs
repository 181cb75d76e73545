use crate::models::humidifier::config::PressureDropCoefficients;

/// Standard liters per minute in one kg/s of air at 1.29 kg/m³.
const KG_PER_S_TO_SLPM: f64 = 60_000.0 / 1.29;

/// Pressure drop across one side of the stack, kPa, rounded to 0.1 kPa with
/// ties to even.
///
/// The flow is split evenly over `layers` and converted to standard liters
/// per minute before the quadratic correlation is applied.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn pressure_drop(
    mass_flow: f64,
    layers: usize,
    coefficients: &PressureDropCoefficients,
) -> f64 {
    let slpm = mass_flow / layers as f64 * KG_PER_S_TO_SLPM;
    let dp = coefficients.poly_coefficient * slpm * slpm + coefficients.line_coefficient * slpm;
    round_to_tenth(dp)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
