//! Committing proposals to the working fields.

use ndarray::{Array2, Zip};

use crate::{
    models::humidifier::core::{Fields, PerStream, Stream},
    support::psychro,
};

use super::Proposal;

/// Returns the largest absolute difference between the proposal and the
/// current tracked fields.
///
/// Any NaN difference makes the result NaN.
pub(crate) fn max_change(fields: &Fields, proposal: &Proposal) -> f64 {
    Stream::ALL
        .into_iter()
        .flat_map(|stream| {
            [
                (
                    fields.humidity_ratio.get(stream),
                    proposal.humidity_ratio.get(stream),
                ),
                (fields.enthalpy.get(stream), proposal.enthalpy.get(stream)),
            ]
        })
        .map(|(current, proposed)| max_abs_difference(current, proposed))
        .fold(0.0, nan_max)
}

fn max_abs_difference(current: &Array2<f64>, proposed: &Array2<f64>) -> f64 {
    Zip::from(current)
        .and(proposed)
        .fold(0.0, |acc, &x, &p| nan_max(acc, (p - x).abs()))
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Moves each tracked field toward its proposal by `factor`.
///
/// A factor of one assigns the proposal exactly.
pub(crate) fn relax(fields: &mut Fields, proposal: &Proposal, factor: f64) {
    for stream in Stream::ALL {
        relax_field(
            fields.humidity_ratio.get_mut(stream),
            proposal.humidity_ratio.get(stream),
            factor,
        );
        relax_field(
            fields.enthalpy.get_mut(stream),
            proposal.enthalpy.get(stream),
            factor,
        );
    }
}

#[allow(clippy::float_cmp)]
fn relax_field(field: &mut Array2<f64>, proposed: &Array2<f64>, factor: f64) {
    if factor == 1.0 {
        field.assign(proposed);
        return;
    }
    Zip::from(field).and(proposed).for_each(|x, &p| {
        *x += factor * (p - *x);
    });
}

/// Re-derives temperature and relative humidity from the tracked fields.
pub(crate) fn refresh(fields: &mut Fields, pressure: &PerStream<f64>) {
    for stream in Stream::ALL {
        let p = *pressure.get(stream);

        Zip::from(fields.temperature.get_mut(stream))
            .and(fields.enthalpy.get(stream))
            .and(fields.humidity_ratio.get(stream))
            .for_each(|t, &e, &w| *t = psychro::temperature_from_enthalpy(e, w));

        Zip::from(fields.relative_humidity.get_mut(stream))
            .and(fields.temperature.get(stream))
            .and(fields.humidity_ratio.get(stream))
            .for_each(|rh, &t, &w| *rh = psychro::relative_humidity(t, w, p));
    }
}
