//! Local heat and mass transfer through the membrane.

use ndarray::{Array2, Zip};

use crate::models::humidifier::core::Fields;

use super::Transport;

/// Per-cell heat flux (W) and vapor mass flux (kg/s) through the membrane.
///
/// Positive values denote transfer from the wet stream to the dry stream.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Fluxes {
    pub heat: Array2<f64>,
    pub mass: Array2<f64>,
}

impl Fluxes {
    pub(crate) fn zeros(size: usize) -> Self {
        Self {
            heat: Array2::zeros((size, size)),
            mass: Array2::zeros((size, size)),
        }
    }

    /// Evaluates both fluxes from the current field snapshot.
    ///
    /// Heat flux is driven by the temperature difference and mass flux by the
    /// vapor density difference `w / v` across the membrane, each divided by
    /// its lumped resistance and derated by the life-cycle factor.
    pub(crate) fn evaluate(&mut self, fields: &Fields, transport: &Transport) {
        let heat_resistance = transport.heat_resistance;
        let mass_resistance = transport.mass_resistance;
        let derating = transport.life_cycle_factor.get();

        Zip::from(&mut self.heat)
            .and(&fields.temperature.wet)
            .and(&fields.temperature.dry)
            .for_each(|q, &t_wet, &t_dry| {
                *q = (t_wet - t_dry) / heat_resistance * derating;
            });

        Zip::from(&mut self.mass)
            .and(&fields.humidity_ratio.wet)
            .and(&fields.specific_volume.wet)
            .and(&fields.humidity_ratio.dry)
            .and(&fields.specific_volume.dry)
            .for_each(|m, &w_wet, &v_wet, &w_dry, &v_dry| {
                *m = (w_wet / v_wet - w_dry / v_dry) / mass_resistance * derating;
            });
    }
}
