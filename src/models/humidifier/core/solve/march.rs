//! Forward marching of the tracked fields along each stream's flow direction.
//!
//! Both marchers read only the previous-iteration fields and the flux arrays,
//! so they are independent of each other within an iteration.

use ndarray::{Array2, Zip, s};

use crate::{
    models::humidifier::core::{Fields, PerStream},
    support::psychro,
};

use super::{Fluxes, Transport};

/// Proposed humidity ratio and enthalpy fields produced by the marchers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Proposal {
    pub humidity_ratio: PerStream<Array2<f64>>,
    pub enthalpy: PerStream<Array2<f64>>,
}

impl Proposal {
    pub(crate) fn zeros(size: usize) -> Self {
        let zeros = || Array2::zeros((size, size));
        Self {
            humidity_ratio: PerStream::new(zeros(), zeros()),
            enthalpy: PerStream::new(zeros(), zeros()),
        }
    }

    /// Runs both marchers against the same snapshot.
    pub(crate) fn march(&mut self, fields: &Fields, fluxes: &Fluxes, transport: &Transport) {
        self.march_dry(fields, fluxes, transport.dry_row_flow());
        self.march_wet(fields, fluxes, transport.channel_flow.wet);
    }

    /// Marches the dry stream along the columns.
    ///
    /// Column `c` is built from column `c - 1` of the fluxes and previous
    /// fields; column 0 is copied unchanged.
    fn march_dry(&mut self, fields: &Fields, fluxes: &Fluxes, row_flow: f64) {
        let w = &mut self.humidity_ratio.dry;
        let e = &mut self.enthalpy.dry;

        w.column_mut(0).assign(&fields.humidity_ratio.dry.column(0));
        e.column_mut(0).assign(&fields.enthalpy.dry.column(0));

        let upstream = s![.., ..-1];

        Zip::from(w.slice_mut(s![.., 1..]))
            .and(fluxes.mass.slice(upstream))
            .and(fields.humidity_ratio.dry.slice(upstream))
            .for_each(|w, &m, &w_prev| {
                *w = 2.0 * m / row_flow + w_prev;
            });

        Zip::from(e.slice_mut(s![.., 1..]))
            .and(fluxes.mass.slice(upstream))
            .and(fluxes.heat.slice(upstream))
            .and(fields.temperature.wet.slice(upstream))
            .and(fields.temperature.dry.slice(upstream))
            .and(fields.enthalpy.dry.slice(upstream))
            .for_each(|e, &m, &q, &t_wet, &t_dry, &e_prev| {
                let h_vap = psychro::vaporization_enthalpy(0.5 * (t_wet + t_dry));
                *e = 2.0 * (m * h_vap + q) / row_flow + e_prev;
            });
    }

    /// Marches the wet stream along the rows, losing what the dry stream gains.
    ///
    /// Row `r` is built from row `r - 1`; row 0 is copied unchanged.
    fn march_wet(&mut self, fields: &Fields, fluxes: &Fluxes, channel_flow: f64) {
        let w = &mut self.humidity_ratio.wet;
        let e = &mut self.enthalpy.wet;

        w.row_mut(0).assign(&fields.humidity_ratio.wet.row(0));
        e.row_mut(0).assign(&fields.enthalpy.wet.row(0));

        let upstream = s![..-1, ..];

        Zip::from(w.slice_mut(s![1.., ..]))
            .and(fluxes.mass.slice(upstream))
            .and(fields.humidity_ratio.wet.slice(upstream))
            .for_each(|w, &m, &w_prev| {
                *w = -2.0 * m / channel_flow + w_prev;
            });

        Zip::from(e.slice_mut(s![1.., ..]))
            .and(fluxes.mass.slice(upstream))
            .and(fluxes.heat.slice(upstream))
            .and(fields.temperature.wet.slice(upstream))
            .and(fields.temperature.dry.slice(upstream))
            .and(fields.enthalpy.wet.slice(upstream))
            .for_each(|e, &m, &q, &t_wet, &t_dry, &e_prev| {
                let h_vap = psychro::vaporization_enthalpy(0.5 * (t_wet + t_dry));
                *e = -2.0 * (m * h_vap + q) / channel_flow + e_prev;
            });
    }
}
