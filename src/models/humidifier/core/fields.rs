//! Field storage and the uniform domain initializer.

use ndarray::Array2;

use crate::support::psychro;

use super::PerStream;

/// Inlet state of one stream, in field units (°C, %, kPa).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InletState {
    pub temperature: f64,
    pub relative_humidity: f64,
    pub pressure: f64,
}

/// The N×N property fields of both streams.
///
/// Both streams share one square grid. The dry stream flows along the
/// columns (column 0 is its inlet) and the wet stream along the rows
/// (row 0 is its inlet), so the exchanger is in cross flow.
///
/// `humidity_ratio` and `enthalpy` are the tracked fields advanced by the
/// solver. `temperature` and `relative_humidity` are derived from them after
/// every iteration. `specific_volume` is fixed for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    /// Humidity ratio, kg water / kg dry air.
    pub humidity_ratio: PerStream<Array2<f64>>,

    /// Enthalpy, J / kg dry air.
    pub enthalpy: PerStream<Array2<f64>>,

    /// Temperature, °C.
    pub temperature: PerStream<Array2<f64>>,

    /// Relative humidity, %.
    pub relative_humidity: PerStream<Array2<f64>>,

    /// Specific volume, m³ / kg dry air.
    pub specific_volume: PerStream<Array2<f64>>,
}

impl Fields {
    /// Fills an `size`×`size` grid with each stream's inlet state.
    ///
    /// The dry inlet column and wet inlet row keep these values for the
    /// whole solve; every other cell is only a starting guess.
    #[must_use]
    pub fn uniform(size: usize, inlets: &PerStream<InletState>) -> Self {
        let shape = (size, size);
        let humidity = inlets.map(|inlet| {
            psychro::humidity_ratio(inlet.temperature, inlet.relative_humidity, inlet.pressure)
        });

        Self {
            humidity_ratio: humidity.map(|w| Array2::from_elem(shape, w)),
            enthalpy: PerStream::new(
                Array2::from_elem(shape, psychro::enthalpy(inlets.dry.temperature, humidity.dry)),
                Array2::from_elem(shape, psychro::enthalpy(inlets.wet.temperature, humidity.wet)),
            ),
            temperature: inlets.map(|inlet| Array2::from_elem(shape, inlet.temperature)),
            relative_humidity: inlets.map(|inlet| Array2::from_elem(shape, inlet.relative_humidity)),
            specific_volume: PerStream::new(
                Array2::from_elem(
                    shape,
                    psychro::specific_volume(inlets.dry.temperature, humidity.dry, inlets.dry.pressure),
                ),
                Array2::from_elem(
                    shape,
                    psychro::specific_volume(inlets.wet.temperature, humidity.wet, inlets.wet.pressure),
                ),
            ),
        }
    }

    /// Returns the grid size N.
    #[must_use]
    pub fn size(&self) -> usize {
        self.humidity_ratio.dry.nrows()
    }

    /// Dry stream inlet values of a dry field (column 0).
    pub(crate) fn dry_inlet(field: &Array2<f64>) -> ndarray::ArrayView1<'_, f64> {
        field.column(0)
    }

    /// Dry stream outlet values of a dry field (column N-1).
    pub(crate) fn dry_outlet(field: &Array2<f64>) -> ndarray::ArrayView1<'_, f64> {
        field.column(field.ncols() - 1)
    }

    /// Wet stream inlet values of a wet field (row 0).
    pub(crate) fn wet_inlet(field: &Array2<f64>) -> ndarray::ArrayView1<'_, f64> {
        field.row(0)
    }

    /// Wet stream outlet values of a wet field (row N-1).
    pub(crate) fn wet_outlet(field: &Array2<f64>) -> ndarray::ArrayView1<'_, f64> {
        field.row(field.nrows() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::humidifier::core::test_support::inlets;

    #[test]
    fn fills_every_cell_with_inlet_state() {
        let fields = Fields::uniform(4, &inlets());

        assert_eq!(fields.size(), 4);
        assert_eq!(fields.humidity_ratio.wet.dim(), (4, 4));

        let w_dry = psychro::humidity_ratio(80.0, 10.0, 120.0);
        assert!(fields.humidity_ratio.dry.iter().all(|&w| w == w_dry));
        assert!(fields.temperature.wet.iter().all(|&t| t == 80.0));
        assert!(fields.relative_humidity.wet.iter().all(|&rh| rh == 90.0));
        assert_relative_eq!(
            fields.enthalpy.dry[[2, 3]],
            psychro::enthalpy(80.0, w_dry)
        );
    }

    #[test]
    fn wet_air_is_less_dense_than_dry_air() {
        let fields = Fields::uniform(2, &inlets());
        assert!(fields.specific_volume.wet[[0, 0]] > fields.specific_volume.dry[[0, 0]]);
    }

    #[test]
    fn inlet_and_outlet_slices_follow_flow_directions() {
        let mut field = Array2::zeros((3, 3));
        field[[1, 0]] = 1.0;
        field[[1, 2]] = 2.0;
        field[[0, 1]] = 3.0;
        field[[2, 1]] = 4.0;

        assert_eq!(Fields::dry_inlet(&field)[1], 1.0);
        assert_eq!(Fields::dry_outlet(&field)[1], 2.0);
        assert_eq!(Fields::wet_inlet(&field)[1], 3.0);
        assert_eq!(Fields::wet_outlet(&field)[1], 4.0);
    }
}
