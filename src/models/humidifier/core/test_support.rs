use crate::support::constraint::UnitIntervalLowerOpen;

use super::{InletState, PerStream, Transport};

/// Dry inlet at 80 °C / 10 % RH and wet inlet at 80 °C / 90 % RH, both at 120 kPa.
pub(super) fn inlets() -> PerStream<InletState> {
    PerStream::new(
        InletState {
            temperature: 80.0,
            relative_humidity: 10.0,
            pressure: 120.0,
        },
        InletState {
            temperature: 80.0,
            relative_humidity: 90.0,
            pressure: 120.0,
        },
    )
}

/// Transport parameters close to a 20-channel device meshed at twice its channel count.
pub(super) fn transport() -> Transport {
    Transport {
        channel_flow: PerStream::new(5.0e-5, 2.6e-5),
        dry_scale: 2.0,
        pressure: PerStream::new(120.0, 120.0),
        heat_resistance: 1500.0,
        mass_resistance: 5.0e6,
        life_cycle_factor: UnitIntervalLowerOpen::one(),
    }
}
