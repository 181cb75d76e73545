use std::path::Path;

use approx::assert_relative_eq;
use humidifier_models::models::humidifier::{
    Humidifier, HumidifierConfig, HumidifierError, InletConditions, OperatingPoint, SolveError,
    SolverConfig,
};
use humidifier_models::support::constraint::StrictlyPositive;
use twine_core::Model;
use uom::si::{
    f64::{MassRate, Pressure, Ratio, ThermodynamicTemperature},
    mass_rate::kilogram_per_second,
    pressure::kilopascal,
    ratio::{percent, ratio},
    temperature_interval,
    thermodynamic_temperature::degree_celsius,
};

fn inlet(temperature: f64, rh: f64) -> InletConditions {
    InletConditions {
        mass_flow: MassRate::new::<kilogram_per_second>(0.1),
        temperature: ThermodynamicTemperature::new::<degree_celsius>(temperature),
        relative_humidity: Ratio::new::<percent>(rh),
        pressure: Pressure::new::<kilopascal>(120.0),
    }
}

fn reference_point() -> OperatingPoint {
    OperatingPoint {
        dry: inlet(80.0, 10.0),
        wet: inlet(80.0, 90.0),
    }
}

#[test]
fn reference_operating_point_converges_and_humidifies() {
    let config = HumidifierConfig::bundled().unwrap();
    let humidifier = Humidifier::new(&config, "AX_150", 100, "BOL").unwrap();

    let performance = humidifier.call(&reference_point()).unwrap();

    let dry = &performance.dry;
    let wet = &performance.wet;
    assert!(dry.outlet.humidity_ratio > dry.inlet.humidity_ratio);
    assert!(wet.outlet.humidity_ratio < wet.inlet.humidity_ratio);
    assert!(dry.outlet.dew_point > dry.inlet.dew_point);

    let recovery = performance.water_recovery_ratio.get::<percent>();
    assert!(recovery > 0.0 && recovery < 100.0, "recovery {recovery}");

    assert!(performance.dew_point_approach.get::<temperature_interval::kelvin>() > 0.0);
    assert!(performance.iterations <= 2 * humidifier.device().mesh.size);

    // Equal flows: what the wet stream gives up the dry stream picks up, up to
    // the mismatch between wet channel count and grid size.
    let picked_up = (dry.outlet.humidity_ratio - dry.inlet.humidity_ratio).get::<ratio>();
    let given_up = (wet.inlet.humidity_ratio - wet.outlet.humidity_ratio).get::<ratio>();
    assert_relative_eq!(picked_up, given_up, max_relative = 0.1);
}

#[test]
fn report_prints_every_section() {
    let config = HumidifierConfig::bundled().unwrap();
    let humidifier = Humidifier::new(&config, "ax-150", 100, "BOL").unwrap();

    let report = humidifier.call(&reference_point()).unwrap().to_string();

    for section in [
        "dry: 0.1000 kg/s",
        "wet: 0.1000 kg/s",
        "inlet:",
        "outlet:",
        "dew point approach:",
        "vapor transport:",
        "water recovery ratio:",
        "max pressure differential:",
        "iterations:",
    ] {
        assert!(report.contains(section), "missing {section:?} in\n{report}");
    }
}

#[test]
fn smaller_product_also_converges() {
    let config = HumidifierConfig::bundled().unwrap();
    let humidifier = Humidifier::new(&config, "ax 100", 50, "MOL").unwrap();

    let performance = humidifier.call(&reference_point()).unwrap();
    assert!(performance.dry.outlet.humidity_ratio > performance.dry.inlet.humidity_ratio);
}

#[test]
fn catalog_file_matches_bundled_catalog() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/humidifier.toml");
    let from_file = HumidifierConfig::from_path(path).unwrap();

    assert_eq!(from_file, HumidifierConfig::bundled().unwrap());
}

#[test]
fn single_iteration_budget_reports_non_convergence() {
    let config = HumidifierConfig::bundled().unwrap();
    let humidifier = Humidifier::new(&config, "AX_150", 100, "BOL")
        .unwrap()
        .with_solver(SolverConfig {
            max_iterations: StrictlyPositive::new(1).unwrap(),
            convergence_threshold: 0.0,
            ..SolverConfig::default()
        });

    let err = humidifier.call(&reference_point()).unwrap_err();
    match err {
        HumidifierError::Solve(SolveError::NotConverged { iterations, error }) => {
            assert_eq!(iterations, 1);
            assert!(error > 0.0);
        }
        other => panic!("expected non-convergence, got {other:?}"),
    }
}
