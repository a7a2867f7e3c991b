//! Shared fixtures for the integration tests
#![allow(dead_code)]

use fire_spread_models::{ParameterSet, PropertyTable, PropertyVector};

/// Route `tracing` output through the test harness; filter with `RUST_LOG`
#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A litter/shrub element with every property any built-in model reads
pub const STANDARD_ELEMENT: &[(&str, f64)] = &[
    // Burnup
    ("fuel.w", 10.0),
    ("moisture", 0.1),
    // Shared fuel description
    ("fuel.Sigmad", 0.5),
    ("fuel.DeltaH", 1.5e7),
    ("fuel.sd", 5000.0),
    ("fuel.Md", 0.1),
    ("fuel.Ml", 1.0),
    ("fuel.Sigmal", 0.2),
    ("fuel.Blai", 4.0),
    ("fuel.me", 0.3),
    ("fuel.Rhod", 500.0),
    ("fuel.Rhol", 500.0),
    ("fuel.sl", 5000.0),
    ("fuel.e", 1.0),
    ("fuel.stoch", 8.3),
    ("fuel.RhoA", 1.2),
    ("fuel.Ta", 300.0),
    ("fuel.Tau0", 75591.0),
    ("fuel.Deltah", 2.3e6),
    ("fuel.Cp", 1100.0),
    ("fuel.Ti", 600.0),
    ("fuel.X0", 0.3),
    ("fuel.r00", 2.5e-5),
    // Front and environment
    ("slope", 0.0),
    ("frontDepth", 2.0),
    ("frontCurvature", 0.0),
    ("normalWind", 0.0),
];

/// Property vector for `table`: standard values, then `overrides`
///
/// Names the table does not hold are skipped, so one element description
/// serves every model.
pub fn element(table: &PropertyTable, overrides: &[(&str, f64)]) -> PropertyVector {
    let mut values = table.new_vector();
    for &(name, value) in STANDARD_ELEMENT.iter().chain(overrides) {
        if let Some(index) = table.index_of(name) {
            values[index] = value;
        }
    }
    values
}

/// Configuration with the vapor model's required coefficient vectors
pub fn vapor_params() -> ParameterSet {
    ParameterSet::new()
        .with_doubles("FFfluxes.LAICoeffs", vec![0.5, 1.0])
        .with_doubles("FFfluxes.mCoeffs", vec![0.6, 0.2, 3.0, 0.4, 10.0])
}
