//! Flux models: emission rates integrated over an evaluation window
//!
//! Every flux model answers the same question for one element: how much
//! mass or energy does the burning fuel release between `begin` and `end`,
//! given that the element ignited at `arrival`?
//!
//! Two regimes are selected by the window:
//! - **Instantaneous** (`begin == end`): the rate at `begin`, zero before ignition.
//! - **Averaged** (`begin < end`): the mean rate over the full window. Zero when
//!   the window ends before ignition; when ignition falls inside the window only
//!   the burning part contributes, still divided by the full window length.

pub mod burnup;
pub mod forefire_vapor;

pub use burnup::{BurnupCoefficients, BurnupHeatFlux};
pub use forefire_vapor::{ForeFireV1VaporFlux, VaporFluxCoefficients};

use crate::properties::PropertyVector;

/// Capability shared by every flux model
///
/// Implementations hold only data resolved at construction, so one instance
/// can be evaluated concurrently on distinct property vectors.
pub trait FluxModel: Send + Sync {
    /// Registry name of the model
    fn name(&self) -> &'static str;

    /// Slot index the model was created for
    fn index(&self) -> usize;

    /// Property names bound at construction, in binding order
    fn required_properties(&self) -> &'static [&'static str];

    /// Flux over `[begin, end]` for an element ignited at `arrival`
    fn evaluate_flux(&self, values: &PropertyVector, begin: f64, end: f64, arrival: f64) -> f64;
}

/// The closed set of flux models the registry can build
#[derive(Debug, Clone)]
pub enum FluxModelInstance {
    /// `BurnUpHeatFlux`
    BurnupHeat(BurnupHeatFlux),
    /// `ForeFireV1VaporFlux`
    ForeFireV1Vapor(ForeFireV1VaporFlux),
}

impl FluxModel for FluxModelInstance {
    fn name(&self) -> &'static str {
        match self {
            Self::BurnupHeat(model) => model.name(),
            Self::ForeFireV1Vapor(model) => model.name(),
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::BurnupHeat(model) => model.index(),
            Self::ForeFireV1Vapor(model) => model.index(),
        }
    }

    fn required_properties(&self) -> &'static [&'static str] {
        match self {
            Self::BurnupHeat(model) => model.required_properties(),
            Self::ForeFireV1Vapor(model) => model.required_properties(),
        }
    }

    #[inline]
    fn evaluate_flux(&self, values: &PropertyVector, begin: f64, end: f64, arrival: f64) -> f64 {
        match self {
            Self::BurnupHeat(model) => model.evaluate_flux(values, begin, end, arrival),
            Self::ForeFireV1Vapor(model) => model.evaluate_flux(values, begin, end, arrival),
        }
    }
}

impl From<BurnupHeatFlux> for FluxModelInstance {
    fn from(model: BurnupHeatFlux) -> Self {
        Self::BurnupHeat(model)
    }
}

impl From<ForeFireV1VaporFlux> for FluxModelInstance {
    fn from(model: ForeFireV1VaporFlux) -> Self {
        Self::ForeFireV1Vapor(model)
    }
}
