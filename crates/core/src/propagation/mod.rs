//! Propagation models: instantaneous rate of spread of the fire front
//!
//! A propagation model turns one element's property snapshot (fuel,
//! atmosphere, terrain and local front geometry) into the speed at which the
//! front advances along its normal. The simulator integrates that speed over
//! time; the models hold no state between calls.

pub mod balbi_unsteady;

pub use balbi_unsteady::{BalbiCoefficients, BalbiUnsteady};

use crate::properties::PropertyVector;

/// Capability shared by every propagation model
pub trait PropagationModel: Send + Sync {
    /// Registry name of the model
    fn name(&self) -> &'static str;

    /// Slot index the model was created for
    fn index(&self) -> usize;

    /// Property names bound at construction, in binding order
    fn required_properties(&self) -> &'static [&'static str];

    /// Rate of spread for one element, m/s
    fn evaluate_speed(&self, values: &PropertyVector) -> f64;
}

/// The closed set of propagation models the registry can build
#[derive(Debug, Clone)]
pub enum PropagationModelInstance {
    /// `BalbiUnsteady`
    BalbiUnsteady(BalbiUnsteady),
}

impl PropagationModel for PropagationModelInstance {
    fn name(&self) -> &'static str {
        match self {
            Self::BalbiUnsteady(model) => model.name(),
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::BalbiUnsteady(model) => model.index(),
        }
    }

    fn required_properties(&self) -> &'static [&'static str] {
        match self {
            Self::BalbiUnsteady(model) => model.required_properties(),
        }
    }

    #[inline]
    fn evaluate_speed(&self, values: &PropertyVector) -> f64 {
        match self {
            Self::BalbiUnsteady(model) => model.evaluate_speed(values),
        }
    }
}

impl From<BalbiUnsteady> for PropagationModelInstance {
    fn from(model: BalbiUnsteady) -> Self {
        Self::BalbiUnsteady(model)
    }
}
