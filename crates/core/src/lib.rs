//! Fire Spread Model Library
//!
//! Per-element physical models plugged into a wildfire front-tracking
//! simulator. Two families are provided:
//! - **Flux models** integrate a time-varying emission rate (heat, water
//!   vapor) over an evaluation window.
//! - **Propagation models** compute the instantaneous rate of spread of the
//!   front from local fuel, atmosphere and terrain properties.
//!
//! ## Lifecycle
//!
//! 1. At startup the host builds a [`ModelRegistry`] and shares it read-only.
//! 2. Models named in the configuration are created through the registry.
//!    Each binds the property names it needs to indices through a
//!    [`PropertyBroker`] and reads its coefficients from a
//!    [`ParameterResolver`]; missing required configuration fails here.
//! 3. Every step the simulator assembles one [`PropertyVector`] per element
//!    and evaluates the models on it. Evaluation is pure arithmetic on
//!    immutable model state, so one instance may serve many threads.
//!
//! ```
//! use fire_spread_models::{FluxModel, ModelRegistry, ParameterSet, PropertyTable};
//!
//! let registry = ModelRegistry::with_builtin_models();
//! let mut table = PropertyTable::new();
//! let burnup = registry
//!     .create_flux_model("BurnUpHeatFlux", 0, &mut table, &ParameterSet::new())
//!     .unwrap();
//!
//! let values = table
//!     .values_from(&[
//!         ("fuel.w", 10.0),
//!         ("fuel.Sigmad", 0.5),
//!         ("fuel.DeltaH", 18000.0),
//!         ("moisture", 0.1),
//!     ])
//!     .unwrap();
//! let flux = burnup.evaluate_flux(&values, 0.0, 2.0, 0.0);
//! assert!(flux > 0.0);
//! ```

pub mod error;
pub mod flux;
pub mod params;
pub mod propagation;
pub mod properties;
pub mod registry;

pub use error::ModelError;
pub use flux::{FluxModel, FluxModelInstance};
pub use params::{ParamValue, ParameterResolver, ParameterSet};
pub use propagation::{PropagationModel, PropagationModelInstance};
pub use properties::{PropertyBroker, PropertyIndex, PropertyTable, PropertyVector};
pub use registry::{register_builtin_models, ModelFamily, ModelRegistry};
