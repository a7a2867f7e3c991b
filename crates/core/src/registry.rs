//! Model selection by name
//!
//! The simulator only knows model names from its configuration. The registry
//! maps each name to a factory that binds the model against the run's
//! property broker and reads its coefficients.
//!
//! Registration is an explicit startup step: build the registry (usually
//! with [`ModelRegistry::with_builtin_models`]), add any extra factories, then
//! share it read-only for the rest of the run.
//!
//! # Example
//! ```
//! use fire_spread_models::params::ParameterSet;
//! use fire_spread_models::properties::PropertyTable;
//! use fire_spread_models::propagation::PropagationModel;
//! use fire_spread_models::registry::ModelRegistry;
//!
//! let registry = ModelRegistry::with_builtin_models();
//! let mut table = PropertyTable::new();
//! let model = registry
//!     .create_propagation_model("BalbiUnsteady", 0, &mut table, &ParameterSet::new())
//!     .unwrap();
//! assert_eq!(model.name(), "BalbiUnsteady");
//! assert!(registry
//!     .create_propagation_model("Unknown", 0, &mut table, &ParameterSet::new())
//!     .is_err());
//! ```

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ModelError;
use crate::flux::{BurnupHeatFlux, FluxModelInstance, ForeFireV1VaporFlux};
use crate::params::ParameterResolver;
use crate::propagation::{BalbiUnsteady, PropagationModelInstance};
use crate::properties::PropertyBroker;

/// Builds a flux model for slot `index`
pub type FluxFactory = fn(
    usize,
    &mut dyn PropertyBroker,
    &dyn ParameterResolver,
) -> Result<FluxModelInstance, ModelError>;

/// Builds a propagation model for slot `index`
pub type PropagationFactory = fn(
    usize,
    &mut dyn PropertyBroker,
    &dyn ParameterResolver,
) -> Result<PropagationModelInstance, ModelError>;

/// The two model families, each with its own namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    /// Time-window flux models
    Flux,
    /// Instantaneous rate-of-spread models
    Propagation,
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flux => write!(f, "flux"),
            Self::Propagation => write!(f, "propagation"),
        }
    }
}

/// Name to factory tables for both model families
#[derive(Clone, Default)]
pub struct ModelRegistry {
    flux: FxHashMap<String, FluxFactory>,
    propagation: FxHashMap<String, PropagationFactory>,
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("flux", &self.flux_model_names())
            .field("propagation", &self.propagation_model_names())
            .finish()
    }
}

impl ModelRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every model shipped with this crate
    pub fn with_builtin_models() -> Self {
        let mut registry = Self::new();
        register_builtin_models(&mut registry);
        registry
    }

    /// Register a flux model factory; a later registration of the same name wins
    pub fn register_flux_model(&mut self, name: &str, factory: FluxFactory) {
        if self.flux.insert(name.to_string(), factory).is_some() {
            warn!("Flux model '{}' registered twice, keeping the latest", name);
        } else {
            info!("Registered flux model '{}'", name);
        }
    }

    /// Register a propagation model factory; a later registration of the same name wins
    pub fn register_propagation_model(&mut self, name: &str, factory: PropagationFactory) {
        if self.propagation.insert(name.to_string(), factory).is_some() {
            warn!("Propagation model '{}' registered twice, keeping the latest", name);
        } else {
            info!("Registered propagation model '{}'", name);
        }
    }

    /// Build the flux model registered as `name`
    ///
    /// # Errors
    ///
    /// [`ModelError::NotFound`] for an unregistered name, otherwise whatever
    /// the model's construction returns.
    pub fn create_flux_model(
        &self,
        name: &str,
        index: usize,
        broker: &mut dyn PropertyBroker,
        params: &dyn ParameterResolver,
    ) -> Result<FluxModelInstance, ModelError> {
        let factory = self
            .flux
            .get(name)
            .ok_or_else(|| not_found(ModelFamily::Flux, name))?;
        factory(index, broker, params)
    }

    /// Build the propagation model registered as `name`
    ///
    /// # Errors
    ///
    /// [`ModelError::NotFound`] for an unregistered name, otherwise whatever
    /// the model's construction returns.
    pub fn create_propagation_model(
        &self,
        name: &str,
        index: usize,
        broker: &mut dyn PropertyBroker,
        params: &dyn ParameterResolver,
    ) -> Result<PropagationModelInstance, ModelError> {
        let factory = self
            .propagation
            .get(name)
            .ok_or_else(|| not_found(ModelFamily::Propagation, name))?;
        factory(index, broker, params)
    }

    /// Whether a flux model is registered as `name`
    pub fn contains_flux_model(&self, name: &str) -> bool {
        self.flux.contains_key(name)
    }

    /// Whether a propagation model is registered as `name`
    pub fn contains_propagation_model(&self, name: &str) -> bool {
        self.propagation.contains_key(name)
    }

    /// Registered flux model names, sorted
    pub fn flux_model_names(&self) -> Vec<&str> {
        sorted_names(self.flux.keys())
    }

    /// Registered propagation model names, sorted
    pub fn propagation_model_names(&self) -> Vec<&str> {
        sorted_names(self.propagation.keys())
    }
}

fn not_found(family: ModelFamily, name: &str) -> ModelError {
    warn!("No {} model registered under '{}'", family, name);
    ModelError::NotFound {
        family,
        name: name.to_string(),
    }
}

fn sorted_names<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut names: Vec<&str> = keys.map(String::as_str).collect();
    names.sort_unstable();
    names
}

/// Register every model shipped with this crate, in a fixed order
pub fn register_builtin_models(registry: &mut ModelRegistry) {
    registry.register_flux_model(BurnupHeatFlux::NAME, |index, broker, params| {
        BurnupHeatFlux::new(index, broker, params).map(FluxModelInstance::from)
    });
    registry.register_flux_model(ForeFireV1VaporFlux::NAME, |index, broker, params| {
        ForeFireV1VaporFlux::new(index, broker, params).map(FluxModelInstance::from)
    });
    registry.register_propagation_model(BalbiUnsteady::NAME, |index, broker, params| {
        BalbiUnsteady::new(index, broker, params).map(PropagationModelInstance::from)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flux::FluxModel;
    use crate::params::ParameterSet;
    use crate::propagation::PropagationModel;
    use crate::properties::PropertyTable;

    #[test]
    fn test_builtin_names() {
        let registry = ModelRegistry::with_builtin_models();
        assert_eq!(
            registry.flux_model_names(),
            vec!["BurnUpHeatFlux", "ForeFireV1VaporFlux"]
        );
        assert_eq!(registry.propagation_model_names(), vec!["BalbiUnsteady"]);
        assert!(registry.contains_flux_model("BurnUpHeatFlux"));
        assert!(!registry.contains_flux_model("BalbiUnsteady"));
    }

    #[test]
    fn test_families_are_separate_namespaces() {
        let registry = ModelRegistry::with_builtin_models();
        let mut table = PropertyTable::new();
        let err = registry
            .create_flux_model("BalbiUnsteady", 0, &mut table, &ParameterSet::new())
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::NotFound {
                family: ModelFamily::Flux,
                name: "BalbiUnsteady".to_string()
            }
        );
    }

    #[test]
    fn test_create_passes_index_through() {
        let registry = ModelRegistry::with_builtin_models();
        let mut table = PropertyTable::new();
        let model = registry
            .create_flux_model("BurnUpHeatFlux", 7, &mut table, &ParameterSet::new())
            .unwrap();
        assert_eq!(model.index(), 7);
        assert_eq!(model.name(), "BurnUpHeatFlux");

        let model = registry
            .create_propagation_model("BalbiUnsteady", 2, &mut table, &ParameterSet::new())
            .unwrap();
        assert_eq!(model.index(), 2);
    }

    #[test]
    fn test_empty_registry_knows_nothing() {
        let registry = ModelRegistry::new();
        let mut table = PropertyTable::new();
        assert!(registry.flux_model_names().is_empty());
        assert!(matches!(
            registry.create_propagation_model("BalbiUnsteady", 0, &mut table, &ParameterSet::new()),
            Err(ModelError::NotFound { .. })
        ));
    }
}
