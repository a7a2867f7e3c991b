//! Parameter resolution
//!
//! Models read their coefficients once, at construction, from a typed
//! key/value store. Scalars fall back to documented defaults; vectors that a
//! model indexes into have no default and must be configured.
//!
//! # Usage
//! ```
//! use fire_spread_models::params::{ParameterResolver, ParameterSet};
//!
//! let params = ParameterSet::new()
//!     .with_double("burnup.timeCoeff", 0.9)
//!     .with_doubles("FFfluxes.LAICoeffs", vec![0.5, 1.0]);
//!
//! assert_eq!(params.double_or("burnup.timeCoeff", 0.8514), 0.9);
//! assert_eq!(params.double_or("burnup.waterLatentHeat", 2.5e6), 2.5e6);
//! assert_eq!(params.doubles("FFfluxes.LAICoeffs"), Some(&[0.5, 1.0][..]));
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ModelError;

/// Read-only access to the simulator's configuration
///
/// Implemented by [`ParameterSet`]; hosting applications can implement it
/// over their own configuration store.
pub trait ParameterResolver {
    /// Scalar value of `key`, if valued as a scalar
    fn double(&self, key: &str) -> Option<f64>;

    /// Vector value of `key`, if valued as a vector
    fn doubles(&self, key: &str) -> Option<&[f64]>;

    /// Scalar value of `key`, or `default` when the key is not valued
    fn double_or(&self, key: &str, default: f64) -> f64 {
        if let Some(value) = self.double(key) {
            value
        } else {
            debug!("Parameter '{}' not valued, using default {}", key, default);
            default
        }
    }

    /// Vector value of `key` holding at least `min_len` entries
    ///
    /// # Errors
    ///
    /// [`ModelError::MissingRequiredConfig`] when the key is not valued,
    /// [`ModelError::ParameterTooShort`] when it holds fewer than `min_len`
    /// entries.
    fn required_doubles(&self, key: &str, min_len: usize) -> Result<Vec<f64>, ModelError> {
        let Some(values) = self.doubles(key) else {
            warn!("Vector of parameters '{}' should be valued", key);
            return Err(ModelError::MissingRequiredConfig {
                key: key.to_string(),
            });
        };
        if values.len() < min_len {
            warn!(
                "Vector of parameters '{}' has {} entries, {} required",
                key,
                values.len(),
                min_len
            );
            return Err(ModelError::ParameterTooShort {
                key: key.to_string(),
                expected: min_len,
                found: values.len(),
            });
        }
        Ok(values.to_vec())
    }
}

/// A configured value: scalar or vector of doubles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Single double
    Scalar(f64),
    /// Vector of doubles
    Vector(Vec<f64>),
}

/// In-memory parameter store
///
/// Serializes as a flat map of key to scalar or array, so a configuration
/// file section such as `{"burnup.timeCoeff": 0.85, "FFfluxes.mCoeffs": [..]}`
/// deserializes directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: FxHashMap<String, ParamValue>,
}

impl ParameterSet {
    /// Empty parameter set; every model falls back to its defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scalar value (builder form)
    pub fn with_double(mut self, key: &str, value: f64) -> Self {
        self.set_double(key, value);
        self
    }

    /// Set a vector value (builder form)
    pub fn with_doubles(mut self, key: &str, values: Vec<f64>) -> Self {
        self.set_doubles(key, values);
        self
    }

    /// Set a scalar value, replacing any previous value for `key`
    pub fn set_double(&mut self, key: &str, value: f64) {
        self.values
            .insert(key.to_string(), ParamValue::Scalar(value));
    }

    /// Set a vector value, replacing any previous value for `key`
    pub fn set_doubles(&mut self, key: &str, values: Vec<f64>) {
        self.values
            .insert(key.to_string(), ParamValue::Vector(values));
    }

    /// Whether `key` holds any value
    pub fn is_valued(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of valued keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no key is valued
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParameterResolver for ParameterSet {
    fn double(&self, key: &str) -> Option<f64> {
        match self.values.get(key)? {
            ParamValue::Scalar(value) => Some(*value),
            ParamValue::Vector(_) => None,
        }
    }

    fn doubles(&self, key: &str) -> Option<&[f64]> {
        match self.values.get(key)? {
            ParamValue::Vector(values) => Some(values),
            ParamValue::Scalar(_) => None,
        }
    }
}
