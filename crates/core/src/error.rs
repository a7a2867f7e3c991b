//! Error taxonomy for model construction and selection
//!
//! Evaluation itself never fails: degenerate inputs (empty fuel bed, windows
//! that end before ignition) have policy-defined return values. Everything
//! that can go wrong happens while a model is being selected or bound.

use thiserror::Error;

use crate::registry::ModelFamily;

/// Errors raised while selecting, binding or configuring a model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// No factory is registered under the requested name
    #[error("no {family} model registered under the name '{name}'")]
    NotFound {
        /// Which registry was searched
        family: ModelFamily,
        /// The name that was requested
        name: String,
    },

    /// A sealed property broker does not know this property name
    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    /// A parameter without a usable default is absent from the configuration
    #[error("required parameter '{key}' is not valued")]
    MissingRequiredConfig {
        /// Parameter key
        key: String,
    },

    /// A vector parameter is present but shorter than the model indexes
    #[error("parameter '{key}' needs at least {expected} entries, got {found}")]
    ParameterTooShort {
        /// Parameter key
        key: String,
        /// Minimum number of entries the model reads
        expected: usize,
        /// Number of entries configured
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = ModelError::NotFound {
            family: ModelFamily::Propagation,
            name: "Unknown".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no propagation model registered under the name 'Unknown'"
        );

        let err = ModelError::ParameterTooShort {
            key: "FFfluxes.mCoeffs".to_string(),
            expected: 5,
            found: 3,
        };
        assert!(err.to_string().contains("FFfluxes.mCoeffs"));
        assert!(err.to_string().contains("at least 5"));
    }
}
