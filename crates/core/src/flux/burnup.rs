//! Burnup Heat Flux Model
//!
//! Sensible and latent heat released by a single exponentially decaying fuel
//! mass loss, as used for fire/atmosphere coupling.
//!
//! # Formula
//! ```text
//! T_f  = w / timeCoeff
//! dF   = exp(-(t_b - t_a)/T_f) - exp(-(t_e - t_a)/T_f)
//! dM   = dF / (t_e - t_b) × Σ_d / (1 + M)
//! flux = dM × ΔH + dM × (M + 0.56) × L_v
//! ```
//!
//! Where:
//! - **w** = Burn duration (s)
//! - **Σ_d** = Dry fuel load (kg/m²)
//! - **ΔH** = Dry fuel heat content (J/kg)
//! - **M** = Fuel moisture (fraction)
//! - **`L_v`** = Latent heat of vaporization of water (J/kg)
//!
//! # References
//! - Mandel, J. et al. (2011). "Coupled atmosphere-wildland fire modeling with WRF 3.3 and
//!   SFIRE 2011." Geoscientific Model Development, 4, 591-610.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::FluxModel;
use crate::error::ModelError;
use crate::params::ParameterResolver;
use crate::properties::{PropertyBroker, PropertyIndex, PropertyVector};

/// Configured coefficients of [`BurnupHeatFlux`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurnupCoefficients {
    /// Ratio of burn duration to e-folding time (`burnup.timeCoeff`)
    pub time_coeff: f64,
    /// Latent heat of vaporization of water, J/kg (`burnup.waterLatentHeat`)
    pub water_latent_heat: f64,
}

impl Default for BurnupCoefficients {
    fn default() -> Self {
        Self {
            time_coeff: 0.8514,
            water_latent_heat: 2.5e6,
        }
    }
}

impl BurnupCoefficients {
    /// Coefficients from `params`, defaulting each missing key
    pub fn from_params(params: &dyn ParameterResolver) -> Self {
        let defaults = Self::default();
        Self {
            time_coeff: params.double_or("burnup.timeCoeff", defaults.time_coeff),
            water_latent_heat: params
                .double_or("burnup.waterLatentHeat", defaults.water_latent_heat),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Bound {
    burn_time: PropertyIndex,
    fuel_load: PropertyIndex,
    dry_fuel_heat_content: PropertyIndex,
    moisture: PropertyIndex,
}

/// Heat flux from Burnup-style exponential fuel consumption
#[derive(Debug, Clone)]
pub struct BurnupHeatFlux {
    index: usize,
    props: Bound,
    coefficients: BurnupCoefficients,
}

impl BurnupHeatFlux {
    /// Registry name
    pub const NAME: &'static str = "BurnUpHeatFlux";

    /// Property names bound at construction
    pub const PROPERTIES: [&'static str; 4] = ["fuel.w", "fuel.Sigmad", "fuel.DeltaH", "moisture"];

    /// Bind the model's properties and read its coefficients
    ///
    /// # Errors
    ///
    /// Propagates [`ModelError::UnknownProperty`] from the broker.
    pub fn new(
        index: usize,
        broker: &mut dyn PropertyBroker,
        params: &dyn ParameterResolver,
    ) -> Result<Self, ModelError> {
        let [w, sigmad, delta_h, moisture] = Self::PROPERTIES;
        let props = Bound {
            burn_time: broker.resolve(w)?,
            fuel_load: broker.resolve(sigmad)?,
            dry_fuel_heat_content: broker.resolve(delta_h)?,
            moisture: broker.resolve(moisture)?,
        };
        let coefficients = BurnupCoefficients::from_params(params);
        debug!(
            "Created {} model #{} (timeCoeff={}, waterLatentHeat={})",
            Self::NAME,
            index,
            coefficients.time_coeff,
            coefficients.water_latent_heat
        );
        Ok(Self {
            index,
            props,
            coefficients,
        })
    }

    /// Coefficients in use
    pub fn coefficients(&self) -> &BurnupCoefficients {
        &self.coefficients
    }

    /// Heat released per kg of fuel lost, J/kg
    fn heat_per_mass_lost(&self, values: &PropertyVector) -> f64 {
        let moisture = values[self.props.moisture];
        values[self.props.dry_fuel_heat_content]
            + (moisture + 0.56) * self.coefficients.water_latent_heat
    }
}

impl FluxModel for BurnupHeatFlux {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn index(&self) -> usize {
        self.index
    }

    fn required_properties(&self) -> &'static [&'static str] {
        &Self::PROPERTIES
    }

    fn evaluate_flux(&self, values: &PropertyVector, begin: f64, end: f64, arrival: f64) -> f64 {
        let e_folding = values[self.props.burn_time] / self.coefficients.time_coeff;
        let load = values[self.props.fuel_load] / (1.0 + values[self.props.moisture]);

        // Instantaneous: derivative of the consumed fraction at `begin`
        if begin == end {
            if begin < arrival {
                return 0.0;
            }
            let rate = (-(begin - arrival) / e_folding).exp() / e_folding;
            return rate * load * self.heat_per_mass_lost(values);
        }

        if end < arrival {
            return 0.0;
        }
        let since_begin = (begin - arrival).max(0.0);
        let burnt_fraction =
            (-since_begin / e_folding).exp() - (-(end - arrival) / e_folding).exp();
        let mass_loss_rate = burnt_fraction / (end - begin) * load;
        mass_loss_rate * self.heat_per_mass_lost(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;
    use crate::properties::PropertyTable;
    use approx::assert_relative_eq;

    fn setup(params: &ParameterSet) -> (BurnupHeatFlux, PropertyVector) {
        let mut table = PropertyTable::new();
        let model = BurnupHeatFlux::new(0, &mut table, params).unwrap();
        let values = table
            .values_from(&[
                ("fuel.w", 10.0),
                ("fuel.Sigmad", 0.5),
                ("fuel.DeltaH", 18000.0),
                ("moisture", 0.1),
            ])
            .unwrap();
        (model, values)
    }

    #[test]
    fn test_golden_value() {
        let (model, values) = setup(&ParameterSet::new());
        let flux = model.evaluate_flux(&values, 0.0, 2.0, 0.0);
        assert_relative_eq!(flux, 59354.785448816656, max_relative = 1e-12);
    }

    #[test]
    fn test_matches_closed_form() {
        let params = ParameterSet::new()
            .with_double("burnup.timeCoeff", 0.7)
            .with_double("burnup.waterLatentHeat", 2.26e6);
        let (model, values) = setup(&params);

        let (bt, et, at): (f64, f64, f64) = (3.0, 5.5, 1.0);
        let tf = 10.0 / 0.7;
        let df = (-(bt - at) / tf).exp() - (-(et - at) / tf).exp();
        let dm = df / (et - bt) * 0.5 / 1.1;
        let expected = dm * 18000.0 + dm * (0.1 + 0.56) * 2.26e6;

        assert_relative_eq!(
            model.evaluate_flux(&values, bt, et, at),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_zero_before_ignition() {
        let (model, values) = setup(&ParameterSet::new());
        assert_eq!(model.evaluate_flux(&values, 0.0, 2.0, 5.0), 0.0);
        assert_eq!(model.evaluate_flux(&values, 3.0, 3.0, 5.0), 0.0);
    }

    #[test]
    fn test_window_straddling_ignition_uses_full_duration() {
        let (model, values) = setup(&ParameterSet::new());
        let straddling = model.evaluate_flux(&values, 0.0, 4.0, 2.0);
        let burning_only = model.evaluate_flux(&values, 2.0, 4.0, 2.0);
        // Same energy spread over twice the window
        assert_relative_eq!(straddling, burning_only / 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_instantaneous_is_limit_of_average() {
        let (model, values) = setup(&ParameterSet::new());
        let instant = model.evaluate_flux(&values, 4.0, 4.0, 1.0);
        let narrow = model.evaluate_flux(&values, 4.0, 4.0 + 1e-6, 1.0);
        assert_relative_eq!(instant, narrow, max_relative = 1e-5);
    }

    #[test]
    fn test_coefficients_from_params() {
        let params = ParameterSet::new().with_double("burnup.timeCoeff", 0.9);
        let (model, _) = setup(&params);
        assert_eq!(model.coefficients().time_coeff, 0.9);
        assert_eq!(model.coefficients().water_latent_heat, 2.5e6);
        assert_eq!(model.required_properties(), &BurnupHeatFlux::PROPERTIES);
    }
}
