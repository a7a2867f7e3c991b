//! `ForeFire` V1 Vapor Flux Model
//!
//! Water vapor released by drying fuel, split into a dead and a live pool.
//! Each pool releases its potential vapor mass along a gamma-like kernel with
//! its own time to peak τ:
//!
//! ```text
//! texp(t, τ)   = t/τ² × exp(-t/τ)           rate density, integrates to 1
//! tauexp(t, τ) = (t + τ)/τ × exp(-t/τ)      minus its antiderivative
//! ```
//!
//! # Time scales
//! ```text
//! T_0       = B / s_d^1.236 × r_T
//! C_LAI     = 1 + c_0 (LAI - 2)² / (LAI + c_1)²
//! C_M       = m_0 + m_1 exp(m_2 M_d) + m_3 exp(-m_4 M_d)
//! τ_dead    = C_LAI × C_M × T_0
//! τ_live    = r_live × τ_dead
//! ```
//!
//! # Potential vapor masses
//! ```text
//! M_dead = M_d × Σ_d
//! M_live = χ_b × exp(-4 M_l / m_e) × M_l × Σ_l
//! ```
//!
//! `B` is the Burrows constant relating particle surface-to-volume ratio to
//! residence time (Burrows, 2001).

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::FluxModel;
use crate::error::ModelError;
use crate::params::ParameterResolver;
use crate::properties::{PropertyBroker, PropertyIndex, PropertyVector};

/// Rate density of a pool peaking at `tau`
#[inline]
fn texp(t: f64, tau: f64) -> f64 {
    t / tau / tau * (-t / tau).exp()
}

/// Fraction of a pool's mass still to be released at `t`
#[inline]
fn tauexp(t: f64, tau: f64) -> f64 {
    (t + tau) / tau * (-t / tau).exp()
}

/// Configured coefficients of [`ForeFireV1VaporFlux`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaporFluxCoefficients {
    /// Burrows residence-time constant (`FFfluxes.BurrowsCst`)
    pub burrows_cst: f64,
    /// Live to dead time scale ratio (`FFfluxes.liveTimeScaleRatio`)
    pub live_time_scale_ratio: f64,
    /// Vapor to residence time scale ratio (`FFfluxes.timeScalesRatio`)
    pub time_scales_ratio: f64,
    /// LAI correction coefficients, at least 2 (`FFfluxes.LAICoeffs`)
    pub lai_coeffs: Vec<f64>,
    /// Dead moisture correction coefficients, at least 5 (`FFfluxes.mCoeffs`)
    pub m_coeffs: Vec<f64>,
    /// Live fuel vapor availability (`FFfluxes.chi_b`)
    pub chi_b: f64,
}

impl VaporFluxCoefficients {
    /// Entries of `FFfluxes.LAICoeffs` the model reads
    pub const LAI_COEFFS_LEN: usize = 2;
    /// Entries of `FFfluxes.mCoeffs` the model reads
    pub const M_COEFFS_LEN: usize = 5;

    /// Coefficients from `params`
    ///
    /// # Errors
    ///
    /// [`ModelError::MissingRequiredConfig`] or [`ModelError::ParameterTooShort`]
    /// when `FFfluxes.LAICoeffs` or `FFfluxes.mCoeffs` is unusable.
    pub fn from_params(params: &dyn ParameterResolver) -> Result<Self, ModelError> {
        Ok(Self {
            burrows_cst: params.double_or("FFfluxes.BurrowsCst", 208487.0),
            live_time_scale_ratio: params.double_or("FFfluxes.liveTimeScaleRatio", 5.0),
            time_scales_ratio: params.double_or("FFfluxes.timeScalesRatio", 0.5),
            lai_coeffs: params.required_doubles("FFfluxes.LAICoeffs", Self::LAI_COEFFS_LEN)?,
            m_coeffs: params.required_doubles("FFfluxes.mCoeffs", Self::M_COEFFS_LEN)?,
            chi_b: params.double_or("FFfluxes.chi_b", 1.0),
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Bound {
    sd: PropertyIndex,
    md: PropertyIndex,
    sigmad: PropertyIndex,
    ml: PropertyIndex,
    sigmal: PropertyIndex,
    lai: PropertyIndex,
    me: PropertyIndex,
}

/// Time to peak and potential mass of one fuel pool
#[derive(Debug, Clone, Copy)]
struct Pool {
    tau: f64,
    mass: f64,
}

impl Pool {
    fn instantaneous(self, t: f64) -> f64 {
        self.mass * texp(t, self.tau)
    }

    fn released_between(self, from: f64, to: f64) -> f64 {
        self.mass * (tauexp(from, self.tau) - tauexp(to, self.tau))
    }
}

/// Dead and live fuel water vapor flux
#[derive(Debug, Clone)]
pub struct ForeFireV1VaporFlux {
    index: usize,
    props: Bound,
    coefficients: VaporFluxCoefficients,
}

impl ForeFireV1VaporFlux {
    /// Registry name
    pub const NAME: &'static str = "ForeFireV1VaporFlux";

    /// Property names bound at construction
    pub const PROPERTIES: [&'static str; 7] = [
        "fuel.sd",
        "fuel.Md",
        "fuel.Sigmad",
        "fuel.Ml",
        "fuel.Sigmal",
        "fuel.Blai",
        "fuel.me",
    ];

    /// Bind the model's properties and read its coefficients
    ///
    /// # Errors
    ///
    /// Propagates [`ModelError::UnknownProperty`] from the broker, and the
    /// configuration errors of [`VaporFluxCoefficients::from_params`].
    pub fn new(
        index: usize,
        broker: &mut dyn PropertyBroker,
        params: &dyn ParameterResolver,
    ) -> Result<Self, ModelError> {
        let [sd, md, sigmad, ml, sigmal, lai, me] = Self::PROPERTIES;
        let props = Bound {
            sd: broker.resolve(sd)?,
            md: broker.resolve(md)?,
            sigmad: broker.resolve(sigmad)?,
            ml: broker.resolve(ml)?,
            sigmal: broker.resolve(sigmal)?,
            lai: broker.resolve(lai)?,
            me: broker.resolve(me)?,
        };
        let coefficients = VaporFluxCoefficients::from_params(params)?;
        debug!("Created {} model #{} ({:?})", Self::NAME, index, coefficients);
        Ok(Self {
            index,
            props,
            coefficients,
        })
    }

    /// Coefficients in use
    pub fn coefficients(&self) -> &VaporFluxCoefficients {
        &self.coefficients
    }

    /// Dead fuel time to peak emission, s
    pub fn dead_time_scale(&self, values: &PropertyVector) -> f64 {
        let c = &self.coefficients;
        let lai = values[self.props.lai];
        let md = values[self.props.md];

        let t0 = c.burrows_cst / values[self.props.sd].powf(1.236) * c.time_scales_ratio;
        let lai_corr =
            1.0 + c.lai_coeffs[0] * (lai - 2.0).powi(2) / (lai + c.lai_coeffs[1]).powi(2);
        let moist_corr = c.m_coeffs[0]
            + c.m_coeffs[1] * (c.m_coeffs[2] * md).exp()
            + c.m_coeffs[3] * (-c.m_coeffs[4] * md).exp();

        lai_corr * moist_corr * t0
    }

    fn pools(&self, values: &PropertyVector) -> (Pool, Pool) {
        let tau_dead = self.dead_time_scale(values);
        let ml = values[self.props.ml];
        let me = values[self.props.me];
        let dead = Pool {
            tau: tau_dead,
            mass: values[self.props.md] * values[self.props.sigmad],
        };
        // No extinction moisture, no available live vapor
        let live_mass = if me > 0.0 {
            self.coefficients.chi_b * (-4.0 * ml / me).exp() * ml * values[self.props.sigmal]
        } else {
            0.0
        };
        let live = Pool {
            tau: self.coefficients.live_time_scale_ratio * tau_dead,
            mass: live_mass,
        };
        (dead, live)
    }
}

impl FluxModel for ForeFireV1VaporFlux {
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
        let (dead, live) = self.pools(values);

        if begin == end {
            if begin < arrival {
                return 0.0;
            }
            let t = begin - arrival;
            return dead.instantaneous(t) + live.instantaneous(t);
        }

        if end < arrival {
            return 0.0;
        }
        let from = (begin - arrival).max(0.0);
        let to = end - arrival;
        (dead.released_between(from, to) + live.released_between(from, to)) / (end - begin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;
    use crate::properties::PropertyTable;
    use approx::assert_relative_eq;

    fn params() -> ParameterSet {
        ParameterSet::new()
            .with_doubles("FFfluxes.LAICoeffs", vec![0.5, 1.0])
            .with_doubles("FFfluxes.mCoeffs", vec![0.6, 0.2, 3.0, 0.4, 10.0])
    }

    fn setup() -> (ForeFireV1VaporFlux, PropertyVector) {
        let mut table = PropertyTable::new();
        let model = ForeFireV1VaporFlux::new(3, &mut table, &params()).unwrap();
        let values = table
            .values_from(&[
                ("fuel.sd", 5000.0),
                ("fuel.Md", 0.1),
                ("fuel.Sigmad", 0.8),
                ("fuel.Ml", 1.2),
                ("fuel.Sigmal", 0.3),
                ("fuel.Blai", 4.0),
                ("fuel.me", 0.3),
            ])
            .unwrap();
        (model, values)
    }

    #[test]
    fn test_kernels() {
        assert_eq!(texp(0.0, 2.0), 0.0);
        assert_relative_eq!(texp(2.0, 2.0), 0.5 * (-1.0f64).exp());
        assert_relative_eq!(tauexp(0.0, 2.0), 1.0);
        assert!(tauexp(100.0, 2.0) < 1e-15);
    }

    #[test]
    fn test_dead_time_scale_matches_formula() {
        let (model, values) = setup();
        let t0 = 208487.0 / 5000.0f64.powf(1.236) * 0.5;
        let lai_corr = 1.0 + 0.5 * 4.0 / 25.0;
        let moist_corr = 0.6 + 0.2 * (0.3f64).exp() + 0.4 * (-1.0f64).exp();
        assert_relative_eq!(
            model.dead_time_scale(&values),
            lai_corr * moist_corr * t0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_averaged_matches_closed_form() {
        let (model, values) = setup();
        let taud = model.dead_time_scale(&values);
        let taul = 5.0 * taud;
        let dead = 0.1 * 0.8;
        let live = (-4.0 * 1.2 / 0.3f64).exp() * 1.2 * 0.3;

        let (bt, et, at) = (12.0, 20.0, 10.0);
        let expected = (dead * (tauexp(2.0, taud) - tauexp(10.0, taud))
            + live * (tauexp(2.0, taul) - tauexp(10.0, taul)))
            / 8.0;
        assert_relative_eq!(
            model.evaluate_flux(&values, bt, et, at),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_whole_release_integrates_to_potential_mass() {
        let (model, values) = setup();
        let taud = model.dead_time_scale(&values);
        let horizon = 200.0 * 5.0 * taud;
        let mean = model.evaluate_flux(&values, 0.0, horizon, 0.0);
        let total = 0.1 * 0.8 + (-16.0f64).exp() * 1.2 * 0.3;
        assert_relative_eq!(mean * horizon, total, max_relative = 1e-9);
    }

    #[test]
    fn test_regimes_before_ignition() {
        let (model, values) = setup();
        assert_eq!(model.evaluate_flux(&values, 1.0, 1.0, 2.0), 0.0);
        assert_eq!(model.evaluate_flux(&values, 0.0, 1.5, 2.0), 0.0);
        assert_eq!(model.evaluate_flux(&values, 2.0, 2.0, 2.0), 0.0);
    }

    #[test]
    fn test_zero_extinction_moisture_has_no_live_pool() {
        let mut table = PropertyTable::new();
        let model = ForeFireV1VaporFlux::new(0, &mut table, &params()).unwrap();
        let dry = table
            .values_from(&[
                ("fuel.sd", 5000.0),
                ("fuel.Md", 0.1),
                ("fuel.Sigmad", 0.8),
                ("fuel.Blai", 4.0),
            ])
            .unwrap();
        let mut no_extinction = dry.clone();
        no_extinction[table.index_of("fuel.Ml").unwrap()] = 1.2;
        no_extinction[table.index_of("fuel.Sigmal").unwrap()] = 0.3;

        let taud = model.dead_time_scale(&dry);
        for values in [&dry, &no_extinction] {
            let instant = model.evaluate_flux(values, 5.0, 5.0, 0.0);
            let averaged = model.evaluate_flux(values, 0.0, 5.0, 0.0);
            assert!(instant.is_finite() && averaged.is_finite());
            assert_relative_eq!(instant, 0.08 * texp(5.0, taud), max_relative = 1e-12);
            assert_relative_eq!(
                averaged,
                0.08 * (1.0 - tauexp(5.0, taud)) / 5.0,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_missing_coefficients_fail_construction() {
        let mut table = PropertyTable::new();
        let params = ParameterSet::new().with_doubles("FFfluxes.LAICoeffs", vec![0.5, 1.0]);
        let err = ForeFireV1VaporFlux::new(0, &mut table, &params).unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingRequiredConfig {
                key: "FFfluxes.mCoeffs".to_string()
            }
        );
    }

    #[test]
    fn test_time_scales_ratio_is_read() {
        let mut table = PropertyTable::new();
        let model = ForeFireV1VaporFlux::new(
            0,
            &mut table,
            &params().with_double("FFfluxes.timeScalesRatio", 0.25),
        )
        .unwrap();
        assert_eq!(model.coefficients().time_scales_ratio, 0.25);
        assert_eq!(model.coefficients().burrows_cst, 208487.0);
        assert_eq!(model.index(), 0);
    }
}
