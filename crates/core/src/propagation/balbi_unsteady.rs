//! Balbi Unsteady Rate of Spread Model
//!
//! Physical spread model driven by flame radiation, corrected for the depth
//! of the burning zone, the local curvature of the front, and the tilt of
//! the flame by slope and wind.
//!
//! # Formula
//! ```text
//! β_d = Σ_d / (e ρ_d)         β_l = Σ_l / (e ρ_l)
//! S_d = s_d e β_d             S_l = s_l e β_l           ν = min(S_d / LAI, 1)
//! a   = Δh / (C_p (T_i - T_a))
//! ξ   = (M_l - M_d) (Σ_l/Σ_d) (Δh/ΔH)
//! A   = ν X_0 ΔH / (4 C_p (T_i - T_a)) / (1 + a M_d) × (1 - ξ)
//! T   = T_a + ΔH (1 - X_0)(1 - ξ) / ((s + 1) C_pa)
//! R00 = B T⁴ / (C_p (T_i - T_a))
//! u_0 = ν × 2 LAI (s + 1) T ρ_d / (ρ_a T_a τ_0)
//! ε   = 1 - exp(-D s_d β_d / 4)
//! R_0 = e/Σ_d × R00 ε / (1 + a M_d) × (S_d/(S_d + S_l))²
//! γ   = atan(tan α + U_n / u_0)
//! ```
//!
//! For `γ ≤ 0` the spread rate is `R_0`. Otherwise, with `τ = τ_0 / s_d`
//! and `r_0 = s_d r_00`:
//! ```text
//! κ   = (1 - c / √(1 + c²))⁴
//! G   = κ (D/τ) (1 + sin γ - cos γ) / (1 + D cos γ / (τ r_0))
//! R_t = R_0 + A G
//! R   = ½ (R_t + √(R_t² + 4 r_0 R_0 / cos γ))
//! ```
//!
//! An empty bed (`e ≤ 0`) or no burning zone (`D ≤ 0`) does not spread. Without
//! foliage `u_0` vanishes and only the slope tilts the flame.
//!
//! # References
//! - Balbi, J.H., Rossi, J.L., Marcelli, T., Santoni, P.A. (2007). "A 3D physical real-time model
//!   of surface fires across fuel beds." Combustion Science and Technology, 179(12), 2511-2537.
//! - Chatelon, F.J., Balbi, J.H., et al. (2022). "A convective model for laboratory fires with
//!   well-ordered vertically-oriented fuel beds." Fire Safety Journal, 130.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::PropagationModel;
use crate::error::ModelError;
use crate::params::ParameterResolver;
use crate::properties::{PropertyBroker, PropertyIndex, PropertyVector};

/// Radiation constant used by the model, W/(m²·K⁴)
const STEFAN_BOLTZMANN: f64 = 5.6e-8;

/// Configured coefficients of [`BalbiUnsteady`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalbiCoefficients {
    /// Radiative cooling coefficient (`BalbiUnsteady.cooling`), carried for
    /// configuration compatibility; not part of the spread equation
    pub cooling: f64,
    /// Specific heat of air, J/(kg·K) (`BalbiUnsteady.Cpa`)
    pub cpa: f64,
}

impl Default for BalbiCoefficients {
    fn default() -> Self {
        Self {
            cooling: 0.0,
            cpa: 1004.0,
        }
    }
}

impl BalbiCoefficients {
    /// Coefficients from `params`, defaulting each missing key
    pub fn from_params(params: &dyn ParameterResolver) -> Self {
        let defaults = Self::default();
        Self {
            cooling: params.double_or("BalbiUnsteady.cooling", defaults.cooling),
            cpa: params.double_or("BalbiUnsteady.Cpa", defaults.cpa),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Bound {
    slope: PropertyIndex,
    front_depth: PropertyIndex,
    curvature: PropertyIndex,
    normal_wind: PropertyIndex,
    rhod: PropertyIndex,
    rhol: PropertyIndex,
    md: PropertyIndex,
    ml: PropertyIndex,
    sd: PropertyIndex,
    sl: PropertyIndex,
    e: PropertyIndex,
    sigmad: PropertyIndex,
    sigmal: PropertyIndex,
    stoch: PropertyIndex,
    rho_a: PropertyIndex,
    ta: PropertyIndex,
    tau0: PropertyIndex,
    delta_h_water: PropertyIndex,
    delta_h: PropertyIndex,
    cp: PropertyIndex,
    ti: PropertyIndex,
    x0: PropertyIndex,
    r00: PropertyIndex,
    lai: PropertyIndex,
}

/// Intermediate terms shared by both branches of the solution
#[derive(Debug, Clone, Copy)]
struct SpreadTerms {
    /// No-wind, no-slope spread rate `R_0`
    base_rate: f64,
    /// Convective driving term A
    convective: f64,
    /// Flame tilt γ, radians
    tilt: f64,
    /// Particle residence time τ
    residence_time: f64,
    /// Radiative reference speed `r_0`
    r0: f64,
    front_depth: f64,
    curvature: f64,
}

/// Balbi (2011) rate of spread with dynamic flame depth
#[derive(Debug, Clone)]
pub struct BalbiUnsteady {
    index: usize,
    props: Bound,
    coefficients: BalbiCoefficients,
}

impl BalbiUnsteady {
    /// Registry name
    pub const NAME: &'static str = "BalbiUnsteady";

    /// Property names bound at construction
    pub const PROPERTIES: [&'static str; 24] = [
        "slope",
        "frontDepth",
        "frontCurvature",
        "normalWind",
        "fuel.Rhod",
        "fuel.Rhol",
        "fuel.Md",
        "fuel.Ml",
        "fuel.sd",
        "fuel.sl",
        "fuel.e",
        "fuel.Sigmad",
        "fuel.Sigmal",
        "fuel.stoch",
        "fuel.RhoA",
        "fuel.Ta",
        "fuel.Tau0",
        "fuel.Deltah",
        "fuel.DeltaH",
        "fuel.Cp",
        "fuel.Ti",
        "fuel.X0",
        "fuel.r00",
        "fuel.Blai",
    ];

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
        let props = Bound {
            slope: broker.resolve("slope")?,
            front_depth: broker.resolve("frontDepth")?,
            curvature: broker.resolve("frontCurvature")?,
            normal_wind: broker.resolve("normalWind")?,
            rhod: broker.resolve("fuel.Rhod")?,
            rhol: broker.resolve("fuel.Rhol")?,
            md: broker.resolve("fuel.Md")?,
            ml: broker.resolve("fuel.Ml")?,
            sd: broker.resolve("fuel.sd")?,
            sl: broker.resolve("fuel.sl")?,
            e: broker.resolve("fuel.e")?,
            sigmad: broker.resolve("fuel.Sigmad")?,
            sigmal: broker.resolve("fuel.Sigmal")?,
            stoch: broker.resolve("fuel.stoch")?,
            rho_a: broker.resolve("fuel.RhoA")?,
            ta: broker.resolve("fuel.Ta")?,
            tau0: broker.resolve("fuel.Tau0")?,
            delta_h_water: broker.resolve("fuel.Deltah")?,
            delta_h: broker.resolve("fuel.DeltaH")?,
            cp: broker.resolve("fuel.Cp")?,
            ti: broker.resolve("fuel.Ti")?,
            x0: broker.resolve("fuel.X0")?,
            r00: broker.resolve("fuel.r00")?,
            lai: broker.resolve("fuel.Blai")?,
        };
        let coefficients = BalbiCoefficients::from_params(params);
        debug!(
            "Created {} model #{} (cooling={}, Cpa={})",
            Self::NAME,
            index,
            coefficients.cooling,
            coefficients.cpa
        );
        Ok(Self {
            index,
            props,
            coefficients,
        })
    }

    /// Coefficients in use
    pub fn coefficients(&self) -> &BalbiCoefficients {
        &self.coefficients
    }

    /// Spread rate without wind or slope assistance (`R_0`), m/s
    ///
    /// Zero when the fuel bed or the burning zone is empty.
    pub fn base_spread_rate(&self, values: &PropertyVector) -> f64 {
        self.spread_terms(values).map_or(0.0, |terms| terms.base_rate)
    }

    fn spread_terms(&self, values: &PropertyVector) -> Option<SpreadTerms> {
        let p = &self.props;
        let depth = values[p.e];
        let front_depth = values[p.front_depth];
        if depth <= 0.0 || front_depth <= 0.0 {
            return None;
        }

        let rhod = values[p.rhod];
        let md = values[p.md];
        let sd = values[p.sd];
        let sigmad = values[p.sigmad];
        let sigmal = values[p.sigmal];
        let stoch = values[p.stoch];
        let ta = values[p.ta];
        let tau0 = values[p.tau0];
        let delta_h_water = values[p.delta_h_water];
        let delta_h = values[p.delta_h];
        let x0 = values[p.x0];
        let lai = values[p.lai];

        let beta_d = sigmad / (depth * rhod);
        let beta_l = sigmal / (depth * values[p.rhol]);
        let surface_d = sd * depth * beta_d;
        let surface_l = values[p.sl] * depth * beta_l;
        let nu = (surface_d / lai).min(1.0);

        let preheat = values[p.cp] * (values[p.ti] - ta);
        let vaporization = delta_h_water / preheat;
        let moisture_damping = 1.0 + vaporization * md;
        let r0 = sd * values[p.r00];
        let a0 = x0 * delta_h / (4.0 * preheat);
        let xsi = (values[p.ml] - md) * (sigmal / sigmad) * (delta_h_water / delta_h);
        let convective = nu * a0 / moisture_damping * (1.0 - xsi);
        let flame_temp =
            ta + delta_h * (1.0 - x0) * (1.0 - xsi) / ((stoch + 1.0) * self.coefficients.cpa);
        let radiant = STEFAN_BOLTZMANN * flame_temp.powi(4) / preheat;
        let u00 = 2.0 * lai * (stoch + 1.0) * flame_temp * rhod / (values[p.rho_a] * ta * tau0);
        let u0 = nu * u00;

        let optical_depth = 4.0 / (beta_d * sd);
        let emissivity = 1.0 - (-front_depth / optical_depth).exp();

        // Without foliage there is no reference flow to scale the wind by
        let wind_tilt = if u0 > 0.0 {
            values[p.normal_wind] / u0
        } else {
            0.0
        };
        let tilt = (values[p.slope] + wind_tilt).atan();
        let dead_share = surface_d / (surface_d + surface_l);
        let base_rate =
            depth / sigmad * radiant * emissivity / moisture_damping * dead_share * dead_share;

        Some(SpreadTerms {
            base_rate,
            convective,
            tilt,
            residence_time: tau0 / sd,
            r0,
            front_depth,
            curvature: values[p.curvature],
        })
    }
}

impl PropagationModel for BalbiUnsteady {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn index(&self) -> usize {
        self.index
    }

    fn required_properties(&self) -> &'static [&'static str] {
        &Self::PROPERTIES
    }

    fn evaluate_speed(&self, values: &PropertyVector) -> f64 {
        let Some(terms) = self.spread_terms(values) else {
            return 0.0;
        };
        let SpreadTerms {
            base_rate,
            convective,
            tilt,
            residence_time,
            r0,
            front_depth,
            curvature,
        } = terms;

        if tilt <= 0.0 {
            return base_rate;
        }

        let curvature_damping = (1.0 - curvature / (1.0 + curvature * curvature).sqrt()).powi(4);
        let (sin_tilt, cos_tilt) = tilt.sin_cos();
        let geom_factor = curvature_damping
            * (front_depth / residence_time)
            * ((1.0 + sin_tilt - cos_tilt)
                / (1.0 + front_depth * cos_tilt / (residence_time * r0)));
        let rt = base_rate + convective * geom_factor;

        0.5 * (rt + (rt * rt + 4.0 * r0 * base_rate / cos_tilt).sqrt())
    }
}
