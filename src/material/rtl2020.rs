use super::{CreepHistory, CreepInput, CreepModelTrait, FlowRule};
use crate::base::{DeviatoricLaw, ParamRtl2020};
use crate::StrError;
use russell_lab::Vector;
use russell_tensor::SQRT_3;

/// Implements the RTL2020 creep model for rock salt
///
/// Each deviatoric mechanism (slot) follows one [DeviatoricLaw]. All mechanisms share the relaxed
/// equivalent stress:
///
/// ```text
/// q = σd_trial - 3 G Σₖ xₖ
/// ```
///
/// The rates are activated by temperature (if given):
///
/// ```text
/// e = exp(Ar (1/T_ref - 1/T))
/// ```
///
/// The volumetric law (if `dev_vol`) uses the relaxed mean stress (positive in compression):
///
/// ```text
/// p  = p_trial + (2 G / √3) xv
/// rv = e (Mz ⟨q - z p⟩ᵐᶻ - Nz ⟨p⟩ⁿᶻ)
/// ```
pub struct Rtl2020 {
    /// Holds the parameters
    param: ParamRtl2020,

    /// Initial accumulated creep strain of each mechanism
    strain_ini: Vec<f64>,
}

/// Holds the RTL2020 flow rule at an integration point
struct Rtl2020Flow<'a> {
    /// Holds the parameters
    param: &'a ParamRtl2020,

    /// Elastic shear modulus G
    gg: f64,

    /// Equivalent trial stress
    sigma_d_trial: f64,

    /// Mean trial stress (positive in compression)
    p_trial: f64,

    /// Temperature activation factor
    e: f64,

    /// Old accumulated creep strain of each mechanism
    strain_old: &'a Vector,
}

impl Rtl2020 {
    /// Allocates a new instance
    ///
    /// Only the parameters of the laws actually used are checked.
    pub fn new(param: &ParamRtl2020) -> Result<Self, StrError> {
        let n = param.n_mechanism;
        if n < 1 {
            return Err("n_mechanism must be ≥ 1");
        }
        if param.mechanisms.len() != n {
            return Err("mechanisms.len() must equal n_mechanism");
        }
        let strain_ini = match &param.strain_ini {
            Some(values) => {
                if values.len() != n {
                    return Err("strain_ini.len() must equal n_mechanism");
                }
                values.clone()
            }
            None => vec![0.0; n],
        };
        if param.tt_ref <= 0.0 {
            return Err("tt_ref must be > 0.0");
        }
        let uses = |law: DeviatoricLaw| param.mechanisms.iter().any(|m| *m == law);
        if uses(DeviatoricLaw::Lemaitre) {
            if param.alpha <= 0.0 || param.alpha > 1.0 {
                return Err("alpha must be in (0.0, 1.0]");
            }
            if param.aa2 < 0.0 {
                return Err("aa2 must be ≥ 0.0");
            }
            if param.n2 < 1.0 {
                return Err("n2 must be ≥ 1.0");
            }
        }
        if uses(DeviatoricLaw::Reference) || uses(DeviatoricLaw::MunsonDawson) {
            if param.aa1 < 0.0 {
                return Err("aa1 must be ≥ 0.0");
            }
            if param.n1 < 1.0 {
                return Err("n1 must be ≥ 1.0");
            }
        }
        if uses(DeviatoricLaw::MunsonDawson) {
            if param.aa <= 0.0 {
                return Err("aa must be > 0.0");
            }
            if param.m < 1.0 {
                return Err("m must be ≥ 1.0");
            }
            if param.n < 1.0 {
                return Err("n must be ≥ 1.0");
            }
        }
        if param.dev_vol {
            if param.z < 0.0 {
                return Err("z must be ≥ 0.0");
            }
            if param.nnz < 0.0 || param.mmz < 0.0 {
                return Err("nnz and mmz must be ≥ 0.0");
            }
            if param.nz < 1.0 {
                return Err("nz must be ≥ 1.0");
            }
            if param.mz < 1.0 {
                return Err("mz must be ≥ 1.0");
            }
        }
        Ok(Rtl2020 {
            param: param.clone(),
            strain_ini,
        })
    }

    /// Calculates the temperature activation factor
    ///
    /// Returns 1 if the temperature is not given.
    pub fn activation(&self, temperature: Option<f64>) -> Result<f64, StrError> {
        match temperature {
            Some(tt) => {
                if tt <= 0.0 {
                    return Err("temperature must be > 0.0");
                }
                Ok(f64::exp(self.param.aa_r * (1.0 / self.param.tt_ref - 1.0 / tt)))
            }
            None => Ok(1.0),
        }
    }
}

impl CreepModelTrait for Rtl2020 {
    fn n_mechanism(&self) -> usize {
        self.param.n_mechanism
    }

    fn volumetric(&self) -> bool {
        self.param.dev_vol
    }

    fn initialize_history(&self, history: &mut CreepHistory) {
        history.initialize(&self.strain_ini);
    }

    fn flow_rule<'a>(&'a self, input: &CreepInput<'a>) -> Result<Box<dyn FlowRule + 'a>, StrError> {
        if input.history.n_mechanism() != self.param.n_mechanism {
            return Err("history must have n_mechanism values");
        }
        Ok(Box::new(Rtl2020Flow {
            param: &self.param,
            gg: input.moduli.gg,
            sigma_d_trial: input.trial.sigma_d,
            p_trial: input.trial.p,
            e: self.activation(input.temperature)?,
            strain_old: input.history.strain_old(),
        }))
    }
}

/// Returns ⟨v⟩ᵏ (zero if v ≤ 0)
fn macaulay_pow(v: f64, k: f64) -> f64 {
    if v > 0.0 {
        f64::powf(v, k)
    } else {
        0.0
    }
}

impl<'a> Rtl2020Flow<'a> {
    /// Calculates the relaxed equivalent stress
    fn q(&self, x: &Vector) -> f64 {
        let sum: f64 = x.as_data().iter().sum();
        self.sigma_d_trial - 3.0 * self.gg * sum
    }

    /// Calculates the steady-state rate and its derivative with respect to q
    fn steady_state(&self, q: f64) -> (f64, f64) {
        let p = self.param;
        let r = self.e * p.aa1 * macaulay_pow(q, p.n1);
        let dr_dq = self.e * p.aa1 * p.n1 * macaulay_pow(q, p.n1 - 1.0);
        (r, dr_dq)
    }

    /// Calculates the Munson-Dawson transient function and auxiliary values
    ///
    /// Returns `(F, dg/du, ε*)`.
    fn transient(&self, q: f64, zeta: f64) -> (f64, f64, f64) {
        let p = self.param;
        let eps_star = p.aa * macaulay_pow(q, p.m);
        let u = 1.0 - zeta / eps_star;
        let g = p.bb * f64::signum(u) * f64::powf(f64::abs(u), p.n);
        let dg_du = p.bb * p.n * f64::powf(f64::abs(u), p.n - 1.0);
        (f64::exp(g), dg_du, eps_star)
    }
}

impl<'a> FlowRule for Rtl2020Flow<'a> {
    fn n_mechanism(&self) -> usize {
        self.param.n_mechanism
    }

    fn volumetric(&self) -> bool {
        self.param.dev_vol
    }

    fn rate(&self, x: &Vector, i: usize) -> f64 {
        let p = self.param;
        let q = self.q(x);
        if q <= 0.0 {
            return 0.0;
        }
        let gamma = self.strain_old[i] + x[i];
        match p.mechanisms[i] {
            DeviatoricLaw::Reference => self.steady_state(q).0,
            DeviatoricLaw::Lemaitre => {
                let h = f64::powf(1.0 + gamma, 1.0 - 1.0 / p.alpha);
                self.e * p.aa2 * f64::powf(q, p.n2) * h
            }
            DeviatoricLaw::MunsonDawson => {
                let (ff, _, _) = self.transient(q, gamma);
                ff * self.steady_state(q).0
            }
        }
    }

    fn rate_derivative(&self, x: &Vector, i: usize, j: usize) -> f64 {
        let p = self.param;
        let q = self.q(x);
        if q <= 0.0 {
            return 0.0;
        }
        let dq_dx = -3.0 * self.gg;
        let delta = if i == j { 1.0 } else { 0.0 };
        let gamma = self.strain_old[i] + x[i];
        match p.mechanisms[i] {
            DeviatoricLaw::Reference => self.steady_state(q).1 * dq_dx,
            DeviatoricLaw::Lemaitre => {
                let h = f64::powf(1.0 + gamma, 1.0 - 1.0 / p.alpha);
                let dh_dgamma = (1.0 - 1.0 / p.alpha) * f64::powf(1.0 + gamma, -1.0 / p.alpha);
                let c = self.e * p.aa2;
                c * p.n2 * f64::powf(q, p.n2 - 1.0) * dq_dx * h + delta * c * f64::powf(q, p.n2) * dh_dgamma
            }
            DeviatoricLaw::MunsonDawson => {
                let (rss, drss_dq) = self.steady_state(q);
                let (ff, dg_du, eps_star) = self.transient(q, gamma);
                let deps_star_dx = p.aa * p.m * f64::powf(q, p.m - 1.0) * dq_dx;
                let du_dx = gamma * deps_star_dx / (eps_star * eps_star) - delta / eps_star;
                ff * drss_dq * dq_dx + ff * rss * dg_du * du_dx
            }
        }
    }

    fn vol_rate(&self, x: &Vector, x_vol: f64) -> f64 {
        let p = self.param;
        let q = self.q(x);
        let pp = self.p_trial + 2.0 * self.gg * x_vol / SQRT_3;
        self.e * (p.mmz * macaulay_pow(q - p.z * pp, p.mz) - p.nnz * macaulay_pow(pp, p.nz))
    }

    fn vol_rate_derivative(&self, x: &Vector, x_vol: f64) -> f64 {
        let p = self.param;
        let q = self.q(x);
        let c = 2.0 * self.gg / SQRT_3;
        let pp = self.p_trial + c * x_vol;
        let dil = p.mmz * p.mz * macaulay_pow(q - p.z * pp, p.mz - 1.0) * p.z * c;
        let com = p.nnz * p.nz * macaulay_pow(pp, p.nz - 1.0) * c;
        -self.e * (dil + com)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
