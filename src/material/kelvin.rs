use super::{CreepHistory, CreepInput, CreepModelTrait, FlowRule};
use crate::StrError;
use russell_lab::Vector;

/// Implements the linear (Kelvin) viscoelastic creep model
///
/// The single mechanism has the rate:
///
/// ```text
///        q - 3 G0 γ
/// rate = ──────────     q = σd_trial - 3 G x     γ = γ_old + x
///          3 η0
/// ```
///
/// where η0 is the viscosity and G0 is the shear modulus of the Kelvin spring. With G0 = 0, the model
/// behaves as a Maxwell dashpot in series with the elastic spring.
///
/// A zero deviatoric trial stress yields a zero rate (no recovery), because the flow direction is undefined.
pub struct Kelvin {
    /// Viscosity η0
    eta0: f64,

    /// Shear modulus of the Kelvin spring G0
    gg0: f64,

    /// Initial accumulated creep strain
    strain_ini: f64,
}

/// Holds the Kelvin flow rule at an integration point
struct KelvinFlow {
    /// Viscosity η0
    eta0: f64,

    /// Shear modulus of the Kelvin spring G0
    gg0: f64,

    /// Elastic shear modulus G
    gg: f64,

    /// Equivalent trial stress
    sigma_d_trial: f64,

    /// Old accumulated creep strain
    strain_old: f64,
}

impl Kelvin {
    /// Allocates a new instance
    pub fn new(eta0: f64, gg0: f64, strain_ini: f64) -> Result<Self, StrError> {
        if eta0 <= 0.0 {
            return Err("eta0 must be > 0.0");
        }
        if gg0 < 0.0 {
            return Err("gg0 must be ≥ 0.0");
        }
        Ok(Kelvin { eta0, gg0, strain_ini })
    }
}

impl CreepModelTrait for Kelvin {
    fn n_mechanism(&self) -> usize {
        1
    }

    fn volumetric(&self) -> bool {
        false
    }

    fn initialize_history(&self, history: &mut CreepHistory) {
        history.initialize(&[self.strain_ini]);
    }

    fn flow_rule<'a>(&'a self, input: &CreepInput<'a>) -> Result<Box<dyn FlowRule + 'a>, StrError> {
        if input.history.n_mechanism() != 1 {
            return Err("history must have exactly one mechanism for the Kelvin model");
        }
        Ok(Box::new(KelvinFlow {
            eta0: self.eta0,
            gg0: self.gg0,
            gg: input.moduli.gg,
            sigma_d_trial: input.trial.sigma_d,
            strain_old: input.history.strain_old()[0],
        }))
    }
}

impl FlowRule for KelvinFlow {
    fn n_mechanism(&self) -> usize {
        1
    }

    fn rate(&self, x: &Vector, _i: usize) -> f64 {
        if self.sigma_d_trial == 0.0 {
            return 0.0;
        }
        let q = self.sigma_d_trial - 3.0 * self.gg * x[0];
        (q - 3.0 * self.gg0 * (self.strain_old + x[0])) / (3.0 * self.eta0)
    }

    fn rate_derivative(&self, _x: &Vector, _i: usize, _j: usize) -> f64 {
        if self.sigma_d_trial == 0.0 {
            return 0.0;
        }
        -(self.gg + self.gg0) / self.eta0
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
