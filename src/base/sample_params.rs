use super::{DeviatoricLaw, ParamCreep, ParamCreepUpdate, ParamRtl2020, ParamSolver};

/// Holds samples of creep model parameters
pub struct SampleParams {}

impl SampleParams {
    /// Returns sample parameters for the Kelvin model
    ///
    /// The values are dimensionless; with `gg0 = 0` the model behaves as a Maxwell dashpot.
    pub fn param_kelvin(eta0: f64, gg0: f64) -> ParamCreep {
        ParamCreep::Kelvin {
            eta0,
            gg0,
            strain_ini: 0.0,
        }
    }

    /// Returns sample parameters for the RTL2020 model of rock salt
    ///
    /// Units: MPa, day, K. The first mechanism is a Lemaitre transient law and the second one is a
    /// Munson-Dawson law.
    pub fn param_rtl2020(dev_vol: bool) -> ParamCreep {
        ParamCreep::Rtl2020(ParamRtl2020 {
            n_mechanism: 2,
            mechanisms: vec![DeviatoricLaw::Lemaitre, DeviatoricLaw::MunsonDawson],
            dev_vol,
            aa_r: 4100.0,  // K
            tt_ref: 300.0, // K
            alpha: 0.5,    // [-]
            aa2: 1.0e-5,   // 1/(day MPaⁿ²)
            n2: 2.0,       // [-]
            aa1: 1.0e-6,   // 1/(day MPaⁿ¹)
            n1: 3.0,       // [-]
            aa: 1.0e-4,    // 1/MPaᵐ
            bb: 2.0,       // [-]
            m: 2.0,        // [-]
            n: 2.0,        // [-]
            z: 0.5,        // [-]
            nnz: 1.0e-6,   // 1/(day MPaⁿᶻ)
            nz: 1.0,       // [-]
            mmz: 1.0e-6,   // 1/(day MPaᵐᶻ)
            mz: 2.0,       // [-]
            strain_ini: None,
        })
    }

    /// Returns sample parameters for the Kelvin model with default solver settings
    pub fn param_kelvin_update(eta0: f64, gg0: f64) -> ParamCreepUpdate {
        ParamCreepUpdate {
            creep: SampleParams::param_kelvin(eta0, gg0),
            solver: ParamSolver::new(),
        }
    }

    /// Returns sample parameters for the RTL2020 model with default solver settings
    pub fn param_rtl2020_update(dev_vol: bool) -> ParamCreepUpdate {
        ParamCreepUpdate {
            creep: SampleParams::param_rtl2020(dev_vol),
            solver: ParamSolver::new(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
