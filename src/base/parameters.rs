use crate::StrError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Defines the creep law assigned to a deviatoric mechanism (slot) of the RTL2020 model
///
/// The laws are mutually exclusive per slot; the rates of different slots are added through the shared
/// equivalent stress `q = σd_trial - 3 G Σ xₖ`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum DeviatoricLaw {
    /// Steady-state (reference) power law
    ///
    /// ```text
    /// rate = e A1 ⟨q⟩ⁿ¹
    /// ```
    Reference,

    /// Lemaitre power law with strain hardening
    ///
    /// ```text
    /// rate = e A2 ⟨q⟩ⁿ² (1 + γ)^(1 - 1/α)
    /// ```
    Lemaitre,

    /// Munson-Dawson law (steady-state law times a transient function)
    ///
    /// ```text
    /// rate = F e A1 ⟨q⟩ⁿ¹
    /// F = exp(B sgn(u) |u|ⁿ)   u = 1 - ζ/ε*   ε* = A ⟨q⟩ᵐ
    /// ```
    MunsonDawson,
}

/// Holds parameters for the RTL2020 rock-salt model
///
/// The model combines `n_mechanism` deviatoric creep mechanisms (see [DeviatoricLaw]) and, optionally,
/// an independent volumetric creep law:
///
/// ```text
/// p  = p_trial + (2 G / √3) xv
/// rv = e (Mz ⟨q - z p⟩ᵐᶻ - Nz ⟨p⟩ⁿᶻ)
/// ```
///
/// where `p` is the mean stress (positive in compression) and `e` is the temperature activation factor:
///
/// ```text
/// e = exp(Ar (1/T_ref - 1/T))
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ParamRtl2020 {
    /// Number of deviatoric creep mechanisms
    #[serde(alias = "num_creep_mechanisms", alias = "num_cm")]
    pub n_mechanism: usize,

    /// Creep law of each mechanism slot (len = n_mechanism)
    pub mechanisms: Vec<DeviatoricLaw>,

    /// Enables the volumetric creep law (otherwise, only deviatoric creep is computed)
    pub dev_vol: bool,

    /// Activation coefficient Ar = Q/R (temperature units)
    pub aa_r: f64,

    /// Reference temperature T_ref (absolute)
    pub tt_ref: f64,

    /// Lemaitre: hardening exponent α (0 < α ≤ 1)
    pub alpha: f64,

    /// Lemaitre: rate coefficient A2
    pub aa2: f64,

    /// Lemaitre: stress exponent n2
    pub n2: f64,

    /// Steady-state: rate coefficient A1
    pub aa1: f64,

    /// Steady-state: stress exponent n1
    pub n1: f64,

    /// Munson-Dawson: transient limit coefficient A
    pub aa: f64,

    /// Munson-Dawson: transient hardening coefficient B
    pub bb: f64,

    /// Munson-Dawson: transient limit stress exponent m
    pub m: f64,

    /// Munson-Dawson: transient function exponent n (n ≥ 1)
    pub n: f64,

    /// Volumetric: dilatancy slope z
    pub z: f64,

    /// Volumetric: compaction coefficient Nz
    pub nnz: f64,

    /// Volumetric: compaction exponent nz
    pub nz: f64,

    /// Volumetric: dilatancy coefficient Mz
    pub mmz: f64,

    /// Volumetric: dilatancy exponent mz
    pub mz: f64,

    /// Initial accumulated creep strain of each mechanism (zero if None)
    #[serde(default)]
    pub strain_ini: Option<Vec<f64>>,
}

/// Holds parameters for creep models
#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum ParamCreep {
    /// Linear (Kelvin) viscoelastic model with a single mechanism
    ///
    /// ```text
    /// rate = (q - 3 G0 γ) / (3 η0)
    /// ```
    Kelvin {
        /// Reference viscosity η0
        eta0: f64,

        /// Reference shear modulus G0 of the Kelvin spring (zero renders a Maxwell dashpot)
        gg0: f64,

        /// Initial accumulated creep strain
        #[serde(default)]
        strain_ini: f64,
    },

    /// RTL2020 multi-mechanism deviatoric model with optional volumetric creep
    Rtl2020(ParamRtl2020),
}

/// Holds parameters for the local Newton solver
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamSolver {
    /// Maximum number of Newton iterations
    #[serde(alias = "max_iterations", default = "default_n_max_iterations")]
    pub n_max_iterations: usize,

    /// Absolute tolerance on the residual norm
    #[serde(alias = "abs_tol", default = "default_tol")]
    pub tol_abs: f64,

    /// Relative tolerance on the residual norm (w.r.t. the initial residual)
    #[serde(alias = "rel_tol", default = "default_tol")]
    pub tol_rel: f64,

    /// Prints the Newton iterations
    #[serde(default)]
    pub verbose: bool,
}

fn default_n_max_iterations() -> usize {
    20
}

fn default_tol() -> f64 {
    1e-10
}

impl ParamSolver {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        ParamSolver {
            n_max_iterations: default_n_max_iterations(),
            tol_abs: default_tol(),
            tol_rel: default_tol(),
            verbose: false,
        }
    }

    /// Validates the parameters
    pub fn validate(&self) -> Result<(), StrError> {
        if self.n_max_iterations < 1 {
            return Err("n_max_iterations must be ≥ 1");
        }
        if self.tol_abs < 0.0 {
            return Err("tol_abs must be ≥ 0.0");
        }
        if self.tol_rel < 0.0 {
            return Err("tol_rel must be ≥ 0.0");
        }
        Ok(())
    }
}

/// Holds all parameters of a creep stress-update
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ParamCreepUpdate {
    /// Creep model
    pub creep: ParamCreep,

    /// Local solver
    #[serde(default = "ParamSolver::new")]
    pub solver: ParamSolver,
}

impl ParamCreepUpdate {
    /// Reads a JSON file containing the parameters
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(&path).map_err(|_| "file not found")?;
        let reader = BufReader::new(file);
        let data = serde_json::from_reader(reader).map_err(|_| "deserialize failed")?;
        Ok(data)
    }

    /// Writes a JSON file with the parameters
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer_pretty(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
