use super::{CreepLocalState, CreepUpdate};
use crate::base::{Idealization, ParamCreepUpdate};
use crate::StrError;
use russell_tensor::{t4_ddot_t2_update, Tensor2, Tensor4};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::path::Path;

/// Holds the results at the end of one step of a creep path
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreepRecord {
    /// Time at the end of the step
    pub time: f64,

    /// Mean stress σm (tension positive)
    pub sigma_m: f64,

    /// Equivalent (von Mises) stress σd
    pub sigma_d: f64,

    /// Accumulated creep strain of each mechanism
    pub strain: Vec<f64>,

    /// Accumulated volumetric creep strain
    pub vol_strain: f64,

    /// Combined equivalent creep strain
    pub eqv_strain: f64,

    /// Equivalent creep strain rate over the step
    pub eqv_strain_rate: f64,

    /// Number of local iterations
    pub n_iterations: usize,
}

/// Drives a single integration point along a strain path with creep
///
/// Each step computes the trial stress from the elastic predictor and runs the creep stress-update:
///
/// ```text
/// σ_trial = σ + D : Δε
/// σ       = σ_trial - 2 G Δεc
/// ```
///
/// Converged steps are accepted immediately (the history "old" values are advanced).
pub struct CreepPath {
    /// Holds the stress-update
    update: CreepUpdate,

    /// Holds the linear elastic rigidity modulus
    dd: Tensor4,

    /// Holds the local state
    state: CreepLocalState,

    /// Holds the total strain ε
    strain: Tensor2,

    /// Holds the current time
    time: f64,

    /// Holds the records (the first one corresponds to the initial state)
    pub records: Vec<CreepRecord>,
}

impl CreepPath {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `ideal` -- the geometry idealization
    /// * `young` -- Young's modulus
    /// * `poisson` -- Poisson's coefficient
    /// * `param` -- the creep model and solver parameters
    /// * `sigma_m` -- initial mean stress (tension positive)
    /// * `sigma_d` -- initial equivalent stress, applied as a triaxial compression about the first axis
    pub fn new(
        ideal: &Idealization,
        young: f64,
        poisson: f64,
        param: &ParamCreepUpdate,
        sigma_m: f64,
        sigma_d: f64,
    ) -> Result<Self, StrError> {
        if sigma_d < 0.0 {
            return Err("sigma_d must be ≥ 0.0");
        }
        let mandel = ideal.mandel();
        let dd = ideal.elastic_modulus(young, poisson)?;
        let update = CreepUpdate::new(param)?;
        let mut state = CreepLocalState::new(mandel);
        {
            // σ₀₀ = σm - 2/3 σd, σ₁₁ = σ₂₂ = σm + 1/3 σd
            let sigma = state.stress.vector_mut();
            sigma[0] = sigma_m - 2.0 * sigma_d / 3.0;
            sigma[1] = sigma_m + sigma_d / 3.0;
            sigma[2] = sigma_m + sigma_d / 3.0;
        }
        update.initialize(&mut state);
        let mut path = CreepPath {
            update,
            dd,
            state,
            strain: Tensor2::new(mandel),
            time: 0.0,
            records: Vec::new(),
        };
        path.push_record();
        Ok(path)
    }

    /// Sets the absolute temperature (None disables the temperature activation)
    pub fn set_temperature(&mut self, temperature: Option<f64>) {
        self.state.temperature = temperature;
    }

    /// Returns the local state
    pub fn state(&self) -> &CreepLocalState {
        &self.state
    }

    /// Returns the total strain
    pub fn strain(&self) -> &Tensor2 {
        &self.strain
    }

    /// Returns the current time
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Runs one step with a given strain increment
    ///
    /// On failure, the stress and history are left unchanged.
    pub fn step(&mut self, dt: f64, delta_strain: &Tensor2) -> Result<(), StrError> {
        if delta_strain.mandel() != self.strain.mandel() {
            return Err("delta_strain has an incompatible Mandel representation");
        }
        let stress_backup = self.state.stress.clone();
        t4_ddot_t2_update(&mut self.state.stress, 1.0, &self.dd, delta_strain, 1.0); // σ += D : Δε
        if let Err(e) = self.update.update_stress(&mut self.state, &self.dd, dt) {
            self.state.stress.set_tensor(1.0, &stress_backup);
            return Err(e);
        }
        self.state.accept();
        let strain = self.strain.vector_mut();
        for i in 0..strain.dim() {
            strain[i] += delta_strain.vector()[i];
        }
        self.time += dt;
        self.push_record();
        Ok(())
    }

    /// Runs a number of steps with fixed strain (stress relaxation)
    pub fn relax(&mut self, dt: f64, n_steps: usize) -> Result<(), StrError> {
        let zero = Tensor2::new(self.strain.mandel());
        for _ in 0..n_steps {
            self.step(dt, &zero)?;
        }
        Ok(())
    }

    /// Writes a JSON file with the records
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer_pretty(&mut file, &self.records).map_err(|_| "cannot write file")?;
        Ok(())
    }

    /// Prints a table with the records
    pub fn print_table(&self) {
        println!(
            "{:>12} {:>12} {:>12} {:>12} {:>12} {:>5}",
            "time", "σm", "σd", "γ", "γv", "iter"
        );
        for r in &self.records {
            println!(
                "{:>12.4e} {:>12.6} {:>12.6} {:>12.4e} {:>12.4e} {:>5}",
                r.time, r.sigma_m, r.sigma_d, r.eqv_strain, r.vol_strain, r.n_iterations
            );
        }
    }

    /// Appends a record with the current state
    fn push_record(&mut self) {
        let history = &self.state.history;
        self.records.push(CreepRecord {
            time: self.time,
            sigma_m: self.state.stress.invariant_sigma_m(),
            sigma_d: self.state.stress.invariant_sigma_d(),
            strain: history.strain().as_data().clone(),
            vol_strain: history.vol_strain(),
            eqv_strain: history.eqv_strain(),
            eqv_strain_rate: history.eqv_strain_rate(),
            n_iterations: self.state.n_iterations,
        });
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
