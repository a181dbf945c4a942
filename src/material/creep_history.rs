use russell_lab::Vector;
use serde::{Deserialize, Serialize};

/// Holds the history (internal) variables of a creep model at an integration point
///
/// Each variable is stored as an "old" value (previous converged time step) and a "current" value.
/// The local return-map only reads the old values and writes the current values after convergence.
/// The host accepts the current values at the end of a converged time step with [CreepHistory::accept]
/// or discards them with [CreepHistory::restore].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreepHistory {
    /// Indicates that the history has been initialized by the model
    initialized: bool,

    /// Accumulated equivalent creep strain of each mechanism (old)
    strain_old: Vector,

    /// Accumulated equivalent creep strain of each mechanism (current)
    strain: Vector,

    /// Accumulated volumetric creep strain (old)
    vol_strain_old: f64,

    /// Accumulated volumetric creep strain (current)
    vol_strain: f64,

    /// Combined equivalent creep strain γ = Σᵢ γᵢ (old)
    eqv_strain_old: f64,

    /// Combined equivalent creep strain γ = Σᵢ γᵢ (current)
    eqv_strain: f64,

    /// Equivalent creep strain rate over the last increment
    eqv_strain_rate: f64,
}

impl CreepHistory {
    /// Allocates a new (uninitialized) instance
    pub fn new() -> Self {
        CreepHistory {
            initialized: false,
            strain_old: Vector::new(0),
            strain: Vector::new(0),
            vol_strain_old: 0.0,
            vol_strain: 0.0,
            eqv_strain_old: 0.0,
            eqv_strain: 0.0,
            eqv_strain_rate: 0.0,
        }
    }

    /// Initializes the accumulated strains (old and current) with the initial values
    pub(crate) fn initialize(&mut self, strain_ini: &[f64]) {
        let n = strain_ini.len();
        self.strain_old = Vector::new(n);
        self.strain = Vector::new(n);
        for i in 0..n {
            self.strain_old[i] = strain_ini[i];
            self.strain[i] = strain_ini[i];
        }
        self.vol_strain_old = 0.0;
        self.vol_strain = 0.0;
        self.eqv_strain_old = strain_ini.iter().sum();
        self.eqv_strain = self.eqv_strain_old;
        self.eqv_strain_rate = 0.0;
        self.initialized = true;
    }

    /// Commits the converged increments into the current values
    ///
    /// ```text
    /// γᵢ = γᵢ_old + xᵢ
    /// γv = γv_old + xv
    /// γ  = Σᵢ γᵢ
    /// γ̇  = Σᵢ xᵢ / Δt
    /// ```
    pub(crate) fn commit(&mut self, x_dev: &Vector, x_vol: f64, dt: f64) {
        let mut sum = 0.0;
        for i in 0..self.strain.dim() {
            self.strain[i] = self.strain_old[i] + x_dev[i];
            sum += x_dev[i];
        }
        self.vol_strain = self.vol_strain_old + x_vol;
        self.eqv_strain = self.strain.as_data().iter().sum();
        self.eqv_strain_rate = sum / dt;
    }

    /// Accepts the current values as the old values for the next time step
    pub fn accept(&mut self) {
        for i in 0..self.strain.dim() {
            self.strain_old[i] = self.strain[i];
        }
        self.vol_strain_old = self.vol_strain;
        self.eqv_strain_old = self.eqv_strain;
    }

    /// Restores the current values from the old values (e.g., after a rejected time step)
    pub fn restore(&mut self) {
        for i in 0..self.strain.dim() {
            self.strain[i] = self.strain_old[i];
        }
        self.vol_strain = self.vol_strain_old;
        self.eqv_strain = self.eqv_strain_old;
        self.eqv_strain_rate = 0.0;
    }

    /// Indicates that the history has been initialized
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the number of mechanisms
    pub fn n_mechanism(&self) -> usize {
        self.strain.dim()
    }

    /// Returns the old accumulated creep strains of all mechanisms
    pub fn strain_old(&self) -> &Vector {
        &self.strain_old
    }

    /// Returns the current accumulated creep strains of all mechanisms
    pub fn strain(&self) -> &Vector {
        &self.strain
    }

    /// Returns the old accumulated volumetric creep strain
    pub fn vol_strain_old(&self) -> f64 {
        self.vol_strain_old
    }

    /// Returns the current accumulated volumetric creep strain
    pub fn vol_strain(&self) -> f64 {
        self.vol_strain
    }

    /// Returns the current combined equivalent creep strain
    pub fn eqv_strain(&self) -> f64 {
        self.eqv_strain
    }

    /// Returns the equivalent creep strain rate over the last increment
    pub fn eqv_strain_rate(&self) -> f64 {
        self.eqv_strain_rate
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
