use super::CreepHistory;
use russell_tensor::{Mandel, Tensor2};
use serde::{Deserialize, Serialize};

/// Holds the creep state at a single integration point
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreepLocalState {
    /// Holds the stress tensor σ (trial stress on input; corrected stress on output)
    pub stress: Tensor2,

    /// Holds the creep strain increment Δεc of the last update
    pub creep_strain_incr: Tensor2,

    /// Holds the history variables
    pub history: CreepHistory,

    /// Holds the absolute temperature (None disables the temperature activation)
    pub temperature: Option<f64>,

    /// Holds the number of local iterations of the last update
    pub n_iterations: usize,
}

impl CreepLocalState {
    /// Allocates a new instance with zero stress and an uninitialized history
    pub fn new(mandel: Mandel) -> Self {
        CreepLocalState {
            stress: Tensor2::new(mandel),
            creep_strain_incr: Tensor2::new(mandel),
            history: CreepHistory::new(),
            temperature: None,
            n_iterations: 0,
        }
    }

    /// Returns the Mandel representation
    pub fn mandel(&self) -> Mandel {
        self.stress.mandel()
    }

    /// Accepts the history variables at the end of a converged time step
    pub fn accept(&mut self) {
        self.history.accept();
    }

    /// Discards the history variables of a rejected time step
    pub fn restore(&mut self) {
        self.history.restore();
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
