use super::{CreepHistory, ElasticModuli, FlowRule, Kelvin, LocalSolution, Rtl2020, TrialStress};
use crate::base::ParamCreep;
use crate::StrError;

/// Holds the frozen data of one integration point used to build a flow rule
pub struct CreepInput<'a> {
    /// Trial stress and invariants
    pub trial: &'a TrialStress,

    /// Elastic moduli extracted from the rigidity modulus
    pub moduli: ElasticModuli,

    /// Absolute temperature (None disables the temperature activation)
    pub temperature: Option<f64>,

    /// History variables (only the old values are read)
    pub history: &'a CreepHistory,
}

/// Specifies the essential functions for creep models
pub trait CreepModelTrait: Send + Sync {
    /// Returns the number of deviatoric creep mechanisms
    fn n_mechanism(&self) -> usize;

    /// Indicates that the volumetric creep equation is enabled
    fn volumetric(&self) -> bool;

    /// Sets the initial condition of the history variables
    fn initialize_history(&self, history: &mut CreepHistory);

    /// Returns the flow rule for the local return-map of one integration point
    fn flow_rule<'a>(&'a self, input: &CreepInput<'a>) -> Result<Box<dyn FlowRule + 'a>, StrError>;

    /// Commits the converged increments into the current history values
    ///
    /// This function is only called after the local solver has converged.
    fn commit_history(&self, history: &mut CreepHistory, solution: &LocalSolution, dt: f64) {
        history.commit(&solution.x_dev, solution.x_vol, dt);
    }
}

/// Holds the actual creep model implementation
pub struct CreepModel {
    /// Holds the actual model implementation
    pub actual: Box<dyn CreepModelTrait>,
}

impl CreepModel {
    /// Allocates a new instance
    pub fn new(param: &ParamCreep) -> Result<Self, StrError> {
        let actual: Box<dyn CreepModelTrait> = match param {
            // Linear (Kelvin) viscoelastic model
            ParamCreep::Kelvin { eta0, gg0, strain_ini } => Box::new(Kelvin::new(*eta0, *gg0, *strain_ini)?),

            // RTL2020 rock-salt model
            ParamCreep::Rtl2020(p) => Box::new(Rtl2020::new(p)?),
        };
        Ok(CreepModel { actual })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
