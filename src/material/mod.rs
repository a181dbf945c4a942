//! Implements the creep models and the local stress-update (return-map)

mod creep_history;
mod creep_local_state;
mod creep_model;
mod creep_path;
mod creep_update;
mod elastic_moduli;
mod flow_rule;
mod kelvin;
mod local_solver;
mod rtl2020;
mod trial_stress;
pub use crate::material::creep_history::*;
pub use crate::material::creep_local_state::*;
pub use crate::material::creep_model::*;
pub use crate::material::creep_path::*;
pub use crate::material::creep_update::*;
pub use crate::material::elastic_moduli::*;
pub use crate::material::flow_rule::*;
pub use crate::material::kelvin::*;
pub use crate::material::local_solver::*;
pub use crate::material::rtl2020::*;
pub use crate::material::trial_stress::*;
