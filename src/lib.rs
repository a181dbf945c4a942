//! Pmcreep - Creep stress-update models for porous media mechanics
//!
//! This crate implements the local (integration point) stress update of creeping geomaterials such as
//! rock salt. Given a trial (elastic) stress and a time increment, the return-map computes the creep strain
//! increment by solving, with a local Newton method, the implicit flow-rule equations of one or more competing
//! creep mechanisms in the deviatoric and (optionally) volumetric stress spaces.
//!
//! The main structures are:
//!
//! * [base::ParamCreepUpdate] -- holds the parameters of the creep model and the local solver
//! * [material::CreepUpdate] -- performs the return-map at one (or many, in parallel) integration points
//! * [material::CreepLocalState] -- holds the stress, creep strain increment and history at one point
//! * [material::CreepPath] -- drives a single point through a sequence of strain/time increments

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod material;
