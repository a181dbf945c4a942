//! Implements the base structures for creep stress-updates such as parameters and configurations

mod constants;
mod idealization;
mod parameters;
mod sample_params;
pub use crate::base::constants::*;
pub use crate::base::idealization::*;
pub use crate::base::parameters::*;
pub use crate::base::sample_params::*;
