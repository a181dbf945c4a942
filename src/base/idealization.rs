use crate::StrError;
use russell_tensor::{LinElasticity, Mandel, Tensor4};

/// Defines the geometry idealization of the integration points (plane-strain/axisymmetric or 3D)
///
/// **Note:** The plane-stress case is not available because the creep correction `σ -= 2 G Δεc`
/// does not preserve the out-of-plane stress condition.
#[derive(Clone, Copy, Debug)]
pub struct Idealization {
    /// Indicates 2D (plane-strain or axisymmetric) instead of 3D
    pub two_dim: bool,
}

impl Idealization {
    /// Allocates a new instance
    pub fn new(ndim: usize) -> Self {
        Idealization { two_dim: ndim == 2 }
    }

    /// Returns the symmetric Mandel representation associated with the idealization
    ///
    /// # Results
    ///
    /// * `2D`: [Mandel::Symmetric2D]
    /// * `3D`: [Mandel::Symmetric]
    pub fn mandel(&self) -> Mandel {
        if self.two_dim {
            Mandel::Symmetric2D
        } else {
            Mandel::Symmetric
        }
    }

    /// Returns the isotropic linear elastic rigidity modulus D
    ///
    /// ```text
    /// σ = D : ε
    /// ```
    pub fn elastic_modulus(&self, young: f64, poisson: f64) -> Result<Tensor4, StrError> {
        if young <= 0.0 {
            return Err("Young's modulus must be > 0.0");
        }
        if poisson <= -1.0 || poisson >= 0.5 {
            return Err("Poisson's coefficient must be in (-1.0, 0.5)");
        }
        let plane_stress = false;
        let ela = LinElasticity::new(young, poisson, self.two_dim, plane_stress);
        Ok(ela.get_modulus().clone())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
