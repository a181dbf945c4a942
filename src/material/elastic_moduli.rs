use russell_tensor::Tensor4;

/// Holds the isotropic elastic moduli extracted from a rigidity modulus
///
/// The moduli are read from the Mandel matrix of an (assumed) isotropic tensor:
///
/// ```text
/// D₀₁ = λ       (C₀₀₁₁)
/// D₃₃ = 2 G     (2 C₀₁₀₁)
/// K   = λ + 2 G / 3
/// ```
///
/// **Warning:** Anisotropic tensors are not detected.
#[derive(Clone, Copy, Debug)]
pub struct ElasticModuli {
    /// Shear modulus G
    pub gg: f64,

    /// Bulk modulus K
    pub kk: f64,
}

impl ElasticModuli {
    /// Extracts the shear and bulk moduli from an isotropic rigidity modulus
    pub fn new(dd: &Tensor4) -> Self {
        let mat = dd.matrix();
        let gg = mat.get(3, 3) / 2.0;
        let lambda = mat.get(0, 1);
        ElasticModuli {
            gg,
            kk: lambda + 2.0 * gg / 3.0,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
