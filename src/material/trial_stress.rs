use russell_lab::Vector;
use russell_tensor::{Tensor2, SQRT_3};

/// Holds the trial (elastic predictor) stress and its invariants at an integration point
///
/// The deviatoric flow direction is
///
/// ```text
///      dev(σ_trial)
/// n = ────────────    (n = 0 if σd_trial = 0)
///       σd_trial
/// ```
///
/// where `σd = √(3/2) ‖dev(σ)‖` is the equivalent (von Mises) stress.
pub struct TrialStress {
    /// Trial stress tensor
    pub sigma: Tensor2,

    /// Equivalent trial stress σd_trial
    pub sigma_d: f64,

    /// Mean trial stress, positive in compression: p_trial = -tr(σ_trial)/3
    pub p: f64,

    /// Deviatoric flow direction
    flow_dev: Tensor2,
}

impl TrialStress {
    /// Allocates a new instance and computes the invariants
    pub fn new(stress: &Tensor2) -> Self {
        let sigma_d = stress.invariant_sigma_d();
        let p = -stress.invariant_sigma_m();
        let mut flow_dev = Tensor2::new(stress.mandel());
        if sigma_d != 0.0 {
            stress.deviator(&mut flow_dev);
            let n = flow_dev.vector_mut();
            for i in 0..n.dim() {
                n[i] /= sigma_d;
            }
        }
        TrialStress {
            sigma: stress.clone(),
            sigma_d,
            p,
            flow_dev,
        }
    }

    /// Returns the deviatoric flow direction
    pub fn flow_dev(&self) -> &Tensor2 {
        &self.flow_dev
    }

    /// Reconstructs the creep strain increment from the scalar increments
    ///
    /// ```text
    /// Δεc = 3/2 (Σᵢ xᵢ) n + (1/√3) xv I
    /// ```
    ///
    /// **Note:** `xv` is zero if the volumetric creep is disabled.
    pub fn reform_creep_strain(&self, delta_creep: &mut Tensor2, x_dev: &Vector, x_vol: f64) {
        let sum: f64 = x_dev.as_data().iter().sum();
        let n = self.flow_dev.vector();
        let deps = delta_creep.vector_mut();
        for i in 0..deps.dim() {
            deps[i] = 1.5 * sum * n[i];
        }
        // the first three Mandel components are the diagonal ones
        for i in 0..3 {
            deps[i] += x_vol / SQRT_3;
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
