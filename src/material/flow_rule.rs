use russell_lab::Vector;

/// Specifies the flow rule (creep rates and derivatives) seen by the local solver
///
/// A flow rule is "frozen" for one integration point evaluation: the trial stress invariants, elastic
/// moduli, temperature activation and old history values are fixed before the Newton iterations.
/// The unknowns are the scalar deviatoric creep strain increments `x` (one per mechanism) and the
/// volumetric creep strain increment `xv`. The residuals have the uniform shape:
///
/// ```text
/// Rᵢ = rateᵢ(x) Δt - xᵢ
/// Rv = rate_vol(x, xv) Δt - xv
/// ```
pub trait FlowRule {
    /// Returns the number of deviatoric creep mechanisms
    fn n_mechanism(&self) -> usize;

    /// Indicates that the volumetric equation must be solved
    fn volumetric(&self) -> bool {
        false
    }

    /// Calculates the creep rate of mechanism i
    fn rate(&self, x: &Vector, i: usize) -> f64;

    /// Calculates the derivative of the creep rate of mechanism i with respect to xⱼ
    fn rate_derivative(&self, x: &Vector, i: usize, j: usize) -> f64;

    /// Calculates the volumetric creep rate
    fn vol_rate(&self, _x: &Vector, _x_vol: f64) -> f64 {
        0.0
    }

    /// Calculates the derivative of the volumetric creep rate with respect to xv
    fn vol_rate_derivative(&self, _x: &Vector, _x_vol: f64) -> f64 {
        0.0
    }
}
