use super::FlowRule;
use crate::base::ParamSolver;
use crate::StrError;
use russell_lab::{solve_lin_sys, vec_norm, Matrix, Norm, Vector};

/// Holds the results of the local Newton iterations
#[derive(Clone, Debug)]
pub struct LocalSolution {
    /// Converged deviatoric creep strain increments (one per mechanism)
    pub x_dev: Vector,

    /// Converged volumetric creep strain increment (zero if the volumetric equation is disabled)
    pub x_vol: f64,

    /// Number of Newton iterations
    pub n_iterations: usize,

    /// Euclidean norm of the initial deviatoric residual ‖R₀‖
    pub norm_rr0: f64,

    /// Euclidean norm of the final deviatoric residual ‖R‖
    pub norm_rr: f64,

    /// Magnitude of the initial volumetric residual |Rv₀|
    pub abs_rv0: f64,

    /// Magnitude of the final volumetric residual |Rv|
    pub abs_rv: f64,
}

/// Implements the local Newton solver of the return-map
///
/// The deviatoric unknowns `x` solve the (coupled) system:
///
/// ```text
/// R(x) = rate(x) Δt - x = 0
/// J(x) = ∂rate/∂x Δt - I
/// J Δx = -R
/// ```
///
/// The volumetric unknown `xv` solves an independent scalar equation updated alongside the deviatoric
/// system (using the latest deviatoric increments). Convergence requires both equations to satisfy
/// either the absolute or the relative criterion:
///
/// ```text
/// ‖R‖ ≤ tol_abs  or  ‖R‖/‖R₀‖ ≤ tol_rel
/// |Rv| ≤ tol_abs  or  |Rv|/|Rv₀| ≤ tol_rel
/// ```
pub struct LocalSolver {
    /// Holds the solver parameters
    param: ParamSolver,
}

impl LocalSolver {
    /// Allocates a new instance
    pub fn new(param: ParamSolver) -> Result<Self, StrError> {
        param.validate()?;
        Ok(LocalSolver { param })
    }

    /// Returns the solver parameters
    pub fn param(&self) -> &ParamSolver {
        &self.param
    }

    /// Calculates the deviatoric residual vector
    ///
    /// ```text
    /// Rᵢ = rateᵢ(x) Δt - xᵢ
    /// ```
    pub fn residual<R>(rr: &mut Vector, rule: &R, x: &Vector, dt: f64)
    where
        R: FlowRule + ?Sized,
    {
        for i in 0..rule.n_mechanism() {
            rr[i] = rule.rate(x, i) * dt - x[i];
        }
    }

    /// Calculates the deviatoric Jacobian matrix
    ///
    /// ```text
    /// Jᵢⱼ = ∂rateᵢ/∂xⱼ Δt - δᵢⱼ
    /// ```
    pub fn jacobian<R>(jj: &mut Matrix, rule: &R, x: &Vector, dt: f64)
    where
        R: FlowRule + ?Sized,
    {
        let n = rule.n_mechanism();
        for i in 0..n {
            for j in 0..n {
                let delta = if i == j { 1.0 } else { 0.0 };
                jj.set(i, j, rule.rate_derivative(x, i, j) * dt - delta);
            }
        }
    }

    /// Calculates the volumetric residual
    ///
    /// ```text
    /// Rv = rate_vol(x, xv) Δt - xv
    /// ```
    pub fn vol_residual<R>(rule: &R, x: &Vector, x_vol: f64, dt: f64) -> f64
    where
        R: FlowRule + ?Sized,
    {
        rule.vol_rate(x, x_vol) * dt - x_vol
    }

    /// Calculates the volumetric Jacobian
    ///
    /// ```text
    /// Jv = ∂rate_vol/∂xv Δt - 1
    /// ```
    pub fn vol_jacobian<R>(rule: &R, x: &Vector, x_vol: f64, dt: f64) -> f64
    where
        R: FlowRule + ?Sized,
    {
        rule.vol_rate_derivative(x, x_vol) * dt - 1.0
    }

    /// Solves the local equations starting from zero increments
    ///
    /// The volumetric equation is only evaluated if `rule.volumetric()` is true; otherwise `xv = 0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the maximum number of iterations is reached without convergence, if the
    /// Jacobian is singular, or if NaN or Inf values are found in the residuals.
    pub fn solve<R>(&self, rule: &R, dt: f64) -> Result<LocalSolution, StrError>
    where
        R: FlowRule + ?Sized,
    {
        // deviatoric system
        let n = rule.n_mechanism();
        let mut x = Vector::new(n);
        let mut rr = Vector::new(n);
        let mut jj = Matrix::new(n, n);
        LocalSolver::residual(&mut rr, rule, &x, dt);
        LocalSolver::jacobian(&mut jj, rule, &x, dt);
        let norm_rr0 = vec_norm(&rr, Norm::Euc);
        let mut norm_rr = norm_rr0;
        if !norm_rr0.is_finite() {
            return Err("found NaN or Inf in the local residual");
        }

        // volumetric equation
        let volumetric = rule.volumetric();
        let mut x_vol = 0.0;
        let (mut rv, mut jv) = if volumetric {
            (
                LocalSolver::vol_residual(rule, &x, x_vol, dt),
                LocalSolver::vol_jacobian(rule, &x, x_vol, dt),
            )
        } else {
            (0.0, -1.0)
        };
        let abs_rv0 = f64::abs(rv);
        if !abs_rv0.is_finite() {
            return Err("found NaN or Inf in the local residual");
        }

        // message
        self.print_header(norm_rr0, abs_rv0, volumetric);

        // Newton iterations
        let mut mdx = Vector::new(n);
        for iteration in 0..self.param.n_max_iterations {
            // deviatoric update: x -= J⁻¹ R
            if n == 1 {
                let jj00 = jj.get(0, 0);
                if jj00 == 0.0 {
                    return Err("local Jacobian is singular");
                }
                x[0] -= rr[0] / jj00;
            } else {
                for i in 0..n {
                    mdx[i] = rr[i];
                }
                solve_lin_sys(&mut mdx, &mut jj)?; // J is overwritten (recalculated below)
                for i in 0..n {
                    x[i] -= mdx[i];
                }
            }
            LocalSolver::residual(&mut rr, rule, &x, dt);
            LocalSolver::jacobian(&mut jj, rule, &x, dt);
            norm_rr = vec_norm(&rr, Norm::Euc);
            if !norm_rr.is_finite() {
                return Err("found NaN or Inf in the local residual");
            }

            // volumetric update with the latest deviatoric increments
            if volumetric {
                if jv == 0.0 {
                    return Err("local Jacobian is singular");
                }
                x_vol -= rv / jv;
                rv = LocalSolver::vol_residual(rule, &x, x_vol, dt);
                jv = LocalSolver::vol_jacobian(rule, &x, x_vol, dt);
                if !rv.is_finite() {
                    return Err("found NaN or Inf in the local residual");
                }
            }

            // check convergence (both equations must converge)
            let abs_rv = f64::abs(rv);
            let converged_dev = norm_rr <= self.param.tol_abs || norm_rr / norm_rr0 <= self.param.tol_rel;
            let converged_vol = !volumetric || abs_rv <= self.param.tol_abs || abs_rv / abs_rv0 <= self.param.tol_rel;
            self.print_iteration(iteration + 1, norm_rr, abs_rv, volumetric, converged_dev, converged_vol);
            if converged_dev && converged_vol {
                return Ok(LocalSolution {
                    x_dev: x,
                    x_vol,
                    n_iterations: iteration + 1,
                    norm_rr0,
                    norm_rr,
                    abs_rv0,
                    abs_rv,
                });
            }
        }
        if self.param.verbose {
            println!("local return-map failed: ‖R‖ = {:.2e}", norm_rr);
        }
        Err("maximum number of iterations exceeded in the local return-map")
    }

    /// Prints the header and the initial residuals
    fn print_header(&self, norm_rr0: f64, abs_rv0: f64, volumetric: bool) {
        if self.param.verbose {
            println!("{}", "─".repeat(40));
            println!("{:>5} {:>12} {:>12} {:>6}", "iter", "‖R‖", "|Rv|", "conv");
            println!("{}", "─".repeat(40));
            if volumetric {
                println!("{:>5} {:>12.4e} {:>12.4e} {:>6}", 0, norm_rr0, abs_rv0, "·");
            } else {
                println!("{:>5} {:>12.4e} {:>12} {:>6}", 0, norm_rr0, "·", "·");
            }
        }
    }

    /// Prints iteration information
    fn print_iteration(
        &self,
        iteration: usize,
        norm_rr: f64,
        abs_rv: f64,
        volumetric: bool,
        converged_dev: bool,
        converged_vol: bool,
    ) {
        if self.param.verbose {
            let mark = match (converged_dev, converged_vol) {
                (true, true) => "✅",
                (true, false) => "dev",
                (false, true) => "vol",
                (false, false) => "🔹",
            };
            if volumetric {
                println!("{:>5} {:>12.4e} {:>12.4e} {:>6}", iteration, norm_rr, abs_rv, mark);
            } else {
                println!("{:>5} {:>12.4e} {:>12} {:>6}", iteration, norm_rr, "·", mark);
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
