use super::{CreepHistory, CreepInput, CreepLocalState, CreepModel, ElasticModuli, LocalSolution, LocalSolver, TrialStress};
use crate::base::ParamCreepUpdate;
use crate::StrError;
use rayon::prelude::*;
use russell_tensor::Tensor4;

/// Implements the creep stress-update (return-map) at integration points
///
/// Given the trial stress `σ_trial` (stored in the local state on input), the update computes:
///
/// ```text
/// Δεc = 3/2 (Σᵢ xᵢ) n + (1/√3) xv I
/// σ   = σ_trial - 2 G Δεc
/// ```
///
/// where `xᵢ` and `xv` are obtained by the local Newton solver.
///
/// The history is only committed if the local solver converges. The host must call
/// [CreepLocalState::accept] at the end of a converged time step (or [CreepLocalState::restore]
/// to discard the current values).
pub struct CreepUpdate {
    /// Holds the creep model
    model: CreepModel,

    /// Holds the local solver
    solver: LocalSolver,
}

impl CreepUpdate {
    /// Allocates a new instance
    pub fn new(param: &ParamCreepUpdate) -> Result<Self, StrError> {
        Ok(CreepUpdate {
            model: CreepModel::new(&param.creep)?,
            solver: LocalSolver::new(param.solver)?,
        })
    }

    /// Returns the number of deviatoric creep mechanisms
    pub fn n_mechanism(&self) -> usize {
        self.model.actual.n_mechanism()
    }

    /// Indicates that the volumetric creep is enabled
    pub fn volumetric(&self) -> bool {
        self.model.actual.volumetric()
    }

    /// Sets the initial condition of the history variables
    pub fn initialize(&self, state: &mut CreepLocalState) {
        self.model.actual.initialize_history(&mut state.history);
    }

    /// Updates the stress at one integration point
    ///
    /// # Input
    ///
    /// * `state` -- the local state with the trial stress (overwritten by the corrected stress)
    /// * `cijkl` -- the (isotropic) elastic rigidity modulus
    /// * `dt` -- the time increment
    ///
    /// # Errors
    ///
    /// On failure, the local state is left unchanged (including an uninitialized history).
    pub fn update_stress(
        &self,
        state: &mut CreepLocalState,
        cijkl: &Tensor4,
        dt: f64,
    ) -> Result<LocalSolution, StrError> {
        if dt <= 0.0 {
            return Err("dt must be > 0.0");
        }
        if cijkl.matrix().dims().0 != state.stress.vector().dim() {
            return Err("stress and rigidity modulus must have the same dimension");
        }

        // trial state
        let trial = TrialStress::new(&state.stress);
        let moduli = ElasticModuli::new(cijkl);
        if moduli.gg <= 0.0 {
            return Err("shear modulus must be > 0.0");
        }

        // initial condition (only stored in the local state on success)
        let initial = if state.history.is_initialized() {
            None
        } else {
            let mut history = CreepHistory::new();
            self.model.actual.initialize_history(&mut history);
            Some(history)
        };

        // local return-map
        let solution = {
            let input = CreepInput {
                trial: &trial,
                moduli,
                temperature: state.temperature,
                history: initial.as_ref().unwrap_or(&state.history),
            };
            let rule = self.model.actual.flow_rule(&input)?;
            self.solver.solve(rule.as_ref(), dt)?
        };
        if let Some(history) = initial {
            state.history = history;
        }

        // creep strain increment and corrected stress
        trial.reform_creep_strain(&mut state.creep_strain_incr, &solution.x_dev, solution.x_vol);
        let deps = state.creep_strain_incr.vector();
        let sigma = state.stress.vector_mut();
        for i in 0..sigma.dim() {
            sigma[i] = trial.sigma.vector()[i] - 2.0 * moduli.gg * deps[i];
        }

        // history
        self.model.actual.commit_history(&mut state.history, &solution, dt);
        state.n_iterations = solution.n_iterations;
        Ok(solution)
    }

    /// Updates the stress at many integration points in parallel
    ///
    /// Each local state is independent; the first error (if any) is returned.
    pub fn update_stress_parallel(
        &self,
        states: &mut [CreepLocalState],
        cijkl: &Tensor4,
        dt: f64,
    ) -> Result<(), StrError> {
        states
            .par_iter_mut()
            .map(|state| self.update_stress(state, cijkl, dt).map(|_| ()))
            .collect()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::CreepUpdate;
    use crate::base::{Idealization, SampleParams};
    use crate::material::CreepLocalState;
    use russell_lab::{approx_eq, vec_approx_eq};
    use russell_tensor::{Mandel, Tensor2, SQRT_3};

    fn state_with_stress(mandel: Mandel, sigma: &[[f64; 3]; 3]) -> CreepLocalState {
        let mut state = CreepLocalState::new(mandel);
        state.stress = Tensor2::from_matrix(sigma, mandel).unwrap();
        state
    }

    const DIAG_TRIAXIAL: [[f64; 3]; 3] = [[2.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, -1.0]];

    const ROCK_SALT: [[f64; 3]; 3] = [[-20.0, 0.0, 0.0], [0.0, -5.0, 0.0], [0.0, 0.0, -5.0]];

    const HYDROSTATIC: [[f64; 3]; 3] = [[-2.0, 0.0, 0.0], [0.0, -2.0, 0.0], [0.0, 0.0, -2.0]];

    #[test]
    fn new_captures_errors() {
        let mut param = SampleParams::param_kelvin_update(1.0, 0.0);
        param.solver.tol_abs = -1.0;
        assert_eq!(CreepUpdate::new(&param).err(), Some("tol_abs must be ≥ 0.0"));
        let param = SampleParams::param_kelvin_update(-1.0, 0.0);
        assert_eq!(CreepUpdate::new(&param).err(), Some("eta0 must be > 0.0"));
    }

    #[test]
    fn update_stress_captures_errors() {
        let update = CreepUpdate::new(&SampleParams::param_kelvin_update(1.0, 0.0)).unwrap();
        let dd = Idealization::new(3).elastic_modulus(2.5, 0.25).unwrap();
        let mut state = state_with_stress(Mandel::Symmetric, &DIAG_TRIAXIAL);
        assert_eq!(update.update_stress(&mut state, &dd, 0.0).err(), Some("dt must be > 0.0"));
        let mut state = state_with_stress(Mandel::Symmetric2D, &DIAG_TRIAXIAL);
        assert_eq!(
            update.update_stress(&mut state, &dd, 1.0).err(),
            Some("stress and rigidity modulus must have the same dimension")
        );
    }

    #[test]
    fn update_stress_kelvin_works() {
        // G = E / (2 (1 + ν)) = 1, η0 = 1, G0 = 0, σd_trial = 3, Δt = 1
        // x = (3 - 3 x) / 3  ⇒  x = 0.5
        let update = CreepUpdate::new(&SampleParams::param_kelvin_update(1.0, 0.0)).unwrap();
        assert_eq!(update.n_mechanism(), 1);
        assert!(!update.volumetric());
        for ndim in [2, 3] {
            let ideal = Idealization::new(ndim);
            let dd = ideal.elastic_modulus(2.5, 0.25).unwrap();
            let mut state = state_with_stress(ideal.mandel(), &DIAG_TRIAXIAL);
            let sol = update.update_stress(&mut state, &dd, 1.0).unwrap();
            approx_eq(sol.x_dev[0], 0.5, 1e-15);
            assert_eq!(sol.x_vol, 0.0);
            assert_eq!(state.n_iterations, 1);

            // Δεc = 1.5 · 0.5 · diag(2, -1, -1) / 3
            let mut correct = Tensor2::new(ideal.mandel());
            correct.vector_mut()[0] = 0.5;
            correct.vector_mut()[1] = -0.25;
            correct.vector_mut()[2] = -0.25;
            vec_approx_eq(state.creep_strain_incr.vector(), correct.vector(), 1e-15);

            // σ = σ_trial - 2 G Δεc  ⇒  σd = 3 - 3 G x = 1.5
            approx_eq(state.stress.invariant_sigma_d(), 1.5, 1e-14);
            approx_eq(state.stress.invariant_sigma_m(), 0.0, 1e-15);
            approx_eq(state.stress.vector()[0], 1.0, 1e-15);

            // history
            approx_eq(state.history.strain()[0], 0.5, 1e-15);
            approx_eq(state.history.strain_old()[0], 0.0, 1e-15);
            approx_eq(state.history.eqv_strain_rate(), 0.5, 1e-15);
        }
    }

    #[test]
    fn update_stress_is_repeatable() {
        let update = CreepUpdate::new(&SampleParams::param_rtl2020_update(true)).unwrap();
        let dd = Idealization::new(3).elastic_modulus(25_000.0, 0.25).unwrap();
        let mut state = state_with_stress(Mandel::Symmetric, &ROCK_SALT);
        state.temperature = Some(320.0);
        update.initialize(&mut state);
        let mut copy = state.clone();
        let sol_a = update.update_stress(&mut state, &dd, 1.0).unwrap();
        let sol_b = update.update_stress(&mut copy, &dd, 1.0).unwrap();
        assert_eq!(sol_a.x_dev.as_data(), sol_b.x_dev.as_data());
        assert_eq!(sol_a.x_vol, sol_b.x_vol);
        assert_eq!(state.stress.vector().as_data(), copy.stress.vector().as_data());

        // re-running from the restored history with the same trial stress gives the same result
        let mut again = state_with_stress(Mandel::Symmetric, &ROCK_SALT);
        again.temperature = Some(320.0);
        again.history = state.history.clone();
        again.restore();
        let sol_c = update.update_stress(&mut again, &dd, 1.0).unwrap();
        assert_eq!(sol_a.x_dev.as_data(), sol_c.x_dev.as_data());
    }

    #[test]
    fn large_viscosity_gives_negligible_creep() {
        let update = CreepUpdate::new(&SampleParams::param_kelvin_update(1e15, 0.0)).unwrap();
        let dd = Idealization::new(3).elastic_modulus(2.5, 0.25).unwrap();
        let mut state = state_with_stress(Mandel::Symmetric, &DIAG_TRIAXIAL);
        let sol = update.update_stress(&mut state, &dd, 1.0).unwrap();
        assert!(sol.x_dev[0] > 0.0 && sol.x_dev[0] < 1e-14);
        vec_approx_eq(state.stress.vector(), &[2.0, -1.0, -1.0, 0.0, 0.0, 0.0], 1e-13);
    }

    #[test]
    fn zero_deviator_gives_zero_deviatoric_creep() {
        let update = CreepUpdate::new(&SampleParams::param_rtl2020_update(false)).unwrap();
        let dd = Idealization::new(2).elastic_modulus(25_000.0, 0.25).unwrap();
        let mut state = state_with_stress(Mandel::Symmetric2D, &HYDROSTATIC);
        let sol = update.update_stress(&mut state, &dd, 1.0).unwrap();
        assert_eq!(sol.x_dev.as_data(), &[0.0, 0.0]);
        assert_eq!(sol.x_vol, 0.0);
        assert_eq!(sol.n_iterations, 1);
        assert_eq!(state.creep_strain_incr.vector().as_data(), &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(state.stress.vector().as_data(), &[-2.0, -2.0, -2.0, 0.0]);
    }

    #[test]
    fn zero_deviator_gives_zero_kelvin_creep() {
        // G = 1, η0 = 1, G0 = 1, γ_ini = 0.2
        let update = CreepUpdate::new(&SampleParams::param_kelvin_update(1.0, 1.0)).unwrap();
        let dd = Idealization::new(3).elastic_modulus(2.5, 0.25).unwrap();

        // initial history
        let mut state = state_with_stress(Mandel::Symmetric, &HYDROSTATIC);
        state.history.initialize(&[0.2]);
        let sol = update.update_stress(&mut state, &dd, 1.0).unwrap();
        assert_eq!(sol.x_dev.as_data(), &[0.0]);
        assert_eq!(sol.n_iterations, 1);
        assert_eq!(state.creep_strain_incr.vector().as_data(), &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(state.stress.vector().as_data(), &[-2.0, -2.0, -2.0, 0.0, 0.0, 0.0]);
        assert_eq!(state.history.strain().as_data(), &[0.2]);
        assert_eq!(state.history.strain_old().as_data(), &[0.2]);
        assert_eq!(state.history.eqv_strain_rate(), 0.0);

        // accepted history after a deviatoric step
        let mut state = state_with_stress(Mandel::Symmetric, &DIAG_TRIAXIAL);
        update.update_stress(&mut state, &dd, 1.0).unwrap();
        state.accept();
        let gamma = state.history.strain()[0];
        assert!(gamma > 0.0);
        state.stress = Tensor2::from_matrix(&HYDROSTATIC, Mandel::Symmetric).unwrap();
        let sol = update.update_stress(&mut state, &dd, 1.0).unwrap();
        assert_eq!(sol.x_dev.as_data(), &[0.0]);
        assert_eq!(sol.n_iterations, 1);
        assert_eq!(state.history.strain().as_data(), &[gamma]);
        assert_eq!(state.history.eqv_strain(), gamma);
    }

    #[test]
    fn first_failure_keeps_history_uninitialized() {
        let update = CreepUpdate::new(&SampleParams::param_rtl2020_update(false)).unwrap();
        let dd = Idealization::new(3).elastic_modulus(25_000.0, 0.25).unwrap();
        let mut state = state_with_stress(Mandel::Symmetric, &ROCK_SALT);
        state.temperature = Some(-1.0);
        assert_eq!(
            update.update_stress(&mut state, &dd, 1.0).err(),
            Some("temperature must be > 0.0")
        );
        assert!(!state.history.is_initialized());
        assert_eq!(state.stress.vector().as_data(), &[-20.0, -5.0, -5.0, 0.0, 0.0, 0.0]);

        // the next successful call starts from the initial condition
        state.temperature = None;
        update.update_stress(&mut state, &dd, 1.0).unwrap();
        assert!(state.history.is_initialized());
        assert_eq!(state.history.strain_old().as_data(), &[0.0, 0.0]);
    }

    #[test]
    fn deviatoric_only_gives_traceless_creep_strain() {
        let update = CreepUpdate::new(&SampleParams::param_rtl2020_update(false)).unwrap();
        let dd = Idealization::new(3).elastic_modulus(25_000.0, 0.25).unwrap();
        let mut state = state_with_stress(Mandel::Symmetric, &ROCK_SALT);
        let sol = update.update_stress(&mut state, &dd, 1.0).unwrap();
        assert_eq!(sol.x_vol, 0.0);
        assert!(sol.x_dev[0] > 0.0);
        assert!(sol.x_dev[1] > 0.0);
        approx_eq(state.creep_strain_incr.trace(), 0.0, 1e-15);
        approx_eq(state.history.vol_strain(), 0.0, 1e-15);

        // mean stress is preserved and the equivalent stress relaxes
        approx_eq(state.stress.invariant_sigma_m(), -10.0, 1e-12);
        let gg = 25_000.0 / 2.5;
        let sum = sol.x_dev[0] + sol.x_dev[1];
        approx_eq(state.stress.invariant_sigma_d(), 15.0 - 3.0 * gg * sum, 1e-10);
    }

    #[test]
    fn volumetric_creep_works() {
        let update = CreepUpdate::new(&SampleParams::param_rtl2020_update(true)).unwrap();
        assert!(update.volumetric());
        let dd = Idealization::new(3).elastic_modulus(25_000.0, 0.25).unwrap();
        let mut state = state_with_stress(Mandel::Symmetric, &ROCK_SALT);
        let sol = update.update_stress(&mut state, &dd, 1.0).unwrap();

        // q relaxes below z p, hence compaction dominates
        let gg = 25_000.0 / 2.5;
        let q = 15.0 - 3.0 * gg * (sol.x_dev[0] + sol.x_dev[1]);
        assert!(q < 0.5 * 10.0);
        assert!(sol.x_vol < 0.0);
        approx_eq(state.creep_strain_incr.trace(), SQRT_3 * sol.x_vol, 1e-15);
        approx_eq(state.history.vol_strain(), sol.x_vol, 1e-15);

        // the mean stress (compression positive) changes by 2 G xv / √3
        approx_eq(-state.stress.invariant_sigma_m(), 10.0 + 2.0 * gg * sol.x_vol / SQRT_3, 1e-10);
    }

    #[test]
    fn failure_leaves_state_unchanged() {
        let mut param = SampleParams::param_rtl2020_update(false);
        param.solver.n_max_iterations = 1;
        param.solver.tol_abs = 0.0;
        param.solver.tol_rel = 0.0;
        let update = CreepUpdate::new(&param).unwrap();
        let dd = Idealization::new(3).elastic_modulus(25_000.0, 0.25).unwrap();
        let mut state = state_with_stress(Mandel::Symmetric, &ROCK_SALT);
        update.initialize(&mut state);
        assert_eq!(
            update.update_stress(&mut state, &dd, 1.0).err(),
            Some("maximum number of iterations exceeded in the local return-map")
        );
        assert_eq!(state.stress.vector().as_data(), &[-20.0, -5.0, -5.0, 0.0, 0.0, 0.0]);
        assert_eq!(state.history.strain().as_data(), &[0.0, 0.0]);
        assert_eq!(state.n_iterations, 0);
    }

    #[test]
    fn update_stress_parallel_works() {
        let param = SampleParams::param_rtl2020_update(true);
        let update = CreepUpdate::new(&param).unwrap();
        let dd = Idealization::new(3).elastic_modulus(25_000.0, 0.25).unwrap();
        let mut states: Vec<_> = (0..8)
            .map(|k| {
                let mut state = state_with_stress(Mandel::Symmetric, &ROCK_SALT);
                state.stress.vector_mut()[0] -= k as f64;
                state.temperature = Some(300.0 + 5.0 * k as f64);
                state
            })
            .collect();
        let mut sequential = states.clone();
        update.update_stress_parallel(&mut states, &dd, 0.5).unwrap();
        for state in &mut sequential {
            update.update_stress(state, &dd, 0.5).unwrap();
        }
        for k in 0..8 {
            assert_eq!(states[k].stress.vector().as_data(), sequential[k].stress.vector().as_data());
            assert_eq!(states[k].n_iterations, sequential[k].n_iterations);
        }

        // errors are propagated
        states[3].temperature = Some(-1.0);
        assert_eq!(
            update.update_stress_parallel(&mut states, &dd, 0.5).err(),
            Some("temperature must be > 0.0")
        );
    }
}
