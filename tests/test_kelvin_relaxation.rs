use pmcreep::base::{Idealization, SampleParams};
use pmcreep::material::CreepPath;
use russell_lab::approx_eq;

// Stress relaxation of the Kelvin (and Maxwell) viscoelastic model
//
// TEST GOAL
//
// Verifies the implicit integration of the single-mechanism linear creep rule
// along a fixed-strain (relaxation) path.
//
// CONFIGURATION AND PARAMETERS
//
// * Young: E = 2.5, Poisson: ν = 0.25 (G = 1)
// * Viscosity: η0 = 1
// * Kelvin spring: G0 = 0 (Maxwell) or G0 = 0.5
// * Initial state: σm = -1, σd = 3
//
// With Δε = 0, each step solves (γ = γ_old + x)
//
//     x = Δt (q - 3 G x - 3 G0 γ) / (3 η0)
//
// hence
//
//         Δt (q - 3 G0 γ_old)
//     x = ───────────────────       q_new = q - 3 G x
//         3 η0 + 3 (G + G0) Δt
//
// The Maxwell model relaxes completely: q_N = q0 / (1 + G Δt / η0)ᴺ
// The Kelvin model relaxes to q∞ = q0 G0 / (G + G0)

const YOUNG: f64 = 2.5;
const POISSON: f64 = 0.25;
const GG: f64 = 1.0;
const ETA0: f64 = 1.0;
const SIGMA_M: f64 = -1.0;
const Q0: f64 = 3.0;

#[test]
fn test_maxwell_relaxation() {
    for ndim in [2, 3] {
        let ideal = Idealization::new(ndim);
        let param = SampleParams::param_kelvin_update(ETA0, 0.0);
        let mut path = CreepPath::new(&ideal, YOUNG, POISSON, &param, SIGMA_M, Q0).unwrap();
        let dt = 0.1;
        let n_steps = 30;
        path.relax(dt, n_steps).unwrap();
        assert_eq!(path.records.len(), n_steps + 1);
        for (n, record) in path.records.iter().enumerate() {
            let q = Q0 / f64::powf(1.0 + GG * dt / ETA0, n as f64);
            approx_eq(record.sigma_d, q, 1e-13);
            approx_eq(record.sigma_m, SIGMA_M, 1e-14);
            approx_eq(record.time, n as f64 * dt, 1e-13);
        }

        // accumulated creep strain: 3 G γ = q0 - q
        let last = path.records.last().unwrap();
        approx_eq(3.0 * GG * last.eqv_strain, Q0 - last.sigma_d, 1e-13);
        assert_eq!(last.vol_strain, 0.0);
    }
}

#[test]
fn test_kelvin_relaxation() {
    let gg0 = 0.5;
    let ideal = Idealization::new(3);
    let param = SampleParams::param_kelvin_update(ETA0, gg0);
    let mut path = CreepPath::new(&ideal, YOUNG, POISSON, &param, SIGMA_M, Q0).unwrap();
    let dt = 0.25;
    let n_steps = 200;
    path.relax(dt, n_steps).unwrap();

    // discrete solution
    let mut q = Q0;
    let mut gamma = 0.0;
    for (n, record) in path.records.iter().enumerate() {
        if n > 0 {
            let x = dt * (q - 3.0 * gg0 * gamma) / (3.0 * ETA0 + 3.0 * (GG + gg0) * dt);
            q -= 3.0 * GG * x;
            gamma += x;
            approx_eq(record.eqv_strain_rate, x / dt, 1e-12);
        }
        approx_eq(record.sigma_d, q, 1e-12);
        approx_eq(record.eqv_strain, gamma, 1e-12);
        assert_eq!(record.n_iterations, if n == 0 { 0 } else { 1 });
    }

    // plateau
    let last = path.records.last().unwrap();
    approx_eq(last.sigma_d, Q0 * gg0 / (GG + gg0), 1e-10);
    approx_eq(last.eqv_strain, Q0 / (3.0 * (GG + gg0)), 1e-10);
    approx_eq(last.eqv_strain_rate, 0.0, 1e-10);
}
