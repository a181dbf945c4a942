use pmcreep::base::{Idealization, ParamCreepUpdate};
use pmcreep::material::CreepPath;
use pmcreep::StrError;
use russell_tensor::Tensor2;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "creep_path",
    about = "Runs a creep stress-update along a strain path at a single integration point"
)]
struct Options {
    /// JSON file with the path definition
    input: String,

    /// Optional JSON file to write the records
    #[structopt(short, long)]
    output: Option<String>,
}

/// Defines a stage with a constant time increment and strain increment
#[derive(Deserialize)]
struct Stage {
    /// Time increment
    dt: f64,

    /// Number of steps
    n_steps: usize,

    /// Strain increment per step in Mandel components (zero if None)
    #[serde(default)]
    delta_strain: Option<Vec<f64>>,

    /// Absolute temperature (None keeps the previous value)
    #[serde(default)]
    temperature: Option<f64>,
}

/// Defines the input data of a creep path
#[derive(Deserialize)]
struct CreepPathInput {
    /// Space dimension (2 or 3)
    ndim: usize,

    /// Young's modulus
    young: f64,

    /// Poisson's coefficient
    poisson: f64,

    /// Initial mean stress (tension positive)
    sigma_m: f64,

    /// Initial equivalent stress
    sigma_d: f64,

    /// Creep model and solver parameters
    param: ParamCreepUpdate,

    /// Stages
    stages: Vec<Stage>,
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();

    // load data
    let file = File::open(&options.input).map_err(|_| "file not found")?;
    let input: CreepPathInput = serde_json::from_reader(BufReader::new(file)).map_err(|_| "deserialize failed")?;
    if input.ndim != 2 && input.ndim != 3 {
        return Err("ndim must be 2 or 3");
    }

    // run
    let ideal = Idealization::new(input.ndim);
    let mut path = CreepPath::new(
        &ideal,
        input.young,
        input.poisson,
        &input.param,
        input.sigma_m,
        input.sigma_d,
    )?;
    for stage in &input.stages {
        if stage.temperature.is_some() {
            path.set_temperature(stage.temperature);
        }
        let mut deps = Tensor2::new(ideal.mandel());
        if let Some(values) = &stage.delta_strain {
            if values.len() != deps.vector().dim() {
                return Err("delta_strain must have 4 (2D) or 6 (3D) Mandel components");
            }
            let v = deps.vector_mut();
            for i in 0..values.len() {
                v[i] = values[i];
            }
        }
        for _ in 0..stage.n_steps {
            path.step(stage.dt, &deps)?;
        }
    }

    // results
    path.print_table();
    if let Some(output) = &options.output {
        path.write_json(output)?;
        println!("\nrecords written to {}", output);
    }
    Ok(())
}
