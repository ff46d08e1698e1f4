use {
    crate::{
        bio::{
            banas::Banas, banas_fennel::BanasFennel, fennel::Fennel, BioModel, Fields, Tracer,
            Variant,
        },
        forcing::{ConstantForcing, ForcingSupplier},
        grid::VerticalGrid,
        parameters::Parameters,
        sinking::sink,
    },
    anyhow::{ensure, Result},
    log::info,
    ndarray::Array1,
    serde::{Deserialize, Serialize},
};

/// Full-profile record taken on the profile decimation schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub t: f64,
    pub fields: Fields,
    /// PAR at cell centres when the snapshot was taken [W m-2].
    pub par: Array1<f64>,
}

/// Depth-integrated totals taken on the reservoir decimation schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservoir {
    pub t: f64,
    /// One inventory per advanced tracer, in `Output::tracers` order
    /// [concentration * m].
    pub inventories: Vec<f64>,
    /// Nitrogen permanently removed at the sea floor so far [mmol N m-2].
    pub lost: f64,
}

/// Everything a run hands back to the caller. Persistence and plotting stay
/// outside the integrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    /// Tracers advanced by the selected variant; fixes the reservoir order.
    pub tracers: Vec<Tracer>,
    pub snapshots: Vec<Snapshot>,
    pub reservoirs: Vec<Reservoir>,
    /// Column-mean nitrogen at the end of the run, ledger included
    /// [mmol N m-3]. Constant in time up to roundoff.
    pub mean_nitrogen: f64,
}

/// Integration state, owned exclusively by the driver for one run.
#[derive(Debug, Clone)]
struct State {
    fields: Fields,
    t: f64,
    /// Nitrogen permanently removed at the sea floor [mmol N m-2].
    /// Monotonically non-decreasing.
    lost: f64,
}

/// Run the variant selected in the parameter file under constant forcing.
pub fn run(parameters: &Parameters) -> Result<Output> {
    let forcing = ConstantForcing::from_parameters(parameters);
    match parameters.biology.variant {
        Variant::Banas => integrate(&Banas::default(), parameters, &forcing),
        Variant::Fennel => integrate(&Fennel::default(), parameters, &forcing),
        Variant::BanasFennel => integrate(&BanasFennel::default(), parameters, &forcing),
    }
}

/// Advance one column from t = 0 through the configured duration.
///
/// The loop applies, in order: light, the reaction chain, settling for every
/// sinking tracer, and the bottom boundary partition. Profile and reservoir
/// records are captured on their decimation schedules, starting with the
/// initial condition. All fatal errors are raised here before the first
/// step; the variant in `parameters.biology` is ignored in favour of the
/// model passed in.
pub fn integrate<M, F>(model: &M, parameters: &Parameters, forcing: &F) -> Result<Output>
where
    M: BioModel,
    F: ForcingSupplier,
{
    parameters.validate()?;

    let numerical = &parameters.numerical;
    let grid = VerticalGrid::new(numerical.depth, numerical.layers)?;
    let dz = grid.dz();
    let dt = numerical.time_step;

    let nt = (numerical.duration / dt).round() as usize;
    let ntp = save_cadence(numerical.profile_save_interval, dt);
    let ntr = save_cadence(numerical.reservoir_save_interval, dt);

    let tracers = model.tracers();
    let mut state = State {
        fields: Fields::uniform(grid.layers(), &parameters.biology.initial),
        t: 0.0,
        lost: 0.0,
    };

    // The supplier contract is checked once; the loop trusts it afterwards.
    let probe = forcing.sample(0.0);
    ensure!(
        probe.temp.len() == grid.layers() && probe.salt.len() == grid.layers(),
        "forcing profiles must have {} cells, got temp {} / salt {}",
        grid.layers(),
        probe.temp.len(),
        probe.salt.len()
    );

    let mut output = Output {
        tracers: tracers.to_vec(),
        snapshots: Vec::with_capacity(nt / ntp + 2),
        reservoirs: Vec::with_capacity(nt / ntr + 2),
        mean_nitrogen: 0.0,
    };

    for it in 0..=nt {
        state.t = it as f64 * dt;
        let env = forcing.sample(state.t);
        let par = model.par_profile(&grid, &env, &state.fields);

        // Save output if it is time.
        if it % ntp == 0 {
            let mean = column_mean_nitrogen(&state, tracers, &grid);
            info!("t = {:.2} days  mean N = {:.7} [mmol N m-3]", state.t, mean);
            output.snapshots.push(Snapshot {
                t: state.t,
                fields: state.fields.clone(),
                par: par.clone(),
            });
        }
        if it % ntr == 0 {
            output.reservoirs.push(Reservoir {
                t: state.t,
                inventories: tracers.iter().map(|&tr| state.fields.inventory(tr, dz)).collect(),
                lost: state.lost,
            });
        }
        if it == nt {
            break;
        }

        model.step(dt, &par, &env, &mut state.fields);

        // Settling, summing the nitrogen flux that crossed the sea floor.
        let mut bottom_flux = 0.0;
        for (tracer, w) in model.settling() {
            let flux = sink(state.fields.get_mut(tracer), w, dt, dz);
            if tracer.carries_nitrogen() {
                bottom_flux += flux;
            }
        }

        // Bottom boundary: part of the flux dissolves into the deepest
        // cell, the rest is gone for good.
        let (recycled, lost) = model.bottom_boundary().partition(bottom_flux, dt);
        state.fields.get_mut(model.bottom_pool())[0] += recycled / dz;
        state.lost += lost;
    }

    output.mean_nitrogen = column_mean_nitrogen(&state, tracers, &grid);
    info!(
        "terminated after {} steps, {:.4} mmol N m-2 lost to the sediments",
        nt, state.lost
    );

    Ok(output)
}

fn save_cadence(interval: f64, dt: f64) -> usize {
    ((interval / dt).round() as usize).max(1)
}

fn column_mean_nitrogen(state: &State, tracers: &[Tracer], grid: &VerticalGrid) -> f64 {
    (state.fields.nitrogen(tracers, grid.dz()) + state.lost) / grid.depth()
}
