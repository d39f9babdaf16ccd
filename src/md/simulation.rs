// SPDX-License-Identifier: AGPL-3.0-only

//! Simulation driver: the fixed step loop over force evaluation and
//! integration, energy-history collection, and run reports.
//!
//! Per step: force evaluation (reads positions, writes forces + Up) →
//! integration (reads forces/positions/velocities, writes the new state,
//! wraps the periodic boundary, updates Uk/Utot/Tc). The force phase fully
//! completes before the integrator begins on both backends.

use serde::Serialize;
use std::time::Instant;

use crate::error::ArgonMdError;
use crate::gpu::GpuContext;
use crate::md::config::MdConfig;
use crate::md::forces;
use crate::md::gpu::GpuBackend;
use crate::md::integrator;
use crate::md::state::SimulationState;

/// Per-step energy record (reduced units).
#[derive(Clone, Debug, Serialize)]
pub struct EnergyRecord {
    /// MD step index (1-based).
    pub step: usize,
    /// Reduced simulation time = step × Δt.
    pub time: f64,
    /// Potential energy.
    pub up: f64,
    /// Kinetic energy.
    pub uk: f64,
    /// Total energy Uk + Up.
    pub utot: f64,
    /// Instantaneous temperature T* = Uk / (1.5·N).
    pub temperature: f64,
}

/// Simulation results and throughput summary.
#[derive(Debug, Serialize)]
pub struct MdSimulation {
    /// Config label.
    pub label: String,
    /// Which backend produced this run ("cpu" or the GPU adapter name).
    pub backend: String,
    /// Atom count.
    pub n_atoms: usize,
    /// Energy records per dump interval.
    pub energy_history: Vec<EnergyRecord>,
    /// Total wall time (seconds).
    pub wall_time_s: f64,
    /// Throughput (steps per second).
    pub steps_per_sec: f64,
}

impl MdSimulation {
    /// Save the run summary as pretty-printed JSON. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the directory cannot be created, the file cannot be
    /// written, or serialization fails.
    pub fn save_json(&self, dir: &str) -> std::io::Result<String> {
        std::fs::create_dir_all(dir)?;
        let path = format!("{dir}/{}_{}.json", self.label, sanitize(&self.backend));
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }
}

fn sanitize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

fn print_run_header(config: &MdConfig, state: &SimulationState) {
    println!("  ── Initializing {} atoms ({}³ FCC cells) ──", state.num_atom, config.nc);
    println!("    Box side: {:.4} σ", state.box_len);
    println!(
        "    T_init = {} K → T* = {:.6}",
        config.init_temp_kelvin,
        config.reduced_temperature()
    );
    println!(
        "    rc = {} σ, dt* = {}, image range ±{}",
        config.rc, config.dt, config.ncp
    );
}

fn record_from(state: &SimulationState, step: usize) -> EnergyRecord {
    EnergyRecord {
        step,
        time: state.time,
        up: state.potential,
        uk: state.kinetic,
        utot: state.total,
        temperature: state.temperature,
    }
}

/// Run the full simulation on the CPU backend.
///
/// # Errors
///
/// Returns [`ArgonMdError::DegenerateTemperature`] if the bootstrap rescale
/// is attempted at zero temperature (requires zero initial velocities).
pub fn run_simulation_cpu(config: &MdConfig) -> Result<MdSimulation, ArgonMdError> {
    let t_start = Instant::now();
    let mut state = SimulationState::new(config);

    print_run_header(config, &state);
    println!("  ── CPU backend ({} steps) ──", config.steps);

    let mut energy_history = Vec::new();
    for it in 1..=config.steps {
        forces::compute_forces_cpu(&mut state, config);
        integrator::move_atoms_cpu(&mut state, config)?;

        if it % config.dump_step == 0 {
            energy_history.push(record_from(&state, it));
        }
        if it % 500 == 0 || it == config.steps {
            println!(
                "    Step {it}: T*={:.6}, Uk={:.4}, Up={:.4}, E={:.4}",
                state.temperature, state.kinetic, state.potential, state.total
            );
        }
    }

    let wall_time_s = t_start.elapsed().as_secs_f64();
    let steps_per_sec = config.steps as f64 / wall_time_s;
    println!("    CPU total: {wall_time_s:.2}s ({steps_per_sec:.1} steps/s)");

    Ok(MdSimulation {
        label: config.label.clone(),
        backend: String::from("cpu"),
        n_atoms: state.num_atom,
        energy_history,
        wall_time_s,
        steps_per_sec,
    })
}

/// Run the full simulation on the GPU backend.
///
/// # Errors
///
/// Returns [`ArgonMdError::NoAdapter`] / [`ArgonMdError::DeviceCreation`]
/// if GPU initialization fails, or [`ArgonMdError::DegenerateTemperature`]
/// from the bootstrap rescale.
pub async fn run_simulation_gpu(config: &MdConfig) -> Result<MdSimulation, ArgonMdError> {
    let t_start = Instant::now();
    let mut state = SimulationState::new(config);

    print_run_header(config, &state);

    let gpu = GpuContext::new().await?;
    gpu.print_info();
    let adapter_name = gpu.adapter_name.clone();
    let backend = GpuBackend::new(gpu, state.num_atom);

    println!("  ── GPU backend ({} steps) ──", config.steps);

    let mut energy_history = Vec::new();
    for it in 1..=config.steps {
        backend.compute_forces(&mut state, config)?;
        backend.move_atoms(&mut state, config)?;

        if it % config.dump_step == 0 {
            energy_history.push(record_from(&state, it));
        }
        if it % 500 == 0 || it == config.steps {
            println!(
                "    Step {it}: T*={:.6}, Uk={:.4}, Up={:.4}, E={:.4}",
                state.temperature, state.kinetic, state.potential, state.total
            );
        }
    }

    let wall_time_s = t_start.elapsed().as_secs_f64();
    let steps_per_sec = config.steps as f64 / wall_time_s;
    println!("    GPU total: {wall_time_s:.2}s ({steps_per_sec:.1} steps/s)");

    Ok(MdSimulation {
        label: config.label.clone(),
        backend: adapter_name,
        n_atoms: state.num_atom,
        energy_history,
        wall_time_s,
        steps_per_sec,
    })
}
