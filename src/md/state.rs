// SPDX-License-Identifier: AGPL-3.0-only

//! Simulation state: per-atom arrays, energy scalars, and the integrator
//! phase machine.
//!
//! All per-atom quantities are flat `Vec<f64>` with stride 3 (x, y, z per
//! atom). The state is owned by the driver and passed by exclusive reference
//! through each phase of a step (force → integrate → wrap); phases never run
//! concurrently.

use crate::md::config::MdConfig;
use crate::md::lattice;

/// Integrator phase. The bootstrap step runs exactly once per run.
///
/// Iteration 1 uses the modified-Euler update with Woodcock velocity
/// rescaling; every later iteration uses the Verlet recurrence. The
/// transition is one-way — a run never revisits `Bootstrap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegrationPhase {
    /// First step: modified Euler + velocity rescale toward the target
    /// temperature.
    Bootstrap,
    /// All subsequent steps: position Verlet.
    SteadyState,
}

/// Execution backend, selected once per run.
///
/// Mixing backends within one run is unsupported: the GPU backend mirrors
/// the host arrays around each call, and only one mirror is authoritative
/// at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// rayon data-parallel force loop, scalar f64 integration.
    Cpu,
    /// wgpu f32 kernels with per-call host↔device transfers.
    Gpu,
}

/// Mutable simulation state, created once per run.
#[derive(Clone, Debug)]
pub struct SimulationState {
    /// Positions, stride 3, components in [0, box_len) after a completed step.
    pub positions: Vec<f64>,
    /// Positions of the previous step (Verlet history), stride 3.
    pub prior_positions: Vec<f64>,
    /// Velocities, stride 3.
    pub velocities: Vec<f64>,
    /// Forces from the most recent force evaluation, stride 3.
    pub forces: Vec<f64>,
    /// Atom count, fixed at construction (4·nc³).
    pub num_atom: usize,
    /// Periodic box side length (σ units).
    pub box_len: f64,
    /// Step counter; starts at 1, increments after each `move_atoms`.
    pub step: usize,
    /// Reduced simulation time = completed steps × Δt.
    pub time: f64,
    /// Integrator phase machine.
    pub phase: IntegrationPhase,
    /// Potential energy from the most recent force evaluation.
    pub potential: f64,
    /// Kinetic energy 0.5·Σ|V|² from the most recent integration step.
    pub kinetic: f64,
    /// Total energy Uk + Up.
    pub total: f64,
    /// Instantaneous temperature Tc = Uk / (1.5·N).
    pub temperature: f64,
}

impl SimulationState {
    /// Build the initial state: FCC lattice positions and Maxwell-like
    /// random velocities with zero net momentum.
    #[must_use]
    pub fn new(config: &MdConfig) -> Self {
        let num_atom = config.num_atom();
        let positions = lattice::init_positions(config.nc, config.lattice_constant());
        let velocities =
            lattice::init_velocities(num_atom, config.reduced_temperature(), config.seed);

        Self {
            prior_positions: positions.clone(),
            velocities,
            forces: vec![0.0; num_atom * 3],
            num_atom,
            box_len: config.box_length(),
            step: 1,
            time: 0.0,
            phase: IntegrationPhase::Bootstrap,
            potential: 0.0,
            kinetic: 0.0,
            total: 0.0,
            temperature: 0.0,
            positions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::md::config;

    #[test]
    fn new_state_array_lengths_agree() {
        let cfg = config::quick_test_case(2);
        let s = SimulationState::new(&cfg);
        assert_eq!(s.num_atom, 32);
        assert_eq!(s.positions.len(), 96);
        assert_eq!(s.prior_positions.len(), 96);
        assert_eq!(s.velocities.len(), 96);
        assert_eq!(s.forces.len(), 96);
    }

    #[test]
    fn new_state_starts_in_bootstrap() {
        let cfg = config::quick_test_case(1);
        let s = SimulationState::new(&cfg);
        assert_eq!(s.phase, IntegrationPhase::Bootstrap);
        assert_eq!(s.step, 1);
        assert!(s.time.abs() < f64::EPSILON);
    }

    #[test]
    fn new_state_forces_zeroed() {
        let cfg = config::quick_test_case(1);
        let s = SimulationState::new(&cfg);
        assert!(s.forces.iter().all(|&f| f == 0.0));
    }
}
