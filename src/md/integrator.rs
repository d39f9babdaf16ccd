// SPDX-License-Identifier: AGPL-3.0-only

//! Time integration: modified-Euler bootstrap, Verlet steady state,
//! periodic wrap, and energy/temperature bookkeeping.
//!
//! The integrator is a two-state machine keyed on [`IntegrationPhase`]:
//! the first call rescales velocities toward the target temperature
//! (Woodcock scaling) and seeds the Verlet history with a modified-Euler
//! step; every later call advances by the position-Verlet recurrence.
//!
//! Energies are computed at call entry, before the update: `Uk` from the
//! current velocities, `Utot = Uk + Up` with `Up` supplied by the force
//! evaluation that preceded this call.

use crate::error::ArgonMdError;
use crate::md::config::{MdConfig, ALPHA};
use crate::md::state::{IntegrationPhase, SimulationState};

/// Kinetic energy, total energy, and instantaneous temperature from the
/// current velocities. `Uk = 0.5·Σ|V|²`, `Tc = Uk / (1.5·N)`.
pub fn update_energy_diagnostics(state: &mut SimulationState) {
    let mut v2_sum = 0.0;
    for v in state.velocities.chunks_exact(3) {
        v2_sum += v[0] * v[0] + v[1] * v[1] + v[2] * v[2];
    }
    state.kinetic = 0.5 * v2_sum;
    state.total = state.kinetic + state.potential;
    state.temperature = state.kinetic / (1.5 * state.num_atom as f64);
}

/// Woodcock velocity-rescale factor `s = sqrt((Tg + α·(Tc − Tg)) / Tc)`.
///
/// # Errors
///
/// Returns [`ArgonMdError::DegenerateTemperature`] when `Tc ≤ 0`, which
/// would make the factor undefined. Non-zero initial velocities guarantee
/// this cannot happen in a normal run.
pub fn woodcock_scale(tc: f64, tg: f64) -> Result<f64, ArgonMdError> {
    if tc <= 0.0 {
        return Err(ArgonMdError::DegenerateTemperature(tc));
    }
    Ok(((tg + ALPHA * (tc - tg)) / tc).sqrt())
}

/// Wrap positions back into [0, box_len), shifting the Verlet history by
/// the same amount.
///
/// Wrapping only the current position would desynchronize the recurrence
/// `r' = 2r − r1 + F·Δt²`, so r and r1 always move together.
pub fn wrap_positions(positions: &mut [f64], prior: &mut [f64], box_len: f64) {
    for (r, r1) in positions.iter_mut().zip(prior.iter_mut()) {
        if *r > box_len {
            *r -= box_len;
            *r1 -= box_len;
        } else if *r < 0.0 {
            *r += box_len;
            *r1 += box_len;
        }
    }
}

/// Advance the step counter, simulation time, and phase machine after a
/// completed position update. Bootstrap transitions to steady state and is
/// never revisited.
pub fn advance_clock(state: &mut SimulationState, dt: f64) {
    state.time = state.step as f64 * dt;
    state.step += 1;
    state.phase = IntegrationPhase::SteadyState;
}

/// Advance positions and velocities one step on the CPU backend.
///
/// Requires the forces in `state.forces` to be current for the present
/// positions (i.e. a force evaluation directly preceded this call).
///
/// # Errors
///
/// Returns [`ArgonMdError::DegenerateTemperature`] if the bootstrap
/// rescale is attempted at zero temperature.
pub fn move_atoms_cpu(state: &mut SimulationState, config: &MdConfig) -> Result<(), ArgonMdError> {
    update_energy_diagnostics(state);

    let dt = config.dt;
    let dt2 = dt * dt;

    match state.phase {
        IntegrationPhase::Bootstrap => {
            let s = woodcock_scale(state.temperature, config.reduced_temperature())?;

            for c in 0..state.num_atom * 3 {
                state.prior_positions[c] = state.positions[c];
                state.velocities[c] *= s;
                state.positions[c] += dt * state.velocities[c] + 0.5 * state.forces[c] * dt2;
                state.velocities[c] += dt * state.forces[c];
            }
        }
        IntegrationPhase::SteadyState => {
            for c in 0..state.num_atom * 3 {
                let r_snapshot = state.positions[c];
                state.positions[c] =
                    2.0 * state.positions[c] - state.prior_positions[c] + state.forces[c] * dt2;
                state.velocities[c] =
                    0.5 * (state.positions[c] - state.prior_positions[c]) / dt;
                state.prior_positions[c] = r_snapshot;
            }
        }
    }

    wrap_positions(
        &mut state.positions,
        &mut state.prior_positions,
        state.box_len,
    );
    advance_clock(state, dt);
    Ok(())
}
