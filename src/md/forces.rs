// SPDX-License-Identifier: AGPL-3.0-only

//! CPU Lennard-Jones force evaluation over periodic images.
//!
//! Brute-force O(N² × image-cells): for every ordered atom pair (n, m) and
//! every image offset in [-ncp, ncp]³, accumulate the pair force on atom n
//! and the half-counted shifted pair energy. The scalar pair kernel is a
//! pure function shared conceptually with the GPU shader (`lj_force_f32`);
//! the CPU/GPU parity validation pins the two together.
//!
//! Parallelism: rayon over atom index n. Each task exclusively owns its
//! atom's force slot (no cross-task aliasing), and potential energy is
//! combined from per-task partial sums by the reduction — no locks.
//!
//! Precondition: no two distinct atoms (or images of distinct atoms) may
//! coincide; r² = 0 divides by zero. The hot loop does not check — use
//! [`check_coincident_atoms`] as an explicit diagnostic.

use rayon::prelude::*;

use crate::error::ArgonMdError;
use crate::md::config::MdConfig;
use crate::md::state::SimulationState;
use crate::tolerances::COINCIDENT_R2;

/// Scalar LJ pair kernel in reduced units.
///
/// For squared separation `r2` within the cutoff, returns
/// `(Fr/r, ΔUp)` where `Fr = 48·r⁻¹³ − 24·r⁻⁷` is the radial force
/// magnitude (so the force vector is `d · Fr/r`) and
/// `ΔUp = 0.5·(4·(r⁻¹² − r⁻⁶) − Vrc)` is the half-counted shifted pair
/// energy (the 0.5 compensates for the ordered double loop visiting each
/// unordered pair twice).
#[inline]
#[must_use]
pub fn lj_pair(r2: f64, v_rc: f64) -> (f64, f64) {
    let r = r2.sqrt();
    let rm6 = 1.0 / (r2 * r2 * r2);
    let rm7 = rm6 / r;
    let rm12 = rm6 * rm6;
    let rm13 = rm12 / r;
    let fr = 48.0 * rm13 - 24.0 * rm7;
    let up = 0.5 * (4.0 * (rm12 - rm6) - v_rc);
    (fr / r, up)
}

/// Compute forces and potential energy on the CPU backend.
///
/// Zeroes `state.forces`, accumulates pair contributions for every image
/// offset within the cutoff, and writes the total shifted potential energy
/// to `state.potential`.
pub fn compute_forces_cpu(state: &mut SimulationState, config: &MdConfig) {
    let lj = config.lj_params();
    let ncp = config.ncp;
    let box_len = state.box_len;
    let n_atoms = state.num_atom;
    let positions = &state.positions;
    let forces = &mut state.forces;

    let up_total: f64 = forces
        .par_chunks_mut(3)
        .enumerate()
        .map(|(n, f_n)| {
            f_n[0] = 0.0;
            f_n[1] = 0.0;
            f_n[2] = 0.0;

            let xn = positions[n * 3];
            let yn = positions[n * 3 + 1];
            let zn = positions[n * 3 + 2];
            let mut up_local = 0.0;

            for m in 0..n_atoms {
                let xm = positions[m * 3];
                let ym = positions[m * 3 + 1];
                let zm = positions[m * 3 + 2];

                for i in -ncp..=ncp {
                    for j in -ncp..=ncp {
                        for k in -ncp..=ncp {
                            // exact self-interaction excluded
                            if n == m && i == 0 && j == 0 && k == 0 {
                                continue;
                            }

                            let dx = xn - (xm + f64::from(i) * box_len);
                            let dy = yn - (ym + f64::from(j) * box_len);
                            let dz = zn - (zm + f64::from(k) * box_len);

                            let r2 = dx * dx + dy * dy + dz * dz;
                            if r2 <= lj.rc2 {
                                let (f_over_r, up) = lj_pair(r2, lj.v_rc);
                                f_n[0] += dx * f_over_r;
                                f_n[1] += dy * f_over_r;
                                f_n[2] += dz * f_over_r;
                                up_local += up;
                            }
                        }
                    }
                }
            }

            up_local
        })
        .sum();

    state.potential = up_total;
}

/// Diagnostic scan for coincident atoms (the division-by-zero precondition
/// of the force kernel). Never called from the hot loop.
///
/// # Errors
///
/// Returns [`ArgonMdError::CoincidentAtoms`] naming the first offending
/// pair, considering all image offsets in [-ncp, ncp]³.
pub fn check_coincident_atoms(
    positions: &[f64],
    box_len: f64,
    ncp: i32,
) -> Result<(), ArgonMdError> {
    let n_atoms = positions.len() / 3;
    for n in 0..n_atoms {
        for m in (n + 1)..n_atoms {
            for i in -ncp..=ncp {
                for j in -ncp..=ncp {
                    for k in -ncp..=ncp {
                        let dx = positions[n * 3] - (positions[m * 3] + f64::from(i) * box_len);
                        let dy =
                            positions[n * 3 + 1] - (positions[m * 3 + 1] + f64::from(j) * box_len);
                        let dz =
                            positions[n * 3 + 2] - (positions[m * 3 + 2] + f64::from(k) * box_len);
                        if dx * dx + dy * dy + dz * dz < COINCIDENT_R2 {
                            return Err(ArgonMdError::CoincidentAtoms { n, m });
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::md::config;
    use crate::md::state::{IntegrationPhase, SimulationState};
    use crate::tolerances::EXACT_F64;

    /// Analytical radial LJ force at separation r (reduced units).
    fn lj_force_analytical(r: f64) -> f64 {
        48.0 * r.powi(-13) - 24.0 * r.powi(-7)
    }

    fn state_from_positions(positions: Vec<f64>, box_len: f64) -> SimulationState {
        let num_atom = positions.len() / 3;
        SimulationState {
            prior_positions: positions.clone(),
            velocities: vec![0.0; num_atom * 3],
            forces: vec![0.0; num_atom * 3],
            num_atom,
            box_len,
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

    /// Isolated-pair config: a box so large that no periodic image falls
    /// inside the cutoff.
    fn isolated_config() -> config::MdConfig {
        let mut cfg = config::quick_test_case(1);
        cfg.ncp = 1;
        cfg
    }

    #[test]
    fn two_atoms_force_matches_analytical() {
        let r = 1.2_f64;
        let cfg = isolated_config();
        let mut state = state_from_positions(vec![0.0, 0.0, 0.0, r, 0.0, 0.0], 100.0);

        compute_forces_cpu(&mut state, &cfg);

        let expected = lj_force_analytical(r);
        // d = r[0] - r[1] = (-r, 0, 0): atom 0 is pushed along -x when the
        // pair is repulsive (Fr > 0).
        assert!(
            (state.forces[0] - (-expected)).abs() < 1e-9,
            "Fx on atom 0: got {}, expected {}",
            state.forces[0],
            -expected
        );
        assert!(state.forces[1].abs() < EXACT_F64);
        assert!(state.forces[2].abs() < EXACT_F64);
    }

    #[test]
    fn two_atoms_newtons_third_law() {
        let cfg = isolated_config();
        let mut state = state_from_positions(vec![0.0, 0.0, 0.0, 0.9, 0.7, 0.4], 100.0);

        compute_forces_cpu(&mut state, &cfg);

        for axis in 0..3 {
            assert!(
                (state.forces[axis] + state.forces[3 + axis]).abs() < 1e-9,
                "force pair must be equal and opposite on axis {axis}"
            );
        }
    }

    #[test]
    fn pair_beyond_cutoff_contributes_nothing() {
        let cfg = isolated_config();
        let mut state = state_from_positions(vec![0.0, 0.0, 0.0, 3.0, 0.0, 0.0], 100.0);

        compute_forces_cpu(&mut state, &cfg);

        assert!(state.forces.iter().all(|&f| f.abs() < EXACT_F64));
        assert!(state.potential.abs() < EXACT_F64);
    }

    #[test]
    fn shifted_potential_continuous_at_cutoff() {
        // Just inside the cutoff the shifted pair energy goes to zero.
        let cfg = isolated_config();
        let rc = cfg.rc;
        let mut state =
            state_from_positions(vec![0.0, 0.0, 0.0, rc - 1e-6, 0.0, 0.0], 100.0);

        compute_forces_cpu(&mut state, &cfg);

        assert!(
            state.potential.abs() < 1e-4,
            "shifted PE near cutoff should be ~0, got {}",
            state.potential
        );
    }

    #[test]
    fn single_atom_zero_net_force_from_image_symmetry() {
        // A lone atom interacts only with its own periodic images, which
        // cancel pairwise; the exact self-term (zero offset) is excluded,
        // so the result is finite and ~0.
        let mut cfg = config::quick_test_case(1);
        cfg.ncp = 3;
        let mut state = state_from_positions(vec![0.3, -0.2, 0.1], 2.0);

        compute_forces_cpu(&mut state, &cfg);

        for f in &state.forces {
            assert!(f.is_finite());
            assert!(f.abs() < 1e-9, "image forces should cancel, got {f}");
        }
        assert!(state.potential.is_finite());
    }

    #[test]
    fn forces_rezeroed_between_calls() {
        let cfg = isolated_config();
        let mut state = state_from_positions(vec![0.0, 0.0, 0.0, 1.2, 0.0, 0.0], 100.0);

        compute_forces_cpu(&mut state, &cfg);
        let first = state.forces.clone();
        compute_forces_cpu(&mut state, &cfg);

        assert_eq!(first, state.forces, "repeat call must not double-count");
    }

    #[test]
    fn lj_pair_repulsive_inside_attractive_outside() {
        let v_rc = config::LjParameters::new(2.5).v_rc;
        // Inside the LJ minimum (r < 2^(1/6)) the force is repulsive.
        let (f_in, _) = lj_pair(1.0, v_rc);
        assert!(f_in > 0.0);
        // Outside the minimum it is attractive.
        let (f_out, _) = lj_pair(1.5 * 1.5, v_rc);
        assert!(f_out < 0.0);
    }

    #[test]
    fn coincident_atoms_detected() {
        let positions = vec![0.5, 0.5, 0.5, 0.5, 0.5, 0.5];
        let err = check_coincident_atoms(&positions, 10.0, 1).unwrap_err();
        match err {
            ArgonMdError::CoincidentAtoms { n, m } => {
                assert_eq!((n, m), (0, 1));
            }
            other => panic!("expected CoincidentAtoms, got {other}"),
        }
    }

    #[test]
    fn coincident_check_passes_lattice() {
        let cfg = config::quick_test_case(2);
        let state = SimulationState::new(&cfg);
        assert!(check_coincident_atoms(&state.positions, state.box_len, cfg.ncp).is_ok());
    }

    #[test]
    fn coincident_images_across_box_detected() {
        // Atom 1 sits exactly one box length from atom 0: its (-1,0,0)
        // image coincides with atom 0.
        let positions = vec![0.0, 0.0, 0.0, 4.0, 0.0, 0.0];
        assert!(check_coincident_atoms(&positions, 4.0, 1).is_err());
    }
}
