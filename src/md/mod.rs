// SPDX-License-Identifier: AGPL-3.0-only

//! Molecular dynamics of a periodic Lennard-Jones argon crystal.
//!
//! All physics runs in reduced LJ units (distance σ, energy ε, time τ);
//! `config` holds the physical-constant table and the conversions.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `config` | constants, reduced-unit conversion, cutoff parameters |
//! | `state` | per-atom arrays, energies, integrator phase machine |
//! | `lattice` | FCC initial positions, Maxwell-like initial velocities |
//! | `forces` | CPU force evaluation (rayon over atoms, PE reduction) |
//! | `integrator` | bootstrap/Verlet stepping, periodic wrap, energies |
//! | `shaders` | WGSL kernel sources for the GPU backend |
//! | `gpu` | device mirror: GPU force + integration orchestration |
//! | `simulation` | step loop, energy history, run reports |
//! | `observables` | energy-conservation validation |

pub mod config;
pub mod forces;
pub mod gpu;
pub mod integrator;
pub mod lattice;
pub mod observables;
pub mod shaders;
pub mod simulation;
pub mod state;
