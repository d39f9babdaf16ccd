// SPDX-License-Identifier: AGPL-3.0-only

//! argon-md — Lennard-Jones argon crystal molecular dynamics.
//!
//! Periodic FCC argon under the LJ pair potential in reduced units, with
//! two numerically equivalent execution backends over the same host state:
//!
//!   - **CPU**: rayon data-parallel force loop in f64, scalar integration
//!   - **GPU**: wgpu f32 kernels (zero-force, force, two integrator
//!     variants) with explicit host↔device transfers around each call
//!
//! The integrator is a two-stage machine: a modified-Euler bootstrap step
//! with Woodcock velocity rescaling on iteration 1, position-Verlet from
//! iteration 2 on. Each step yields potential/kinetic/total energy and the
//! instantaneous temperature.
//!
//! ## Binaries
//!   - `argon_md` — run the default 256-atom crystal on CPU or GPU
//!   - `validate_cpu_gpu_parity` — prove both backends produce the same
//!     physics on identical initial conditions

pub mod error;
pub mod gpu;
pub mod md;
pub mod tolerances;
pub mod validation;
