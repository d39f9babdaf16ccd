// SPDX-License-Identifier: AGPL-3.0-only

//! WGSL shader sources for the GPU backend.
//!
//! A fixed, versioned set of four f32 compute kernels, one work-item per
//! atom, all operating on flat stride-3 storage arrays:
//!
//! | Kernel | Purpose |
//! |--------|---------|
//! | `init_force` | zero the force accumulator and per-atom PE slots |
//! | `lj_force` | pairwise LJ force + half-counted shifted PE over images |
//! | `move_atoms_euler` | modified-Euler bootstrap with velocity rescale |
//! | `move_atoms_verlet` | position-Verlet steady-state step |
//!
//! The kernels are the single-precision mirror of the f64 CPU path
//! (`md::forces`, `md::integrator`); the `validate_cpu_gpu_parity` binary
//! pins the two together within documented tolerances.

// ═══════════════════════════════════════════════════════════════════
// Force initialization (f32)
// ═══════════════════════════════════════════════════════════════════

pub const SHADER_INIT_FORCE: &str = include_str!("shaders/init_force_f32.wgsl");

// ═══════════════════════════════════════════════════════════════════
// LJ All-Pairs Periodic-Image Force Kernel (f32)
// ═══════════════════════════════════════════════════════════════════
//
// O(N² × (2·ncp+1)³) — brute force over the image cube, no neighbor lists.
// Also accumulates per-atom potential energy (half-counted), summed on the
// host after readback.

pub const SHADER_LJ_FORCE: &str = include_str!("shaders/lj_force_f32.wgsl");

// ═══════════════════════════════════════════════════════════════════
// Integrator Kernels (f32) — bootstrap and steady-state variants
// ═══════════════════════════════════════════════════════════════════

pub const SHADER_MOVE_ATOMS_EULER: &str = include_str!("shaders/move_atoms_euler_f32.wgsl");

pub const SHADER_MOVE_ATOMS_VERLET: &str = include_str!("shaders/move_atoms_verlet_f32.wgsl");
