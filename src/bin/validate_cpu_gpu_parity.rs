// SPDX-License-Identifier: AGPL-3.0-only

//! CPU/GPU Parity Validation
//!
//! Proves both backends implement the same physics: identical initial
//! conditions (FCC lattice + seeded perturbation), identical algorithm
//! (zero-force → LJ image sum → two-stage integrator), different hardware
//! and precision (CPU f64 scalar vs GPU f32 WGSL).
//!
//! Expected differences are single-precision rounding, which grows through
//! the long image-cell accumulation; tolerances in `tolerances.rs` bound
//! the observed worst case.
//!
//! Exit code 0 = parity confirmed (or no GPU present), 1 = divergence.

use argon_md::gpu::GpuContext;
use argon_md::md::gpu::GpuBackend;
use argon_md::md::lattice::UniformRand;
use argon_md::md::state::SimulationState;
use argon_md::md::{config, forces, integrator};
use argon_md::tolerances;
use argon_md::validation::ValidationHarness;

fn main() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  CPU / GPU Parity Validation                                 ║");
    println!("║  Same lattice, same algorithm, different chip and precision  ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut cfg = config::quick_test_case(2);
    cfg.label = String::from("parity_nc2");
    cfg.ncp = 2;
    cfg.steps = 50;

    // Break the lattice symmetry so forces are non-trivial; deterministic
    // so both backends see the same configuration.
    let mut reference = SimulationState::new(&cfg);
    let mut jitter = UniformRand::new(7);
    for r in &mut reference.positions {
        *r += 0.05 * jitter.sample();
    }
    reference.prior_positions.clone_from(&reference.positions);

    if let Err(e) = forces::check_coincident_atoms(&reference.positions, reference.box_len, cfg.ncp)
    {
        eprintln!("degenerate test configuration: {e}");
        std::process::exit(1);
    }

    println!(
        "  System: N={}, box={:.4} σ, rc={} σ, images ±{}",
        reference.num_atom, reference.box_len, cfg.rc, cfg.ncp
    );
    println!();

    let mut harness = ValidationHarness::new("cpu_gpu_parity");

    // ══════════════════════════════════════════════════════════════
    //  Phase 1: CPU force evaluation (f64 reference)
    // ══════════════════════════════════════════════════════════════
    println!("═══ Phase 1: CPU forces (f64) ════════════════════════════════");
    let mut cpu_state = reference.clone();
    forces::compute_forces_cpu(&mut cpu_state, &cfg);
    println!("  Up = {:.8}", cpu_state.potential);

    // ══════════════════════════════════════════════════════════════
    //  Phase 2: GPU force evaluation (f32)
    // ══════════════════════════════════════════════════════════════
    println!("═══ Phase 2: GPU forces (f32) ════════════════════════════════");
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("tokio runtime: {e}");
            std::process::exit(1);
        }
    };
    let gpu = match rt.block_on(GpuContext::new()) {
        Ok(gpu) => gpu,
        Err(e) => {
            println!("  No usable GPU adapter ({e})");
            println!("  Skipping parity validation — nothing to compare.");
            return;
        }
    };
    gpu.print_info();
    let backend = GpuBackend::new(gpu, reference.num_atom);

    let mut gpu_state = reference.clone();
    if let Err(e) = backend.compute_forces(&mut gpu_state, &cfg) {
        eprintln!("GPU force evaluation failed: {e}");
        std::process::exit(1);
    }
    println!("  Up = {:.8}", gpu_state.potential);

    // Per-component deviation, relative above the floor, absolute below.
    let mut max_abs: f64 = 0.0;
    let mut max_rel: f64 = 0.0;
    for (c, g) in cpu_state.forces.iter().zip(&gpu_state.forces) {
        let diff = (c - g).abs();
        if c.abs() > tolerances::FORCE_ABSOLUTE_FLOOR {
            max_rel = max_rel.max(diff / c.abs());
        } else {
            max_abs = max_abs.max(diff);
        }
    }
    println!("  Force deviation: max rel {max_rel:.3e}, max abs {max_abs:.3e}");
    harness.check_upper("force max relative deviation", max_rel, tolerances::GPU_VS_CPU_F32);
    harness.check_upper(
        "force max absolute deviation (near-zero components)",
        max_abs,
        tolerances::FORCE_ABSOLUTE_FLOOR,
    );
    harness.check_rel(
        "potential energy",
        gpu_state.potential,
        cpu_state.potential,
        tolerances::GPU_VS_CPU_F32,
    );

    // ══════════════════════════════════════════════════════════════
    //  Phase 3: short trajectories through both integrators
    // ══════════════════════════════════════════════════════════════
    println!("═══ Phase 3: {}-step trajectories ════════════════════════════", cfg.steps);

    let mut cpu_traj = reference.clone();
    for _ in 0..cfg.steps {
        forces::compute_forces_cpu(&mut cpu_traj, &cfg);
        if let Err(e) = integrator::move_atoms_cpu(&mut cpu_traj, &cfg) {
            eprintln!("CPU integration failed: {e}");
            std::process::exit(1);
        }
    }

    let mut gpu_traj = reference.clone();
    for _ in 0..cfg.steps {
        let step = backend
            .compute_forces(&mut gpu_traj, &cfg)
            .and_then(|()| backend.move_atoms(&mut gpu_traj, &cfg));
        if let Err(e) = step {
            eprintln!("GPU integration failed: {e}");
            std::process::exit(1);
        }
    }

    println!(
        "  CPU: E = {:.6}, T* = {:.6}",
        cpu_traj.total, cpu_traj.temperature
    );
    println!(
        "  GPU: E = {:.6}, T* = {:.6}",
        gpu_traj.total, gpu_traj.temperature
    );

    harness.check_bool(
        "both integrators left bootstrap",
        cpu_traj.step == gpu_traj.step && cpu_traj.phase == gpu_traj.phase,
    );
    // Trajectories diverge point-wise (chaos amplifies f32 rounding), but
    // the conserved total energy must agree much more tightly.
    harness.check_rel(
        "total energy after trajectory",
        gpu_traj.total,
        cpu_traj.total,
        10.0 * tolerances::GPU_VS_CPU_F32,
    );

    harness.finish();
}
