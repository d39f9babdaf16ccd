// SPDX-License-Identifier: AGPL-3.0-only

//! Argon crystal MD driver.
//!
//! Runs the 256-atom (nc=4) periodic LJ argon simulation on the CPU
//! backend by default, or on the GPU with `--gpu`. Prints per-interval
//! energies and an energy-conservation summary; optionally saves a JSON
//! run report.
//!
//! Usage:
//!   argon_md [--gpu] [--nc N] [--steps N] [--json DIR] [--list-adapters]

use argon_md::gpu::GpuContext;
use argon_md::md::observables::validate_energy;
use argon_md::md::state::Backend;
use argon_md::md::{config, simulation};

fn main() {
    let mut cfg = config::default_case();
    let mut backend = Backend::Cpu;
    let mut json_dir: Option<String> = None;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--gpu" => backend = Backend::Gpu,
            "--nc" => {
                cfg.nc = iter
                    .next()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| usage("--nc requires a positive integer"));
                cfg.label = format!("ar_nc{}_t50", cfg.nc);
            }
            "--steps" => {
                cfg.steps = iter
                    .next()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| usage("--steps requires a positive integer"));
            }
            "--json" => {
                json_dir = Some(
                    iter.next()
                        .cloned()
                        .unwrap_or_else(|| usage("--json requires a directory")),
                );
            }
            "--list-adapters" => {
                GpuContext::print_available_adapters();
                return;
            }
            other => usage(&format!("unknown argument '{other}'")),
        }
    }

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  LJ Argon Molecular Dynamics                                 ║");
    println!("║  Periodic FCC crystal, reduced units                         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let result = match backend {
        Backend::Gpu => {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("tokio runtime: {e}");
                    std::process::exit(1);
                }
            };
            rt.block_on(simulation::run_simulation_gpu(&cfg))
        }
        Backend::Cpu => simulation::run_simulation_cpu(&cfg),
    };

    let sim = match result {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("simulation failed: {e}");
            std::process::exit(1);
        }
    };

    let validation = validate_energy(&sim.energy_history);
    println!();
    println!("  ── Energy summary ──");
    println!(
        "    <E> = {:.6} ± {:.6}, drift = {:.4}%",
        validation.mean_total, validation.std_total, validation.drift_pct
    );
    println!(
        "    <T*> = {:.6} ± {:.6}",
        validation.mean_temperature, validation.std_temperature
    );
    println!(
        "    conservation: {}",
        if validation.passed { "OK" } else { "DRIFTING" }
    );

    if let Some(dir) = json_dir {
        match sim.save_json(&dir) {
            Ok(path) => println!("    Report: {path}"),
            Err(e) => eprintln!("    Report write failed: {e}"),
        }
    }
}

fn usage(msg: &str) -> ! {
    eprintln!("argon_md: {msg}");
    eprintln!("usage: argon_md [--gpu] [--nc N] [--steps N] [--json DIR] [--list-adapters]");
    std::process::exit(2);
}
