// SPDX-License-Identifier: AGPL-3.0-only

//! Energy validation for MD runs.
//!
//! Checks conservation and drift from energy history records. Verlet is
//! symplectic, so after the bootstrap transient the total energy should
//! oscillate around a constant; a sustained drift indicates a broken
//! recurrence (e.g. desynchronized Verlet history).

use crate::md::simulation::EnergyRecord;
use crate::tolerances::{DIVISION_GUARD, ENERGY_DRIFT_PCT};

/// Energy validation result.
#[derive(Clone, Debug)]
pub struct EnergyValidation {
    pub mean_total: f64,
    pub std_total: f64,
    pub drift_pct: f64,
    pub mean_temperature: f64,
    pub std_temperature: f64,
    pub passed: bool,
}

impl EnergyValidation {
    const fn failed() -> Self {
        Self {
            mean_total: 0.0,
            std_total: 0.0,
            drift_pct: 0.0,
            mean_temperature: 0.0,
            std_temperature: 0.0,
            passed: false,
        }
    }
}

/// Validate energy conservation over a run's history.
///
/// Skips the first 10% of records (bootstrap transient), then compares the
/// first/last total energies against the mean magnitude.
#[must_use]
pub fn validate_energy(history: &[EnergyRecord]) -> EnergyValidation {
    if history.is_empty() {
        return EnergyValidation::failed();
    }

    let skip = history.len() / 10;
    let stable = &history[skip..];
    let n = stable.len() as f64;

    let mean_e: f64 = stable.iter().map(|e| e.utot).sum::<f64>() / n;
    let var_e: f64 = stable.iter().map(|e| (e.utot - mean_e).powi(2)).sum::<f64>() / n;
    let std_e = var_e.sqrt();

    let (e_initial, e_final) = match (stable.first(), stable.last()) {
        (Some(first), Some(last)) => (first.utot, last.utot),
        _ => return EnergyValidation::failed(),
    };
    let drift_pct = if mean_e.abs() > DIVISION_GUARD {
        ((e_final - e_initial) / mean_e.abs()).abs() * 100.0
    } else {
        0.0
    };

    let mean_t: f64 = stable.iter().map(|e| e.temperature).sum::<f64>() / n;
    let var_t: f64 = stable
        .iter()
        .map(|e| (e.temperature - mean_t).powi(2))
        .sum::<f64>()
        / n;

    EnergyValidation {
        mean_total: mean_e,
        std_total: std_e,
        drift_pct,
        mean_temperature: mean_t,
        std_temperature: var_t.sqrt(),
        passed: drift_pct < ENERGY_DRIFT_PCT,
    }
}
