// SPDX-License-Identifier: AGPL-3.0-only

//! Diagnostics computed from simulation output.

pub mod energy;

pub use energy::{validate_energy, EnergyValidation};
