// SPDX-License-Identifier: AGPL-3.0-only

//! Simulation configuration in reduced Lennard-Jones units.
//!
//! Physical inputs (kelvin, meters) are converted once at construction into
//! the reduced system: distance in units of σ, energy in units of ε, time in
//! units of τ = sqrt(m σ²/ε). All simulation arithmetic is dimensionless.

/// Boltzmann constant (J/K).
pub const KB: f64 = 1.380_648_8E-23;

/// Avogadro constant (1/mol).
pub const AVOGADRO_CONSTANT: f64 = 6.022_140_857E+23;

/// Lennard-Jones σ for argon (m).
pub const SIGMA: f64 = 3.405E-10;

/// Lennard-Jones ε for argon (J). ε/k_B ≈ 119.8 K.
pub const EPSILON: f64 = 1.654_017_262_4E-21;

/// Argon molar mass (kg/mol).
pub const ARGON_MOLAR_MASS: f64 = 0.039_948;

/// Woodcock velocity-rescaling damping constant for the bootstrap step.
pub const ALPHA: f64 = 0.2;

/// Lennard-Jones time unit τ = sqrt(m σ²/ε) in seconds (~2.15 ps for argon).
#[must_use]
pub fn tau_seconds() -> f64 {
    (ARGON_MOLAR_MASS / AVOGADRO_CONSTANT * SIGMA * SIGMA / EPSILON).sqrt()
}

/// Cutoff-derived constants of the shifted LJ potential.
///
/// The potential is shifted so it vanishes at the cutoff:
/// `V(r) = 4(r⁻¹² − r⁻⁶) − Vrc` with `Vrc = 4(rc⁻¹² − rc⁻⁶)`.
#[derive(Clone, Copy, Debug)]
pub struct LjParameters {
    /// Cutoff radius (σ units).
    pub rc: f64,
    /// Cutoff radius squared.
    pub rc2: f64,
    /// rc⁻⁶.
    pub rcm6: f64,
    /// rc⁻¹².
    pub rcm12: f64,
    /// Energy shift 4(rc⁻¹² − rc⁻⁶) making V(rc) = 0.
    pub v_rc: f64,
}

impl LjParameters {
    /// Derive all cutoff powers from the cutoff radius.
    #[must_use]
    pub fn new(rc: f64) -> Self {
        let rc2 = rc * rc;
        let rcm6 = rc.powi(-6);
        let rcm12 = rc.powi(-12);
        Self {
            rc,
            rc2,
            rcm6,
            rcm12,
            v_rc: 4.0 * (rcm12 - rcm6),
        }
    }
}

/// Simulation configuration (reduced units unless noted).
#[derive(Clone, Debug)]
#[must_use]
pub struct MdConfig {
    /// Label for this case.
    pub label: String,
    /// Supercell count per axis; the crystal holds 4·nc³ atoms.
    pub nc: usize,
    /// Lattice-constant scale factor (1.0 = equilibrium FCC density).
    pub scale: f64,
    /// Initial temperature in kelvin, converted via `reduced_temperature`.
    pub init_temp_kelvin: f64,
    /// Reduced timestep Δt* = Δt/τ.
    pub dt: f64,
    /// Cutoff radius in σ.
    pub rc: f64,
    /// Periodic-image range: offsets (i,j,k) span the cube [-ncp, ncp]³.
    pub ncp: i32,
    /// Total MD steps to run.
    pub steps: usize,
    /// Energy record interval.
    pub dump_step: usize,
    /// Velocity-initialization seed.
    pub seed: u64,
}

impl MdConfig {
    /// Number of atoms: 4 per FCC unit cell, nc³ cells. Immutable after
    /// state construction.
    #[must_use]
    pub const fn num_atom(&self) -> usize {
        4 * self.nc * self.nc * self.nc
    }

    /// FCC lattice constant in σ: 2^(2/3) at scale 1.0.
    ///
    /// 2^(2/3) is the equilibrium nearest-neighbor geometry of the LJ FCC
    /// crystal (nearest-neighbor distance 2^(1/6)·σ, a = √2 · 2^(1/6)·σ).
    #[must_use]
    pub fn lattice_constant(&self) -> f64 {
        2.0_f64.powf(2.0 / 3.0) * self.scale
    }

    /// Periodic box side length: lattice constant × nc.
    #[must_use]
    pub fn box_length(&self) -> f64 {
        self.lattice_constant() * self.nc as f64
    }

    /// Target temperature in reduced units: T* = T·k_B/ε.
    #[must_use]
    pub fn reduced_temperature(&self) -> f64 {
        self.init_temp_kelvin * KB / EPSILON
    }

    /// Cutoff-derived constants of the shifted potential.
    #[must_use]
    pub fn lj_params(&self) -> LjParameters {
        LjParameters::new(self.rc)
    }
}

/// Default case: the 256-atom argon crystal (nc = 4) at 50 K.
#[must_use]
pub fn default_case() -> MdConfig {
    MdConfig {
        label: String::from("ar_nc4_t50"),
        nc: 4,
        scale: 1.0,
        init_temp_kelvin: 50.0,
        dt: 0.001,
        rc: 2.5,
        ncp: 3,
        steps: 2_000,
        dump_step: 10,
        seed: 42,
    }
}

/// Small case for quick validation runs and tests.
#[must_use]
pub fn quick_test_case(nc: usize) -> MdConfig {
    MdConfig {
        label: format!("ar_nc{nc}_quick"),
        nc,
        scale: 1.0,
        init_temp_kelvin: 50.0,
        dt: 0.001,
        rc: 2.5,
        ncp: 3,
        steps: 200,
        dump_step: 10,
        seed: 42,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerances::EXACT_F64;

    #[test]
    fn num_atom_is_4_nc_cubed() {
        for nc in 1..=5 {
            let mut c = quick_test_case(nc);
            c.nc = nc;
            assert_eq!(c.num_atom(), 4 * nc * nc * nc);
        }
    }

    #[test]
    fn lattice_constant_at_unit_scale() {
        let c = default_case();
        assert!((c.lattice_constant() - 2.0_f64.powf(2.0 / 3.0)).abs() < EXACT_F64);
    }

    #[test]
    fn box_length_scales_with_nc() {
        let c = default_case();
        assert!((c.box_length() - 4.0 * c.lattice_constant()).abs() < EXACT_F64);
    }

    #[test]
    fn reduced_temperature_50k() {
        // T* = 50 K · k_B / ε ≈ 0.4174 (ε/k_B ≈ 119.8 K)
        let c = default_case();
        let t = c.reduced_temperature();
        assert!(t > 0.41 && t < 0.42, "T* for 50 K should be ~0.417, got {t}");
    }

    #[test]
    fn shifted_potential_vanishes_at_cutoff() {
        let lj = LjParameters::new(2.5);
        let v_at_rc = 4.0 * (lj.rcm12 - lj.rcm6) - lj.v_rc;
        assert!(v_at_rc.abs() < EXACT_F64);
    }

    #[test]
    fn cutoff_powers_consistent() {
        let lj = LjParameters::new(2.5);
        assert!((lj.rc2 - 6.25).abs() < EXACT_F64);
        assert!((lj.rcm12 - lj.rcm6 * lj.rcm6).abs() < EXACT_F64);
    }

    #[test]
    fn tau_is_picoseconds_scale() {
        // Argon LJ time unit is ~2.15 ps
        let tau = tau_seconds();
        assert!(tau > 1e-12 && tau < 5e-12, "τ should be ~2 ps, got {tau}");
    }

    #[test]
    fn default_case_matches_crystal_geometry() {
        let c = default_case();
        assert_eq!(c.num_atom(), 256);
        assert!((c.dt - 0.001).abs() < EXACT_F64);
        assert!((c.rc - 2.5).abs() < EXACT_F64);
        assert_eq!(c.ncp, 3);
        // cutoff sphere must fit inside the image range
        assert!(c.rc < c.box_length() * f64::from(c.ncp));
    }
}
