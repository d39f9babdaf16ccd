// SPDX-License-Identifier: AGPL-3.0-only

//! GPU backend: device-mirrored force evaluation and integration.
//!
//! The mirror (positions, prior positions, velocities, forces, per-atom PE)
//! lives on the device only for the duration of one call: inputs are
//! uploaded before the kernel sequence, outputs read back after it, and the
//! host arrays in [`SimulationState`] stay authoritative at call
//! boundaries. The blocking staging readback doubles as the synchronization
//! barrier — the integrator never sees partially computed forces.
//!
//! Misuse precondition: one backend per run. Interleaving CPU and GPU calls
//! against the same state within a run is unsupported (the f32 mirror and
//! the f64 host arrays would diverge between boundaries).

use crate::error::ArgonMdError;
use crate::gpu::GpuContext;
use crate::md::config::MdConfig;
use crate::md::integrator::{advance_clock, update_energy_diagnostics, woodcock_scale, wrap_positions};
use crate::md::shaders;
use crate::md::state::{IntegrationPhase, SimulationState};

/// Narrow a host f64 array to the device f32 representation.
fn to_f32(src: &[f64]) -> Vec<f32> {
    src.iter().map(|&v| v as f32).collect()
}

/// Widen a device readback back into the host array.
fn copy_into_f64(dst: &mut [f64], src: &[f32]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d = f64::from(*s);
    }
}

/// Device mirror and compiled kernel set for one simulation run.
#[must_use]
pub struct GpuBackend {
    gpu: GpuContext,
    init_force: wgpu::ComputePipeline,
    lj_force: wgpu::ComputePipeline,
    move_euler: wgpu::ComputePipeline,
    move_verlet: wgpu::ComputePipeline,
    pos_buf: wgpu::Buffer,
    prior_buf: wgpu::Buffer,
    vel_buf: wgpu::Buffer,
    force_buf: wgpu::Buffer,
    pe_buf: wgpu::Buffer,
    staging_vec: wgpu::Buffer,
    staging_pe: wgpu::Buffer,
    n_atoms: usize,
    workgroups: u32,
}

impl GpuBackend {
    /// Compile the kernel set and allocate the device mirror for `n_atoms`.
    pub fn new(gpu: GpuContext, n_atoms: usize) -> Self {
        let init_force = gpu.create_pipeline(shaders::SHADER_INIT_FORCE, "init_force");
        let lj_force = gpu.create_pipeline(shaders::SHADER_LJ_FORCE, "lj_force");
        let move_euler = gpu.create_pipeline(shaders::SHADER_MOVE_ATOMS_EULER, "move_atoms_euler");
        let move_verlet =
            gpu.create_pipeline(shaders::SHADER_MOVE_ATOMS_VERLET, "move_atoms_verlet");

        let pos_buf = gpu.create_f32_output_buffer(n_atoms * 3, "positions");
        let prior_buf = gpu.create_f32_output_buffer(n_atoms * 3, "prior_positions");
        let vel_buf = gpu.create_f32_output_buffer(n_atoms * 3, "velocities");
        let force_buf = gpu.create_f32_output_buffer(n_atoms * 3, "forces");
        let pe_buf = gpu.create_f32_output_buffer(n_atoms, "pe_per_atom");
        let staging_vec = gpu.create_staging_buffer(n_atoms * 3 * 4, "staging_vec");
        let staging_pe = gpu.create_staging_buffer(n_atoms * 4, "staging_pe");

        let workgroups = n_atoms.div_ceil(64) as u32;

        Self {
            gpu,
            init_force,
            lj_force,
            move_euler,
            move_verlet,
            pos_buf,
            prior_buf,
            vel_buf,
            force_buf,
            pe_buf,
            staging_vec,
            staging_pe,
            n_atoms,
            workgroups,
        }
    }

    /// Adapter name for run reports.
    #[must_use]
    pub fn adapter_name(&self) -> &str {
        &self.gpu.adapter_name
    }

    /// Compute forces and potential energy on the device.
    ///
    /// Kernel sequence in one submission: `init_force` (zero accumulators)
    /// then `lj_force`; forces and per-atom PE are read back, and the PE is
    /// summed on the host into `state.potential`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgonMdError::DeviceCreation`] on readback failure.
    pub fn compute_forces(
        &self,
        state: &mut SimulationState,
        config: &MdConfig,
    ) -> Result<(), ArgonMdError> {
        let lj = config.lj_params();

        self.gpu.upload_f32(&self.pos_buf, &to_f32(&state.positions));

        let init_params = self
            .gpu
            .create_f32_buffer(&[self.n_atoms as f32], "init_params");
        let force_params = self.gpu.create_f32_buffer(
            &[
                self.n_atoms as f32,
                config.ncp as f32,
                state.box_len as f32,
                lj.rc2 as f32,
                lj.v_rc as f32,
            ],
            "force_params",
        );

        let init_bg = self.gpu.create_bind_group(
            &self.init_force,
            &[&self.force_buf, &self.pe_buf, &init_params],
        );
        let force_bg = self.gpu.create_bind_group(
            &self.lj_force,
            &[&self.pos_buf, &self.force_buf, &self.pe_buf, &force_params],
        );

        let mut encoder = self.gpu.begin_encoder("force_step");
        GpuContext::encode_pass(&mut encoder, &self.init_force, &init_bg, self.workgroups);
        GpuContext::encode_pass(&mut encoder, &self.lj_force, &force_bg, self.workgroups);
        encoder.copy_buffer_to_buffer(
            &self.force_buf,
            0,
            &self.staging_vec,
            0,
            (self.n_atoms * 3 * 4) as u64,
        );
        encoder.copy_buffer_to_buffer(
            &self.pe_buf,
            0,
            &self.staging_pe,
            0,
            (self.n_atoms * 4) as u64,
        );
        self.gpu.submit_encoder(encoder);

        let forces = self.gpu.read_staging_f32(&self.staging_vec)?;
        let pe = self.gpu.read_staging_f32(&self.staging_pe)?;

        copy_into_f64(&mut state.forces, &forces);
        state.potential = pe.iter().map(|&p| f64::from(p)).sum();
        Ok(())
    }

    /// Advance positions and velocities one step on the device.
    ///
    /// Energy diagnostics and the Woodcock factor are computed on the host
    /// from the authoritative f64 arrays before the kernel runs; the
    /// periodic wrap is applied on the host after readback (shared with the
    /// CPU backend, keeping r and r1 coupled).
    ///
    /// # Errors
    ///
    /// Returns [`ArgonMdError::DegenerateTemperature`] at the bootstrap
    /// rescale with Tc ≤ 0, or [`ArgonMdError::DeviceCreation`] on readback
    /// failure.
    pub fn move_atoms(
        &self,
        state: &mut SimulationState,
        config: &MdConfig,
    ) -> Result<(), ArgonMdError> {
        update_energy_diagnostics(state);

        let dt = config.dt;

        self.gpu.upload_f32(&self.pos_buf, &to_f32(&state.positions));
        self.gpu
            .upload_f32(&self.prior_buf, &to_f32(&state.prior_positions));
        self.gpu.upload_f32(&self.vel_buf, &to_f32(&state.velocities));
        self.gpu.upload_f32(&self.force_buf, &to_f32(&state.forces));

        let (pipeline, params) = match state.phase {
            IntegrationPhase::Bootstrap => {
                let s = woodcock_scale(state.temperature, config.reduced_temperature())?;
                (
                    &self.move_euler,
                    vec![self.n_atoms as f32, dt as f32, s as f32],
                )
            }
            IntegrationPhase::SteadyState => {
                (&self.move_verlet, vec![self.n_atoms as f32, dt as f32])
            }
        };
        let params_buf = self.gpu.create_f32_buffer(&params, "move_params");

        let bind_group = self.gpu.create_bind_group(
            pipeline,
            &[
                &self.pos_buf,
                &self.prior_buf,
                &self.vel_buf,
                &self.force_buf,
                &params_buf,
            ],
        );

        self.gpu.dispatch(pipeline, &bind_group, self.workgroups);

        let positions = self.gpu.read_back_f32(&self.pos_buf, self.n_atoms * 3)?;
        let prior = self.gpu.read_back_f32(&self.prior_buf, self.n_atoms * 3)?;
        let velocities = self.gpu.read_back_f32(&self.vel_buf, self.n_atoms * 3)?;

        copy_into_f64(&mut state.positions, &positions);
        copy_into_f64(&mut state.prior_positions, &prior);
        copy_into_f64(&mut state.velocities, &velocities);

        wrap_positions(
            &mut state.positions,
            &mut state.prior_positions,
            state.box_len,
        );
        advance_clock(state, dt);
        Ok(())
    }
}
