// SPDX-License-Identifier: AGPL-3.0-only

//! GPU compute context for the f32 MD kernels.
//!
//! Creates a wgpu device and provides helpers for running the simulation's
//! compute shaders on any Vulkan/Metal/DX12 GPU. The MD kernels are plain
//! f32 (matching the single-precision device path of the physics), so no
//! optional shader features are required.
//!
//! ## Adapter selection
//!
//! Set `ARGONMD_GPU_ADAPTER` to select a specific GPU:
//!
//! | Value | Behavior |
//! |-------|----------|
//! | `auto` / *(unset)* | First discrete GPU, else first adapter |
//! | `0`, `1`, … | Select adapter by enumeration index |
//! | substring | Case-insensitive name match (e.g. `"4070"`) |
//!
//! Use [`GpuContext::enumerate_adapters`] to list available GPUs first.
//!
//! ## Module structure
//!
//! - `adapter` — adapter discovery and selection
//! - `buffers` — f32 buffer creation, upload, readback
//! - `dispatch` — bind groups, command encoding, dispatch

mod adapter;
mod buffers;
mod dispatch;

pub use adapter::AdapterInfo;
pub use buffers::mapped_bytes_to_f32;
pub use dispatch::split_workgroups;

/// GPU context for the MD compute kernels.
#[must_use]
pub struct GpuContext {
    pub adapter_name: String,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

// ── Core accessors ───────────────────────────────────────────────────

impl GpuContext {
    /// Access the underlying wgpu Device.
    #[must_use]
    pub const fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Access the underlying wgpu Queue.
    #[must_use]
    pub const fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

// ── Constructor ──────────────────────────────────────────────────────

impl GpuContext {
    /// Create the GPU device.
    ///
    /// Adapter selection: `ARGONMD_GPU_ADAPTER` takes priority, then
    /// auto-detect (discrete first).
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ArgonMdError`] if no adapter is found or
    /// device creation fails.
    pub async fn new() -> Result<Self, crate::error::ArgonMdError> {
        let selected = adapter::select_adapter()?;
        let adapter_info = selected.get_info();

        let (device, queue) = selected
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("argon-md device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(|e| crate::error::ArgonMdError::DeviceCreation(e.to_string()))?;

        Ok(Self {
            adapter_name: adapter_info.name,
            device,
            queue,
        })
    }

    /// Enumerate all available GPU adapters.
    #[must_use]
    pub fn enumerate_adapters() -> Vec<AdapterInfo> {
        adapter::enumerate_adapters()
    }

    /// Print device capabilities.
    pub fn print_info(&self) {
        println!("  GPU: {}", self.adapter_name);
    }

    /// Print all available adapters to stdout.
    pub fn print_available_adapters() {
        let adapters = Self::enumerate_adapters();
        println!("  Available GPU adapters:");
        for info in &adapters {
            println!("    {info}");
        }
        if adapters.is_empty() {
            println!("    (none found)");
        }
    }
}

// ── Pipeline creation ────────────────────────────────────────────────

impl GpuContext {
    /// Create a compute pipeline from WGSL source with auto bind-group layout.
    ///
    /// Entry point is always `main`; bindings are taken in declaration order
    /// by [`Self::create_bind_group`].
    #[must_use]
    pub fn create_pipeline(&self, shader_source: &str, label: &str) -> wgpu::ComputePipeline {
        let shader_module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(shader_source.into()),
            });

        self.device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(label),
                layout: None,
                module: &shader_module,
                entry_point: "main",
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            })
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::float_cmp)]
    fn f32_byte_roundtrip() {
        let original: Vec<f32> = vec![0.0, 1.0, -1.0, std::f32::consts::PI];
        let bytes: Vec<u8> = original.iter().flat_map(|v| v.to_le_bytes()).collect();
        let recovered = super::mapped_bytes_to_f32(&bytes);
        assert_eq!(original, recovered);
    }
}
