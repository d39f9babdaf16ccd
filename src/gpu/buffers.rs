// SPDX-License-Identifier: AGPL-3.0-only

//! GPU buffer creation, upload, and readback for f32 simulation data.

use super::GpuContext;

impl GpuContext {
    /// Create a storage buffer initialized from f32 data.
    ///
    /// Includes `COPY_DST` so the same buffer can be re-uploaded each step
    /// (host arrays are authoritative between calls).
    #[must_use]
    pub fn create_f32_buffer(&self, data: &[f32], label: &str) -> wgpu::Buffer {
        use wgpu::util::DeviceExt;
        self.device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
            })
    }

    /// Create a writable storage buffer for f32 output, sized in elements.
    #[must_use]
    pub fn create_f32_output_buffer(&self, count: usize, label: &str) -> wgpu::Buffer {
        self.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (count * 4) as u64,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Create a staging buffer for reading results back to the CPU.
    #[must_use]
    pub fn create_staging_buffer(&self, size: usize, label: &str) -> wgpu::Buffer {
        self.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: size as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Upload f32 data to a GPU storage buffer (overwrites from offset 0).
    pub fn upload_f32(&self, buffer: &wgpu::Buffer, data: &[f32]) {
        self.queue()
            .write_buffer(buffer, 0, bytemuck::cast_slice(data));
    }

    /// Read back f32 data from a GPU buffer via staging copy.
    ///
    /// Blocks until the queue has drained: this is the synchronization
    /// barrier that guarantees all previously submitted kernels completed
    /// before the host consumes their output.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ArgonMdError::DeviceCreation`] if the GPU map
    /// callback fails or the channel is dropped.
    pub fn read_back_f32(
        &self,
        buffer: &wgpu::Buffer,
        count: usize,
    ) -> Result<Vec<f32>, crate::error::ArgonMdError> {
        let staging = self.create_staging_buffer(count * 4, "readback");
        let mut encoder = self
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("readback"),
            });
        encoder.copy_buffer_to_buffer(buffer, 0, &staging, 0, (count * 4) as u64);
        self.queue().submit(std::iter::once(encoder.finish()));
        self.read_staging_f32(&staging)
    }

    /// Read f32 data from a staging buffer after submit + poll.
    ///
    /// Call this after [`super::GpuContext::submit_encoder`] when the encoder
    /// included a `copy_buffer_to_buffer` into the staging buffer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ArgonMdError::DeviceCreation`] if the GPU map
    /// callback fails or the channel is dropped.
    pub fn read_staging_f32(
        &self,
        staging: &wgpu::Buffer,
    ) -> Result<Vec<f32>, crate::error::ArgonMdError> {
        let slice = staging.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device().poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|_| {
                crate::error::ArgonMdError::DeviceCreation(
                    "GPU map callback: channel recv failed".into(),
                )
            })?
            .map_err(|e| {
                crate::error::ArgonMdError::DeviceCreation(format!("GPU buffer mapping: {e}"))
            })?;

        let data = slice.get_mapped_range();
        let result = mapped_bytes_to_f32(&data);
        drop(data);
        staging.unmap();
        Ok(result)
    }
}

/// Convert mapped GPU buffer bytes to f32 values.
///
/// GPU mapped buffers are typically page-aligned, so `bytemuck::try_cast_slice`
/// will succeed. Falls back to manual byte conversion if alignment is wrong.
#[must_use]
pub fn mapped_bytes_to_f32(data: &[u8]) -> Vec<f32> {
    bytemuck::try_cast_slice(data).map_or_else(
        |_| {
            data.chunks_exact(4)
                .map(|chunk| {
                    let mut b = [0u8; 4];
                    b.copy_from_slice(chunk);
                    f32::from_le_bytes(b)
                })
                .collect()
        },
        <[f32]>::to_vec,
    )
}
