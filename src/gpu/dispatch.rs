// SPDX-License-Identifier: AGPL-3.0-only

//! GPU dispatch and encoder management.
//!
//! Streaming dispatch pattern: encode the step's kernel sequence into one
//! command encoder, submit once, read back only at the step boundary.
//!
//! ```text
//! begin_encoder()  → CommandEncoder
//!   ↕  encode_pass() per kernel
//! submit_encoder() → ONE GPU submission
//! read_staging_f32() → read back results
//! ```

use super::GpuContext;

/// Split workgroup count into (x, y, 1) for 2D dispatch when x > 65535.
/// Shaders must linearize via `gid.x + gid.y * num_workgroups.x * WG_SIZE`.
#[must_use]
pub fn split_workgroups(total: u32) -> (u32, u32, u32) {
    if total <= 65535 {
        (total, 1, 1)
    } else {
        let y = total.div_ceil(65535);
        let x = total.div_ceil(y);
        (x, y, 1)
    }
}

impl GpuContext {
    /// Create a bind group from a pipeline and ordered buffer slice.
    ///
    /// Each buffer is bound at binding index 0, 1, 2, ... in order.
    pub fn create_bind_group(
        &self,
        pipeline: &wgpu::ComputePipeline,
        buffers: &[&wgpu::Buffer],
    ) -> wgpu::BindGroup {
        let layout = pipeline.get_bind_group_layout(0);
        let entries: Vec<wgpu::BindGroupEntry> = buffers
            .iter()
            .enumerate()
            .map(|(i, buf): (usize, &&wgpu::Buffer)| wgpu::BindGroupEntry {
                binding: i as u32,
                resource: buf.as_entire_binding(),
            })
            .collect();
        self.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bind_group"),
            layout: &layout,
            entries: &entries,
        })
    }

    /// Begin a command encoder for streaming multiple dispatches.
    #[must_use]
    pub fn begin_encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    /// Submit a finished encoder to the GPU queue (single submission).
    pub fn submit_encoder(&self, encoder: wgpu::CommandEncoder) {
        self.queue().submit(std::iter::once(encoder.finish()));
    }

    /// Encode a compute pass into an existing encoder (no submit).
    pub fn encode_pass(
        encoder: &mut wgpu::CommandEncoder,
        pipeline: &wgpu::ComputePipeline,
        bind_group: &wgpu::BindGroup,
        workgroups: u32,
    ) {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("streaming_pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        let (wx, wy, wz) = split_workgroups(workgroups);
        pass.dispatch_workgroups(wx, wy, wz);
    }

    /// Dispatch a compute pipeline in its own submission (convenience only).
    ///
    /// **Prefer [`Self::begin_encoder`] + [`Self::encode_pass`]** for the MD
    /// step, which chains several kernels into one submission.
    pub fn dispatch(
        &self,
        pipeline: &wgpu::ComputePipeline,
        bind_group: &wgpu::BindGroup,
        workgroups: u32,
    ) {
        let mut encoder = self.begin_encoder("dispatch");
        Self::encode_pass(&mut encoder, pipeline, bind_group, workgroups);
        self.submit_encoder(encoder);
    }
}

#[cfg(test)]
mod tests {
    use super::split_workgroups;

    #[test]
    fn split_small_counts_passthrough() {
        assert_eq!(split_workgroups(1), (1, 1, 1));
        assert_eq!(split_workgroups(4), (4, 1, 1));
        assert_eq!(split_workgroups(65535), (65535, 1, 1));
    }

    #[test]
    fn split_large_counts_cover_total() {
        for total in [65536_u32, 100_000, 1_000_000] {
            let (x, y, z) = split_workgroups(total);
            assert_eq!(z, 1);
            assert!(x <= 65535 && y <= 65535);
            assert!(u64::from(x) * u64::from(y) >= u64::from(total));
        }
    }
}
