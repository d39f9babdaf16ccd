// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for GPU setup and simulation preconditions.
//!
//! Replaces `Result<_, String>` in public APIs with a proper enum so callers
//! can pattern-match on failure modes (no adapter, device creation, degenerate
//! physics state) rather than parsing opaque strings.
//!
//! The simulation itself has no recoverable-error taxonomy: the variants below
//! are precondition violations surfaced as typed errors at API boundaries
//! instead of propagating silently as NaN/Inf through the arrays.

use std::fmt;

/// Errors arising from GPU initialization or simulation preconditions.
#[derive(Debug)]
pub enum ArgonMdError {
    /// No compatible GPU adapter was found by wgpu.
    NoAdapter,

    /// GPU device creation or buffer mapping failed (wraps the wgpu message).
    DeviceCreation(String),

    /// Instantaneous temperature was ≤ 0 at the bootstrap rescale step,
    /// which makes the Woodcock scale factor undefined. Guaranteed not to
    /// happen with non-zero initial velocities.
    DegenerateTemperature(f64),

    /// Two distinct atoms (or periodic images of distinct atoms) sit at the
    /// same position, which divides by zero in the force kernel. Reported by
    /// the diagnostic scan, never checked in the hot loop.
    CoincidentAtoms { n: usize, m: usize },
}

impl fmt::Display for ArgonMdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAdapter => write!(f, "No GPU adapter found"),
            Self::DeviceCreation(e) => write!(f, "Failed to create GPU device: {e}"),
            Self::DegenerateTemperature(tc) => {
                write!(
                    f,
                    "Instantaneous temperature {tc} is not positive — velocity rescale undefined"
                )
            }
            Self::CoincidentAtoms { n, m } => {
                write!(f, "Atoms {n} and {m} coincide (r² ≈ 0) — force undefined")
            }
        }
    }
}

impl std::error::Error for ArgonMdError {}
