//! SIMD-optimized transform kernels
//!
//! Complement tables, the vectorized reverse+complement run primitive,
//! and the reflow engine built on both, with automatic scalar fallback on
//! platforms without a wide kernel.

pub mod complement;
pub mod reflow;
pub mod revcomp;

pub use complement::{complement_base, SENTINEL};
pub use reflow::{ReflowEngine, DEST_WIDTH, SOURCE_WIDTH};
pub use revcomp::{reverse_complement, revcomp_run, wide_kernel_available};
