//! # revflow
//!
//! Streaming FASTA reverse-complement with a SIMD reflow core.
//!
//! revflow reads a multi-record FASTA source and emits, for every record,
//! the header unchanged followed by the reverse complement of its body,
//! re-wrapped at a fixed output width. Inputs may be gigabytes; memory
//! stays bounded by fixed block buffers, and the per-byte
//! complement-and-reverse runs through a vectorized kernel (SSSE3 or
//! NEON) with a packed-table scalar fallback.
//!
//! # Architecture
//!
//! - [`operations::complement`]: precomputed complement tables
//! - [`operations::revcomp`]: the reverse+complement run primitive
//! - [`operations::reflow`]: the tail-to-head reflow engine
//! - [`io::fasta`]: record scanner producing header/body byte ranges
//! - [`io::source`] / [`io::sink`]: positioned-read backends and buffered
//!   output destinations
//! - [`driver`]: scan-then-emit glue
//!
//! # Example
//!
//! ```
//! # fn main() -> revflow::Result<()> {
//! let input = b">seq1\nACGT\n";
//! let mut out = Vec::new();
//! revflow::transform(&input[..], &mut out)?;
//! assert_eq!(out, b">seq1\nACGT\n"); // ACGT is its own reverse complement
//! # Ok(())
//! # }
//! ```

pub mod driver;
pub mod error;
pub mod io;
pub mod operations;

pub use driver::transform;
pub use error::{Result, RevflowError};
pub use io::fasta::{ByteRange, Record, RecordScanner};
pub use io::sink::OutputSink;
pub use io::source::{open_input, open_source, Source};
pub use operations::reflow::ReflowEngine;
pub use operations::revcomp::reverse_complement;
