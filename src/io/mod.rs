//! I/O module: positioned sources, buffered sinks, record scanning
//!
//! Constant-memory plumbing around the transform: every backend reads at
//! explicit offsets (the engine walks its input backward), writes are
//! sequential appends, and non-seekable inputs are spooled through a
//! bounded copy.

pub mod fasta;
pub mod sink;
pub mod source;

pub use fasta::{scan_records, ByteRange, Record, RecordScanner};
pub use sink::OutputSink;
pub use source::{open_input, open_source, FileSource, MmapSource, Source, MMAP_THRESHOLD};
