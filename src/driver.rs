//! Scan-then-emit driver
//!
//! Discovers every record up front, then emits them in source order:
//! header bytes verbatim, body through the reflow engine. Single-threaded,
//! single-pass over the record list; any error is terminal for the run.

use crate::error::Result;
use crate::io::fasta::{scan_records, ByteRange};
use crate::io::source::Source;
use crate::operations::reflow::ReflowEngine;
use std::io::Write;

/// Header passthrough copy block.
const COPY_BLOCK: usize = 32 * 1024;

/// Reverse-complement every record of `source` into `sink`.
///
/// Returns the number of records emitted. Memory stays bounded by the
/// engine's block buffers and the copy block, independent of input size.
///
/// # Example
///
/// ```
/// # fn main() -> revflow::Result<()> {
/// let input = b">seq1\nACGTT\n";
/// let mut out = Vec::new();
/// let records = revflow::transform(&input[..], &mut out)?;
/// assert_eq!(records, 1);
/// assert_eq!(out, b">seq1\nAACGT\n");
/// # Ok(())
/// # }
/// ```
pub fn transform<S>(source: &S, sink: &mut dyn Write) -> Result<u64>
where
    S: Source + ?Sized,
{
    let records = scan_records(source)?;
    let mut engine = ReflowEngine::new();
    let mut copy_buf = vec![0u8; COPY_BLOCK];

    for record in &records {
        copy_range(source, record.header, &mut copy_buf, sink)?;
        engine.emit_reverse_complement(source, record.body, sink)?;
    }

    sink.flush()?;
    Ok(records.len() as u64)
}

/// Copy a byte range from the source to the sink unchanged.
fn copy_range<S>(source: &S, range: ByteRange, buf: &mut [u8], sink: &mut dyn Write) -> Result<()>
where
    S: Source + ?Sized,
{
    let mut offset = range.offset;
    let mut remaining = range.len;
    while remaining > 0 {
        let n = (remaining as usize).min(buf.len());
        source.read_exact_at(&mut buf[..n], offset)?;
        sink.write_all(&buf[..n])?;
        offset += n as u64;
        remaining -= n as u64;
    }
    Ok(())
}
