//! Reverse-complement reflow engine
//!
//! The engine consumes one record body — symbol lines wrapped at
//! [`SOURCE_WIDTH`] columns, each line followed by a single line break —
//! and writes the reverse complement of the concatenated symbols,
//! re-wrapped at [`DEST_WIDTH`] columns, to the output sink.
//!
//! # Architecture
//!
//! The body is traversed tail to head in fixed blocks while the output is
//! written head to tail, so two independent cursors move in opposite
//! directions. Because the source period ([`LINE_PERIOD`] bytes: a full
//! line plus its break) equals the output period, every 61-byte unit
//! walked back from the body's true tail produces exactly one full output
//! line. The source's own line breaks generally do not fall on unit
//! boundaries; a per-body *phase* locates the break inside each unit, and
//! the unit is transformed as bulk runs around it ([`revcomp_run`]) with
//! one or two scalar bytes at the split when the phase is odd.
//!
//! Memory is bounded by the two block buffers regardless of body length.
//!
//! # Validation
//!
//! Every position where the traversal expects a line break is checked;
//! a mismatch fails with [`RevflowError::MalformedBody`] instead of
//! producing silently wrong output. Input wrapped at a width other than
//! [`SOURCE_WIDTH`] is rejected this way on its first misplaced break.

use crate::error::{Result, RevflowError};
use crate::io::fasta::ByteRange;
use crate::io::source::Source;
use crate::operations::complement::COMPLEMENT;
use crate::operations::revcomp::{revcomp_run, wide_kernel_available};
use std::io::Write;

/// Symbol columns per source body line.
pub const SOURCE_WIDTH: usize = 60;

/// Symbol columns per output line.
pub const DEST_WIDTH: usize = 60;

/// Source line period: a full line plus its line break.
pub const LINE_PERIOD: usize = SOURCE_WIDTH + 1;

/// Lines per I/O block.
const BLOCK_LINES: usize = 1024;

/// Block buffer size; a whole number of line periods.
const BLOCK_SIZE: usize = LINE_PERIOD * BLOCK_LINES;

/// Streaming reverse-complement reflow engine.
///
/// Holds a bounded input/output buffer pair sized to a whole number of
/// line periods, plus the one-time wide-kernel detection result. Reusable
/// across bodies.
///
/// # Example
///
/// ```
/// use revflow::operations::reflow::ReflowEngine;
/// use revflow::io::fasta::ByteRange;
///
/// # fn main() -> revflow::Result<()> {
/// let body = b"ACGTT";
/// let mut out = Vec::new();
/// let mut engine = ReflowEngine::new();
/// engine.emit_reverse_complement(
///     &body[..],
///     ByteRange { offset: 0, len: body.len() as u64 },
///     &mut out,
/// )?;
/// assert_eq!(out, b"AACGT\n");
/// # Ok(())
/// # }
/// ```
pub struct ReflowEngine {
    inbuf: Vec<u8>,
    outbuf: Vec<u8>,
    wide: bool,
}

impl ReflowEngine {
    /// Create an engine with freshly allocated block buffers.
    pub fn new() -> Self {
        Self {
            inbuf: vec![0u8; BLOCK_SIZE],
            outbuf: vec![0u8; BLOCK_SIZE],
            wide: wide_kernel_available(),
        }
    }

    /// Write the re-wrapped reverse complement of `body` to `sink`.
    ///
    /// Emits `DEST_WIDTH`-column lines, each followed by a line break,
    /// with a possibly short final line; an empty body emits a single
    /// line break. Total symbol output equals `body.len` minus the line
    /// breaks embedded in the body.
    ///
    /// # Errors
    ///
    /// [`RevflowError::MalformedBody`] when a line break is missing from
    /// or present at an unexpected position; [`RevflowError::Io`] on any
    /// read or write failure.
    pub fn emit_reverse_complement<S>(
        &mut self,
        source: &S,
        body: ByteRange,
        sink: &mut dyn Write,
    ) -> Result<()>
    where
        S: Source + ?Sized,
    {
        if body.len == 0 {
            sink.write_all(b"\n")?;
            return Ok(());
        }

        // Symbols missing from the tail line relative to a full output
        // line; constant for the whole body, it locates the source line
        // break inside every unit walked back from the tail.
        let phase = SOURCE_WIDTH - (body.len % LINE_PERIOD as u64) as usize;

        let nblocks = body.len / BLOCK_SIZE as u64;
        let tail = (body.len % BLOCK_SIZE as u64) as usize;

        for n in 1..=nblocks {
            let base = body.offset + body.len - n * BLOCK_SIZE as u64;
            source.read_exact_at(&mut self.inbuf, base)?;
            let mut in_end = BLOCK_SIZE;
            let mut out_pos = 0;
            while out_pos < BLOCK_SIZE {
                self.reflow_line(in_end, out_pos, phase, base)?;
                in_end -= LINE_PERIOD;
                out_pos += LINE_PERIOD;
            }
            sink.write_all(&self.outbuf)?;
        }

        // Partial block at the head of the body.
        source.read_exact_at(&mut self.inbuf[..tail], body.offset)?;
        let units = tail / LINE_PERIOD;
        let rem = tail % LINE_PERIOD;
        let mut in_end = tail;
        let mut out_pos = 0;
        for _ in 0..units {
            self.reflow_line(in_end, out_pos, phase, body.offset)?;
            in_end -= LINE_PERIOD;
            out_pos += LINE_PERIOD;
        }

        // Leading partial line: pure symbols, no break expected.
        for i in 0..rem {
            let b = self.inbuf[rem - 1 - i];
            if b == b'\n' {
                return Err(RevflowError::MalformedBody {
                    offset: body.offset + (rem - 1 - i) as u64,
                    msg: "line break inside the leading partial line".to_string(),
                });
            }
            self.outbuf[out_pos + i] = COMPLEMENT[b as usize];
        }

        sink.write_all(&self.outbuf[..tail])?;
        sink.write_all(b"\n")?;
        Ok(())
    }

    /// Transform one line period: 61 input bytes ending at `in_end` become
    /// `DEST_WIDTH` symbols plus a line break at `out_pos`.
    fn reflow_line(&mut self, in_end: usize, out_pos: usize, phase: usize, base: u64) -> Result<()> {
        let lead_pairs = (SOURCE_WIDTH - phase) / 2;
        let mut ip = in_end;
        let mut op = out_pos;

        let bulk = lead_pairs * 2;
        revcomp_run(
            &self.inbuf[ip - bulk..ip],
            &mut self.outbuf[op..op + bulk],
            self.wide,
        );
        ip -= bulk;
        op += bulk;

        if phase % 2 == 1 {
            // The break splits a pair: one symbol on each side of it.
            self.outbuf[op] = COMPLEMENT[self.inbuf[ip - 1] as usize];
            op += 1;
            ip -= 1;
            self.expect_line_break(ip - 1, base)?;
            ip -= 1;
            self.outbuf[op] = COMPLEMENT[self.inbuf[ip - 1] as usize];
            op += 1;
            ip -= 1;
            let rest = (SOURCE_WIDTH / 2 - 1 - lead_pairs) * 2;
            revcomp_run(
                &self.inbuf[ip - rest..ip],
                &mut self.outbuf[op..op + rest],
                self.wide,
            );
            op += rest;
        } else {
            self.expect_line_break(ip - 1, base)?;
            ip -= 1;
            let rest = (SOURCE_WIDTH / 2 - lead_pairs) * 2;
            revcomp_run(
                &self.inbuf[ip - rest..ip],
                &mut self.outbuf[op..op + rest],
                self.wide,
            );
            op += rest;
        }

        self.outbuf[op] = b'\n';
        Ok(())
    }

    fn expect_line_break(&self, idx: usize, base: u64) -> Result<()> {
        if self.inbuf[idx] != b'\n' {
            return Err(RevflowError::MalformedBody {
                offset: base + idx as u64,
                msg: format!(
                    "expected a line break, found byte {:#04x}; input is not wrapped at {} columns",
                    self.inbuf[idx], SOURCE_WIDTH
                ),
            });
        }
        Ok(())
    }
}

impl Default for ReflowEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::complement::complement_base;

    /// Wrap symbols at SOURCE_WIDTH columns without a trailing break.
    fn wrap(symbols: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        for (i, chunk) in symbols.chunks(SOURCE_WIDTH).enumerate() {
            if i > 0 {
                body.push(b'\n');
            }
            body.extend_from_slice(chunk);
        }
        body
    }

    /// Reference output: naive reverse complement, re-wrapped.
    fn reference(symbols: &[u8]) -> Vec<u8> {
        let rc: Vec<u8> = symbols.iter().rev().map(|&b| complement_base(b)).collect();
        let mut out = Vec::new();
        for chunk in rc.chunks(DEST_WIDTH) {
            out.extend_from_slice(chunk);
            out.push(b'\n');
        }
        if rc.is_empty() {
            out.push(b'\n');
        }
        out
    }

    fn run_engine(body: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut engine = ReflowEngine::new();
        engine.emit_reverse_complement(
            body,
            ByteRange {
                offset: 0,
                len: body.len() as u64,
            },
            &mut out,
        )?;
        Ok(out)
    }

    #[test]
    fn test_empty_body_emits_one_line_break() {
        assert_eq!(run_engine(b"").unwrap(), b"\n");
    }

    #[test]
    fn test_single_short_line() {
        assert_eq!(run_engine(b"ACGT").unwrap(), b"ACGT\n");
        assert_eq!(run_engine(b"ACGTT").unwrap(), b"AACGT\n");
    }

    #[test]
    fn test_two_full_lines() {
        let symbols: Vec<u8> = b"ACGT".iter().copied().cycle().take(120).collect();
        let body = wrap(&symbols);
        assert_eq!(run_engine(&body).unwrap(), reference(&symbols));
    }

    #[test]
    fn test_full_line_plus_remainder_exercises_odd_phase() {
        // 60 + 7 symbols: phase = 60 - 7 = 53, odd, so the scalar split
        // around the break is taken for every unit.
        let symbols: Vec<u8> = b"ACGTMRWSYKVHDBN".iter().copied().cycle().take(67).collect();
        let body = wrap(&symbols);
        assert_eq!(run_engine(&body).unwrap(), reference(&symbols));
    }

    #[test]
    fn test_even_phase() {
        let symbols: Vec<u8> = b"GATTACA".iter().copied().cycle().take(120 + 6).collect();
        let body = wrap(&symbols);
        assert_eq!(run_engine(&body).unwrap(), reference(&symbols));
    }

    #[test]
    fn test_body_spanning_multiple_blocks() {
        // Larger than one 61 KiB block so the block loop runs.
        let n = SOURCE_WIDTH * (BLOCK_LINES + 37) + 11;
        let symbols: Vec<u8> = b"ACGTN".iter().copied().cycle().take(n).collect();
        let body = wrap(&symbols);
        assert_eq!(run_engine(&body).unwrap(), reference(&symbols));
    }

    #[test]
    fn test_unknown_symbol_maps_to_sentinel_at_mirrored_position() {
        let mut symbols = vec![b'A'; 10];
        symbols[2] = b'7';
        let out = run_engine(&wrap(&symbols)).unwrap();
        // Position 2 from the head mirrors to position 2 from the tail.
        assert_eq!(out[10 - 1 - 2], crate::operations::complement::SENTINEL);
        assert_eq!(out, reference(&symbols));
    }

    #[test]
    fn test_miswrapped_input_is_rejected() {
        // Wrapped at 50 columns instead of 60.
        let symbols = vec![b'A'; 150];
        let mut body = Vec::new();
        for (i, chunk) in symbols.chunks(50).enumerate() {
            if i > 0 {
                body.push(b'\n');
            }
            body.extend_from_slice(chunk);
        }
        match run_engine(&body) {
            Err(RevflowError::MalformedBody { .. }) => {}
            other => panic!("expected MalformedBody, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_break_inside_leading_partial_line_is_rejected() {
        // 60-wrapped except for a stray break near the head.
        let mut symbols = vec![b'C'; 130];
        symbols[1] = b'\n';
        let body = wrap(&symbols);
        assert!(matches!(
            run_engine(&body),
            Err(RevflowError::MalformedBody { .. })
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Lengths chosen to cross unit, phase-parity, and block
            // boundaries.
            #[test]
            fn engine_matches_reference(
                symbols in proptest::collection::vec(
                    proptest::sample::select(b"ACGTUMRWSYKVHDBNacgtn0".to_vec()),
                    0..700,
                )
            ) {
                let body = wrap(&symbols);
                prop_assert_eq!(run_engine(&body).unwrap(), reference(&symbols));
            }

            #[test]
            fn length_conservation(len in 0usize..500) {
                let symbols = vec![b'G'; len];
                let body = wrap(&symbols);
                let out = run_engine(&body).unwrap();
                let breaks = out.iter().filter(|&&b| b == b'\n').count();
                prop_assert_eq!(out.len() - breaks, len);
                let expected_breaks = if len == 0 { 1 } else { len.div_ceil(DEST_WIDTH) };
                prop_assert_eq!(breaks, expected_breaks);
            }

            #[test]
            fn line_width_invariant(len in 1usize..400) {
                let symbols = vec![b'T'; len];
                let out = run_engine(&wrap(&symbols)).unwrap();
                let lines: Vec<&[u8]> = out.split(|&b| b == b'\n').collect();
                // split leaves one empty slice after the final break
                prop_assert_eq!(lines.last().unwrap().len(), 0);
                let lines = &lines[..lines.len() - 1];
                for line in &lines[..lines.len() - 1] {
                    prop_assert_eq!(line.len(), DEST_WIDTH);
                }
                let last = lines.last().unwrap().len();
                let want = if len % DEST_WIDTH == 0 { DEST_WIDTH } else { len % DEST_WIDTH };
                prop_assert_eq!(last, want);
            }
        }
    }
}
