//! Output sinks
//!
//! Sequential, append-only destinations for the transform: stdout, a
//! file, or a gzip-compressed file chosen by the `.gz` extension, all
//! buffered. [`OutputSink::finish`] must be called to flush buffers and
//! close the compression stream.

use crate::error::Result;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Buffered output destination.
pub enum OutputSink {
    /// Standard output
    Stdout(BufWriter<io::Stdout>),
    /// Plain file
    File(BufWriter<File>),
    /// Gzip-compressed file
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputSink {
    /// Create a sink: stdout when `path` is absent, otherwise a file,
    /// gzip-compressed when the path ends in `.gz`.
    pub fn create(path: Option<&str>) -> Result<Self> {
        match path {
            None => Ok(OutputSink::Stdout(BufWriter::new(io::stdout()))),
            Some(p) if p.ends_with(".gz") => {
                let file = File::create(p)?;
                Ok(OutputSink::Gzip(GzEncoder::new(
                    BufWriter::new(file),
                    Compression::default(),
                )))
            }
            Some(p) => Ok(OutputSink::File(BufWriter::new(File::create(p)?))),
        }
    }

    /// Flush all buffers and close the compression stream.
    ///
    /// Must be called once writing is done; dropping a gzip sink without
    /// finishing would lose the error reporting for its trailer.
    pub fn finish(self) -> Result<()> {
        match self {
            OutputSink::Stdout(mut w) => w.flush()?,
            OutputSink::File(mut w) => w.flush()?,
            OutputSink::Gzip(enc) => {
                let mut inner = enc.finish()?;
                inner.flush()?;
            }
        }
        Ok(())
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputSink::Stdout(w) => w.write(buf),
            OutputSink::File(w) => w.write(buf),
            OutputSink::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputSink::Stdout(w) => w.flush(),
            OutputSink::File(w) => w.flush(),
            OutputSink::Gzip(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_file_sink_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let path_str = path.to_str().unwrap();

        let mut sink = OutputSink::create(Some(path_str)).unwrap();
        sink.write_all(b"ACGT\n").unwrap();
        sink.finish().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"ACGT\n");
    }

    #[test]
    fn test_gzip_sink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt.gz");
        let path_str = path.to_str().unwrap();

        let mut sink = OutputSink::create(Some(path_str)).unwrap();
        sink.write_all(b">r\nTTTT\n").unwrap();
        sink.finish().unwrap();

        let mut decoder = flate2::read::GzDecoder::new(File::open(&path).unwrap());
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, b">r\nTTTT\n");
    }
}
