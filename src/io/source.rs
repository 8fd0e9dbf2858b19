//! Positioned-read source backends
//!
//! The engine traverses its input tail to head, so every backend exposes
//! random-offset reads rather than a shared sequential cursor. Local files
//! use positioned reads below [`MMAP_THRESHOLD`] and a memory mapping with
//! a sequential-access hint at or above it. Non-seekable inputs (piped
//! stdin, gzip streams) are spooled into an anonymous temp file first,
//! through a bounded copy buffer.

use crate::error::Result;
use flate2::read::GzDecoder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Memory-mapped file threshold (50 MB)
///
/// Below this, mapping overhead outweighs the win and plain positioned
/// reads are used instead.
pub const MMAP_THRESHOLD: u64 = 50 * 1024 * 1024;

/// A read-only byte store of known length supporting positioned reads.
pub trait Source {
    /// Total length in bytes.
    fn len(&self) -> u64;

    /// True when the source holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `buf` from `offset`. Fails if the range extends past the end.
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> Result<()>;
}

/// In-memory source, used by tests and doc examples.
impl Source for [u8] {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> Result<()> {
        let start = offset as usize;
        let end = start.checked_add(buf.len()).filter(|&e| e <= <[u8]>::len(self));
        match end {
            Some(end) => {
                buf.copy_from_slice(&self[start..end]);
                Ok(())
            }
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read past the end of an in-memory source",
            )
            .into()),
        }
    }
}

/// File-backed source using positioned reads.
pub struct FileSource {
    file: File,
    len: u64,
}

impl FileSource {
    /// Open a file for positioned reads.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_file(File::open(path)?)
    }

    /// Wrap an already-open file handle.
    pub fn from_file(file: File) -> Result<Self> {
        let len = file.metadata()?.len();
        Ok(Self { file, len })
    }
}

impl Source for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            self.file.read_exact_at(buf, offset)?;
        }
        #[cfg(not(unix))]
        {
            use std::io::{Read, Seek, SeekFrom};
            let mut file = &self.file;
            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(buf)?;
        }
        Ok(())
    }
}

/// Memory-mapped source for large files.
pub struct MmapSource {
    map: Mmap,
}

impl MmapSource {
    /// Map a file read-only with a sequential-access hint.
    pub fn from_file(file: &File) -> Result<Self> {
        // SAFETY: the mapping is read-only and the file is never mutated
        // by this process while mapped.
        let map = unsafe { Mmap::map(file)? };
        #[cfg(unix)]
        map.advise(memmap2::Advice::Sequential)?;
        Ok(Self { map })
    }
}

impl Source for MmapSource {
    fn len(&self) -> u64 {
        self.map.len() as u64
    }

    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> Result<()> {
        Source::read_exact_at(&self.map[..], buf, offset)
    }
}

/// Open a local file, choosing the backend by size.
///
/// Files at or above [`MMAP_THRESHOLD`] are memory-mapped; smaller ones
/// use plain positioned reads.
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<Box<dyn Source>> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    if len >= MMAP_THRESHOLD {
        Ok(Box::new(MmapSource::from_file(&file)?))
    } else {
        Ok(Box::new(FileSource::from_file(file)?))
    }
}

/// Resolve the input argument: a path (gzip-spooled when it ends in
/// `.gz`), or stdin when absent.
pub fn open_input(path: Option<&str>) -> Result<Box<dyn Source>> {
    match path {
        Some(p) if p.ends_with(".gz") => spool_gzip(p),
        Some(p) => open_source(p),
        None => stdin_source(),
    }
}

/// Source for standard input.
///
/// A redirected regular file is used in place, seekable as-is; a pipe is
/// spooled to a temp file to regain positioned reads.
pub fn stdin_source() -> Result<Box<dyn Source>> {
    #[cfg(unix)]
    {
        if let Ok(meta) = std::fs::metadata("/dev/stdin") {
            if meta.is_file() {
                return open_source("/dev/stdin");
            }
        }
    }
    spool_stream(io::stdin().lock())
}

/// Decompress a gzip file into a spooled seekable source.
pub fn spool_gzip<P: AsRef<Path>>(path: P) -> Result<Box<dyn Source>> {
    let file = File::open(path)?;
    spool_stream(GzDecoder::new(io::BufReader::new(file)))
}

/// Copy a non-seekable stream into an unlinked temp file.
fn spool_stream<R: Read>(mut reader: R) -> Result<Box<dyn Source>> {
    let mut spool = tempfile::tempfile()?;
    io::copy(&mut reader, &mut spool)?;
    Ok(Box::new(FileSource::from_file(spool)?))
}
