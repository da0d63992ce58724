//! Cache backends for buffering untrusted input.

use std::io::{self, Cursor, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Write-once, read-many byte store.
///
/// A cache accepts one full write pass and can then produce any number of
/// independent fresh readers, each yielding the exact bytes written, in
/// order, without interfering with each other. Release it exactly once via
/// [`Cache::close`].
pub trait Cache: Write {
    /// Open a fresh reader over everything written so far.
    fn reader(&self) -> io::Result<Box<dyn Read + '_>>;

    /// Release any resources held by the cache.
    fn close(self: Box<Self>) -> io::Result<()>;
}

/// Cache backed by an owned byte buffer.
#[derive(Debug, Default)]
pub struct MemoryCache {
    buf: Vec<u8>,
}

impl MemoryCache {
    /// Create an empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache reusing an existing buffer's capacity.
    #[must_use]
    pub fn with_buffer(mut buf: Vec<u8>) -> Self {
        buf.clear();
        Self { buf }
    }
}

impl Write for MemoryCache {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Cache for MemoryCache {
    fn reader(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.buf.as_slice())))
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}

/// Cache backed by a temporary file.
///
/// Readers reopen the file independently, each starting at the beginning.
/// The file is removed when the cache is released.
#[derive(Debug)]
pub struct FileCache {
    file: NamedTempFile,
}

impl FileCache {
    /// Create a cache in the system temp directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            file: NamedTempFile::new()?,
        })
    }

    /// Create a cache in `dir`.
    pub fn in_dir(dir: &Path) -> io::Result<Self> {
        Ok(Self {
            file: NamedTempFile::new_in(dir)?,
        })
    }
}

impl Write for FileCache {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.file.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Cache for FileCache {
    fn reader(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(self.file.reopen()?))
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        self.file.close()
    }
}
