//! Output management module
//!
//! Buffered writers for filter-mode output and split-mode shards. Every file
//! handle is closed (and flushed) when its writer drops, on any exit path.

use crate::error::{Result, SieveError};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Default buffer size for file writing (8MB)
pub const DEFAULT_WRITE_BUFFER: usize = 8 * 1024 * 1024;

/// Output file writer with buffering
pub struct OutputWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    lines_written: u64,
    bytes_written: u64,
}

impl OutputWriter {
    /// Create (or truncate) the output file
    pub fn create(path: PathBuf, buffer_size: usize) -> Result<Self> {
        ensure_parent_dir(&path)?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| SieveError::output(&path, e))?;

        Ok(Self {
            writer: BufWriter::with_capacity(buffer_size, file),
            path,
            lines_written: 0,
            bytes_written: 0,
        })
    }

    /// Write text followed by a newline
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer
            .write_all(line.as_bytes())
            .and_then(|_| self.writer.write_all(b"\n"))
            .map_err(|e| SieveError::output(&self.path, e))?;
        self.lines_written += 1;
        self.bytes_written += line.len() as u64 + 1;
        Ok(())
    }

    /// Write a line verbatim (terminator included by the caller)
    pub fn write_raw(&mut self, line: &[u8]) -> Result<()> {
        self.writer
            .write_all(line)
            .map_err(|e| SieveError::output(&self.path, e))?;
        self.lines_written += 1;
        self.bytes_written += line.len() as u64;
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| SieveError::output(&self.path, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

/// Path of shard `index` (1-based): `{prefix}_{index}.txt`
pub fn shard_path(prefix: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(format!("_{}.txt", index));
    PathBuf::from(name)
}

/// Writes lines into sequential shards of at most `chunk_size` lines
pub struct ShardWriter {
    prefix: PathBuf,
    chunk_size: NonZeroUsize,
    buffer_size: usize,
    current: Option<OutputWriter>,
    lines_in_shard: usize,
    shards: Vec<PathBuf>,
    bytes_written: u64,
}

impl ShardWriter {
    pub fn new(prefix: PathBuf, chunk_size: NonZeroUsize, buffer_size: usize) -> Self {
        Self {
            prefix,
            chunk_size,
            buffer_size,
            current: None,
            lines_in_shard: 0,
            shards: Vec::new(),
            bytes_written: 0,
        }
    }

    /// Write one raw line, opening the next shard first when the current
    /// one is full (or none is open yet)
    pub fn write_raw(&mut self, line: &[u8]) -> Result<()> {
        let full = self.lines_in_shard == self.chunk_size.get();
        let writer = match self.current.as_mut() {
            Some(writer) if !full => writer,
            _ => self.rotate()?,
        };

        writer.write_raw(line)?;
        self.lines_in_shard += 1;
        self.bytes_written += line.len() as u64;
        Ok(())
    }

    fn rotate(&mut self) -> Result<&mut OutputWriter> {
        if let Some(mut finished) = self.current.take() {
            finished.flush()?;
            log::debug!("Closed shard {:?} ({} lines)", finished.path(), finished.lines_written());
        }

        let path = shard_path(&self.prefix, self.shards.len() + 1);
        let writer = OutputWriter::create(path.clone(), self.buffer_size)?;
        self.shards.push(path);
        self.lines_in_shard = 0;
        Ok(self.current.insert(writer))
    }

    /// Flush and close the open shard, returning all shard paths in order
    pub fn finish(mut self) -> Result<(Vec<PathBuf>, u64)> {
        if let Some(mut last) = self.current.take() {
            last.flush()?;
        }
        Ok((std::mem::take(&mut self.shards), self.bytes_written))
    }
}

/// Ensure the parent directory of an output path exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|e| SieveError::output(path, e))
        }
        _ => Ok(()),
    }
}
