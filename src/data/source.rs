//! Backing sources for the dataset.
//!
//! A [`DataSource`] hands the loader the raw delimited bytes. Files are validated before they
//! are opened; small files are read into memory and large ones are memory-mapped so the CSV
//! reader can stream over them without a second copy.

use crate::error::{CordexError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Raw bytes produced by a [`DataSource`].
#[derive(Debug)]
pub enum SourceBytes {
    InMemory(Vec<u8>),
    Shared(Arc<[u8]>),
    MemoryMapped(Mmap),
}

impl Deref for SourceBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            SourceBytes::InMemory(bytes) => bytes,
            SourceBytes::Shared(bytes) => bytes,
            SourceBytes::MemoryMapped(mmap) => mmap,
        }
    }
}

/// Where a dataset comes from.
///
/// Implementations report every failure as [`CordexError::DataUnavailable`].
pub trait DataSource: Send + Sync {
    /// Human-readable origin used in logs and error messages
    fn describe(&self) -> String;

    /// Produce the full source contents
    fn open(&self) -> Result<SourceBytes>;
}

/// A delimited file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Files smaller than this are read into memory, larger ones are memory-mapped.
    const MEMORY_THRESHOLD: u64 = 50 * 1024 * 1024; // 50MB

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, reason: impl Into<String>) -> CordexError {
        CordexError::data_unavailable(self.describe(), reason)
    }
}

impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> Result<SourceBytes> {
        let file_size = validate_file_path(&self.path)?;

        let mut file = File::open(&self.path)
            .map_err(|e| self.unavailable(format!("cannot open file: {e}")))?;

        if file_size < Self::MEMORY_THRESHOLD {
            let mut content = Vec::with_capacity(file_size as usize);
            file.read_to_end(&mut content)
                .map_err(|e| self.unavailable(format!("failed to read file: {e}")))?;
            Ok(SourceBytes::InMemory(content))
        } else {
            // SAFETY: the mapping is read-only and the dataset copies every field out of it
            // during the single parse pass.
            let mmap = unsafe { Mmap::map(&file) }
                .map_err(|e| self.unavailable(format!("failed to memory map file: {e}")))?;
            Ok(SourceBytes::MemoryMapped(mmap))
        }
    }
}

/// Bytes already held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl DataSource for MemorySource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn open(&self) -> Result<SourceBytes> {
        Ok(SourceBytes::Shared(Arc::clone(&self.bytes)))
    }
}

/// Check that a path names a readable, non-empty regular file and return its size.
pub fn validate_file_path(path: &Path) -> Result<u64> {
    let origin = path.display().to_string();

    if !path.exists() {
        return Err(CordexError::data_unavailable(origin, "file does not exist"));
    }

    let metadata = std::fs::metadata(path).map_err(|e| {
        CordexError::data_unavailable(origin.clone(), format!("failed to read metadata: {e}"))
    })?;

    if !metadata.is_file() {
        return Err(CordexError::data_unavailable(origin, "path is not a file"));
    }

    if metadata.len() == 0 {
        return Err(CordexError::data_unavailable(origin, "file is empty"));
    }

    Ok(metadata.len())
}
