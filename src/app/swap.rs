//! Swap files: crash copies of modified buffers.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::buffer::Buffer;

/// Errors while reading or writing a swap file.
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("swap file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("swap file encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// On-disk contents of one swap file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub name: String,
    pub lines: Vec<String>,
    pub pid: u32,
    /// Seconds since epoch.
    pub saved_at: u64,
}

/// Directory of swap files.
#[derive(Debug, Clone)]
pub struct SwapStore {
    directory: PathBuf,
}

impl SwapStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Swap file path for a buffer named `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let flat: String = name
            .chars()
            .map(|c| if c == '/' || c == '\\' { '%' } else { c })
            .collect();
        self.directory.join(format!("{}.swp", flat))
    }

    /// Write `buffer` to its swap file and sync it to disk.
    pub fn write(&self, buffer: &Buffer) -> Result<PathBuf, SwapError> {
        fs::create_dir_all(&self.directory)?;

        let record = SwapRecord {
            name: buffer.name().to_string(),
            lines: buffer.lines().to_vec(),
            pid: std::process::id(),
            saved_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        };

        let path = self.path_for(buffer.name());
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(&mut writer, &record)?;
        writer.flush()?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        Ok(path)
    }

    /// Read the swap file for a buffer named `name`.
    pub fn read(&self, name: &str) -> Result<SwapRecord, SwapError> {
        let reader = BufReader::new(File::open(self.path_for(name))?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Delete the swap file for `name`, if any.
    pub fn remove(&self, name: &str) {
        let path = self.path_for(name);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove swap file"),
        }
    }

    /// Write every modified buffer. Returns how many were written.
    ///
    /// Failures are logged and skipped so one bad buffer does not stop
    /// the rest from being saved.
    pub fn sync_modified<'a>(&self, buffers: impl IntoIterator<Item = &'a Buffer>) -> usize {
        let mut written = 0;
        for buffer in buffers.into_iter().filter(|b| b.is_modified()) {
            match self.write(buffer) {
                Ok(path) => {
                    written += 1;
                    tracing::debug!(buffer = buffer.name(), path = %path.display(), "Swap file written");
                }
                Err(e) => {
                    tracing::error!(buffer = buffer.name(), error = %e, "Failed to write swap file");
                }
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = SwapStore::new(dir.path().join("swap"));

        let mut buffer = Buffer::open(&dir.path().join("a.txt")).unwrap();
        buffer.append("hello");
        store.write(&buffer).unwrap();

        let record = store.read(buffer.name()).unwrap();
        assert_eq!(record.lines, vec!["hello".to_string()]);
        assert_eq!(record.pid, std::process::id());
    }

    #[test]
    fn test_sync_skips_unmodified() {
        let dir = tempfile::tempdir().unwrap();
        let store = SwapStore::new(dir.path());

        let clean = Buffer::open(&dir.path().join("clean.txt")).unwrap();
        let mut dirty = Buffer::open(&dir.path().join("dirty.txt")).unwrap();
        dirty.append("unsaved");

        assert_eq!(store.sync_modified([&clean, &dirty]), 1);
        assert!(store.path_for(dirty.name()).exists());
        assert!(!store.path_for(clean.name()).exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_reports_full_device() {
        let dir = tempfile::tempdir().unwrap();
        let store = SwapStore::new(dir.path().join("swap"));
        fs::create_dir_all(store.directory()).unwrap();

        let mut buffer = Buffer::open(&dir.path().join("full.txt")).unwrap();
        buffer.append("lost unless reported");
        std::os::unix::fs::symlink("/dev/full", store.path_for(buffer.name())).unwrap();

        assert!(store.write(&buffer).is_err());
        assert_eq!(store.sync_modified([&buffer]), 0);
    }

    #[test]
    fn test_path_is_flat() {
        let store = SwapStore::new("/swap");
        assert_eq!(store.path_for("/home/u/a.txt"), Path::new("/swap/%home%u%a.txt.swp"));
    }

    #[test]
    fn test_remove_missing_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        SwapStore::new(dir.path()).remove("nothing");
    }
}
