//! In-memory text buffers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name shown for a buffer with no backing file.
pub const NO_NAME: &str = "[No Name]";

/// One document being edited.
#[derive(Debug, Clone)]
pub struct Buffer {
    name: String,
    path: Option<PathBuf>,
    lines: Vec<String>,
    modified: bool,
}

impl Buffer {
    /// An unnamed buffer with no file behind it.
    pub fn scratch() -> Self {
        Self {
            name: NO_NAME.to_string(),
            path: None,
            lines: Vec::new(),
            modified: false,
        }
    }

    /// Open `path`. A missing file gives an empty, unmodified buffer.
    pub fn open(path: &Path) -> io::Result<Self> {
        let lines = match fs::read_to_string(path) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            name: path.display().to_string(),
            path: Some(path.to_path_buf()),
            lines,
            modified: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn append(&mut self, line: &str) {
        self.lines.push(line.to_string());
        self.modified = true;
    }

    /// Write the buffer to its file and clear the modified flag.
    pub fn write(&mut self) -> io::Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no file name"))?;

        let mut content = self.lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(path, content)?;
        self.modified = false;
        Ok(())
    }
}
