//! Scoped scratch files for path-only kernel APIs.
//!
//! Some kernel entry points only accept filesystem paths. [`ScratchFile`]
//! gives such calls a short-lived backing file: it prefers a memory-backed
//! directory when a one-time probe says one is usable, falls back to the
//! system temp dir otherwise, and removes the file on drop on every exit
//! path.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::debug;
use tempfile::{Builder, NamedTempFile};

/// Memory-backed scratch directory, probed once per process.
fn fast_scratch_dir() -> Option<&'static Path> {
    static PROBE: OnceLock<Option<PathBuf>> = OnceLock::new();
    PROBE
        .get_or_init(|| {
            let candidate = Path::new("/dev/shm");
            match Builder::new().prefix("cascadio-probe").tempfile_in(candidate) {
                Ok(_) => Some(candidate.to_path_buf()),
                Err(_) => {
                    debug!("no memory-backed scratch dir; using system temp dir");
                    None
                }
            }
        })
        .as_deref()
}

/// A temporary file that exists exactly as long as its handle.
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Create an empty scratch file with the given extension hint
    /// (e.g. ".glb", ".igs").
    pub fn new(extension: &str) -> io::Result<Self> {
        let mut builder = Builder::new();
        builder.prefix("cascadio-").suffix(extension);
        let file = match fast_scratch_dir() {
            Some(dir) => builder.tempfile_in(dir).or_else(|_| builder.tempfile())?,
            None => builder.tempfile()?,
        };
        Ok(Self { file })
    }

    /// Create a scratch file pre-filled with `data`.
    pub fn with_contents(extension: &str, data: &[u8]) -> io::Result<Self> {
        let mut scratch = Self::new(extension)?;
        scratch.file.write_all(data)?;
        scratch.file.flush()?;
        Ok(scratch)
    }

    /// Path to hand to path-only APIs.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read the full current contents.
    pub fn read_all(&self) -> io::Result<Vec<u8>> {
        std::fs::read(self.file.path())
    }

    /// Keep the contents by moving the file to `dest` instead of deleting it.
    pub fn persist(self, dest: &Path) -> io::Result<()> {
        // a rename cannot cross filesystems, which a memory-backed scratch
        // dir usually would; fall back to copy + drop-delete
        match self.file.persist(dest) {
            Ok(_) => Ok(()),
            Err(err) => {
                std::fs::copy(err.file.path(), dest)?;
                Ok(())
            }
        }
    }
}
