//! Seams to the external CAD kernel.
//!
//! File-format parsing, solid healing, tessellation, and baseline GLB
//! export are all provided by an external CAD kernel. These traits pin down
//! exactly what the conversion pipeline needs from it, so the pipeline can
//! be driven by a real kernel binding or by a synthetic one in tests.
//!
//! ```ignore
//! use cascadio_io::{CadReader, GlbExporter, convert, ConvertOptions};
//!
//! fn run<R: CadReader, E: GlbExporter>(reader: &R, exporter: &E, data: &[u8]) {
//!     let glb = convert(reader, exporter, data, &ConvertOptions::default());
//! }
//! ```

use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use cascadio_core::document::{Document, LoadOptions, LoadResult, Shape};
use cascadio_core::face::FaceSpan;

/// Errors from the kernel's load/tessellate step. Always fatal to the
/// overall conversion; no partial output is produced.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read input: {0}")]
    Malformed(String),
}

/// Errors from the kernel's baseline GLB export step. Fatal: without a
/// baseline GLB there is nothing to enrich or return.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("export failed: {0}")]
    Failed(String),
}

/// Options forwarded to the baseline exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Merge all faces of a part into a single mesh primitive.
    pub merge_primitives: bool,
    /// Parallelize export work inside the kernel.
    pub use_parallel: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            merge_primitives: true,
            use_parallel: true,
        }
    }
}

/// Callbacks an exporter invokes while assembling the baseline GLB.
///
/// `face_data` fires once per face as it is flattened into triangles, in no
/// particular order — consumers index by `FaceSpan::face_index`, never by
/// arrival sequence. `json_rewrite` sees the fully formed JSON text once,
/// right before final container assembly, together with the binary payload
/// length at that point. `binary_append` runs after `json_rewrite` and may
/// write trailing bytes onto the binary payload; it is given the current
/// payload length and returns the number of bytes written.
#[derive(Default)]
pub struct ExportHooks<'a> {
    pub face_data: Option<Box<dyn FnMut(FaceSpan) + 'a>>,
    pub json_rewrite: Option<Box<dyn FnMut(String, usize) -> String + 'a>>,
    pub binary_append: Option<Box<dyn FnMut(&mut dyn Write, usize) -> io::Result<usize> + 'a>>,
}

impl<'a> ExportHooks<'a> {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Loads and tessellates CAD input into the in-memory document model.
pub trait CadReader {
    /// Load a model from an in-memory byte buffer.
    fn load_bytes(&self, data: &[u8], options: &LoadOptions) -> Result<LoadResult, LoadError>;

    /// Load a model from a file on disk.
    ///
    /// Default implementation reads the file and defers to
    /// [`CadReader::load_bytes`].
    fn load_file(&self, path: &Path, options: &LoadOptions) -> Result<LoadResult, LoadError> {
        let data = std::fs::read(path)?;
        self.load_bytes(&data, options)
    }
}

/// Produces the baseline GLB (vertex buffers, materials, scene graph) for a
/// tessellated document.
pub trait GlbExporter {
    fn export(
        &self,
        document: &Document,
        shapes: &[Shape],
        options: &ExportOptions,
        hooks: &mut ExportHooks<'_>,
    ) -> Result<Vec<u8>, ExportError>;
}
