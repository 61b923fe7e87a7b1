//! Cascadio I/O: GLB container handling and the conversion pipeline.
//!
//! This crate holds everything between the external CAD kernel and the
//! final GLB bytes:
//!
//! | Module | Responsibility |
//! |-----------|---------------------------------------------------------|
//! | [`glb`] | Parse/serialize the GLB binary container |
//! | [`inject`] | Rewrite a GLB with the `TM_brep_faces` extension |
//! | [`traits`] | Seams to the external CAD kernel (load, export) |
//! | [`convert`] | The end-to-end conversion pipeline |
//! | [`scratch`] | Scoped scratch files for path-only kernel APIs |
//!
//! # Example
//!
//! ```ignore
//! use cascadio_io::{convert, ConvertOptions};
//!
//! let mut options = ConvertOptions::default();
//! options.include_brep = true;
//! options.include_materials = true;
//! let glb = convert(&reader, &exporter, &step_bytes, &options)?;
//! ```

pub mod convert;
pub mod glb;
pub mod inject;
pub mod scratch;
pub mod traits;

// Re-export main types for convenience
pub use convert::{convert, convert_file, ConvertError, ConvertOptions, FileType};
pub use glb::{Glb, GlbError};
pub use inject::{inject, InjectError, Injection, TM_BREP_FACES};
pub use scratch::ScratchFile;
pub use traits::{CadReader, ExportError, ExportHooks, ExportOptions, GlbExporter, LoadError};
