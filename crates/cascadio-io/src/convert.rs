//! End-to-end conversion pipeline.
//!
//! Load and tessellate through the kernel, export the baseline GLB, then
//! enrich it with BREP and material metadata. Enrichment is best-effort:
//! structural problems during injection fall back to the un-enriched
//! baseline instead of aborting the conversion, while load and export
//! failures are fatal.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::warn;
use thiserror::Error;

use cascadio_core::document::{LoadOptions, LoadResult};
use cascadio_core::face::FaceSpan;
use cascadio_core::material::extract_materials;
use cascadio_core::surface::SurfaceType;
use cascadio_core::units::detect_unit_scale;

use crate::inject::{inject, Injection};
use crate::traits::{CadReader, ExportError, ExportHooks, ExportOptions, GlbExporter, LoadError};

/// Supported boundary-representation input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Step,
    Iges,
}

impl FileType {
    /// Parse a format name, accepting the usual extension aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "step" | "stp" => Some(FileType::Step),
            "iges" | "igs" => Some(FileType::Iges),
            _ => None,
        }
    }
}

/// Full parameter set for one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Input format. Readers are format-specific; callers use this to pick
    /// the matching [`CadReader`] implementation.
    pub file_type: FileType,
    /// Linear deflection tolerance for meshing.
    pub tol_linear: f64,
    /// Angular deflection tolerance for meshing, radians.
    pub tol_angular: f64,
    /// Whether `tol_linear` is relative to edge length.
    pub tol_relative: bool,
    /// Produce one mesh primitive per part.
    pub merge_primitives: bool,
    /// Parallelize meshing and export inside the kernel.
    pub use_parallel: bool,
    /// Attach the `TM_brep_faces` extension.
    pub include_brep: bool,
    /// Surface types to keep in the extension; empty keeps all.
    pub allowed_brep_types: HashSet<SurfaceType>,
    /// Attach material metadata to mesh extras.
    pub include_materials: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            file_type: FileType::Step,
            tol_linear: 0.01,
            tol_angular: 0.5,
            tol_relative: false,
            merge_primitives: true,
            use_parallel: true,
            include_brep: false,
            allowed_brep_types: HashSet::new(),
            include_materials: false,
        }
    }
}

/// Fatal conversion errors. Injection failures are not represented here —
/// they degrade to the baseline GLB with a warning.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("load failed: {0}")]
    Load(#[from] LoadError),

    #[error("baseline export failed: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Convert BREP input bytes into GLB bytes.
///
/// When `merge_primitives` is off, per-shape-to-per-mesh index correlation
/// is not guaranteed, so BREP and material metadata are silently downgraded
/// to no-ops with a warning rather than failing the conversion.
pub fn convert<R, E>(
    reader: &R,
    exporter: &E,
    input: &[u8],
    options: &ConvertOptions,
) -> Result<Vec<u8>>
where
    R: CadReader,
    E: GlbExporter,
{
    let load_options = LoadOptions {
        tol_linear: options.tol_linear,
        tol_angular: options.tol_angular,
        tol_relative: options.tol_relative,
        use_parallel: options.use_parallel,
        use_colors: true,
    };
    let LoadResult { document, shapes } = reader.load_bytes(input, &load_options)?;

    let metadata_requested = options.include_brep || options.include_materials;
    let (include_brep, include_materials) = if metadata_requested && !options.merge_primitives {
        warn!("BREP/material metadata requires merge_primitives; producing a plain GLB");
        (false, false)
    } else {
        (options.include_brep, options.include_materials)
    };

    // Metadata is read out of the document here, before the kernel is free
    // to release it after export.
    let unit_scale = detect_unit_scale(&document, &shapes);
    let materials = if include_materials {
        extract_materials(&document)
    } else {
        Vec::new()
    };

    let export_options = ExportOptions {
        merge_primitives: options.merge_primitives,
        use_parallel: options.use_parallel,
    };
    let mut spans: Vec<FaceSpan> = Vec::new();
    let baseline = {
        let mut hooks = ExportHooks::new();
        if include_brep {
            hooks.face_data = Some(Box::new(|span| spans.push(span)));
        }
        exporter.export(&document, &shapes, &export_options, &mut hooks)?
    };

    if !include_brep && !include_materials {
        return Ok(baseline);
    }

    let injection = Injection {
        spans: &spans,
        allowed_types: &options.allowed_brep_types,
        materials: include_materials.then_some(materials.as_slice()),
        unit_scale,
    };
    match inject(&baseline, &injection) {
        Ok(enriched) => Ok(enriched),
        Err(err) => {
            // best-effort: the baseline GLB stays valid and usable
            warn!("metadata injection failed ({err}); returning baseline GLB");
            Ok(baseline)
        }
    }
}

/// File-based variant of [`convert`].
pub fn convert_file<R, E>(
    reader: &R,
    exporter: &E,
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<()>
where
    R: CadReader,
    E: GlbExporter,
{
    let data = fs::read(input)?;
    let glb = convert(reader, exporter, &data, options)?;
    fs::write(output, glb)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_aliases() {
        assert_eq!(FileType::from_name("step"), Some(FileType::Step));
        assert_eq!(FileType::from_name("STP"), Some(FileType::Step));
        assert_eq!(FileType::from_name("iges"), Some(FileType::Iges));
        assert_eq!(FileType::from_name("igs"), Some(FileType::Iges));
        assert_eq!(FileType::from_name("brep"), None);
    }

    #[test]
    fn test_convert_options_defaults() {
        let options = ConvertOptions::default();
        assert_eq!(options.file_type, FileType::Step);
        assert!(options.merge_primitives);
        assert!(!options.include_brep);
        assert!(!options.include_materials);
        assert!(options.allowed_brep_types.is_empty());
    }
}
