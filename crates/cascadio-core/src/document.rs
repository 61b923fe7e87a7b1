//! In-memory model of a loaded CAD document.
//!
//! The actual file-format readers, healing, and tessellation live in an
//! external CAD kernel; what crosses the boundary into this library is the
//! distilled result modeled here: a document with its stored metadata and
//! material tables, plus the top-level shapes with their faces and bounds.
//! The document is exclusively owned by one conversion and released after
//! export and metadata extraction complete.

use serde::{Deserialize, Serialize};

use crate::face::Face;
use crate::material::{PhysicalMaterial, VisualMaterial};
use crate::units::Aabb;

/// A loaded CAD assembly document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: Option<String>,
    /// Scale factor from the document's native length unit to meters, when
    /// the source file stored one. Authoritative over any heuristic.
    pub length_unit: Option<f64>,
    pub physical_materials: Vec<PhysicalMaterial>,
    pub visual_materials: Vec<VisualMaterial>,
}

/// One top-level solid or compound extracted from a document.
///
/// Faces are listed in topological traversal order; `Face::index` matches
/// each face's position here. The shape is tessellated in place by the
/// kernel before export; `bounds` covers the tessellated geometry in the
/// document's native unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub name: Option<String>,
    pub faces: Vec<Face>,
    pub bounds: Option<Aabb>,
}

/// Result of loading and tessellating one input model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadResult {
    pub document: Document,
    pub shapes: Vec<Shape>,
}

/// Tessellation and import parameters forwarded to the CAD kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Linear deflection tolerance for meshing.
    pub tol_linear: f64,
    /// Angular deflection tolerance for meshing, radians.
    pub tol_angular: f64,
    /// Whether `tol_linear` is relative to edge length.
    pub tol_relative: bool,
    /// Parallelize per-face meshing inside the kernel.
    pub use_parallel: bool,
    /// Import color attributes.
    pub use_colors: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            tol_linear: 0.01,
            tol_angular: 0.5,
            tol_relative: false,
            use_parallel: true,
            use_colors: true,
        }
    }
}
