//! Cascadio Core Library
//!
//! Data model for converting boundary-representation CAD models into
//! triangulated GLB with analytic surface metadata: the closed set of
//! quadric surfaces, face classification into wire-schema records, length
//! unit detection, and material extraction.
//!
//! The binary container handling and the conversion pipeline live in the
//! `cascadio-io` crate; the external CAD kernel is reached through the
//! trait seams defined there.

// =============================================================================
// Modules
// =============================================================================

pub mod classify;
pub mod document;
pub mod face;
pub mod material;
pub mod surface;
pub mod units;

// =============================================================================
// Re-exports
// =============================================================================

pub use classify::{classify, classify_all, FaceRecord};
pub use document::{Document, LoadOptions, LoadResult, Shape};
pub use face::{Face, FaceSpan, UvBounds};
pub use material::{
    extract_materials, CommonMaterial, MaterialRecord, PbrMaterial, PhysicalMaterial,
    VisualMaterial,
};
pub use surface::{Frame, Surface, SurfaceType};
pub use units::{detect_unit_scale, Aabb, MILLIMETERS_TO_METERS};
