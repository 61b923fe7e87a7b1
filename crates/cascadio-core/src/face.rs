//! Topological faces and their triangle-range bookkeeping.

use serde::{Deserialize, Serialize};

use crate::surface::Surface;

/// Parametric domain of a face on its underlying surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvBounds {
    pub u_min: f64,
    pub u_max: f64,
    pub v_min: f64,
    pub v_max: f64,
}

impl UvBounds {
    pub fn new(u_min: f64, u_max: f64, v_min: f64, v_max: f64) -> Self {
        Self {
            u_min,
            u_max,
            v_min,
            v_max,
        }
    }
}

/// One boundary face of a shape.
///
/// `index` is assigned by topological traversal order, zero-based per shape,
/// and must match the traversal order used when correlating triangles —
/// face/triangle mapping breaks if the two ever disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub index: u32,
    /// `None` for freeform/NURBS or degenerate faces.
    pub surface: Option<Surface>,
    pub uv: UvBounds,
}

impl Face {
    pub fn new(index: u32, surface: Option<Surface>, uv: UvBounds) -> Self {
        Self { index, surface, uv }
    }
}

/// Correlates a face with the contiguous triangle range
/// `[tri_start, tri_start + tri_count)` in the exported index buffer.
///
/// One span is produced per face by the exporter's face-data callback as the
/// face is flattened into triangles. Spans may arrive in any order; consumers
/// index by `face_index`, never by arrival sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceSpan {
    pub face_index: u32,
    pub tri_start: u32,
    pub tri_count: u32,
    pub face: Face,
}

impl FaceSpan {
    pub fn new(face_index: u32, tri_start: u32, tri_count: u32, face: Face) -> Self {
        Self {
            face_index,
            tri_start,
            tri_count,
            face,
        }
    }
}
