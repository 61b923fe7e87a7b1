//! Classification of faces into normalized wire-schema records.
//!
//! A [`FaceRecord`] is one entry of the extension's `faces` array: the
//! analytic surface parameters of a face, normalized to meters. Faces that
//! are freeform, degenerate, or filtered out classify to `None`, which is
//! serialized as JSON `null` — the array is strictly positional and callers
//! must never compact it.
//!
//! Numeric contract: every point or distance quantity is multiplied by the
//! unit scale, angles are radians and never scaled, unit direction vectors
//! are never scaled.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::face::Face;
use crate::surface::{Surface, SurfaceType};

/// Analytic parameters of a classified face, tagged by surface type.
///
/// Extent fields are `[min, max]` over the face's parametric domain; for
/// angular parameters they are radians, otherwise lengths in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FaceRecord {
    Plane {
        face_index: u32,
        origin: [f64; 3],
        normal: [f64; 3],
        x_dir: [f64; 3],
        /// u extent; for planes both u and v are lengths in local coordinates.
        extent_x: [f64; 2],
        extent_y: [f64; 2],
    },
    Cylinder {
        face_index: u32,
        origin: [f64; 3],
        axis: [f64; 3],
        radius: f64,
        /// u is the angle around the axis, radians.
        extent_angle: [f64; 2],
        /// v is the height along the axis.
        extent_height: [f64; 2],
    },
    Cone {
        face_index: u32,
        apex: [f64; 3],
        axis: [f64; 3],
        /// Half-angle at the apex, radians.
        semi_angle: f64,
        ref_radius: f64,
        extent_angle: [f64; 2],
        /// v is the distance from the placement plane along the axis.
        extent_distance: [f64; 2],
    },
    Sphere {
        face_index: u32,
        center: [f64; 3],
        radius: f64,
        /// u is longitude, radians.
        extent_longitude: [f64; 2],
        /// v is latitude, radians.
        extent_latitude: [f64; 2],
    },
    Torus {
        face_index: u32,
        center: [f64; 3],
        axis: [f64; 3],
        major_radius: f64,
        minor_radius: f64,
        /// u is the angle around the main axis, radians.
        extent_major_angle: [f64; 2],
        /// v is the angle around the tube, radians.
        extent_minor_angle: [f64; 2],
    },
}

impl FaceRecord {
    pub const fn surface_type(&self) -> SurfaceType {
        match self {
            FaceRecord::Plane { .. } => SurfaceType::Plane,
            FaceRecord::Cylinder { .. } => SurfaceType::Cylinder,
            FaceRecord::Cone { .. } => SurfaceType::Cone,
            FaceRecord::Sphere { .. } => SurfaceType::Sphere,
            FaceRecord::Torus { .. } => SurfaceType::Torus,
        }
    }
}

fn scaled(v: [f64; 3], scale: f64) -> [f64; 3] {
    [v[0] * scale, v[1] * scale, v[2] * scale]
}

/// Classify one face into its wire-schema record.
///
/// Returns `None` for freeform/degenerate faces and for faces whose type is
/// excluded by a non-empty `allowed` set. Both outcomes are expected and
/// preserve the caller's positional indexing; neither is an error.
pub fn classify(
    face: &Face,
    unit_scale: f64,
    allowed: &HashSet<SurfaceType>,
) -> Option<FaceRecord> {
    let surface = face.surface.as_ref()?;
    if !allowed.is_empty() && !allowed.contains(&surface.surface_type()) {
        return None;
    }

    let uv = face.uv;
    let s = unit_scale;

    Some(match surface {
        Surface::Plane { frame } => FaceRecord::Plane {
            face_index: face.index,
            origin: scaled(frame.origin, s),
            normal: frame.axis,
            x_dir: frame.x_dir,
            extent_x: [uv.u_min * s, uv.u_max * s],
            extent_y: [uv.v_min * s, uv.v_max * s],
        },
        Surface::Cylinder { frame, radius } => FaceRecord::Cylinder {
            face_index: face.index,
            origin: scaled(frame.origin, s),
            axis: frame.axis,
            radius: radius * s,
            extent_angle: [uv.u_min, uv.u_max],
            extent_height: [uv.v_min * s, uv.v_max * s],
        },
        Surface::Cone {
            frame,
            semi_angle,
            ref_radius,
        } => FaceRecord::Cone {
            face_index: face.index,
            // cone_apex is derived from this same variant, so it is present
            apex: scaled(surface.cone_apex()?, s),
            axis: frame.axis,
            semi_angle: *semi_angle,
            ref_radius: ref_radius * s,
            extent_angle: [uv.u_min, uv.u_max],
            extent_distance: [uv.v_min * s, uv.v_max * s],
        },
        Surface::Sphere { center, radius } => FaceRecord::Sphere {
            face_index: face.index,
            center: scaled(*center, s),
            radius: radius * s,
            extent_longitude: [uv.u_min, uv.u_max],
            extent_latitude: [uv.v_min, uv.v_max],
        },
        Surface::Torus {
            frame,
            major_radius,
            minor_radius,
        } => FaceRecord::Torus {
            face_index: face.index,
            center: scaled(frame.origin, s),
            axis: frame.axis,
            major_radius: major_radius * s,
            minor_radius: minor_radius * s,
            extent_major_angle: [uv.u_min, uv.u_max],
            extent_minor_angle: [uv.v_min, uv.v_max],
        },
    })
}

/// Classify every face of a traversal.
///
/// The output always has the same length as the input; filtered or
/// non-analytic faces occupy their position as `None`.
pub fn classify_all(
    faces: &[Face],
    unit_scale: f64,
    allowed: &HashSet<SurfaceType>,
) -> Vec<Option<FaceRecord>> {
    faces
        .iter()
        .map(|face| classify(face, unit_scale, allowed))
        .collect()
}
