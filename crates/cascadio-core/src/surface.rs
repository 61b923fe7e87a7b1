//! Analytic surface model for boundary-representation faces.
//!
//! CAD kernels classify faces into a small closed set of quadric surfaces.
//! [`Surface`] mirrors that set directly: one variant per quadric, each
//! carrying its placement frame and scalar parameters. Freeform
//! (B-spline/NURBS) faces carry no `Surface` at all, which keeps "not
//! analytic" out of the variant set.

use serde::{Deserialize, Serialize};

/// A right-handed placement frame: origin plus the local z axis (surface
/// normal or revolution axis) and the local x axis.
///
/// Direction vectors are unit length by convention; the frame does not
/// re-normalize them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub origin: [f64; 3],
    pub axis: [f64; 3],
    pub x_dir: [f64; 3],
}

impl Frame {
    pub fn new(origin: [f64; 3], axis: [f64; 3], x_dir: [f64; 3]) -> Self {
        Self {
            origin,
            axis,
            x_dir,
        }
    }
}

/// Field-less tag for the five recognized quadric types.
///
/// The string names are the wire-schema names used both for the `type` field
/// of emitted face records and for type filtering at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceType {
    Plane,
    Cylinder,
    Cone,
    Sphere,
    Torus,
}

impl SurfaceType {
    /// Wire-schema name of this surface type.
    pub const fn name(self) -> &'static str {
        match self {
            SurfaceType::Plane => "plane",
            SurfaceType::Cylinder => "cylinder",
            SurfaceType::Cone => "cone",
            SurfaceType::Sphere => "sphere",
            SurfaceType::Torus => "torus",
        }
    }

    /// Parse a wire-schema name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "plane" => Some(SurfaceType::Plane),
            "cylinder" => Some(SurfaceType::Cylinder),
            "cone" => Some(SurfaceType::Cone),
            "sphere" => Some(SurfaceType::Sphere),
            "torus" => Some(SurfaceType::Torus),
            _ => None,
        }
    }
}

impl std::fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The closed set of analytic surfaces a face can be bound to.
///
/// Parameters follow the usual CAD-kernel conventions: cylinders and cones
/// are positioned by a frame whose axis is the revolution axis, a cone's
/// `ref_radius` is the radius in the frame's xy plane, and a torus is
/// described by major (tube center circle) and minor (tube) radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Surface {
    Plane {
        frame: Frame,
    },
    Cylinder {
        frame: Frame,
        radius: f64,
    },
    Cone {
        frame: Frame,
        /// Half-angle at the apex, radians.
        semi_angle: f64,
        /// Radius in the placement plane (v = 0).
        ref_radius: f64,
    },
    Sphere {
        center: [f64; 3],
        radius: f64,
    },
    Torus {
        frame: Frame,
        major_radius: f64,
        minor_radius: f64,
    },
}

impl Surface {
    /// The tag for this variant.
    pub const fn surface_type(&self) -> SurfaceType {
        match self {
            Surface::Plane { .. } => SurfaceType::Plane,
            Surface::Cylinder { .. } => SurfaceType::Cylinder,
            Surface::Cone { .. } => SurfaceType::Cone,
            Surface::Sphere { .. } => SurfaceType::Sphere,
            Surface::Torus { .. } => SurfaceType::Torus,
        }
    }

    /// Apex of a cone, derived from its placement: the point on the axis
    /// where the radius reaches zero. Returns `None` for other variants.
    pub fn cone_apex(&self) -> Option<[f64; 3]> {
        match self {
            Surface::Cone {
                frame,
                semi_angle,
                ref_radius,
            } => {
                let distance = ref_radius / semi_angle.tan();
                Some([
                    frame.origin[0] - frame.axis[0] * distance,
                    frame.origin[1] - frame.axis[1] * distance,
                    frame.origin[2] - frame.axis[2] * distance,
                ])
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_roundtrip() {
        for ty in [
            SurfaceType::Plane,
            SurfaceType::Cylinder,
            SurfaceType::Cone,
            SurfaceType::Sphere,
            SurfaceType::Torus,
        ] {
            assert_eq!(SurfaceType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(SurfaceType::from_name("bspline"), None);
        assert_eq!(SurfaceType::from_name(""), None);
    }

    #[test]
    fn test_cone_apex_on_axis() {
        // 45 degree cone with radius 2 in the placement plane: the apex sits
        // 2 units below the origin along +z.
        let cone = Surface::Cone {
            frame: Frame::new([0.0, 0.0, 5.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
            semi_angle: std::f64::consts::FRAC_PI_4,
            ref_radius: 2.0,
        };
        let apex = cone.cone_apex().unwrap();
        assert!((apex[0]).abs() < 1e-12);
        assert!((apex[1]).abs() < 1e-12);
        assert!((apex[2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_cone_apex_only_for_cones() {
        let sphere = Surface::Sphere {
            center: [0.0; 3],
            radius: 1.0,
        };
        assert!(sphere.cone_apex().is_none());
    }

    #[test]
    fn test_surface_serde_tag() {
        let cyl = Surface::Cylinder {
            frame: Frame::new([0.0; 3], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
            radius: 5.0,
        };
        let value = serde_json::to_value(&cyl).unwrap();
        assert_eq!(value["type"], "cylinder");
        let back: Surface = serde_json::from_value(value).unwrap();
        assert_eq!(back, cyl);
    }
}
