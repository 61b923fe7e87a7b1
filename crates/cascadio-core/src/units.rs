//! Length-unit detection.
//!
//! Exported geometry is always meters. The source document's native unit is
//! taken from its stored metadata when present; many STEP producers never
//! populate it, so a bounding-box heuristic fills the gap.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::document::{Document, Shape};

/// Scale factor applied when the heuristic decides the source is millimeters.
pub const MILLIMETERS_TO_METERS: f64 = 0.001;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: [
                self.min[0].min(other.min[0]),
                self.min[1].min(other.min[1]),
                self.min[2].min(other.min[2]),
            ],
            max: [
                self.max[0].max(other.max[0]),
                self.max[1].max(other.max[1]),
                self.max[2].max(other.max[2]),
            ],
        }
    }

    pub fn extents(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Largest of the three extents.
    pub fn largest_extent(&self) -> f64 {
        let [x, y, z] = self.extents();
        x.max(y).max(z)
    }
}

/// Determine the scale factor converting the document's native length unit
/// to meters.
///
/// The document's stored unit is authoritative when present and valid.
/// Otherwise the union bounding box of all shapes decides: an empty or
/// degenerate box assumes meters, and a largest extent above 1.0 is read as
/// a millimeter-scale part (typical CAD parts span 10-1000 native units).
/// A genuinely meter-scale part smaller than 1 unit is indistinguishable
/// from a millimeter part and will be misclassified; known limitation.
pub fn detect_unit_scale(document: &Document, shapes: &[Shape]) -> f64 {
    if let Some(unit) = document.length_unit {
        if unit.is_finite() && unit > 0.0 {
            return unit;
        }
        warn!("ignoring invalid stored length unit {unit}");
    }

    let mut bounds: Option<Aabb> = None;
    for shape in shapes {
        if let Some(shape_bounds) = shape.bounds {
            bounds = Some(match bounds {
                Some(total) => total.union(&shape_bounds),
                None => shape_bounds,
            });
        }
    }

    let Some(bounds) = bounds else {
        return 1.0;
    };

    let largest = bounds.largest_extent();
    if !largest.is_finite() || largest <= 0.0 {
        return 1.0;
    }
    if largest > 1.0 {
        debug!("no stored unit; extent {largest} suggests millimeters");
        MILLIMETERS_TO_METERS
    } else {
        1.0
    }
}
