//! Shared fixtures: a synthetic CAD kernel over a fixed millimeter-scale
//! cylinder part, plus a hand-assembled baseline GLB.
//!
//! The part is a 10 mm tall cylinder of radius 5 mm with planar caps, no
//! stored length unit, and one physical plus one visual material. The
//! exporter tessellates it into 16 triangles: 8 on the lateral face, 4 per
//! cap.
#![allow(dead_code)]

use std::f64::consts::TAU;

use serde_json::{json, Value};

use cascadio_core::document::{Document, LoadOptions, LoadResult, Shape};
use cascadio_core::face::{Face, FaceSpan, UvBounds};
use cascadio_core::material::{PhysicalMaterial, VisualMaterial};
use cascadio_core::surface::{Frame, Surface};
use cascadio_core::units::Aabb;
use cascadio_io::traits::{
    CadReader, ExportError, ExportHooks, ExportOptions, GlbExporter, LoadError,
};

pub const TRIANGLE_COUNT: u32 = 16;

pub fn cylinder_document() -> Document {
    Document {
        name: Some("cylinder".into()),
        length_unit: None,
        physical_materials: vec![PhysicalMaterial {
            name: Some("steel".into()),
            density: Some(7850.0),
            density_name: Some("kg/m3".into()),
            ..PhysicalMaterial::default()
        }],
        visual_materials: vec![VisualMaterial {
            name: Some("red".into()),
            base_color: Some([1.0, 0.0, 0.0, 1.0]),
            ..VisualMaterial::default()
        }],
    }
}

pub fn cylinder_shape() -> Shape {
    let lateral = Face::new(
        0,
        Some(Surface::Cylinder {
            frame: Frame::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
            radius: 5.0,
        }),
        UvBounds::new(0.0, TAU, 0.0, 10.0),
    );
    let top = Face::new(
        1,
        Some(Surface::Plane {
            frame: Frame::new([0.0, 0.0, 10.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        }),
        UvBounds::new(-5.0, 5.0, -5.0, 5.0),
    );
    let bottom = Face::new(
        2,
        Some(Surface::Plane {
            frame: Frame::new([0.0, 0.0, 0.0], [0.0, 0.0, -1.0], [1.0, 0.0, 0.0]),
        }),
        UvBounds::new(-5.0, 5.0, -5.0, 5.0),
    );
    Shape {
        name: Some("part".into()),
        faces: vec![lateral, top, bottom],
        bounds: Some(Aabb::new([-5.0, -5.0, 0.0], [5.0, 5.0, 10.0])),
    }
}

/// Face/triangle spans matching the exporter's tessellation.
pub fn cylinder_spans() -> Vec<FaceSpan> {
    let faces = cylinder_shape().faces;
    vec![
        FaceSpan::new(0, 0, 8, faces[0].clone()),
        FaceSpan::new(1, 8, 4, faces[1].clone()),
        FaceSpan::new(2, 12, 4, faces[2].clone()),
    ]
}

/// Baseline glTF JSON for an indexed triangle mesh with `bin_length` bytes
/// of buffer data.
pub fn baseline_json(triangle_count: u32, bin_length: usize) -> Value {
    json!({
        "asset": {"version": "2.0", "generator": "synthetic"},
        "buffers": [{"byteLength": bin_length}],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": bin_length}
        ],
        "accessors": [
            {
                "bufferView": 0,
                "byteOffset": 0,
                "componentType": 5125,
                "count": triangle_count * 3,
                "type": "SCALAR"
            }
        ],
        "meshes": [
            {"name": "part", "primitives": [{"attributes": {}, "indices": 0, "mode": 4}]}
        ],
        "nodes": [{"mesh": 0, "name": "part"}],
        "scenes": [{"nodes": [0]}],
        "scene": 0
    })
}

/// Index-buffer bytes for `triangle_count` triangles.
pub fn index_buffer(triangle_count: u32) -> Vec<u8> {
    let mut bin = Vec::with_capacity(triangle_count as usize * 12);
    for index in 0..triangle_count * 3 {
        bin.extend_from_slice(&index.to_le_bytes());
    }
    bin
}

/// Assemble a GLB container by hand; the BIN chunk is omitted when `bin` is
/// empty. Independent of the codec under test.
pub fn assemble_glb(json_text: &str, bin: &[u8]) -> Vec<u8> {
    let json_bytes = json_text.as_bytes();
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;

    let bin_padding = (4 - (bin.len() % 4)) % 4;
    let bin_chunk_length = bin.len() + bin_padding;

    let mut total_length = 12 + 8 + json_chunk_length;
    if !bin.is_empty() {
        total_length += 8 + bin_chunk_length;
    }

    let mut glb = Vec::with_capacity(total_length);
    glb.extend_from_slice(&0x46546C67u32.to_le_bytes());
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes());
    glb.extend_from_slice(json_bytes);
    glb.resize(glb.len() + json_padding, b' ');

    if !bin.is_empty() {
        glb.extend_from_slice(&(bin_chunk_length as u32).to_le_bytes());
        glb.extend_from_slice(&0x004E4942u32.to_le_bytes());
        glb.extend_from_slice(bin);
        glb.resize(glb.len() + bin_padding, 0);
    }

    glb
}

/// Baseline GLB for the cylinder part.
pub fn baseline_glb() -> Vec<u8> {
    let bin = index_buffer(TRIANGLE_COUNT);
    let json = baseline_json(TRIANGLE_COUNT, bin.len());
    assemble_glb(&serde_json::to_string(&json).unwrap(), &bin)
}

/// Reader that always yields the cylinder part; empty input is malformed.
pub struct SyntheticReader;

impl CadReader for SyntheticReader {
    fn load_bytes(&self, data: &[u8], _options: &LoadOptions) -> Result<LoadResult, LoadError> {
        if data.is_empty() {
            return Err(LoadError::Malformed("empty input".into()));
        }
        Ok(LoadResult {
            document: cylinder_document(),
            shapes: vec![cylinder_shape()],
        })
    }
}

/// Exporter that tessellates the cylinder part and drives all three hooks.
pub struct SyntheticExporter;

impl GlbExporter for SyntheticExporter {
    fn export(
        &self,
        _document: &Document,
        _shapes: &[Shape],
        _options: &ExportOptions,
        hooks: &mut ExportHooks<'_>,
    ) -> Result<Vec<u8>, ExportError> {
        // deliver spans out of order; consumers must not rely on arrival order
        if let Some(face_data) = hooks.face_data.as_mut() {
            let mut spans = cylinder_spans();
            spans.reverse();
            for span in spans {
                face_data(span);
            }
        }

        let mut bin = index_buffer(TRIANGLE_COUNT);
        let json = baseline_json(TRIANGLE_COUNT, bin.len());
        let mut json_text = serde_json::to_string(&json).map_err(|e| {
            ExportError::Failed(format!("JSON serialization: {e}"))
        })?;

        if let Some(json_rewrite) = hooks.json_rewrite.as_mut() {
            json_text = json_rewrite(json_text, bin.len());
        }
        if let Some(binary_append) = hooks.binary_append.as_mut() {
            let length = bin.len();
            binary_append(&mut bin, length)?;
        }

        Ok(assemble_glb(&json_text, &bin))
    }
}

/// Exporter that produces bytes no GLB parser will accept.
pub struct BrokenExporter;

impl GlbExporter for BrokenExporter {
    fn export(
        &self,
        _document: &Document,
        _shapes: &[Shape],
        _options: &ExportOptions,
        _hooks: &mut ExportHooks<'_>,
    ) -> Result<Vec<u8>, ExportError> {
        Ok(b"not a glb container".to_vec())
    }
}
