//! `TM_brep_faces` extension injection.
//!
//! Rewrites a baseline GLB so it carries a per-triangle face-index array,
//! analytic face records, and material metadata. Two entry paths share one
//! JSON mutation:
//!
//! - [`inject`] operates post-hoc on a finished GLB: parse, append the
//!   face-index array to the binary payload, rewrite the JSON, re-serialize;
//! - [`rewrite_json_text`] and [`append_face_indices`] slot into an
//!   exporter's JSON/binary callbacks right before final assembly, skipping
//!   the parse/serialize round trip.
//!
//! Both paths produce equivalent bytes for equivalent inputs.

use std::collections::HashSet;
use std::io::{self, Write};

use serde_json::{json, Map, Value};
use thiserror::Error;

use cascadio_core::classify::classify;
use cascadio_core::face::FaceSpan;
use cascadio_core::material::MaterialRecord;
use cascadio_core::surface::SurfaceType;

use crate::glb::{Glb, GlbError};

/// Extension name written into `extensionsUsed` and primitive extensions.
pub const TM_BREP_FACES: &str = "TM_brep_faces";

/// glTF componentType for u32 scalars.
const COMPONENT_UNSIGNED_INT: u32 = 5125;

/// Errors raised while mutating a GLB. The caller is expected to treat these
/// as non-fatal and keep the un-enriched baseline GLB.
#[derive(Error, Debug)]
pub enum InjectError {
    #[error("GLB error: {0}")]
    Glb(#[from] GlbError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("glTF document has no {0}")]
    MissingNode(&'static str),
}

pub type Result<T> = std::result::Result<T, InjectError>;

/// Everything the injector needs besides the GLB itself.
#[derive(Debug, Clone)]
pub struct Injection<'a> {
    /// Face/triangle correlation collected during export. May be empty.
    pub spans: &'a [FaceSpan],
    /// Surface types to keep in the `faces` array; empty keeps all.
    pub allowed_types: &'a HashSet<SurfaceType>,
    /// Material metadata to attach to mesh extras, if any.
    pub materials: Option<&'a [MaterialRecord]>,
    /// Native-unit-to-meters scale applied to face geometry.
    pub unit_scale: f64,
}

/// Round `length` up to the next multiple of 4.
pub fn align4(length: usize) -> usize {
    (length + 3) & !3
}

/// Number of entries in the dense face-index array: one per triangle,
/// covering `[0, max(tri_start + tri_count))`.
pub fn face_index_count(spans: &[FaceSpan]) -> usize {
    spans
        .iter()
        .map(|span| span.tri_start as usize + span.tri_count as usize)
        .max()
        .unwrap_or(0)
}

/// Dense per-triangle face-index array.
///
/// Slots not covered by any span stay 0, which is indistinguishable from a
/// triangle that really belongs to face 0 — kept for compatibility with the
/// extension's existing consumers. Overlapping spans resolve last-write-wins;
/// the upstream tessellator emits disjoint ranges by construction.
pub fn face_index_array(spans: &[FaceSpan]) -> Vec<u32> {
    let mut indices = vec![0u32; face_index_count(spans)];
    for span in spans {
        let start = span.tri_start as usize;
        let end = start + span.tri_count as usize;
        indices[start..end].fill(span.face_index);
    }
    indices
}

/// The face-index array as little-endian u32 bytes.
pub fn face_index_bytes(spans: &[FaceSpan]) -> Vec<u8> {
    let indices = face_index_array(spans);
    let mut bytes = Vec::with_capacity(indices.len() * 4);
    for index in indices {
        bytes.extend_from_slice(&index.to_le_bytes());
    }
    bytes
}

/// Where the face-index array lands in the binary payload.
#[derive(Debug, Clone, Copy)]
struct BinaryLayout {
    /// Aligned offset at which the array begins.
    face_indices_offset: usize,
    /// Raw (unpadded) byte count of the array.
    face_indices_bytes: usize,
    /// Total payload length after appending and re-aligning.
    total_bin_length: usize,
}

impl BinaryLayout {
    fn new(existing_bin_length: usize, face_indices_bytes: usize) -> Self {
        let face_indices_offset = align4(existing_bin_length);
        Self {
            face_indices_offset,
            face_indices_bytes,
            total_bin_length: align4(face_indices_offset + face_indices_bytes),
        }
    }
}

/// `faces` array in face-index order: entry `i` describes face `i`. Faces
/// that are filtered out, freeform, or absent from `spans` stay `null`; the
/// array is positional and is never compacted.
fn face_record_array(
    spans: &[FaceSpan],
    allowed: &HashSet<SurfaceType>,
    unit_scale: f64,
) -> Result<Vec<Value>> {
    let length = spans
        .iter()
        .map(|span| span.face_index as usize + 1)
        .max()
        .unwrap_or(0);
    let mut faces = vec![Value::Null; length];
    for span in spans {
        if let Some(record) = classify(&span.face, unit_scale, allowed) {
            faces[span.face_index as usize] = serde_json::to_value(record)?;
        }
    }
    Ok(faces)
}

/// Idempotent: checks membership before appending.
fn add_extension_used(root: &mut Map<String, Value>, name: &str) {
    let list = root
        .entry("extensionsUsed")
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Some(list) = list.as_array_mut() {
        if !list.iter().any(|entry| entry.as_str() == Some(name)) {
            list.push(Value::String(name.to_string()));
        }
    }
}

fn object_entry<'a>(object: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let value = object
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    value.as_object_mut().expect("just ensured an object")
}

/// Apply the extension to a parsed glTF JSON document.
///
/// `layout` is `None` when there is no face-index payload to reference, in
/// which case buffers, buffer views, and accessors are left untouched and
/// only material extras are written.
fn rewrite_document(
    doc: &mut Value,
    injection: &Injection<'_>,
    layout: Option<BinaryLayout>,
) -> Result<()> {
    let root = doc
        .as_object_mut()
        .ok_or(InjectError::MissingNode("root object"))?;

    if let Some(layout) = layout {
        // buffers[0].byteLength grows to cover the appended array
        let buffer = root
            .get_mut("buffers")
            .and_then(Value::as_array_mut)
            .and_then(|buffers| buffers.first_mut())
            .and_then(Value::as_object_mut)
            .ok_or(InjectError::MissingNode("buffers"))?;
        buffer.insert("byteLength".to_string(), json!(layout.total_bin_length));

        let views = root
            .get_mut("bufferViews")
            .and_then(Value::as_array_mut)
            .ok_or(InjectError::MissingNode("bufferViews"))?;
        let view_index = views.len();
        views.push(json!({
            "buffer": 0,
            "byteOffset": layout.face_indices_offset,
            "byteLength": layout.face_indices_bytes,
        }));

        let accessors = root
            .get_mut("accessors")
            .and_then(Value::as_array_mut)
            .ok_or(InjectError::MissingNode("accessors"))?;
        let accessor_index = accessors.len();
        accessors.push(json!({
            "bufferView": view_index,
            "byteOffset": 0,
            "componentType": COMPONENT_UNSIGNED_INT,
            "count": layout.face_indices_bytes / 4,
            "type": "SCALAR",
        }));

        add_extension_used(root, TM_BREP_FACES);

        let faces = face_record_array(injection.spans, injection.allowed_types, injection.unit_scale)?;
        let mut extension = Map::new();
        extension.insert("faceIndices".to_string(), json!(accessor_index));
        extension.insert("faces".to_string(), Value::Array(faces));
        if let Some(materials) = injection.materials {
            // carried inside the extension too, so one handler sees both
            extension.insert("materials".to_string(), serde_json::to_value(materials)?);
        }

        // merged-primitive exports carry exactly one mesh primitive
        let primitive = root
            .get_mut("meshes")
            .and_then(Value::as_array_mut)
            .and_then(|meshes| meshes.first_mut())
            .and_then(|mesh| mesh.get_mut("primitives"))
            .and_then(Value::as_array_mut)
            .and_then(|primitives| primitives.first_mut())
            .and_then(Value::as_object_mut)
            .ok_or(InjectError::MissingNode("meshes"))?;
        let extensions = object_entry(primitive, "extensions");
        extensions.insert(TM_BREP_FACES.to_string(), Value::Object(extension));
    }

    if let Some(materials) = injection.materials {
        let value = serde_json::to_value(materials)?;
        if let Some(meshes) = root.get_mut("meshes").and_then(Value::as_array_mut) {
            for mesh in meshes {
                let Some(mesh) = mesh.as_object_mut() else {
                    continue;
                };
                // every attachment point gets an independent copy; a shared
                // JSON value must never alias across meshes
                let extras = object_entry(mesh, "extras");
                let cascadio = object_entry(extras, "cascadio");
                cascadio.insert("materials".to_string(), value.clone());
            }
        }
    }

    Ok(())
}

/// Post-hoc injection: parse a finished GLB, append the face-index array,
/// rewrite the JSON document, and re-serialize.
///
/// Empty `spans` (or spans covering zero triangles) inject no BREP data and
/// add no binary payload; materials, when given, are still attached. On
/// error the caller should fall back to the original GLB — enrichment is
/// best-effort, never a destructive prerequisite.
pub fn inject(glb: &[u8], injection: &Injection<'_>) -> Result<Vec<u8>> {
    let mut parsed = Glb::parse(glb)?;

    let face_bytes = face_index_bytes(injection.spans);
    let layout = if face_bytes.is_empty() {
        None
    } else {
        let mut bin = parsed.bin.take().unwrap_or_default();
        let layout = BinaryLayout::new(bin.len(), face_bytes.len());
        bin.resize(layout.face_indices_offset, 0);
        bin.extend_from_slice(&face_bytes);
        bin.resize(layout.total_bin_length, 0);
        parsed.bin = Some(bin);
        Some(layout)
    };

    rewrite_document(&mut parsed.json, injection, layout)?;
    Ok(parsed.to_bytes()?)
}

/// Inline-path JSON rewrite: given the exporter's fully formed JSON text and
/// the binary payload length *before* [`append_face_indices`] runs, return
/// the rewritten JSON text.
pub fn rewrite_json_text(
    json_text: &str,
    injection: &Injection<'_>,
    existing_bin_length: usize,
) -> Result<String> {
    let mut doc: Value = serde_json::from_str(json_text)?;
    let count = face_index_count(injection.spans);
    let layout = if count == 0 {
        None
    } else {
        Some(BinaryLayout::new(existing_bin_length, count * 4))
    };
    rewrite_document(&mut doc, injection, layout)?;
    Ok(serde_json::to_string(&doc)?)
}

/// Inline-path binary append: pad the exporter's payload to alignment, then
/// write the face-index array. Returns the number of bytes written including
/// padding; the array itself is a whole number of u32s, so the payload ends
/// aligned.
pub fn append_face_indices<W: Write>(
    out: &mut W,
    spans: &[FaceSpan],
    existing_bin_length: usize,
) -> io::Result<usize> {
    let bytes = face_index_bytes(spans);
    if bytes.is_empty() {
        return Ok(0);
    }
    let padding = align4(existing_bin_length) - existing_bin_length;
    out.write_all(&[0u8; 3][..padding])?;
    out.write_all(&bytes)?;
    Ok(padding + bytes.len())
}
