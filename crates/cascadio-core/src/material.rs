//! Material records extracted from the CAD document.
//!
//! Documents can carry two independent material tables: physical materials
//! (name, description, density) and visual materials (colors plus PBR and/or
//! legacy shading parameters). Extraction flattens both into one array of
//! [`MaterialRecord`]s; a document without material tables yields an empty
//! array, never an error.

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// PBR shading parameters of a visual material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PbrMaterial {
    pub base_color: [f64; 4],
    pub metallic: f64,
    pub roughness: f64,
    pub refraction_index: f64,
    pub emissive_factor: [f64; 3],
}

/// Legacy (common) shading parameters of a visual material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonMaterial {
    pub ambient_color: [f64; 3],
    pub diffuse_color: [f64; 3],
    pub specular_color: [f64; 3],
    pub emissive_color: [f64; 3],
    pub shininess: f64,
    pub transparency: f64,
}

/// One entry of the document's physical-material table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalMaterial {
    pub name: Option<String>,
    pub description: Option<String>,
    pub density: Option<f64>,
    pub density_name: Option<String>,
    pub density_value_type: Option<String>,
}

/// One entry of the document's visual-material table. PBR and common data
/// may coexist on the same material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualMaterial {
    pub name: Option<String>,
    pub base_color: Option<[f64; 4]>,
    pub alpha_cutoff: Option<f64>,
    pub pbr: Option<PbrMaterial>,
    pub common: Option<CommonMaterial>,
}

impl VisualMaterial {
    /// A material with no color and no shading data carries nothing worth
    /// exporting.
    pub fn is_empty(&self) -> bool {
        self.base_color.is_none() && self.pbr.is_none() && self.common.is_none()
    }
}

/// Normalized material metadata as attached to mesh extras.
///
/// All fields are optional; physical and visual attributes come from
/// separate document tables and rarely coexist on one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density_value_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_color: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_cutoff: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pbr: Option<PbrMaterial>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common: Option<CommonMaterial>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(String::from)
}

/// Flatten the document's material tables into wire-schema records:
/// physical materials first, then non-empty visual materials.
pub fn extract_materials(document: &Document) -> Vec<MaterialRecord> {
    let mut records = Vec::new();

    for material in &document.physical_materials {
        let mut record = MaterialRecord {
            name: non_empty(&material.name),
            description: non_empty(&material.description),
            ..MaterialRecord::default()
        };
        // density metadata only makes sense alongside a positive density
        if let Some(density) = material.density.filter(|d| *d > 0.0) {
            record.density = Some(density);
            record.density_name = non_empty(&material.density_name);
            record.density_value_type = non_empty(&material.density_value_type);
        }
        records.push(record);
    }

    for material in &document.visual_materials {
        if material.is_empty() {
            continue;
        }
        records.push(MaterialRecord {
            name: non_empty(&material.name),
            base_color: material.base_color,
            alpha_cutoff: material.alpha_cutoff,
            pbr: material.pbr.clone(),
            common: material.common.clone(),
            ..MaterialRecord::default()
        });
    }

    records
}
