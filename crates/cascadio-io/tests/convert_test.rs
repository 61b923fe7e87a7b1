//! End-to-end pipeline tests with the synthetic kernel.

mod common;

use std::collections::HashSet;

use cascadio_core::surface::SurfaceType;
use cascadio_io::convert::{convert, ConvertError, ConvertOptions};
use cascadio_io::glb::Glb;
use cascadio_io::inject::TM_BREP_FACES;

use common::{BrokenExporter, SyntheticExporter, SyntheticReader};

const STEP_BYTES: &[u8] = b"ISO-10303-21; synthetic";

#[test]
fn test_plain_conversion_is_the_baseline() {
    let options = ConvertOptions::default();
    let glb = convert(&SyntheticReader, &SyntheticExporter, STEP_BYTES, &options).unwrap();
    assert_eq!(glb, common::baseline_glb());
}

#[test]
fn test_brep_and_materials_roundtrip() {
    let options = ConvertOptions {
        include_brep: true,
        include_materials: true,
        ..ConvertOptions::default()
    };
    let bytes = convert(&SyntheticReader, &SyntheticExporter, STEP_BYTES, &options).unwrap();
    let glb = Glb::parse(&bytes).unwrap();

    let extension = &glb.json["meshes"][0]["primitives"][0]["extensions"][TM_BREP_FACES];
    let faces = extension["faces"].as_array().unwrap();
    assert_eq!(faces.len(), 3);

    // the 5 mm radius, 10 mm tall cylinder had no stored unit; the bounding
    // box heuristic reads it as millimeters and geometry lands in meters
    assert_eq!(faces[0]["type"], "cylinder");
    assert!((faces[0]["radius"].as_f64().unwrap() - 0.005).abs() < 1e-12);
    let height = faces[0]["extent_height"].as_array().unwrap();
    assert!((height[1].as_f64().unwrap() - 0.01).abs() < 1e-12);
    assert_eq!(faces[0]["axis"].as_array().unwrap()[2], 1.0);

    // spans arrive reversed from the exporter; indexing is unaffected
    assert_eq!(faces[1]["type"], "plane");
    assert_eq!(faces[1]["face_index"], 1);

    let attached = &glb.json["meshes"][0]["extras"]["cascadio"]["materials"];
    assert_eq!(attached.as_array().unwrap().len(), 2);
    assert_eq!(attached[0]["name"], "steel");
    assert_eq!(attached[1]["name"], "red");
}

#[test]
fn test_brep_type_filter_passes_through() {
    let options = ConvertOptions {
        include_brep: true,
        allowed_brep_types: [SurfaceType::Cylinder].into_iter().collect::<HashSet<_>>(),
        ..ConvertOptions::default()
    };
    let bytes = convert(&SyntheticReader, &SyntheticExporter, STEP_BYTES, &options).unwrap();
    let glb = Glb::parse(&bytes).unwrap();
    let faces = glb.json["meshes"][0]["primitives"][0]["extensions"][TM_BREP_FACES]["faces"]
        .as_array()
        .unwrap();
    assert_eq!(faces.len(), 3);
    assert_eq!(faces[0]["type"], "cylinder");
    assert!(faces[1].is_null());
    assert!(faces[2].is_null());
}

#[test]
fn test_unmerged_primitives_downgrade_metadata() {
    // metadata requested without merged primitives: still a valid GLB, but
    // no extension and no extras
    let options = ConvertOptions {
        merge_primitives: false,
        include_brep: true,
        include_materials: true,
        ..ConvertOptions::default()
    };
    let bytes = convert(&SyntheticReader, &SyntheticExporter, STEP_BYTES, &options).unwrap();
    let glb = Glb::parse(&bytes).unwrap();
    assert!(glb.json.get("extensionsUsed").is_none());
    assert!(glb.json["meshes"][0].get("extras").is_none());
    assert!(glb.json["meshes"][0]["primitives"][0].get("extensions").is_none());
}

#[test]
fn test_load_failure_is_fatal() {
    let options = ConvertOptions::default();
    let result = convert(&SyntheticReader, &SyntheticExporter, b"", &options);
    assert!(matches!(result, Err(ConvertError::Load(_))));
}

#[test]
fn test_injection_failure_falls_back_to_baseline() {
    // the exporter emits an unparseable container; enrichment gives up and
    // the conversion still returns the exporter's bytes untouched
    let options = ConvertOptions {
        include_brep: true,
        include_materials: true,
        ..ConvertOptions::default()
    };
    let bytes = convert(&SyntheticReader, &BrokenExporter, STEP_BYTES, &options).unwrap();
    assert_eq!(bytes, b"not a glb container".to_vec());
}

#[test]
fn test_materials_only_conversion() {
    let options = ConvertOptions {
        include_materials: true,
        ..ConvertOptions::default()
    };
    let bytes = convert(&SyntheticReader, &SyntheticExporter, STEP_BYTES, &options).unwrap();
    let glb = Glb::parse(&bytes).unwrap();

    // no BREP extension without include_brep
    assert!(glb.json.get("extensionsUsed").is_none());
    let attached = &glb.json["meshes"][0]["extras"]["cascadio"]["materials"];
    assert_eq!(attached.as_array().unwrap().len(), 2);
}
