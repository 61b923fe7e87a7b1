//! Command-line tools for cascadio GLB output.
//!
//! `inspect` prints a GLB's container layout and extension summary;
//! `inject` performs post-hoc `TM_brep_faces` enrichment from sidecar JSON
//! files (face spans as produced by a kernel binding, plus optional
//! material records).

use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use cascadio_core::face::FaceSpan;
use cascadio_core::material::MaterialRecord;
use cascadio_core::surface::SurfaceType;
use cascadio_io::glb::Glb;
use cascadio_io::inject::{inject, Injection, TM_BREP_FACES};
use cascadio_io::scratch::ScratchFile;

#[derive(Parser)]
#[command(name = "cascadio", about = "Inspect and enrich GLB files", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the container layout of a GLB file.
    Inspect {
        /// GLB file to inspect.
        path: PathBuf,
    },
    /// Inject TM_brep_faces metadata into an existing GLB.
    Inject {
        /// Baseline GLB file.
        input: PathBuf,
        /// JSON array of face spans (face_index, tri_start, tri_count, face).
        #[arg(long)]
        faces: PathBuf,
        /// JSON array of material records to attach to mesh extras.
        #[arg(long)]
        materials: Option<PathBuf>,
        /// Surface types to keep, comma separated; default keeps all.
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        /// Native-unit-to-meters scale applied to face geometry.
        #[arg(long, default_value_t = 1.0)]
        unit_scale: f64,
        /// Output GLB path.
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn inspect(path: &PathBuf) -> Result<(), Box<dyn Error>> {
    let data = fs::read(path)?;
    let glb = Glb::parse(&data)?;

    println!("{}: {} bytes", path.display(), data.len());
    match &glb.bin {
        Some(bin) => println!("  chunks: JSON + BIN ({} bytes)", bin.len()),
        None => println!("  chunks: JSON only"),
    }

    let count = |key: &str| glb.json.get(key).and_then(|v| v.as_array()).map_or(0, Vec::len);
    println!(
        "  meshes: {}, accessors: {}, bufferViews: {}, materials: {}",
        count("meshes"),
        count("accessors"),
        count("bufferViews"),
        count("materials"),
    );

    if let Some(used) = glb.json.get("extensionsUsed").and_then(|v| v.as_array()) {
        let names: Vec<&str> = used.iter().filter_map(|v| v.as_str()).collect();
        println!("  extensionsUsed: {}", names.join(", "));
    }

    for (mesh_index, mesh) in glb
        .json
        .get("meshes")
        .and_then(|v| v.as_array())
        .into_iter()
        .flatten()
        .enumerate()
    {
        let primitives = mesh.get("primitives").and_then(|v| v.as_array());
        for (primitive_index, primitive) in primitives.into_iter().flatten().enumerate() {
            if let Some(extension) = primitive
                .get("extensions")
                .and_then(|e| e.get(TM_BREP_FACES))
            {
                let faces = extension
                    .get("faces")
                    .and_then(|v| v.as_array())
                    .map_or(0, Vec::len);
                println!(
                    "  mesh {mesh_index} primitive {primitive_index}: {TM_BREP_FACES} with {faces} faces"
                );
            }
        }
    }

    Ok(())
}

fn run_inject(
    input: &PathBuf,
    faces: &PathBuf,
    materials: Option<&PathBuf>,
    types: &[String],
    unit_scale: f64,
    output: &PathBuf,
) -> Result<(), Box<dyn Error>> {
    let glb = fs::read(input)?;
    let spans: Vec<FaceSpan> = serde_json::from_slice(&fs::read(faces)?)?;

    let records: Option<Vec<MaterialRecord>> = match materials {
        Some(path) => Some(serde_json::from_slice(&fs::read(path)?)?),
        None => None,
    };

    let mut allowed_types = HashSet::new();
    for name in types {
        let ty = SurfaceType::from_name(name)
            .ok_or_else(|| format!("unknown surface type: {name}"))?;
        allowed_types.insert(ty);
    }

    let injection = Injection {
        spans: &spans,
        allowed_types: &allowed_types,
        materials: records.as_deref(),
        unit_scale,
    };
    let enriched = inject(&glb, &injection)?;

    // write through a scratch file so a failed write never leaves a
    // truncated GLB at the destination
    let scratch = ScratchFile::with_contents(".glb", &enriched)?;
    scratch.persist(output)?;
    println!(
        "{}: wrote {} bytes ({} face spans)",
        output.display(),
        enriched.len(),
        spans.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Inspect { path } => inspect(path),
        Command::Inject {
            input,
            faces,
            materials,
            types,
            unit_scale,
            output,
        } => run_inject(input, faces, materials.as_ref(), types, *unit_scale, output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
