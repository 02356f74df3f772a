//! ISM2 CLI commands
//!
//! Commands for inspecting, dumping and batch-decoding ISM2 models.

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{CUBE, DISK, LOOKING_GLASS, print_done, print_step, simple_bar};
use crate::formats::ism2::{DecodeOptions, read_ism2};
use crate::importer::{IndexedMesh, batch_decode, find_ism2_files, submit_model};
use crate::model::TextureChannel;

/// Decode an ISM2 file and print its structure.
pub fn inspect(path: &Path, options: &DecodeOptions) -> anyhow::Result<()> {
    println!("Inspecting ISM2 file: {}", path.display());
    println!();

    let model = read_ism2(path, options)?;
    let [major, minor, patch, build] = model.version;

    println!("ISM2 Model Information");
    println!("======================");
    println!("Name:        {}", model.name);
    println!("Version:     {major}.{minor}.{patch}.{build}");
    println!("Strings:     {}", model.strings.len());
    println!("Vertices:    {}", model.vertices.len());
    println!("Triangles:   {}", model.faces.len());
    println!("Bones:       {}", model.bone_count());
    println!();

    println!("Surfaces ({}):", model.surfaces.len());
    for (index, surface) in model.surfaces.iter().enumerate() {
        let material = model
            .surface_material(index)
            .map_or("<none>", |m| m.name.as_str());
        println!("  - {} (material: {material})", surface.name);
    }

    println!();
    println!("Materials ({}):", model.materials.len());
    for material in &model.materials {
        println!(
            "  - {}{}",
            material.name,
            if material.enable_vertex_coloring {
                " [vertex colours]"
            } else {
                ""
            }
        );
        for channel in TextureChannel::ALL {
            if let Some(texture) = material.texture(channel) {
                println!("      {:10} {texture}", channel.as_str());
            }
        }
    }

    if !model.texture_directories.is_empty() {
        println!();
        println!("Texture folders:");
        for dir in &model.texture_directories {
            println!(
                "  - {} ({})",
                dir.name.as_deref().unwrap_or("<default>"),
                dir.path.display()
            );
        }
    }

    if let Some(bbox) = &model.bounding_box {
        println!();
        println!("Bounding box: {:?} .. {:?}", bbox.min, bbox.max);
    }

    for motion in &model.motions {
        println!();
        println!(
            "Motion {}: {} bones, {} frames, duration {}",
            motion.name,
            motion.bones.len(),
            motion.frame_count(),
            motion.duration
        );
    }

    if let Some(face_anm) = &model.face_anm {
        println!();
        println!("face.anm: {} lines", face_anm.lines().count());
    }

    let mut mesh = IndexedMesh::new();
    let report = submit_model(&model, &mut mesh);
    println!();
    println!(
        "Mesh build: {} triangles accepted, {} skipped, {} invalid",
        report.triangles_submitted, report.triangles_skipped, report.triangles_invalid
    );

    if !model.diagnostics.is_empty() {
        println!();
        println!("Diagnostics ({}):", model.diagnostics.len());
        for diagnostic in &model.diagnostics {
            println!(
                "  [{:#04x} @ {:#x}] {}",
                diagnostic.section_type, diagnostic.offset, diagnostic.message
            );
        }
    }

    Ok(())
}

/// Decode an ISM2 file and write the model as JSON.
pub fn dump(path: &Path, output: Option<&Path>, options: &DecodeOptions) -> anyhow::Result<()> {
    let model = read_ism2(path, options)?;
    let json = serde_json::to_string_pretty(&model)?;

    match output {
        Some(output) => {
            std::fs::write(output, json)?;
            println!("{}Wrote {}", DISK, output.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Decode every ISM2 file under `source` and run each through a mesh build.
pub fn batch(source: &Path, options: &DecodeOptions, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let files = find_ism2_files(source);

    if files.is_empty() {
        println!("No ISM2 files found in: {}", source.display());
        return Ok(());
    }

    print_step(1, 2, LOOKING_GLASS, &format!("Decoding {} ISM2 files...", files.len()));
    let pb = simple_bar(files.len() as u64, "Decoding", quiet);
    let result = batch_decode(&files, options, |progress| {
        pb.set_position(progress.current as u64);
        pb.set_message(progress.current_file.clone());
    });
    pb.finish_and_clear();

    print_step(2, 2, CUBE, "Building meshes...");
    let mut skipped = 0;
    let mut diagnostics = 0;
    for (path, model) in result.models() {
        let mut mesh = IndexedMesh::new();
        let report = submit_model(model, &mut mesh);
        skipped += report.triangles_skipped + report.triangles_invalid;
        diagnostics += report.diagnostics;
        if report.diagnostics > 0 || report.triangles_skipped > 0 {
            let display = path.strip_prefix(source).unwrap_or(path).display();
            println!(
                "  {display}: {} diagnostics, {} triangles skipped",
                report.diagnostics, report.triangles_skipped
            );
        }
    }

    println!();
    println!("Decode complete:");
    println!("  Success: {}", result.success_count);
    println!("  Failed: {}", result.fail_count);
    println!("  Diagnostics: {diagnostics}");
    println!("  Triangles skipped: {skipped}");

    if result.fail_count > 0 {
        println!();
        println!("Failures:");
        for (path, error) in result.errors() {
            let display = path.strip_prefix(source).unwrap_or(path).display();
            println!("  {display}: {error}");
        }
    }

    print_done(started.elapsed());
    Ok(())
}
