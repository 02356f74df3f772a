//! CLI commands for ARC operations

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::arc::{
    ArcPhase, ArcReader, PathType, batch_extract, extract_arc, find_arc_files,
    list_dlc_descriptions,
};
use crate::cli::progress::{LOOKING_GLASS, PACKAGE, print_done, print_step, simple_bar};

/// List the descriptors of an archive
pub fn list(source: &Path, json: bool, count: bool) -> anyhow::Result<()> {
    let data = std::fs::read(source)?;
    let reader = ArcReader::parse(&data)?;
    let entries = reader.list()?;

    if count {
        let files = entries
            .iter()
            .filter(|e| e.path_type == PathType::File)
            .count();
        println!("{files}");
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        match entry.path_type {
            PathType::File => println!("{:>10}  {}", format_size(entry.size), entry.path.display()),
            PathType::Root => println!("{:>10}  ./", "<root>"),
            other => println!("{:>10}  {}/", format!("<{}>", other.as_str()), entry.path.display()),
        }
    }
    Ok(())
}

/// Extract a single archive
pub fn extract(source: &Path, destination: Option<&Path>, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let destination = destination.map_or_else(|| default_destination(source), Path::to_path_buf);

    print_step(1, 2, LOOKING_GLASS, &format!("Reading {}...", source.display()));
    let pb = simple_bar(0, "Extracting", quiet);
    let written = extract_arc(source, &destination, |progress| {
        if progress.phase == ArcPhase::WritingFiles {
            pb.set_length(progress.total as u64);
            pb.set_position(progress.current as u64);
            if let Some(ref name) = progress.current_file {
                pb.set_message(name.clone());
            }
        }
    });
    pb.finish_and_clear();
    let written = written?;

    print_step(
        2,
        2,
        PACKAGE,
        &format!("Extracted {written} files to {}", destination.display()),
    );
    print_done(started.elapsed());
    Ok(())
}

/// Batch extract ARC files
pub fn batch_extract_cmd(source: &Path, dest: &Path, quiet: bool) -> anyhow::Result<()> {
    let arcs = find_arc_files(source);

    if arcs.is_empty() {
        println!("No ARC files found in: {}", source.display());
        return Ok(());
    }

    println!("Found {} ARC files to extract", arcs.len());

    let pb = simple_bar(arcs.len() as u64, "Extracting", quiet);
    let result = batch_extract(&arcs, source, dest, |progress| {
        pb.set_position(progress.current as u64);
        if let Some(ref name) = progress.current_file {
            pb.set_message(name.clone());
        }
    });
    pb.finish_and_clear();

    println!();
    println!("Extraction complete:");
    println!("  Success: {}", result.success_count);
    println!("  Failed: {}", result.fail_count);

    if result.fail_count > 0 {
        println!();
        println!("Failures:");
        for msg in result.results.iter().filter(|m| m.starts_with("Failed")) {
            println!("  {msg}");
        }
    }

    Ok(())
}

/// Print title and description of every installed DLC
pub fn dlc(dir: &Path) -> anyhow::Result<()> {
    let descriptions = list_dlc_descriptions(dir)?;
    if descriptions.is_empty() {
        println!("No DLC descriptors found in: {}", dir.display());
        return Ok(());
    }

    for description in &descriptions {
        println!("{description}");
        println!();
    }
    Ok(())
}

/// `<dir>/<stem>` next to the archive
fn default_destination(source: &Path) -> PathBuf {
    let stem = source.file_stem().unwrap_or_default();
    source
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(stem)
}

/// Format byte size for display
fn format_size(bytes: u32) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1}M", f64::from(bytes) / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1}K", f64::from(bytes) / 1024.0)
    } else {
        format!("{bytes}")
    }
}
