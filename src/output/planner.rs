// src/output/planner.rs
//! Pure-ish planning of what a run writes and removes.
//!
//! The only I/O here is reading the output directory to find generated
//! files the run no longer produces.

use super::types::{DeliveryTarget, OutputPlan};
use crate::constants::GENERATED_MARKER;
use crate::emit::GeneratedFile;
use crate::error::AppError;
use std::collections::HashSet;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Plans writing `files` under `output_dir` and removing stale generated
/// files left there by earlier runs.
pub fn plan_generated_output(output_dir: &Path, files: &[GeneratedFile]) -> Result<OutputPlan, AppError> {
    let mut plan = OutputPlan::new().with_operation(DeliveryTarget::CreateDirectory {
        path: output_dir.to_path_buf(),
    });

    let produced: HashSet<PathBuf> = files.iter().map(|f| output_dir.join(&f.path)).collect();
    for file in files {
        plan = plan.with_operation(DeliveryTarget::WriteFile {
            path: output_dir.join(&file.path),
            content: file.contents.clone(),
        });
    }
    for path in stale_files(output_dir, &produced)? {
        plan = plan.with_operation(DeliveryTarget::RemoveFile { path });
    }
    Ok(plan)
}

/// Plans the review scaffold for `page`.
pub fn plan_scaffold(review_dir: &Path, page: &str, scaffold: &str) -> OutputPlan {
    OutputPlan::new().with_operation(DeliveryTarget::WriteFile {
        path: review_dir.join(format!("{}.rs", page)),
        content: scaffold.to_string(),
    })
}

/// Generated `.rs` files directly under `dir` that are not in `produced`.
///
/// A file counts as generated only if its first line is the marker, so
/// hand-written files sharing the directory are never touched.
pub fn stale_files(dir: &Path, produced: &HashSet<PathBuf>) -> Result<Vec<PathBuf>, AppError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut stale = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "rs") {
            continue;
        }
        if produced.contains(&path) {
            continue;
        }
        match carries_marker(&path) {
            Ok(true) => stale.push(path),
            Ok(false) => log::debug!("Leaving hand-written file {}", path.display()),
            Err(e) => log::warn!("Could not inspect {}: {}", path.display(), e),
        }
    }
    stale.sort();
    Ok(stale)
}

fn carries_marker(path: &Path) -> Result<bool, AppError> {
    let mut first = String::new();
    BufReader::new(fs::File::open(path)?).read_line(&mut first)?;
    Ok(first.trim_end() == GENERATED_MARKER)
}
