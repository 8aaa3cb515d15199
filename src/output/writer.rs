// src/output/writer.rs
//! Executes output operations by performing actual I/O.
//!
//! This module is the only place where generated files reach the disk.

use super::types::*;
use crate::error::AppError;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Delivers the output plan, performing all I/O operations.
///
/// Every operation is attempted; failures are collected in the report
/// rather than stopping the plan.
pub fn deliver(plan: OutputPlan) -> OutputReport {
    let mut report = OutputReport::new();
    let start_time = Instant::now();

    log::info!("Executing output plan with {} operations", plan.len());

    for operation in plan.operations {
        let op_start = Instant::now();
        match execute_operation(&operation) {
            Ok(bytes_written) => {
                let duration_ms = op_start.elapsed().as_millis() as u64;
                report = report.with_completed(CompletedOperation {
                    operation,
                    bytes_written,
                    duration_ms,
                });
            }
            Err(e) => {
                log::error!("Operation on {} failed: {}", operation.path().display(), e);
                report = report.with_failed(FailedOperation {
                    operation,
                    error: e.to_string(),
                });
            }
        }
    }

    report.stats.total_duration_ms = start_time.elapsed().as_millis() as u64;

    log::info!(
        "Output plan execution complete: {} succeeded, {} failed in {}ms",
        report.stats.operations_completed,
        report.stats.operations_failed,
        report.stats.total_duration_ms
    );

    report
}

fn execute_operation(operation: &DeliveryTarget) -> Result<usize, AppError> {
    match operation {
        DeliveryTarget::WriteFile { path, content } => write_file(path, content),
        DeliveryTarget::CreateDirectory { path } => {
            create_directory(path)?;
            Ok(0)
        }
        DeliveryTarget::RemoveFile { path } => {
            remove_file(path)?;
            Ok(0)
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<usize, AppError> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    log::info!("Wrote file: {}", path.display());
    Ok(content.len())
}

fn create_directory(path: &Path) -> Result<(), AppError> {
    if path.exists() {
        if path.is_dir() {
            log::debug!("Directory already exists: {}", path.display());
            return Ok(());
        }
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", path.display()),
        )));
    }

    fs::create_dir_all(path)?;
    log::info!("Created directory: {}", path.display());
    Ok(())
}

fn remove_file(path: &Path) -> Result<(), AppError> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::info!("Removed stale file: {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Stale file vanished before removal: {}", path.display());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("notion2code-writer-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_deliver_writes_and_removes() {
        let dir = scratch_dir("deliver");
        let old = dir.join("old.rs");
        fs::create_dir_all(&dir).unwrap();
        fs::write(&old, "stale").unwrap();

        let plan = OutputPlan::new()
            .with_operation(DeliveryTarget::CreateDirectory { path: dir.clone() })
            .with_operation(DeliveryTarget::WriteFile {
                path: dir.join("nested/new.rs"),
                content: "fresh".to_string(),
            })
            .with_operation(DeliveryTarget::RemoveFile { path: old.clone() });

        let report = deliver(plan);
        assert!(report.is_success());
        assert_eq!(report.stats.operations_completed, 3);
        assert_eq!(report.stats.bytes_written, 5);
        assert_eq!(report.stats.files_removed, 1);
        assert_eq!(fs::read_to_string(dir.join("nested/new.rs")).unwrap(), "fresh");
        assert!(!old.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failures_are_collected() {
        let dir = scratch_dir("failure");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("file");
        fs::write(&file, "x").unwrap();

        let plan = OutputPlan::new()
            .with_operation(DeliveryTarget::CreateDirectory { path: file.clone() })
            .with_operation(DeliveryTarget::WriteFile {
                path: dir.join("ok.rs"),
                content: "ok".to_string(),
            });

        let report = deliver(plan);
        assert!(!report.is_success());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.completed.len(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }
}
