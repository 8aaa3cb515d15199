// src/output/types.rs
//! Type definitions for output operations.
//!
//! A plan is built up front from the generated files and the current
//! contents of the output directory; only [`deliver`](super::deliver)
//! touches the filesystem.

use std::path::{Path, PathBuf};

/// An ordered list of filesystem operations.
#[derive(Debug, Clone, Default)]
pub struct OutputPlan {
    pub operations: Vec<DeliveryTarget>,
}

impl OutputPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an operation to the plan.
    pub fn with_operation(mut self, operation: DeliveryTarget) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Paths this plan writes.
    pub fn written_paths(&self) -> impl Iterator<Item = &Path> {
        self.operations.iter().filter_map(|op| match op {
            DeliveryTarget::WriteFile { path, .. } => Some(path.as_path()),
            _ => None,
        })
    }
}

/// A single output operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    /// Write content to a file, creating parent directories.
    WriteFile { path: PathBuf, content: String },
    CreateDirectory { path: PathBuf },
    /// Remove a generated file the current run no longer produces.
    RemoveFile { path: PathBuf },
}

impl DeliveryTarget {
    pub fn path(&self) -> &Path {
        match self {
            DeliveryTarget::WriteFile { path, .. }
            | DeliveryTarget::CreateDirectory { path }
            | DeliveryTarget::RemoveFile { path } => path,
        }
    }
}

/// Result of executing an output plan.
#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    pub completed: Vec<CompletedOperation>,
    pub failed: Vec<FailedOperation>,
    pub stats: ExecutionStats,
}

impl OutputReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_completed(mut self, operation: CompletedOperation) -> Self {
        self.stats.operations_completed += 1;
        self.stats.bytes_written += operation.bytes_written;
        if matches!(operation.operation, DeliveryTarget::RemoveFile { .. }) {
            self.stats.files_removed += 1;
        }
        self.completed.push(operation);
        self
    }

    pub fn with_failed(mut self, operation: FailedOperation) -> Self {
        self.stats.operations_failed += 1;
        self.failed.push(operation);
        self
    }

    /// Checks if all operations succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CompletedOperation {
    pub operation: DeliveryTarget,
    pub bytes_written: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone)]
pub struct FailedOperation {
    pub operation: DeliveryTarget,
    pub error: String,
}

/// Execution statistics.
#[derive(Debug, Clone, Default)]
pub struct ExecutionStats {
    pub operations_completed: usize,
    pub operations_failed: usize,
    pub bytes_written: usize,
    pub files_removed: usize,
    pub total_duration_ms: u64,
}
