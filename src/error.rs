// src/error.rs
//! Application error types with structured error handling.
//!
//! Each variant names one way a page translation can go wrong. Drift in the
//! documentation, inconsistencies in the authored translation rules and plain
//! I/O failures are kept apart so the operator knows which of the three needs
//! attention.

use std::fmt;
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Documentation page {url} returned HTTP {status}")]
    PageUnavailable { url: String, status: u16 },

    #[error("Could not extract documentation body from {url}: {reason}")]
    MalformedPage { url: String, reason: String },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template render error for template {name}: {message}")]
    TemplateRenderError { name: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output delivery failed: {}", failures.join("; "))]
    DeliveryFailed { failures: Vec<String> },

    // --- Documentation drift ---
    #[error(
        "[{page}] element #{index} differs from the local copy\n--- expected\n+++ actual\n{diff}"
    )]
    StructuralMismatch {
        page: String,
        index: usize,
        expected: String,
        actual: String,
        diff: String,
    },

    #[error("[{page}] documentation shrank: local copy has {expected} elements, remote has {found}")]
    DocumentationShrank {
        page: String,
        expected: usize,
        found: usize,
    },

    #[error("[{page}] {unhandled} elements remain unhandled; scaffold written for review")]
    DocumentationGrowth {
        page: String,
        unhandled: usize,
        scaffold: String,
    },

    // --- Translation-rule inconsistencies ---
    #[error("[{page}] local copy is malformed: {message}")]
    MalformedLocalCopy { page: String, message: String },

    #[error("Cannot map documented type {label:?} of {property} to a field type")]
    UnknownTypeLabel { property: String, label: String },

    #[error("Unresolved symbol: {name}")]
    UnresolvedSymbol { name: String },

    #[error("Symbol {name} is {actual}, expected {expected}")]
    WrongSymbolKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Symbol {name} was committed to the global scope by another page and is read-only here")]
    ReadOnlySymbol { name: String },

    #[error("Symbol {name} is already registered")]
    DuplicateSymbol { name: String },

    #[error("Field {field} is already declared on {owner}")]
    DuplicateField { owner: String, field: String },

    #[error("Fixed field {field} on {owner} is derived from its parent and must not be supplied again")]
    RedundantFixedField { owner: String, field: String },

    #[error("{owner} has no discriminator value to name a type object after")]
    TypeObjectWithoutTag { owner: String },

    #[error("{kind} {owner} has nothing to dispatch to")]
    EmptyDispatch { owner: String, kind: &'static str },

    #[error("{name} collides with a name generated for {generated_for}")]
    ReservedName { name: String, generated_for: String },

    #[error("Adaptive object {owner} declares no {key} field to read its discriminator from")]
    MissingDiscriminatorField { owner: String, key: String },

    #[error("Field {field} of {owner} depends on a discriminator, which only adaptive objects have")]
    MisplacedVisibility { owner: String, field: String },

    #[error("Cannot determine the {key} value of {variant} (variant of {owner}): unknown type")]
    AmbiguousDiscriminator {
        owner: String,
        variant: String,
        key: String,
    },

    #[error("{owner} dispatches {key}={value} to both {first} and {second}")]
    DuplicateDiscriminator {
        owner: String,
        key: String,
        value: String,
        first: String,
        second: String,
    },

    #[error("Union {name} already exists with discriminator {existing}, requested {requested}")]
    UnionKeyConflict {
        name: String,
        existing: String,
        requested: String,
    },

    #[error("Handler expected a {expected} element, got {actual}")]
    HandlerKindMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Unmarshal example for {target} does not round-trip: {reason}")]
    InvalidExample { target: String, reason: String },

    #[error("[{page}] handler for element #{index} failed: {source}")]
    Callback {
        page: String,
        index: usize,
        #[source]
        source: Box<AppError>,
    },

    #[error("{} page translation(s) failed:\n{}", failures.len(), PageFailure::list(failures))]
    PagesFailed { failures: Vec<PageFailure> },
}

impl AppError {
    /// Whether this failure means the documentation moved and the local copy
    /// needs a human update, as opposed to a bug in the translation rules.
    pub fn is_documentation_drift(&self) -> bool {
        match self {
            Self::StructuralMismatch { .. }
            | Self::DocumentationShrank { .. }
            | Self::DocumentationGrowth { .. } => true,
            Self::Callback { source, .. } => source.is_documentation_drift(),
            _ => false,
        }
    }
}

/// One page that failed to translate, kept for the aggregate report.
#[derive(Debug)]
pub struct PageFailure {
    pub page: String,
    pub error: AppError,
}

impl PageFailure {
    fn list(failures: &[PageFailure]) -> String {
        failures
            .iter()
            .map(|f| format!("  - {}", f))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for PageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.page, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drift_classification() {
        let drift = AppError::DocumentationShrank {
            page: "user".to_string(),
            expected: 4,
            found: 2,
        };
        assert!(drift.is_documentation_drift());

        let wrapped = AppError::Callback {
            page: "user".to_string(),
            index: 3,
            source: Box::new(AppError::UnresolvedSymbol {
                name: "User".to_string(),
            }),
        };
        assert!(!wrapped.is_documentation_drift());
    }

    #[test]
    fn test_aggregate_display_lists_every_page() {
        let err = AppError::PagesFailed {
            failures: vec![
                PageFailure {
                    page: "user".to_string(),
                    error: AppError::UnresolvedSymbol {
                        name: "Person".to_string(),
                    },
                },
                PageFailure {
                    page: "file".to_string(),
                    error: AppError::DocumentationGrowth {
                        page: "file".to_string(),
                        unhandled: 2,
                        scaffold: String::new(),
                    },
                },
            ],
        };
        let text = err.to_string();
        assert!(text.starts_with("2 page translation(s) failed"));
        assert!(text.contains("user: Unresolved symbol: Person"));
        assert!(text.contains("file: [file] 2 elements remain unhandled"));
    }
}
