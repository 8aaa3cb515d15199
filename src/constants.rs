// src/constants.rs
//! Domain constants that define the operational boundaries of the generator.
//!
//! Reading these constants should tell you where the documentation lives,
//! where generated code lands and how the generator recognises its own
//! output.

// ---------------------------------------------------------------------------
// Documentation source
// ---------------------------------------------------------------------------

/// Root of Notion's public API reference.
pub const NOTION_DOCS_BASE_URL: &str = "https://developers.notion.com/reference/";

/// Environment variable that overrides [`NOTION_DOCS_BASE_URL`].
pub const DOCS_BASE_URL_ENV: &str = "NOTION_DOCS_BASE_URL";

/// DOM attribute carrying the JSON page envelope on every reference page.
pub const PAGE_PROPS_ATTRIBUTE: &str = "data-initial-props";

/// Seconds before a documentation fetch is abandoned.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Upper bound on concurrently translated pages.
pub const MAX_PAGE_CONCURRENCY: usize = 32;

// ---------------------------------------------------------------------------
// Generated output
// ---------------------------------------------------------------------------

/// First line of every generated file. Files carrying it are owned by the
/// generator and may be removed when a run no longer produces them.
pub const GENERATED_MARKER: &str = "// Code generated by notion2code. DO NOT EDIT.";

/// Module holding symbols shared across documentation pages.
pub const GLOBAL_MODULE: &str = "global";

/// Module holding the serde helpers every generated file relies on.
pub const RUNTIME_MODULE: &str = "runtime";

/// Default directory for generated sources.
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// Default directory for scaffolds awaiting human review.
pub const DEFAULT_REVIEW_DIR: &str = "review";
