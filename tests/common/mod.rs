// tests/common/mod.rs
//! Shared fixtures: replaying local copies as remote pages.

#![allow(dead_code)]

use notion2code::element::local::LocalCopy;
use notion2code::scrape::tokenizer::render_body;
use notion2code::{Element, MemorySource};

/// The elements a page is expected to contain.
pub fn expected_elements(copy: &LocalCopy) -> Vec<Element> {
    copy.elements().iter().map(|e| e.element.clone()).collect()
}

/// A source serving every page exactly as its local copy expects it.
pub fn faithful_source(copies: &[LocalCopy]) -> MemorySource {
    copies.iter().fold(MemorySource::new(), |source, copy| {
        source.with_body(copy.path(), &render_body(&expected_elements(copy)))
    })
}

/// A source serving `elements` for the page at `path`, on top of `source`.
pub fn with_page(source: MemorySource, path: &str, elements: &[Element]) -> MemorySource {
    source.with_body(path, &render_body(elements))
}

/// Fresh scratch directory under the temp dir, unique per test and process.
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("notion2code-it-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
