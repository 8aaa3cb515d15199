// src/emit/mod.rs
//! Rust source emission for a frozen [`SymbolGraph`].
//!
//! Output is a self-contained module directory: `mod.rs` wires everything
//! together, `runtime.rs` carries the serde helpers, `global.rs` holds the
//! cross-page symbols and every page gets its own file plus a round-trip test
//! file when it recorded examples. Emission only reads the graph, so the same
//! graph always yields byte-identical files.

mod dispatch;
mod shapes;
mod templates;
mod types;
mod writer;

pub use templates::Templates;
pub use types::rust_type;
pub use writer::CodeWriter;

use crate::constants::{GENERATED_MARKER, RUNTIME_MODULE};
use crate::error::AppError;
use crate::naming::snake_case;
use crate::symbols::{Module, Symbol, SymbolGraph};
use std::path::PathBuf;

/// One file of generated output, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl GeneratedFile {
    fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }
}

/// Renders every module of `graph`.
pub fn emit(graph: &SymbolGraph) -> Result<Vec<GeneratedFile>, AppError> {
    let templates = Templates::load()?;
    let mut files = Vec::new();
    let mut module_names = Vec::new();
    let mut test_modules = Vec::new();

    for module in graph.modules() {
        let name = snake_case(&module.name);
        files.push(GeneratedFile::new(
            format!("{}.rs", name),
            emit_module(graph, module)?,
        ));
        log::debug!("Emitted module {} ({} symbol(s))", name, module.symbols.len());

        if !module.tests.is_empty() {
            let test_name = format!("{}_tests", name);
            let source = module.source_url.as_deref().unwrap_or_default();
            files.push(GeneratedFile::new(
                format!("{}.rs", test_name),
                templates.tests(source, &module.tests)?,
            ));
            test_modules.push(test_name);
        }
        module_names.push(name);
    }

    files.push(GeneratedFile::new(
        format!("{}.rs", RUNTIME_MODULE),
        templates.runtime()?,
    ));
    files.push(GeneratedFile::new(
        "mod.rs",
        templates.module_index(&module_names, &test_modules)?,
    ));

    log::info!("Emitted {} file(s)", files.len());
    Ok(files)
}

/// Source of one module file.
pub fn emit_module(graph: &SymbolGraph, module: &Module) -> Result<String, AppError> {
    let mut w = CodeWriter::new();
    w.line(GENERATED_MARKER);
    match &module.source_url {
        Some(url) => w.line(format!("//! Generated from <{}>.", url)),
        None => w.line("//! Symbols shared across documentation pages."),
    };
    w.raw(MODULE_PRELUDE);

    for name in &module.symbols {
        w.blank();
        match graph.symbol(name)? {
            Symbol::Concrete(object) => shapes::emit_concrete(&mut w, graph, object)?,
            Symbol::Adaptive(object) => shapes::emit_adaptive(&mut w, object)?,
            Symbol::Abstract(object) => {
                if shapes::emit_common(&mut w, graph, object)? {
                    w.blank();
                }
                dispatch::emit_dispatcher(&mut w, graph, &object.name, &object.comment, &object.variants)?;
            }
            Symbol::Union(union) => {
                dispatch::emit_dispatcher(&mut w, graph, &union.name, &union.comment, &union.members)?;
            }
        }
    }
    Ok(w.finish())
}

const MODULE_PRELUDE: &str = "\
#![allow(clippy::all, unused_imports)]

use super::runtime;
use super::*;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
";
