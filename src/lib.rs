// src/lib.rs
//! notion2code library: generates a typed serde model of the Notion API by
//! walking Notion's API reference pages.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `PageFailure`, `CodecError`
//! - **Configuration**: `CommandLineInput`, `GeneratorConfig`
//! - **Elements**: `Element`, `LocalCopy` and the scaffold renderer
//! - **Scraping**: `DocumentSource`, `HttpSource`, `MemorySource`, tokenizer
//! - **Symbols**: `Builder`, `SymbolGraph` and the object taxonomy
//! - **Codec and emission**: the dynamic codec and the Rust emitter
//! - **Pipeline**: `translate_page`, `Translator`, `run`

pub mod codec;
pub mod compare;
pub mod config;
pub mod constants;
pub mod element;
pub mod emit;
pub mod error;
pub mod naming;
pub mod output;
pub mod pages;
pub mod pipeline;
pub mod scrape;
pub mod symbols;

// --- Error Handling ---
pub use crate::codec::CodecError;
pub use crate::error::{AppError, PageFailure};

// --- Configuration ---
pub use crate::config::{CommandLineInput, GeneratorConfig};

// --- Elements ---
pub use crate::element::local::LocalCopy;
pub use crate::element::Element;

// --- Scraping ---
pub use crate::scrape::{DocumentSource, HttpSource, MemorySource};

// --- Symbols ---
pub use crate::symbols::{
    AbstractObject, AdaptiveObject, Builder, ConcreteObject, Field, GlobalScope, SymbolGraph,
    TypeRef, UnionObject,
};

// --- Codec and Emission ---
pub use crate::codec::{decode, encode, json_equivalent, round_trip, DynamicValue};
pub use crate::emit::{emit, GeneratedFile};

// --- Pipeline ---
pub use crate::compare::{compare, plan, TranslationPlan};
pub use crate::pipeline::{run, translate_page, RunSummary, TranslationOutcome, Translator};
