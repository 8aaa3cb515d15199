// src/pipeline.rs
//! Page translation and the run that ties it to emission.
//!
//! Every page is an independent task: fetch, tokenize, compare against the
//! local copy, build, then commit its global contribution. Tasks run
//! concurrently and share only the [`GlobalScope`]. Once all of them have
//! finished, a single sequential pass assembles the graph and emits code.
//! Any failed page suppresses emission but every failure is reported.

use crate::compare::compare;
use crate::config::GeneratorConfig;
use crate::element::local::LocalCopy;
use crate::emit::{emit, GeneratedFile};
use crate::error::{AppError, PageFailure};
use crate::output::{deliver, plan_generated_output, plan_scaffold, OutputReport};
use crate::scrape::{fetch_elements, DocumentSource};
use crate::symbols::{Builder, GlobalScope, PageArtifact, SymbolGraph};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;

/// Translates one page and commits its global contribution.
///
/// Nothing reaches `global` unless the whole page succeeded.
pub async fn translate_page(
    copy: &LocalCopy,
    source: &dyn DocumentSource,
    global: &GlobalScope,
) -> Result<PageArtifact, AppError> {
    let url = source.url_for(copy.path());
    log::info!("[{}] translating {}", copy.page(), url);

    let remote = fetch_elements(source, copy.path()).await?;
    let mut builder = Builder::new(copy.page(), url, global.clone());
    compare(copy, &remote, &mut builder)?;

    let (artifact, contribution) = builder.finish();
    global.commit(copy.page(), contribution)?;
    log::info!(
        "[{}] {} symbol(s), {} example(s)",
        copy.page(),
        artifact.symbols.len(),
        artifact.tests.len()
    );
    Ok(artifact)
}

/// Everything the page tasks produced, successful or not.
#[derive(Debug)]
pub struct TranslationOutcome {
    pub global: GlobalScope,
    pub artifacts: Vec<PageArtifact>,
    pub failures: Vec<PageFailure>,
}

impl TranslationOutcome {
    /// Assembles the graph, or reports every failed page.
    pub fn into_graph(self) -> Result<SymbolGraph, AppError> {
        if !self.failures.is_empty() {
            return Err(AppError::PagesFailed {
                failures: self.failures,
            });
        }
        SymbolGraph::assemble(self.global.freeze(), self.artifacts)
    }
}

/// Runs page translations with bounded concurrency.
pub struct Translator {
    source: Arc<dyn DocumentSource>,
    concurrency: usize,
}

impl Translator {
    pub fn new(source: Arc<dyn DocumentSource>, concurrency: usize) -> Self {
        Self {
            source,
            concurrency: concurrency.max(1),
        }
    }

    /// Translates every page against a fresh global scope.
    pub async fn translate_all(&self, copies: Vec<LocalCopy>) -> TranslationOutcome {
        self.translate_into(copies, GlobalScope::new()).await
    }

    /// Translates every page against `global`.
    pub async fn translate_into(&self, copies: Vec<LocalCopy>, global: GlobalScope) -> TranslationOutcome {
        log::info!(
            "Translating {} page(s), {} at a time",
            copies.len(),
            self.concurrency
        );

        let results: Vec<(String, Result<PageArtifact, AppError>)> = stream::iter(copies)
            .map(|copy| {
                let source = Arc::clone(&self.source);
                let global = global.clone();
                async move {
                    let result = translate_page(&copy, source.as_ref(), &global).await;
                    (copy.page().to_string(), result)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut artifacts = Vec::new();
        let mut failures = Vec::new();
        for (page, result) in results {
            match result {
                Ok(artifact) => artifacts.push(artifact),
                Err(error) => {
                    log::error!("[{}] translation failed: {}", page, error);
                    failures.push(PageFailure { page, error });
                }
            }
        }
        failures.sort_by(|a, b| a.page.cmp(&b.page));

        TranslationOutcome {
            global,
            artifacts,
            failures,
        }
    }
}

/// What a successful run wrote.
#[derive(Debug)]
pub struct RunSummary {
    pub pages: usize,
    pub symbols: usize,
    pub files: Vec<GeneratedFile>,
    pub report: OutputReport,
}

/// Translates the configured pages and writes the generated sources.
///
/// Scaffolds for pages whose documentation grew are written even when the
/// run fails, so the operator has something to review.
pub async fn run(
    config: &GeneratorConfig,
    source: Arc<dyn DocumentSource>,
    copies: Vec<LocalCopy>,
) -> Result<RunSummary, AppError> {
    let pages = copies.len();
    let translator = Translator::new(source, config.concurrency);
    let outcome = translator.translate_all(copies).await;

    write_scaffolds(&config.review_dir, &outcome.failures)?;

    let graph = outcome.into_graph()?;
    let files = emit(&graph)?;
    let plan = plan_generated_output(&config.output_dir, &files)?;
    let report = deliver(plan);
    if !report.is_success() {
        return Err(AppError::DeliveryFailed {
            failures: report.failed.iter().map(|f| f.error.clone()).collect(),
        });
    }

    Ok(RunSummary {
        pages,
        symbols: graph.symbols().count(),
        files,
        report,
    })
}

/// Writes the scaffold of every page that failed with documentation growth.
fn write_scaffolds(review_dir: &Path, failures: &[PageFailure]) -> Result<(), AppError> {
    for failure in failures {
        if let AppError::DocumentationGrowth { page, scaffold, .. } = &failure.error {
            let report = deliver(plan_scaffold(review_dir, page, scaffold));
            if !report.is_success() {
                return Err(AppError::DeliveryFailed {
                    failures: report.failed.iter().map(|f| f.error.clone()).collect(),
                });
            }
            log::warn!(
                "[{}] scaffold for unhandled elements written to {}",
                page,
                review_dir.join(format!("{}.rs", page)).display()
            );
        }
    }
    Ok(())
}
