// src/compare.rs
//! Lockstep comparison of a page's local copy against its remote elements.
//!
//! Comparison runs in two phases. [`plan`] walks both sequences and, when
//! every position matches, returns the ordered list of handlers to run; it
//! never touches a builder. [`TranslationPlan::apply`] then folds those
//! handlers over the page's [`Builder`] in document order. A page that fails
//! the first phase therefore leaves no trace in any scope.

use crate::element::local::{Handler, LocalCopy};
use crate::element::scaffold::render_scaffold;
use crate::element::Element;
use crate::error::AppError;
use crate::symbols::Builder;

/// One handler due to run, with the local element it was attached to.
pub struct PlannedStep<'a> {
    pub index: usize,
    pub element: &'a Element,
    handler: &'a Handler,
}

impl std::fmt::Debug for PlannedStep<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannedStep")
            .field("index", &self.index)
            .field("element", &self.element.kind_name())
            .finish()
    }
}

/// The handlers of a page whose local copy matched the remote exactly.
#[derive(Debug)]
pub struct TranslationPlan<'a> {
    page: &'a str,
    steps: Vec<PlannedStep<'a>>,
}

impl<'a> TranslationPlan<'a> {
    pub fn steps(&self) -> &[PlannedStep<'a>] {
        &self.steps
    }

    /// Runs every handler in order. The first failure stops the page and is
    /// reported with the index of the element that triggered it.
    pub fn apply(&self, builder: &mut Builder) -> Result<(), AppError> {
        for step in &self.steps {
            log::debug!(
                "[{}] running handler for element #{} ({})",
                self.page,
                step.index,
                step.element.kind_name()
            );
            (step.handler)(step.element, builder).map_err(|source| AppError::Callback {
                page: self.page.to_string(),
                index: step.index,
                source: Box::new(source),
            })?;
        }
        Ok(())
    }
}

/// Walks `local` against `remote` and collects the handlers to run.
pub fn plan<'a>(local: &'a LocalCopy, remote: &[Element]) -> Result<TranslationPlan<'a>, AppError> {
    let page = local.page();
    if let Some(message) = local.authoring_error() {
        return Err(AppError::MalformedLocalCopy {
            page: page.to_string(),
            message: message.to_string(),
        });
    }

    let mut steps = Vec::new();
    for (index, expected) in local.elements().iter().enumerate() {
        let actual = remote.get(index).ok_or_else(|| AppError::DocumentationShrank {
            page: page.to_string(),
            expected: local.len(),
            found: remote.len(),
        })?;
        if expected.element != *actual {
            return Err(mismatch(page, index, &expected.element, actual));
        }
        if let Some(handler) = &expected.handler {
            steps.push(PlannedStep {
                index,
                element: &expected.element,
                handler,
            });
        }
    }

    if remote.len() > local.len() {
        let unhandled = &remote[local.len()..];
        log::warn!(
            "[{}] {} new element(s) after #{}",
            page,
            unhandled.len(),
            local.len()
        );
        return Err(AppError::DocumentationGrowth {
            page: page.to_string(),
            unhandled: unhandled.len(),
            scaffold: render_scaffold(page, local.len(), unhandled),
        });
    }

    log::debug!("[{}] {} element(s) match, {} handler(s) planned", page, local.len(), steps.len());
    Ok(TranslationPlan { page, steps })
}

/// Both phases at once.
pub fn compare(local: &LocalCopy, remote: &[Element], builder: &mut Builder) -> Result<(), AppError> {
    plan(local, remote)?.apply(builder)
}

fn mismatch(page: &str, index: usize, expected: &Element, actual: &Element) -> AppError {
    let expected = expected.dump();
    let actual = actual.dump();
    let diff = line_diff(&expected, &actual);
    AppError::StructuralMismatch {
        page: page.to_string(),
        index,
        expected,
        actual,
        diff,
    }
}

/// Unified-style line diff: `-` for expected only, `+` for actual only.
pub fn line_diff(expected: &str, actual: &str) -> String {
    diff::lines(expected, actual)
        .into_iter()
        .map(|line| match line {
            diff::Result::Left(l) => format!("-{}", l),
            diff::Result::Both(l, _) => format!(" {}", l),
            diff::Result::Right(r) => format!("+{}", r),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
