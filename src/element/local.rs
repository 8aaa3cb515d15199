// src/element/local.rs
//! The curated local copy of a documentation page.
//!
//! A local copy is the version-controlled snapshot of what a page is expected
//! to say, with handlers attached to the elements that carry information the
//! generator needs. It is authored with a small builder:
//!
//! ```text
//! LocalCopy::new("emoji", "emoji-object")
//!     .heading("Emoji object")
//!     .paragraph("An emoji object contains information about an emoji character.")
//!     .on_text(|text, b| { b.add_concrete("Emoji", text)?; Ok(()) })
//! ```

use super::{ApiHeader, Callout, Code, CodeBlock, Element, Heading, Image, Paragraph, Parameter};
use crate::error::AppError;
use crate::symbols::Builder;

/// Translation callback attached to a local element.
pub type Handler = Box<dyn Fn(&Element, &mut Builder) -> Result<(), AppError> + Send + Sync>;

/// An expected element, optionally paired with the handler that translates it.
pub struct LocalElement {
    pub element: Element,
    pub handler: Option<Handler>,
}

impl std::fmt::Debug for LocalElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalElement")
            .field("element", &self.element)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// The expected element sequence of one documentation page.
#[derive(Debug)]
pub struct LocalCopy {
    page: String,
    path: String,
    elements: Vec<LocalElement>,
    authoring_error: Option<String>,
}

impl LocalCopy {
    /// Starts a local copy for `page`, fetched from `path` under the docs base URL.
    pub fn new(page: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            path: path.into(),
            elements: Vec::new(),
            authoring_error: None,
        }
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn elements(&self) -> &[LocalElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// A mistake made while authoring this copy, such as a handler attached
    /// before any element or two handlers on one element.
    pub fn authoring_error(&self) -> Option<&str> {
        self.authoring_error.as_deref()
    }

    // --- Elements ---

    pub fn element(mut self, element: Element) -> Self {
        self.elements.push(LocalElement {
            element,
            handler: None,
        });
        self
    }

    pub fn heading(self, text: impl Into<String>) -> Self {
        self.element(Element::Heading(Heading { text: text.into() }))
    }

    pub fn paragraph(self, text: impl Into<String>) -> Self {
        self.element(Element::Paragraph(Paragraph { text: text.into() }))
    }

    pub fn code_block(self, block: CodeBlock) -> Self {
        self.element(Element::CodeBlock(block))
    }

    /// Shorthand for a block holding a single untitled JSON snippet.
    pub fn json(self, code: impl Into<String>) -> Self {
        self.code_block(CodeBlock::new(vec![Code::json(code)]))
    }

    pub fn callout(
        self,
        kind: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.element(Element::Callout(Callout {
            kind: kind.into(),
            title: title.into(),
            body: body.into(),
        }))
    }

    pub fn parameter(self, parameter: Parameter) -> Self {
        self.element(Element::Parameter(parameter))
    }

    pub fn api_header(self, title: impl Into<String>) -> Self {
        self.element(Element::ApiHeader(ApiHeader {
            title: title.into(),
        }))
    }

    pub fn image(self, url: impl Into<String>, caption: impl Into<String>) -> Self {
        self.element(Element::Image(Image {
            url: url.into(),
            caption: caption.into(),
        }))
    }

    // --- Handlers, attached to the most recent element ---

    /// Attaches a handler that receives the raw element.
    pub fn output<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Element, &mut Builder) -> Result<(), AppError> + Send + Sync + 'static,
    {
        let index = self.elements.len();
        let problem = match self.elements.last_mut() {
            Some(last) if last.handler.is_none() => {
                last.handler = Some(Box::new(handler));
                None
            }
            Some(_) => Some(format!(
                "element #{} of page {} already has a handler",
                index - 1,
                self.page
            )),
            None => Some(format!(
                "handler attached before any element on page {}",
                self.page
            )),
        };
        if let Some(message) = problem {
            self.record_authoring_error(message);
        }
        self
    }

    /// Attaches a handler receiving the element's prose (heading, paragraph,
    /// callout body or API header title).
    pub fn on_text<F>(self, handler: F) -> Self
    where
        F: Fn(&str, &mut Builder) -> Result<(), AppError> + Send + Sync + 'static,
    {
        self.output(move |element, builder| match element {
            Element::Heading(_)
            | Element::Paragraph(_)
            | Element::Callout(_)
            | Element::ApiHeader(_) => handler(element.text(), builder),
            other => Err(AppError::HandlerKindMismatch {
                expected: "text",
                actual: other.kind_name(),
            }),
        })
    }

    pub fn on_parameter<F>(self, handler: F) -> Self
    where
        F: Fn(&Parameter, &mut Builder) -> Result<(), AppError> + Send + Sync + 'static,
    {
        self.output(move |element, builder| match element {
            Element::Parameter(p) => handler(p, builder),
            other => Err(AppError::HandlerKindMismatch {
                expected: "parameter",
                actual: other.kind_name(),
            }),
        })
    }

    pub fn on_code<F>(self, handler: F) -> Self
    where
        F: Fn(&CodeBlock, &mut Builder) -> Result<(), AppError> + Send + Sync + 'static,
    {
        self.output(move |element, builder| match element {
            Element::CodeBlock(c) => handler(c, builder),
            other => Err(AppError::HandlerKindMismatch {
                expected: "code block",
                actual: other.kind_name(),
            }),
        })
    }

    fn record_authoring_error(&mut self, message: String) {
        if self.authoring_error.is_none() {
            self.authoring_error = Some(message);
        }
    }
}
