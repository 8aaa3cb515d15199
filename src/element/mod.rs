// src/element/mod.rs
//! Documentation elements: the facts a reference page is made of.
//!
//! Elements are immutable and compared structurally: two elements are equal
//! exactly when every textual field matches. The same vocabulary describes
//! both the freshly tokenized remote page and the curated local copy; only
//! the local copy pairs elements with handlers (see [`local`]).

pub mod local;
pub mod scaffold;

use serde::Serialize;

/// One fact extracted from a documentation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Heading(Heading),
    Paragraph(Paragraph),
    CodeBlock(CodeBlock),
    Callout(Callout),
    Parameter(Parameter),
    ApiHeader(ApiHeader),
    Image(Image),
}

impl Element {
    /// Short name of the element kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Heading(_) => "heading",
            Element::Paragraph(_) => "paragraph",
            Element::CodeBlock(_) => "code block",
            Element::Callout(_) => "callout",
            Element::Parameter(_) => "parameter",
            Element::ApiHeader(_) => "api header",
            Element::Image(_) => "image",
        }
    }

    /// The prose carried by text-like elements; empty for structured ones.
    pub fn text(&self) -> &str {
        match self {
            Element::Heading(h) => &h.text,
            Element::Paragraph(p) => &p.text,
            Element::Callout(c) => &c.body,
            Element::ApiHeader(a) => &a.title,
            Element::CodeBlock(_) | Element::Parameter(_) | Element::Image(_) => "",
        }
    }

    /// Multi-line dump used on both sides of a mismatch diagnostic.
    pub fn dump(&self) -> String {
        format!("{:#?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub text: String,
}

/// A fenced code block, or a tabbed group of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub codes: Vec<Code>,
}

impl CodeBlock {
    pub fn new(codes: Vec<Code>) -> Self {
        Self { codes }
    }

    /// Codes written in the given language, in document order.
    pub fn in_language<'a>(&'a self, language: &'a str) -> impl Iterator<Item = &'a Code> + 'a {
        self.codes.iter().filter(move |c| c.language == language)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Code {
    pub name: String,
    pub language: String,
    pub code: String,
}

impl Code {
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            code: code.into(),
        }
    }

    /// A JSON snippet with no tab name, the common case in the reference.
    pub fn json(code: impl Into<String>) -> Self {
        Self::new("", "json", code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Callout {
    pub kind: String,
    pub title: String,
    pub body: String,
}

/// One row of a parameter table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub property: String,
    pub type_label: String,
    pub description: String,
    pub example: String,
}

impl Parameter {
    pub fn new(
        property: impl Into<String>,
        type_label: impl Into<String>,
        description: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            property: property.into(),
            type_label: type_label.into(),
            description: description.into(),
            example: example.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiHeader {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub url: String,
    pub caption: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_structural() {
        let a = Element::Parameter(Parameter::new("type", "string", "Always \"user\"", "\"user\""));
        let b = Element::Parameter(Parameter::new("type", "string", "Always \"user\"", "\"user\""));
        let c = Element::Parameter(Parameter::new("type", "string", "Always \"user\" ", "\"user\""));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_text_of_structured_elements_is_empty() {
        let code = Element::CodeBlock(CodeBlock::new(vec![Code::json("{}")]));
        assert_eq!(code.text(), "");
        assert_eq!(code.kind_name(), "code block");
    }

    #[test]
    fn test_in_language_filters_tabs() {
        let block = CodeBlock::new(vec![
            Code::new("curl", "curl", "curl ..."),
            Code::json("{\"a\":1}"),
            Code::new("Response", "json", "{\"b\":2}"),
        ]);
        let json: Vec<_> = block.in_language("json").map(|c| c.name.as_str()).collect();
        assert_eq!(json, vec!["", "Response"]);
    }
}
