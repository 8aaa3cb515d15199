// src/element/scaffold.rs
//! Stub local-copy code for documentation the generator has not seen yet.
//!
//! When a page grows, the unhandled trailing elements are rendered as
//! `LocalCopy` builder calls, grouped under the heading that introduces
//! them, so a human can paste them into the page module and attach handlers.

use super::Element;
use std::fmt::Write;

/// Renders the scaffold for `elements`, which start at position `offset` of
/// the remote page.
pub fn render_scaffold(page: &str, offset: usize, elements: &[Element]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "// Scaffold for page `{}`: {} new element(s) starting at #{}.",
        page,
        elements.len(),
        offset
    );
    let _ = writeln!(
        out,
        "// Append to the page's local copy and attach handlers where needed."
    );

    for element in elements {
        if let Element::Heading(h) = element {
            let _ = writeln!(out);
            let _ = writeln!(out, "    // --- {} ---", h.text);
        }
        let _ = writeln!(out, "    {}", builder_call(element));
    }
    out
}

/// The builder call that reproduces one element.
fn builder_call(element: &Element) -> String {
    match element {
        Element::Heading(h) => format!(".heading({:?})", h.text),
        Element::Paragraph(p) => format!(".paragraph({:?})", p.text),
        Element::Callout(c) => format!(".callout({:?}, {:?}, {:?})", c.kind, c.title, c.body),
        Element::ApiHeader(a) => format!(".api_header({:?})", a.title),
        Element::Image(i) => format!(".image({:?}, {:?})", i.url, i.caption),
        Element::Parameter(p) => format!(
            ".parameter(Parameter::new({:?}, {:?}, {:?}, {:?}))\n    // .on_parameter(|p, b| todo_handler(p, b))",
            p.property, p.type_label, p.description, p.example
        ),
        Element::CodeBlock(block) => {
            let codes = block
                .codes
                .iter()
                .map(|c| format!("Code::new({:?}, {:?}, {:?})", c.name, c.language, c.code))
                .collect::<Vec<_>>()
                .join(", ");
            format!(".code_block(CodeBlock::new(vec![{}]))", codes)
        }
    }
}
