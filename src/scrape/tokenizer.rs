// src/scrape/tokenizer.rs
//! Turns a documentation body into a flat sequence of [`Element`]s.
//!
//! The body mixes literal markdown with block annotations:
//!
//! ```text
//! [block:callout]
//! {"type": "info", "title": "", "body": "..."}
//! [/block]
//! ```
//!
//! Markdown contributes headings, fenced code and blank-line separated
//! paragraphs. Annotations contribute parameter rows, callouts, tabbed code,
//! images and API headers. Unknown annotation types are skipped.

use crate::element::{ApiHeader, Callout, Code, CodeBlock, Element, Heading, Image, Paragraph, Parameter};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

static BLOCK_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[block:([a-z-]+)\]$")
        .expect("Failed to compile block annotation regex - this is a bug in the code")
});

static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#{1,6})\s+(.*?)\s*#*$")
        .expect("Failed to compile heading regex - this is a bug in the code")
});

const BLOCK_CLOSE: &str = "[/block]";
const FENCE: &str = "```";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("line {line}: [block:{kind}] is never closed")]
    UnclosedBlock { line: usize, kind: String },

    #[error("line {line}: code fence is never closed")]
    UnclosedFence { line: usize },

    #[error("line {line}: [block:{kind}] holds invalid JSON: {reason}")]
    InvalidBlock {
        line: usize,
        kind: String,
        reason: String,
    },
}

/// Splits `body` into elements in document order.
pub fn tokenize(body: &str) -> Result<Vec<Element>, TokenizeError> {
    let lines: Vec<&str> = body.lines().collect();
    let mut elements = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();

        if let Some(kind) = BLOCK_OPEN.captures(line).and_then(|c| c.get(1)) {
            flush_paragraph(&mut paragraph, &mut elements);
            let kind = kind.as_str();
            let close = find_line(&lines, i + 1, |l| l.trim() == BLOCK_CLOSE).ok_or_else(|| {
                TokenizeError::UnclosedBlock {
                    line: i + 1,
                    kind: kind.to_string(),
                }
            })?;
            let json = lines[i + 1..close].join("\n");
            elements.extend(annotation(kind, &json, i + 1)?);
            i = close + 1;
        } else if let Some(info) = line.strip_prefix(FENCE) {
            flush_paragraph(&mut paragraph, &mut elements);
            let close = find_line(&lines, i + 1, |l| l.trim_start().starts_with(FENCE))
                .ok_or(TokenizeError::UnclosedFence { line: i + 1 })?;
            let (language, name) = match info.trim().split_once(char::is_whitespace) {
                Some((language, name)) => (language, name.trim()),
                None => (info.trim(), ""),
            };
            let code = lines[i + 1..close].join("\n");
            elements.push(Element::CodeBlock(CodeBlock::new(vec![Code::new(name, language, code)])));
            i = close + 1;
        } else if let Some(caps) = HEADING.captures(line) {
            flush_paragraph(&mut paragraph, &mut elements);
            let text = caps.get(2).map_or("", |m| m.as_str());
            elements.push(Element::Heading(Heading {
                text: text.to_string(),
            }));
            i += 1;
        } else if line.is_empty() {
            flush_paragraph(&mut paragraph, &mut elements);
            i += 1;
        } else {
            paragraph.push(line);
            i += 1;
        }
    }
    flush_paragraph(&mut paragraph, &mut elements);
    Ok(elements)
}

fn find_line(lines: &[&str], from: usize, pred: impl Fn(&str) -> bool) -> Option<usize> {
    (from..lines.len()).find(|&j| pred(lines[j]))
}

fn flush_paragraph(paragraph: &mut Vec<&str>, elements: &mut Vec<Element>) {
    if !paragraph.is_empty() {
        elements.push(Element::Paragraph(Paragraph {
            text: paragraph.join("\n"),
        }));
        paragraph.clear();
    }
}

// --- Annotations ---

#[derive(Deserialize)]
struct ParametersBlock {
    data: HashMap<String, Value>,
    #[serde(default)]
    cols: usize,
    #[serde(default)]
    rows: usize,
}

#[derive(Deserialize)]
struct CalloutBlock {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
}

#[derive(Deserialize)]
struct CodeAnnotation {
    codes: Vec<CodeEntry>,
}

#[derive(Deserialize)]
struct CodeEntry {
    #[serde(default)]
    code: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct ImageBlock {
    images: Vec<ImageEntry>,
}

#[derive(Deserialize)]
struct ImageEntry {
    /// `[url, file name, width, height, color]`
    #[serde(default)]
    image: Vec<Value>,
    #[serde(default)]
    caption: String,
}

#[derive(Deserialize)]
struct ApiHeaderBlock {
    #[serde(default)]
    title: String,
}

fn annotation(kind: &str, json: &str, line: usize) -> Result<Vec<Element>, TokenizeError> {
    let invalid = |e: serde_json::Error| TokenizeError::InvalidBlock {
        line,
        kind: kind.to_string(),
        reason: e.to_string(),
    };

    let elements = match kind {
        "parameters" => parameter_rows(serde_json::from_str(json).map_err(invalid)?),
        "callout" => {
            let c: CalloutBlock = serde_json::from_str(json).map_err(invalid)?;
            vec![Element::Callout(Callout {
                kind: c.kind,
                title: c.title,
                body: c.body,
            })]
        }
        "code" => {
            let c: CodeAnnotation = serde_json::from_str(json).map_err(invalid)?;
            let codes = c
                .codes
                .into_iter()
                .map(|e| Code::new(e.name, e.language, e.code))
                .collect();
            vec![Element::CodeBlock(CodeBlock::new(codes))]
        }
        "image" => {
            let block: ImageBlock = serde_json::from_str(json).map_err(invalid)?;
            block
                .images
                .into_iter()
                .map(|entry| {
                    let url = entry
                        .image
                        .first()
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                    Element::Image(Image {
                        url,
                        caption: entry.caption,
                    })
                })
                .collect()
        }
        "api-header" => {
            let h: ApiHeaderBlock = serde_json::from_str(json).map_err(invalid)?;
            vec![Element::ApiHeader(ApiHeader { title: h.title })]
        }
        other => {
            log::debug!("Skipping [block:{}] at line {}", other, line);
            Vec::new()
        }
    };
    Ok(elements)
}

/// Column of a parameter table, identified by its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Property,
    Type,
    Description,
    Example,
}

fn column_of(header: &str) -> Option<Column> {
    let header = header.trim().to_ascii_lowercase();
    match header.as_str() {
        "property" | "field" | "parameter" | "name" => Some(Column::Property),
        "type" => Some(Column::Type),
        "description" => Some(Column::Description),
        h if h.starts_with("example") => Some(Column::Example),
        _ => None,
    }
}

fn parameter_rows(table: ParametersBlock) -> Vec<Element> {
    let cell = |key: String| -> String {
        table
            .data
            .get(&key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string()
    };
    let columns: Vec<Option<Column>> = (0..table.cols)
        .map(|c| column_of(&cell(format!("h-{}", c))))
        .collect();

    (0..table.rows)
        .map(|r| {
            let mut row = Parameter::new("", "", "", "");
            for (c, column) in columns.iter().enumerate() {
                let value = cell(format!("{}-{}", r, c));
                match column {
                    Some(Column::Property) => row.property = value,
                    Some(Column::Type) => row.type_label = value,
                    Some(Column::Description) => row.description = value,
                    Some(Column::Example) => row.example = value,
                    None => {}
                }
            }
            Element::Parameter(row)
        })
        .collect()
}

/// Writes `elements` back out in body syntax, so that [`tokenize`] of the
/// result yields `elements` again. Adjacent parameter rows share one table.
pub fn render_body(elements: &[Element]) -> String {
    let mut chunks: Vec<String> = Vec::new();
    let mut rows: Vec<&Parameter> = Vec::new();

    for element in elements {
        if let Element::Parameter(p) = element {
            rows.push(p);
            continue;
        }
        if !rows.is_empty() {
            chunks.push(parameter_table(&rows));
            rows.clear();
        }
        chunks.push(match element {
            Element::Heading(h) => format!("## {}", h.text),
            Element::Paragraph(p) => p.text.clone(),
            Element::CodeBlock(block) => {
                let codes: Vec<Value> = block
                    .codes
                    .iter()
                    .map(|c| json!({ "code": c.code, "language": c.language, "name": c.name }))
                    .collect();
                block_annotation("code", &json!({ "codes": codes }))
            }
            Element::Callout(c) => block_annotation(
                "callout",
                &json!({ "type": c.kind, "title": c.title, "body": c.body }),
            ),
            Element::Image(i) => block_annotation(
                "image",
                &json!({ "images": [{ "image": [i.url], "caption": i.caption }] }),
            ),
            Element::ApiHeader(a) => block_annotation("api-header", &json!({ "title": a.title })),
            Element::Parameter(_) => continue,
        });
    }
    if !rows.is_empty() {
        chunks.push(parameter_table(&rows));
    }
    chunks.join("\n\n")
}

fn block_annotation(kind: &str, body: &Value) -> String {
    format!("[block:{}]\n{}\n{}", kind, body, BLOCK_CLOSE)
}

fn parameter_table(rows: &[&Parameter]) -> String {
    let mut data = serde_json::Map::new();
    for (c, header) in ["Property", "Type", "Description", "Example value"].iter().enumerate() {
        data.insert(format!("h-{}", c), json!(header));
    }
    for (r, row) in rows.iter().enumerate() {
        let cells = [&row.property, &row.type_label, &row.description, &row.example];
        for (c, cell) in cells.iter().enumerate() {
            data.insert(format!("{}-{}", r, c), json!(cell));
        }
    }
    block_annotation(
        "parameters",
        &json!({ "data": data, "cols": 4, "rows": rows.len() }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_headings_paragraphs_and_fences() {
        let body = "## Emoji object\n\nAn emoji object contains\ninformation about an emoji.\n\n```json Response\n{\"type\": \"emoji\"}\n```\n";
        let elements = tokenize(body).unwrap();
        assert_eq!(
            elements,
            vec![
                Element::Heading(Heading {
                    text: "Emoji object".to_string()
                }),
                Element::Paragraph(Paragraph {
                    text: "An emoji object contains\ninformation about an emoji.".to_string()
                }),
                Element::CodeBlock(CodeBlock::new(vec![Code::new(
                    "Response",
                    "json",
                    "{\"type\": \"emoji\"}"
                )])),
            ]
        );
    }

    #[test]
    fn test_parameter_table_rows_follow_headers() {
        let body = r#"[block:parameters]
{
  "data": {
    "h-0": "Field",
    "h-1": "Type",
    "h-2": "Description",
    "h-3": "Example value",
    "0-0": "`type`",
    "0-1": "`\"emoji\"`",
    "0-2": "The constant string `\"emoji\"`.",
    "0-3": "`\"emoji\"`",
    "1-0": "`emoji`",
    "1-1": "`string`",
    "1-2": "The emoji character.",
    "1-3": "`\"😻\"`"
  },
  "cols": 4,
  "rows": 2
}
[/block]"#;
        let elements = tokenize(body).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(
            elements[1],
            Element::Parameter(Parameter::new(
                "`emoji`",
                "`string`",
                "The emoji character.",
                "`\"😻\"`"
            ))
        );
    }

    #[test]
    fn test_callout_and_unknown_blocks() {
        let body = "[block:callout]\n{\"type\": \"info\", \"title\": \"Note\", \"body\": \"Careful.\"}\n[/block]\n[block:html]\n{\"html\": \"<br/>\"}\n[/block]\nAfter.";
        let elements = tokenize(body).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Careful.");
        assert_eq!(elements[1].text(), "After.");
    }

    #[test]
    fn test_tabbed_code_is_one_block() {
        let body = "[block:code]\n{\"codes\": [{\"code\": \"{}\", \"language\": \"json\", \"name\": \"Bot\"}, {\"code\": \"{}\", \"language\": \"json\"}]}\n[/block]";
        match &tokenize(body).unwrap()[0] {
            Element::CodeBlock(block) => {
                assert_eq!(block.codes.len(), 2);
                assert_eq!(block.codes[0].name, "Bot");
                assert_eq!(block.codes[1].name, "");
            }
            other => panic!("unexpected element: {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_block_is_an_error() {
        assert_eq!(
            tokenize("text\n[block:callout]\n{}"),
            Err(TokenizeError::UnclosedBlock {
                line: 2,
                kind: "callout".to_string()
            })
        );
        assert!(matches!(
            tokenize("```json\n{}"),
            Err(TokenizeError::UnclosedFence { line: 1 })
        ));
    }

    #[test]
    fn test_rendered_body_tokenizes_back() {
        let elements = vec![
            Element::ApiHeader(ApiHeader {
                title: "All users".to_string(),
            }),
            Element::Paragraph(Paragraph {
                text: "These fields are shared by all users.".to_string(),
            }),
            Element::Parameter(Parameter::new("`object`*", "`\"user\"`", "Always \"user\"", "`\"user\"`")),
            Element::Parameter(Parameter::new("`id`*", "`string` (UUID)", "Unique identifier.", "")),
            Element::CodeBlock(CodeBlock::new(vec![Code::json("{\n  \"object\": \"user\"\n}")])),
            Element::Callout(Callout {
                kind: "info".to_string(),
                title: String::new(),
                body: "Line one.\nLine two.".to_string(),
            }),
            Element::Image(Image {
                url: "https://files.readme.io/a.png".to_string(),
                caption: String::new(),
            }),
        ];
        assert_eq!(tokenize(&render_body(&elements)).unwrap(), elements);
    }
}
