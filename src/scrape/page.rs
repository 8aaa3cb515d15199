// src/scrape/page.rs
//! Unwrapping the documentation body from a reference page's HTML.
//!
//! Every reference page carries its content as a JSON envelope in the
//! `data-initial-props` attribute of the root element. The body we want is
//! the envelope's `doc.body` string.

use crate::constants::PAGE_PROPS_ATTRIBUTE;
use crate::error::AppError;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::{json, Value};

static PROPS_ELEMENT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!("[{}]", PAGE_PROPS_ATTRIBUTE))
        .expect("Failed to compile page props selector - this is a bug in the code")
});

/// Returns the markdown-like body of the page at `url`.
pub fn extract_body(html: &str, url: &str) -> Result<String, AppError> {
    let malformed = |reason: String| AppError::MalformedPage {
        url: url.to_string(),
        reason,
    };

    let document = Html::parse_document(html);
    let raw = document
        .select(&PROPS_ELEMENT)
        .find_map(|element| element.value().attr(PAGE_PROPS_ATTRIBUTE))
        .ok_or_else(|| malformed(format!("no {} attribute", PAGE_PROPS_ATTRIBUTE)))?;
    let props: Value = serde_json::from_str(raw)
        .map_err(|e| malformed(format!("page envelope is not JSON: {}", e)))?;

    props
        .pointer("/doc/body")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| malformed("page envelope has no doc.body string".to_string()))
}

/// Minimal HTML page carrying `body` the way the reference site does.
pub fn wrap_body(body: &str) -> String {
    let props = json!({ "doc": { "body": body } }).to_string();
    format!(
        "<!DOCTYPE html><html><body><div id=\"ssr-props\" {}=\"{}\"></div></body></html>",
        PAGE_PROPS_ATTRIBUTE,
        escape_attribute(&props)
    )
}

/// Attribute-value escaping for [`wrap_body`]; the parser decodes it back.
fn escape_attribute(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_body_from_attribute() {
        let body = "# Emoji object\n\nAn \"emoji\" & <more>.";
        let html = wrap_body(body);
        assert!(!html.contains("\"emoji\""));
        assert_eq!(extract_body(&html, "emoji-object").unwrap(), body);
    }

    #[test]
    fn test_numeric_and_named_entities_are_decoded() {
        let html = format!(
            "<div {}=\"{{&quot;doc&quot;:{{&quot;body&quot;:&quot;&#39;a&#x27; &amp;b &hellip; &eacute;&quot;}}}}\"></div>",
            PAGE_PROPS_ATTRIBUTE
        );
        assert_eq!(extract_body(&html, "user").unwrap(), "'a' &b \u{2026} \u{e9}");
    }

    #[test]
    fn test_missing_attribute_is_malformed() {
        let err = extract_body("<html></html>", "user").unwrap_err();
        assert!(matches!(err, AppError::MalformedPage { .. }));
    }

    #[test]
    fn test_envelope_without_body_is_malformed() {
        let html = format!(
            "<div {}=\"{}\"></div>",
            PAGE_PROPS_ATTRIBUTE,
            escape_attribute("{\"doc\":{}}")
        );
        assert!(extract_body(&html, "user")
            .unwrap_err()
            .to_string()
            .contains("doc.body"));
    }
}
