// src/pages/doc_text.rs
//! Small conversions from documentation prose to symbol-graph vocabulary.
//!
//! The reference is written for people, so property names carry markup
//! (`` `id`* ``), types are free text (`` `string` (UUIDv4) ``) and a few
//! entries contradict their own examples. Each conversion here is a pure
//! function; the contradictions are listed in [`KNOWN_QUIRKS`] and applied
//! explicitly by the page that hits them.

use crate::element::Parameter;
use crate::error::AppError;
use crate::symbols::{Field, TypeRef};

/// `` `id`* `` → `id`. Strips code ticks, the "always present" star and
/// stray escape backslashes.
pub fn normalize_property_name(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(['*', '\\', ' '])
        .trim_matches('`')
        .trim_end_matches(['*', '\\'])
        .trim()
        .to_string()
}

/// The constant a type label pins a field to: `` `"emoji"` `` → `emoji`.
pub fn literal_value(label: &str) -> Option<String> {
    let label = label.trim().trim_matches('`').trim();
    label
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .filter(|value| !value.is_empty() && !value.contains('"'))
        .map(str::to_string)
}

/// Maps a free-text type label to a field type.
///
/// Qualifiers in parentheses refine the base type: `(optional)` makes it
/// nullable and `(ISO 8601 date time)` marks a timestamp. `array of X`
/// and `X | null` are understood. Returns `None` for anything else.
pub fn parse_type_label(label: &str) -> Option<TypeRef> {
    let cleaned = label.replace('`', "").to_ascii_lowercase();
    let cleaned = cleaned.trim();

    if let Some(inner) = cleaned.strip_suffix("| null") {
        return parse_type_label(inner).map(TypeRef::nullable);
    }
    if let Some(inner) = cleaned
        .strip_prefix("array of ")
        .or_else(|| cleaned.strip_prefix("array of"))
    {
        return parse_type_label(inner).map(TypeRef::array);
    }

    let (base, qualifier) = match cleaned.split_once('(') {
        Some((base, rest)) => (base.trim(), rest.trim_end_matches(')').trim()),
        None => (cleaned, ""),
    };
    let base = match base {
        "string" | "string enum" => {
            if qualifier.contains("iso 8601") {
                TypeRef::DateTime
            } else {
                TypeRef::String
            }
        }
        "date" | "datetime" => TypeRef::DateTime,
        "number" | "float" => TypeRef::Number,
        "integer" | "int" => TypeRef::Integer,
        "boolean" | "bool" => TypeRef::Boolean,
        "object" | "json" => TypeRef::Json,
        _ => return None,
    };
    if qualifier.contains("optional") {
        Some(TypeRef::nullable(base))
    } else {
        Some(base)
    }
}

/// Text up to and including the first sentence-ending period.
pub fn first_sentence(text: &str) -> String {
    let text = text.trim();
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '.' {
            match chars.peek() {
                None => return text.to_string(),
                Some((_, next)) if next.is_whitespace() => return text[..=i].to_string(),
                Some(_) => {}
            }
        }
    }
    text.to_string()
}

/// Field described by one parameter row. A quoted literal type makes a
/// fixed field; anything else must parse with [`parse_type_label`].
pub fn parameter_field(parameter: &Parameter) -> Result<Field, AppError> {
    let name = normalize_property_name(&parameter.property);
    let comment = first_sentence(&parameter.description);
    if let Some(value) = literal_value(&parameter.type_label) {
        return Ok(Field::fixed(name, value, comment));
    }
    let type_ref = parse_type_label(&parameter.type_label).ok_or_else(|| {
        AppError::UnknownTypeLabel {
            property: name.clone(),
            label: parameter.type_label.clone(),
        }
    })?;
    Ok(Field::new(name, type_ref, comment))
}

/// A place where the reference contradicts itself or its examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirk {
    pub page: &'static str,
    pub subject: &'static str,
    pub note: &'static str,
}

pub const KNOWN_QUIRKS: &[Quirk] = &[
    Quirk {
        page: "property_value",
        subject: "people",
        note: "Documented as a plain array of users, but the property item endpoint paginates it.",
    },
    Quirk {
        page: "property_value",
        subject: "rollup.array",
        note: "Documented as an array of property values, but the examples omit their `id`; kept as raw JSON.",
    },
    Quirk {
        page: "user",
        subject: "bot",
        note: "The bot object's fields depend on the endpoint that returned it; kept as raw JSON.",
    },
];

pub fn quirk(page: &str, subject: &str) -> Option<&'static Quirk> {
    KNOWN_QUIRKS
        .iter()
        .find(|q| q.page == page && q.subject == subject)
}

/// `comment` followed by the quirk note for `subject`, when one is listed.
pub fn with_quirk(comment: &str, page: &str, subject: &str) -> String {
    match quirk(page, subject) {
        Some(q) => {
            log::debug!("[{}] applying known quirk for {}", page, subject);
            format!("{}\n\nKnown documentation quirk: {}", comment, q.note)
        }
        None => comment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_property_name() {
        assert_eq!(normalize_property_name("`id`*"), "id");
        assert_eq!(normalize_property_name("`object`\\*"), "object");
        assert_eq!(normalize_property_name(" `avatar_url` "), "avatar_url");
        assert_eq!(normalize_property_name("`person.email`"), "person.email");
    }

    #[test]
    fn test_parse_type_label() {
        assert_eq!(parse_type_label("`string` (UUIDv4)"), Some(TypeRef::String));
        assert_eq!(
            parse_type_label("`string` (optional)"),
            Some(TypeRef::nullable(TypeRef::String))
        );
        assert_eq!(
            parse_type_label("`string` (ISO 8601 date time)"),
            Some(TypeRef::DateTime)
        );
        assert_eq!(
            parse_type_label("array of `string`"),
            Some(TypeRef::array(TypeRef::String))
        );
        assert_eq!(
            parse_type_label("`number` | null"),
            Some(TypeRef::nullable(TypeRef::Number))
        );
        assert_eq!(parse_type_label("`boolean`"), Some(TypeRef::Boolean));
        assert_eq!(parse_type_label("Rich text"), None);
    }

    #[test]
    fn test_literal_types_become_fixed_fields() {
        let field = parameter_field(&Parameter::new(
            "`type`",
            "`\"emoji\"`",
            "The constant string `\"emoji\"` that represents the object type.",
            "`\"emoji\"`",
        ))
        .unwrap();
        assert_eq!(field.fixed_value(), Some("emoji"));
        assert_eq!(field.name(), "type");
    }

    #[test]
    fn test_unknown_type_label_names_the_property() {
        let err = parameter_field(&Parameter::new("`title`", "Rich text", "", "")).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(
            first_sentence("An emoji object contains information about an emoji character. It is most often used as an icon."),
            "An emoji object contains information about an emoji character."
        );
        assert_eq!(first_sentence("Version 1.2 is current"), "Version 1.2 is current");
        assert_eq!(first_sentence("No period"), "No period");
    }

    #[test]
    fn test_quirks_are_looked_up_by_page_and_subject() {
        assert!(quirk("property_value", "people").is_some());
        assert!(quirk("user", "people").is_none());
        assert!(with_quirk("Users.", "property_value", "people").contains("Known documentation quirk"));
    }
}
