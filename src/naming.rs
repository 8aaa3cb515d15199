// src/naming.rs
//! Identifier conversions between documentation vocabulary and Rust names.

/// Words Rust reserves; a field named after one is emitted as a raw identifier.
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv",
    "typeof", "unsized", "virtual", "yield", "try", "gen",
];

/// Identifiers that cannot be raw (`r#self` is rejected by the compiler).
const NON_RAW_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

/// `rich_text` / `rich-text` / `rich text` → `RichText`.
pub fn pascal_case(input: &str) -> String {
    input
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// `PropertyValue` → `property_value`; already-snake input is left alone.
pub fn snake_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower = false;
    for c in input.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            prev_lower = false;
        }
    }
    out.trim_end_matches('_').to_string()
}

/// Rust identifier for a JSON field name.
pub fn field_ident(json_name: &str) -> String {
    let snake = snake_case(json_name);
    let ident = match snake.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{}", snake),
        Some(_) => snake,
        None => "_field".to_string(),
    };
    if NON_RAW_KEYWORDS.contains(&ident.as_str()) {
        format!("{}_", ident)
    } else if RUST_KEYWORDS.contains(&ident.as_str()) {
        format!("r#{}", ident)
    } else {
        ident
    }
}

/// Whether serde derives a different key than `json_name` for `ident`.
pub fn needs_rename(ident: &str, json_name: &str) -> bool {
    ident.trim_start_matches("r#") != json_name
}

/// Struct field holding the flattened `<Abstract>Common` of a variant.
pub const COMMON_FIELD: &str = "common";

/// Struct carrying the fields shared by every variant of `abstract_name`.
pub fn common_struct_name(abstract_name: &str) -> String {
    format!("{}Common", abstract_name)
}

/// Struct of the nested type object of `concrete_name`.
pub fn data_struct_name(concrete_name: &str) -> String {
    format!("{}Data", concrete_name)
}
