// src/emit/types.rs
//! Rust types and serde plumbing for individual fields.

use super::writer::CodeWriter;
use crate::naming::{field_ident, needs_rename};
use crate::symbols::{Field, TypeRef, Visibility};

/// The Rust spelling of a semantic type.
pub fn rust_type(type_ref: &TypeRef) -> String {
    match type_ref {
        TypeRef::String | TypeRef::DateTime => "String".to_string(),
        TypeRef::Integer => "i64".to_string(),
        TypeRef::Number => "f64".to_string(),
        TypeRef::Boolean => "bool".to_string(),
        TypeRef::Json => "serde_json::Value".to_string(),
        TypeRef::Named(name) => name.clone(),
        TypeRef::Array(inner) => format!("Vec<{}>", rust_type(inner)),
        TypeRef::Map(inner) => format!(
            "std::collections::BTreeMap<String, {}>",
            rust_type(inner)
        ),
        TypeRef::Nullable(inner) => format!("Option<{}>", rust_type(inner)),
    }
}

/// How one stored field is declared and written.
#[derive(Debug)]
pub struct FieldLayout<'a> {
    pub field: &'a Field,
    pub ident: String,
    pub rust_type: String,
}

impl<'a> FieldLayout<'a> {
    /// Layout of a stored field; fixed fields store nothing and yield `None`.
    pub fn of(field: &'a Field) -> Option<Self> {
        let type_ref = field.type_ref()?;
        let (base, is_option) = match (field, type_ref) {
            (Field::Interface(_), TypeRef::Named(name)) => (format!("Option<{}>", name), true),
            (_, TypeRef::Nullable(_)) => (rust_type(type_ref), true),
            _ => (rust_type(type_ref), false),
        };
        let wrapped = field.visibility().is_discriminator_bound() && !is_option;
        let rust_type = if wrapped {
            format!("Option<{}>", base)
        } else {
            base
        };
        Some(Self {
            field,
            ident: field_ident(field.name()),
            rust_type,
        })
    }

    fn json_name(&self) -> &str {
        self.field.name()
    }

    /// The struct field declaration, doc comment and serde attributes included.
    pub fn declare(&self, w: &mut CodeWriter) {
        w.doc(self.field.comment());
        let mut attrs = Vec::new();
        if needs_rename(&self.ident, self.json_name()) {
            attrs.push(format!("rename = {:?}", self.json_name()));
        }
        if !self.field.is_required() {
            attrs.push("default".to_string());
        }
        if !attrs.is_empty() {
            w.line(format!("#[serde({})]", attrs.join(", ")));
        }
        w.line(format!("pub {}: {},", self.ident, self.rust_type));
    }

    /// The statement writing this field into `map`. `discriminator` is the
    /// expression holding the owner's live discriminator value.
    pub fn serialize(&self, w: &mut CodeWriter, discriminator: &str) {
        let name = self.json_name();
        let ident = &self.ident;
        match self.field.visibility() {
            Visibility::Always => {
                w.line(format!("map.serialize_entry({:?}, &self.{})?;", name, ident));
            }
            Visibility::NonEmpty => {
                w.block(format!("if !runtime::is_empty(&self.{})", ident), "", |w| {
                    w.line(format!("map.serialize_entry({:?}, &self.{})?;", name, ident));
                });
            }
            Visibility::WhenDiscriminatorIs(value) => {
                let condition = format!("if {} == {:?}", discriminator, value);
                w.block(condition, "", |w| self.serialize_present(w));
            }
            Visibility::WhenDiscriminatorSet => {
                let condition = format!("if !{}.is_empty()", discriminator);
                w.block(condition, "", |w| self.serialize_present(w));
            }
        }
    }

    fn serialize_present(&self, w: &mut CodeWriter) {
        let name = self.json_name();
        w.block(format!("if let Some(value) = &self.{}", self.ident), "", |w| {
            w.line(format!("map.serialize_entry({:?}, value)?;", name));
        });
    }
}

/// The statement writing a fixed field.
pub fn serialize_fixed(w: &mut CodeWriter, name: &str, value: &str) {
    w.line(format!("map.serialize_entry({:?}, {:?})?;", name, value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_type_spelling() {
        assert_eq!(
            rust_type(&TypeRef::nullable(TypeRef::array(TypeRef::named("User")))),
            "Option<Vec<User>>"
        );
        assert_eq!(
            rust_type(&TypeRef::map(TypeRef::Number)),
            "std::collections::BTreeMap<String, f64>"
        );
    }

    #[test]
    fn test_interface_and_tagged_fields_become_optional() {
        let icon = Field::interface("icon", "FileOrEmoji", "");
        assert_eq!(FieldLayout::of(&icon).unwrap().rust_type, "Option<FileOrEmoji>");

        let tagged = Field::new("page_id", TypeRef::String, "")
            .with_visibility(Visibility::WhenDiscriminatorIs("page_id".to_string()));
        let layout = FieldLayout::of(&tagged).unwrap();
        assert_eq!(layout.rust_type, "Option<String>");

        assert!(FieldLayout::of(&Field::fixed("type", "emoji", "")).is_none());
    }

    #[test]
    fn test_declaration_renames_and_defaults() {
        let field = Field::new("type", TypeRef::String, "Type of the user.").omit_when_empty();
        let mut w = CodeWriter::new();
        FieldLayout::of(&field).unwrap().declare(&mut w);
        assert_eq!(
            w.finish(),
            "/// Type of the user.\n#[serde(default)]\npub r#type: String,\n"
        );

        let field = Field::new("self", TypeRef::Boolean, "");
        let mut w = CodeWriter::new();
        FieldLayout::of(&field).unwrap().declare(&mut w);
        assert_eq!(w.finish(), "#[serde(rename = \"self\")]\npub self_: bool,\n");
    }

    #[test]
    fn test_tagged_field_serialization_checks_the_discriminator() {
        let field = Field::new("external", TypeRef::Json, "")
            .with_visibility(Visibility::WhenDiscriminatorIs("external".to_string()));
        let mut w = CodeWriter::new();
        FieldLayout::of(&field)
            .unwrap()
            .serialize(&mut w, "self.r#type");
        assert_eq!(
            w.finish(),
            concat!(
                "if self.r#type == \"external\" {\n",
                "    if let Some(value) = &self.external {\n",
                "        map.serialize_entry(\"external\", value)?;\n",
                "    }\n",
                "}\n"
            )
        );
    }
}
