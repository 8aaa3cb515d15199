// src/emit/shapes.rs
//! Struct emission for concrete objects, adaptive objects, shared common
//! fields and nested type objects.

use super::types::{serialize_fixed, FieldLayout};
use super::writer::CodeWriter;
use crate::error::AppError;
use crate::naming::{common_struct_name, data_struct_name, field_ident, needs_rename, COMMON_FIELD};
use crate::symbols::{AbstractObject, AdaptiveObject, ConcreteObject, Field, SymbolGraph};

const STRUCT_DERIVES: &str = "#[derive(Debug, Clone, PartialEq, Default, Deserialize)]";

/// Everything needed to write one struct and its `Serialize` impl.
struct StructShape<'a> {
    name: String,
    comment: String,
    /// `<Abstract>Common` struct embedded with `#[serde(flatten)]`.
    common: Option<String>,
    fields: Vec<&'a Field>,
    /// `(json key, struct name)` of a nested type object.
    nested: Option<(String, String)>,
    /// Expression yielding the live discriminator of an adaptive object.
    discriminator: String,
}

pub fn emit_concrete(
    w: &mut CodeWriter,
    graph: &SymbolGraph,
    object: &ConcreteObject,
) -> Result<(), AppError> {
    let common = match &object.parent {
        Some(parent) if !graph.common_fields(parent).is_empty() => Some(common_struct_name(parent)),
        _ => None,
    };
    let nested = match (&object.tag, &object.type_object) {
        (Some(tag), Some(_)) => Some((tag.value.clone(), data_struct_name(&object.name))),
        _ => None,
    };
    let mut comment = object.comment.clone();
    push_memberships(&mut comment, &object.unions);

    write_struct(
        w,
        &StructShape {
            name: object.name.clone(),
            comment,
            common,
            fields: object.fields.iter().collect(),
            nested: nested.clone(),
            discriminator: String::new(),
        },
    );

    if let (Some((key, data)), Some(type_object)) = (nested, &object.type_object) {
        w.blank();
        let comment = if type_object.comment.is_empty() {
            format!("Data of a [`{}`] held under `{}`.", object.name, key)
        } else {
            type_object.comment.clone()
        };
        write_struct(
            w,
            &StructShape {
                name: data,
                comment,
                common: None,
                fields: type_object.fields.iter().collect(),
                nested: None,
                discriminator: String::new(),
            },
        );
    }
    Ok(())
}

pub fn emit_adaptive(
    w: &mut CodeWriter,
    object: &AdaptiveObject,
) -> Result<(), AppError> {
    let key_field = object.fields.get(&object.discriminator_key).ok_or_else(|| {
        AppError::MissingDiscriminatorField {
            owner: object.name.clone(),
            key: object.discriminator_key.clone(),
        }
    })?;
    let discriminator = match key_field.fixed_value() {
        Some(value) => format!("{:?}", value),
        None => format!("self.{}", field_ident(key_field.name())),
    };

    let mut comment = object.comment.clone();
    push_memberships(&mut comment, &object.unions);
    let tags = object.tag_values();
    if !tags.is_empty() {
        let values: Vec<String> = tags.iter().map(|t| format!("`{:?}`", t)).collect();
        comment.push_str(&format!(
            "\n\nFields specific to one `{}` value ({}) are written only when it is current.",
            object.discriminator_key,
            values.join(", ")
        ));
    }

    write_struct(
        w,
        &StructShape {
            name: object.name.clone(),
            comment,
            common: None,
            fields: object.fields.iter().collect(),
            nested: None,
            discriminator,
        },
    );
    Ok(())
}

/// Emits `<Abstract>Common` when the abstract or an ancestor has shared fields.
pub fn emit_common(
    w: &mut CodeWriter,
    graph: &SymbolGraph,
    object: &AbstractObject,
) -> Result<bool, AppError> {
    let fields = graph.common_fields(&object.name);
    if fields.is_empty() {
        return Ok(false);
    }
    write_struct(
        w,
        &StructShape {
            name: common_struct_name(&object.name),
            comment: format!("Fields shared by every [`{}`] variant.", object.name),
            common: None,
            fields,
            nested: None,
            discriminator: String::new(),
        },
    );
    Ok(true)
}

fn push_memberships(comment: &mut String, unions: &[String]) {
    if !unions.is_empty() {
        let unions: Vec<String> = unions.iter().map(|u| format!("[`{}`]", u)).collect();
        comment.push_str(&format!("\n\nMember of {}.", unions.join(", ")));
    }
}

fn write_struct(w: &mut CodeWriter, shape: &StructShape<'_>) {
    let layouts: Vec<FieldLayout<'_>> = shape
        .fields
        .iter()
        .filter_map(|f| FieldLayout::of(f))
        .collect();

    let fixed: Vec<(&str, &str)> = shape
        .fields
        .iter()
        .filter_map(|f| f.fixed_value().map(|value| (f.name(), value)))
        .collect();

    w.doc(&shape.comment);
    w.line(STRUCT_DERIVES);
    w.block(format!("pub struct {}", shape.name), "", |w| {
        if let Some(common) = &shape.common {
            w.line("#[serde(flatten)]");
            w.line(format!("pub {}: {},", COMMON_FIELD, common));
        }
        for layout in &layouts {
            layout.declare(w);
        }
        for (name, value) in &fixed {
            w.doc(&format!("Always `{:?}`; any other value is rejected on decode.", value));
            w.line(format!(
                "#[serde(rename = {:?}, default, deserialize_with = \"{}::{}\")]",
                name,
                shape.name,
                fixed_checker(name)
            ));
            w.line(format!("pub {}: (),", fixed_marker(name)));
        }
        if let Some((key, data)) = &shape.nested {
            let ident = field_ident(key);
            if needs_rename(&ident, key) {
                w.line(format!("#[serde(rename = {:?})]", key));
            }
            w.line(format!("pub {}: {},", ident, data));
        }
    });
    w.blank();

    w.block(format!("impl Serialize for {}", shape.name), "", |w| {
        w.block(
            "fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>",
            "",
            |w| {
                w.line("let mut map = serializer.serialize_map(None)?;");
                w.line("self.serialize_fields(&mut map)?;");
                w.line("map.end()");
            },
        );
    });
    w.blank();

    w.block(format!("impl {}", shape.name), "", |w| {
        w.block(
            "pub(crate) fn serialize_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error>",
            "",
            |w| {
                if shape.common.is_some() {
                    w.line(format!("self.{}.serialize_fields(map)?;", COMMON_FIELD));
                }
                let mut stored = layouts.iter();
                for field in &shape.fields {
                    match field.fixed_value() {
                        Some(value) => serialize_fixed(w, field.name(), value),
                        None => {
                            if let Some(layout) = stored.next() {
                                layout.serialize(w, &shape.discriminator);
                            }
                        }
                    }
                }
                if let Some((key, _)) = &shape.nested {
                    w.line(format!(
                        "map.serialize_entry({:?}, &self.{})?;",
                        key,
                        field_ident(key)
                    ));
                }
                w.line("Ok(())");
            },
        );
        for (name, value) in &fixed {
            w.blank();
            w.block(
                format!(
                    "fn {}<'de, D: Deserializer<'de>>(deserializer: D) -> Result<(), D::Error>",
                    fixed_checker(name)
                ),
                "",
                |w| {
                    w.line(format!("runtime::expect_fixed(deserializer, {:?})", value));
                },
            );
        }
    });
}

/// Unit field that makes derived `Deserialize` check a fixed value.
fn fixed_marker(json_name: &str) -> String {
    format!("_{}", field_ident(json_name).trim_start_matches("r#"))
}

fn fixed_checker(json_name: &str) -> String {
    format!("check{}", fixed_marker(json_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{Builder, GlobalScope, TypeRef, Visibility};

    #[test]
    fn test_adaptive_struct_applies_the_visibility_mask() {
        let mut parent = AdaptiveObject::new("Parent", "type", "The parent of a page.");
        parent
            .add_field(Field::new("type", TypeRef::String, ""))
            .unwrap()
            .add_tagged_field("page_id", Field::new("page_id", TypeRef::String, ""))
            .unwrap()
            .add_field(
                Field::new("workspace", TypeRef::Boolean, "")
                    .with_visibility(Visibility::WhenDiscriminatorIs("workspace".to_string())),
            )
            .unwrap();

        let mut w = CodeWriter::new();
        emit_adaptive(&mut w, &parent).unwrap();
        let code = w.finish();

        assert!(code.contains("pub struct Parent {\n    pub r#type: String,\n"));
        assert!(code.contains("    #[serde(default)]\n    pub page_id: Option<String>,\n"));
        assert!(code.contains("if self.r#type == \"page_id\" {"));
        assert!(code.contains("if self.r#type == \"workspace\" {"));
        assert!(code.contains("map.serialize_entry(\"type\", &self.r#type)?;"));
    }

    #[test]
    fn test_adaptive_without_key_field_is_an_error() {
        let object = AdaptiveObject::new("Parent", "type", "");
        let mut w = CodeWriter::new();
        assert!(matches!(
            emit_adaptive(&mut w, &object),
            Err(AppError::MissingDiscriminatorField { .. })
        ));
    }

    #[test]
    fn test_fixed_fields_are_checked_on_decode() {
        let global = GlobalScope::new();
        let mut b = Builder::new("emoji", "memory:emoji", global.clone());
        b.add_concrete("Emoji", "An emoji.")
            .unwrap()
            .add_field(Field::fixed("type", "emoji", ""))
            .unwrap()
            .add_field(Field::new("emoji", TypeRef::String, ""))
            .unwrap();
        let (artifact, contribution) = b.finish();
        global.commit("emoji", contribution).unwrap();
        let graph = SymbolGraph::assemble(global.freeze(), vec![artifact]).unwrap();

        let mut w = CodeWriter::new();
        emit_concrete(&mut w, &graph, graph.get::<ConcreteObject>("Emoji").unwrap()).unwrap();
        let code = w.finish();

        assert!(code.contains(
            "    #[serde(rename = \"type\", default, deserialize_with = \"Emoji::check_type\")]\n    pub _type: (),\n"
        ));
        assert!(code.contains("fn check_type<'de, D: Deserializer<'de>>(deserializer: D)"));
        assert!(code.contains("runtime::expect_fixed(deserializer, \"emoji\")"));
        assert!(code.contains("map.serialize_entry(\"type\", \"emoji\")?;"));
    }
}
