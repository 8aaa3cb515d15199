// src/emit/dispatch.rs
//! Enum emission for abstracts and unions, with discriminator dispatch.

use super::writer::CodeWriter;
use crate::error::AppError;
use crate::symbols::{DispatchTable, SymbolGraph};

/// Writes the enum, its `From` conversions and both serde impls.
///
/// `members` are the enum variants in declaration order (variants or union
/// members, sorted by name). Decoding reads only the discriminator from the
/// buffered JSON value and hands the whole value to the matching member.
pub fn emit_dispatcher(
    w: &mut CodeWriter,
    graph: &SymbolGraph,
    name: &str,
    comment: &str,
    members: &[String],
) -> Result<(), AppError> {
    let table = graph.table(name)?;

    let mut doc = comment.to_string();
    if !doc.is_empty() {
        doc.push_str("\n\n");
    }
    doc.push_str(&format!("Dispatches on `{}`:", table.key));
    for entry in &table.entries {
        doc.push_str(&format!("\n- `{:?}`: [`{}`]", entry.value, entry.member));
    }

    w.doc(&doc);
    w.line("#[derive(Debug, Clone, PartialEq)]");
    w.block(format!("pub enum {}", name), "", |w| {
        for member in members {
            w.line(format!("{}({}),", member, member));
        }
    });

    for member in members {
        w.blank();
        w.block(format!("impl From<{}> for {}", member, name), "", |w| {
            w.block(format!("fn from(value: {}) -> Self", member), "", |w| {
                w.line(format!("Self::{}(value)", member));
            });
        });
    }

    w.blank();
    write_serialize(w, name, members);
    w.blank();
    write_deserialize(w, name, table);
    Ok(())
}

fn write_serialize(w: &mut CodeWriter, name: &str, members: &[String]) {
    w.block(format!("impl Serialize for {}", name), "", |w| {
        w.block(
            "fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>",
            "",
            |w| {
                w.block("match self", "", |w| {
                    for member in members {
                        w.line(format!("Self::{}(value) => value.serialize(serializer),", member));
                    }
                });
            },
        );
    });
}

fn write_deserialize(w: &mut CodeWriter, name: &str, table: &DispatchTable) {
    w.block(format!("impl<'de> Deserialize<'de> for {}", name), "", |w| {
        w.block(
            "fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error>",
            "",
            |w| {
                w.line("let value = serde_json::Value::deserialize(deserializer)?;");
                w.line(format!(
                    "let tag = runtime::discriminator(&value, {:?}).map_err(<D::Error as serde::de::Error>::custom)?;",
                    table.key
                ));
                w.block("match tag", "", |w| {
                    for entry in &table.entries {
                        w.line(format!(
                            "{:?} => {}::deserialize(&value).map(Self::{}).map_err(<D::Error as serde::de::Error>::custom),",
                            entry.value, entry.member, entry.member
                        ));
                    }
                    w.line(format!(
                        "other => Err(<D::Error as serde::de::Error>::custom(runtime::unknown_discriminator({:?}, {:?}, other))),",
                        name, table.key
                    ));
                });
            },
        );
    });
}
