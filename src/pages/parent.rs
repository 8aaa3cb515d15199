// src/pages/parent.rs
//! <https://developers.notion.com/reference/parent-object>

use super::doc_text::{first_sentence, normalize_property_name, parameter_field};
use crate::element::local::LocalCopy;
use crate::element::{Element, Parameter};
use crate::error::AppError;
use crate::symbols::{AdaptiveObject, Builder, Field, TypeRef};

const PARENT: &str = "Parent";

/// The `type` row repeated under every parent kind.
fn type_row(value: &str) -> Parameter {
    Parameter::new(
        "`type`",
        "`string`",
        format!("Always `\"{}\"`.", value),
        format!("`\"{}\"`", value),
    )
}

/// Adds the row's field, present only when `type` is `value`.
fn tagged(
    value: &'static str,
) -> impl Fn(&Parameter, &mut Builder) -> Result<(), AppError> + Send + Sync {
    move |p, b| {
        b.get_mut::<AdaptiveObject>(PARENT)?
            .add_tagged_field(value, parameter_field(p)?)?;
        Ok(())
    }
}

fn examples(element: &Element, b: &mut Builder) -> Result<(), AppError> {
    if let Element::CodeBlock(block) = element {
        b.add_unmarshal_examples(PARENT, block);
    }
    Ok(())
}

pub fn local_copy() -> LocalCopy {
    LocalCopy::new("parent", "parent-object")
        .paragraph("Pages, databases, and blocks are either located inside other pages, databases, and blocks, or are located at the top level of a workspace. This location is known as the \"parent\". Parent information is represented by a consistent `parent` object throughout the API.")
        .on_text(|text, b| {
            b.add_global_adaptive(PARENT, "type", first_sentence(text))?;
            Ok(())
        })
        .paragraph("General parenting rules:")
        .paragraph("- Pages can be parented by other pages, databases, blocks, or by the whole workspace.\n- Blocks can be parented by pages, databases, or blocks.\n- Databases can be parented by pages, blocks, or by the whole workspace.")
        .api_header("Database parent")
        .parameter(type_row("database_id"))
        .on_parameter(|p, b| {
            let name = normalize_property_name(&p.property);
            b.get_mut::<AdaptiveObject>(PARENT)?.add_field(Field::new(
                name,
                TypeRef::String,
                "Kind of parent; names the field holding its ID.",
            ))?;
            Ok(())
        })
        .parameter(Parameter::new(
            "`database_id`",
            "`string` (UUIDv4)",
            "The ID of the database that this page belongs to.",
            "`\"b8595b75-abd1-4cad-8dfe-f935a8ef57cb\"`",
        ))
        .on_parameter(tagged("database_id"))
        .json("{\n  \"type\": \"database_id\",\n  \"database_id\": \"d9824bdc-8445-4327-be8b-5b47500af6ce\"\n}")
        .output(examples)
        .api_header("Page parent")
        .parameter(type_row("page_id"))
        .parameter(Parameter::new(
            "`page_id`",
            "`string` (UUIDv4)",
            "The ID of the page that this page belongs to.",
            "`\"59833787-2cf9-4fdf-8782-e53db20768a5\"`",
        ))
        .on_parameter(tagged("page_id"))
        .json("{\n  \"type\": \"page_id\",\n  \"page_id\": \"59833787-2cf9-4fdf-8782-e53db20768a5\"\n}")
        .output(examples)
        .api_header("Workspace parent")
        .paragraph("A page with a workspace parent is a top-level page within a Notion workspace. The `parent` property is an object containing the following keys:")
        .parameter(type_row("workspace"))
        .parameter(Parameter::new(
            "`workspace`",
            "`boolean`",
            "Always `true`.",
            "`true`",
        ))
        .on_parameter(tagged("workspace"))
        .json("{\n  \"type\": \"workspace\",\n  \"workspace\": true\n}")
        .output(examples)
        .api_header("Block parent")
        .paragraph("A page may have a block parent if it is created inline in a chunk of text, or is located beneath another block like a toggle or bullet block. The `parent` property is an object containing the following keys:")
        .parameter(type_row("block_id"))
        .parameter(Parameter::new(
            "`block_id`",
            "`string` (UUIDv4)",
            "The ID of the block that the page belongs to.",
            "`\"ea29285f-7282-4b00-b80c-32bdbab50261\"`",
        ))
        .on_parameter(tagged("block_id"))
        .json("{\n  \"type\": \"block_id\",\n  \"block_id\": \"7d50a184-5bbe-4d90-8f29-6bec57ed817b\"\n}")
        .output(examples)
}
