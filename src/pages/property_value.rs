// src/pages/property_value.rs
//! <https://developers.notion.com/reference/property-value-object>
//!
//! `PropertyValue` is abstract on `type`, with one derived variant per
//! property type. Formula and rollup results are abstracts of their own,
//! reached through interface fields.

use super::doc_text::{first_sentence, parameter_field, with_quirk};
use crate::element::local::LocalCopy;
use crate::element::{CodeBlock, Parameter};
use crate::error::AppError;
use crate::symbols::{AbstractObject, Builder, ConcreteObject, Field, TypeRef};
use serde_json::Value;

const PROPERTY_VALUE: &str = "PropertyValue";
const FORMULA: &str = "Formula";
const ROLLUP: &str = "Rollup";
const PAGE: &str = "property_value";

/// Records every property of every example as a `PropertyValue` example.
///
/// The reference shows property values keyed by property name, either at
/// the root or under `properties`.
fn property_examples(block: &CodeBlock, b: &mut Builder) -> Result<(), AppError> {
    for code in block.in_language("json") {
        let document: Value = serde_json::from_str(&code.code)?;
        let properties = document.get("properties").unwrap_or(&document);
        if let Value::Object(properties) = properties {
            for value in properties.values() {
                b.add_unmarshal_test(PROPERTY_VALUE, serde_json::to_string_pretty(value)?);
            }
        }
    }
    Ok(())
}

/// Adds the `value` variant of `parent` holding one field named `value`.
fn derive_with_field(
    b: &mut Builder,
    parent: &str,
    value: &str,
    comment: &str,
    type_ref: TypeRef,
) -> Result<(), AppError> {
    let comment = first_sentence(comment);
    b.add_derived(value, parent, comment.clone())?
        .add_field(Field::new(value, type_ref, comment))?;
    Ok(())
}

fn select_option_field(p: &Parameter, b: &mut Builder) -> Result<(), AppError> {
    b.get_mut::<ConcreteObject>("SelectPropertyValue")?
        .add_type_object_field(parameter_field(p)?)?;
    Ok(())
}

pub fn local_copy() -> LocalCopy {
    LocalCopy::new(PAGE, "property-value-object")
        .paragraph("A property value defines the identifier, type, and value of a page property in a page object. It's used when retrieving and updating pages, ex: [Create](ref:post-page) and [Update](ref:patch-page) pages.")
        .on_text(|text, b| {
            b.add_abstract(PROPERTY_VALUE, "type", first_sentence(text))?;
            Ok(())
        })
        .callout(
            "info",
            "Property values in the page object have a 25 page reference limit",
            "Any property value that has other pages in its value will only use the first 25 page references. Use the [Retrieve a page property](ref:retrieve-a-page-property) endpoint to paginate through the full value.",
        )
        .api_header("All property values")
        .paragraph("Each page property value object contains the following keys. In addition, it contains a key corresponding with the value of `type`. The value is an object containing type-specific data. The type-specific data are described in the sections below.")
        .parameter(Parameter::new(
            "`id`",
            "`string`",
            "Underlying identifier for the property. This identifier is guaranteed to remain constant when the property name changes. It may be a UUID, but is often a short random string. The `id` may be used in place of name when creating or updating pages.",
            "`\"f%5C%5C%3Ap\"`",
        ))
        .on_parameter(|p, b| {
            b.get_mut::<AbstractObject>(PROPERTY_VALUE)?
                .add_field(parameter_field(p)?)?;
            Ok(())
        })
        .parameter(Parameter::new(
            "`type`",
            "`string` (enum)",
            "Type of the property. Possible values are `\"checkbox\"`, `\"number\"`, `\"select\"`, `\"url\"`, `\"people\"`, `\"formula\"` and `\"rollup\"`.",
            "`\"checkbox\"`",
        ))
        // --- Checkbox ---
        .api_header("Checkbox property values")
        .paragraph("Checkbox property value objects contain a boolean within the `checkbox` property.")
        .on_text(|text, b| derive_with_field(b, PROPERTY_VALUE, "checkbox", text, TypeRef::Boolean))
        .json("{\n  \"properties\": {\n    \"Task completed\": {\n      \"id\": \"ZI%40W\",\n      \"type\": \"checkbox\",\n      \"checkbox\": true\n    }\n  }\n}")
        .on_code(property_examples)
        // --- Number ---
        .api_header("Number property values")
        .paragraph("Number property value objects contain a number within the `number` property.")
        .on_text(|text, b| {
            derive_with_field(b, PROPERTY_VALUE, "number", text, TypeRef::nullable(TypeRef::Number))
        })
        .json("{\n  \"properties\": {\n    \"Number of subscribers\": {\n      \"id\": \"%5D%3C%3E%5B\",\n      \"type\": \"number\",\n      \"number\": 42\n    }\n  }\n}")
        .on_code(property_examples)
        // --- Select ---
        .api_header("Select property values")
        .paragraph("Select property value objects contain the following data within the `select` property:")
        .on_text(|_, b| {
            b.add_derived("select", PROPERTY_VALUE, "A single option chosen from the property's options.")?
                .set_type_object_comment("The selected option.");
            Ok(())
        })
        .parameter(Parameter::new(
            "`id`",
            "`string` (UUIDv4)",
            "ID of the option. When updating a select property, you can use either `name` or `id`.",
            "`\"b3d773ca-b2c9-47d8-ae98-3c2ce3b2bffb\"`",
        ))
        .on_parameter(select_option_field)
        .parameter(Parameter::new(
            "`name`",
            "`string`",
            "Name of the option as it appears in Notion. If the select database property does not yet have an option by that name, then the name will be added to the database schema if the integration also has write access to the parent database. Note: Commas (\",\") are not valid for select values.",
            "`\"Fruit\"`",
        ))
        .on_parameter(select_option_field)
        .parameter(Parameter::new(
            "`color`",
            "`string` (enum)",
            "Color of the option. Possible values are: `\"default\"`, `\"gray\"`, `\"brown\"`, `\"red\"`, `\"orange\"`, `\"yellow\"`, `\"green\"`, `\"blue\"`, `\"purple\"` or `\"pink\"`. Defaults to `\"default\"`. Not currently editable.",
            "`\"red\"`",
        ))
        .on_parameter(select_option_field)
        .json("{\n  \"properties\": {\n    \"Department\": {\n      \"id\": \"Yc%3FJ\",\n      \"type\": \"select\",\n      \"select\": {\n        \"id\": \"ou@_\",\n        \"name\": \"jQuery\",\n        \"color\": \"purple\"\n      }\n    }\n  }\n}")
        .on_code(property_examples)
        // --- URL ---
        .api_header("URL property values")
        .paragraph("URL property value objects contain a non-empty string within the `url` property. The string describes a web address (i.e. \"http://worrydream.com/EarlyHistoryOfSmalltalk/\").")
        .on_text(|text, b| {
            derive_with_field(b, PROPERTY_VALUE, "url", text, TypeRef::nullable(TypeRef::String))
        })
        .json("{\n  \"properties\": {\n    \"Website\": {\n      \"id\": \"bB%3D%5B\",\n      \"type\": \"url\",\n      \"url\": \"https://developers.notion.com/\"\n    }\n  }\n}")
        .on_code(property_examples)
        // --- People ---
        .api_header("People property values")
        .paragraph("People property value objects contain an array of [user objects](ref:user) within the `people` property.")
        .on_text(|text, b| {
            let comment = with_quirk(&first_sentence(text), PAGE, "people");
            b.add_derived("people", PROPERTY_VALUE, first_sentence(text))?
                .add_field(Field::new("people", TypeRef::array(TypeRef::named("User")), comment))?;
            Ok(())
        })
        .json("{\n  \"properties\": {\n    \"Owners\": {\n      \"id\": \"FlgQ\",\n      \"type\": \"people\",\n      \"people\": [\n        {\n          \"object\": \"user\",\n          \"id\": \"71e95936-2737-4e11-b03d-f174f6f13087\"\n        }\n      ]\n    }\n  }\n}")
        .on_code(property_examples)
        // --- Formula ---
        .api_header("Formula property values")
        .paragraph("Formula property value objects represent the result of evaluating a formula described in the [database's properties](ref:property-object). These objects contain a `type` key and a key corresponding with the value of `type`. The value of a formula cannot be updated directly.")
        .on_text(|text, b| {
            b.add_abstract(FORMULA, "type", "The result of evaluating a formula.")?;
            b.add_derived("formula", PROPERTY_VALUE, first_sentence(text))?
                .add_field(Field::interface("formula", FORMULA, "The formula result."))?;
            Ok(())
        })
        .parameter(Parameter::new(
            "`type`",
            "`string` (enum)",
            "The type of the formula result. Possible values are `\"string\"`, `\"number\"`, `\"boolean\"`, and `\"date\"`.",
            "`\"number\"`",
        ))
        .paragraph("String formula property values contain an optional string within the `string` property.")
        .on_text(|text, b| derive_with_field(b, FORMULA, "string", text, TypeRef::nullable(TypeRef::String)))
        .paragraph("Number formula property values contain an optional number within the `number` property.")
        .on_text(|text, b| derive_with_field(b, FORMULA, "number", text, TypeRef::nullable(TypeRef::Number)))
        .paragraph("Boolean formula property values contain a boolean within the `boolean` property.")
        .on_text(|text, b| derive_with_field(b, FORMULA, "boolean", text, TypeRef::Boolean))
        .paragraph("Date formula property values contain an optional [date property value](ref:property-value-object#date-property-values) within the `date` property.")
        .on_text(|text, b| derive_with_field(b, FORMULA, "date", text, TypeRef::nullable(TypeRef::Json)))
        .json("{\n  \"properties\": {\n    \"Updated price\": {\n      \"id\": \"YU%7C%40\",\n      \"type\": \"formula\",\n      \"formula\": {\n        \"type\": \"number\",\n        \"number\": 1820\n      }\n    }\n  }\n}")
        .on_code(property_examples)
        // --- Rollup ---
        .api_header("Rollup property values")
        .paragraph("Rollup property value objects represent the result of evaluating a rollup described in the [database's properties](ref:property-object). These objects contain a `type` key and a key corresponding with the value of `type`. The value of a rollup cannot be updated directly.")
        .on_text(|text, b| {
            b.add_abstract(ROLLUP, "type", "The result of evaluating a rollup.")?;
            b.add_derived("rollup", PROPERTY_VALUE, first_sentence(text))?
                .add_field(Field::interface("rollup", ROLLUP, "The rollup result."))?;
            Ok(())
        })
        .parameter(Parameter::new(
            "`type`",
            "`string` (enum)",
            "The type of rollup. Possible values are `\"number\"`, `\"date\"` and `\"array\"`.",
            "`\"number\"`",
        ))
        .parameter(Parameter::new(
            "`function`",
            "`string` (enum)",
            "Describes the aggregation used. Possible values include: `count`, `count_values`, `empty`, `not_empty`, `unique`, `show_unique`, `percent_empty`, `percent_not_empty`, `sum`, `average`, `median`, `min`, `max`, `range`, `earliest_date`, `latest_date`, `date_range`, `checked`, `unchecked`, `percent_checked`, `percent_unchecked`, `count_per_group`, `percent_per_group`, `show_original`.",
            "`\"sum\"`",
        ))
        .on_parameter(|p, b| {
            b.get_mut::<AbstractObject>(ROLLUP)?.add_field(parameter_field(p)?)?;
            Ok(())
        })
        .paragraph("Number rollup property values contain a number within the `number` property.")
        .on_text(|text, b| derive_with_field(b, ROLLUP, "number", text, TypeRef::nullable(TypeRef::Number)))
        .paragraph("Date rollup property values contain a [date property value](ref:property-value-object#date-property-values) within the `date` property.")
        .on_text(|text, b| derive_with_field(b, ROLLUP, "date", text, TypeRef::nullable(TypeRef::Json)))
        .paragraph("Array rollup property values contain an array of property value objects within the `array` property.")
        .on_text(|text, b| {
            let comment = with_quirk(&first_sentence(text), PAGE, "rollup.array");
            b.add_derived("array", ROLLUP, first_sentence(text))?
                .add_field(Field::new("array", TypeRef::array(TypeRef::Json), comment))?;
            Ok(())
        })
        .json("{\n  \"properties\": {\n    \"Number of units\": {\n      \"id\": \"hgMz\",\n      \"type\": \"rollup\",\n      \"rollup\": {\n        \"type\": \"number\",\n        \"number\": 2,\n        \"function\": \"count\"\n      }\n    },\n    \"Assignees\": {\n      \"id\": \"Vq%3DK\",\n      \"type\": \"rollup\",\n      \"rollup\": {\n        \"type\": \"array\",\n        \"array\": [\n          {\n            \"type\": \"title\",\n            \"title\": []\n          }\n        ],\n        \"function\": \"show_original\"\n      }\n    }\n  }\n}")
        .on_code(property_examples)
}
