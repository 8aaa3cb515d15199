// tests/dispatch_properties.rs
//! Decoding and encoding behaviour of abstracts, adaptives and unions,
//! checked through the dynamic codec over hand-built graphs.

use indexmap::IndexMap;
use notion2code::codec::{decode, encode, json_equivalent, round_trip, CodecError, DynamicObject, DynamicValue};
use notion2code::{AppError, Builder, Field, GlobalScope, SymbolGraph, TypeRef};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn property_value_graph() -> SymbolGraph {
    let global = GlobalScope::new();
    let mut b = Builder::new("property_value", "memory:property-value-object", global.clone());
    b.add_abstract("PropertyValue", "type", "A page property value.")
        .unwrap()
        .add_field(Field::new("id", TypeRef::String, "Property identifier."))
        .unwrap();
    b.add_derived("checkbox", "PropertyValue", "A checkbox value.")
        .unwrap()
        .add_field(Field::new("checkbox", TypeRef::Boolean, "Whether it is checked."))
        .unwrap();
    b.add_derived("number", "PropertyValue", "A number value.")
        .unwrap()
        .add_field(Field::new("number", TypeRef::nullable(TypeRef::Number), "The number."))
        .unwrap();

    let (artifact, contribution) = b.finish();
    global.commit("property_value", contribution).unwrap();
    SymbolGraph::assemble(global.freeze(), vec![artifact]).unwrap()
}

/// `FileOrEmoji` over a concrete `Emoji` and an adaptive `File`.
fn icon_graph() -> SymbolGraph {
    let global = GlobalScope::new();
    let mut b = Builder::new("icon", "memory:icon", global.clone());

    b.add_concrete("Emoji", "An emoji.")
        .unwrap()
        .add_field(Field::fixed("type", "emoji", "Always `emoji`."))
        .unwrap()
        .add_field(Field::new("emoji", TypeRef::String, "The character."))
        .unwrap();
    b.add_concrete("NotionHostedFile", "Uploaded file.")
        .unwrap()
        .add_field(Field::new("url", TypeRef::String, "Download link."))
        .unwrap();
    b.add_concrete("ExternalFile", "Linked file.")
        .unwrap()
        .add_field(Field::new("url", TypeRef::String, "Link."))
        .unwrap();

    let file = b.add_adaptive("File", "type", "A file.").unwrap();
    file.add_field(Field::new("type", TypeRef::String, "Kind of file.")).unwrap();
    file.add_tagged_field("file", Field::new("file", TypeRef::named("NotionHostedFile"), "Hosted."))
        .unwrap();
    file.add_tagged_field("external", Field::new("external", TypeRef::named("ExternalFile"), "External."))
        .unwrap();

    b.add_union_to_global_if_not_exists("FileOrEmoji", "type").unwrap();
    b.add_union_member("FileOrEmoji", "Emoji").unwrap();
    b.add_union_member("FileOrEmoji", "File").unwrap();

    let (artifact, contribution) = b.finish();
    global.commit("icon", contribution).unwrap();
    SymbolGraph::assemble(global.freeze(), vec![artifact]).unwrap()
}

/// `Entity` (on `object`) whose `block` variant is itself abstract (on `type`).
fn nested_graph() -> SymbolGraph {
    let global = GlobalScope::new();
    let mut b = Builder::new("entity", "memory:entity", global.clone());
    b.add_abstract("Entity", "object", "Anything with an object tag.").unwrap();
    b.add_derived("user", "Entity", "A user.")
        .unwrap()
        .add_field(Field::new("name", TypeRef::String, "Display name."))
        .unwrap();
    b.add_derived_abstract("block", "Entity", "type", "A block.")
        .unwrap()
        .add_field(Field::new("id", TypeRef::String, "Block identifier."))
        .unwrap();
    b.add_derived("paragraph", "BlockEntity", "A paragraph block.")
        .unwrap()
        .add_field(Field::new("text", TypeRef::String, "Plain text."))
        .unwrap();
    b.add_derived("divider", "BlockEntity", "A divider block.").unwrap();

    let (artifact, contribution) = b.finish();
    global.commit("entity", contribution).unwrap();
    SymbolGraph::assemble(global.freeze(), vec![artifact]).unwrap()
}

fn resolved(value: &DynamicValue) -> &DynamicObject {
    value.as_object().expect("decoded value should be an object")
}

#[test]
fn test_checkbox_property_value_round_trips() {
    let graph = property_value_graph();
    let input = json!({"id": "abc", "type": "checkbox", "checkbox": true});

    let decoded = decode(&graph, "PropertyValue", &input).unwrap();
    let object = resolved(&decoded);
    assert_eq!(object.symbol, "CheckboxPropertyValue");
    assert_eq!(object.get("checkbox"), Some(&DynamicValue::Scalar(json!(true))));

    let encoded = encode(&graph, &decoded).unwrap();
    assert!(json_equivalent(&input, &encoded), "{} vs {}", input, encoded);
}

#[test]
fn test_round_trip_ignores_key_order_and_number_spelling() {
    let graph = property_value_graph();
    round_trip(&graph, "PropertyValue", r#"{"number": 42, "type": "number", "id": "x"}"#).unwrap();
    round_trip(&graph, "PropertyValue", r#"{"id": "x", "type": "number", "number": null}"#).unwrap();
}

#[test]
fn test_unknown_discriminator_is_rejected() {
    let graph = property_value_graph();
    let err = decode(&graph, "PropertyValue", &json!({"id": "x", "type": "rollup"})).unwrap_err();
    match err {
        CodecError::UnknownDiscriminatorValue { symbol, key, value } => {
            assert_eq!(symbol, "PropertyValue");
            assert_eq!(key, "type");
            assert_eq!(value, "rollup");
        }
        other => panic!("expected UnknownDiscriminatorValue, got {:?}", other),
    }

    let err = decode(&graph, "PropertyValue", &json!({"id": "x"})).unwrap_err();
    assert!(matches!(err, CodecError::MissingDiscriminator { .. }));
}

#[test]
fn test_null_dispatched_value_is_absent() {
    let graph = property_value_graph();
    let decoded = decode(&graph, "PropertyValue", &Value::Null).unwrap();
    assert!(decoded.is_absent());

    let union = icon_graph();
    assert!(decode(&union, "FileOrEmoji", &Value::Null).unwrap().is_absent());
}

#[test]
fn test_union_resolves_concrete_member() {
    let graph = icon_graph();
    let decoded = decode(&graph, "FileOrEmoji", &json!({"type": "emoji", "emoji": "😻"})).unwrap();
    assert_eq!(resolved(&decoded).symbol, "Emoji");
}

#[test]
fn test_union_resolves_adaptive_member_by_tag() {
    let graph = icon_graph();
    let input = json!({"type": "external", "external": {"url": "https://x"}});
    let decoded = decode(&graph, "FileOrEmoji", &input).unwrap();
    let file = resolved(&decoded);

    assert_eq!(file.symbol, "File");
    assert!(file.get("file").map_or(true, DynamicValue::is_absent));
    let external = resolved(file.get("external").expect("external field decoded"));
    assert_eq!(external.symbol, "ExternalFile");
    assert_eq!(external.get("url"), Some(&DynamicValue::Scalar(json!("https://x"))));

    round_trip(&graph, "FileOrEmoji", &input.to_string()).unwrap();
}

#[test]
fn test_adaptive_hides_fields_tagged_for_other_values() {
    let graph = icon_graph();
    let hosted = DynamicValue::Object(DynamicObject {
        symbol: "NotionHostedFile".to_string(),
        fields: IndexMap::from([("url".to_string(), DynamicValue::Scalar(json!("https://hosted")))]),
        type_object: None,
    });
    let external = DynamicValue::Object(DynamicObject {
        symbol: "ExternalFile".to_string(),
        fields: IndexMap::from([("url".to_string(), DynamicValue::Scalar(json!("https://linked")))]),
        type_object: None,
    });
    let both = |tag: &str| {
        DynamicValue::Object(DynamicObject {
            symbol: "File".to_string(),
            fields: IndexMap::from([
                ("type".to_string(), DynamicValue::Scalar(json!(tag))),
                ("file".to_string(), hosted.clone()),
                ("external".to_string(), external.clone()),
            ]),
            type_object: None,
        })
    };

    assert_eq!(
        encode(&graph, &both("external")).unwrap(),
        json!({"type": "external", "external": {"url": "https://linked"}})
    );
    assert_eq!(
        encode(&graph, &both("file")).unwrap(),
        json!({"type": "file", "file": {"url": "https://hosted"}})
    );
    assert_eq!(encode(&graph, &both("")).unwrap(), json!({"type": ""}));
}

#[test]
fn test_nested_abstract_resolves_innermost_variant() {
    let graph = nested_graph();
    let input = json!({"object": "block", "type": "paragraph", "id": "b1", "text": "hi"});

    let decoded = decode(&graph, "Entity", &input).unwrap();
    let paragraph = resolved(&decoded);
    assert_eq!(paragraph.symbol, "ParagraphBlockEntity");
    assert_eq!(paragraph.get("id"), Some(&DynamicValue::Scalar(json!("b1"))));
    assert_eq!(paragraph.get("text"), Some(&DynamicValue::Scalar(json!("hi"))));

    round_trip(&graph, "Entity", &input.to_string()).unwrap();
    round_trip(&graph, "Entity", r#"{"object": "block", "type": "divider", "id": "b2"}"#).unwrap();
    round_trip(&graph, "Entity", r#"{"object": "user", "name": "Ada"}"#).unwrap();
}

#[test]
fn test_nested_abstract_rejects_unknown_inner_value() {
    let graph = nested_graph();
    let err = decode(&graph, "Entity", &json!({"object": "block", "type": "table", "id": "b3"})).unwrap_err();
    match err {
        CodecError::UnknownDiscriminatorValue { symbol, value, .. } => {
            assert_eq!(symbol, "BlockEntity");
            assert_eq!(value, "table");
        }
        other => panic!("expected UnknownDiscriminatorValue, got {:?}", other),
    }
}

#[test]
fn test_fixed_value_mismatch_is_an_error() {
    let graph = icon_graph();
    let err = decode(&graph, "Emoji", &json!({"type": "file", "emoji": "x"})).unwrap_err();
    assert!(matches!(err, CodecError::FixedValueMismatch { .. }));
}

#[test]
fn test_abstract_without_variants_fails_assembly() {
    let global = GlobalScope::new();
    let mut b = Builder::new("block", "memory:block", global.clone());
    b.add_abstract("Block", "type", "A block.")
        .unwrap()
        .add_field(Field::new("id", TypeRef::String, "Block identifier."))
        .unwrap();
    let (artifact, contribution) = b.finish();
    global.commit("block", contribution).unwrap();

    let err = SymbolGraph::assemble(global.freeze(), vec![artifact]).unwrap_err();
    assert!(matches!(err, AppError::EmptyDispatch { ref owner, .. } if owner == "Block"));
}

#[test]
fn test_union_without_members_fails_assembly() {
    let global = GlobalScope::new();
    let mut b = Builder::new("icon", "memory:icon", global.clone());
    b.add_union_to_global_if_not_exists("FileOrEmoji", "type").unwrap();
    let (artifact, contribution) = b.finish();
    global.commit("icon", contribution).unwrap();

    let err = SymbolGraph::assemble(global.freeze(), vec![artifact]).unwrap_err();
    assert!(matches!(err, AppError::EmptyDispatch { ref owner, kind: "Union" } if owner == "FileOrEmoji"));
}

#[test]
fn test_null_in_a_tagged_field_is_absent_and_not_written_back() {
    let graph = icon_graph();
    let input = json!({"type": "external", "external": null});

    let decoded = decode(&graph, "FileOrEmoji", &input).unwrap();
    let file = resolved(&decoded);
    assert!(file.get("external").is_some_and(DynamicValue::is_absent));
    assert_eq!(encode(&graph, &decoded).unwrap(), json!({"type": "external"}));

    let err = round_trip(&graph, "FileOrEmoji", &input.to_string()).unwrap_err();
    assert!(matches!(err, CodecError::NotEquivalent { .. }));
}
