// src/codec.rs
//! Interprets a [`SymbolGraph`] as a JSON codec.
//!
//! Decoding and encoding follow the rules the emitted code implements:
//! abstracts and unions peek their discriminator and delegate to the matching
//! member, `null` where a dispatched value is expected decodes to
//! [`DynamicValue::Absent`], fixed fields are checked on decode and always
//! written back, and adaptive objects hide fields whose discriminator
//! condition does not hold. An explicit `null` in such a field decodes as
//! absent and is therefore not written back.
//! Graph assembly runs every documented example through [`round_trip`], so an
//! example the generated tests would reject fails the run instead.

use crate::symbols::{Field, Symbol, SymbolGraph, TypeRef, Visibility};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{symbol}: unknown {key} value {value:?}")]
    UnknownDiscriminatorValue {
        symbol: String,
        key: String,
        value: String,
    },

    #[error("{symbol}: missing {key} discriminator")]
    MissingDiscriminator { symbol: String, key: String },

    #[error("{context}: expected {expected}, found {found}")]
    UnexpectedShape {
        context: String,
        expected: &'static str,
        found: String,
    },

    #[error("{symbol}.{field}: expected fixed value {expected:?}, found {found}")]
    FixedValueMismatch {
        symbol: String,
        field: String,
        expected: String,
        found: String,
    },

    #[error("{symbol}: missing required field {field}")]
    MissingField { symbol: String, field: String },

    #[error("unknown symbol {0}")]
    UnknownSymbol(String),

    #[error("re-encoded value differs from the input\n  input:  {input}\n  output: {output}")]
    NotEquivalent { input: String, output: String },

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A decoded value, typed by the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    /// `null`, or a field that was not present.
    Absent,
    Scalar(Value),
    Object(DynamicObject),
    List(Vec<DynamicValue>),
    Map(IndexMap<String, DynamicValue>),
}

impl DynamicValue {
    pub fn as_object(&self) -> Option<&DynamicObject> {
        match self {
            DynamicValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            DynamicValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, DynamicValue::Absent)
    }
}

/// A decoded concrete or adaptive object. `symbol` is always the innermost
/// resolved type, never an abstract or union.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicObject {
    pub symbol: String,
    pub fields: IndexMap<String, DynamicValue>,
    /// Fields of the nested type object, keyed under the discriminator value.
    pub type_object: Option<IndexMap<String, DynamicValue>>,
}

impl DynamicObject {
    pub fn get(&self, field: &str) -> Option<&DynamicValue> {
        self.fields.get(field)
    }
}

/// Decodes `value` as an instance of `symbol`.
pub fn decode(graph: &SymbolGraph, symbol: &str, value: &Value) -> Result<DynamicValue, CodecError> {
    let resolved = lookup(graph, symbol)?;
    match resolved {
        Symbol::Abstract(_) | Symbol::Union(_) => decode_dispatched(graph, symbol, value),
        Symbol::Concrete(_) | Symbol::Adaptive(_) => decode_object(graph, resolved, value),
    }
}

fn decode_dispatched(graph: &SymbolGraph, symbol: &str, value: &Value) -> Result<DynamicValue, CodecError> {
    if value.is_null() {
        return Ok(DynamicValue::Absent);
    }
    let table = graph
        .table(symbol)
        .map_err(|_| CodecError::UnknownSymbol(symbol.to_string()))?;
    let object = expect_object(symbol, value)?;
    let tag = object
        .get(&table.key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CodecError::MissingDiscriminator {
            symbol: symbol.to_string(),
            key: table.key.clone(),
        })?;
    let entry = table
        .lookup(tag)
        .ok_or_else(|| CodecError::UnknownDiscriminatorValue {
            symbol: symbol.to_string(),
            key: table.key.clone(),
            value: tag.to_string(),
        })?;
    // Errors from the member propagate untouched.
    decode(graph, &entry.member, value)
}

fn decode_object(graph: &SymbolGraph, symbol: &Symbol, value: &Value) -> Result<DynamicValue, CodecError> {
    let name = symbol.name();
    let object = expect_object(name, value)?;
    let fields = decode_fields(graph, name, &graph.effective_fields(name), object)?;

    let type_object = match symbol {
        Symbol::Concrete(c) => match (&c.tag, &c.type_object) {
            (Some(tag), Some(type_object)) => {
                let context = format!("{}.{}", name, tag.value);
                let nested = object.get(&tag.value).ok_or_else(|| CodecError::MissingField {
                    symbol: name.to_string(),
                    field: tag.value.clone(),
                })?;
                let nested = expect_object(&context, nested)?;
                let own: Vec<&Field> = type_object.fields.iter().collect();
                Some(decode_fields(graph, &context, &own, nested)?)
            }
            _ => None,
        },
        _ => None,
    };

    Ok(DynamicValue::Object(DynamicObject {
        symbol: name.to_string(),
        fields,
        type_object,
    }))
}

fn decode_fields(
    graph: &SymbolGraph,
    owner: &str,
    fields: &[&Field],
    object: &Map<String, Value>,
) -> Result<IndexMap<String, DynamicValue>, CodecError> {
    let mut decoded = IndexMap::with_capacity(fields.len());
    for field in fields {
        let raw = object.get(field.name());
        if let Some(expected) = field.fixed_value() {
            match raw {
                None => {}
                Some(Value::String(found)) if found == expected => {}
                Some(other) => {
                    return Err(CodecError::FixedValueMismatch {
                        symbol: owner.to_string(),
                        field: field.name().to_string(),
                        expected: expected.to_string(),
                        found: other.to_string(),
                    })
                }
            }
            continue;
        }

        let Some(type_ref) = field.type_ref() else {
            continue;
        };
        let value = match raw {
            // Discriminator-bound fields are `Option`s in the emitted structs.
            Some(Value::Null) if field.visibility().is_discriminator_bound() => DynamicValue::Absent,
            Some(raw) => {
                let context = format!("{}.{}", owner, field.name());
                decode_type(graph, &context, type_ref, raw)?
            }
            None if field.is_required() => {
                return Err(CodecError::MissingField {
                    symbol: owner.to_string(),
                    field: field.name().to_string(),
                })
            }
            None => DynamicValue::Absent,
        };
        decoded.insert(field.name().to_string(), value);
    }
    Ok(decoded)
}

fn decode_type(
    graph: &SymbolGraph,
    context: &str,
    type_ref: &TypeRef,
    value: &Value,
) -> Result<DynamicValue, CodecError> {
    let mismatch = |expected: &'static str| CodecError::UnexpectedShape {
        context: context.to_string(),
        expected,
        found: describe(value),
    };
    match type_ref {
        TypeRef::Nullable(_) | TypeRef::Json if value.is_null() => Ok(DynamicValue::Absent),
        TypeRef::Nullable(inner) => decode_type(graph, context, inner, value),
        TypeRef::Json => Ok(DynamicValue::Scalar(value.clone())),
        TypeRef::String | TypeRef::DateTime => match value {
            Value::String(_) => Ok(DynamicValue::Scalar(value.clone())),
            _ => Err(mismatch("a string")),
        },
        TypeRef::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(DynamicValue::Scalar(value.clone())),
            _ => Err(mismatch("an integer")),
        },
        TypeRef::Number => match value {
            Value::Number(_) => Ok(DynamicValue::Scalar(value.clone())),
            _ => Err(mismatch("a number")),
        },
        TypeRef::Boolean => match value {
            Value::Bool(_) => Ok(DynamicValue::Scalar(value.clone())),
            _ => Err(mismatch("a boolean")),
        },
        TypeRef::Array(inner) => match value {
            Value::Array(items) => items
                .iter()
                .map(|item| decode_type(graph, context, inner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(DynamicValue::List),
            _ => Err(mismatch("an array")),
        },
        TypeRef::Map(inner) => match value {
            Value::Object(entries) => entries
                .iter()
                .map(|(k, v)| Ok::<_, CodecError>((k.clone(), decode_type(graph, context, inner, v)?)))
                .collect::<Result<IndexMap<_, _>, CodecError>>()
                .map(DynamicValue::Map),
            _ => Err(mismatch("an object")),
        },
        TypeRef::Named(name) => {
            let target = lookup(graph, name)?;
            if value.is_null() && !target.is_dispatcher() {
                return Err(mismatch("an object"));
            }
            decode(graph, name, value)
        }
    }
}

/// Encodes a decoded value back to JSON.
pub fn encode(graph: &SymbolGraph, value: &DynamicValue) -> Result<Value, CodecError> {
    match value {
        DynamicValue::Absent => Ok(Value::Null),
        DynamicValue::Scalar(v) => Ok(v.clone()),
        DynamicValue::List(items) => items
            .iter()
            .map(|item| encode(graph, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        DynamicValue::Map(entries) => {
            let mut out = Map::new();
            for (key, item) in entries {
                out.insert(key.clone(), encode(graph, item)?);
            }
            Ok(Value::Object(out))
        }
        DynamicValue::Object(object) => encode_object(graph, object),
    }
}

fn encode_object(graph: &SymbolGraph, object: &DynamicObject) -> Result<Value, CodecError> {
    let symbol = lookup(graph, &object.symbol)?;
    let fields = graph.effective_fields(&object.symbol);

    let discriminator = match symbol {
        Symbol::Adaptive(d) => fields
            .iter()
            .find(|f| f.name() == d.discriminator_key)
            .and_then(|f| match f.fixed_value() {
                Some(fixed) => Some(fixed.to_string()),
                None => object
                    .get(f.name())
                    .and_then(DynamicValue::as_scalar)
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
            .unwrap_or_default(),
        _ => String::new(),
    };

    let mut out = encode_fields(graph, &fields, &object.fields, &discriminator)?;
    if let (Symbol::Concrete(c), Some(nested)) = (symbol, &object.type_object) {
        if let (Some(tag), Some(type_object)) = (&c.tag, &c.type_object) {
            let own: Vec<&Field> = type_object.fields.iter().collect();
            let encoded = encode_fields(graph, &own, nested, "")?;
            out.insert(tag.value.clone(), Value::Object(encoded));
        }
    }
    Ok(Value::Object(out))
}

fn encode_fields(
    graph: &SymbolGraph,
    fields: &[&Field],
    values: &IndexMap<String, DynamicValue>,
    discriminator: &str,
) -> Result<Map<String, Value>, CodecError> {
    let mut out = Map::new();
    for field in fields {
        if let Some(fixed) = field.fixed_value() {
            out.insert(field.name().to_string(), Value::String(fixed.to_string()));
            continue;
        }
        let value = values.get(field.name()).unwrap_or(&DynamicValue::Absent);
        let visible = match field.visibility() {
            Visibility::Always => true,
            Visibility::NonEmpty => !is_empty(&encode(graph, value)?),
            Visibility::WhenDiscriminatorIs(expected) => {
                discriminator == expected && !value.is_absent()
            }
            Visibility::WhenDiscriminatorSet => !discriminator.is_empty() && !value.is_absent(),
        };
        if visible {
            out.insert(field.name().to_string(), encode(graph, value)?);
        }
    }
    Ok(out)
}

/// Decode, re-encode and compare; returns the decoded value on success.
pub fn round_trip(graph: &SymbolGraph, symbol: &str, json: &str) -> Result<DynamicValue, CodecError> {
    let input: Value = serde_json::from_str(json)?;
    let decoded = decode(graph, symbol, &input)?;
    let output = encode(graph, &decoded)?;
    if !json_equivalent(&input, &output) {
        return Err(CodecError::NotEquivalent {
            input: input.to_string(),
            output: output.to_string(),
        });
    }
    let again = decode(graph, symbol, &output)?;
    if again != decoded {
        return Err(CodecError::NotEquivalent {
            input: format!("{:?}", decoded),
            output: format!("{:?}", again),
        });
    }
    Ok(decoded)
}

/// `null`, `false`, `0`, `""`, `[]` and `{}` are empty.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Structural JSON equality ignoring key order and number spelling
/// (`1` equals `1.0`).
pub fn json_equivalent(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| json_equivalent(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| json_equivalent(v, w)))
        }
        _ => a == b,
    }
}

fn lookup<'g>(graph: &'g SymbolGraph, name: &str) -> Result<&'g Symbol, CodecError> {
    graph
        .symbol(name)
        .map_err(|_| CodecError::UnknownSymbol(name.to_string()))
}

fn expect_object<'v>(context: &str, value: &'v Value) -> Result<&'v Map<String, Value>, CodecError> {
    value.as_object().ok_or_else(|| CodecError::UnexpectedShape {
        context: context.to_string(),
        expected: "an object",
        found: describe(value),
    })
}

fn describe(value: &Value) -> String {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    kind.to_string()
}
