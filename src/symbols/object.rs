// src/symbols/object.rs
//! The four kinds of symbol the generator knows how to emit.

use super::field::{Field, FieldList, Visibility};
use crate::error::AppError;

/// The discriminator value a derived object answers to under its parent's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Data specific to one discriminator value, nested under a field named after
/// that value (e.g. `"external": { "url": ... }`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeObject {
    pub comment: String,
    pub fields: FieldList,
}

/// A plain data shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteObject {
    pub name: String,
    pub comment: String,
    pub fields: FieldList,
    /// Abstract object this is a variant of.
    pub parent: Option<String>,
    pub tag: Option<Tag>,
    pub type_object: Option<TypeObject>,
    /// Unions this object is a member of (back-references only).
    pub unions: Vec<String>,
}

impl ConcreteObject {
    pub fn new(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
            fields: FieldList::default(),
            parent: None,
            tag: None,
            type_object: None,
            unions: Vec::new(),
        }
    }

    pub fn add_field(&mut self, field: Field) -> Result<&mut Self, AppError> {
        self.fields.push(&self.name, field)?;
        Ok(self)
    }

    /// Adds a field to the nested type object, creating it on first use.
    pub fn add_type_object_field(&mut self, field: Field) -> Result<&mut Self, AppError> {
        let tag_value = match &self.tag {
            Some(tag) => tag.value.clone(),
            None => {
                return Err(AppError::TypeObjectWithoutTag {
                    owner: self.name.clone(),
                })
            }
        };
        if self.type_object.is_none() && self.fields.get(&tag_value).is_some() {
            return Err(AppError::DuplicateField {
                owner: self.name.clone(),
                field: tag_value,
            });
        }
        let owner = format!("{}.{}", self.name, tag_value);
        self.type_object
            .get_or_insert_with(TypeObject::default)
            .fields
            .push(&owner, field)?;
        Ok(self)
    }

    pub fn set_type_object_comment(&mut self, comment: impl Into<String>) {
        self.type_object.get_or_insert_with(TypeObject::default).comment = comment.into();
    }

    /// The value of this object's fixed field named `key`.
    pub fn discriminator_value(&self, key: &str) -> Option<&str> {
        self.fields.fixed_value(key)
    }
}

/// A discriminated supertype: shared fields plus an ordered list of variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractObject {
    pub name: String,
    pub comment: String,
    pub discriminator_key: String,
    /// Fields every variant carries.
    pub fields: FieldList,
    pub variants: Vec<String>,
    pub parent: Option<String>,
    pub tag: Option<Tag>,
    pub unions: Vec<String>,
}

impl AbstractObject {
    pub fn new(
        name: impl Into<String>,
        discriminator_key: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
            discriminator_key: discriminator_key.into(),
            fields: FieldList::default(),
            variants: Vec::new(),
            parent: None,
            tag: None,
            unions: Vec::new(),
        }
    }

    /// Adds a field shared by every variant.
    pub fn add_field(&mut self, field: Field) -> Result<&mut Self, AppError> {
        self.fields.push(&self.name, field)?;
        Ok(self)
    }

    pub fn discriminator_value(&self, key: &str) -> Option<&str> {
        self.fields.fixed_value(key)
    }

    pub(crate) fn push_variant(&mut self, variant: &str) {
        if !self.variants.iter().any(|v| v == variant) {
            self.variants.push(variant.to_string());
        }
    }
}

/// Variants that differ only by which optional fields are populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveObject {
    pub name: String,
    pub comment: String,
    pub discriminator_key: String,
    pub fields: FieldList,
    pub unions: Vec<String>,
}

impl AdaptiveObject {
    pub fn new(
        name: impl Into<String>,
        discriminator_key: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
            discriminator_key: discriminator_key.into(),
            fields: FieldList::default(),
            unions: Vec::new(),
        }
    }

    /// Adds a field present regardless of the discriminator.
    pub fn add_field(&mut self, field: Field) -> Result<&mut Self, AppError> {
        self.fields.push(&self.name, field)?;
        Ok(self)
    }

    /// Adds a field present only when the discriminator equals `value`.
    pub fn add_tagged_field(
        &mut self,
        value: impl Into<String>,
        field: Field,
    ) -> Result<&mut Self, AppError> {
        let field = field.with_visibility(Visibility::WhenDiscriminatorIs(value.into()));
        self.add_field(field)
    }

    /// Adds a field present whenever the discriminator is non-empty.
    pub fn add_typed_field(&mut self, field: Field) -> Result<&mut Self, AppError> {
        self.add_field(field.with_visibility(Visibility::WhenDiscriminatorSet))
    }

    pub fn discriminator_value(&self, key: &str) -> Option<&str> {
        self.fields.fixed_value(key)
    }

    /// Discriminator values selecting at least one tagged field, in field order.
    pub fn tag_values(&self) -> Vec<&str> {
        let mut values: Vec<&str> = Vec::new();
        for field in &self.fields {
            if let Visibility::WhenDiscriminatorIs(value) = field.visibility() {
                if !values.contains(&value.as_str()) {
                    values.push(value);
                }
            }
        }
        values
    }
}

/// Unrelated symbols sharing a discriminator key for dispatch only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionObject {
    pub name: String,
    pub comment: String,
    pub discriminator_key: String,
    pub members: Vec<String>,
}

impl UnionObject {
    pub fn new(name: impl Into<String>, discriminator_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            discriminator_key: discriminator_key.into(),
            members: Vec::new(),
        }
    }

    pub(crate) fn push_member(&mut self, member: &str) {
        if !self.members.iter().any(|m| m == member) {
            self.members.push(member.to_string());
        }
    }
}
