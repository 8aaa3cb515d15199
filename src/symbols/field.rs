// src/symbols/field.rs
//! Fields: the named properties of an emitted data shape.

use crate::error::AppError;

/// Semantic type of a field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    String,
    Integer,
    Number,
    Boolean,
    /// ISO 8601 timestamp, kept textual so it round-trips byte for byte.
    DateTime,
    /// Any JSON value; used where the documentation gives no usable shape.
    Json,
    /// Another symbol of the graph, resolved by name.
    Named(String),
    Array(Box<TypeRef>),
    /// JSON object with arbitrary keys.
    Map(Box<TypeRef>),
    Nullable(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn array(inner: TypeRef) -> Self {
        TypeRef::Array(Box::new(inner))
    }

    pub fn map(inner: TypeRef) -> Self {
        TypeRef::Map(Box::new(inner))
    }

    pub fn nullable(inner: TypeRef) -> Self {
        match inner {
            already @ TypeRef::Nullable(_) => already,
            other => TypeRef::Nullable(Box::new(other)),
        }
    }

    /// The symbol this type ultimately refers to, looking through containers.
    pub fn referenced_symbol(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) => Some(name),
            TypeRef::Array(inner) | TypeRef::Map(inner) | TypeRef::Nullable(inner) => {
                inner.referenced_symbol()
            }
            _ => None,
        }
    }
}

/// When a field is written out on encode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Always,
    /// Omitted when empty or default (`null`, `false`, `0`, `""`, `[]`, `{}`).
    NonEmpty,
    /// Adaptive objects only: present iff the discriminator equals the value.
    WhenDiscriminatorIs(String),
    /// Adaptive objects only: present iff the discriminator is non-empty.
    WhenDiscriminatorSet,
}

impl Visibility {
    /// Whether this policy depends on the owner's discriminator.
    pub fn is_discriminator_bound(&self) -> bool {
        matches!(
            self,
            Visibility::WhenDiscriminatorIs(_) | Visibility::WhenDiscriminatorSet
        )
    }
}

/// A field holding data of a known type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableField {
    pub name: String,
    pub type_ref: TypeRef,
    pub comment: String,
    pub visibility: Visibility,
}

/// A discriminator tag whose value is baked into the type instead of stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedStringField {
    pub name: String,
    pub value: String,
    pub comment: String,
}

/// A field whose value must be resolved through an abstract or union
/// dispatcher before it can be assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceField {
    pub name: String,
    pub type_ref: TypeRef,
    pub comment: String,
    pub visibility: Visibility,
}

impl InterfaceField {
    /// Name of the abstract or union this field dispatches through.
    pub fn target(&self) -> &str {
        self.type_ref.referenced_symbol().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Variable(VariableField),
    Fixed(FixedStringField),
    Interface(InterfaceField),
}

impl Field {
    pub fn new(name: impl Into<String>, type_ref: TypeRef, comment: impl Into<String>) -> Self {
        Field::Variable(VariableField {
            name: name.into(),
            type_ref,
            comment: comment.into(),
            visibility: Visibility::Always,
        })
    }

    pub fn fixed(
        name: impl Into<String>,
        value: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Field::Fixed(FixedStringField {
            name: name.into(),
            value: value.into(),
            comment: comment.into(),
        })
    }

    /// A single value dispatched through `target`.
    pub fn interface(
        name: impl Into<String>,
        target: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self::interface_of(name, TypeRef::named(target), comment)
    }

    /// An interface field with an explicit container shape, e.g. an array of
    /// abstract values.
    pub fn interface_of(
        name: impl Into<String>,
        type_ref: TypeRef,
        comment: impl Into<String>,
    ) -> Self {
        Field::Interface(InterfaceField {
            name: name.into(),
            type_ref,
            comment: comment.into(),
            visibility: Visibility::Always,
        })
    }

    /// Marks the field as omitted when empty. No effect on fixed fields.
    pub fn omit_when_empty(self) -> Self {
        self.with_visibility(Visibility::NonEmpty)
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        match &mut self {
            Field::Variable(f) => f.visibility = visibility,
            Field::Interface(f) => f.visibility = visibility,
            Field::Fixed(_) => {}
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            Field::Variable(f) => &f.name,
            Field::Fixed(f) => &f.name,
            Field::Interface(f) => &f.name,
        }
    }

    pub fn comment(&self) -> &str {
        match self {
            Field::Variable(f) => &f.comment,
            Field::Fixed(f) => &f.comment,
            Field::Interface(f) => &f.comment,
        }
    }

    /// Type of the stored value; `None` for fixed fields, which store nothing.
    pub fn type_ref(&self) -> Option<&TypeRef> {
        match self {
            Field::Variable(f) => Some(&f.type_ref),
            Field::Interface(f) => Some(&f.type_ref),
            Field::Fixed(_) => None,
        }
    }

    pub fn visibility(&self) -> &Visibility {
        static ALWAYS: Visibility = Visibility::Always;
        match self {
            Field::Variable(f) => &f.visibility,
            Field::Interface(f) => &f.visibility,
            Field::Fixed(_) => &ALWAYS,
        }
    }

    pub fn fixed_value(&self) -> Option<&str> {
        match self {
            Field::Fixed(f) => Some(&f.value),
            _ => None,
        }
    }

    /// Whether the stored value can represent "absent" (`null` or a missing
    /// key) without help from the field's visibility.
    pub fn is_optional(&self) -> bool {
        match self {
            Field::Fixed(_) => true,
            Field::Variable(f) => matches!(f.type_ref, TypeRef::Nullable(_) | TypeRef::Json),
            Field::Interface(f) => matches!(f.type_ref, TypeRef::Named(_) | TypeRef::Nullable(_)),
        }
    }

    /// Whether a value must be present on decode.
    pub fn is_required(&self) -> bool {
        *self.visibility() == Visibility::Always && !self.is_optional()
    }
}

/// Ordered field list with unique names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldList(Vec<Field>);

impl FieldList {
    /// Appends `field`, rejecting a second field of the same name.
    pub fn push(&mut self, owner: &str, field: Field) -> Result<(), AppError> {
        if let Some(existing) = self.get(field.name()) {
            return Err(match (existing, &field) {
                (Field::Fixed(_), Field::Fixed(_)) => AppError::RedundantFixedField {
                    owner: owner.to_string(),
                    field: field.name().to_string(),
                },
                _ => AppError::DuplicateField {
                    owner: owner.to_string(),
                    field: field.name().to_string(),
                },
            });
        }
        self.0.push(field);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.0.iter().find(|f| f.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.0.iter_mut().find(|f| f.name() == name)
    }

    /// Value of the fixed field named `key`, if one exists.
    pub fn fixed_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Field::fixed_value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_field_is_rejected() {
        let mut fields = FieldList::default();
        fields
            .push("Emoji", Field::new("emoji", TypeRef::String, ""))
            .unwrap();
        let err = fields
            .push("Emoji", Field::new("emoji", TypeRef::String, ""))
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateField { .. }));
    }

    #[test]
    fn test_second_fixed_field_is_redundant() {
        let mut fields = FieldList::default();
        fields
            .push("CheckboxPropertyValue", Field::fixed("type", "checkbox", ""))
            .unwrap();
        let err = fields
            .push("CheckboxPropertyValue", Field::fixed("type", "checkbox", ""))
            .unwrap_err();
        assert!(matches!(err, AppError::RedundantFixedField { .. }));
    }

    #[test]
    fn test_referenced_symbol_looks_through_containers() {
        let t = TypeRef::nullable(TypeRef::array(TypeRef::named("User")));
        assert_eq!(t.referenced_symbol(), Some("User"));
        assert_eq!(TypeRef::String.referenced_symbol(), None);
        assert_eq!(
            TypeRef::nullable(TypeRef::nullable(TypeRef::Json)),
            TypeRef::nullable(TypeRef::Json)
        );
    }
}
