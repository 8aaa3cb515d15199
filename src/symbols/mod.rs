// src/symbols/mod.rs
//! The symbol graph: named data shapes and the relationships between them.
//!
//! Symbols live in name-keyed arenas ([`Registry`]) and refer to each other by
//! name only, so recursive shapes (an abstract whose variant is another
//! abstract, a union of abstracts) need no shared ownership. Pages populate
//! their own registry through a [`Builder`]; cross-page symbols go through the
//! mutex-guarded [`GlobalScope`]. Once every page is done,
//! [`SymbolGraph::assemble`] freezes the lot into one validated arena with a
//! dispatch table per abstract and union.

mod builder;
mod dispatch;
mod field;
mod graph;
mod object;
mod registry;

pub use builder::{Builder, PageArtifact, UnmarshalTest};
pub use dispatch::{DispatchEntry, DispatchTable};
pub use field::{Field, FieldList, FixedStringField, InterfaceField, TypeRef, VariableField, Visibility};
pub use graph::{Module, SymbolGraph};
pub use object::{AbstractObject, AdaptiveObject, ConcreteObject, Tag, TypeObject, UnionObject};
pub use registry::{GlobalContribution, GlobalScope, Registry};

use crate::error::AppError;

/// One node of the object taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Concrete(ConcreteObject),
    Abstract(AbstractObject),
    Adaptive(AdaptiveObject),
    Union(UnionObject),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Concrete(s) => &s.name,
            Symbol::Abstract(s) => &s.name,
            Symbol::Adaptive(s) => &s.name,
            Symbol::Union(s) => &s.name,
        }
    }

    pub fn comment(&self) -> &str {
        match self {
            Symbol::Concrete(s) => &s.comment,
            Symbol::Abstract(s) => &s.comment,
            Symbol::Adaptive(s) => &s.comment,
            Symbol::Union(s) => &s.comment,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Symbol::Concrete(_) => ConcreteObject::KIND,
            Symbol::Abstract(_) => AbstractObject::KIND,
            Symbol::Adaptive(_) => AdaptiveObject::KIND,
            Symbol::Union(_) => UnionObject::KIND,
        }
    }

    /// Own fields; unions have none.
    pub fn fields(&self) -> Option<&FieldList> {
        match self {
            Symbol::Concrete(s) => Some(&s.fields),
            Symbol::Abstract(s) => Some(&s.fields),
            Symbol::Adaptive(s) => Some(&s.fields),
            Symbol::Union(_) => None,
        }
    }

    /// The key this symbol dispatches or adapts on.
    pub fn discriminator_key(&self) -> Option<&str> {
        match self {
            Symbol::Abstract(s) => Some(&s.discriminator_key),
            Symbol::Adaptive(s) => Some(&s.discriminator_key),
            Symbol::Union(s) => Some(&s.discriminator_key),
            Symbol::Concrete(_) => None,
        }
    }

    /// The abstract this symbol is a variant of.
    pub fn parent(&self) -> Option<&str> {
        match self {
            Symbol::Concrete(s) => s.parent.as_deref(),
            Symbol::Abstract(s) => s.parent.as_deref(),
            Symbol::Adaptive(_) | Symbol::Union(_) => None,
        }
    }

    /// Unions listing this symbol as a member.
    pub fn unions(&self) -> &[String] {
        match self {
            Symbol::Concrete(s) => &s.unions,
            Symbol::Abstract(s) => &s.unions,
            Symbol::Adaptive(s) => &s.unions,
            Symbol::Union(_) => &[],
        }
    }

    pub(crate) fn unions_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            Symbol::Concrete(s) => Some(&mut s.unions),
            Symbol::Abstract(s) => Some(&mut s.unions),
            Symbol::Adaptive(s) => Some(&mut s.unions),
            Symbol::Union(_) => None,
        }
    }

    /// Whether values of this symbol are decoded through a dispatch table.
    pub fn is_dispatcher(&self) -> bool {
        matches!(self, Symbol::Abstract(_) | Symbol::Union(_))
    }
}

/// Typed access to one [`Symbol`] variant.
pub trait SymbolKind: Sized {
    /// Human-readable kind, used in `WrongSymbolKind` diagnostics.
    const KIND: &'static str;

    fn from_symbol(symbol: &Symbol) -> Option<&Self>;
    fn from_symbol_mut(symbol: &mut Symbol) -> Option<&mut Self>;
    fn into_symbol(self) -> Symbol;
}

macro_rules! symbol_kind {
    ($ty:ty, $variant:ident, $kind:literal) => {
        impl SymbolKind for $ty {
            const KIND: &'static str = $kind;

            fn from_symbol(symbol: &Symbol) -> Option<&Self> {
                match symbol {
                    Symbol::$variant(s) => Some(s),
                    _ => None,
                }
            }

            fn from_symbol_mut(symbol: &mut Symbol) -> Option<&mut Self> {
                match symbol {
                    Symbol::$variant(s) => Some(s),
                    _ => None,
                }
            }

            fn into_symbol(self) -> Symbol {
                Symbol::$variant(self)
            }
        }
    };
}

symbol_kind!(ConcreteObject, Concrete, "a concrete object");
symbol_kind!(AbstractObject, Abstract, "an abstract object");
symbol_kind!(AdaptiveObject, Adaptive, "an adaptive object");
symbol_kind!(UnionObject, Union, "a union");

/// Narrows `symbol` to `T`, reporting the actual kind on mismatch.
pub fn downcast<T: SymbolKind>(symbol: &Symbol) -> Result<&T, AppError> {
    T::from_symbol(symbol).ok_or_else(|| AppError::WrongSymbolKind {
        name: symbol.name().to_string(),
        expected: T::KIND,
        actual: symbol.kind_name(),
    })
}

pub fn downcast_mut<T: SymbolKind>(symbol: &mut Symbol) -> Result<&mut T, AppError> {
    let actual = symbol.kind_name();
    let name = symbol.name().to_string();
    T::from_symbol_mut(symbol).ok_or(AppError::WrongSymbolKind {
        name,
        expected: T::KIND,
        actual,
    })
}
