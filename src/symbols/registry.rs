// src/symbols/registry.rs
//! Name-keyed symbol arenas and the shared global scope.

use super::{downcast, downcast_mut, Symbol, SymbolKind, UnionObject};
use crate::error::AppError;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Symbols of one scope, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    symbols: IndexMap<String, Symbol>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `symbol`, rejecting a name already taken in this scope.
    pub fn insert(&mut self, symbol: Symbol) -> Result<&mut Symbol, AppError> {
        let name = symbol.name().to_string();
        if self.symbols.contains_key(&name) {
            return Err(AppError::DuplicateSymbol { name });
        }
        log::debug!("Registered {} {}", symbol.kind_name(), name);
        let entry = self.symbols.entry(name).or_insert(symbol);
        Ok(entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.symbols.get_mut(name)
    }

    /// Typed lookup; `Ok(None)` when absent, an error when present with
    /// another kind.
    pub fn get_as<T: SymbolKind>(&self, name: &str) -> Result<Option<&T>, AppError> {
        self.symbols.get(name).map(downcast::<T>).transpose()
    }

    pub fn get_as_mut<T: SymbolKind>(&mut self, name: &str) -> Result<Option<&mut T>, AppError> {
        self.symbols.get_mut(name).map(downcast_mut::<T>).transpose()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn into_symbols(self) -> impl Iterator<Item = Symbol> {
        self.symbols.into_values()
    }
}

/// Everything one page wants to add to the global scope.
///
/// Staged while the page runs and committed in one step afterwards, so a page
/// that fails halfway leaves the global scope untouched.
#[derive(Debug, Clone, Default)]
pub struct GlobalContribution {
    /// Global symbols registered by this page.
    pub symbols: Registry,
    /// Unions this page created or joined, with the members it wants in them.
    pub unions: Registry,
}

impl GlobalContribution {
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && self.unions.is_empty()
    }
}

/// The cross-page symbol scope shared by concurrent page tasks.
#[derive(Debug, Clone, Default)]
pub struct GlobalScope {
    inner: Arc<Mutex<Registry>>,
}

impl GlobalScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the named global symbol, as currently committed.
    pub fn snapshot(&self, name: &str) -> Option<Symbol> {
        self.inner.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().contains(name)
    }

    /// Applies `contribution` atomically: either every symbol and union
    /// membership lands, or nothing does.
    pub fn commit(&self, page: &str, contribution: GlobalContribution) -> Result<(), AppError> {
        if contribution.is_empty() {
            return Ok(());
        }
        let mut live = self.inner.lock();

        // Validate against the live scope before touching it.
        for symbol in contribution.symbols.iter() {
            if live.contains(symbol.name()) {
                return Err(AppError::DuplicateSymbol {
                    name: symbol.name().to_string(),
                });
            }
        }
        for symbol in contribution.unions.iter() {
            let staged = downcast::<UnionObject>(symbol)?;
            if contribution.symbols.contains(&staged.name) {
                return Err(AppError::DuplicateSymbol {
                    name: staged.name.clone(),
                });
            }
            if let Some(existing) = live.get_as::<UnionObject>(&staged.name)? {
                if existing.discriminator_key != staged.discriminator_key {
                    return Err(AppError::UnionKeyConflict {
                        name: staged.name.clone(),
                        existing: existing.discriminator_key.clone(),
                        requested: staged.discriminator_key.clone(),
                    });
                }
            }
        }

        let GlobalContribution { symbols, unions } = contribution;
        for symbol in symbols.into_symbols() {
            live.insert(symbol)?;
        }
        for symbol in unions.into_symbols() {
            let Symbol::Union(staged) = symbol else {
                continue;
            };
            match live.get_as_mut::<UnionObject>(&staged.name)? {
                Some(existing) => {
                    for member in &staged.members {
                        existing.push_member(member);
                    }
                    if existing.comment.is_empty() {
                        existing.comment = staged.comment;
                    }
                }
                None => {
                    live.insert(Symbol::Union(staged))?;
                }
            }
        }
        log::debug!("Committed global contribution of page {}", page);
        Ok(())
    }

    /// Takes the frozen global registry once every page task has finished.
    pub fn freeze(&self) -> Registry {
        self.inner.lock().clone()
    }
}
