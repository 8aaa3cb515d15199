// src/symbols/builder.rs
//! Per-page symbol construction, driven by local-copy handlers.

use super::{
    downcast, downcast_mut, AbstractObject, AdaptiveObject, ConcreteObject, Field, GlobalContribution,
    GlobalScope, Registry, Symbol, SymbolKind, Tag, UnionObject,
};
use crate::element::CodeBlock;
use crate::error::AppError;
use crate::naming::pascal_case;

/// A literal JSON example that must round-trip through `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmarshalTest {
    pub target: String,
    pub json: String,
}

/// What one page produced once its handlers have run.
#[derive(Debug, Clone)]
pub struct PageArtifact {
    pub page: String,
    pub source_url: String,
    pub symbols: Registry,
    pub tests: Vec<UnmarshalTest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Local,
    Global,
}

/// Mutable symbol state threaded through one page's handlers.
///
/// Page-local symbols are owned outright. Global symbols and union
/// memberships are staged and only reach the shared [`GlobalScope`] when the
/// page's [`GlobalContribution`] is committed.
#[derive(Debug)]
pub struct Builder {
    page: String,
    source_url: String,
    local: Registry,
    staged: GlobalContribution,
    global: GlobalScope,
    tests: Vec<UnmarshalTest>,
}

impl Builder {
    pub fn new(page: impl Into<String>, source_url: impl Into<String>, global: GlobalScope) -> Self {
        Self {
            page: page.into(),
            source_url: source_url.into(),
            local: Registry::new(),
            staged: GlobalContribution::default(),
            global,
            tests: Vec::new(),
        }
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    // --- Registration ---

    pub fn add_concrete(
        &mut self,
        name: impl Into<String>,
        comment: impl Into<String>,
    ) -> Result<&mut ConcreteObject, AppError> {
        self.register(Scope::Local, ConcreteObject::new(name, comment))
    }

    pub fn add_abstract(
        &mut self,
        name: impl Into<String>,
        discriminator_key: impl Into<String>,
        comment: impl Into<String>,
    ) -> Result<&mut AbstractObject, AppError> {
        self.register(
            Scope::Local,
            AbstractObject::new(name, discriminator_key, comment),
        )
    }

    pub fn add_adaptive(
        &mut self,
        name: impl Into<String>,
        discriminator_key: impl Into<String>,
        comment: impl Into<String>,
    ) -> Result<&mut AdaptiveObject, AppError> {
        self.register(
            Scope::Local,
            AdaptiveObject::new(name, discriminator_key, comment),
        )
    }

    /// Like [`add_concrete`](Self::add_concrete), but visible to every page.
    pub fn add_global_concrete(
        &mut self,
        name: impl Into<String>,
        comment: impl Into<String>,
    ) -> Result<&mut ConcreteObject, AppError> {
        self.register(Scope::Global, ConcreteObject::new(name, comment))
    }

    pub fn add_global_abstract(
        &mut self,
        name: impl Into<String>,
        discriminator_key: impl Into<String>,
        comment: impl Into<String>,
    ) -> Result<&mut AbstractObject, AppError> {
        self.register(
            Scope::Global,
            AbstractObject::new(name, discriminator_key, comment),
        )
    }

    pub fn add_global_adaptive(
        &mut self,
        name: impl Into<String>,
        discriminator_key: impl Into<String>,
        comment: impl Into<String>,
    ) -> Result<&mut AdaptiveObject, AppError> {
        self.register(
            Scope::Global,
            AdaptiveObject::new(name, discriminator_key, comment),
        )
    }

    // --- Derivation ---

    /// Adds the concrete variant of `parent` answering to `value`, named
    /// `<Value><Parent>` (`checkbox` under `PropertyValue` becomes
    /// `CheckboxPropertyValue`). The discriminator field is fixed to `value`.
    pub fn add_derived(
        &mut self,
        value: &str,
        parent: &str,
        comment: impl Into<String>,
    ) -> Result<&mut ConcreteObject, AppError> {
        let name = format!("{}{}", pascal_case(value), parent);
        self.add_derived_named(name, value, parent, comment)
    }

    /// [`add_derived`](Self::add_derived) with an explicit name.
    pub fn add_derived_named(
        &mut self,
        name: impl Into<String>,
        value: &str,
        parent: &str,
        comment: impl Into<String>,
    ) -> Result<&mut ConcreteObject, AppError> {
        let name = name.into();
        let (scope, key) = self.derivation_target(parent)?;
        self.ensure_free(&name)?;

        let mut child = ConcreteObject::new(name.clone(), comment);
        child.parent = Some(parent.to_string());
        child.tag = Some(Tag {
            key: key.clone(),
            value: value.to_string(),
        });
        child.add_field(Field::fixed(key, value, format!("Always `{}`.", value)))?;

        self.link_variant(scope, parent, &name)?;
        self.register(scope, child)
    }

    /// Adds a nested abstract answering to `value` under `parent` and
    /// dispatching its own variants on `discriminator_key`. Values of
    /// `parent` tagged `value` are decoded by delegating to the nested
    /// abstract.
    pub fn add_derived_abstract(
        &mut self,
        value: &str,
        parent: &str,
        discriminator_key: impl Into<String>,
        comment: impl Into<String>,
    ) -> Result<&mut AbstractObject, AppError> {
        let name = format!("{}{}", pascal_case(value), parent);
        let discriminator_key = discriminator_key.into();
        let (scope, key) = self.derivation_target(parent)?;
        if key == discriminator_key {
            return Err(AppError::AmbiguousDiscriminator {
                owner: parent.to_string(),
                variant: name,
                key,
            });
        }
        self.ensure_free(&name)?;

        let mut child = AbstractObject::new(name.clone(), discriminator_key, comment);
        child.parent = Some(parent.to_string());
        child.tag = Some(Tag {
            key: key.clone(),
            value: value.to_string(),
        });
        child.add_field(Field::fixed(key, value, format!("Always `{}`.", value)))?;

        self.link_variant(scope, parent, &name)?;
        self.register(scope, child)
    }

    // --- Unions ---

    /// Returns the global union `name`, creating it if no page has yet.
    ///
    /// Calls from concurrent pages all see the same union once their
    /// contributions are committed; a second caller asking for a different
    /// discriminator key gets `UnionKeyConflict`.
    pub fn add_union_to_global_if_not_exists(
        &mut self,
        name: &str,
        discriminator_key: &str,
    ) -> Result<&mut UnionObject, AppError> {
        if self.local.contains(name) || self.staged.symbols.contains(name) {
            return Err(AppError::DuplicateSymbol {
                name: name.to_string(),
            });
        }
        if !self.staged.unions.contains(name) {
            let union = match self.global.snapshot(name) {
                Some(Symbol::Union(existing)) => existing,
                Some(other) => {
                    return Err(AppError::WrongSymbolKind {
                        name: name.to_string(),
                        expected: UnionObject::KIND,
                        actual: other.kind_name(),
                    })
                }
                None => {
                    log::debug!("[{}] creating global union {}", self.page, name);
                    UnionObject::new(name, discriminator_key)
                }
            };
            self.staged.unions.insert(Symbol::Union(union))?;
        }

        let union = self
            .staged
            .unions
            .get_as_mut::<UnionObject>(name)?
            .ok_or_else(|| AppError::UnresolvedSymbol {
                name: name.to_string(),
            })?;
        if union.discriminator_key != discriminator_key {
            return Err(AppError::UnionKeyConflict {
                name: name.to_string(),
                existing: union.discriminator_key.clone(),
                requested: discriminator_key.to_string(),
            });
        }
        Ok(union)
    }

    /// Adds `member` to a union previously obtained through
    /// [`add_union_to_global_if_not_exists`](Self::add_union_to_global_if_not_exists).
    pub fn add_union_member(&mut self, union: &str, member: &str) -> Result<(), AppError> {
        match self.lookup(member) {
            Some(Symbol::Union(_)) => {
                return Err(AppError::WrongSymbolKind {
                    name: member.to_string(),
                    expected: "a concrete, abstract or adaptive object",
                    actual: UnionObject::KIND,
                })
            }
            Some(_) => {}
            None => {
                return Err(AppError::UnresolvedSymbol {
                    name: member.to_string(),
                })
            }
        }
        let staged = self
            .staged
            .unions
            .get_as_mut::<UnionObject>(union)?
            .ok_or_else(|| AppError::UnresolvedSymbol {
                name: union.to_string(),
            })?;
        staged.push_member(member);
        Ok(())
    }

    // --- Lookup ---

    /// Copy of the named symbol, searching this page, then the page's staged
    /// global symbols, then the committed global scope.
    pub fn get_symbol<T: SymbolKind + Clone>(&self, name: &str) -> Result<T, AppError> {
        match self.lookup(name) {
            Some(symbol) => downcast::<T>(&symbol).cloned(),
            None => Err(AppError::UnresolvedSymbol {
                name: name.to_string(),
            }),
        }
    }

    /// Mutable access to a symbol this page owns or has staged.
    pub fn get_mut<T: SymbolKind>(&mut self, name: &str) -> Result<&mut T, AppError> {
        let scope = self.owning_scope(name)?;
        let symbol = match scope {
            Scope::Local => self.local.get_mut(name),
            Scope::Global if self.staged.symbols.contains(name) => {
                self.staged.symbols.get_mut(name)
            }
            Scope::Global => self.staged.unions.get_mut(name),
        };
        match symbol {
            Some(symbol) => downcast_mut::<T>(symbol),
            None => Err(AppError::UnresolvedSymbol {
                name: name.to_string(),
            }),
        }
    }

    // --- Examples ---

    /// Records a JSON example that must decode as `target` and re-encode to an
    /// equivalent document.
    pub fn add_unmarshal_test(&mut self, target: &str, json: impl Into<String>) {
        self.tests.push(UnmarshalTest {
            target: target.to_string(),
            json: json.into(),
        });
    }

    /// Records every JSON snippet of `block` as an example of `target`.
    /// Returns how many were recorded.
    pub fn add_unmarshal_examples(&mut self, target: &str, block: &CodeBlock) -> usize {
        let before = self.tests.len();
        for code in block.in_language("json") {
            self.add_unmarshal_test(target, code.code.clone());
        }
        self.tests.len() - before
    }

    /// Ends the page, splitting its output into the page-local artifact and
    /// the staged global contribution.
    pub fn finish(self) -> (PageArtifact, GlobalContribution) {
        let artifact = PageArtifact {
            page: self.page,
            source_url: self.source_url,
            symbols: self.local,
            tests: self.tests,
        };
        (artifact, self.staged)
    }

    // --- Internals ---

    fn lookup(&self, name: &str) -> Option<Symbol> {
        self.local
            .get(name)
            .or_else(|| self.staged.symbols.get(name))
            .or_else(|| self.staged.unions.get(name))
            .cloned()
            .or_else(|| self.global.snapshot(name))
    }

    /// Which writable scope holds `name`.
    fn owning_scope(&self, name: &str) -> Result<Scope, AppError> {
        if self.local.contains(name) {
            Ok(Scope::Local)
        } else if self.staged.symbols.contains(name) || self.staged.unions.contains(name) {
            Ok(Scope::Global)
        } else if self.global.contains(name) {
            Err(AppError::ReadOnlySymbol {
                name: name.to_string(),
            })
        } else {
            Err(AppError::UnresolvedSymbol {
                name: name.to_string(),
            })
        }
    }

    fn registry(&self, scope: Scope) -> &Registry {
        match scope {
            Scope::Local => &self.local,
            Scope::Global => &self.staged.symbols,
        }
    }

    fn registry_mut(&mut self, scope: Scope) -> &mut Registry {
        match scope {
            Scope::Local => &mut self.local,
            Scope::Global => &mut self.staged.symbols,
        }
    }

    fn ensure_free(&self, name: &str) -> Result<(), AppError> {
        let taken = self.local.contains(name)
            || self.staged.symbols.contains(name)
            || self.staged.unions.contains(name)
            || self.global.contains(name);
        if taken {
            return Err(AppError::DuplicateSymbol {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn register<T: SymbolKind>(&mut self, scope: Scope, object: T) -> Result<&mut T, AppError> {
        let symbol = object.into_symbol();
        self.ensure_free(symbol.name())?;
        log::debug!(
            "[{}] {} {} ({:?} scope)",
            self.page,
            symbol.kind_name(),
            symbol.name(),
            scope
        );
        let registered = self.registry_mut(scope).insert(symbol)?;
        downcast_mut::<T>(registered)
    }

    /// Scope and discriminator key of the abstract a new variant derives from.
    fn derivation_target(&self, parent: &str) -> Result<(Scope, String), AppError> {
        let scope = self.owning_scope(parent)?;
        let key = self
            .registry(scope)
            .get_as::<AbstractObject>(parent)?
            .map(|a| a.discriminator_key.clone())
            .ok_or_else(|| AppError::UnresolvedSymbol {
                name: parent.to_string(),
            })?;
        Ok((scope, key))
    }

    fn link_variant(&mut self, scope: Scope, parent: &str, variant: &str) -> Result<(), AppError> {
        let abstract_object = self
            .registry_mut(scope)
            .get_as_mut::<AbstractObject>(parent)?
            .ok_or_else(|| AppError::UnresolvedSymbol {
                name: parent.to_string(),
            })?;
        abstract_object.push_variant(variant);
        Ok(())
    }
}
