// src/symbols/graph.rs
//! The frozen, validated symbol graph handed to code emission.
//!
//! Assembly reads as four steps:
//!   1. Merge the global scope (sorted by name) and every page scope into one arena
//!   2. Sort variants and union members, wire union back-references
//!   3. Validate every reference and field policy
//!   4. Build one dispatch table per abstract and union, then check examples

use super::dispatch::{build_table, DispatchTable};
use super::{
    downcast, AbstractObject, ConcreteObject, Field, PageArtifact, Registry, Symbol, SymbolKind, TypeRef,
    UnmarshalTest,
};
use crate::codec;
use crate::constants::GLOBAL_MODULE;
use crate::error::AppError;
use crate::naming::{common_struct_name, data_struct_name, field_ident, COMMON_FIELD};
use indexmap::IndexMap;

/// One emitted source file worth of symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    /// Documentation page the module was generated from; `None` for the
    /// global module.
    pub source_url: Option<String>,
    /// Symbol names in emission order.
    pub symbols: Vec<String>,
    pub tests: Vec<UnmarshalTest>,
}

#[derive(Debug, Clone)]
pub struct SymbolGraph {
    arena: IndexMap<String, Symbol>,
    modules: Vec<Module>,
    tables: IndexMap<String, DispatchTable>,
}

impl SymbolGraph {
    /// Freezes the global registry and the page artifacts into one graph.
    pub fn assemble(global: Registry, mut pages: Vec<PageArtifact>) -> Result<Self, AppError> {
        let mut arena: IndexMap<String, Symbol> = IndexMap::new();
        let mut modules = Vec::with_capacity(pages.len() + 1);

        // 1. Merge
        let mut global_symbols: Vec<Symbol> = global.into_symbols().collect();
        global_symbols.sort_by(|a, b| a.name().cmp(b.name()));
        let mut global_module = Module {
            name: GLOBAL_MODULE.to_string(),
            source_url: None,
            symbols: Vec::with_capacity(global_symbols.len()),
            tests: Vec::new(),
        };
        for symbol in global_symbols {
            global_module.symbols.push(symbol.name().to_string());
            insert_unique(&mut arena, symbol)?;
        }
        modules.push(global_module);

        pages.sort_by(|a, b| a.page.cmp(&b.page));
        for page in pages {
            let mut module = Module {
                name: page.page,
                source_url: Some(page.source_url),
                symbols: Vec::with_capacity(page.symbols.len()),
                tests: page.tests,
            };
            for symbol in page.symbols.into_symbols() {
                module.symbols.push(symbol.name().to_string());
                insert_unique(&mut arena, symbol)?;
            }
            modules.push(module);
        }

        // 2. Order and back-references
        let mut memberships: Vec<(String, String)> = Vec::new();
        for symbol in arena.values_mut() {
            match symbol {
                Symbol::Abstract(a) => a.variants.sort(),
                Symbol::Union(u) => {
                    u.members.sort();
                    for member in &u.members {
                        memberships.push((member.clone(), u.name.clone()));
                    }
                }
                _ => {}
            }
        }
        for (member, union) in memberships {
            if let Some(unions) = arena.get_mut(&member).and_then(Symbol::unions_mut) {
                if !unions.contains(&union) {
                    unions.push(union);
                }
                unions.sort();
            }
        }

        let mut graph = Self {
            arena,
            modules,
            tables: IndexMap::new(),
        };

        // 3. Validate
        for symbol in graph.arena.values() {
            graph.validate_symbol(symbol)?;
        }

        // 4. Dispatch tables, then examples
        let dispatchers: Vec<String> = graph
            .arena
            .values()
            .filter(|s| s.is_dispatcher())
            .map(|s| s.name().to_string())
            .collect();
        for name in dispatchers {
            let table = build_table(&graph.arena, &name)?;
            graph.tables.insert(name, table);
        }
        graph.validate_examples()?;

        log::info!(
            "Assembled symbol graph: {} symbol(s) in {} module(s)",
            graph.arena.len(),
            graph.modules.len()
        );
        Ok(graph)
    }

    pub fn symbol(&self, name: &str) -> Result<&Symbol, AppError> {
        self.arena.get(name).ok_or_else(|| AppError::UnresolvedSymbol {
            name: name.to_string(),
        })
    }

    pub fn get<T: SymbolKind>(&self, name: &str) -> Result<&T, AppError> {
        downcast::<T>(self.symbol(name)?)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.arena.values()
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn table(&self, name: &str) -> Result<&DispatchTable, AppError> {
        self.tables.get(name).ok_or_else(|| AppError::WrongSymbolKind {
            name: name.to_string(),
            expected: "an abstract object or union",
            actual: self
                .arena
                .get(name)
                .map(Symbol::kind_name)
                .unwrap_or("an unknown symbol"),
        })
    }

    /// Abstract ancestors of `name`, nearest first.
    pub fn ancestors(&self, name: &str) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self.arena.get(name).and_then(Symbol::parent);
        while let Some(parent) = current {
            if chain.contains(&parent) || parent == name {
                break;
            }
            chain.push(parent);
            current = self.arena.get(parent).and_then(Symbol::parent);
        }
        chain
    }

    /// Fields shared by every variant of abstract `name`: those of its
    /// ancestors (root first) followed by its own.
    pub fn common_fields(&self, name: &str) -> Vec<&Field> {
        let mut chain: Vec<&str> = self.ancestors(name);
        chain.reverse();
        chain.push(name);
        chain
            .into_iter()
            .filter_map(|n| self.arena.get(n))
            .filter_map(Symbol::fields)
            .flat_map(|fields| fields.iter())
            .collect()
    }

    /// Every field a value of `name` carries on the wire, inherited first.
    pub fn effective_fields(&self, name: &str) -> Vec<&Field> {
        match self.arena.get(name) {
            Some(symbol) => match symbol.parent() {
                Some(parent) => {
                    let mut fields = self.common_fields(parent);
                    fields.extend(symbol.fields().into_iter().flat_map(|f| f.iter()));
                    fields
                }
                None => symbol.fields().into_iter().flat_map(|f| f.iter()).collect(),
            },
            None => Vec::new(),
        }
    }

    /// Module that declares `name`.
    pub fn module_of(&self, name: &str) -> Option<&str> {
        self.modules
            .iter()
            .find(|m| m.symbols.iter().any(|s| s == name))
            .map(|m| m.name.as_str())
    }

    // --- Validation ---

    fn validate_symbol(&self, symbol: &Symbol) -> Result<(), AppError> {
        let owner = symbol.name();
        if let Some(fields) = symbol.fields() {
            for field in fields {
                self.validate_field(owner, field, matches!(symbol, Symbol::Adaptive(_)))?;
            }
        }

        match symbol {
            Symbol::Concrete(c) => {
                if let Some(type_object) = &c.type_object {
                    for field in &type_object.fields {
                        self.validate_field(owner, field, false)?;
                    }
                }
                self.validate_generated_names(c)?;
            }
            Symbol::Abstract(a) => {
                if a.variants.is_empty() {
                    return Err(AppError::EmptyDispatch {
                        owner: owner.to_string(),
                        kind: "Abstract object",
                    });
                }
                if !self.common_fields(owner).is_empty() {
                    self.reserve(common_struct_name(owner), owner)?;
                }
                for variant in &a.variants {
                    let child = self.symbol(variant)?;
                    if !matches!(child, Symbol::Concrete(_) | Symbol::Abstract(_)) {
                        return Err(AppError::WrongSymbolKind {
                            name: variant.clone(),
                            expected: "a concrete or abstract object",
                            actual: child.kind_name(),
                        });
                    }
                }
            }
            Symbol::Adaptive(d) => {
                let has_key = d.fields.get(&d.discriminator_key).is_some_and(|f| {
                    f.fixed_value().is_some() || f.type_ref() == Some(&TypeRef::String)
                });
                if !has_key {
                    return Err(AppError::MissingDiscriminatorField {
                        owner: owner.to_string(),
                        key: d.discriminator_key.clone(),
                    });
                }
            }
            Symbol::Union(u) => {
                if u.members.is_empty() {
                    return Err(AppError::EmptyDispatch {
                        owner: owner.to_string(),
                        kind: "Union",
                    });
                }
                for member in &u.members {
                    let m = self.symbol(member)?;
                    if matches!(m, Symbol::Union(_)) {
                        return Err(AppError::WrongSymbolKind {
                            name: member.clone(),
                            expected: "a concrete, abstract or adaptive object",
                            actual: m.kind_name(),
                        });
                    }
                }
            }
        }

        if let Some(parent) = symbol.parent() {
            let parent_object = self.get::<AbstractObject>(parent)?;
            if !parent_object.variants.iter().any(|v| v == owner) {
                return Err(AppError::UnresolvedSymbol {
                    name: format!("{} (variant of {})", owner, parent),
                });
            }
        }

        // Inherited and own field names must not collide on the wire.
        if symbol.parent().is_some() {
            let fields = self.effective_fields(owner);
            for (i, field) in fields.iter().enumerate() {
                if fields[..i].iter().any(|f| f.name() == field.name()) {
                    return Err(AppError::DuplicateField {
                        owner: owner.to_string(),
                        field: field.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// A concrete's emitted struct adds a `<Name>Data` type, and a variant
    /// under an abstract with shared fields adds a `common` struct field.
    fn validate_generated_names(&self, object: &ConcreteObject) -> Result<(), AppError> {
        let owner = object.name.as_str();
        let nested_key = match (&object.tag, &object.type_object) {
            (Some(tag), Some(_)) => {
                self.reserve(data_struct_name(owner), owner)?;
                Some(tag.value.as_str())
            }
            _ => None,
        };

        let Some(parent) = object.parent.as_deref() else {
            return Ok(());
        };
        if self.common_fields(parent).is_empty() {
            return Ok(());
        }
        let stored = object
            .fields
            .iter()
            .filter(|f| f.type_ref().is_some())
            .map(Field::name)
            .chain(nested_key);
        for name in stored {
            if field_ident(name) == COMMON_FIELD {
                return Err(AppError::ReservedName {
                    name: format!("{}.{}", owner, name),
                    generated_for: format!("the flattened {} of {}", common_struct_name(parent), owner),
                });
            }
        }
        Ok(())
    }

    fn reserve(&self, generated: String, owner: &str) -> Result<(), AppError> {
        if self.arena.contains_key(&generated) {
            return Err(AppError::ReservedName {
                name: generated,
                generated_for: owner.to_string(),
            });
        }
        Ok(())
    }

    fn validate_field(&self, owner: &str, field: &Field, adaptive: bool) -> Result<(), AppError> {
        if field.visibility().is_discriminator_bound() && !adaptive {
            return Err(AppError::MisplacedVisibility {
                owner: owner.to_string(),
                field: field.name().to_string(),
            });
        }
        match field {
            Field::Fixed(_) => Ok(()),
            Field::Variable(f) => match f.type_ref.referenced_symbol() {
                Some(target) => {
                    let symbol = self.symbol(target)?;
                    if symbol.is_dispatcher() {
                        return Err(AppError::WrongSymbolKind {
                            name: target.to_string(),
                            expected: "a concrete or adaptive object (use an interface field)",
                            actual: symbol.kind_name(),
                        });
                    }
                    Ok(())
                }
                None => Ok(()),
            },
            Field::Interface(f) => {
                let symbol = self.symbol(f.target())?;
                if !symbol.is_dispatcher() {
                    return Err(AppError::WrongSymbolKind {
                        name: f.target().to_string(),
                        expected: "an abstract object or union",
                        actual: symbol.kind_name(),
                    });
                }
                Ok(())
            }
        }
    }

    fn validate_examples(&self) -> Result<(), AppError> {
        for module in &self.modules {
            for test in &module.tests {
                self.symbol(&test.target)?;
                codec::round_trip(self, &test.target, &test.json).map_err(|e| {
                    AppError::InvalidExample {
                        target: test.target.clone(),
                        reason: e.to_string(),
                    }
                })?;
            }
        }
        Ok(())
    }
}

fn insert_unique(arena: &mut IndexMap<String, Symbol>, symbol: Symbol) -> Result<(), AppError> {
    let name = symbol.name().to_string();
    if arena.contains_key(&name) {
        return Err(AppError::DuplicateSymbol { name });
    }
    arena.insert(name, symbol);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{Builder, GlobalScope, Visibility};

    fn page(name: &str, build: impl FnOnce(&mut Builder)) -> (PageArtifact, Registry) {
        let global = GlobalScope::new();
        let mut b = Builder::new(name, format!("https://docs.test/{}", name), global.clone());
        build(&mut b);
        let (artifact, contribution) = b.finish();
        global.commit(name, contribution).unwrap();
        (artifact, global.freeze())
    }

    #[test]
    fn test_global_symbols_are_sorted_and_pages_follow() {
        let global = GlobalScope::new();
        let mut b = Builder::new("emoji", "", global.clone());
        b.add_global_concrete("Zeta", "").unwrap();
        b.add_global_concrete("Alpha", "").unwrap();
        b.add_concrete("Local", "").unwrap();
        let (artifact, contribution) = b.finish();
        global.commit("emoji", contribution).unwrap();

        let graph = SymbolGraph::assemble(global.freeze(), vec![artifact]).unwrap();
        let names: Vec<_> = graph.modules().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["global", "emoji"]);
        assert_eq!(graph.modules()[0].symbols, vec!["Alpha", "Zeta"]);
        assert_eq!(graph.module_of("Local"), Some("emoji"));
    }

    #[test]
    fn test_unresolved_field_reference_fails_assembly() {
        let (artifact, global) = page("user", |b| {
            b.add_concrete("Owner", "")
                .unwrap()
                .add_field(Field::new("user", TypeRef::named("User"), ""))
                .unwrap();
        });
        let err = SymbolGraph::assemble(global, vec![artifact]).unwrap_err();
        assert!(matches!(err, AppError::UnresolvedSymbol { name } if name == "User"));
    }

    #[test]
    fn test_interface_field_must_target_a_dispatcher() {
        let (artifact, global) = page("p", |b| {
            b.add_concrete("Emoji", "").unwrap();
            b.add_concrete("Page", "")
                .unwrap()
                .add_field(Field::interface("icon", "Emoji", ""))
                .unwrap();
        });
        let err = SymbolGraph::assemble(global, vec![artifact]).unwrap_err();
        assert!(matches!(err, AppError::WrongSymbolKind { .. }));
    }

    #[test]
    fn test_discriminator_bound_field_outside_adaptive_fails() {
        let (artifact, global) = page("p", |b| {
            b.add_concrete("Thing", "")
                .unwrap()
                .add_field(
                    Field::new("name", TypeRef::String, "")
                        .with_visibility(Visibility::WhenDiscriminatorSet),
                )
                .unwrap();
        });
        let err = SymbolGraph::assemble(global, vec![artifact]).unwrap_err();
        assert!(matches!(err, AppError::MisplacedVisibility { .. }));
    }

    #[test]
    fn test_adaptive_needs_its_discriminator_field() {
        let (artifact, global) = page("parent", |b| {
            b.add_adaptive("Parent", "type", "")
                .unwrap()
                .add_tagged_field("page_id", Field::new("page_id", TypeRef::String, ""))
                .unwrap();
        });
        let err = SymbolGraph::assemble(global, vec![artifact]).unwrap_err();
        assert!(matches!(err, AppError::MissingDiscriminatorField { .. }));
    }

    #[test]
    fn test_same_name_on_two_pages_is_a_duplicate() {
        let (first, _) = page("a", |b| {
            b.add_concrete("Shared", "").unwrap();
        });
        let (second, _) = page("b", |b| {
            b.add_concrete("Shared", "").unwrap();
        });
        let err = SymbolGraph::assemble(Registry::new(), vec![first, second]).unwrap_err();
        assert!(matches!(err, AppError::DuplicateSymbol { .. }));
    }

    #[test]
    fn test_common_fields_follow_the_ancestor_chain() {
        let (artifact, global) = page("block", |b| {
            b.add_abstract("Block", "type", "")
                .unwrap()
                .add_field(Field::new("id", TypeRef::String, ""))
                .unwrap();
            b.add_derived_abstract("heading", "Block", "level", "")
                .unwrap()
                .add_field(Field::new("color", TypeRef::String, ""))
                .unwrap();
            b.add_derived("one", "HeadingBlock", "")
                .unwrap()
                .add_field(Field::new("text", TypeRef::String, ""))
                .unwrap();
        });
        let graph = SymbolGraph::assemble(global, vec![artifact]).unwrap();

        let names: Vec<_> = graph
            .effective_fields("OneHeadingBlock")
            .iter()
            .map(|f| f.name())
            .collect();
        assert_eq!(names, vec!["id", "type", "color", "level", "text"]);
        assert_eq!(graph.ancestors("OneHeadingBlock"), vec!["HeadingBlock", "Block"]);
        assert!(graph.get::<ConcreteObject>("OneHeadingBlock").is_ok());
    }

    #[test]
    fn test_invalid_example_fails_assembly() {
        let (artifact, global) = page("emoji", |b| {
            b.add_concrete("Emoji", "")
                .unwrap()
                .add_field(Field::fixed("type", "emoji", ""))
                .unwrap();
            b.add_unmarshal_test("Emoji", r#"{"type":"file"}"#);
        });
        let err = SymbolGraph::assemble(global, vec![artifact]).unwrap_err();
        assert!(matches!(err, AppError::InvalidExample { .. }));
    }

    #[test]
    fn test_symbol_named_like_a_common_struct_is_rejected() {
        let (artifact, global) = page("property_value", |b| {
            b.add_abstract("PropertyValue", "type", "")
                .unwrap()
                .add_field(Field::new("id", TypeRef::String, ""))
                .unwrap();
            b.add_derived("checkbox", "PropertyValue", "").unwrap();
            b.add_concrete("PropertyValueCommon", "").unwrap();
        });
        let err = SymbolGraph::assemble(global, vec![artifact]).unwrap_err();
        assert!(matches!(
            err,
            AppError::ReservedName { ref name, ref generated_for }
                if name == "PropertyValueCommon" && generated_for == "PropertyValue"
        ));
    }

    #[test]
    fn test_symbol_named_like_a_type_object_is_rejected() {
        let (artifact, global) = page("property_value", |b| {
            b.add_abstract("PropertyValue", "type", "").unwrap();
            b.add_derived("select", "PropertyValue", "")
                .unwrap()
                .add_type_object_field(Field::new("name", TypeRef::String, ""))
                .unwrap();
            b.add_concrete("SelectPropertyValueData", "").unwrap();
        });
        let err = SymbolGraph::assemble(global, vec![artifact]).unwrap_err();
        assert!(matches!(
            err,
            AppError::ReservedName { ref name, .. } if name == "SelectPropertyValueData"
        ));
    }

    #[test]
    fn test_variant_field_named_common_is_rejected() {
        let (artifact, global) = page("property_value", |b| {
            b.add_abstract("PropertyValue", "type", "")
                .unwrap()
                .add_field(Field::new("id", TypeRef::String, ""))
                .unwrap();
            b.add_derived("checkbox", "PropertyValue", "")
                .unwrap()
                .add_field(Field::new("common", TypeRef::Boolean, ""))
                .unwrap();
        });
        let err = SymbolGraph::assemble(global, vec![artifact]).unwrap_err();
        assert!(matches!(
            err,
            AppError::ReservedName { ref name, .. } if name == "CheckboxPropertyValue.common"
        ));
    }

    #[test]
    fn test_common_field_name_is_free_without_shared_fields() {
        let (artifact, global) = page("property_value", |b| {
            b.add_abstract("PropertyValue", "type", "").unwrap();
            b.add_derived("checkbox", "PropertyValue", "")
                .unwrap()
                .add_field(Field::new("common", TypeRef::Boolean, ""))
                .unwrap();
        });
        assert!(SymbolGraph::assemble(global, vec![artifact]).is_ok());
    }
}
