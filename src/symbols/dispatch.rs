// src/symbols/dispatch.rs
//! Discriminator dispatch tables for abstracts and unions.
//!
//! A table maps each discriminator value an abstract or union can see to the
//! direct member that decodes it. Members that share the owner's key and have
//! no fixed value of their own (a same-keyed abstract, an adaptive object)
//! contribute one entry per value they answer to; every other member is a
//! single opaque entry keyed by its fixed value and decodes by delegation.

use super::Symbol;
use crate::error::AppError;
use indexmap::IndexMap;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEntry {
    pub value: String,
    /// Direct variant or union member the value is handed to.
    pub member: String,
    /// Innermost symbol the value resolves to without further dispatch on
    /// this key (the member itself when it dispatches on a different key).
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTable {
    pub owner: String,
    pub key: String,
    /// Sorted by discriminator value; values are pairwise distinct.
    pub entries: Vec<DispatchEntry>,
}

impl DispatchTable {
    pub fn lookup(&self, value: &str) -> Option<&DispatchEntry> {
        self.entries
            .binary_search_by(|e| e.value.as_str().cmp(value))
            .ok()
            .map(|i| &self.entries[i])
    }
}

/// Builds the table of the abstract or union `owner`.
pub(crate) fn build_table(
    arena: &IndexMap<String, Symbol>,
    owner: &str,
) -> Result<DispatchTable, AppError> {
    let symbol = resolve(arena, owner)?;
    let (key, members) = match symbol {
        Symbol::Abstract(a) => (a.discriminator_key.as_str(), &a.variants),
        Symbol::Union(u) => (u.discriminator_key.as_str(), &u.members),
        other => {
            return Err(AppError::WrongSymbolKind {
                name: owner.to_string(),
                expected: "an abstract object or union",
                actual: other.kind_name(),
            })
        }
    };

    let mut entries: Vec<DispatchEntry> = Vec::new();
    for member in members {
        let mut visited = HashSet::from([owner.to_string()]);
        for (value, target) in values_under(arena, owner, member, key, &mut visited)? {
            entries.push(DispatchEntry {
                value,
                member: member.clone(),
                target,
            });
        }
    }

    entries.sort_by(|a, b| a.value.cmp(&b.value));
    for pair in entries.windows(2) {
        if pair[0].value == pair[1].value {
            return Err(AppError::DuplicateDiscriminator {
                owner: owner.to_string(),
                key: key.to_string(),
                value: pair[0].value.clone(),
                first: pair[0].target.clone(),
                second: pair[1].target.clone(),
            });
        }
    }

    log::debug!(
        "Dispatch table for {} on {}: {} value(s)",
        owner,
        key,
        entries.len()
    );
    Ok(DispatchTable {
        owner: owner.to_string(),
        key: key.to_string(),
        entries,
    })
}

/// The (value, target) pairs under which `name` is reachable when dispatching
/// on `key`.
fn values_under(
    arena: &IndexMap<String, Symbol>,
    owner: &str,
    name: &str,
    key: &str,
    visited: &mut HashSet<String>,
) -> Result<Vec<(String, String)>, AppError> {
    let ambiguous = || AppError::AmbiguousDiscriminator {
        owner: owner.to_string(),
        variant: name.to_string(),
        key: key.to_string(),
    };
    if !visited.insert(name.to_string()) {
        return Err(ambiguous());
    }

    let symbol = resolve(arena, name)?;
    let fixed = symbol.fields().and_then(|fields| fields.fixed_value(key));
    if let Some(value) = fixed {
        return Ok(vec![(value.to_string(), name.to_string())]);
    }

    match symbol {
        Symbol::Abstract(a) if a.discriminator_key == key && !a.variants.is_empty() => {
            let mut values = Vec::new();
            for variant in &a.variants {
                values.extend(values_under(arena, owner, variant, key, visited)?);
            }
            Ok(values)
        }
        Symbol::Adaptive(d) if d.discriminator_key == key => {
            let values = d.tag_values();
            if values.is_empty() {
                return Err(ambiguous());
            }
            Ok(values
                .into_iter()
                .map(|v| (v.to_string(), name.to_string()))
                .collect())
        }
        _ => Err(ambiguous()),
    }
}

fn resolve<'a>(arena: &'a IndexMap<String, Symbol>, name: &str) -> Result<&'a Symbol, AppError> {
    arena.get(name).ok_or_else(|| AppError::UnresolvedSymbol {
        name: name.to_string(),
    })
}
