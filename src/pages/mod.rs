// src/pages/mod.rs
//! Translation rules: one local copy per reference page.
//!
//! Each page module exposes `local_copy()`, the expected element sequence of
//! its page with handlers that populate the symbol graph. The page name is
//! also the name of the generated module.

pub mod doc_text;

mod emoji;
mod file;
mod parent;
mod property_value;
mod user;

use crate::element::local::LocalCopy;

/// Every translated page, in a fixed order.
pub fn all() -> Vec<LocalCopy> {
    vec![
        emoji::local_copy(),
        file::local_copy(),
        parent::local_copy(),
        property_value::local_copy(),
        user::local_copy(),
    ]
}

/// The pages whose name is in `names`, or all of them when `names` is empty.
pub fn select(names: &[String]) -> Vec<LocalCopy> {
    all()
        .into_iter()
        .filter(|copy| names.is_empty() || names.iter().any(|n| n == copy.page()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_are_well_formed_and_unique() {
        let copies = all();
        let mut names: Vec<&str> = copies.iter().map(|c| c.page()).collect();
        for copy in &copies {
            assert!(copy.authoring_error().is_none(), "{:?}", copy.authoring_error());
            assert!(!copy.is_empty());
        }
        names.sort();
        names.dedup();
        assert_eq!(names.len(), copies.len());
    }

    #[test]
    fn test_select_filters_by_name() {
        let picked = select(&["user".to_string(), "emoji".to_string()]);
        let names: Vec<&str> = picked.iter().map(|c| c.page()).collect();
        assert_eq!(names, vec!["emoji", "user"]);
        assert_eq!(select(&[]).len(), all().len());
    }
}
