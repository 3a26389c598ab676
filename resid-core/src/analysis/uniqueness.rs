//! Duplicate ID detection.
//!
//! Declarations are first collapsed on `(identifier, value)`: the same name
//! declared twice with the same value (a header included twice, say) is one
//! logical declaration. Only values shared by two or more *different*
//! identifiers are reported.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::declaration::{Declaration, DeclarationSet};

/// A value claimed by more than one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// The shared value
    pub value: u64,
    /// Distinct identifiers, in first-seen (file-then-line) order
    pub identifiers: Vec<String>,
    /// Every declaration of this value, including repeats of one identifier
    pub declarations: Vec<Declaration>,
}

/// Find all values shared by two or more distinct identifiers.
///
/// Output is sorted ascending by value. Independent of the set's order
/// apart from the order of names within a group.
pub fn find_duplicates(set: &DeclarationSet) -> Vec<DuplicateGroup> {
    let mut by_value: BTreeMap<u64, Vec<&Declaration>> = BTreeMap::new();
    for decl in set {
        by_value.entry(decl.value).or_default().push(decl);
    }

    by_value
        .into_iter()
        .filter_map(|(value, decls)| {
            let mut seen = HashSet::new();
            let identifiers: Vec<String> = decls
                .iter()
                .filter(|d| seen.insert(d.identifier.as_str()))
                .map(|d| d.identifier.clone())
                .collect();

            (identifiers.len() > 1).then(|| DuplicateGroup {
                value,
                identifiers,
                declarations: decls.into_iter().cloned().collect(),
            })
        })
        .collect()
}
