//! Core records: raw source lines and the resource-ID declarations found in them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Default floor for resource-ID values. Anything below is ignored.
pub const DEFAULT_MIN_VALUE: u64 = 1000;

/// One line of a header file as produced by an ingestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// File the line came from
    pub source: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Raw text without the trailing newline
    pub text: String,
}

impl SourceLine {
    pub fn new(source: impl Into<PathBuf>, line: usize, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            line,
            text: text.into(),
        }
    }
}

/// Textual form a declaration was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationStyle {
    /// `#define NAME 1000`
    Define,
    /// `NAME = 1000,` inside an enum body
    Enum,
}

/// A single resource-ID declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Declared identifier
    pub identifier: String,
    /// Integer value assigned to the identifier
    pub value: u64,
    /// File containing the declaration
    pub source: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Syntax the declaration used
    pub style: DeclarationStyle,
}

impl Declaration {
    pub fn new(
        identifier: impl Into<String>,
        value: u64,
        source: impl Into<PathBuf>,
        line: usize,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            value,
            source: source.into(),
            line,
            style: DeclarationStyle::Define,
        }
    }

    /// Same declaration tagged with another style.
    pub fn with_style(mut self, style: DeclarationStyle) -> Self {
        self.style = style;
        self
    }

    /// `file:line` for diagnostics.
    pub fn location(&self) -> String {
        format!("{}:{}", self.source.display(), self.line)
    }
}

/// All declarations at or above a value floor, ordered file-then-line.
///
/// The floor is enforced on construction, so every analysis over a set
/// sees only values `>= min_value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationSet {
    min_value: u64,
    declarations: Vec<Declaration>,
}

impl DeclarationSet {
    /// Build a set, dropping declarations below `min_value` and sorting by
    /// `(source, line)`. The sort is stable, so two declarations on one line
    /// keep their input order.
    pub fn new(min_value: u64, declarations: impl IntoIterator<Item = Declaration>) -> Self {
        let mut declarations: Vec<Declaration> = declarations
            .into_iter()
            .filter(|d| d.value >= min_value)
            .collect();
        declarations.sort_by(|a, b| a.source.cmp(&b.source).then(a.line.cmp(&b.line)));
        Self {
            min_value,
            declarations,
        }
    }

    /// Empty set with the given floor.
    pub fn empty(min_value: u64) -> Self {
        Self {
            min_value,
            declarations: Vec::new(),
        }
    }

    pub fn min_value(&self) -> u64 {
        self.min_value
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Declaration> {
        self.declarations.iter()
    }

    pub fn as_slice(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Distinct used values, ascending.
    pub fn used_values(&self) -> BTreeSet<u64> {
        self.declarations.iter().map(|d| d.value).collect()
    }

    /// Largest used value, if any.
    pub fn max_value(&self) -> Option<u64> {
        self.declarations.iter().map(|d| d.value).max()
    }

    /// Distinct source files, in set order.
    pub fn sources(&self) -> Vec<&Path> {
        let mut seen = HashSet::new();
        self.declarations
            .iter()
            .map(|d| d.source.as_path())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// Subset containing only declarations from `source`.
    pub fn for_source(&self, source: &Path) -> DeclarationSet {
        Self {
            min_value: self.min_value,
            declarations: self
                .declarations
                .iter()
                .filter(|d| d.source == source)
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DeclarationSet {
    type Item = &'a Declaration;
    type IntoIter = std::slice::Iter<'a, Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.declarations.iter()
    }
}
