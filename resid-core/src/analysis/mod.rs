//! Resource-ID analyses over a [`DeclarationSet`].
//!
//! # Architecture
//!
//! ```text
//!                 ┌────────────────────┐
//!                 │   DeclarationSet   │
//!                 └─────────┬──────────┘
//!        ┌──────────────────┼──────────────────┐
//!        ▼                  ▼                  ▼
//! ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//! │uniqueness.rs │  │   gaps.rs    │  │  blocks.rs   │
//! │ shared values│  │  free values │  │  used ranges │
//! └──────────────┘  └──────────────┘  └──────────────┘
//! ```
//!
//! The three analyses are independent, read-only and pure. [`analyze`] runs
//! whichever ones are selected in [`Actions`].

pub mod blocks;
pub mod gaps;
pub mod uniqueness;

use std::path::PathBuf;

use serde::Serialize;

use crate::declaration::DeclarationSet;

pub use blocks::{find_blocks, Block};
pub use gaps::{suggest_ids, GapSuggester, Suggestion, SuggestionReason, DEFAULT_SUGGEST_COUNT};
pub use uniqueness::{find_duplicates, DuplicateGroup};

/// Which analyses to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Actions {
    pub uniqueness: bool,
    pub suggest: bool,
    pub blocks: bool,
}

impl Actions {
    /// All three analyses.
    pub fn all() -> Self {
        Self {
            uniqueness: true,
            suggest: true,
            blocks: true,
        }
    }

    /// Uniqueness is checked when nothing was selected explicitly.
    pub fn or_default_uniqueness(self) -> Self {
        if self.uniqueness || self.suggest || self.blocks {
            self
        } else {
            Self {
                uniqueness: true,
                ..self
            }
        }
    }
}

/// Parameters shared by all analyses of one run.
///
/// The floor is not an option: it is always the one the
/// [`DeclarationSet`] was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub suggest_count: usize,
    pub lookahead: Option<u64>,
    pub actions: Actions,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            suggest_count: DEFAULT_SUGGEST_COUNT,
            lookahead: None,
            actions: Actions::default().or_default_uniqueness(),
        }
    }
}

/// Structured result handed to a reporter.
///
/// Each optional section is present iff its action was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Distinct files contributing lines. [`analyze`] only sees the set, so
    /// it counts files with a declaration; a run overrides this with the
    /// number of files actually read.
    pub files: usize,
    /// Declarations at or above the floor
    pub declarations: usize,
    /// Floor used for this run
    pub min_value: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<Vec<DuplicateGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<Suggestion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
}

/// Result for a single header in per-file mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAnalysis {
    pub source: PathBuf,
    pub result: AnalysisResult,
}

/// Run the selected analyses over `set`.
pub fn analyze(set: &DeclarationSet, options: &AnalysisOptions) -> AnalysisResult {
    let actions = options.actions.or_default_uniqueness();
    let min_value = set.min_value();

    AnalysisResult {
        files: set.sources().len(),
        declarations: set.len(),
        min_value,
        duplicates: actions.uniqueness.then(|| find_duplicates(set)),
        suggestions: actions.suggest.then(|| {
            GapSuggester::new(min_value)
                .with_count(options.suggest_count)
                .with_lookahead(options.lookahead)
                .suggest(set)
        }),
        blocks: actions.blocks.then(|| find_blocks(set)),
    }
}

/// Run the selected analyses separately for every source file in `set`.
pub fn analyze_per_file(set: &DeclarationSet, options: &AnalysisOptions) -> Vec<FileAnalysis> {
    let mut sources: Vec<PathBuf> = set.sources().into_iter().map(PathBuf::from).collect();
    sources.sort();

    sources
        .into_iter()
        .map(|source| {
            let result = analyze(&set.for_source(&source), options);
            FileAnalysis { source, result }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Declaration;
    use proptest::prelude::*;
    use std::collections::{BTreeSet, HashMap, HashSet};

    fn scenario() -> DeclarationSet {
        DeclarationSet::new(
            1000,
            vec![
                Declaration::new("A", 1000, "a.h", 1),
                Declaration::new("B", 1000, "a.h", 2),
                Declaration::new("C", 1002, "a.h", 3),
            ],
        )
    }

    #[test]
    fn test_scenario_all_actions() {
        let options = AnalysisOptions {
            suggest_count: 2,
            actions: Actions::all(),
            ..AnalysisOptions::default()
        };
        let result = analyze(&scenario(), &options);

        let duplicates = result.duplicates.unwrap();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].value, 1000);
        assert_eq!(duplicates[0].identifiers, vec!["A", "B"]);

        let values: Vec<_> = result.suggestions.unwrap().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1001, 1003]);

        assert_eq!(
            result.blocks.unwrap(),
            vec![Block { start: 1000, end: 1000 }, Block { start: 1002, end: 1002 }]
        );
        assert_eq!(result.files, 1);
        assert_eq!(result.declarations, 3);
    }

    #[test]
    fn test_default_action_is_uniqueness() {
        let options = AnalysisOptions {
            actions: Actions::default(),
            ..AnalysisOptions::default()
        };
        let result = analyze(&scenario(), &options);
        assert!(result.duplicates.is_some());
        assert!(result.suggestions.is_none());
        assert!(result.blocks.is_none());
    }

    #[test]
    fn test_only_requested_sections() {
        let options = AnalysisOptions {
            actions: Actions {
                blocks: true,
                ..Actions::default()
            },
            ..AnalysisOptions::default()
        };
        let result = analyze(&scenario(), &options);
        assert!(result.duplicates.is_none());
        assert!(result.suggestions.is_none());
        assert_eq!(result.blocks.map(|b| b.len()), Some(2));
    }

    #[test]
    fn test_empty_input() {
        let options = AnalysisOptions {
            actions: Actions::all(),
            ..AnalysisOptions::default()
        };
        let result = analyze(&DeclarationSet::empty(1000), &options);
        assert_eq!(result.duplicates, Some(Vec::new()));
        assert_eq!(result.suggestions, Some(Vec::new()));
        assert_eq!(result.blocks, Some(Vec::new()));
        assert_eq!(result.files, 0);
    }

    #[test]
    fn test_below_floor_excluded_everywhere() {
        let set = DeclarationSet::new(1000, vec![Declaration::new("LOW", 500, "a.h", 1)]);
        let options = AnalysisOptions {
            actions: Actions::all(),
            ..AnalysisOptions::default()
        };
        let result = analyze(&set, &options);
        assert_eq!(result.declarations, 0);
        assert_eq!(result.duplicates, Some(Vec::new()));
        assert_eq!(result.suggestions, Some(Vec::new()));
        assert_eq!(result.blocks, Some(Vec::new()));
    }

    #[test]
    fn test_floor_comes_from_set() {
        let set = DeclarationSet::new(
            0,
            vec![Declaration::new("A", 5, "a.h", 1), Declaration::new("B", 5, "a.h", 2)],
        );
        let options = AnalysisOptions {
            suggest_count: 2,
            actions: Actions::all(),
            ..AnalysisOptions::default()
        };
        let result = analyze(&set, &options);
        assert_eq!(result.min_value, 0);
        assert_eq!(result.duplicates.unwrap()[0].value, 5);
        assert_eq!(result.blocks, Some(vec![Block { start: 5, end: 5 }]));
        let values: Vec<_> = result.suggestions.unwrap().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![0, 1]);
    }

    #[test]
    fn test_per_file() {
        let set = DeclarationSet::new(
            1000,
            vec![
                Declaration::new("B_ONE", 1000, "b.h", 1),
                Declaration::new("A_ONE", 1000, "a.h", 1),
                Declaration::new("A_TWO", 1000, "a.h", 2),
            ],
        );
        let per_file = analyze_per_file(&set, &AnalysisOptions::default());
        assert_eq!(per_file.len(), 2);
        assert_eq!(per_file[0].source, PathBuf::from("a.h"));
        assert_eq!(per_file[0].result.duplicates.as_ref().map(|d| d.len()), Some(1));
        assert_eq!(per_file[1].source, PathBuf::from("b.h"));
        assert_eq!(per_file[1].result.duplicates, Some(Vec::new()));

        // Merged, the three declarations form one group.
        let merged = analyze(&set, &AnalysisOptions::default()).duplicates.unwrap();
        assert_eq!(merged[0].identifiers.len(), 3);
    }

    fn declarations() -> impl Strategy<Value = Vec<Declaration>> {
        prop::collection::vec(
            (prop::sample::select(vec!["A", "B", "C", "D", "E"]), 900u64..1100),
            0..40,
        )
        .prop_map(|pairs| {
            pairs
                .into_iter()
                .enumerate()
                .map(|(i, (name, value))| Declaration::new(name, value, "p.h", i + 1))
                .collect()
        })
    }

    /// Declarations spread over several headers, paired with a shuffled copy.
    fn declarations_and_shuffled() -> impl Strategy<Value = (Vec<Declaration>, Vec<Declaration>)> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["A", "B", "C", "D", "E"]),
                990u64..1030,
                prop::sample::select(vec!["a.h", "b.h", "sub/c.h"]),
            ),
            0..40,
        )
        .prop_flat_map(|triples| {
            let decls: Vec<Declaration> = triples
                .into_iter()
                .enumerate()
                .map(|(i, (name, value, source))| Declaration::new(name, value, source, i + 1))
                .collect();
            (Just(decls.clone()), Just(decls).prop_shuffle())
        })
    }

    fn group_summary(groups: &[DuplicateGroup]) -> Vec<(u64, BTreeSet<String>)> {
        groups
            .iter()
            .map(|g| (g.value, g.identifiers.iter().cloned().collect()))
            .collect()
    }

    proptest! {
        #[test]
        fn input_order_does_not_matter((decls, shuffled) in declarations_and_shuffled(), count in 1usize..20) {
            let set = DeclarationSet::new(1000, decls);
            let reordered = DeclarationSet::new(1000, shuffled);

            prop_assert_eq!(
                group_summary(&find_duplicates(&set)),
                group_summary(&find_duplicates(&reordered))
            );
            prop_assert_eq!(
                suggest_ids(&set, 1000, count),
                suggest_ids(&reordered, 1000, count)
            );
            prop_assert_eq!(find_blocks(&set), find_blocks(&reordered));
        }

        #[test]
        fn floor_holds(decls in declarations(), floor in 900u64..1100) {
            let set = DeclarationSet::new(floor, decls);
            prop_assert!(set.iter().all(|d| d.value >= floor));
        }

        #[test]
        fn duplicate_groups_are_exact(decls in declarations()) {
            let set = DeclarationSet::new(1000, decls);
            let groups = find_duplicates(&set);

            let mut names: HashMap<u64, HashSet<&str>> = HashMap::new();
            for d in &set {
                names.entry(d.value).or_default().insert(d.identifier.as_str());
            }
            let expected: BTreeSet<u64> = names
                .iter()
                .filter(|(_, n)| n.len() > 1)
                .map(|(v, _)| *v)
                .collect();
            let reported: Vec<u64> = groups.iter().map(|g| g.value).collect();
            prop_assert_eq!(reported, expected.into_iter().collect::<Vec<_>>());

            for g in &groups {
                let unique: HashSet<_> = g.identifiers.iter().collect();
                prop_assert_eq!(unique.len(), g.identifiers.len());
                prop_assert!(g.identifiers.len() >= 2);
            }
        }

        #[test]
        fn suggestions_are_free_and_stable(decls in declarations(), count in 0usize..30) {
            let set = DeclarationSet::new(1000, decls);
            let used = set.used_values();
            let first = suggest_ids(&set, 1000, count);
            prop_assert_eq!(&first, &suggest_ids(&set, 1000, count));
            prop_assert!(first.iter().all(|v| !used.contains(v) && *v >= 1000));
            prop_assert!(first.windows(2).all(|w| w[0] < w[1]));
            if !used.is_empty() {
                prop_assert_eq!(first.len(), count);
            }
        }

        #[test]
        fn blocks_cover_used_values_maximally(decls in declarations()) {
            let set = DeclarationSet::new(1000, decls);
            let used = set.used_values();
            let blocks = find_blocks(&set);

            let covered: Vec<u64> = blocks.iter().flat_map(|b| b.start..=b.end).collect();
            prop_assert_eq!(covered, used.iter().copied().collect::<Vec<_>>());

            for b in &blocks {
                if b.start > 0 {
                    prop_assert!(!used.contains(&(b.start - 1)));
                }
                if b.end < u64::MAX {
                    prop_assert!(!used.contains(&(b.end + 1)));
                }
            }
        }
    }
}
